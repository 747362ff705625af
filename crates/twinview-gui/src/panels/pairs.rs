use crate::app::TwinviewApp;
use crate::panels::menu_bar::pick_export_folder;
use crate::panels::section_header;

pub fn show(ctx: &egui::Context, app: &mut TwinviewApp) {
    egui::SidePanel::left("pairs")
        .resizable(true)
        .default_width(220.0)
        .show(ctx, |ui| {
            folders_section(ui, app);
            ui.separator();
            review_section(ui, app);
            let can_export = !app.workspace.session().is_empty();
            if ui
                .add_enabled(can_export, egui::Button::new("Export All..."))
                .on_hover_text("Write every pair into needs-fix/ and approved/")
                .clicked()
            {
                pick_export_folder(ctx, app);
            }
            ui.separator();
            pair_list(ui, app);
        });
}

fn folders_section(ui: &mut egui::Ui, app: &TwinviewApp) {
    section_header(ui, "Folders", None);
    let folder_label = |dir: Option<&std::path::Path>| {
        dir.map(|d| d.display().to_string())
            .unwrap_or_else(|| "(none)".into())
    };
    ui.small(format!("Original: {}", folder_label(app.workspace.original_dir())));
    ui.small(format!("Translated: {}", folder_label(app.workspace.translated_dir())));
    if let Some(dir) = app.workspace.annotation_dir() {
        ui.small(format!("Annotations: {}", dir.display()));
    }
}

fn review_section(ui: &mut egui::Ui, app: &mut TwinviewApp) {
    let session = app.workspace.session();
    let position = session
        .current_index()
        .map(|i| format!("{}/{}", i + 1, session.len()));
    section_header(ui, "Review", position.as_deref());

    let has_prev = session.has_prev();
    let has_next = session.has_next();
    ui.horizontal(|ui| {
        if ui.add_enabled(has_prev, egui::Button::new("< Prev")).clicked() {
            app.navigate_prev();
        }
        if ui.add_enabled(has_next, egui::Button::new("Next >")).clicked() {
            app.navigate_next();
        }
    });

    let has_current = app.workspace.session().current().is_some();
    let mut flagged = app.workspace.current_needs_fix();
    if ui
        .add_enabled(has_current, egui::Checkbox::new(&mut flagged, "Needs fix"))
        .changed()
    {
        if let Err(e) = app.workspace.set_needs_fix(flagged) {
            app.ui_state.add_log(format!("ERROR: {e}"));
        }
    }
    ui.small(format!(
        "{} of {} flagged",
        app.workspace.session().flagged_count(),
        app.workspace.session().len()
    ));
}

fn pair_list(ui: &mut egui::Ui, app: &mut TwinviewApp) {
    section_header(ui, "Pairs", None);

    let mut clicked = None;
    egui::ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
        let session = app.workspace.session();
        let current = session.current_index();
        for (i, pair) in session.pairs().iter().enumerate() {
            let marker = if session.is_flagged(&pair.filename) { "[!] " } else { "" };
            let stashed = app
                .workspace
                .stashed(&pair.filename)
                .is_some_and(|s| !s.is_empty());
            let suffix = if stashed { " *" } else { "" };
            let label = format!("{marker}{}{suffix}", pair.filename);
            if ui.selectable_label(current == Some(i), label).clicked() {
                clicked = Some(i);
            }
        }
    });

    if let Some(index) = clicked {
        app.after_navigation(|ws| ws.select(index));
    }
}
