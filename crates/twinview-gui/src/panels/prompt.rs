use twinview_core::annotation::CommitOutcome;

use crate::app::TwinviewApp;

/// Text entry for a freshly drawn rectangle. Confirming commits the
/// annotation; cancelling drops the rectangle.
pub fn show(ctx: &egui::Context, app: &mut TwinviewApp) {
    let Some(prompt) = app.ui_state.prompt.as_mut() else {
        return;
    };
    let side = prompt.side;

    let mut decision: Option<Option<String>> = None;
    egui::Window::new("Annotation")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(format!("Describe the issue on the {side} image:"));
            let edit = ui.add(
                egui::TextEdit::singleline(&mut prompt.text)
                    .hint_text("Annotation text")
                    .desired_width(280.0),
            );
            if !prompt.focused {
                edit.request_focus();
                prompt.focused = true;
            }
            let submitted = edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

            ui.horizontal(|ui| {
                if ui.button("OK").clicked() || submitted {
                    decision = Some(Some(prompt.text.clone()));
                }
                if ui.button("Cancel").clicked() || ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                    decision = Some(None);
                }
            });
        });

    let Some(text) = decision else {
        return;
    };
    app.ui_state.prompt = None;
    match app.workspace.pair_mut().resolve_annotation(side, text) {
        CommitOutcome::Added { .. } => {}
        CommitOutcome::Declined => app.ui_state.add_log("Annotation discarded".into()),
        other => app.ui_state.add_log(other.to_string()),
    }
}

/// Confirmation for overwriting an existing reviewed image.
pub fn show_overwrite(ctx: &egui::Context, app: &mut TwinviewApp) {
    let Some(pending) = &app.ui_state.overwrite else {
        return;
    };
    let name = pending
        .path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut decision = None;
    egui::Window::new("File exists")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(format!("{name} already exists. Overwrite it?"));
            ui.horizontal(|ui| {
                if ui.button("Overwrite").clicked() {
                    decision = Some(true);
                }
                if ui.button("Cancel").clicked() || ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                    decision = Some(false);
                }
            });
        });

    let Some(overwrite) = decision else {
        return;
    };
    let Some(pending) = app.ui_state.overwrite.take() else {
        return;
    };
    if overwrite {
        app.export_current(pending.dir, true);
    } else {
        app.ui_state.add_log(format!("Kept existing {name}"));
    }
}
