use crate::app::TwinviewApp;

pub fn show(ctx: &egui::Context, app: &mut TwinviewApp) {
    egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
        ui.add_space(2.0);

        // Log area: fixed height for 4 lines, scrollable.
        let line_height = ui.text_style_height(&egui::TextStyle::Body);
        let spacing = ui.spacing().item_spacing.y;
        let log_height = line_height * 4.0 + spacing * 3.0;

        egui::ScrollArea::vertical()
            .max_height(log_height)
            .min_scrolled_height(log_height)
            .stick_to_bottom(true)
            .show(ui, |ui| {
                if app.ui_state.log_messages.is_empty() {
                    // Reserve space for 4 empty lines to prevent layout jump.
                    for _ in 0..4 {
                        ui.label("");
                    }
                } else {
                    for msg in &app.ui_state.log_messages {
                        ui.label(msg);
                    }
                }
            });

        ui.horizontal(|ui| {
            let session = app.workspace.session();
            if let (Some(name), Some(index)) = (app.workspace.loaded_filename(), session.current_index()) {
                ui.label(format!("{name} ({}/{})", index + 1, session.len()));
                ui.separator();
            }
            let viewport = app.workspace.pair().viewport(app.ui_state.active_side);
            if viewport.has_image() {
                let size = viewport.image_size();
                ui.label(format!("{}x{}", size.width, size.height));
                ui.separator();
            }
            ui.label(format!("Zoom: {:.0}%", viewport.transform().scale * 100.0));
            ui.separator();
            ui.label(format!("Quality: {}", app.workspace.pair().quality_mode()));
            ui.separator();
            ui.label(if app.workspace.pair().is_linked() { "Linked" } else { "Independent" });
            if app.ui_state.annotation_mode {
                ui.separator();
                ui.label("Annotating");
            }
        });

        ui.add_space(2.0);
    });
}
