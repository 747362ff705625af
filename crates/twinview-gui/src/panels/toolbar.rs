use twinview_core::render::QualityMode;

use crate::app::TwinviewApp;

pub fn show(ctx: &egui::Context, app: &mut TwinviewApp) {
    egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            let toggled = ui
                .toggle_value(&mut app.ui_state.annotation_mode, "Annotate")
                .on_hover_text("Drag on either image to draw a labelled rectangle")
                .changed();
            if toggled && !app.ui_state.annotation_mode {
                app.dismiss_prompt();
            }

            ui.separator();

            let zoom = app.workspace.config().zoom.clone();
            if ui.button("Zoom In").clicked() {
                app.workspace.pair_mut().zoom_both(zoom.button_zoom_in);
            }
            if ui.button("Zoom Out").clicked() {
                app.workspace.pair_mut().zoom_both(zoom.button_zoom_out);
            }
            if ui.button("Reset View").clicked() {
                app.workspace.pair_mut().reset_views();
            }

            ui.separator();

            if ui.button("Undo").clicked() {
                app.undo();
            }
            if ui.button("Save Annotations").clicked() {
                app.save_annotations();
            }

            ui.separator();

            let mut quality = app.workspace.pair().quality_mode();
            egui::ComboBox::from_id_salt("quality_mode")
                .selected_text(quality.to_string())
                .show_ui(ui, |ui| {
                    for mode in QualityMode::ALL {
                        ui.selectable_value(&mut quality, *mode, mode.to_string());
                    }
                });
            if quality != app.workspace.pair().quality_mode() {
                app.workspace.pair_mut().set_quality_mode(quality);
                app.ui_state.add_log(format!("Quality: {quality}"));
            }

            let mut linked = app.workspace.pair().is_linked();
            if ui.checkbox(&mut linked, "Link views").changed() {
                app.workspace.pair_mut().set_linked(linked);
            }
        });
    });
}
