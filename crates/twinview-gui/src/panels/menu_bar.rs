use twinview_core::config::ReviewConfig;

use crate::app::TwinviewApp;
use crate::messages::UiMessage;

pub fn show(ctx: &egui::Context, app: &mut TwinviewApp) {
    egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        egui::MenuBar::new().ui(ui, |ui| {
            ui.menu_button("File", |ui| {
                let open_shortcut = egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::O);
                if ui
                    .add(egui::Button::new("Open Folders...").shortcut_text(ctx.format_shortcut(&open_shortcut)))
                    .clicked()
                {
                    ui.close();
                    open_folders(ctx, app);
                }

                if ui.button("Annotation Folder...").clicked() {
                    ui.close();
                    pick_annotation_folder(ctx, app);
                }

                let save_shortcut = egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::S);
                if ui
                    .add(egui::Button::new("Save Annotations").shortcut_text(ctx.format_shortcut(&save_shortcut)))
                    .clicked()
                {
                    ui.close();
                    app.save_annotations();
                }

                if ui
                    .add_enabled(
                        app.workspace.loaded_filename().is_some(),
                        egui::Button::new("Export Current..."),
                    )
                    .clicked()
                {
                    ui.close();
                    pick_current_export_folder(ctx, app);
                }

                if ui
                    .add_enabled(!app.workspace.session().is_empty(), egui::Button::new("Export All..."))
                    .clicked()
                {
                    ui.close();
                    pick_export_folder(ctx, app);
                }

                ui.separator();

                if ui.button("Import Config...").clicked() {
                    ui.close();
                    import_config(ctx, app);
                }

                if ui.button("Export Config...").clicked() {
                    ui.close();
                    export_config(app);
                }

                ui.separator();

                let quit_shortcut = egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::Q);
                if ui
                    .add(egui::Button::new("Quit").shortcut_text(ctx.format_shortcut(&quit_shortcut)))
                    .clicked()
                {
                    ui.close();
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });

            ui.menu_button("Edit", |ui| {
                let undo_shortcut = egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::Z);
                if ui
                    .add(egui::Button::new("Undo Annotation").shortcut_text(ctx.format_shortcut(&undo_shortcut)))
                    .clicked()
                {
                    ui.close();
                    app.undo();
                }

                if ui.button("Reset Defaults").clicked() {
                    ui.close();
                    if app.apply_config(ReviewConfig::default()) {
                        app.ui_state.add_log("Config reset to defaults".into());
                    }
                }
            });

            ui.menu_button("Help", |ui| {
                if ui.button("About").clicked() {
                    ui.close();
                    app.show_about = true;
                }
            });
        });

        // Keyboard shortcuts (consumed outside menus)
        if app.ui_state.is_prompting() {
            return;
        }
        if ctx.input_mut(|i| i.consume_shortcut(&egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::O))) {
            open_folders(ctx, app);
        }
        if ctx.input_mut(|i| i.consume_shortcut(&egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::S))) {
            app.save_annotations();
        }
        if ctx.input_mut(|i| i.consume_shortcut(&egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::Q))) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    });
}

fn open_folders(ctx: &egui::Context, app: &mut TwinviewApp) {
    let msg_tx = app.msg_tx.clone();
    let ctx = ctx.clone();
    std::thread::spawn(move || {
        let Some(original) = rfd::FileDialog::new().set_title("Original images").pick_folder() else {
            return;
        };
        let Some(translated) = rfd::FileDialog::new().set_title("Translated images").pick_folder() else {
            return;
        };
        let _ = msg_tx.send(UiMessage::FoldersPicked { original, translated });
        ctx.request_repaint();
    });
}

fn pick_annotation_folder(ctx: &egui::Context, app: &mut TwinviewApp) {
    let msg_tx = app.msg_tx.clone();
    let ctx = ctx.clone();
    std::thread::spawn(move || {
        if let Some(path) = rfd::FileDialog::new().set_title("Annotation folder").pick_folder() {
            let _ = msg_tx.send(UiMessage::AnnotationFolderPicked { path });
            ctx.request_repaint();
        }
    });
}

pub(crate) fn pick_export_folder(ctx: &egui::Context, app: &mut TwinviewApp) {
    let msg_tx = app.msg_tx.clone();
    let ctx = ctx.clone();
    std::thread::spawn(move || {
        if let Some(path) = rfd::FileDialog::new().set_title("Export destination").pick_folder() {
            let _ = msg_tx.send(UiMessage::ExportFolderPicked { path });
            ctx.request_repaint();
        }
    });
}

fn pick_current_export_folder(ctx: &egui::Context, app: &mut TwinviewApp) {
    let msg_tx = app.msg_tx.clone();
    let ctx = ctx.clone();
    std::thread::spawn(move || {
        if let Some(path) = rfd::FileDialog::new().set_title("Reviewed image folder").pick_folder() {
            let _ = msg_tx.send(UiMessage::CurrentExportFolderPicked { path });
            ctx.request_repaint();
        }
    });
}

fn import_config(ctx: &egui::Context, app: &mut TwinviewApp) {
    let msg_tx = app.msg_tx.clone();
    let ctx = ctx.clone();
    std::thread::spawn(move || {
        let Some(path) = rfd::FileDialog::new().add_filter("TOML", &["toml"]).pick_file() else {
            return;
        };
        let msg = match ReviewConfig::load(&path) {
            Ok(config) => UiMessage::ConfigImported { path, config },
            Err(e) => UiMessage::Log {
                message: format!("ERROR: {e}"),
            },
        };
        let _ = msg_tx.send(msg);
        ctx.request_repaint();
    });
}

fn export_config(app: &mut TwinviewApp) {
    let config = app.workspace.config().clone();
    let msg_tx = app.msg_tx.clone();

    std::thread::spawn(move || {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("TOML", &["toml"])
            .set_file_name("twinview.toml")
            .save_file()
        {
            let message = match write_config(&config, &path) {
                Ok(()) => format!("Config exported to {}", path.display()),
                Err(e) => format!("ERROR: {e:#}"),
            };
            let _ = msg_tx.send(UiMessage::Log { message });
        }
    });
}

fn write_config(config: &ReviewConfig, path: &std::path::Path) -> anyhow::Result<()> {
    let content = config.to_toml_string()?;
    std::fs::write(path, content)?;
    Ok(())
}
