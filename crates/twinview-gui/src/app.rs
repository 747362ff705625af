use std::path::PathBuf;
use std::sync::mpsc;

use twinview_core::config::ReviewConfig;
use twinview_core::error::Result;
use twinview_core::export::CurrentExport;
use twinview_core::pair::Side;
use twinview_core::snapshot::SnapshotOutcome;
use twinview_core::viewport::ViewportEvent;
use twinview_core::workspace::{ReviewNotice, ReviewWorkspace};

use crate::messages::UiMessage;
use crate::panels;
use crate::states::{OverwriteState, UIState, ViewportTextures};

pub struct TwinviewApp {
    pub msg_tx: mpsc::Sender<UiMessage>,
    pub msg_rx: mpsc::Receiver<UiMessage>,
    pub workspace: ReviewWorkspace,
    pub ui_state: UIState,
    pub textures: ViewportTextures,
    pub show_about: bool,
}

impl TwinviewApp {
    pub fn new(_ctx: &egui::Context) -> Result<Self> {
        let (msg_tx, msg_rx) = mpsc::channel();
        Ok(Self {
            msg_tx,
            msg_rx,
            workspace: ReviewWorkspace::new(ReviewConfig::default())?,
            ui_state: UIState::default(),
            textures: ViewportTextures::default(),
            show_about: false,
        })
    }

    /// Drain all pending results from dialog threads.
    fn poll_messages(&mut self) {
        while let Ok(msg) = self.msg_rx.try_recv() {
            match msg {
                UiMessage::FoldersPicked { original, translated } => {
                    self.open_folders(original, translated);
                }
                UiMessage::AnnotationFolderPicked { path } => {
                    self.ui_state.add_log(format!("Annotation folder: {}", path.display()));
                    self.workspace.set_annotation_dir(Some(path));
                }
                UiMessage::ExportFolderPicked { path } => {
                    self.export_all(path);
                }
                UiMessage::ConfigImported { path, config } => {
                    if self.apply_config(config) {
                        self.ui_state.add_log(format!("Config imported from {}", path.display()));
                    }
                }
                UiMessage::CurrentExportFolderPicked { path } => {
                    self.export_current(path, false);
                }
                UiMessage::Log { message } => {
                    self.ui_state.add_log(message);
                }
            }
        }
    }

    /// Close the text prompt and discard any rectangle waiting for it.
    pub fn dismiss_prompt(&mut self) {
        self.ui_state.prompt = None;
        for side in Side::ALL {
            self.workspace.pair_mut().cancel_annotation(side);
        }
    }

    pub fn open_folders(&mut self, original: PathBuf, translated: PathBuf) {
        self.dismiss_prompt();
        let discovery = match self.workspace.open_folders(&original, &translated) {
            Ok(d) => d,
            Err(e) => {
                self.ui_state.add_log(format!("ERROR: {e}"));
                return;
            }
        };

        for skipped in &discovery.skipped {
            self.ui_state
                .add_log(format!("Skipped {}: {}", skipped.filename, skipped.reason));
        }
        for notice in &discovery.notices {
            self.ui_state.add_log(notice.to_string());
        }
        self.ui_state
            .add_log(format!("Found {} matching image pairs", discovery.pairs.len()));

        if !self.workspace.session().is_empty() {
            self.after_navigation(|ws| ws.load_current());
        }
    }

    /// Run a navigation step, logging failures and scheduling a fit.
    pub fn after_navigation(&mut self, step: impl FnOnce(&mut ReviewWorkspace) -> Result<()>) {
        self.dismiss_prompt();
        if let Err(e) = step(&mut self.workspace) {
            self.ui_state.add_log(format!("ERROR: {e}"));
        }
        self.ui_state.needs_fit = true;
    }

    pub fn navigate_next(&mut self) {
        self.after_navigation(|ws| ws.next().map(|_| ()));
    }

    pub fn navigate_prev(&mut self) {
        self.after_navigation(|ws| ws.prev().map(|_| ()));
    }

    pub fn undo(&mut self) {
        let side = self.ui_state.active_side;
        if !self.workspace.pair_mut().undo_last_annotation(side) {
            self.ui_state.add_log("Nothing to undo".into());
        }
    }

    pub fn save_annotations(&mut self) {
        match self.workspace.save_current_annotations(None) {
            Ok(outcome) => self.log_snapshot(&outcome),
            Err(e) => self.ui_state.add_log(format!("ERROR: {e}")),
        }
    }

    fn log_snapshot(&mut self, outcome: &SnapshotOutcome) {
        match outcome {
            SnapshotOutcome::Saved { paths } => {
                for path in paths {
                    self.ui_state.add_log(format!("Saved: {}", path.display()));
                }
            }
            SnapshotOutcome::NothingToSave => {
                self.ui_state.add_log("No annotations on the current image".into());
            }
        }
    }

    fn export_all(&mut self, root: PathBuf) {
        self.dismiss_prompt();
        match self.workspace.export_all(&root, |_, _| {}) {
            Ok(report) => {
                for failure in &report.failures {
                    self.ui_state.add_log(format!("Export failed: {failure}"));
                }
                self.ui_state.add_log(format!(
                    "Exported {} pair(s) to {} (needs fix: {}, approved: {})",
                    report.exported,
                    root.display(),
                    report.needs_fix,
                    report.approved
                ));
            }
            Err(e) => self.ui_state.add_log(format!("ERROR: {e}")),
        }
        self.ui_state.needs_fit = true;
    }

    /// Apply a new config. Flags, annotations and folders are kept.
    pub fn apply_config(&mut self, config: ReviewConfig) -> bool {
        self.dismiss_prompt();
        match self.workspace.set_config(config) {
            Ok(()) => {
                // Rebuilt viewports restart their revision counters.
                self.textures = ViewportTextures::default();
                self.ui_state.needs_fit = true;
                true
            }
            Err(e) => {
                self.ui_state.add_log(format!("ERROR: {e}"));
                false
            }
        }
    }

    /// Export the reviewed translated image. An existing file is only
    /// replaced after the user confirms.
    pub fn export_current(&mut self, dir: PathBuf, overwrite: bool) {
        match self.workspace.export_current(&dir, overwrite) {
            Ok(CurrentExport::Saved(path)) => {
                self.ui_state.add_log(format!("Saved: {}", path.display()));
            }
            Ok(CurrentExport::AlreadyExists(path)) => {
                self.ui_state.overwrite = Some(OverwriteState { dir, path });
            }
            Err(e) => self.ui_state.add_log(format!("ERROR: {e}")),
        }
    }

    /// Turn viewport notifications into log lines.
    fn process_notices(&mut self) {
        for notice in self.workspace.process_events() {
            match notice {
                ReviewNotice::View(event) => match event.event {
                    ViewportEvent::AnnotationAdded { index, text } => {
                        self.ui_state
                            .add_log(format!("Annotation #{} on {}: {text}", index + 1, event.side));
                    }
                    ViewportEvent::AnnotationUndone { remaining } => {
                        self.ui_state
                            .add_log(format!("Undone on {} ({remaining} left)", event.side));
                    }
                    _ => {}
                },
                ReviewNotice::AutoSaved(outcome) => self.log_snapshot(&outcome),
                ReviewNotice::AutoSaveFailed(message) => {
                    self.ui_state.add_log(format!("Autosave failed: {message}"));
                }
            }
        }
    }

    fn sync_textures(&mut self, ctx: &egui::Context) {
        for (side, name) in [(Side::Original, "original"), (Side::Translated, "translated")] {
            let viewport = self.workspace.pair().viewport(side);
            self.textures.get_mut(side).sync(ctx, name, viewport);
        }
    }
}

impl eframe::App for TwinviewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_messages();

        if !self.ui_state.is_prompting()
            && ctx.input_mut(|i| i.consume_shortcut(&egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::Z)))
        {
            self.undo();
        }

        panels::menu_bar::show(ctx, self);
        panels::toolbar::show(ctx, self);
        panels::status::show(ctx, self);
        panels::pairs::show(ctx, self);
        self.sync_textures(ctx);
        panels::viewport::show(ctx, self);
        panels::prompt::show(ctx, self);
        panels::prompt::show_overwrite(ctx, self);

        self.process_notices();

        if self.show_about {
            egui::Window::new("About Twinview")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.heading("Twinview");
                        ui.label("Side-by-side image review");
                        ui.add_space(8.0);
                        ui.label(format!("Version {}", env!("CARGO_PKG_VERSION")));
                        ui.add_space(8.0);
                        if ui.button("Close").clicked() {
                            self.show_about = false;
                        }
                    });
                });
        }
    }
}
