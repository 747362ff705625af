use std::path::PathBuf;

use twinview_core::config::ReviewConfig;

/// Results sent from dialog threads back to the UI thread.
pub enum UiMessage {
    /// Original and translated folders chosen.
    FoldersPicked {
        original: PathBuf,
        translated: PathBuf,
    },
    AnnotationFolderPicked {
        path: PathBuf,
    },
    /// Export root chosen; the export itself runs on the UI thread.
    ExportFolderPicked {
        path: PathBuf,
    },
    /// Folder for the single reviewed-image export.
    CurrentExportFolderPicked {
        path: PathBuf,
    },
    ConfigImported {
        path: PathBuf,
        config: ReviewConfig,
    },
    Log {
        message: String,
    },
}
