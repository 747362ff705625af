//! Batch export layout and reporting.
//!
//! Rendering goes through the viewport pair (see
//! [`crate::workspace::ReviewWorkspace::export_all`]); this module only
//! decides where each raster lands and records what went wrong.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use image::RgbaImage;
use tracing::warn;

use crate::consts::{ORIGINAL_PREFIX, REVIEWED_PREFIX};
use crate::error::{Result, TwinviewError};
use crate::io::image_io::save_raster;
use crate::pair::Side;

/// The two destination folders under an export root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportLayout {
    pub root: PathBuf,
    pub needs_fix: PathBuf,
    pub approved: PathBuf,
}

impl ExportLayout {
    /// Create both subfolders. Failure here aborts the whole export.
    pub fn prepare(root: &Path, needs_fix_dir: &str, approved_dir: &str) -> Result<Self> {
        let layout = Self {
            root: root.to_path_buf(),
            needs_fix: root.join(needs_fix_dir),
            approved: root.join(approved_dir),
        };
        for dir in [&layout.needs_fix, &layout.approved] {
            fs::create_dir_all(dir).map_err(|source| TwinviewError::ExportFolder {
                path: dir.clone(),
                source,
            })?;
        }
        Ok(layout)
    }

    pub fn folder_for(&self, flagged: bool) -> &Path {
        if flagged {
            &self.needs_fix
        } else {
            &self.approved
        }
    }

    /// Destination of one side of `filename`.
    pub fn target_path(&self, filename: &str, side: Side, flagged: bool) -> PathBuf {
        let folder = self.folder_for(flagged);
        match side {
            Side::Original => folder.join(format!("{ORIGINAL_PREFIX}{filename}")),
            Side::Translated => folder.join(filename),
        }
    }
}

/// Result of exporting the reviewed image of the loaded pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CurrentExport {
    Saved(PathBuf),
    /// The target exists and overwriting was not allowed. Nothing was written.
    AlreadyExists(PathBuf),
}

/// `<dir>/reviewed_<filename>`.
pub fn reviewed_path(dir: &Path, filename: &str) -> PathBuf {
    dir.join(format!("{REVIEWED_PREFIX}{filename}"))
}

/// Write the reviewed image into `dir`, creating it if needed.
pub fn export_reviewed(
    dir: &Path,
    filename: &str,
    image: &RgbaImage,
    overwrite: bool,
    jpeg_quality: u8,
) -> Result<CurrentExport> {
    let path = reviewed_path(dir, filename);
    if path.exists() && !overwrite {
        return Ok(CurrentExport::AlreadyExists(path));
    }
    fs::create_dir_all(dir).map_err(|source| TwinviewError::ExportFolder {
        path: dir.to_path_buf(),
        source,
    })?;
    save_raster(image, &path, jpeg_quality)?;
    Ok(CurrentExport::Saved(path))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportFailure {
    pub filename: String,
    pub side: Side,
    pub message: String,
}

impl fmt::Display for ExportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.filename, self.side, self.message)
    }
}

/// Outcome of a batch export. Per-side failures do not stop the batch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExportReport {
    /// Pairs written completely.
    pub exported: usize,
    pub failures: Vec<ExportFailure>,
    /// Pairs routed to the needs-fix folder.
    pub needs_fix: usize,
    /// Pairs routed to the approved folder.
    pub approved: usize,
}

impl ExportReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn record_failure(&mut self, filename: &str, side: Side, message: impl Into<String>) {
        let failure = ExportFailure {
            filename: filename.to_string(),
            side,
            message: message.into(),
        };
        warn!(%failure, "Export failed");
        self.failures.push(failure);
    }
}

/// Write both rendered sides of one pair. A missing render counts as a
/// failure of that side.
pub fn export_pair(
    layout: &ExportLayout,
    filename: &str,
    flagged: bool,
    original: Option<&RgbaImage>,
    translated: Option<&RgbaImage>,
    jpeg_quality: u8,
    report: &mut ExportReport,
) {
    if flagged {
        report.needs_fix += 1;
    } else {
        report.approved += 1;
    }

    let mut ok = true;
    for (side, img) in [(Side::Original, original), (Side::Translated, translated)] {
        let Some(img) = img else {
            report.record_failure(filename, side, "no image loaded");
            ok = false;
            continue;
        };
        let path = layout.target_path(filename, side, flagged);
        if let Err(e) = save_raster(img, &path, jpeg_quality) {
            report.record_failure(filename, side, e.to_string());
            ok = false;
        }
    }
    if ok {
        report.exported += 1;
    }
}
