//! Ad-hoc annotation snapshots written next to the source folders.

use std::fs;
use std::path::{Path, PathBuf};

use image::RgbaImage;
use tracing::info;

use crate::consts::{ANNOTATED_TAG, ORIGINAL_PREFIX, SNAPSHOT_TEXT_CHARS, SNAPSHOT_TIMESTAMP_FORMAT};
use crate::error::Result;
use crate::io::image_io::save_raster;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SnapshotOutcome {
    Saved { paths: Vec<PathBuf> },
    /// Neither side carries an annotation.
    NothingToSave,
}

/// Local time formatted for snapshot filenames.
pub fn timestamp_now() -> String {
    chrono::Local::now().format(SNAPSHOT_TIMESTAMP_FORMAT).to_string()
}

/// Filename-safe excerpt of annotation text: the first characters,
/// keeping alphanumerics, space, `_` and `-`, spaces turned into `_`.
pub fn short_text(text: &str) -> String {
    text.chars()
        .take(SNAPSHOT_TEXT_CHARS)
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '_' | '-'))
        .map(|c| if c == ' ' { '_' } else { c })
        .collect()
}

/// `<base>_annotated[_<short>]_<timestamp>.<ext>` for the translated side.
pub fn snapshot_file_name(filename: &str, text: Option<&str>, timestamp: &str) -> String {
    let path = Path::new(filename);
    let base = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename);
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default();

    let short = text.map(short_text).unwrap_or_default();
    if short.is_empty() {
        format!("{base}_{ANNOTATED_TAG}_{timestamp}{ext}")
    } else {
        format!("{base}_{ANNOTATED_TAG}_{short}_{timestamp}{ext}")
    }
}

/// Write whichever sides have a rendered image. The original side gets the
/// `orig_` prefix.
pub fn save_snapshot(
    dir: &Path,
    filename: &str,
    original: Option<&RgbaImage>,
    translated: Option<&RgbaImage>,
    text: Option<&str>,
    timestamp: &str,
    jpeg_quality: u8,
) -> Result<SnapshotOutcome> {
    if original.is_none() && translated.is_none() {
        return Ok(SnapshotOutcome::NothingToSave);
    }
    fs::create_dir_all(dir)?;

    let name = snapshot_file_name(filename, text, timestamp);
    let mut paths = Vec::new();
    if let Some(img) = original {
        let path = dir.join(format!("{ORIGINAL_PREFIX}{name}"));
        save_raster(img, &path, jpeg_quality)?;
        paths.push(path);
    }
    if let Some(img) = translated {
        let path = dir.join(&name);
        save_raster(img, &path, jpeg_quality)?;
        paths.push(path);
    }
    info!(count = paths.len(), dir = %dir.display(), "Saved annotation snapshot");
    Ok(SnapshotOutcome::Saved { paths })
}
