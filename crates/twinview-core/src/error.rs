use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TwinviewError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Cannot read directory {path}: {source}")]
    DirectoryUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to load {path}: {reason}")]
    LoadFailed { path: PathBuf, reason: String },

    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("Pair index {index} out of range (total: {total})")]
    PairIndexOutOfRange { index: usize, total: usize },

    #[error("No image pair is currently selected")]
    NoCurrentPair,

    #[error("Cannot create export folder {path}: {source}")]
    ExportFolder {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid zoom limits: min {min}, max {max}")]
    InvalidZoomLimits { min: f64, max: f64 },

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, TwinviewError>;
