//! Pair discovery: images present under the same name in both folders.

use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::Path;

use rayon::prelude::*;
use tracing::{info, warn};

use crate::error::{Result, TwinviewError};
use crate::io::image_io::{is_supported_image, read_dimensions};
use crate::session::ImagePair;

/// A common filename that was left out of the pair list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedPair {
    pub filename: String,
    pub reason: String,
}

/// Non-fatal conditions worth telling the user about.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiscoveryNotice {
    /// One of the folders contains no recognized images.
    NoImages { folder: String },
    /// Both folders have images but no filename in common.
    NoCommonFiles,
    /// Pairs excluded because their sizes differ or could not be read.
    DimensionMismatch { count: usize },
}

impl fmt::Display for DiscoveryNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoImages { folder } => write!(f, "No images found in {folder}"),
            Self::NoCommonFiles => write!(f, "No matching filenames between the two folders"),
            Self::DimensionMismatch { count } => {
                write!(f, "{count} pair(s) skipped because their dimensions differ")
            }
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Discovery {
    pub pairs: Vec<ImagePair>,
    pub skipped: Vec<SkippedPair>,
    pub notices: Vec<DiscoveryNotice>,
}

/// Recognized image filenames directly inside `dir`.
pub fn list_images(dir: &Path) -> Result<BTreeSet<String>> {
    let entries = fs::read_dir(dir).map_err(|source| TwinviewError::DirectoryUnreadable {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut names = BTreeSet::new();
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() || !is_supported_image(&path) {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            names.insert(name.to_string());
        }
    }
    Ok(names)
}

/// Filenames present in both folders, in lexicographic order.
pub fn common_filenames(original: &BTreeSet<String>, translated: &BTreeSet<String>) -> Vec<String> {
    original.intersection(translated).cloned().collect()
}

/// Build the pair list for two folders.
///
/// With `require_equal_dimensions`, every candidate's header is read on
/// both sides (in parallel) and pairs whose sizes differ are skipped.
pub fn discover_pairs(original_dir: &Path, translated_dir: &Path, require_equal_dimensions: bool) -> Result<Discovery> {
    let original = list_images(original_dir)?;
    let translated = list_images(translated_dir)?;

    let mut notices = Vec::new();
    if original.is_empty() {
        notices.push(DiscoveryNotice::NoImages {
            folder: original_dir.display().to_string(),
        });
    }
    if translated.is_empty() {
        notices.push(DiscoveryNotice::NoImages {
            folder: translated_dir.display().to_string(),
        });
    }

    let names = common_filenames(&original, &translated);
    if names.is_empty() && !original.is_empty() && !translated.is_empty() {
        notices.push(DiscoveryNotice::NoCommonFiles);
    }

    let candidates: Vec<ImagePair> = names
        .into_iter()
        .map(|filename| ImagePair {
            original_path: original_dir.join(&filename),
            translated_path: translated_dir.join(&filename),
            filename,
        })
        .collect();

    if !require_equal_dimensions {
        info!(pairs = candidates.len(), "Discovered image pairs");
        return Ok(Discovery {
            pairs: candidates,
            skipped: Vec::new(),
            notices,
        });
    }

    let checked: Vec<(ImagePair, Option<String>)> = candidates
        .into_par_iter()
        .map(|pair| {
            let verdict = dimension_mismatch(&pair);
            (pair, verdict)
        })
        .collect();

    let mut pairs = Vec::with_capacity(checked.len());
    let mut skipped = Vec::new();
    for (pair, verdict) in checked {
        match verdict {
            None => pairs.push(pair),
            Some(reason) => {
                warn!(filename = %pair.filename, %reason, "Skipping pair");
                skipped.push(SkippedPair {
                    filename: pair.filename,
                    reason,
                });
            }
        }
    }
    if !skipped.is_empty() {
        notices.push(DiscoveryNotice::DimensionMismatch { count: skipped.len() });
    }

    info!(pairs = pairs.len(), skipped = skipped.len(), "Discovered image pairs");
    Ok(Discovery {
        pairs,
        skipped,
        notices,
    })
}

/// `None` when both sides have the same size, otherwise the reason to skip.
fn dimension_mismatch(pair: &ImagePair) -> Option<String> {
    let original = match read_dimensions(&pair.original_path) {
        Ok(dims) => dims,
        Err(e) => return Some(e.to_string()),
    };
    let translated = match read_dimensions(&pair.translated_path) {
        Ok(dims) => dims,
        Err(e) => return Some(e.to_string()),
    };
    if original == translated {
        None
    } else {
        Some(format!(
            "dimensions differ: original {}x{}, translated {}x{}",
            original.0, original.1, translated.0, translated.1
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_common_filenames_sorted_intersection() {
        let a = set(&["c.png", "a.png", "b.png"]);
        let b = set(&["d.png", "c.png", "b.png"]);
        assert_eq!(common_filenames(&a, &b), vec!["b.png", "c.png"]);
    }

    #[test]
    fn test_common_filenames_exact_case() {
        let a = set(&["A.png"]);
        let b = set(&["a.png"]);
        assert!(common_filenames(&a, &b).is_empty());
    }
}
