/// Default lower bound for a viewport's zoom scale.
pub const DEFAULT_MIN_SCALE: f64 = 0.1;

/// Default upper bound for a viewport's zoom scale.
pub const DEFAULT_MAX_SCALE: f64 = 10.0;

/// Zoom multiplier per mouse wheel notch. Zooming out divides by it.
pub const DEFAULT_WHEEL_STEP: f64 = 1.1;

/// Zoom multiplier for the toolbar zoom-in button.
pub const DEFAULT_BUTTON_ZOOM_IN: f64 = 1.2;

/// Zoom multiplier for the toolbar zoom-out button.
pub const DEFAULT_BUTTON_ZOOM_OUT: f64 = 0.8;

/// Drags whose width or height (image pixels) is not strictly above this
/// are discarded instead of becoming annotations.
pub const DEFAULT_MIN_ANNOTATION_SIZE: f64 = 5.0;

/// Annotation outline width in image pixels.
pub const DEFAULT_STROKE_WIDTH: f64 = 3.0;

/// Annotation stroke and label color (RGBA).
pub const ALERT_COLOR: [u8; 4] = [255, 0, 0, 255];

/// Integer magnification applied to the 8x8 label glyphs.
pub const DEFAULT_LABEL_SCALE: u32 = 2;

/// Side length of one unscaled label glyph.
pub const GLYPH_SIZE: u32 = 8;

/// Gap between a label's bottom edge and the rectangle's top edge.
pub const LABEL_GAP: i64 = 2;

/// Scale differences below this are treated as "no change".
pub const SCALE_EPSILON: f64 = 1e-9;

/// Lowercase file extensions recognized as images.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "webp"];

/// Export subfolder for pairs flagged as needing a fix.
pub const DEFAULT_NEEDS_FIX_DIR: &str = "needs-fix";

/// Export subfolder for pairs that passed review.
pub const DEFAULT_APPROVED_DIR: &str = "approved";

/// Default folder name, next to the original folder, for annotation snapshots.
pub const DEFAULT_ANNOTATION_DIR: &str = "annotations";

/// Filename prefix marking the original side of an exported pair.
pub const ORIGINAL_PREFIX: &str = "orig_";

/// Filename prefix of a single reviewed image exported on its own.
pub const REVIEWED_PREFIX: &str = "reviewed_";

/// Tag inserted into ad-hoc snapshot filenames.
pub const ANNOTATED_TAG: &str = "annotated";

/// Maximum number of annotation-text characters carried into a snapshot filename.
pub const SNAPSHOT_TEXT_CHARS: usize = 20;

/// chrono format string for snapshot timestamps.
pub const SNAPSHOT_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Default JPEG encoder quality (1-100).
pub const DEFAULT_JPEG_QUALITY: u8 = 90;
