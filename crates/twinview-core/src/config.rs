use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{
    ALERT_COLOR, DEFAULT_ANNOTATION_DIR, DEFAULT_APPROVED_DIR, DEFAULT_BUTTON_ZOOM_IN, DEFAULT_BUTTON_ZOOM_OUT,
    DEFAULT_JPEG_QUALITY, DEFAULT_LABEL_SCALE, DEFAULT_MAX_SCALE, DEFAULT_MIN_ANNOTATION_SIZE, DEFAULT_MIN_SCALE,
    DEFAULT_NEEDS_FIX_DIR, DEFAULT_STROKE_WIDTH, DEFAULT_WHEEL_STEP,
};
use crate::error::{Result, TwinviewError};
use crate::render::{OverlayStyle, QualityMode};
use crate::transform::ZoomLimits;
use crate::viewport::ViewportSettings;

/// Everything a review run can be tuned with. Missing sections and fields
/// fall back to their defaults when parsed from TOML.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewConfig {
    #[serde(default)]
    pub quality: QualityMode,
    #[serde(default)]
    pub zoom: ZoomConfig,
    #[serde(default)]
    pub annotation: AnnotationConfig,
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
    pub min_scale: f64,
    pub max_scale: f64,
    /// Per wheel notch. Wheel up multiplies, wheel down divides.
    pub wheel_step: f64,
    pub button_zoom_in: f64,
    pub button_zoom_out: f64,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            min_scale: DEFAULT_MIN_SCALE,
            max_scale: DEFAULT_MAX_SCALE,
            wheel_step: DEFAULT_WHEEL_STEP,
            button_zoom_in: DEFAULT_BUTTON_ZOOM_IN,
            button_zoom_out: DEFAULT_BUTTON_ZOOM_OUT,
        }
    }
}

impl ZoomConfig {
    pub fn limits(&self) -> ZoomLimits {
        ZoomLimits {
            min: self.min_scale,
            max: self.max_scale,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationConfig {
    /// Image pixels; drags not strictly larger on both axes are discarded.
    pub min_size: f64,
    /// Image pixels.
    pub stroke_width: f64,
    pub color: [u8; 4],
    pub label_scale: u32,
    /// Snapshot to the annotation folder after every committed annotation.
    pub autosave: bool,
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            min_size: DEFAULT_MIN_ANNOTATION_SIZE,
            stroke_width: DEFAULT_STROKE_WIDTH,
            color: ALERT_COLOR,
            label_scale: DEFAULT_LABEL_SCALE,
            autosave: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    pub require_equal_dimensions: bool,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            require_equal_dimensions: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub needs_fix_dir: String,
    pub approved_dir: String,
    pub jpeg_quality: u8,
    /// Created next to the original folder when no annotation folder was chosen.
    pub annotation_dir_name: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            needs_fix_dir: DEFAULT_NEEDS_FIX_DIR.to_string(),
            approved_dir: DEFAULT_APPROVED_DIR.to_string(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            annotation_dir_name: DEFAULT_ANNOTATION_DIR.to_string(),
        }
    }
}

impl ReviewConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s).map_err(|e| TwinviewError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| TwinviewError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        self.zoom.limits().validate()?;
        for (name, step) in [
            ("wheel_step", self.zoom.wheel_step),
            ("button_zoom_in", self.zoom.button_zoom_in),
            ("button_zoom_out", self.zoom.button_zoom_out),
        ] {
            if !(step.is_finite() && step > 0.0) {
                return Err(TwinviewError::Config(format!("{name} must be a positive number, got {step}")));
            }
        }
        if !(self.annotation.min_size.is_finite() && self.annotation.min_size >= 0.0) {
            return Err(TwinviewError::Config(format!(
                "annotation.min_size must be non-negative, got {}",
                self.annotation.min_size
            )));
        }
        if !(self.annotation.stroke_width.is_finite() && self.annotation.stroke_width > 0.0) {
            return Err(TwinviewError::Config(format!(
                "annotation.stroke_width must be positive, got {}",
                self.annotation.stroke_width
            )));
        }
        if self.annotation.label_scale == 0 {
            return Err(TwinviewError::Config("annotation.label_scale must be at least 1".into()));
        }
        if !(1..=100).contains(&self.export.jpeg_quality) {
            return Err(TwinviewError::Config(format!(
                "export.jpeg_quality must be 1-100, got {}",
                self.export.jpeg_quality
            )));
        }
        if self.export.needs_fix_dir.trim().is_empty() || self.export.approved_dir.trim().is_empty() {
            return Err(TwinviewError::Config("export folder names must not be empty".into()));
        }
        if self.export.needs_fix_dir == self.export.approved_dir {
            return Err(TwinviewError::Config("needs_fix_dir and approved_dir must differ".into()));
        }
        Ok(())
    }

    pub fn overlay_style(&self) -> OverlayStyle {
        OverlayStyle {
            stroke_width: self.annotation.stroke_width,
            color: self.annotation.color,
            label_scale: self.annotation.label_scale,
        }
    }

    pub fn viewport_settings(&self) -> ViewportSettings {
        ViewportSettings {
            limits: self.zoom.limits(),
            min_annotation_size: self.annotation.min_size,
            style: self.overlay_style(),
            quality: self.quality,
        }
    }
}
