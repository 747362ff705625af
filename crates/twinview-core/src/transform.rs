use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::consts::{DEFAULT_MAX_SCALE, DEFAULT_MIN_SCALE, SCALE_EPSILON};
use crate::error::{Result, TwinviewError};
use crate::geometry::{Point, Size};

/// Inclusive bounds for a viewport's zoom scale.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZoomLimits {
    pub min: f64,
    pub max: f64,
}

impl ZoomLimits {
    pub fn new(min: f64, max: f64) -> Result<Self> {
        let limits = Self { min, max };
        limits.validate()?;
        Ok(limits)
    }

    /// Effectively unclamped zoom.
    pub fn unbounded() -> Self {
        Self {
            min: f64::MIN_POSITIVE,
            max: f64::MAX,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let ok = self.min.is_finite() && self.max.is_finite() && self.min > 0.0 && self.min <= self.max;
        if ok {
            Ok(())
        } else {
            Err(TwinviewError::InvalidZoomLimits {
                min: self.min,
                max: self.max,
            })
        }
    }

    pub fn clamp(&self, scale: f64) -> f64 {
        scale.clamp(self.min, self.max)
    }
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_SCALE,
            max: DEFAULT_MAX_SCALE,
        }
    }
}

/// Mapping from image space to viewport (screen) space:
/// `screen = image * scale + pan`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub scale: f64,
    pub pan: Point,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        pan: Point::ZERO,
    };

    pub fn screen_to_image(&self, p: Point) -> Point {
        Point::new((p.x - self.pan.x) / self.scale, (p.y - self.pan.y) / self.scale)
    }

    pub fn image_to_screen(&self, p: Point) -> Point {
        Point::new(p.x * self.scale + self.pan.x, p.y * self.scale + self.pan.y)
    }

    /// Multiply the scale by `factor`, keeping the image point under `anchor`
    /// (screen space) fixed. The resulting scale is clamped into `limits`;
    /// when clamping kicks in the factor is corrected so the scale lands
    /// exactly on the bound.
    ///
    /// Returns the factor that was actually applied. Non-finite or
    /// non-positive factors are ignored and report `1.0`.
    pub fn zoom(&mut self, factor: f64, anchor: Point, limits: &ZoomLimits) -> f64 {
        if !(factor.is_finite() && factor > 0.0) || !anchor.is_finite() {
            debug!(factor, "Ignoring invalid zoom request");
            return 1.0;
        }

        let target = limits.clamp(self.scale * factor);
        // Relative, so tiny scales still zoom.
        if (target / self.scale - 1.0).abs() < SCALE_EPSILON {
            return 1.0;
        }
        let applied = target / self.scale;

        let fixed = self.screen_to_image(anchor);
        self.scale = target;
        self.pan = Point::new(anchor.x - fixed.x * target, anchor.y - fixed.y * target);
        applied
    }

    pub fn pan_by(&mut self, delta: Point) {
        self.pan = self.pan + delta;
    }

    pub fn reset(&mut self) {
        *self = Self::IDENTITY;
    }

    /// Scale the image to fit inside the viewport, preserving aspect ratio,
    /// and center it. The fitted scale is clamped into `limits`.
    /// Degenerate sizes leave the transform untouched.
    pub fn fit_to_viewport(&mut self, viewport: Size, image: Size, limits: &ZoomLimits) {
        if viewport.is_empty() || image.is_empty() {
            return;
        }
        let fit = (viewport.width / image.width).min(viewport.height / image.height);
        let scale = limits.clamp(fit);
        self.scale = scale;
        self.pan = Point::new(
            (viewport.width - image.width * scale) / 2.0,
            (viewport.height - image.height * scale) / 2.0,
        );
    }
}
