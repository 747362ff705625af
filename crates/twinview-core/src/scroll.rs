//! Scroll-bar model derived from a viewport's transform.
//!
//! Content extent on an axis is `image_extent * scale`. The scrollable range
//! is whatever part of it does not fit in the visible area, and the scroll
//! position is `-pan` clamped into that range.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::Size;
use crate::transform::Transform;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScrollAxis {
    Horizontal,
    Vertical,
}

impl ScrollAxis {
    pub const ALL: [Self; 2] = [Self::Horizontal, Self::Vertical];
}

impl fmt::Display for ScrollAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Horizontal => write!(f, "horizontal"),
            Self::Vertical => write!(f, "vertical"),
        }
    }
}

/// Scroll position on both axes as a fraction of the scrollable range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrollFraction {
    pub horizontal: f64,
    pub vertical: f64,
}

impl ScrollFraction {
    pub fn get(&self, axis: ScrollAxis) -> f64 {
        match axis {
            ScrollAxis::Horizontal => self.horizontal,
            ScrollAxis::Vertical => self.vertical,
        }
    }
}

/// The scrolling context a viewport renders into: the size of its visible area.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollArea {
    pub visible: Size,
}

impl ScrollArea {
    pub fn new(visible: Size) -> Self {
        Self { visible }
    }

    fn visible_extent(&self, axis: ScrollAxis) -> f64 {
        match axis {
            ScrollAxis::Horizontal => self.visible.width,
            ScrollAxis::Vertical => self.visible.height,
        }
    }

    /// Maximum scroll value on `axis` (0 when the content fits).
    pub fn range(&self, axis: ScrollAxis, image: Size, transform: &Transform) -> f64 {
        let extent = match axis {
            ScrollAxis::Horizontal => image.width,
            ScrollAxis::Vertical => image.height,
        };
        (extent * transform.scale - self.visible_extent(axis)).max(0.0)
    }

    pub fn position(&self, axis: ScrollAxis, image: Size, transform: &Transform) -> f64 {
        let range = self.range(axis, image, transform);
        (-pan_component(transform, axis)).clamp(0.0, range)
    }

    pub fn fraction(&self, axis: ScrollAxis, image: Size, transform: &Transform) -> f64 {
        let range = self.range(axis, image, transform);
        if range > 0.0 {
            self.position(axis, image, transform) / range
        } else {
            0.0
        }
    }

    pub fn fractions(&self, image: Size, transform: &Transform) -> ScrollFraction {
        ScrollFraction {
            horizontal: self.fraction(ScrollAxis::Horizontal, image, transform),
            vertical: self.fraction(ScrollAxis::Vertical, image, transform),
        }
    }

    /// Move to an absolute scroll value, clamped into the range.
    /// Returns false when the axis has nothing to scroll.
    pub fn scroll_to(&self, axis: ScrollAxis, value: f64, image: Size, transform: &mut Transform) -> bool {
        let range = self.range(axis, image, transform);
        if range <= 0.0 || !value.is_finite() {
            return false;
        }
        set_pan_component(transform, axis, -value.clamp(0.0, range));
        true
    }

    /// Move to a fraction of the range. No-op when the axis has nothing to scroll.
    pub fn apply_fraction(&self, axis: ScrollAxis, fraction: f64, image: Size, transform: &mut Transform) -> bool {
        let range = self.range(axis, image, transform);
        if range <= 0.0 || !fraction.is_finite() {
            return false;
        }
        set_pan_component(transform, axis, -(fraction.clamp(0.0, 1.0) * range));
        true
    }
}

fn pan_component(transform: &Transform, axis: ScrollAxis) -> f64 {
    match axis {
        ScrollAxis::Horizontal => transform.pan.x,
        ScrollAxis::Vertical => transform.pan.y,
    }
}

fn set_pan_component(transform: &mut Transform, axis: ScrollAxis, value: f64) {
    match axis {
        ScrollAxis::Horizontal => transform.pan.x = value,
        ScrollAxis::Vertical => transform.pan.y = value,
    }
}
