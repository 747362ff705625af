use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// A 2D point or offset. Used for both screen space (viewport-local pixels)
/// and image space (base-image pixels); the owning API says which.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn from_pixels(width: u32, height: u32) -> Self {
        Self::new(width as f64, height as f64)
    }

    /// True when either side is zero, negative or not finite.
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite())
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Axis-aligned rectangle in image-space pixels.
/// Always normalized: `x1 <= x2` and `y1 <= y2`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageRect {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl ImageRect {
    /// Build a rectangle spanning two arbitrary corners.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x1: a.x.min(b.x),
            y1: a.y.min(b.y),
            x2: a.x.max(b.x),
            y2: a.y.max(b.y),
        }
    }

    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.x1, self.y1)
    }

    pub fn bottom_right(&self) -> Point {
        Point::new(self.x2, self.y2)
    }

    /// Both sides strictly larger than `threshold`.
    pub fn exceeds(&self, threshold: f64) -> bool {
        self.width() > threshold && self.height() > threshold
    }

    /// Grow (positive) or shrink (negative) every edge by `amount`.
    /// A shrink past the centre yields `None`.
    pub fn inflate(&self, amount: f64) -> Option<ImageRect> {
        let r = ImageRect {
            x1: self.x1 - amount,
            y1: self.y1 - amount,
            x2: self.x2 + amount,
            y2: self.y2 + amount,
        };
        (r.x1 < r.x2 && r.y1 < r.y2).then_some(r)
    }

    /// Area shared with another rectangle (0 if disjoint).
    pub fn overlap_area(&self, other: &ImageRect) -> f64 {
        let w = self.x2.min(other.x2) - self.x1.max(other.x1);
        let h = self.y2.min(other.y2) - self.y1.max(other.y1);
        if w <= 0.0 || h <= 0.0 {
            0.0
        } else {
            w * h
        }
    }

    /// Edges rounded to the nearest whole pixel.
    pub fn snapped(&self) -> ImageRect {
        ImageRect {
            x1: self.x1.round(),
            y1: self.y1.round(),
            x2: self.x2.round(),
            y2: self.y2.round(),
        }
    }
}
