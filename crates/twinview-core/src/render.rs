//! Flattening of a base image plus its annotations into a new raster.
//!
//! Composition always starts from a copy of the untouched base, so the
//! result depends only on `(base, annotations, style, quality)`.

use std::fmt;

use font8x8::{UnicodeFonts, BASIC_FONTS, HIRAGANA_FONTS, LATIN_FONTS};
use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::annotation::Annotation;
use crate::consts::{ALERT_COLOR, DEFAULT_LABEL_SCALE, DEFAULT_STROKE_WIDTH, GLYPH_SIZE, LABEL_GAP};
use crate::geometry::ImageRect;

/// Rendering quality. Affects interpolation and antialiasing only, never
/// the stored pixel data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum QualityMode {
    #[default]
    HighQuality,
    Sharp,
    Smooth,
}

impl QualityMode {
    pub const ALL: &[Self] = &[Self::HighQuality, Self::Sharp, Self::Smooth];

    /// Blend stroke edges by pixel coverage instead of snapping them.
    pub fn antialias(&self) -> bool {
        !matches!(self, Self::Sharp)
    }

    /// Use bilinear filtering when the image is scaled on screen.
    pub fn smooth_scaling(&self) -> bool {
        !matches!(self, Self::Sharp)
    }

    /// Build mipmaps for minified on-screen display.
    pub fn mipmaps(&self) -> bool {
        matches!(self, Self::HighQuality)
    }
}

impl fmt::Display for QualityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HighQuality => write!(f, "High Quality"),
            Self::Sharp => write!(f, "Sharp"),
            Self::Smooth => write!(f, "Smooth"),
        }
    }
}

/// Visual style of committed annotations.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OverlayStyle {
    /// Outline width in image pixels.
    pub stroke_width: f64,
    pub color: [u8; 4],
    /// Integer magnification of the 8x8 label glyphs.
    pub label_scale: u32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            stroke_width: DEFAULT_STROKE_WIDTH,
            color: ALERT_COLOR,
            label_scale: DEFAULT_LABEL_SCALE,
        }
    }
}

/// Compose `base` with every annotation, in order, into a new image.
pub fn compose(
    base: &RgbaImage,
    annotations: &[Annotation],
    style: &OverlayStyle,
    quality: QualityMode,
) -> RgbaImage {
    let mut out = base.clone();
    let color = Rgba(style.color);
    for annotation in annotations {
        draw_rect_stroke(&mut out, &annotation.rect, style.stroke_width, color, quality.antialias());
        let half = style.stroke_width / 2.0;
        let scale = style.label_scale.max(1);
        let x = (annotation.rect.x1 - half).round() as i64;
        let y = (annotation.rect.y1 - half).round() as i64 - LABEL_GAP - (GLYPH_SIZE * scale) as i64;
        draw_label(&mut out, x, y, &annotation.text, color, scale);
    }
    out
}

/// Outline `rect` with a stroke of `width` pixels centered on its edges.
///
/// Each pixel receives `color` weighted by the exact area of the pixel
/// square covered by the stroke band. Without antialiasing the band edges
/// are snapped to whole pixels first, so coverage is always 0 or 1.
pub fn draw_rect_stroke(img: &mut RgbaImage, rect: &ImageRect, width: f64, color: Rgba<u8>, antialias: bool) {
    if !(width > 0.0) || img.width() == 0 || img.height() == 0 {
        return;
    }
    let half = width / 2.0;
    let Some(mut outer) = rect.inflate(half) else {
        return;
    };
    let mut inner = rect.inflate(-half);
    if !antialias {
        outer = outer.snapped();
        inner = inner.map(|r| r.snapped());
    }

    let x0 = outer.x1.floor().max(0.0) as u32;
    let y0 = outer.y1.floor().max(0.0) as u32;
    let x1 = (outer.x2.ceil().max(0.0) as u32).min(img.width());
    let y1 = (outer.y2.ceil().max(0.0) as u32).min(img.height());

    for py in y0..y1 {
        for px in x0..x1 {
            let cell = ImageRect {
                x1: px as f64,
                y1: py as f64,
                x2: px as f64 + 1.0,
                y2: py as f64 + 1.0,
            };
            let hole = inner.map_or(0.0, |r| r.overlap_area(&cell));
            let coverage = (outer.overlap_area(&cell) - hole).clamp(0.0, 1.0);
            if coverage <= 0.0 {
                continue;
            }
            let mut src = color;
            src[3] = (f64::from(color[3]) * coverage).round() as u8;
            let dst = *img.get_pixel(px, py);
            img.put_pixel(px, py, blend_pixel(dst, src));
        }
    }
}

/// Draw `text` with 8x8 bitmap glyphs, top-left at `(x, y)`. Pixels outside
/// the image are clipped; characters missing from the font render as `?`.
pub fn draw_label(img: &mut RgbaImage, x: i64, y: i64, text: &str, color: Rgba<u8>, scale: u32) {
    let scale = i64::from(scale.max(1));
    let advance = i64::from(GLYPH_SIZE) * scale;
    let (w, h) = (i64::from(img.width()), i64::from(img.height()));
    let mut cursor_x = x;

    for ch in text.chars() {
        let Some(glyph) = glyph_for(ch) else {
            cursor_x += advance;
            continue;
        };
        for (row_idx, row_bits) in glyph.iter().enumerate() {
            for col_idx in 0..GLYPH_SIZE as i64 {
                if (row_bits >> col_idx) & 1 == 0 {
                    continue;
                }
                let px = cursor_x + col_idx * scale;
                let py = y + row_idx as i64 * scale;
                for sy in 0..scale {
                    for sx in 0..scale {
                        let (tx, ty) = (px + sx, py + sy);
                        if tx >= 0 && ty >= 0 && tx < w && ty < h {
                            let dst = *img.get_pixel(tx as u32, ty as u32);
                            img.put_pixel(tx as u32, ty as u32, blend_pixel(dst, color));
                        }
                    }
                }
            }
        }
        cursor_x += advance;
    }
}

fn glyph_for(ch: char) -> Option<[u8; 8]> {
    if ch.is_whitespace() {
        return BASIC_FONTS.get(' ');
    }
    BASIC_FONTS
        .get(ch)
        .or_else(|| LATIN_FONTS.get(ch))
        .or_else(|| HIRAGANA_FONTS.get(ch))
        .or_else(|| BASIC_FONTS.get('?'))
}

/// Source-over blend of `src` onto `dst`.
pub fn blend_pixel(dst: Rgba<u8>, src: Rgba<u8>) -> Rgba<u8> {
    let a = f64::from(src[3]) / 255.0;
    if a <= 0.0 {
        return dst;
    }
    let inv = 1.0 - a;
    let mix = |d: u8, s: u8| (f64::from(d) * inv + f64::from(s) * a).round().clamp(0.0, 255.0) as u8;
    let out_a = (f64::from(dst[3]) * inv + f64::from(src[3])).round().clamp(0.0, 255.0) as u8;
    Rgba([mix(dst[0], src[0]), mix(dst[1], src[1]), mix(dst[2], src[2]), out_a])
}
