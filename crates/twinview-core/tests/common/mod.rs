#![allow(dead_code)]

use std::path::Path;

use image::{Rgba, RgbaImage};

use twinview_core::geometry::{Point, Size};
use twinview_core::pair::ViewportPair;
use twinview_core::scroll::ScrollArea;
use twinview_core::viewport::{SyncedViewport, ViewportSettings};

/// Opaque image with a horizontal gradient so pixels are distinguishable.
pub fn gradient_image(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x * 255 / width.max(1)) as u8, (y * 255 / height.max(1)) as u8, 128, 255])
    })
}

pub fn solid_image(width: u32, height: u32, color: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba(color))
}

/// Write a solid PNG of the given size.
pub fn write_png(path: &Path, width: u32, height: u32) {
    solid_image(width, height, [200, 200, 200, 255]).save(path).unwrap();
}

pub fn viewport(visible: (f64, f64)) -> SyncedViewport {
    SyncedViewport::new(ScrollArea::new(Size::new(visible.0, visible.1)), ViewportSettings::default())
}

pub fn loaded_viewport(width: u32, height: u32, visible: (f64, f64)) -> SyncedViewport {
    let mut vp = viewport(visible);
    vp.load_image(gradient_image(width, height));
    vp.take_events();
    vp
}

pub fn pair(visible: (f64, f64)) -> ViewportPair {
    let area = ScrollArea::new(Size::new(visible.0, visible.1));
    ViewportPair::new(area, area, ViewportSettings::default())
}

/// Draw a rectangle in screen space and commit it with `text`.
pub fn draw(vp: &mut SyncedViewport, from: (f64, f64), to: (f64, f64), text: &str) -> twinview_core::annotation::CommitOutcome {
    assert!(vp.begin_annotation(Point::new(from.0, from.1)));
    vp.update_annotation(Point::new(to.0, to.1));
    let text = text.to_string();
    let mut prompt = move |_: &twinview_core::geometry::ImageRect| Some(text.clone());
    vp.commit_annotation(Point::new(to.0, to.1), &mut prompt)
}
