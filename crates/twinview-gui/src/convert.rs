use twinview_core::geometry::Point;
use twinview_core::render::QualityMode;
use twinview_core::viewport::SyncedViewport;

/// The viewport's composed raster as an egui ColorImage.
pub fn composed_color_image(viewport: &SyncedViewport) -> Option<egui::ColorImage> {
    viewport.composed().map(|img| {
        let size = [img.width() as usize, img.height() as usize];
        egui::ColorImage::from_rgba_unmultiplied(size, img.as_raw())
    })
}

/// On-screen texture filtering for a quality mode.
pub fn texture_options(mode: QualityMode) -> egui::TextureOptions {
    let filter = if mode.smooth_scaling() {
        egui::TextureFilter::Linear
    } else {
        egui::TextureFilter::Nearest
    };
    egui::TextureOptions {
        magnification: filter,
        minification: filter,
        mipmap_mode: mode.mipmaps().then_some(egui::TextureFilter::Linear),
        ..Default::default()
    }
}

/// Screen position relative to `origin` as a viewport-local point.
pub fn to_local(pos: egui::Pos2, origin: egui::Pos2) -> Point {
    Point::new(f64::from(pos.x - origin.x), f64::from(pos.y - origin.y))
}

/// Viewport-local point back to an absolute screen position.
pub fn to_screen(p: Point, origin: egui::Pos2) -> egui::Pos2 {
    egui::pos2(origin.x + p.x as f32, origin.y + p.y as f32)
}
