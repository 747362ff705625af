use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage, RgbaImage};

use crate::consts::IMAGE_EXTENSIONS;
use crate::error::{Result, TwinviewError};

/// Lower-cased extension of `path`, if any.
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Whether `path` has one of the recognized raster extensions.
pub fn is_supported_image(path: &Path) -> bool {
    extension_of(path).is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

/// Decode any supported raster into 8-bit RGBA.
pub fn load_rgba(path: &Path) -> Result<RgbaImage> {
    let img = image::open(path).map_err(|e| TwinviewError::LoadFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(img.to_rgba8())
}

/// Pixel dimensions from the file header, without decoding the body.
pub fn read_dimensions(path: &Path) -> Result<(u32, u32)> {
    image::image_dimensions(path).map_err(|e| TwinviewError::LoadFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Save an RGBA raster, choosing the format from the file extension.
///
/// `jpeg_quality` (1..=100) only affects JPEG output. Formats without an
/// alpha channel in practice (JPEG, BMP) are flattened over white.
pub fn save_raster(img: &RgbaImage, path: &Path, jpeg_quality: u8) -> Result<()> {
    let ext = extension_of(path).unwrap_or_default();
    match ext.as_str() {
        "png" => img.save_with_format(path, ImageFormat::Png)?,
        "webp" => DynamicImage::ImageRgba8(img.clone()).save_with_format(path, ImageFormat::WebP)?,
        "bmp" => flatten_over_white(img).save_with_format(path, ImageFormat::Bmp)?,
        "jpg" | "jpeg" => {
            let rgb = flatten_over_white(img);
            let writer = BufWriter::new(File::create(path)?);
            let mut encoder = JpegEncoder::new_with_quality(writer, jpeg_quality.clamp(1, 100));
            encoder.encode_image(&rgb)?;
        }
        _ => return Err(TwinviewError::UnsupportedFormat(path.display().to_string())),
    }
    Ok(())
}

/// Composite over an opaque white background.
pub fn flatten_over_white(img: &RgbaImage) -> RgbImage {
    let mut out = RgbImage::new(img.width(), img.height());
    for (x, y, px) in img.enumerate_pixels() {
        let [r, g, b, a] = px.0;
        let a = a as u32;
        let mix = |c: u8| ((c as u32 * a + 255 * (255 - a) + 127) / 255) as u8;
        out.put_pixel(x, y, Rgb([mix(r), mix(g), mix(b)]));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_flatten_over_white() {
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(0, 0, Rgba([0, 0, 0, 0]));
        img.put_pixel(1, 0, Rgba([10, 20, 30, 255]));
        let flat = flatten_over_white(&img);
        assert_eq!(flat.get_pixel(0, 0).0, [255, 255, 255]);
        assert_eq!(flat.get_pixel(1, 0).0, [10, 20, 30]);
    }

    #[test]
    fn test_supported_extensions_case_insensitive() {
        assert!(is_supported_image(Path::new("a.PNG")));
        assert!(is_supported_image(Path::new("b.JpEg")));
        assert!(is_supported_image(Path::new("c.webp")));
        assert!(!is_supported_image(Path::new("d.tiff")));
        assert!(!is_supported_image(Path::new("noext")));
    }
}
