//! Image dimension extraction.
//!
//! Raster dimensions come from the container header (no full decode);
//! SVG dimensions from the document's width/height/viewBox attributes.
//! A failed parse is a hard error: an asset classified as an image with
//! an unreadable header cannot produce valid geometry.

use std::io::Cursor;

use image::ImageReader;

use crate::error::{AssetError, Result};

/// Extract (width, height) from raster content.
pub fn raster_dimensions(content: &[u8], path: &str) -> Result<(u32, u32)> {
    ImageReader::new(Cursor::new(content))
        .with_guessed_format()
        .map_err(|_| AssetError::ImageSize(path.to_string()))?
        .into_dimensions()
        .map_err(|_| AssetError::ImageSize(path.to_string()))
}

/// Extract (width, height) from SVG content.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn svg_dimensions(content: &[u8], path: &str) -> Result<(u32, u32)> {
    let tree = usvg::Tree::from_data(content, &usvg::Options::default())
        .map_err(|_| AssetError::ImageSize(path.to_string()))?;
    let size = tree.size();
    Ok((size.width().round() as u32, size.height().round() as u32))
}

/// Extract dimensions, dispatching on the extension.
pub fn dimensions(content: &[u8], ext: &str, path: &str) -> Result<(u32, u32)> {
    if ext == "svg" {
        svg_dimensions(content, path)
    } else {
        raster_dimensions(content, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Smallest valid 1x1 PNG (generated once with the `image` encoder).
    pub(crate) fn tiny_png() -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(1, 1, image::Rgba([0, 0, 0, 255]));
        let mut out = Vec::new();
        img.write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
            .unwrap();
        out
    }

    #[test]
    fn test_raster_dimensions() {
        let png = tiny_png();
        assert_eq!(raster_dimensions(&png, "t.png").unwrap(), (1, 1));
    }

    #[test]
    fn test_raster_dimensions_garbage_is_hard_error() {
        let result = raster_dimensions(b"not an image", "t.png");
        assert!(matches!(result, Err(AssetError::ImageSize(_))));
    }

    #[test]
    fn test_svg_dimensions() {
        let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="16"></svg>"#;
        assert_eq!(svg_dimensions(svg, "icon.svg").unwrap(), (24, 16));
    }

    #[test]
    fn test_svg_dimensions_viewbox_only() {
        let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 48 32"></svg>"#;
        assert_eq!(svg_dimensions(svg, "icon.svg").unwrap(), (48, 32));
    }

    #[test]
    fn test_dimensions_dispatch() {
        let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" width="8" height="8"></svg>"#;
        assert_eq!(dimensions(svg, "svg", "icon.svg").unwrap(), (8, 8));
        assert_eq!(dimensions(&tiny_png(), "png", "t.png").unwrap(), (1, 1));
    }
}
