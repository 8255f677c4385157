//! Image metadata and re-encoding.
//!
//! # Modules
//!
//! - [`size`]: dimension extraction (raster header parse, SVG attribute parse)
//! - [`exif`]: EXIF metadata extraction for JPEG sources
//! - [`encode`]: resize, format conversion, and re-encoding via the `image` codecs

pub mod encode;
pub mod exif;
pub mod size;

pub use encode::{convert, reencode, resize_to_width};
pub use exif::ExifData;
pub use size::dimensions;

/// Raster formats the pipeline can convert to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetFormat {
    WebP,
    Jpeg,
    Png,
}

impl TargetFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::WebP => "webp",
            Self::Jpeg => "jpg",
            Self::Png => "png",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "webp" => Some(Self::WebP),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_format_roundtrip() {
        assert_eq!(TargetFormat::from_extension("webp"), Some(TargetFormat::WebP));
        assert_eq!(TargetFormat::from_extension("jpeg"), Some(TargetFormat::Jpeg));
        assert_eq!(TargetFormat::WebP.extension(), "webp");
        assert_eq!(TargetFormat::from_extension("tiff"), None);
    }
}
