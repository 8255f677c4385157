//! EXIF metadata extraction for JPEG sources.

use std::io::{BufReader, Cursor};

use serde::{Deserialize, Serialize};

/// Flattened EXIF fields (tag name, display value), sorted by tag name
/// for a deterministic serialized form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExifData {
    pub fields: Vec<(String, String)>,
}

impl ExifData {
    /// Look up a field by tag name (e.g. `"DateTime"`).
    pub fn get(&self, tag: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == tag)
            .map(|(_, value)| value.as_str())
    }
}

/// Extract EXIF metadata from JPEG bytes.
///
/// Absent or corrupt EXIF yields `None`; only primary-image fields are
/// kept (thumbnail IFD entries are dropped).
pub fn extract(content: &[u8]) -> Option<ExifData> {
    let mut reader = BufReader::new(Cursor::new(content));
    let parsed = exif::Reader::new().read_from_container(&mut reader).ok()?;

    let mut fields: Vec<(String, String)> = parsed
        .fields()
        .filter(|f| f.ifd_num == exif::In::PRIMARY)
        .map(|f| {
            (
                f.tag.to_string(),
                f.display_value().with_unit(&parsed).to_string(),
            )
        })
        .collect();
    if fields.is_empty() {
        return None;
    }
    fields.sort();
    Some(ExifData { fields })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_none_for_non_jpeg() {
        assert!(extract(b"plain bytes").is_none());
    }

    #[test]
    fn test_extract_none_for_jpeg_without_exif() {
        // JPEG produced by the `image` encoder carries no EXIF segment.
        let img = image::RgbImage::from_pixel(2, 2, image::Rgb([10, 20, 30]));
        let mut out = Vec::new();
        img.write_to(&mut Cursor::new(&mut out), image::ImageFormat::Jpeg)
            .unwrap();
        assert!(extract(&out).is_none());
    }

    #[test]
    fn test_get() {
        let data = ExifData {
            fields: vec![("DateTime".into(), "2024-06-01 12:00:00".into())],
        };
        assert_eq!(data.get("DateTime"), Some("2024-06-01 12:00:00"));
        assert_eq!(data.get("Model"), None);
    }
}
