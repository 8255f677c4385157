//! Media type detection.
//!
//! Maps file extensions to a coarse [`MediaClass`] and a MIME subtype.
//! The class drives pipeline decisions (image operations, bundling rules);
//! the subtype is carried on the asset record for consumers that emit
//! `type` attributes or data URLs.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Coarse media classification of an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaClass {
    Image,
    Text,
    Audio,
    Video,
    Font,
    Other,
}

impl MediaClass {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Text => "text",
            Self::Audio => "audio",
            Self::Video => "video",
            Self::Font => "font",
            Self::Other => "other",
        }
    }

    #[inline]
    pub fn is_image(self) -> bool {
        matches!(self, Self::Image)
    }
}

impl fmt::Display for MediaClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Guess the MIME subtype from a file extension.
pub fn subtype_of(ext: &str) -> &'static str {
    match ext {
        // Stylesheets / scripts
        "css" => "text/css",
        "scss" | "sass" => "text/x-scss",
        "js" | "mjs" | "cjs" => "text/javascript",
        "json" => "application/json",
        "xml" => "application/xml",
        "html" | "htm" => "text/html",
        "txt" => "text/plain",
        "md" => "text/markdown",
        "yaml" | "yml" => "text/yaml",
        "toml" => "text/toml",
        "csv" => "text/csv",

        // Images
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "avif" => "image/avif",
        "ico" => "image/x-icon",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",

        // Audio
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" | "oga" => "audio/ogg",
        "flac" => "audio/flac",
        "aac" | "m4a" => "audio/aac",

        // Video
        "mp4" | "m4v" => "video/mp4",
        "webm" => "video/webm",
        "ogv" => "video/ogg",
        "avi" => "video/x-msvideo",
        "mov" => "video/quicktime",

        // Fonts
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "otf" => "font/otf",

        _ => "application/octet-stream",
    }
}

/// Coarse media class for a MIME subtype.
pub fn class_of(subtype: &str) -> MediaClass {
    match subtype.split('/').next() {
        Some("image") => MediaClass::Image,
        Some("text") => MediaClass::Text,
        Some("audio") => MediaClass::Audio,
        Some("video") => MediaClass::Video,
        Some("font") => MediaClass::Font,
        _ => match subtype {
            "application/json" | "application/xml" => MediaClass::Text,
            _ => MediaClass::Other,
        },
    }
}

/// Detect (class, subtype) from a file extension.
pub fn detect(ext: &str) -> (MediaClass, &'static str) {
    let subtype = subtype_of(ext);
    (class_of(subtype), subtype)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subtype_of() {
        assert_eq!(subtype_of("css"), "text/css");
        assert_eq!(subtype_of("scss"), "text/x-scss");
        assert_eq!(subtype_of("js"), "text/javascript");
        assert_eq!(subtype_of("png"), "image/png");
        assert_eq!(subtype_of("jpeg"), "image/jpeg");
        assert_eq!(subtype_of("svg"), "image/svg+xml");
        assert_eq!(subtype_of("xyz"), "application/octet-stream");
    }

    #[test]
    fn test_detect_classes() {
        assert_eq!(detect("png").0, MediaClass::Image);
        assert_eq!(detect("css").0, MediaClass::Text);
        assert_eq!(detect("scss").0, MediaClass::Text);
        assert_eq!(detect("mp3").0, MediaClass::Audio);
        assert_eq!(detect("mp4").0, MediaClass::Video);
        assert_eq!(detect("woff2").0, MediaClass::Font);
        assert_eq!(detect("bin").0, MediaClass::Other);
        assert_eq!(detect("json").0, MediaClass::Text);
    }

    #[test]
    fn test_display() {
        assert_eq!(MediaClass::Image.to_string(), "image");
        assert_eq!(MediaClass::Other.to_string(), "other");
    }
}
