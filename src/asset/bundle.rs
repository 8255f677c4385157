//! Multi-file bundle validation.
//!
//! A bundle is an ordered list of source files sharing one type,
//! concatenated into a single asset. Validation is eager: it happens
//! before any content is read or any cache entry is written.

use crate::error::{AssetError, Result};
use crate::resolver::FileInfo;
use crate::utils::mime::{self, MediaClass};
use crate::utils::path::extension_of;

/// The public identity shared by a bundle's files.
#[derive(Debug, Clone)]
pub struct Bundle {
    pub filename: String,
    pub public_path: String,
    pub ext: String,
    pub media: MediaClass,
    pub subtype: String,
}

/// Bundle family used for type validation. Stylesheet extensions bundle
/// together and script extensions bundle together; anything else must
/// match by exact subtype, so `foo.css` + `bar.js` is a mismatch even
/// though both are text.
fn family(info: &FileInfo) -> &str {
    match info.ext.as_str() {
        "scss" | "sass" | "css" => "stylesheet",
        "js" | "mjs" | "cjs" => "script",
        _ => &info.subtype,
    }
}

/// Validate a resolved file list and derive the bundle identity.
pub fn validate(infos: &[FileInfo], filename: Option<&str>) -> Result<Bundle> {
    let first = &infos[0];
    for info in &infos[1..] {
        if family(info) != family(first) {
            return Err(AssetError::BundleTypeMismatch {
                path: info.public_path.clone(),
                found: info.subtype.clone(),
                expected: first.subtype.clone(),
            });
        }
    }

    // Explicit filename wins, for any bundle content.
    if let Some(name) = filename {
        let name = name.trim_start_matches('/');
        let ext = extension_of(name).unwrap_or_default();
        let (media, subtype) = mime::detect(&ext);
        return Ok(Bundle {
            filename: basename(name).to_string(),
            public_path: format!("/{name}"),
            ext,
            media,
            subtype: subtype.to_string(),
        });
    }

    // A single file keeps its own identity.
    if infos.len() == 1 {
        return Ok(Bundle {
            filename: basename(&first.public_path).to_string(),
            public_path: first.public_path.clone(),
            ext: first.ext.clone(),
            media: first.media,
            subtype: first.subtype.clone(),
        });
    }

    // Default bundle filenames by extension family.
    let name = match family(first) {
        "stylesheet" => "styles.css",
        "script" => "scripts.js",
        _ => return Err(AssetError::UnsupportedBundleExtension(first.ext.clone())),
    };
    let ext = extension_of(name).unwrap_or_default();
    let (media, subtype) = mime::detect(&ext);
    Ok(Bundle {
        filename: name.to_string(),
        public_path: format!("/{name}"),
        ext,
        media,
        subtype: subtype.to_string(),
    })
}

fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
