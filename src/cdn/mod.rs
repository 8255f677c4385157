//! CDN redirection for images.
//!
//! When enabled, eligible images skip local transformation and
//! publishing entirely: resize and format conversion become
//! metadata-only clones, and stringification returns a templated remote
//! URL instead of writing a file.

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

use crate::asset::Asset;
use crate::config::BuildConfig;

/// Characters escaped inside the `%image_url%` substitution. Fetch-style
/// CDNs take the source URL as a path segment, so query/fragment
/// delimiters and `%` itself must not pass through raw.
const SOURCE_URL: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'%')
    .add(b'?')
    .add(b'#');

/// Whether an asset is served through the CDN instead of locally.
///
/// Only images qualify, only when CDN mode is enabled; SVG and
/// remote-sourced images each sit behind their own flag.
pub fn is_eligible(asset: &Asset, config: &BuildConfig) -> bool {
    let cdn = &config.assets.images.cdn;
    cdn.enabled
        && !asset.missing
        && asset.media.is_image()
        && (asset.ext != "svg" || cdn.svg)
        && (asset.url.is_none() || cdn.remote)
}

/// Build the CDN URL by placeholder substitution against the configured
/// template (`%account%`, `%image_url%`, `%width%`, `%quality%`,
/// `%format%`).
pub fn build_url(asset: &Asset, config: &BuildConfig) -> String {
    let cdn = &config.assets.images.cdn;

    let source = match &asset.url {
        Some(url) => url.clone(),
        None if cdn.canonical => match &config.url {
            Some(base) => format!("{}{}", base.trim_end_matches('/'), asset.path),
            None => asset.path.clone(),
        },
        None => asset.path.clone(),
    };
    let encoded = utf8_percent_encode(&source, SOURCE_URL).to_string();

    cdn.url
        .replace("%account%", &cdn.account)
        .replace("%image_url%", &encoded)
        .replace("%width%", &asset.width.unwrap_or(0).to_string())
        .replace("%quality%", &config.assets.images.quality.to_string())
        .replace("%format%", &asset.ext)
}
