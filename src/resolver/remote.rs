//! Remote asset fetching with a durable local cache.
//!
//! Every remote URL maps to one deterministic cache filename (slugified
//! host + path + query, original extension preserved). A cached entry is
//! never expired within a build: resolving the same URL twice performs a
//! single network fetch.

use std::fs;
use std::path::PathBuf;

use url::Url;

use crate::config::BuildConfig;
use crate::error::{AssetError, Result};
use crate::utils::path::extension_of;

/// Whether an asset reference is a remote URL.
pub fn is_remote(path: &str) -> bool {
    path.starts_with("http://") || path.starts_with("https://")
}

/// Deterministic cache filename for a remote URL.
pub fn cache_filename(url: &Url) -> String {
    let host = url.host_str().unwrap_or("remote");
    let mut base = format!("{host}{}", url.path());
    if let Some(query) = url.query() {
        base.push('-');
        base.push_str(query);
    }
    let slug = slugify(&base);
    match extension_of(url.path()) {
        Some(ext) => format!("{slug}.{ext}"),
        None => slug,
    }
}

/// ASCII slug: transliterate, lowercase, collapse everything else to `-`.
fn slugify(input: &str) -> String {
    let ascii = deunicode::deunicode(input);
    let mut slug = String::with_capacity(ascii.len());
    let mut prev_dash = true;
    for c in ascii.chars() {
        let c = c.to_ascii_lowercase();
        if c.is_ascii_alphanumeric() {
            slug.push(c);
            prev_dash = false;
        } else if !prev_dash {
            slug.push('-');
            prev_dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Resolve a remote URL to its local cache path, fetching on first use.
///
/// Returns the cache path and filename. Fetch failures surface as
/// `NotFound`; fetched content of length <= 1 as `Empty`.
pub fn resolve(config: &BuildConfig, raw: &str) -> Result<(PathBuf, String)> {
    let url = Url::parse(raw).map_err(|_| AssetError::NotFound(raw.to_string()))?;
    let filename = cache_filename(&url);
    let dir = config.remote_cache_dir();
    let path = dir.join(&filename);

    if path.is_file() {
        crate::debug!("assets"; "remote cache hit for {raw}");
        return Ok((path, filename));
    }

    let bytes = fetch(raw)?;
    if bytes.len() <= 1 {
        return Err(AssetError::Empty(raw.to_string()));
    }

    fs::create_dir_all(&dir).map_err(|e| AssetError::io(&dir, e))?;
    let tmp = dir.join(format!("{filename}.{}.tmp", std::process::id()));
    fs::write(&tmp, &bytes).map_err(|e| AssetError::io(&tmp, e))?;
    fs::rename(&tmp, &path).map_err(|e| AssetError::io(&path, e))?;
    crate::debug!("assets"; "fetched {raw} ({} bytes)", bytes.len());

    Ok((path, filename))
}

/// Fetch remote bytes. Any transport or status failure maps to `NotFound`
/// so a fallback path or `ignore_missing` can absorb it.
fn fetch(url: &str) -> Result<Vec<u8>> {
    let mut response = ureq::get(url)
        .call()
        .map_err(|_| AssetError::NotFound(url.to_string()))?;
    response
        .body_mut()
        .read_to_vec()
        .map_err(|_| AssetError::NotFound(url.to_string()))
}
