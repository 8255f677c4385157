//! Public path rewriting helpers.
//!
//! All transformations rewrite the public path through these helpers so
//! the extension segment is always located the same way (last dot of the
//! final path segment, dotfiles excluded).

/// Index of the extension dot in the final path segment.
fn ext_dot(path: &str) -> Option<usize> {
    let seg_start = path.rfind('/').map_or(0, |i| i + 1);
    let segment = &path[seg_start..];
    segment
        .rfind('.')
        .filter(|&i| i > 0)
        .map(|i| seg_start + i)
}

/// Apply or strip the leading slash.
pub fn with_leading_slash(path: &str, leading: bool) -> String {
    if leading {
        if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        }
    } else {
        path.trim_start_matches('/').to_string()
    }
}

/// Insert a content digest before the extension
/// (`styles.css` → `styles.<digest>.css`).
pub fn insert_fingerprint(path: &str, digest: &str) -> String {
    match ext_dot(path) {
        Some(dot) => format!("{}.{digest}{}", &path[..dot], &path[dot..]),
        None => format!("{path}.{digest}"),
    }
}

/// Insert a `.min` marker before the extension
/// (`styles.css` → `styles.min.css`).
pub fn insert_min(path: &str) -> String {
    match ext_dot(path) {
        Some(dot) => format!("{}.min{}", &path[..dot], &path[dot..]),
        None => format!("{path}.min"),
    }
}

/// Replace the extension (`style.scss` → `style.css`).
pub fn swap_extension(path: &str, ext: &str) -> String {
    match ext_dot(path) {
        Some(dot) => format!("{}.{ext}", &path[..dot]),
        None => format!("{path}.{ext}"),
    }
}

/// Rebase a public path under the resize target sub-path
/// (`/img/photo.jpg` → `/thumbnails/640/img/photo.jpg`).
pub fn resized(path: &str, dir: &str, width: u32) -> String {
    let dir = dir.trim_matches('/');
    if let Some(rest) = path.strip_prefix('/') {
        format!("/{dir}/{width}/{rest}")
    } else {
        format!("{dir}/{width}/{path}")
    }
}
