//! Source file resolution across a layered search path.
//!
//! A local reference probes, in order: the project assets directory, each
//! active theme's assets directory (configured precedence), the project
//! static directory, each theme's static directory. The first existing
//! file wins. Remote references go through the durable fetch cache in
//! [`remote`].

pub mod remote;

use std::path::PathBuf;

use crate::config::BuildConfig;
use crate::error::{AssetError, Result};
use crate::utils::mime::{self, MediaClass};
use crate::utils::path::extension_of;

/// Resolution options.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Tolerate a missing source: yield a marker instead of failing.
    pub ignore_missing: bool,
    /// Local path retried when a remote fetch fails.
    pub fallback: Option<String>,
}

/// A resolved source file.
#[derive(Debug, Clone)]
pub struct FileInfo {
    /// Absolute path of the concrete source (for remote: the cache file).
    pub path: PathBuf,
    /// Original URL (remote sources only).
    pub url: Option<String>,
    /// Public path derived from the reference.
    pub public_path: String,
    /// Lowercased extension.
    pub ext: String,
    /// Coarse media class.
    pub media: MediaClass,
    /// MIME subtype.
    pub subtype: String,
}

/// Resolution result: a concrete file or a tolerated missing marker.
#[derive(Debug, Clone)]
pub enum Resolved {
    Found(FileInfo),
    Missing { path: String },
}

/// Resolve a logical asset reference.
///
/// `NotFound`/`Empty` become a [`Resolved::Missing`] marker when
/// `ignore_missing` is set; every other error is fatal.
pub fn resolve(config: &BuildConfig, input: &str, options: &ResolveOptions) -> Result<Resolved> {
    match resolve_inner(config, input, options) {
        Err(AssetError::NotFound(_) | AssetError::Empty(_)) if options.ignore_missing => {
            crate::debug!("assets"; "tolerating missing asset {input}");
            Ok(Resolved::Missing {
                path: input.to_string(),
            })
        }
        other => other,
    }
}

fn resolve_inner(
    config: &BuildConfig,
    input: &str,
    options: &ResolveOptions,
) -> Result<Resolved> {
    if !remote::is_remote(input) {
        return resolve_local(config, input);
    }

    match remote::resolve(config, input) {
        Ok((path, filename)) => {
            let ext = extension_of(&filename).unwrap_or_default();
            let (media, subtype) = mime::detect(&ext);
            let public_path = format!(
                "/{}/{}",
                config.assets.target.trim_matches('/'),
                filename
            );
            Ok(Resolved::Found(FileInfo {
                path,
                url: Some(input.to_string()),
                public_path,
                ext,
                media,
                subtype: subtype.to_string(),
            }))
        }
        Err(err) => match &options.fallback {
            Some(fallback) => {
                crate::debug!("assets"; "remote fetch failed for {input}, retrying {fallback}");
                resolve_local(config, fallback)
            }
            None => Err(err),
        },
    }
}

fn resolve_local(config: &BuildConfig, input: &str) -> Result<Resolved> {
    let rel = input.trim_start_matches('/');
    for root in config.search_roots() {
        let candidate = root.join(rel);
        if candidate.is_file() {
            let ext = extension_of(input).unwrap_or_default();
            let (media, subtype) = mime::detect(&ext);
            return Ok(Resolved::Found(FileInfo {
                path: candidate,
                url: None,
                public_path: format!("/{rel}"),
                ext,
                media,
                subtype: subtype.to_string(),
            }));
        }
    }
    Err(AssetError::NotFound(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn site(themes: &[&str]) -> (TempDir, BuildConfig) {
        let dir = TempDir::new().unwrap();
        let toml = format!(
            "themes = [{}]",
            themes
                .iter()
                .map(|t| format!("\"{t}\""))
                .collect::<Vec<_>>()
                .join(", ")
        );
        let config = BuildConfig::from_toml(&toml, dir.path()).unwrap();
        (dir, config)
    }

    fn write(root: &std::path::Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_project_assets_beat_theme_assets() {
        let (dir, config) = site(&["alpha"]);
        write(dir.path(), "assets/css/style.css", "project");
        write(dir.path(), "themes/alpha/assets/css/style.css", "theme");

        let resolved = resolve(&config, "css/style.css", &ResolveOptions::default()).unwrap();
        let Resolved::Found(info) = resolved else {
            panic!("expected found")
        };
        assert_eq!(fs::read_to_string(&info.path).unwrap(), "project");
        assert_eq!(info.public_path, "/css/style.css");
        assert_eq!(info.media, MediaClass::Text);
        assert_eq!(info.subtype, "text/css");
    }

    #[test]
    fn test_theme_precedence_order() {
        let (dir, config) = site(&["alpha", "beta"]);
        write(dir.path(), "themes/alpha/assets/logo.png", "alpha");
        write(dir.path(), "themes/beta/assets/logo.png", "beta");

        let Resolved::Found(info) =
            resolve(&config, "logo.png", &ResolveOptions::default()).unwrap()
        else {
            panic!("expected found")
        };
        assert_eq!(fs::read_to_string(&info.path).unwrap(), "alpha");
    }

    #[test]
    fn test_static_dirs_searched_after_assets() {
        let (dir, config) = site(&["alpha"]);
        write(dir.path(), "static/robots.txt", "static");
        write(dir.path(), "themes/alpha/assets/robots.txt", "theme assets");

        let Resolved::Found(info) =
            resolve(&config, "robots.txt", &ResolveOptions::default()).unwrap()
        else {
            panic!("expected found")
        };
        assert_eq!(fs::read_to_string(&info.path).unwrap(), "theme assets");
    }

    #[test]
    fn test_theme_static_is_last_resort() {
        let (dir, config) = site(&["alpha"]);
        write(dir.path(), "themes/alpha/static/favicon.ico", "theme static");

        let Resolved::Found(info) =
            resolve(&config, "favicon.ico", &ResolveOptions::default()).unwrap()
        else {
            panic!("expected found")
        };
        assert_eq!(fs::read_to_string(&info.path).unwrap(), "theme static");
    }

    #[test]
    fn test_not_found_is_fatal_by_default() {
        let (_dir, config) = site(&[]);
        let result = resolve(&config, "missing.png", &ResolveOptions::default());
        assert!(matches!(result, Err(AssetError::NotFound(_))));
    }

    #[test]
    fn test_ignore_missing_yields_marker() {
        let (_dir, config) = site(&[]);
        let options = ResolveOptions {
            ignore_missing: true,
            ..Default::default()
        };
        let resolved = resolve(&config, "missing.png", &options).unwrap();
        let Resolved::Missing { path } = resolved else {
            panic!("expected missing marker")
        };
        assert_eq!(path, "missing.png");
    }

    #[test]
    fn test_remote_fallback_to_local() {
        let (dir, config) = site(&[]);
        write(dir.path(), "assets/fonts/inter.css", "local fallback");

        let options = ResolveOptions {
            ignore_missing: false,
            fallback: Some("fonts/inter.css".into()),
        };
        // Port 1 refuses connections immediately; the fallback absorbs it.
        let resolved = resolve(&config, "http://127.0.0.1:1/inter.css", &options).unwrap();
        let Resolved::Found(info) = resolved else {
            panic!("expected found")
        };
        assert!(info.url.is_none());
        assert_eq!(fs::read_to_string(&info.path).unwrap(), "local fallback");
    }

    #[test]
    fn test_remote_cached_resolution() {
        let (_dir, config) = site(&[]);
        let url = "https://example.invalid/img/photo.jpg";
        let parsed = url::Url::parse(url).unwrap();
        let cache_dir = config.remote_cache_dir();
        fs::create_dir_all(&cache_dir).unwrap();
        fs::write(cache_dir.join(remote::cache_filename(&parsed)), b"jpeg bytes").unwrap();

        let Resolved::Found(info) = resolve(&config, url, &ResolveOptions::default()).unwrap()
        else {
            panic!("expected found")
        };
        assert_eq!(info.url.as_deref(), Some(url));
        assert_eq!(info.ext, "jpg");
        assert!(info.public_path.starts_with("/assets/"));
        assert!(info.public_path.ends_with(".jpg"));
    }
}
