//! Build configuration snapshot for the asset pipeline.
//!
//! The embedding build tool loads this once per build and threads an
//! immutable reference through every pipeline call; transformation code
//! never reaches into ambient state.
//!
//! # Sections
//!
//! | Section          | Purpose                                         |
//! |------------------|-------------------------------------------------|
//! | top level        | `debug`, site `url`, ordered `themes` list      |
//! | `[paths]`        | output / assets / static / themes roots         |
//! | `[assets]`       | fingerprint, compile, minify, images, CDN       |
//! | `[cache]`        | cache directory layout                          |

mod assets;

pub use assets::{AssetsConfig, CdnConfig, CompileConfig, ImagesConfig, ResizeConfig, Toggle};

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::utils::path::normalize_path;

// ============================================================================
// Root configuration
// ============================================================================

/// Root configuration structure for the asset pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Project root directory (internal use only)
    #[serde(skip)]
    root: PathBuf,

    /// Build/config version token folded into every cache key.
    #[serde(skip)]
    pub version: String,

    /// Debug build flag (enables sourcemap handling).
    pub debug: bool,

    /// Site base URL, used to absolutize canonical CDN source URLs.
    pub url: Option<String>,

    /// Active themes in precedence order.
    pub themes: Vec<String>,

    /// Directory layout.
    pub paths: PathsConfig,

    /// Asset transformation settings.
    pub assets: AssetsConfig,

    /// Cache layout.
    pub cache: CacheConfig,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::new(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            debug: false,
            url: None,
            themes: Vec::new(),
            paths: PathsConfig::default(),
            assets: AssetsConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

impl BuildConfig {
    /// Parse a configuration snapshot from TOML text.
    ///
    /// Unknown keys are reported at debug level and ignored, so a full
    /// site configuration file can be handed over unchanged.
    pub fn from_toml(text: &str, root: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let de = toml::Deserializer::new(text);
        let mut config: Self = serde_ignored::deserialize(de, |path| {
            crate::debug!("config"; "unknown key `{path}` ignored");
        })?;
        config.root = normalize_path(root.as_ref());
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file; the parent directory becomes the root.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text =
            fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        let root = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_toml(&text, root)
    }

    /// Default configuration rooted at `root` (used by embedders that
    /// build the snapshot programmatically).
    pub fn with_root(root: impl AsRef<Path>) -> Self {
        let mut config = Self::default();
        config.root = normalize_path(root.as_ref());
        config
    }

    /// Validate the snapshot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.assets.validate()
    }

    // ========================================================================
    // Directory layout
    // ========================================================================

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root.join(&self.paths.output)
    }

    pub fn assets_dir(&self) -> PathBuf {
        self.root.join(&self.paths.assets)
    }

    pub fn static_dir(&self) -> PathBuf {
        self.root.join(&self.paths.static_dir)
    }

    pub fn theme_dir(&self, theme: &str) -> PathBuf {
        self.root.join(&self.paths.themes).join(theme)
    }

    /// Local search roots in resolution order: project assets, each
    /// theme's assets, project static, each theme's static.
    pub fn search_roots(&self) -> Vec<PathBuf> {
        let mut roots = Vec::with_capacity(2 * self.themes.len() + 2);
        roots.push(self.assets_dir());
        for theme in &self.themes {
            roots.push(self.theme_dir(theme).join(&self.paths.assets));
        }
        roots.push(self.static_dir());
        for theme in &self.themes {
            roots.push(self.theme_dir(theme).join(&self.paths.static_dir));
        }
        roots
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.root.join(&self.cache.dir)
    }

    /// Cache directory for asset records and content blobs.
    pub fn assets_cache_dir(&self) -> PathBuf {
        self.cache_dir().join(&self.cache.assets.dir)
    }

    /// Durable cache directory for fetched remote assets.
    pub fn remote_cache_dir(&self) -> PathBuf {
        self.assets_cache_dir().join("remote")
    }
}

// ============================================================================
// [paths]
// ============================================================================

/// Directory layout, all relative to the project root.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Output tree for published artifacts.
    pub output: PathBuf,
    /// Project assets directory.
    pub assets: PathBuf,
    /// Project static directory (takes precedence over generated files
    /// of the same name at publish time).
    #[serde(rename = "static")]
    pub static_dir: PathBuf,
    /// Themes root; each theme has its own `assets/` and `static/`.
    pub themes: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            output: "public".into(),
            assets: "assets".into(),
            static_dir: "static".into(),
            themes: "themes".into(),
        }
    }
}

// ============================================================================
// [cache]
// ============================================================================

/// Cache directory layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cache root (inside the project root).
    pub dir: PathBuf,
    /// Asset cache sub-section.
    pub assets: CacheAssetsConfig,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: ".sitka/cache".into(),
            assets: CacheAssetsConfig::default(),
        }
    }
}

/// `[cache.assets]` sub-section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheAssetsConfig {
    /// Sub-directory for asset cache entries.
    pub dir: PathBuf,
}

impl Default for CacheAssetsConfig {
    fn default() -> Self {
        Self {
            dir: "assets".into(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
