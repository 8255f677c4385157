//! `[assets]` section configuration.
//!
//! Controls the transformation chain: fingerprinting, Sass compilation,
//! minification, and image handling (quality, optimization, resize target
//! directory, CDN redirection).
//!
//! # Example
//!
//! ```toml
//! [assets]
//! target = "assets"
//!
//! [assets.fingerprint]
//! enabled = true
//!
//! [assets.compile]
//! enabled = true
//! style = "expanded"
//! import = ["sass", "scss"]
//!
//! [assets.images.cdn]
//! enabled = true
//! account = "my-site"
//! ```

use rustc_hash::FxHashMap;

use serde::{Deserialize, Serialize};

use crate::backend::OutputStyle;
use crate::error::ConfigError;

// ============================================================================
// Main Section
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Public prefix under which remote-sourced assets are exposed
    /// (`/{target}/{cache-filename}`).
    pub target: String,

    /// Content-hash fingerprinting of public paths.
    pub fingerprint: Toggle,

    /// CSS/JS minification.
    pub minify: Toggle,

    /// Sass compilation.
    pub compile: CompileConfig,

    /// Image handling.
    pub images: ImagesConfig,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            target: "assets".into(),
            fingerprint: Toggle::on(),
            minify: Toggle::on(),
            compile: CompileConfig::default(),
            images: ImagesConfig::default(),
        }
    }
}

impl AssetsConfig {
    /// Validate the section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.compile.output_style()?;
        self.images.validate()?;
        Ok(())
    }
}

// ============================================================================
// Toggle
// ============================================================================

/// A single on/off switch (`{ enabled = true }`).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Toggle {
    pub enabled: bool,
}

impl Toggle {
    pub const fn on() -> Self {
        Self { enabled: true }
    }

    pub const fn off() -> Self {
        Self { enabled: false }
    }
}

// ============================================================================
// Compile
// ============================================================================

/// Sass compilation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileConfig {
    /// Enable Sass compilation in the default processing chain.
    pub enabled: bool,
    /// Output style: `"expanded"` or `"compressed"`.
    ///
    /// Kept as a string so an invalid value surfaces as a `ConfigError`
    /// at compile time, not as a parse failure of the whole file.
    pub style: String,
    /// Additional import sub-directories, resolved against every asset
    /// and static root (project and themes).
    pub import: Vec<String>,
    /// Emit inline source maps in debug builds.
    pub sourcemap: bool,
    /// Variables injected into every compilation.
    pub variables: FxHashMap<String, String>,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            style: "expanded".into(),
            import: vec!["sass".into(), "scss".into()],
            sourcemap: false,
            variables: FxHashMap::default(),
        }
    }
}

impl CompileConfig {
    /// Parse the configured output style.
    ///
    /// # Errors
    ///
    /// `ConfigError::InvalidValue` if the style is not one of the
    /// enumerated values.
    pub fn output_style(&self) -> Result<OutputStyle, ConfigError> {
        OutputStyle::from_name(&self.style).ok_or_else(|| ConfigError::InvalidValue {
            field: "assets.compile.style",
            value: self.style.clone(),
            expected: "expanded, compressed",
        })
    }
}

// ============================================================================
// Images
// ============================================================================

/// Image handling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImagesConfig {
    /// Default encoding quality for lossy formats (0-100).
    pub quality: u8,
    /// Optimize raster images after publishing.
    pub optimize: Toggle,
    /// Resize output location.
    pub resize: ResizeConfig,
    /// CDN redirection.
    pub cdn: CdnConfig,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            quality: 75,
            optimize: Toggle::off(),
            resize: ResizeConfig::default(),
            cdn: CdnConfig::default(),
        }
    }
}

impl ImagesConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.quality > 100 {
            return Err(ConfigError::InvalidValue {
                field: "assets.images.quality",
                value: self.quality.to_string(),
                expected: "0-100",
            });
        }
        self.cdn.validate()
    }
}

/// Resize output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResizeConfig {
    /// Public sub-directory for resized images (`/{dir}/{width}{path}`).
    pub dir: String,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            dir: "thumbnails".into(),
        }
    }
}

// ============================================================================
// CDN
// ============================================================================

/// CDN redirection settings for images.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CdnConfig {
    /// Redirect eligible images to the CDN instead of publishing locally.
    pub enabled: bool,
    /// Whether SVG images are eligible.
    pub svg: bool,
    /// Whether remote-sourced images are eligible.
    pub remote: bool,
    /// Account identifier substituted for `%account%`.
    pub account: String,
    /// URL template. Placeholders: `%account%`, `%image_url%`, `%width%`,
    /// `%quality%`, `%format%`.
    pub url: String,
    /// Absolutize the source image URL against the site base URL.
    pub canonical: bool,
}

impl Default for CdnConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            svg: false,
            remote: true,
            account: String::new(),
            url: "https://res.cloudinary.com/%account%/image/fetch/c_limit,w_%width%,q_%quality%,f_%format%/%image_url%".into(),
            canonical: true,
        }
    }
}

impl CdnConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled && !self.url.contains("%image_url%") {
            return Err(ConfigError::Validation(format!(
                "assets.images.cdn.url must contain the `%image_url%` placeholder, got `{}`",
                self.url
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
