//! Error taxonomy for the asset pipeline.
//!
//! Two families: [`ConfigError`] for invalid configuration values and
//! [`AssetError`] for everything that can go wrong while resolving,
//! transforming, or publishing an asset. Resolution failures are
//! recoverable when `ignore_missing` is set or a fallback path exists;
//! every other error is fatal to the asset.

use std::path::PathBuf;

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, AssetError>;

// ============================================================================
// ConfigError
// ============================================================================

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("config file parsing error")]
    Toml(#[from] toml::de::Error),

    #[error("invalid value `{value}` for `{field}` (expected one of: {expected})")]
    InvalidValue {
        field: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("config validation error: {0}")]
    Validation(String),
}

// ============================================================================
// AssetError
// ============================================================================

/// Errors produced while resolving, transforming, or publishing an asset.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Source not found and not tolerated. Also covers remote fetch
    /// failures (404, transport errors) once fallbacks are exhausted.
    #[error("asset not found: `{0}`")]
    NotFound(String),

    /// Remote content with length <= 1.
    #[error("remote asset is empty: `{0}`")]
    Empty(String),

    #[error("cannot create an asset from an empty file list")]
    EmptyBundle,

    #[error("bundle type mismatch: `{path}` is `{found}`, bundle is `{expected}`")]
    BundleTypeMismatch {
        path: String,
        found: String,
        expected: String,
    },

    #[error("unsupported bundle extension `.{0}`: provide an explicit filename")]
    UnsupportedBundleExtension(String),

    #[error("cannot {op} `{path}`: not an image")]
    NotAnImage { op: &'static str, path: String },

    #[error("cannot {op} `{path}`: source file is missing")]
    MissingSource { op: &'static str, path: String },

    #[error("cannot minify `{path}`: unsupported extension `.{ext}`")]
    UnsupportedMinifyExtension { path: String, ext: String },

    #[error("failed to read image dimensions of `{0}`")]
    ImageSize(String),

    #[error("no stylesheet compiler configured (required to compile `{0}`)")]
    CompilerUnavailable(String),

    #[error("failed to publish `{path}`")]
    Publish {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error on `{path}`")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cache serialization error")]
    CacheCodec(#[from] serde_json::Error),

    /// Failure inside an external capability backend (compiler, encoder,
    /// optimizer). The anyhow chain carries the backend detail; it is
    /// not exposed as `source()` because `anyhow::Error` is not itself a
    /// `std::error::Error`.
    #[error("{op} backend failed: {error}")]
    Backend {
        op: &'static str,
        error: anyhow::Error,
    },
}

impl AssetError {
    /// Helper to wrap an IO error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AssetError::NotFound("images/logo.png".into());
        assert!(format!("{err}").contains("images/logo.png"));

        let err = AssetError::BundleTypeMismatch {
            path: "bar.js".into(),
            found: "text".into(),
            expected: "image".into(),
        };
        assert!(format!("{err}").contains("bundle type mismatch"));

        let err = ConfigError::InvalidValue {
            field: "assets.compile.style",
            value: "tight".into(),
            expected: "expanded, compressed",
        };
        assert!(format!("{err}").contains("assets.compile.style"));
    }
}
