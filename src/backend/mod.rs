//! Capability interfaces for external transformation algorithms.
//!
//! The pipeline orchestrates but never reimplements a Sass compiler or an
//! image optimizer; embedders plug their backends in through these traits
//! when building a [`crate::BuildContext`]. Backends report failures
//! through `anyhow` and the orchestrator wraps them into the typed
//! [`crate::AssetError`] taxonomy.

use std::fs;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;

// ============================================================================
// Stylesheet compilation
// ============================================================================

/// Sass output style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStyle {
    Expanded,
    Compressed,
}

impl OutputStyle {
    /// Parse an enumerated style name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "expanded" => Some(Self::Expanded),
            "compressed" => Some(Self::Compressed),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Expanded => "expanded",
            Self::Compressed => "compressed",
        }
    }
}

/// Options handed to the stylesheet compiler for one compilation.
#[derive(Debug)]
pub struct CompileOptions<'a> {
    /// Import search directories, in priority order.
    pub import_dirs: &'a [PathBuf],
    /// Output style.
    pub style: OutputStyle,
    /// Variables injected into the compilation.
    pub variables: &'a FxHashMap<String, String>,
    /// Emit an inline source map.
    pub sourcemap: bool,
}

/// A Sass-family compiler.
pub trait StylesheetCompiler: Send + Sync {
    /// Compile `source` to CSS text.
    fn compile(&self, source: &str, options: &CompileOptions<'_>) -> anyhow::Result<String>;
}

// ============================================================================
// Image optimization
// ============================================================================

/// In-place optimizer for an image file already written to disk.
pub trait ImageOptimizer: Send + Sync {
    /// Optimize the file at `path` in place. Implementations must leave
    /// the file untouched when they cannot improve it.
    fn optimize(&self, path: &Path, quality: u8) -> anyhow::Result<()>;
}

/// Built-in optimizer that re-encodes through the `image` codecs and
/// keeps the result only when it is smaller than the original.
#[derive(Debug, Default)]
pub struct ReencodeOptimizer;

impl ImageOptimizer for ReencodeOptimizer {
    fn optimize(&self, path: &Path, quality: u8) -> anyhow::Result<()> {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return Ok(());
        };
        let ext = ext.to_ascii_lowercase();
        let original = fs::read(path)?;
        let Ok(encoded) = crate::image::reencode(&original, &ext, quality) else {
            // Unsupported or undecodable format: leave the file as-is.
            return Ok(());
        };
        if encoded.len() < original.len() {
            fs::write(path, encoded)?;
        }
        Ok(())
    }
}
