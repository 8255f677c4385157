//! Explicit pipeline context.
//!
//! Bundles the immutable configuration snapshot, the cache store, and the
//! capability backends. Every transformation call receives a reference to
//! this context instead of reaching into ambient state.

use crate::backend::{ImageOptimizer, ReencodeOptimizer, StylesheetCompiler};
use crate::cache::{AssetCache, CacheKey};
use crate::config::BuildConfig;
use crate::error::Result;

/// Everything one asset pipeline needs: config + cache + backends.
pub struct BuildContext {
    /// Immutable configuration snapshot.
    pub config: BuildConfig,
    /// Content-addressed cache store.
    pub cache: AssetCache,
    /// Sass-family compiler, if the embedder provides one.
    pub compiler: Option<Box<dyn StylesheetCompiler>>,
    /// In-place image optimizer (built-in re-encoder by default).
    pub optimizer: Box<dyn ImageOptimizer>,
    /// Skip all writes into the output tree.
    pub dry_run: bool,
}

impl BuildContext {
    /// Create a context, opening the asset cache under the configured
    /// cache directory.
    pub fn new(config: BuildConfig) -> Result<Self> {
        let cache = AssetCache::open(config.assets_cache_dir())?;
        Ok(Self {
            config,
            cache,
            compiler: None,
            optimizer: Box::new(ReencodeOptimizer),
            dry_run: false,
        })
    }

    /// Plug in a stylesheet compiler backend.
    pub fn with_compiler(mut self, compiler: Box<dyn StylesheetCompiler>) -> Self {
        self.compiler = Some(compiler);
        self
    }

    /// Replace the image optimizer backend.
    pub fn with_optimizer(mut self, optimizer: Box<dyn ImageOptimizer>) -> Self {
        self.optimizer = optimizer;
        self
    }

    /// Toggle dry-run mode.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Cache key seeded with this build's version token.
    pub fn key(&self, identity: &str) -> CacheKey {
        CacheKey::new(identity, &self.config.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_opens_cache_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = BuildConfig::with_root(dir.path());
        let ctx = BuildContext::new(config).unwrap();
        assert!(ctx.cache.dir().is_dir());
        assert!(!ctx.dry_run);
        assert!(ctx.compiler.is_none());
    }
}
