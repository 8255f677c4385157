//! The asset record and its transformation chain.
//!
//! [`Asset::new`] resolves one or more declared sources into a single
//! record; the chain methods then rewrite (path, content, ext, size)
//! together, each guarded by a one-way latch flag and a cache key scoped
//! to the operation's tag. `fingerprint`/`compile`/`minify` consume and
//! return the record (in-place semantics); `resize`/`to_format` derive a
//! clone so callers can keep both the base image and its variants.
//!
//! # Modules
//!
//! - [`bundle`]: multi-file bundle validation
//! - [`route`]: public path rewriting helpers
//! - `fingerprint` / `compile` / `minify`: in-place latched transformations
//! - `images`: resize, format conversion, post-publish optimization

mod bundle;
mod compile;
mod fingerprint;
mod images;
mod minify;
pub(crate) mod route;
#[cfg(test)]
pub(crate) mod testutil;

pub use minify::{minify_css, minify_js};

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::cache::CacheKey;
use crate::cdn;
use crate::context::BuildContext;
use crate::error::{AssetError, Result};
use crate::image::ExifData;
use crate::publish;
use crate::resolver::{self, Resolved, ResolveOptions};
use crate::utils::hash;
use crate::utils::mime::{self, MediaClass};
use crate::utils::path::extension_of;

// ============================================================================
// Options
// ============================================================================

/// Construction options for [`Asset::new`].
#[derive(Debug, Clone)]
pub struct AssetOptions {
    /// Explicit public filename. Required for multi-file bundles whose
    /// common extension has no default name.
    pub filename: Option<String>,
    /// Tolerate missing sources: produce a degraded record instead of
    /// failing the build.
    pub ignore_missing: bool,
    /// Local path retried when a remote fetch fails.
    pub fallback: Option<String>,
    /// Prefix the public path with `/` (on by default).
    pub leading_slash: bool,
}

impl Default for AssetOptions {
    fn default() -> Self {
        Self {
            filename: None,
            ignore_missing: false,
            fallback: None,
            leading_slash: true,
        }
    }
}

// ============================================================================
// Record
// ============================================================================

/// A logical asset: one or more source files resolving to one published
/// artifact.
///
/// Invariants:
/// - `content_source` never changes after construction.
/// - `content`, `path`, `ext`, and `size` change together per
///   transformation.
/// - Latch flags (`fingerprinted`, `compiled`, `minified`) transition
///   `unset → set` once; re-invoking a latched operation is a no-op.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    /// All resolved source file paths, in bundle order.
    pub files: Vec<PathBuf>,
    /// Primary source file.
    pub file: PathBuf,
    /// Public filename.
    pub filename: String,
    /// Public path before any transformation.
    pub path_source: String,
    /// Current public path.
    pub path: String,
    /// Source URL (remote assets only).
    pub url: Option<String>,
    /// Current content bytes (stored as the cache entry's blob).
    #[serde(skip)]
    pub content: Vec<u8>,
    /// Raw concatenated source bytes, immutable after construction.
    #[serde(skip)]
    content_source: Vec<u8>,
    /// Current extension.
    pub ext: String,
    /// Coarse media class.
    pub media: MediaClass,
    /// MIME subtype.
    pub subtype: String,
    /// Current content size in bytes.
    pub size: u64,
    /// Image width (images only; replaced by resize).
    pub width: Option<u32>,
    /// Image height (images only; replaced by resize).
    pub height: Option<u32>,
    /// EXIF metadata (JPEG only).
    pub exif: Option<ExifData>,
    /// Source was absent but tolerated.
    pub missing: bool,
    /// Latch: public path carries a content fingerprint.
    pub fingerprinted: bool,
    /// Latch: Sass source was compiled to CSS.
    pub compiled: bool,
    /// Latch: content was minified.
    pub minified: bool,
    /// Applied transformation tags, in order (cache key input).
    pub tags: Vec<String>,
}

/// Raster extensions with an enabled decoder; dimension extraction is
/// attempted only for these (plus SVG).
const DECODABLE: [&str; 5] = ["png", "jpg", "jpeg", "webp", "svg"];

impl Asset {
    /// Resolve and bundle the declared sources into a new record.
    ///
    /// The resolved record is cached under the declared identity; a
    /// second construction with identical inputs reads the cache and
    /// touches neither the filesystem sources nor the network. Missing
    /// markers are never cached.
    pub fn new(ctx: &BuildContext, paths: &[&str], options: &AssetOptions) -> Result<Self> {
        if paths.is_empty() {
            return Err(AssetError::EmptyBundle);
        }

        let identity = declared_identity(paths, options);
        let key = ctx.key(&identity).tag("resolved");
        if let Some((meta, content)) = ctx.cache.get::<Self>(&key)? {
            crate::debug!("cache"; "asset hit for {identity}");
            return Ok(Self::from_cached(meta, content));
        }

        let resolve_options = ResolveOptions {
            ignore_missing: options.ignore_missing,
            fallback: options.fallback.clone(),
        };
        let mut infos = Vec::with_capacity(paths.len());
        for path in paths {
            match resolver::resolve(&ctx.config, path, &resolve_options)? {
                Resolved::Found(info) => infos.push(info),
                Resolved::Missing { path } => return Ok(Self::missing(path)),
            }
        }

        let bundle = bundle::validate(&infos, options.filename.as_deref())?;

        // Concatenate raw bytes in declaration order.
        let mut content_source = Vec::new();
        for info in &infos {
            let bytes = fs::read(&info.path).map_err(|e| AssetError::io(&info.path, e))?;
            content_source.extend_from_slice(&bytes);
        }

        let path_source = route::with_leading_slash(&bundle.public_path, options.leading_slash);

        let (mut width, mut height, mut exif) = (None, None, None);
        if bundle.media.is_image() && !content_source.is_empty() {
            if DECODABLE.contains(&bundle.ext.as_str()) {
                let (w, h) =
                    crate::image::dimensions(&content_source, &bundle.ext, &path_source)?;
                width = Some(w);
                height = Some(h);
            }
            if bundle.subtype == "image/jpeg" {
                exif = crate::image::exif::extract(&content_source);
            }
        }

        let size = content_source.len() as u64;
        let asset = Self {
            files: infos.iter().map(|i| i.path.clone()).collect(),
            file: infos[0].path.clone(),
            filename: bundle.filename,
            path: path_source.clone(),
            path_source,
            url: infos[0].url.clone(),
            content: content_source.clone(),
            content_source,
            ext: bundle.ext,
            media: bundle.media,
            subtype: bundle.subtype,
            size,
            width,
            height,
            exif,
            missing: false,
            fingerprinted: false,
            compiled: false,
            minified: false,
            tags: Vec::new(),
        };

        ctx.cache.set(&key, &asset, &asset.content)?;
        Ok(asset)
    }

    /// Degraded record for a tolerated missing source. The public path is
    /// the original reference, verbatim.
    fn missing(path: String) -> Self {
        let ext = extension_of(&path).unwrap_or_default();
        let (media, subtype) = mime::detect(&ext);
        Self {
            files: Vec::new(),
            file: PathBuf::new(),
            filename: path.rsplit('/').next().unwrap_or(&path).to_string(),
            path_source: path.clone(),
            path,
            url: None,
            content: Vec::new(),
            content_source: Vec::new(),
            ext,
            media,
            subtype: subtype.to_string(),
            size: 0,
            width: None,
            height: None,
            exif: None,
            missing: true,
            fingerprinted: false,
            compiled: false,
            minified: false,
            tags: Vec::new(),
        }
    }

    /// Rebuild a record from a construction-time cache entry, where the
    /// blob is the untransformed source content.
    fn from_cached(meta: Self, content: Vec<u8>) -> Self {
        Self {
            content_source: content.clone(),
            content,
            ..meta
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Raw concatenated source bytes (immutable after construction).
    pub fn content_source(&self) -> &[u8] {
        &self.content_source
    }

    /// Identity string for cache keys: joined resolved paths, or the
    /// filename for degraded records.
    pub(crate) fn identity(&self) -> String {
        if self.files.is_empty() {
            self.filename.clone()
        } else {
            self.files
                .iter()
                .map(|p| p.to_string_lossy())
                .collect::<Vec<_>>()
                .join(",")
        }
    }

    /// Cache key covering the identity, version token, and the ordered
    /// transformation tags applied so far.
    pub(crate) fn cache_key(&self, ctx: &BuildContext) -> CacheKey {
        ctx.key(&self.identity()).tags(self.tags.iter().cloned())
    }

    /// Persist the current record state under `key`.
    pub(crate) fn store(&self, ctx: &BuildContext, key: &CacheKey) -> Result<()> {
        ctx.cache.set(key, self, &self.content)
    }

    /// Replace the transform-mutable fields from a cache entry.
    pub(crate) fn adopt(&mut self, meta: Self, content: Vec<u8>) {
        self.path = meta.path;
        self.filename = meta.filename;
        self.ext = meta.ext;
        self.media = meta.media;
        self.subtype = meta.subtype;
        self.size = meta.size;
        self.width = meta.width;
        self.height = meta.height;
        self.fingerprinted = meta.fingerprinted;
        self.compiled = meta.compiled;
        self.minified = meta.minified;
        self.tags = meta.tags;
        self.content = content;
    }

    // ========================================================================
    // Convenience chain and derived values
    // ========================================================================

    /// Apply the config-enabled default chain: fingerprint, compile,
    /// minify (minification only for stylesheet/script content).
    pub fn process(self, ctx: &BuildContext) -> Result<Self> {
        let mut asset = self;
        if ctx.config.assets.fingerprint.enabled {
            asset = asset.fingerprint(ctx)?;
        }
        if ctx.config.assets.compile.enabled {
            asset = asset.compile(ctx)?;
        }
        if ctx.config.assets.minify.enabled
            && matches!(asset.ext.as_str(), "scss" | "sass" | "css" | "js")
        {
            asset = asset.minify(ctx)?;
        }
        Ok(asset)
    }

    /// Base64 data URL of the current content.
    pub fn data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.subtype,
            hash::base64_encode(&self.content)
        )
    }

    /// Subresource integrity value (`sha384-...`) of the current content.
    pub fn integrity(&self) -> String {
        hash::integrity(&self.content)
    }

    // ========================================================================
    // Publishing
    // ========================================================================

    /// Write the asset into the output tree (see [`publish::save`]).
    pub fn save(&mut self, ctx: &BuildContext) -> Result<()> {
        publish::save(self, ctx)
    }

    /// Final public reference: publishes the asset (unless it is
    /// CDN-eligible, in which case nothing is written) and returns the
    /// public path or CDN URL. A publish failure is downgraded to a
    /// logged error so rendering can continue with the best-effort path.
    pub fn public_path(&mut self, ctx: &BuildContext) -> String {
        if cdn::is_eligible(self, &ctx.config) {
            return cdn::build_url(self, &ctx.config);
        }
        if let Err(err) = self.save(ctx) {
            crate::log!("error"; "failed to publish {}: {err}", self.path);
        }
        self.path.clone()
    }
}

/// Identity of a declared (pre-resolution) asset reference. Options that
/// shape the record (filename, slash style) are part of the identity so
/// two differently-declared assets never share a construction entry.
fn declared_identity(paths: &[&str], options: &AssetOptions) -> String {
    let mut identity = paths.join(",");
    if let Some(filename) = &options.filename {
        identity.push('@');
        identity.push_str(filename);
    }
    if !options.leading_slash {
        identity.push_str("!bare");
    }
    identity
}

// ============================================================================
// Tests
// ============================================================================
