//! Asset pipeline for the sitka static site generator.
//!
//! Turns one or more declared source files (local, theme-provided, or
//! remote) into a single published artifact: resolve across a layered
//! search path, bundle, apply a cache-backed chain of idempotent
//! transformations (fingerprint, Sass compile, minify, resize, format
//! conversion, optimization), and publish the result into the output tree
//! or redirect it to a CDN.
//!
//! # Overview
//!
//! ```text
//! Asset::new ──► resolver (assets/themes/static or remote fetch+cache)
//!        │
//!        ▼
//!   bundle validation ──► record populated, cached
//!        │
//!        ▼
//!   fingerprint / compile / minify / resize / to_format   (cache-backed)
//!        │
//!        ▼
//!   public_path ──► publisher (never overwrites) or CDN URL
//! ```
//!
//! All operations take an explicit [`BuildContext`] carrying the immutable
//! configuration snapshot, the cache store, and the capability backends.

pub mod asset;
pub mod backend;
pub mod cache;
pub mod cdn;
pub mod config;
pub mod context;
pub mod error;
pub mod image;
pub mod logger;
pub mod publish;
pub mod resolver;
pub mod utils;

pub use asset::{Asset, AssetOptions};
pub use cache::{AssetCache, CacheKey};
pub use config::BuildConfig;
pub use context::BuildContext;
pub use error::{AssetError, ConfigError, Result};
