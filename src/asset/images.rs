//! Image operations on the asset record: resize, format conversion, and
//! post-publish optimization.
//!
//! Resize and conversion derive a clone instead of mutating in place, so
//! callers can keep the base image alongside its variants (e.g. several
//! responsive widths of one source). CDN-eligible images short-circuit to
//! metadata-only clones and defer the pixel work to the CDN.

use std::fs;
use std::path::Path;

use anyhow::anyhow;

use crate::cdn;
use crate::context::BuildContext;
use crate::error::{AssetError, Result};
use crate::image::TargetFormat;
use crate::utils::mime;

use super::{Asset, route};

impl Asset {
    /// Derive a clone resized to `width`. Never upscales: a requested
    /// width at or above the current width returns the record unchanged
    /// (and writes no cache entry).
    pub fn resize(&self, ctx: &BuildContext, width: u32) -> Result<Self> {
        if self.missing {
            return Err(AssetError::MissingSource {
                op: "resize",
                path: self.path.clone(),
            });
        }
        if !self.media.is_image() {
            return Err(AssetError::NotAnImage {
                op: "resize",
                path: self.path.clone(),
            });
        }
        if let Some(current) = self.width
            && width >= current
        {
            return Ok(self.clone());
        }

        // The CDN performs the actual resize: carry the new width only.
        if cdn::is_eligible(self, &ctx.config) {
            let mut clone = self.clone();
            clone.width = Some(width);
            return Ok(clone);
        }

        if self.ext == "svg" {
            return Err(AssetError::Backend {
                op: "resize",
                error: anyhow!("no local rasterizer for svg (enable the CDN to resize svg)"),
            });
        }

        let quality = ctx.config.assets.images.quality;
        let mut clone = self.clone();
        clone.tags.push(format!("resized:{width}:q{quality}"));
        let key = clone.cache_key(ctx);
        if let Some((meta, content)) = ctx.cache.get::<Self>(&key)? {
            crate::debug!("cache"; "resize hit for {} @{width}", self.path);
            clone.adopt(meta, content);
            return Ok(clone);
        }

        let (bytes, height) =
            crate::image::resize_to_width(&self.content, &self.ext, width, quality).map_err(
                |e| AssetError::Backend {
                    op: "resize",
                    error: e,
                },
            )?;

        clone.path = route::resized(
            &self.path,
            &ctx.config.assets.images.resize.dir,
            width,
        );
        clone.content = bytes;
        clone.size = clone.content.len() as u64;
        clone.width = Some(width);
        clone.height = Some(height);

        clone.store(ctx, &key)?;
        Ok(clone)
    }

    /// Derive a clone converted to `format` (e.g. WebP).
    ///
    /// Quality defaults to the configured image quality. CDN-eligible
    /// images get a metadata-only clone; the CDN transcodes on delivery.
    pub fn to_format(&self, ctx: &BuildContext, format: TargetFormat) -> Result<Self> {
        if self.missing {
            return Err(AssetError::MissingSource {
                op: "convert",
                path: self.path.clone(),
            });
        }
        if !self.media.is_image() {
            return Err(AssetError::NotAnImage {
                op: "convert",
                path: self.path.clone(),
            });
        }

        let ext = format.extension();
        if cdn::is_eligible(self, &ctx.config) {
            let mut clone = self.clone();
            clone.ext = ext.to_string();
            clone.subtype = mime::subtype_of(ext).to_string();
            return Ok(clone);
        }

        let quality = ctx.config.assets.images.quality;
        let mut clone = self.clone();
        clone.tags.push(format!("converted:{ext}:q{quality}"));
        let key = clone.cache_key(ctx);
        if let Some((meta, content)) = ctx.cache.get::<Self>(&key)? {
            crate::debug!("cache"; "convert hit for {} -> {ext}", self.path);
            clone.adopt(meta, content);
            return Ok(clone);
        }

        let bytes = crate::image::convert(&self.content, format, quality).map_err(|e| {
            AssetError::Backend {
                op: "convert",
                error: e,
            }
        })?;

        clone.content = bytes;
        clone.size = clone.content.len() as u64;
        clone.ext = ext.to_string();
        clone.subtype = mime::subtype_of(ext).to_string();
        clone.path = route::swap_extension(&self.path, ext);
        clone.filename = route::swap_extension(&self.filename, ext);

        clone.store(ctx, &key)?;
        Ok(clone)
    }

    /// Optimize the already-published file in place and fold the result
    /// back into the record. Invoked by the publisher as a post-write
    /// step; raster images only.
    pub(crate) fn optimize(&mut self, ctx: &BuildContext, written: &Path) -> Result<()> {
        if !self.media.is_image() || self.ext == "svg" {
            return Ok(());
        }

        let quality = ctx.config.assets.images.quality;
        self.tags.push(format!(
            "optimized:{}:q{quality}",
            self.width.unwrap_or(0)
        ));
        let key = self.cache_key(ctx);
        if let Some((meta, content)) = ctx.cache.get::<Self>(&key)? {
            crate::debug!("cache"; "optimize hit for {}", self.path);
            if content != fs::read(written).unwrap_or_default() {
                fs::write(written, &content).map_err(|e| AssetError::io(written, e))?;
            }
            self.adopt(meta, content);
            return Ok(());
        }

        let before = self.size;
        ctx.optimizer
            .optimize(written, quality)
            .map_err(|e| AssetError::Backend {
                op: "optimize",
                error: e,
            })?;
        let bytes = fs::read(written).map_err(|e| AssetError::io(written, e))?;
        let after = bytes.len() as u64;
        if after < before {
            crate::debug!("assets"; "optimized {} ({before} -> {after} bytes)", self.path);
        }

        self.content = bytes;
        self.size = after;
        self.store(ctx, &key)?;
        Ok(())
    }
}
