//! Publishing assets into the output tree.
//!
//! Two rules govern every write:
//! - dry-run mode writes nothing;
//! - a file already present at the output path is never overwritten, so
//!   a project's static tree takes precedence over a generated asset of
//!   the same name.
//!
//! After a successful write, raster images are handed to the optimizer
//! backend when `assets.images.optimize` is enabled.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::asset::Asset;
use crate::context::BuildContext;
use crate::error::{AssetError, Result};

/// Absolute output path for an asset's current public path.
pub fn output_path(asset: &Asset, ctx: &BuildContext) -> PathBuf {
    ctx.config
        .output_dir()
        .join(asset.path.trim_start_matches('/'))
}

/// Write the asset's content into the output tree.
///
/// Degraded (missing) records publish nothing. A write failure is fatal
/// (`Publish`); the downgrade to a logged error happens only at the
/// stringification boundary ([`Asset::public_path`]).
pub fn save(asset: &mut Asset, ctx: &BuildContext) -> Result<()> {
    if ctx.dry_run {
        crate::debug!("assets"; "dry-run: skipped {}", asset.path);
        return Ok(());
    }
    if asset.missing {
        crate::debug!("assets"; "nothing to publish for missing {}", asset.path);
        return Ok(());
    }
    // CDN-served images are never materialized locally.
    if crate::cdn::is_eligible(asset, &ctx.config) {
        crate::debug!("assets"; "cdn-served, not publishing {}", asset.path);
        return Ok(());
    }

    let target = output_path(asset, ctx);
    if target.exists() {
        crate::debug!("assets"; "kept existing {}", asset.path);
        return Ok(());
    }

    write(&asset.content, &target).map_err(|e| AssetError::Publish {
        path: asset.path.clone(),
        source: e,
    })?;
    crate::debug!("assets"; "published {}", asset.path);

    if ctx.config.assets.images.optimize.enabled && asset.media.is_image() {
        asset.optimize(ctx, &target)?;
    }
    Ok(())
}

fn write(content: &[u8], target: &Path) -> io::Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(target, content)
}
