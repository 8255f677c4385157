//! Shared helpers for asset pipeline tests.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use tempfile::TempDir;

use crate::config::BuildConfig;
use crate::context::BuildContext;

/// Build a scratch site and a context from a config snippet.
pub(crate) fn site(toml: &str) -> (TempDir, BuildContext) {
    let dir = TempDir::new().unwrap();
    let config = BuildConfig::from_toml(toml, dir.path()).unwrap();
    let ctx = BuildContext::new(config).unwrap();
    (dir, ctx)
}

/// Write a file under the site root, creating parent directories.
pub(crate) fn write(root: &Path, rel: &str, content: &[u8]) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// A 1x1 black PNG.
pub(crate) fn tiny_png() -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(1, 1, image::Rgba([0, 0, 0, 255]));
    let mut out = Vec::new();
    img.write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .unwrap();
    out
}

/// A checkerboard PNG of the given size (compresses poorly, so resizes
/// and re-encodes produce measurably different byte lengths).
pub(crate) fn checkerboard_png(w: u32, h: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_fn(w, h, |x, y| {
        if (x + y) % 2 == 0 {
            image::Rgba([255, 255, 255, 255])
        } else {
            image::Rgba([0, 0, 0, 255])
        }
    });
    let mut out = Vec::new();
    img.write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .unwrap();
    out
}
