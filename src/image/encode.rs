//! Raster re-encoding built on the `image` codecs.
//!
//! The pipeline never implements codec internals; decoding and encoding
//! go through the `image` crate. WebP output is lossless (the only mode
//! the encoder supports), JPEG honors the quality parameter, PNG ignores
//! it.

use std::io::Cursor;

use anyhow::{Context, Result, bail};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::webp::WebPEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};

use super::TargetFormat;

/// Decode raster content, guessing the format from the bytes.
fn decode(content: &[u8]) -> Result<DynamicImage> {
    image::load_from_memory(content).context("failed to decode image content")
}

/// Encode a decoded image into the format implied by `ext`.
fn encode(img: &DynamicImage, ext: &str, quality: u8) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    match ext {
        "jpg" | "jpeg" => {
            let encoder = JpegEncoder::new_with_quality(&mut out, quality);
            DynamicImage::ImageRgb8(img.to_rgb8())
                .write_with_encoder(encoder)
                .context("jpeg encoding failed")?;
        }
        "webp" => {
            let encoder = WebPEncoder::new_lossless(&mut out);
            DynamicImage::ImageRgba8(img.to_rgba8())
                .write_with_encoder(encoder)
                .context("webp encoding failed")?;
        }
        "png" => {
            img.write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
                .context("png encoding failed")?;
        }
        other => bail!("unsupported target format `{other}`"),
    }
    Ok(out)
}

/// Re-render content at `width` (aspect ratio preserved), keeping the
/// format implied by `ext`. Returns the encoded bytes and the computed
/// height.
pub fn resize_to_width(
    content: &[u8],
    ext: &str,
    width: u32,
    quality: u8,
) -> Result<(Vec<u8>, u32)> {
    let img = decode(content)?;
    let (w, h) = (img.width(), img.height());
    if w == 0 {
        bail!("source image has zero width");
    }
    #[allow(clippy::cast_possible_truncation)]
    let height = (((u64::from(h) * u64::from(width)) + u64::from(w) / 2) / u64::from(w)) as u32;
    let height = height.max(1);
    let resized = img.resize_exact(width, height, FilterType::Lanczos3);
    let bytes = encode(&resized, ext, quality)?;
    Ok((bytes, height))
}

/// Convert content to `format` at `quality`.
pub fn convert(content: &[u8], format: TargetFormat, quality: u8) -> Result<Vec<u8>> {
    let img = decode(content)?;
    encode(&img, format.extension(), quality)
}

/// Re-encode content in its current format (optimizer path).
pub fn reencode(content: &[u8], ext: &str, quality: u8) -> Result<Vec<u8>> {
    let img = decode(content)?;
    encode(&img, ext, quality)
}
