//! Content digests for public paths and integrity attributes.
//!
//! Public-path fingerprints use md5 so the suffix format stays stable
//! across releases and toolchains; cache keys use blake3 (see
//! `cache::CacheKey`); subresource integrity uses SHA-384 per the SRI
//! spec.
//!
//! # Usage
//!
//! ```ignore
//! use crate::utils::hash;
//!
//! let fp = hash::md5_hex("body {}");       // -> 32 hex chars
//! let sri = hash::integrity("body {}");    // -> "sha384-..."
//! ```

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use sha2::{Digest, Sha384};

/// Compute the md5 hex digest of raw content.
///
/// Used for cache-busting path fingerprints (`styles.<digest>.css`).
#[inline]
pub fn md5_hex<T: AsRef<[u8]> + ?Sized>(data: &T) -> String {
    format!("{:x}", md5::compute(data.as_ref()))
}

/// Compute a subresource integrity value (`sha384-<base64 digest>`).
#[inline]
pub fn integrity<T: AsRef<[u8]> + ?Sized>(data: &T) -> String {
    let digest = Sha384::digest(data.as_ref());
    format!("sha384-{}", STANDARD.encode(digest))
}

/// Base64-encode content for data URLs.
#[inline]
pub fn base64_encode<T: AsRef<[u8]> + ?Sized>(data: &T) -> String {
    STANDARD.encode(data.as_ref())
}
