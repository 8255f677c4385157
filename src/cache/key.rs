//! Structured cache keys.
//!
//! A key is a tuple of (asset identity, build/config version token,
//! ordered transformation tags) hashed with blake3. Numeric operation
//! parameters are embedded in their tag (`resized:640:q75`), so the same
//! source at two widths never collides, and the same tags in a different
//! order never collide either.

use std::fmt;

/// Deterministic cache key for one asset state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKey {
    identity: String,
    version: String,
    tags: Vec<String>,
}

/// Field separator inside the hashed byte stream. An unprintable byte so
/// no identity or tag can smuggle a separator in.
const SEP: u8 = 0x1f;

impl CacheKey {
    /// Create a key for an asset identity under a version token.
    pub fn new(identity: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            version: version.into(),
            tags: Vec::new(),
        }
    }

    /// Append one transformation tag.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Append a sequence of transformation tags in order.
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Hex digest used as the on-disk entry name.
    pub fn digest(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.identity.as_bytes());
        hasher.update(&[SEP]);
        hasher.update(self.version.as_bytes());
        for tag in &self.tags {
            hasher.update(&[SEP]);
            hasher.update(tag.as_bytes());
        }
        hex::encode(&hasher.finalize().as_bytes()[..16])
    }
}

impl fmt::Display for CacheKey {
    /// Keys display as their digest so they can be logged directly.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.digest())
    }
}
