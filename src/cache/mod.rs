//! Content-addressed cache for resolved and transformed assets.
//!
//! Each entry is a metadata JSON document plus a raw content blob, named
//! by the key digest:
//!
//! ```text
//! .sitka/cache/assets/
//! ├── 3f82…a1.json   # serialized record projection
//! ├── 3f82…a1.bin    # content bytes
//! └── remote/        # fetched remote sources (see resolver::remote)
//! ```
//!
//! Writes go through a temp file and an atomic rename, so a concurrent
//! reader never observes a partial entry; two pipelines computing the same
//! key write identical bytes, making last-writer-wins safe. A `DashMap`
//! layer fronts the disk within one process.

mod key;

pub use key::CacheKey;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use dashmap::DashMap;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{AssetError, Result};

/// Disk-backed asset cache with an in-memory front.
#[derive(Debug)]
pub struct AssetCache {
    dir: PathBuf,
    mem: DashMap<String, Entry>,
}

#[derive(Debug, Clone)]
struct Entry {
    meta: String,
    content: Vec<u8>,
}

impl AssetCache {
    /// Open (creating if needed) a cache directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| AssetError::io(&dir, e))?;
        Ok(Self {
            dir,
            mem: DashMap::new(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Whether a complete entry exists for `key`.
    pub fn has(&self, key: &CacheKey) -> bool {
        let digest = key.digest();
        self.mem.contains_key(&digest)
            || (self.meta_path(&digest).is_file() && self.content_path(&digest).is_file())
    }

    /// Fetch an entry: deserialized metadata plus content bytes.
    pub fn get<T: DeserializeOwned>(&self, key: &CacheKey) -> Result<Option<(T, Vec<u8>)>> {
        let digest = key.digest();

        if let Some(entry) = self.mem.get(&digest) {
            let meta = serde_json::from_str(&entry.meta)?;
            return Ok(Some((meta, entry.content.clone())));
        }

        let meta_path = self.meta_path(&digest);
        let content_path = self.content_path(&digest);
        if !meta_path.is_file() || !content_path.is_file() {
            return Ok(None);
        }

        let meta_json =
            fs::read_to_string(&meta_path).map_err(|e| AssetError::io(&meta_path, e))?;
        let content = fs::read(&content_path).map_err(|e| AssetError::io(&content_path, e))?;
        let meta = serde_json::from_str(&meta_json)?;

        self.mem.insert(
            digest,
            Entry {
                meta: meta_json,
                content: content.clone(),
            },
        );
        Ok(Some((meta, content)))
    }

    /// Store an entry. The content blob lands before the metadata file,
    /// so a visible metadata file always has its content beside it.
    pub fn set<T: Serialize>(&self, key: &CacheKey, meta: &T, content: &[u8]) -> Result<()> {
        let digest = key.digest();
        let meta_json = serde_json::to_string(meta)?;

        let content_path = self.content_path(&digest);
        write_atomic(&content_path, content).map_err(|e| AssetError::io(&content_path, e))?;
        let meta_path = self.meta_path(&digest);
        write_atomic(&meta_path, meta_json.as_bytes())
            .map_err(|e| AssetError::io(&meta_path, e))?;

        self.mem.insert(
            digest,
            Entry {
                meta: meta_json,
                content: content.to_vec(),
            },
        );
        crate::debug!("cache"; "stored entry {key}");
        Ok(())
    }

    fn meta_path(&self, digest: &str) -> PathBuf {
        self.dir.join(format!("{digest}.json"))
    }

    fn content_path(&self, digest: &str) -> PathBuf {
        self.dir.join(format!("{digest}.bin"))
    }
}

/// Write via a process-unique temp file and rename.
fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("entry");
    let tmp = path.with_file_name(format!("{file_name}.{}.tmp", std::process::id()));
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)
}
