//! Persistence Backends
//!
//! Durable key-value mirror for cache entries. The entry cache writes a JSON
//! copy of each entry under a namespaced key so a future session can warm
//! start; failures here are logged by the cache and never fail the in-memory
//! operation.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::error::{CacheError, Result};

// == Persistence Backend Trait ==
/// Pluggable durable key-value medium.
///
/// Implementations must be cheap to call from the synchronous cache path;
/// anything slow belongs behind its own buffering.
pub trait PersistenceBackend: Send + Sync {
    /// Stores serialized bytes under a namespaced key, overwriting any
    /// previous value.
    fn store(&self, key: &str, bytes: &[u8]) -> Result<()>;

    /// Reads back the bytes stored under a key, if any.
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Removes a single key; unknown keys are a no-op.
    fn remove(&self, key: &str) -> Result<()>;

    /// Removes every key starting with the given namespace prefix.
    fn remove_prefix(&self, prefix: &str) -> Result<()>;
}

// == Memory Backend ==
/// In-memory backend, the default for tests and for consoles that opt out of
/// durable storage.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    items: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryBackend {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.items.lock().expect("persistence lock poisoned").len()
    }

    /// True if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PersistenceBackend for MemoryBackend {
    fn store(&self, key: &str, bytes: &[u8]) -> Result<()> {
        self.items
            .lock()
            .expect("persistence lock poisoned")
            .insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self
            .items
            .lock()
            .expect("persistence lock poisoned")
            .get(key)
            .cloned())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.items
            .lock()
            .expect("persistence lock poisoned")
            .remove(key);
        Ok(())
    }

    fn remove_prefix(&self, prefix: &str) -> Result<()> {
        self.items
            .lock()
            .expect("persistence lock poisoned")
            .retain(|k, _| !k.starts_with(prefix));
        Ok(())
    }
}

// == Disk Backend ==
/// File-per-key backend under a directory; key characters outside
/// `[A-Za-z0-9_-]` are mapped to `_` to form the file name.
#[derive(Debug)]
pub struct DiskBackend {
    dir: PathBuf,
}

impl DiskBackend {
    /// Creates the backend, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .map_err(|e| CacheError::Persistence(format!("create {}: {e}", dir.display())))?;
        Ok(Self { dir })
    }

    fn file_name(key: &str) -> String {
        let sanitized: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        format!("{sanitized}.json")
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(Self::file_name(key))
    }
}

impl PersistenceBackend for DiskBackend {
    fn store(&self, key: &str, bytes: &[u8]) -> Result<()> {
        fs::write(self.path_for(key), bytes)
            .map_err(|e| CacheError::Persistence(format!("write {key}: {e}")))
    }

    fn load(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CacheError::Persistence(format!("read {key}: {e}"))),
        }
    }

    fn remove(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CacheError::Persistence(format!("remove {key}: {e}"))),
        }
    }

    fn remove_prefix(&self, prefix: &str) -> Result<()> {
        let sanitized_prefix = Self::file_name(prefix);
        // file_name appends ".json"; match on the stem instead
        let stem = sanitized_prefix.trim_end_matches(".json");
        let entries = fs::read_dir(&self.dir)
            .map_err(|e| CacheError::Persistence(format!("list {}: {e}", self.dir.display())))?;
        for entry in entries.flatten() {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.starts_with(stem) {
                let _ = fs::remove_file(entry.path());
            }
        }
        Ok(())
    }
}
