use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::errors::LedgerError;

/// Persistence capability: an opaque string blob per key.
///
/// The ledger never talks to a backend directly; anything that can get and
/// set a string under a key (device storage, browser storage, a file, a
/// test double) can sit behind this trait.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait KeyValueStore: Send + Sync {
    /// Human-readable name of this store (for logs/errors).
    fn name(&self) -> &str;

    /// The blob stored under `key`, or `None` if nothing was saved yet.
    async fn get(&self, key: &str) -> Result<Option<String>, LedgerError>;

    /// Replace the blob stored under `key`.
    async fn set(&self, key: &str, value: String) -> Result<(), LedgerError>;
}

/// Process-local store, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed a key, e.g. with data written by an older app version.
    pub fn with_value(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let Ok(mut values) = self.values.lock() {
            values.insert(key.into(), value.into());
        }
        self
    }

    /// Synchronous peek, handy for assertions.
    pub fn snapshot(&self, key: &str) -> Option<String> {
        self.values.lock().ok()?.get(key).cloned()
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl KeyValueStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn get(&self, key: &str) -> Result<Option<String>, LedgerError> {
        let values = self
            .values
            .lock()
            .map_err(|_| LedgerError::Persistence("memory store lock poisoned".into()))?;
        Ok(values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), LedgerError> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| LedgerError::Persistence("memory store lock poisoned".into()))?;
        values.insert(key.to_string(), value);
        Ok(())
    }
}

/// One JSON file per key inside a data directory (native only).
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileStore {
    pub fn new(dir: impl Into<std::path::PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File backing `key`. Characters that are not safe in file names
    /// (e.g. the `@` of `@financeapp`) become `_`.
    pub fn path_for(&self, key: &str) -> std::path::PathBuf {
        let file: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{file}.json"))
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[async_trait]
impl KeyValueStore for FileStore {
    fn name(&self) -> &str {
        "file"
    }

    async fn get(&self, key: &str) -> Result<Option<String>, LedgerError> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<(), LedgerError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(key);
        // write-then-rename so a crash never leaves a half-written blob
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, value).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }
}
