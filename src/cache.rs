//! Catalog cache service.
//!
//! Keeps fetched catalog data so repeated pack openings don't hit the API.
//! Storage and time are injected: [`MemoryStore`] or [`FileStore`] hold the
//! entries, and a [`Clock`] decides when an entry has outlived its TTL.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::{self, CACHE_KEY_VERSION};
use crate::error::{PackError, Result};

/// Cache key for a set's card list.
pub fn cards_key(set_id: &str) -> String {
    format!("cards-{}-{}", CACHE_KEY_VERSION, set_id)
}

/// Cache key for the set list.
pub fn sets_key() -> String {
    format!("sets-{}", CACHE_KEY_VERSION)
}

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// Wall-clock source, in milliseconds since the Unix epoch.
pub trait Clock {
    fn now_millis(&self) -> u64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        crate::booster::generator::now_millis()
    }
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new(start_millis: u64) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(start_millis)),
        }
    }

    pub fn advance(&self, by: Duration) {
        let millis = u64::try_from(by.as_millis()).unwrap_or(u64::MAX);
        self.now.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

/// Key/value storage for serialized cache entries.
pub trait CacheStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
    fn clear(&mut self) -> Result<()>;
}

/// Process-local storage; lost when dropped.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CacheStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        Ok(())
    }
}

/// One JSON file per key inside a cache directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    /// Directory where cached files are stored.
    pub cache_dir: PathBuf,
}

impl FileStore {
    /// Create a file store.
    ///
    /// If `cache_dir` is `None`, uses the platform-appropriate default cache
    /// directory. Creates the directory if it does not exist.
    pub fn new(cache_dir: Option<PathBuf>) -> Result<Self> {
        let dir = cache_dir.unwrap_or_else(config::default_cache_dir);
        fs::create_dir_all(&dir)?;
        Ok(Self { cache_dir: dir })
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(PackError::InvalidArgument(format!(
                "cache key '{}' is not a valid file name",
                key
            )));
        }
        Ok(self.cache_dir.join(format!("{}.json", key)))
    }

    fn ensure_dir(&self) -> Result<&Path> {
        fs::create_dir_all(&self.cache_dir)?;
        Ok(&self.cache_dir)
    }
}

impl CacheStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Writes to a temp file first and renames on success, so an interrupted
    /// write never leaves a partial entry behind.
    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        let mut tmp = tempfile::NamedTempFile::new_in(self.ensure_dir()?)?;
        tmp.write_all(value.as_bytes())?;
        tmp.persist(&path).map_err(|e| PackError::Io(e.error))?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Remove all cached files and recreate the cache directory.
    fn clear(&mut self) -> Result<()> {
        if self.cache_dir.exists() {
            fs::remove_dir_all(&self.cache_dir)?;
            fs::create_dir_all(&self.cache_dir)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// CatalogCache
// ---------------------------------------------------------------------------

#[derive(Serialize, Deserialize)]
struct CacheEntry<T> {
    written_at: u64,
    value: T,
}

/// TTL-bounded cache of serialized values over an injected store and clock.
#[derive(Debug)]
pub struct CatalogCache<S, C> {
    store: S,
    clock: C,
    ttl: Duration,
}

impl<S: CacheStore, C: Clock> CatalogCache<S, C> {
    pub fn new(store: S, clock: C, ttl: Duration) -> Self {
        Self { store, clock, ttl }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Look up a fresh entry.
    ///
    /// Expired entries are misses. Entries that fail to parse are removed so
    /// the next write replaces them. Storage errors are logged and treated as
    /// misses.
    pub fn get<T: DeserializeOwned>(&mut self, key: &str) -> Option<T> {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!(key, "cache miss");
                return None;
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "cache read failed");
                return None;
            }
        };

        let entry: CacheEntry<T> = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(key, error = %e, "corrupt cache entry, removing");
                if let Err(e) = self.store.remove(key) {
                    tracing::warn!(key, error = %e, "failed to remove corrupt cache entry");
                }
                return None;
            }
        };

        let age = self.clock.now_millis().saturating_sub(entry.written_at);
        if u128::from(age) > self.ttl.as_millis() {
            tracing::debug!(key, age_ms = age, "cache entry expired");
            return None;
        }

        tracing::debug!(key, "cache hit");
        Some(entry.value)
    }

    pub fn put<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        let entry = CacheEntry {
            written_at: self.clock.now_millis(),
            value,
        };
        let raw = serde_json::to_string(&entry)?;
        self.store.set(key, &raw)
    }

    pub fn invalidate(&mut self, key: &str) -> Result<()> {
        self.store.remove(key)
    }

    pub fn clear(&mut self) -> Result<()> {
        self.store.clear()
    }
}
