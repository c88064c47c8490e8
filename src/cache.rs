//! Content-addressed memoization of resolver decisions.
//!
//! Every memoized decision is stored under `namespace` + the SHA-256 of its
//! serialized input. Lookups read through memory, then the optional on-disk
//! store, and only then compute. Concurrent callers asking for the same key
//! wait on a single computation, so the scorer is never invoked twice for
//! identical content.
//!
//! Entries never expire; use [`DecisionCache::invalidate`] or
//! [`DecisionCache::clear`] to drop them.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use once_cell::sync::OnceCell;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::error::Result;

/// Directory name under the user cache directory.
const CACHE_DIR_NAME: &str = "unocr";

/// Where cached decisions are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CacheLocation {
    /// In memory only, lost when the cache is dropped
    Memory,
    /// The user cache directory (e.g. `~/.cache/unocr`)
    #[default]
    Default,
    /// A custom directory
    Dir(PathBuf),
}

/// Options for the decision cache.
#[derive(Debug, Clone, Default)]
pub struct CacheOptions {
    /// Storage location
    pub location: CacheLocation,
}

impl CacheOptions {
    /// Create new cache options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep decisions in memory only.
    pub fn memory() -> Self {
        Self {
            location: CacheLocation::Memory,
        }
    }

    /// Persist decisions in a custom directory.
    pub fn dir(path: impl Into<PathBuf>) -> Self {
        Self {
            location: CacheLocation::Dir(path.into()),
        }
    }

    /// Resolve the on-disk directory, if any.
    pub fn resolve_dir(&self) -> Option<PathBuf> {
        match &self.location {
            CacheLocation::Memory => None,
            CacheLocation::Default => dirs::cache_dir()
                .or_else(dirs::home_dir)
                .map(|d| d.join(CACHE_DIR_NAME)),
            CacheLocation::Dir(path) => Some(path.clone()),
        }
    }
}

/// A persisted cache entry.
#[derive(Debug, Serialize, Deserialize)]
struct StoredEntry {
    namespace: String,
    created: DateTime<Utc>,
    value: Value,
}

type Slot = Arc<OnceCell<Value>>;

/// Content-addressed decision store.
#[derive(Debug)]
pub struct DecisionCache {
    dir: Option<PathBuf>,
    slots: Mutex<HashMap<String, Slot>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl DecisionCache {
    /// Create a cache from options.
    pub fn new(options: &CacheOptions) -> Self {
        let dir = options.resolve_dir();
        if let Some(dir) = &dir {
            log::debug!("decision cache at {}", dir.display());
        }
        Self {
            dir,
            slots: Mutex::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Create an in-memory cache.
    pub fn in_memory() -> Self {
        Self::new(&CacheOptions::memory())
    }

    /// Create a cache persisted in `dir`.
    pub fn persistent(dir: impl Into<PathBuf>) -> Self {
        Self::new(&CacheOptions::dir(dir))
    }

    /// On-disk directory, if persistence is enabled.
    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    /// Cache key of an input.
    pub fn key<I: Serialize + ?Sized>(namespace: &str, input: &I) -> Result<String> {
        let bytes = serde_json::to_vec(input)?;
        Ok(format!("{}/{:x}", namespace, Sha256::digest(&bytes)))
    }

    /// Return the cached result for `input`, computing and storing it on a miss.
    ///
    /// `compute` runs at most once per key, even under concurrent access. If
    /// it fails, nothing is stored and the error is returned.
    pub fn get_or_compute<I, T, F>(&self, namespace: &str, input: &I, compute: F) -> Result<T>
    where
        I: Serialize + ?Sized,
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Result<T>,
    {
        let key = Self::key(namespace, input)?;
        let slot = self.slot(&key)?;

        let mut computed = false;
        let value = slot.get_or_try_init(|| -> Result<Value> {
            if let Some(stored) = self.load(&key) {
                return Ok(stored);
            }
            computed = true;
            let value = serde_json::to_value(compute()?)?;
            self.store(&key, namespace, &value);
            Ok(value)
        })?;

        if computed {
            self.misses.fetch_add(1, Ordering::Relaxed);
        } else {
            self.hits.fetch_add(1, Ordering::Relaxed);
            log::debug!("cache hit {}", key);
        }

        Ok(T::deserialize(value)?)
    }

    /// Drop the cached result for one input, in memory and on disk.
    pub fn invalidate<I: Serialize + ?Sized>(&self, namespace: &str, input: &I) -> Result<()> {
        let key = Self::key(namespace, input)?;
        self.lock().remove(&key);
        if let Some(path) = self.entry_path(&key) {
            if path.exists() {
                fs::remove_file(path)?;
            }
        }
        Ok(())
    }

    /// Drop every cached result, in memory and on disk.
    pub fn clear(&self) -> Result<()> {
        self.lock().clear();
        if let Some(dir) = &self.dir {
            if dir.exists() {
                fs::remove_dir_all(dir)?;
            }
        }
        Ok(())
    }

    /// Number of lookups answered without computing.
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Number of lookups that had to compute.
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Number of keys resolved in memory.
    pub fn len(&self) -> usize {
        self.lock().values().filter(|s| s.get().is_some()).count()
    }

    /// Check if nothing is resolved in memory.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The map only holds slot handles, so a panicked holder leaves it usable.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, Slot>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn slot(&self, key: &str) -> Result<Slot> {
        let mut slots = self.lock();
        Ok(slots.entry(key.to_string()).or_default().clone())
    }

    fn entry_path(&self, key: &str) -> Option<PathBuf> {
        self.dir.as_ref().map(|d| d.join(format!("{}.json", key)))
    }

    fn load(&self, key: &str) -> Option<Value> {
        let path = self.entry_path(key)?;
        let data = fs::read(&path).ok()?;
        match serde_json::from_slice::<StoredEntry>(&data) {
            Ok(entry) => Some(entry.value),
            Err(e) => {
                log::warn!("ignoring unreadable cache entry {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Failures to persist are logged; the value stays cached in memory.
    fn store(&self, key: &str, namespace: &str, value: &Value) {
        let Some(path) = self.entry_path(key) else {
            return;
        };
        let entry = StoredEntry {
            namespace: namespace.to_string(),
            created: Utc::now(),
            value: value.clone(),
        };
        if let Err(e) = write_atomic(&path, &entry) {
            log::warn!("failed to persist cache entry {}: {}", path.display(), e);
        }
    }
}

impl Default for DecisionCache {
    fn default() -> Self {
        Self::new(&CacheOptions::default())
    }
}

fn write_atomic(path: &Path, entry: &StoredEntry) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension(format!("{}.tmp", std::process::id()));
    fs::write(&tmp, serde_json::to_vec(entry)?)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_key_is_content_addressed() {
        let a = DecisionCache::key("ns", &vec!["a", "b"]).unwrap();
        let b = DecisionCache::key("ns", &vec!["a", "b"]).unwrap();
        let c = DecisionCache::key("ns", &vec!["a", "c"]).unwrap();
        let d = DecisionCache::key("other", &vec!["a", "b"]).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
        assert!(a.starts_with("ns/"));
    }

    #[test]
    fn test_memoizes_in_memory() {
        let cache = DecisionCache::in_memory();
        let calls = AtomicUsize::new(0);
        let compute = || {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![1, 2, 3])
        };

        let first: Vec<i32> = cache.get_or_compute("ns", "input", compute).unwrap();
        let second: Vec<i32> = cache.get_or_compute("ns", "input", compute).unwrap();

        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_failed_compute_is_not_cached() {
        let cache = DecisionCache::in_memory();
        let failed: Result<u32> = cache.get_or_compute("ns", "k", || Err(Error::Scorer("x".into())));
        assert!(failed.is_err());
        let ok: u32 = cache.get_or_compute("ns", "k", || Ok(7)).unwrap();
        assert_eq!(ok, 7);
    }

    #[test]
    fn test_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let first = DecisionCache::persistent(dir.path());
        let v: Option<String> = first.get_or_compute("merge", "para", || Ok(Some("x".to_string()))).unwrap();
        assert_eq!(v.as_deref(), Some("x"));

        let second = DecisionCache::persistent(dir.path());
        let v: Option<String> = second
            .get_or_compute("merge", "para", || Err(Error::Other("recomputed".into())))
            .unwrap();
        assert_eq!(v.as_deref(), Some("x"));
        assert_eq!(second.hits(), 1);
    }

    #[test]
    fn test_invalidate_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DecisionCache::persistent(dir.path().join("store"));
        let _: u32 = cache.get_or_compute("ns", "k", || Ok(1)).unwrap();

        cache.invalidate("ns", "k").unwrap();
        let v: u32 = cache.get_or_compute("ns", "k", || Ok(2)).unwrap();
        assert_eq!(v, 2);

        cache.clear().unwrap();
        assert!(cache.is_empty());
        assert!(!dir.path().join("store").exists());
    }

    #[test]
    fn test_concurrent_callers_compute_once() {
        let cache = DecisionCache::in_memory();
        let calls = AtomicUsize::new(0);

        std::thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    let v: u64 = cache
                        .get_or_compute("ns", "shared", || {
                            calls.fetch_add(1, Ordering::SeqCst);
                            std::thread::sleep(std::time::Duration::from_millis(20));
                            Ok(42)
                        })
                        .unwrap();
                    assert_eq!(v, 42);
                });
            }
        });

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.hits() + cache.misses(), 8);
    }

    #[test]
    fn test_usable_after_panicking_holder() {
        let cache = Arc::new(DecisionCache::in_memory());
        cache.get_or_compute("ns", "a", || Ok(1)).unwrap();

        let holder = Arc::clone(&cache);
        let joined = std::thread::spawn(move || {
            let _guard = holder.slots.lock().unwrap();
            panic!("poison the slot map");
        })
        .join();
        assert!(joined.is_err());
        assert!(cache.slots.is_poisoned());

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get_or_compute("ns", "a", || Ok(2)).unwrap(), 1);
        cache.invalidate("ns", "a").unwrap();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_default_location() {
        assert_eq!(CacheOptions::memory().resolve_dir(), None);
        let dir = CacheOptions::dir("/tmp/x").resolve_dir();
        assert_eq!(dir, Some(PathBuf::from("/tmp/x")));
    }
}
