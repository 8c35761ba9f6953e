//! Cache module for remote blog data
//!
//! This module provides a small expiring key/value cache that fronts every
//! remote read: site metadata, the post index and individual post bodies.
//! Entries are stored as JSON in a [`Storage`] medium under a fixed prefix
//! and expire lazily, when they are read after their TTL.
//!
//! Caching is an optimization only. Every medium failure is logged and
//! swallowed, so a cache that silently stores nothing is still correct.

mod clock;
mod storage;

pub use clock::{Clock, ManualClock, SystemClock};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Prefix marking the keys owned by the cache in a shared medium
pub const CACHE_PREFIX: &str = "blog_cache_";

/// A stored value with its freshness metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub data: T,
    /// Milliseconds since the Unix epoch at which the entry was written
    pub timestamp: i64,
    /// Lifetime in milliseconds
    pub ttl: u64,
}

impl<T> CacheEntry<T> {
    /// Whether the entry is stale at `now` (milliseconds since the epoch)
    pub fn is_expired(&self, now: i64) -> bool {
        let age = now.saturating_sub(self.timestamp);
        age > 0 && age as u64 > self.ttl
    }
}

/// Identifies one remote resource
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// `metadata.json`
    Metadata,
    /// `index.json`
    Index,
    /// `{folder}/{post_id}/post.md`
    Post { folder: String, post_id: String },
}

impl CacheKey {
    pub fn post(folder: &str, post_id: &str) -> Self {
        CacheKey::Post {
            folder: folder.to_string(),
            post_id: post_id.to_string(),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::Metadata => f.write_str("metadata"),
            CacheKey::Index => f.write_str("index"),
            CacheKey::Post { folder, post_id } => write!(f, "post/{}/{}", folder, post_id),
        }
    }
}

/// Expiring cache over a storage medium
#[derive(Debug)]
pub struct CacheStore<S, C = SystemClock> {
    storage: S,
    clock: C,
}

impl<S: Storage> CacheStore<S, SystemClock> {
    /// Create a cache using the system clock
    pub fn new(storage: S) -> Self {
        Self::with_clock(storage, SystemClock)
    }
}

impl<S: Storage, C: Clock> CacheStore<S, C> {
    pub fn with_clock(storage: S, clock: C) -> Self {
        Self { storage, clock }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn storage_key(key: &CacheKey) -> String {
        format!("{}{}", CACHE_PREFIX, key)
    }

    /// Get a fresh value
    ///
    /// Missing, expired and undecodable records all read as `None`; the
    /// latter two are removed from the medium.
    pub fn get<T: DeserializeOwned>(&mut self, key: &CacheKey) -> Option<T> {
        let storage_key = Self::storage_key(key);

        let raw = match self.storage.get_item(&storage_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!("Cache miss: {}", key);
                return None;
            }
            Err(e) => {
                tracing::debug!("Cache read failed for {}: {}", key, e);
                return None;
            }
        };

        let entry = match serde_json::from_str::<CacheEntry<T>>(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!("Evicting undecodable cache entry {}: {}", key, e);
                self.evict(&storage_key);
                return None;
            }
        };

        if entry.is_expired(self.clock.now_millis()) {
            tracing::debug!("Evicting expired cache entry {}", key);
            self.evict(&storage_key);
            return None;
        }

        tracing::debug!("Cache hit: {}", key);
        Some(entry.data)
    }

    /// Store a value, replacing any previous entry for `key`
    pub fn set<T: Serialize>(&mut self, key: &CacheKey, value: &T, ttl: Duration) {
        if let Err(e) = self.try_set(key, value, ttl) {
            tracing::debug!("Cache write skipped for {}: {}", key, e);
        }
    }

    fn try_set<T: Serialize>(&mut self, key: &CacheKey, value: &T, ttl: Duration) -> Result<(), StorageError> {
        let entry = CacheEntry {
            data: value,
            timestamp: self.clock.now_millis(),
            ttl: u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX),
        };
        let raw = serde_json::to_string(&entry)
            .map_err(|e| StorageError::Unavailable(format!("could not encode entry: {}", e)))?;
        self.storage.set_item(&Self::storage_key(key), &raw)
    }

    /// Remove every entry owned by the cache
    ///
    /// Keys outside the cache prefix are left alone.
    pub fn clear(&mut self) -> usize {
        let keys = match self.storage.keys() {
            Ok(keys) => keys,
            Err(e) => {
                tracing::debug!("Cache clear failed: {}", e);
                return 0;
            }
        };

        let mut removed = 0;
        for key in keys.iter().filter(|k| k.starts_with(CACHE_PREFIX)) {
            match self.storage.remove_item(key) {
                Ok(()) => removed += 1,
                Err(e) => tracing::debug!("Could not remove {}: {}", key, e),
            }
        }
        removed
    }

    fn evict(&mut self, storage_key: &str) {
        if let Err(e) = self.storage.remove_item(storage_key) {
            tracing::debug!("Could not evict {}: {}", storage_key, e);
        }
    }
}
