//! TTL cache for upstream API responses.
//!
//! Expired entries are never swept in the background. A `get` that finds an
//! expired entry deletes it on the spot; [`ResponseCache::purge_expired`]
//! exists for operators who want to reclaim space explicitly.

use crate::clock::{Clock, SystemClock};
use crate::error::Result;
use crate::models::CacheEntry;
use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use std::sync::Arc;

pub const DEFAULT_TTL_SECONDS: u64 = 60 * 60;

/// Persistence seam for [`ResponseCache`].
pub trait CacheStore: Send + Sync {
    fn load_entry(&self, key: &str) -> Result<Option<CacheEntry>>;

    /// Insert the entry, or replace the payload and expiry of the entry with
    /// the same key. Returns the stored `created_at`, which a replace keeps.
    fn save_entry(&self, entry: &CacheEntry) -> Result<DateTime<Utc>>;

    /// Delete the entry for `key` only if it has expired by `now`, so a
    /// concurrent fresh `save_entry` is never thrown away.
    fn remove_expired_entry(&self, key: &str, now: DateTime<Utc>) -> Result<bool>;

    fn remove_all_expired(&self, now: DateTime<Utc>) -> Result<usize>;
}

impl<S: CacheStore + ?Sized> CacheStore for Arc<S> {
    fn load_entry(&self, key: &str) -> Result<Option<CacheEntry>> {
        (**self).load_entry(key)
    }

    fn save_entry(&self, entry: &CacheEntry) -> Result<DateTime<Utc>> {
        (**self).save_entry(entry)
    }

    fn remove_expired_entry(&self, key: &str, now: DateTime<Utc>) -> Result<bool> {
        (**self).remove_expired_entry(key, now)
    }

    fn remove_all_expired(&self, now: DateTime<Utc>) -> Result<usize> {
        (**self).remove_all_expired(now)
    }
}

pub struct ResponseCache<S, C = SystemClock> {
    store: S,
    clock: C,
    default_ttl: u64,
}

impl<S: CacheStore> ResponseCache<S> {
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: CacheStore, C: Clock> ResponseCache<S, C> {
    pub fn with_clock(store: S, clock: C) -> Self {
        Self {
            store,
            clock,
            default_ttl: DEFAULT_TTL_SECONDS,
        }
    }

    pub fn default_ttl(mut self, seconds: u64) -> Self {
        self.default_ttl = seconds;
        self
    }

    pub fn ttl(&self) -> u64 {
        self.default_ttl
    }

    pub fn get(&self, key: &str) -> Result<Option<Value>> {
        let Some(entry) = self.store.load_entry(key)? else {
            tracing::debug!(key, "cache miss");
            return Ok(None);
        };

        let now = self.clock.now();
        if entry.is_live_at(now) {
            tracing::debug!(key, "cache hit");
            return Ok(Some(entry.payload));
        }

        self.store.remove_expired_entry(key, now)?;
        tracing::debug!(key, expired_at = %entry.expires_at, "evicted expired cache entry");
        Ok(None)
    }

    pub fn set(&self, key: &str, payload: Value, ttl_seconds: u64) -> Result<CacheEntry> {
        let now = self.clock.now();
        let ttl = i64::try_from(ttl_seconds)
            .ok()
            .and_then(Duration::try_seconds)
            .unwrap_or(Duration::MAX);
        let mut entry = CacheEntry {
            key: key.to_string(),
            payload,
            created_at: now,
            expires_at: now.checked_add_signed(ttl).unwrap_or(DateTime::<Utc>::MAX_UTC),
        };
        entry.created_at = self.store.save_entry(&entry)?;
        Ok(entry)
    }

    /// `set` with the configured default TTL.
    pub fn put(&self, key: &str, payload: Value) -> Result<CacheEntry> {
        self.set(key, payload, self.default_ttl)
    }

    pub fn purge_expired(&self) -> Result<usize> {
        let removed = self.store.remove_all_expired(self.clock.now())?;
        if removed > 0 {
            tracing::info!(removed, "purged expired cache entries");
        }
        Ok(removed)
    }
}
