//! In-memory TTL cache keyed by resource name
//!
//! Provides a `TtlCache` that stores one value per key together with an expiry
//! timestamp. Lookups at or after the expiry behave as if the key was never set.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

/// Default time-to-live for proxied resources
pub const DEFAULT_TTL: Duration = Duration::from_secs(6000);

/// A single cached value and the moment it stops being served
#[derive(Debug, Clone)]
pub struct CachedRecord<V> {
    /// The cache key this record lives under
    pub key: String,
    /// The cached value
    pub value: V,
    /// When the record was written
    pub cached_at: DateTime<Utc>,
    /// When the record expires
    pub expires_at: DateTime<Utc>,
}

impl<V> CachedRecord<V> {
    fn new(key: String, value: V, ttl: Duration) -> Self {
        let now = Utc::now();
        let expires_at = ChronoDuration::from_std(ttl)
            .ok()
            .and_then(|ttl| now.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        Self {
            key,
            value,
            cached_at: now,
            expires_at,
        }
    }

    /// Whether the record has reached its expiry
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// Thread-safe map of keyed values with per-record expiry
///
/// Each `get` and `set` takes the lock once, so readers never observe a
/// half-written record. Two writers racing on the same key leave whichever
/// value was written last.
#[derive(Debug)]
pub struct TtlCache<V> {
    records: RwLock<HashMap<String, CachedRecord<V>>>,
}

impl<V> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> TtlCache<V> {
    /// Creates an empty cache
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Stores `value` under `key`, replacing any previous record
    ///
    /// Expired records under other keys are dropped in the same write.
    ///
    /// # Arguments
    /// * `key` - Cache key (e.g., "weather")
    /// * `value` - The value to cache
    /// * `ttl` - How long the value should be served
    pub fn set(&self, key: &str, value: V, ttl: Duration) {
        let record = CachedRecord::new(key.to_string(), value, ttl);

        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        let before = records.len();
        records.retain(|_, record| !record.is_expired());
        let purged = before - records.len();

        tracing::debug!(key, expires_at = %record.expires_at, purged, "cache set");
        records.insert(key.to_string(), record);
    }

    /// Number of records currently held, expired ones included
    pub fn len(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether the cache holds no records at all
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<V: Clone> TtlCache<V> {
    /// Reads the value for `key`
    ///
    /// Returns `None` if the key was never set or its record has expired.
    pub fn get(&self, key: &str) -> Option<V> {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        match records.get(key) {
            Some(record) if !record.is_expired() => Some(record.value.clone()),
            _ => None,
        }
    }

    /// Reads the full record for `key`, if it is still live
    pub fn get_record(&self, key: &str) -> Option<CachedRecord<V>> {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        records.get(key).filter(|record| !record.is_expired()).cloned()
    }
}
