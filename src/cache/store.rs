//! Metrics Cache Store
//!
//! The cache engine: one persisted JSON blob mapping metric key -> entry,
//! plus a separately persisted config blob. The public operations never
//! fail; internally they run as `Result`-returning functions and every
//! failure is swallowed at the boundary, so the degrade-to-miss policy sits
//! in one auditable place instead of scattered catches.

use std::collections::HashMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::cache::entry::measured_size;
use crate::cache::{
    CacheConfig, CacheConfigPatch, CacheStats, MetricEntry, CONFIG_SLOT, STORE_SLOT,
};
use crate::clock::{Clock, SystemClock};
use crate::storage::{BackendError, StorageBackend};

// == Cache Failure ==
/// Internal failure of a cache operation.
///
/// Deliberately crate-private: callers of the public operations only ever
/// observe a miss or a dropped write.
#[derive(Debug, Error)]
pub(crate) enum CacheFailure {
    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("serialization failed: {0}")]
    Encode(serde_json::Error),

    #[error("entry of {size} bytes exceeds ceiling of {limit} bytes")]
    TooLarge { size: u64, limit: u64 },
}

// == Metrics Cache ==
/// TTL-bounded memoization layer over computed dashboard metrics.
///
/// Constructed once at startup with an injected storage backend and clock,
/// then shared behind a lock; it is an explicit value, not a global.
pub struct MetricsCache {
    backend: Box<dyn StorageBackend>,
    clock: Arc<dyn Clock>,
}

impl MetricsCache {
    // == Constructors ==
    pub fn new(backend: Box<dyn StorageBackend>, clock: Arc<dyn Clock>) -> Self {
        Self { backend, clock }
    }

    pub fn with_system_clock(backend: Box<dyn StorageBackend>) -> Self {
        Self::new(backend, Arc::new(SystemClock))
    }

    // == Config ==
    /// Returns the current config, substituting defaults for a missing or
    /// corrupt blob. Pure read; defaults are not written back.
    pub fn config(&self) -> CacheConfig {
        match self.backend.get_item(CONFIG_SLOT) {
            Ok(Some(text)) => serde_json::from_str(&text).unwrap_or_else(|e| {
                debug!(error = %e, "config blob undecodable, using defaults");
                CacheConfig::default()
            }),
            Ok(None) => CacheConfig::default(),
            Err(e) => {
                debug!(error = %e, "config blob unreadable, using defaults");
                CacheConfig::default()
            }
        }
    }

    /// Merges a partial update into the current config and persists it.
    ///
    /// Existing entries are not retroactively purged: a smaller ceiling only
    /// applies to the next write, a new TTL only to the next read.
    pub fn update_config(&mut self, patch: &CacheConfigPatch) {
        let mut config = self.config();
        patch.apply(&mut config);

        let result = serde_json::to_string(&config)
            .map_err(CacheFailure::Encode)
            .and_then(|text| Ok(self.backend.set_item(CONFIG_SLOT, &text)?));
        if let Err(e) = result {
            warn!(error = %e, "config update not persisted");
        }
    }

    // == Get ==
    /// Looks up a cached metric. Returns `None` when caching is disabled,
    /// the key is absent or undecodable, or its TTL has elapsed. An expired
    /// entry is deleted write-through on the access that finds it.
    pub fn get_metrics(&mut self, key: &str) -> Option<Value> {
        if key.is_empty() {
            return None;
        }

        match self.try_get(key) {
            Ok(value) => value,
            Err(e) => {
                debug!(key, error = %e, "cache read degraded to miss");
                None
            }
        }
    }

    /// Typed variant of [`get_metrics`](Self::get_metrics): a payload that
    /// no longer decodes as `T` is a miss, not an error.
    pub fn get_as<T: DeserializeOwned>(&mut self, key: &str) -> Option<T> {
        let value = self.get_metrics(key)?;
        match serde_json::from_value(value) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                debug!(key, error = %e, "cached payload failed typed decode");
                None
            }
        }
    }

    fn try_get(&mut self, key: &str) -> Result<Option<Value>, CacheFailure> {
        let config = self.config();
        if !config.enabled {
            return Ok(None);
        }

        let mut raw = self.load_raw_store()?;
        let Some(entry_value) = raw.get(key) else {
            return Ok(None);
        };

        let Ok(entry) = serde_json::from_value::<MetricEntry>(entry_value.clone()) else {
            // Undecodable entries read as absent; the next sweep drops them
            debug!(key, "cache entry undecodable, treating as miss");
            return Ok(None);
        };

        if entry.is_expired(self.clock.now_millis(), config.ttl_millis) {
            raw.remove(key);
            self.persist_raw_store(&raw)?;
            return Ok(None);
        }

        Ok(Some(entry.data))
    }

    // == Set ==
    /// Stores a computed metric under `key` with the current timestamp and
    /// measured size. Returns `false` (storing nothing) when caching is
    /// disabled, serialization fails, the entry exceeds the size ceiling,
    /// or the storage medium rejects the write.
    pub fn set_metrics<T: Serialize + ?Sized>(&mut self, key: &str, payload: &T) -> bool {
        if key.is_empty() {
            return false;
        }

        let config = self.config();
        if !config.enabled {
            return false;
        }

        let data = match serde_json::to_value(payload) {
            Ok(value) => value,
            Err(e) => {
                debug!(key, error = %e, "payload not serializable, write dropped");
                return false;
            }
        };

        match self.try_set(key, data, &config) {
            Ok(()) => true,
            Err(e) => {
                debug!(key, error = %e, "cache write dropped");
                false
            }
        }
    }

    fn try_set(
        &mut self,
        key: &str,
        data: Value,
        config: &CacheConfig,
    ) -> Result<(), CacheFailure> {
        let size = measured_size(&data);
        if size > config.max_entry_bytes {
            return Err(CacheFailure::TooLarge {
                size,
                limit: config.max_entry_bytes,
            });
        }

        let mut raw = self.load_raw_store()?;

        // A key's timestamp never moves backwards, even if the wall clock does
        let now = self.clock.now_millis();
        let timestamp = raw
            .get(key)
            .and_then(|v| serde_json::from_value::<MetricEntry>(v.clone()).ok())
            .map(|prev| prev.timestamp.max(now))
            .unwrap_or(now);

        let entry = MetricEntry {
            data,
            timestamp,
            size,
        };
        let encoded = serde_json::to_value(&entry).map_err(CacheFailure::Encode)?;
        raw.insert(key.to_string(), encoded);
        self.persist_raw_store(&raw)
    }

    // == Clean Expired ==
    /// Sweeps the whole blob, removing expired entries and entries that no
    /// longer decode. Persists once after the sweep. Returns the number of
    /// entries removed.
    pub fn clean_expired(&mut self) -> usize {
        let config = self.config();
        let mut raw = match self.load_raw_store() {
            Ok(raw) => raw,
            Err(e) => {
                debug!(error = %e, "sweep skipped, store unreadable");
                return 0;
            }
        };

        let now = self.clock.now_millis();
        let before = raw.len();
        raw.retain(|key, value| {
            match serde_json::from_value::<MetricEntry>(value.clone()) {
                Ok(entry) => !entry.is_expired(now, config.ttl_millis),
                Err(_) => {
                    debug!(key, "dropping undecodable cache entry during sweep");
                    false
                }
            }
        });

        let removed = before - raw.len();
        if removed > 0 {
            if let Err(e) = self.persist_raw_store(&raw) {
                warn!(error = %e, "sweep result not persisted");
            }
        }
        removed
    }

    // == Clear All ==
    /// Replaces the blob with an empty map. Honored even while caching is
    /// disabled, so a bad cache state is always recoverable.
    pub fn clear_all(&mut self) {
        if let Err(e) = self.persist_raw_store(&HashMap::new()) {
            warn!(error = %e, "cache clear not persisted");
        }
    }

    // == Stats ==
    /// Diagnostic snapshot of the blob. Counts valid vs. expired entries
    /// (undecodable ones count as expired), sums recorded sizes, and lists
    /// every key present. Never evicts.
    pub fn stats(&self) -> CacheStats {
        let config = self.config();
        let raw = match self.load_raw_store() {
            Ok(raw) => raw,
            Err(e) => {
                debug!(error = %e, "stats over unreadable store");
                HashMap::new()
            }
        };

        let now = self.clock.now_millis();
        let mut stats = CacheStats {
            max_entry_bytes: config.max_entry_bytes,
            ..CacheStats::default()
        };

        for (key, value) in &raw {
            stats.keys.push(key.clone());
            match serde_json::from_value::<MetricEntry>(value.clone()) {
                Ok(entry) => {
                    stats.total_size_bytes += entry.size;
                    if entry.is_expired(now, config.ttl_millis) {
                        stats.expired_entries += 1;
                    } else {
                        stats.valid_entries += 1;
                    }
                }
                Err(_) => stats.expired_entries += 1,
            }
        }

        stats.keys.sort();
        stats
    }

    // == Blob Access ==
    /// Loads the raw key -> entry map. A blob that fails to parse entirely
    /// reads as empty; per-entry decoding happens at each use site so one
    /// bad entry cannot poison its siblings.
    pub(crate) fn load_raw_store(&self) -> Result<HashMap<String, Value>, CacheFailure> {
        let Some(text) = self.backend.get_item(STORE_SLOT)? else {
            return Ok(HashMap::new());
        };

        Ok(serde_json::from_str(&text).unwrap_or_else(|e| {
            debug!(error = %e, "store blob undecodable, treating as empty");
            HashMap::new()
        }))
    }

    pub(crate) fn persist_raw_store(
        &mut self,
        raw: &HashMap<String, Value>,
    ) -> Result<(), CacheFailure> {
        let text = serde_json::to_string(raw).map_err(CacheFailure::Encode)?;
        self.backend.set_item(STORE_SLOT, &text)?;
        Ok(())
    }

    pub(crate) fn backend(&self) -> &dyn StorageBackend {
        self.backend.as_ref()
    }

    pub(crate) fn backend_mut(&mut self) -> &mut dyn StorageBackend {
        self.backend.as_mut()
    }
}
