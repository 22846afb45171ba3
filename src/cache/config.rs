//! Cache Configuration
//!
//! Persisted runtime settings for the metrics cache. The wire field names
//! (`duration`, `maxSize`) match the blob layout older deployments already
//! have on disk, so a config written by either version parses in both.

use serde::{Deserialize, Serialize};

/// Default TTL: 24 hours
pub const DEFAULT_TTL_MILLIS: u64 = 24 * 60 * 60 * 1000;

/// Default per-entry size ceiling: 4 MiB
pub const DEFAULT_MAX_ENTRY_BYTES: u64 = 4 * 1024 * 1024;

// == Cache Config ==
/// Process-wide cache settings.
///
/// Any field missing from the persisted blob decodes as its default, so a
/// partial or corrupt blob yields usable settings instead of an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Master switch; when false, reads miss and writes are dropped
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Entry lifetime in milliseconds, measured from its write timestamp
    #[serde(rename = "duration", default = "default_ttl_millis")]
    pub ttl_millis: u64,
    /// Ceiling on the serialized size of a single entry, in bytes
    #[serde(rename = "maxSize", default = "default_max_entry_bytes")]
    pub max_entry_bytes: u64,
}

fn default_enabled() -> bool {
    true
}

fn default_ttl_millis() -> u64 {
    DEFAULT_TTL_MILLIS
}

fn default_max_entry_bytes() -> u64 {
    DEFAULT_MAX_ENTRY_BYTES
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_millis: DEFAULT_TTL_MILLIS,
            max_entry_bytes: DEFAULT_MAX_ENTRY_BYTES,
        }
    }
}

// == Cache Config Patch ==
/// Partial update applied on top of the current config.
///
/// Fields left as `None` keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheConfigPatch {
    pub enabled: Option<bool>,
    pub ttl_millis: Option<u64>,
    pub max_entry_bytes: Option<u64>,
}

impl CacheConfigPatch {
    /// Merges this patch into `config`, field by field.
    pub fn apply(&self, config: &mut CacheConfig) {
        if let Some(enabled) = self.enabled {
            config.enabled = enabled;
        }
        if let Some(ttl_millis) = self.ttl_millis {
            config.ttl_millis = ttl_millis;
        }
        if let Some(max_entry_bytes) = self.max_entry_bytes {
            config.max_entry_bytes = max_entry_bytes;
        }
    }
}
