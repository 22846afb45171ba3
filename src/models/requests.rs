//! Request DTOs for the metrics service API

use serde::Deserialize;

use crate::cache::CacheConfigPatch;

/// Request body for PATCH /cache/config
///
/// Any subset of fields may be supplied; omitted fields keep their
/// current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigPatchRequest {
    /// Toggle caching on or off
    pub enabled: Option<bool>,
    /// Entry lifetime in milliseconds
    pub ttl_millis: Option<u64>,
    /// Per-entry size ceiling in bytes
    pub max_entry_bytes: Option<u64>,
}

impl ConfigPatchRequest {
    /// Validates the request data.
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.ttl_millis == Some(0) {
            return Some("ttl_millis must be greater than zero".to_string());
        }
        if self.max_entry_bytes == Some(0) {
            return Some("max_entry_bytes must be greater than zero".to_string());
        }
        None
    }

    pub fn into_patch(self) -> CacheConfigPatch {
        CacheConfigPatch {
            enabled: self.enabled,
            ttl_millis: self.ttl_millis,
            max_entry_bytes: self.max_entry_bytes,
        }
    }
}
