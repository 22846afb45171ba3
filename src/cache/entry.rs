//! Metric Entry
//!
//! One stored (payload, timestamp, size) record for a single metric key.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// == Metric Entry ==
/// A single cached metric as it appears inside the persisted blob:
/// `{ "data": ..., "timestamp": epoch-ms, "size": bytes }`.
///
/// `size` is recorded at write time for diagnostics and the size guard;
/// blobs written before it existed decode with `size = 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricEntry {
    /// The computed metric payload
    pub data: Value,
    /// Write timestamp (Unix milliseconds)
    pub timestamp: u64,
    /// Serialized payload length in bytes at write time
    #[serde(default)]
    pub size: u64,
}

impl MetricEntry {
    /// Creates an entry, measuring the serialized size of `data`.
    pub fn new(data: Value, timestamp: u64) -> Self {
        let size = measured_size(&data);
        Self {
            data,
            timestamp,
            size,
        }
    }

    // == Is Expired ==
    /// True once `ttl_millis` has fully elapsed since the write.
    ///
    /// Boundary: an entry is expired when `now - timestamp >= ttl_millis`,
    /// so an entry written at `t0` with TTL `T` is still served at
    /// `t0 + T - 1` and gone at `t0 + T`.
    pub fn is_expired(&self, now_millis: u64, ttl_millis: u64) -> bool {
        now_millis.saturating_sub(self.timestamp) >= ttl_millis
    }
}

/// Byte length of `data` once serialized.
pub fn measured_size(data: &Value) -> u64 {
    serde_json::to_string(data).map(|s| s.len() as u64).unwrap_or(0)
}
