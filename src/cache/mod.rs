//! Metrics Cache Module
//!
//! Persisted TTL memoization layer for computed dashboard metrics. All
//! entries live in one JSON blob under [`STORE_SLOT`]; runtime settings live
//! in a second blob under [`CONFIG_SLOT`]. Storage and serialization
//! failures never escape the public operations: reads degrade to misses,
//! writes to no-ops.

mod config;
mod entry;
mod migrate;
mod stats;
mod store;


// Re-export public types
pub use config::{CacheConfig, CacheConfigPatch};
pub use entry::MetricEntry;
pub use stats::CacheStats;
pub use store::MetricsCache;

// == Public Constants ==
/// Slot holding the aggregated key -> entry blob
pub const STORE_SLOT: &str = "cache_metrics";

/// Slot holding the persisted cache configuration
pub const CONFIG_SLOT: &str = "cache_config";

/// Prefix of the per-metric slots used by older deployments
pub const LEGACY_SLOT_PREFIX: &str = "metric_cache_";
