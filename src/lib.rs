//! WorkIn Metrics - dashboard metrics service with a persisted TTL cache
//!
//! Aggregates employability-platform records into chart-ready summaries
//! and memoizes them in a persisted, TTL-bounded cache that degrades to
//! recomputation rather than erroring.

pub mod api;
pub mod cache;
pub mod clock;
pub mod config;
pub mod documents;
pub mod error;
pub mod metrics;
pub mod models;
pub mod storage;
pub mod tasks;

pub use api::AppState;
pub use cache::MetricsCache;
pub use config::Config;
pub use tasks::spawn_cleanup_task;
