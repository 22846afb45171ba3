//! Configuration Module
//!
//! Service-level configuration loaded from environment variables. This is
//! distinct from the persisted [`crate::cache::CacheConfig`], which lives
//! in the storage backend and is adjustable at runtime over the API.

use std::env;
use std::path::PathBuf;

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible
/// defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the persisted cache slots
    pub storage_dir: PathBuf,
    /// HTTP server port
    pub server_port: u16,
    /// Background expiry-sweep interval in seconds
    pub cleanup_interval: u64,
    /// Optional JSON file seeding the in-memory document store
    pub seed_file: Option<PathBuf>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `STORAGE_DIR` - Cache slot directory (default: ./metrics-cache)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 60)
    /// - `SEED_FILE` - Document seed file (default: none)
    pub fn from_env() -> Self {
        Self {
            storage_dir: env::var("STORAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("metrics-cache")),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            cleanup_interval: env::var("CLEANUP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
            seed_file: env::var("SEED_FILE").ok().map(PathBuf::from),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from("metrics-cache"),
            server_port: 3000,
            cleanup_interval: 60,
            seed_file: None,
        }
    }
}
