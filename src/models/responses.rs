//! Response DTOs for the metrics service API

use serde::Serialize;

use crate::cache::{CacheConfig, CacheStats};

/// Response body for GET and PATCH /cache/config
#[derive(Debug, Clone, Serialize)]
pub struct ConfigResponse {
    pub enabled: bool,
    pub ttl_millis: u64,
    pub max_entry_bytes: u64,
}

impl From<CacheConfig> for ConfigResponse {
    fn from(config: CacheConfig) -> Self {
        Self {
            enabled: config.enabled,
            ttl_millis: config.ttl_millis,
            max_entry_bytes: config.max_entry_bytes,
        }
    }
}

/// Response body for GET /cache/stats
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub valid_entries: usize,
    pub expired_entries: usize,
    pub total_entries: usize,
    pub total_size_bytes: u64,
    pub max_entry_bytes: u64,
    pub keys: Vec<String>,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            total_entries: stats.total_entries(),
            valid_entries: stats.valid_entries,
            expired_entries: stats.expired_entries,
            total_size_bytes: stats.total_size_bytes,
            max_entry_bytes: stats.max_entry_bytes,
            keys: stats.keys,
        }
    }
}

/// Response body for POST /cache/clean
#[derive(Debug, Clone, Serialize)]
pub struct CleanResponse {
    pub message: String,
    pub removed: usize,
}

impl CleanResponse {
    pub fn new(removed: usize) -> Self {
        Self {
            message: format!("Removed {} expired entries", removed),
            removed,
        }
    }
}

/// Response body for DELETE /cache
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    pub message: String,
}

impl ClearResponse {
    pub fn cleared() -> Self {
        Self {
            message: "Cache cleared".to_string(),
        }
    }
}

/// Response body for GET /health
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_response_from_config() {
        let resp = ConfigResponse::from(CacheConfig::default());
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"enabled\":true"));
        assert!(json.contains("ttl_millis"));
    }

    #[test]
    fn test_stats_response_totals() {
        let stats = CacheStats {
            valid_entries: 2,
            expired_entries: 1,
            total_size_bytes: 30,
            max_entry_bytes: 100,
            keys: vec!["a".into(), "b".into(), "c".into()],
        };

        let resp = StatsResponse::from(stats);
        assert_eq!(resp.total_entries, 3);
        assert_eq!(resp.keys.len(), 3);
    }

    #[test]
    fn test_clean_response_message() {
        let resp = CleanResponse::new(4);
        assert_eq!(resp.removed, 4);
        assert!(resp.message.contains('4'));
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }

    #[test]
    fn test_error_response_serialize() {
        let resp = ErrorResponse::new("Something went wrong");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("error"));
        assert!(json.contains("Something went wrong"));
    }
}
