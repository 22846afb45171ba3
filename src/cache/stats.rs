//! Cache Statistics
//!
//! Read-only diagnostic aggregate over the persisted store blob.

use serde::Serialize;

// == Cache Stats ==
/// Snapshot of the store at stat time. Taking a snapshot never evicts;
/// expired keys still appear in `keys` until a read or sweep removes them.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Entries whose TTL has not yet elapsed
    pub valid_entries: usize,
    /// Entries past their TTL, plus entries that no longer decode
    pub expired_entries: usize,
    /// Sum of recorded entry sizes (entries without a size contribute zero)
    pub total_size_bytes: u64,
    /// Current per-entry ceiling from the active config
    pub max_entry_bytes: u64,
    /// Every key present in the blob, expired or not, sorted
    pub keys: Vec<String>,
}

impl CacheStats {
    /// Total number of keys present in the blob.
    pub fn total_entries(&self) -> usize {
        self.valid_entries + self.expired_entries
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_default_is_empty() {
        let stats = CacheStats::default();
        assert_eq!(stats.total_entries(), 0);
        assert!(stats.keys.is_empty());
        assert_eq!(stats.total_size_bytes, 0);
    }

    #[test]
    fn test_stats_total_entries_sums_both_buckets() {
        let stats = CacheStats {
            valid_entries: 3,
            expired_entries: 2,
            ..CacheStats::default()
        };
        assert_eq!(stats.total_entries(), 5);
    }

    #[test]
    fn test_stats_serializes_all_fields() {
        let stats = CacheStats {
            valid_entries: 1,
            expired_entries: 0,
            total_size_bytes: 64,
            max_entry_bytes: 1024,
            keys: vec!["areas_of_interest".to_string()],
        };

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["valid_entries"], 1);
        assert_eq!(json["total_size_bytes"], 64);
        assert_eq!(json["keys"][0], "areas_of_interest");
    }
}
