//! Integration Tests for Cache Persistence
//!
//! Exercises the metrics cache against the file backend: survival across
//! reopen, the legacy-slot migration, and resilience to corrupt on-disk
//! blobs.

use std::sync::Arc;

use serde_json::json;
use tempfile::TempDir;

use workin_metrics::cache::{CacheConfigPatch, MetricsCache};
use workin_metrics::clock::ManualClock;
use workin_metrics::storage::{FileBackend, StorageBackend};

fn open_cache(dir: &TempDir, clock: &ManualClock) -> MetricsCache {
    let backend = FileBackend::new(dir.path()).unwrap();
    MetricsCache::new(Box::new(backend), Arc::new(clock.clone()))
}

#[test]
fn test_entries_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let clock = ManualClock::starting_at(1_000_000);

    {
        let mut cache = open_cache(&dir, &clock);
        assert!(cache.set_metrics("areas_of_interest", &json!([{"name": "Programming", "value": 42}])));
    }

    let mut cache = open_cache(&dir, &clock);
    assert_eq!(
        cache.get_metrics("areas_of_interest").unwrap(),
        json!([{"name": "Programming", "value": 42}])
    );
}

#[test]
fn test_config_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let clock = ManualClock::starting_at(0);

    {
        let mut cache = open_cache(&dir, &clock);
        cache.update_config(&CacheConfigPatch {
            ttl_millis: Some(5_000),
            ..CacheConfigPatch::default()
        });
    }

    let cache = open_cache(&dir, &clock);
    assert_eq!(cache.config().ttl_millis, 5_000);
}

#[test]
fn test_ttl_applies_across_reopen() {
    let dir = TempDir::new().unwrap();
    let clock = ManualClock::starting_at(1_000_000);

    {
        let mut cache = open_cache(&dir, &clock);
        cache.update_config(&CacheConfigPatch {
            ttl_millis: Some(1_000),
            ..CacheConfigPatch::default()
        });
        assert!(cache.set_metrics("gap", &json!(1)));
    }

    clock.advance(1_000);
    let mut cache = open_cache(&dir, &clock);
    assert!(cache.get_metrics("gap").is_none());
}

#[test]
fn test_legacy_slots_migrate_on_disk() {
    let dir = TempDir::new().unwrap();
    let clock = ManualClock::starting_at(1_000);

    {
        let mut backend = FileBackend::new(dir.path()).unwrap();
        backend
            .set_item(
                "metric_cache_x",
                r#"{"data": 1, "timestamp": 500, "size": 10}"#,
            )
            .unwrap();
    }

    let mut cache = open_cache(&dir, &clock);
    assert_eq!(cache.migrate_legacy_slots(), 1);
    assert_eq!(cache.get_metrics("x").unwrap(), json!(1));

    // A second run (fresh handle, same directory) finds nothing to do
    let mut cache = open_cache(&dir, &clock);
    assert_eq!(cache.migrate_legacy_slots(), 0);
    assert_eq!(cache.stats().keys, vec!["x".to_string()]);
}

#[test]
fn test_corrupt_blob_on_disk_degrades_to_empty() {
    let dir = TempDir::new().unwrap();
    let clock = ManualClock::starting_at(0);

    std::fs::write(dir.path().join("cache_metrics.json"), "{ truncated").unwrap();

    let mut cache = open_cache(&dir, &clock);
    assert!(cache.get_metrics("anything").is_none());
    assert_eq!(cache.stats().total_entries(), 0);

    // Writing through the corrupt blob replaces it with a valid one
    assert!(cache.set_metrics("fresh", &json!(2)));
    assert_eq!(cache.get_metrics("fresh").unwrap(), json!(2));
}
