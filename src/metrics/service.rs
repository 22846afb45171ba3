//! Metrics Service
//!
//! Cached wrappers around the pure aggregations. Each getter follows the
//! same two-phase contract: ask the cache under a fixed key; on a miss,
//! fetch the raw collections, run the pure half, memoize the result, and
//! return it. A cache that is disabled or broken only costs a recompute;
//! only a collaborator fetch failure surfaces as an error.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::MetricsCache;
use crate::documents::{DocumentError, DocumentStore};
use crate::metrics::aggregate::{
    application_load_from_data, areas_of_interest_from_data, competency_gap_from_data,
    ApplicationLoad, AreaCount, CompetencyGap,
};
use crate::metrics::records::{ApplicationEvent, JobPosting, StudentProfile};

// == Cache Keys ==
/// Fixed cache keys, one per aggregation.
pub mod cache_keys {
    pub const COMPETENCY_GAP: &str = "competency_gap";
    pub const AREAS_OF_INTEREST: &str = "areas_of_interest";
    pub const APPLICATION_LOAD: &str = "application_load";
}

// == Collections ==
/// Collection names in the document store.
pub mod collections {
    pub const PRACTICES: &str = "practices";
    pub const USERS: &str = "users";
    pub const APPLICATIONS: &str = "applications";
}

// == Metrics Service ==
/// Computes dashboard metrics through the cache.
#[derive(Clone)]
pub struct MetricsService {
    cache: Arc<RwLock<MetricsCache>>,
    documents: Arc<dyn DocumentStore>,
}

impl MetricsService {
    pub fn new(cache: Arc<RwLock<MetricsCache>>, documents: Arc<dyn DocumentStore>) -> Self {
        Self { cache, documents }
    }

    // == Competency Gap ==
    pub async fn competency_gap(&self) -> Result<Vec<CompetencyGap>, DocumentError> {
        if let Some(cached) = self.cached(cache_keys::COMPETENCY_GAP).await {
            return Ok(cached);
        }

        let postings: Vec<JobPosting> = self.fetch_records(collections::PRACTICES).await?;
        let students: Vec<StudentProfile> = self.fetch_records(collections::USERS).await?;
        let result = competency_gap_from_data(&postings, &students);

        self.memoize(cache_keys::COMPETENCY_GAP, &result).await;
        Ok(result)
    }

    // == Areas Of Interest ==
    pub async fn areas_of_interest(&self) -> Result<Vec<AreaCount>, DocumentError> {
        if let Some(cached) = self.cached(cache_keys::AREAS_OF_INTEREST).await {
            return Ok(cached);
        }

        let students: Vec<StudentProfile> = self.fetch_records(collections::USERS).await?;
        let result = areas_of_interest_from_data(&students);

        self.memoize(cache_keys::AREAS_OF_INTEREST, &result).await;
        Ok(result)
    }

    // == Application Load ==
    pub async fn application_load(&self) -> Result<ApplicationLoad, DocumentError> {
        if let Some(cached) = self.cached(cache_keys::APPLICATION_LOAD).await {
            return Ok(cached);
        }

        let postings: Vec<JobPosting> = self.fetch_records(collections::PRACTICES).await?;
        let events: Vec<ApplicationEvent> = self.fetch_records(collections::APPLICATIONS).await?;
        let result = application_load_from_data(&postings, &events);

        self.memoize(cache_keys::APPLICATION_LOAD, &result).await;
        Ok(result)
    }

    // == Helpers ==
    async fn cached<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.cache.write().await.get_as(key)
    }

    async fn memoize<T: serde::Serialize>(&self, key: &str, value: &T) {
        // A dropped write just means the next call recomputes
        if !self.cache.write().await.set_metrics(key, value) {
            debug!(key, "metric result not memoized");
        }
    }

    /// Fetches a collection and decodes each document, skipping documents
    /// that do not match the expected record shape.
    async fn fetch_records<T: DeserializeOwned>(
        &self,
        collection: &str,
    ) -> Result<Vec<T>, DocumentError> {
        let docs = self.documents.fetch_collection(collection).await?;
        let total = docs.len();

        let records: Vec<T> = docs
            .into_iter()
            .filter_map(|doc| serde_json::from_value(doc).ok())
            .collect();
        if records.len() < total {
            debug!(
                collection,
                skipped = total - records.len(),
                "skipped malformed documents"
            );
        }
        Ok(records)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheConfigPatch;
    use crate::clock::ManualClock;
    use crate::documents::InMemoryDocumentStore;
    use crate::storage::MemoryBackend;
    use serde_json::json;

    struct FailingStore;

    #[async_trait::async_trait]
    impl DocumentStore for FailingStore {
        async fn fetch_collection(
            &self,
            collection: &str,
        ) -> Result<Vec<serde_json::Value>, DocumentError> {
            Err(DocumentError::Fetch {
                collection: collection.to_string(),
                reason: "backend offline".to_string(),
            })
        }
    }

    fn service_with(
        documents: Arc<dyn DocumentStore>,
    ) -> (MetricsService, Arc<RwLock<MetricsCache>>, ManualClock) {
        let clock = ManualClock::starting_at(1_000_000);
        let cache = Arc::new(RwLock::new(MetricsCache::new(
            Box::new(MemoryBackend::new()),
            Arc::new(clock.clone()),
        )));
        (MetricsService::new(cache.clone(), documents), cache, clock)
    }

    async fn seeded_store() -> Arc<InMemoryDocumentStore> {
        let store = Arc::new(InMemoryDocumentStore::new());
        store
            .insert(
                collections::PRACTICES,
                json!({"id": "p1", "title": "Backend", "competencies": ["Rust"]}),
            )
            .await;
        store
            .insert(
                collections::USERS,
                json!({"id": "u1", "area_of_interest": "Programming", "competencies": []}),
            )
            .await;
        store
            .insert(
                collections::APPLICATIONS,
                json!({"student_id": "u1", "posting_id": "p1"}),
            )
            .await;
        store
    }

    #[tokio::test]
    async fn test_competency_gap_computes_and_memoizes() {
        let store = seeded_store().await;
        let (service, cache, _clock) = service_with(store.clone());

        let gaps = service.competency_gap().await.unwrap();
        assert_eq!(gaps.len(), 1);
        assert_eq!(gaps[0].competency, "Rust");
        assert_eq!(gaps[0].gap, 1);

        // Result landed in the cache under its fixed key
        let cached: Vec<CompetencyGap> = cache
            .write()
            .await
            .get_as(cache_keys::COMPETENCY_GAP)
            .unwrap();
        assert_eq!(cached, gaps);
    }

    #[tokio::test]
    async fn test_cache_hit_skips_the_document_store() {
        let store = seeded_store().await;
        let (service, _cache, _clock) = service_with(store.clone());

        let first = service.areas_of_interest().await.unwrap();

        // New data after the first computation is not visible until TTL
        store
            .insert(
                collections::USERS,
                json!({"id": "u2", "area_of_interest": "Design"}),
            )
            .await;

        let second = service.areas_of_interest().await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_ttl_expiry_triggers_recompute() {
        let store = seeded_store().await;
        let (service, cache, clock) = service_with(store.clone());
        cache.write().await.update_config(&CacheConfigPatch {
            ttl_millis: Some(1_000),
            ..CacheConfigPatch::default()
        });

        let first = service.areas_of_interest().await.unwrap();
        assert_eq!(first.len(), 1);

        store
            .insert(
                collections::USERS,
                json!({"id": "u2", "area_of_interest": "Design"}),
            )
            .await;
        clock.advance(1_000);

        let second = service.areas_of_interest().await.unwrap();
        assert_eq!(second.len(), 2);
    }

    #[tokio::test]
    async fn test_disabled_cache_still_serves_metrics() {
        let store = seeded_store().await;
        let (service, cache, _clock) = service_with(store);
        cache.write().await.update_config(&CacheConfigPatch {
            enabled: Some(false),
            ..CacheConfigPatch::default()
        });

        let load = service.application_load().await.unwrap();
        assert_eq!(load.total_applications, 1);
        assert!(cache.write().await.stats().keys.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_failure_propagates() {
        let (service, _cache, _clock) = service_with(Arc::new(FailingStore));

        let result = service.competency_gap().await;
        assert!(matches!(result, Err(DocumentError::Fetch { .. })));
    }

    #[tokio::test]
    async fn test_malformed_documents_are_skipped() {
        let store = Arc::new(InMemoryDocumentStore::new());
        store
            .insert(collections::USERS, json!({"id": "u1", "area_of_interest": "Programming"}))
            .await;
        store
            .insert(collections::USERS, json!({"no_id_field": true}))
            .await;
        let (service, _cache, _clock) = service_with(store);

        let areas = service.areas_of_interest().await.unwrap();
        assert_eq!(areas.len(), 1);
        assert_eq!(areas[0].value, 1);
    }
}
