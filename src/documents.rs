//! Document Store Collaborator
//!
//! The aggregations read raw records from a document store (named
//! collections of plain JSON documents). The store is behind a trait so the
//! service can run against an in-memory stand-in; filtering and shaping
//! happen in the pure aggregation functions, so the only capability needed
//! here is "fetch everything in a collection".

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::RwLock;

// == Document Error ==
/// Failure fetching a collection from the backing store.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to fetch collection '{collection}': {reason}")]
    Fetch { collection: String, reason: String },
}

// == Document Store Trait ==
/// Capability to fetch all documents in a named collection.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Returns every document in `collection`. An unknown collection is
    /// empty, not an error.
    async fn fetch_collection(&self, collection: &str) -> Result<Vec<Value>, DocumentError>;
}

// == In-Memory Document Store ==
/// Seedable in-memory store used by the service binary and tests.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    collections: RwLock<HashMap<String, Vec<Value>>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from a JSON object mapping collection name to an
    /// array of documents. Non-array collection values are skipped.
    pub fn from_seed(seed: Value) -> Self {
        let mut collections = HashMap::new();
        if let Value::Object(map) = seed {
            for (name, docs) in map {
                if let Value::Array(docs) = docs {
                    collections.insert(name, docs);
                }
            }
        }
        Self {
            collections: RwLock::new(collections),
        }
    }

    /// Appends a document to a collection, creating it if needed.
    pub async fn insert(&self, collection: &str, document: Value) {
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .push(document);
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn fetch_collection(&self, collection: &str) -> Result<Vec<Value>, DocumentError> {
        Ok(self
            .collections
            .read()
            .await
            .get(collection)
            .cloned()
            .unwrap_or_default())
    }
}
