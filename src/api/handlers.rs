//! API Handlers
//!
//! HTTP request handlers for the metric and cache-maintenance endpoints.

use std::sync::Arc;
use tokio::sync::RwLock;

use axum::{extract::State, Json};

use crate::cache::MetricsCache;
use crate::documents::DocumentStore;
use crate::error::{ApiError, Result};
use crate::metrics::{ApplicationLoad, AreaCount, CompetencyGap, MetricsService};
use crate::models::{
    CleanResponse, ClearResponse, ConfigPatchRequest, ConfigResponse, HealthResponse,
    StatsResponse,
};

/// Application state shared across all handlers.
///
/// The cache is one explicit value behind Arc<RwLock<>>; every operation
/// completes its read-modify-write of the blob under the write lock.
#[derive(Clone)]
pub struct AppState {
    /// Shared metrics cache
    pub cache: Arc<RwLock<MetricsCache>>,
    /// Cached aggregation layer
    pub metrics: MetricsService,
}

impl AppState {
    /// Creates application state from a cache and a document store.
    pub fn new(cache: MetricsCache, documents: Arc<dyn DocumentStore>) -> Self {
        let cache = Arc::new(RwLock::new(cache));
        let metrics = MetricsService::new(cache.clone(), documents);
        Self { cache, metrics }
    }
}

/// Handler for GET /metrics/competency-gap
pub async fn competency_gap_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<CompetencyGap>>> {
    Ok(Json(state.metrics.competency_gap().await?))
}

/// Handler for GET /metrics/areas-of-interest
pub async fn areas_of_interest_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<AreaCount>>> {
    Ok(Json(state.metrics.areas_of_interest().await?))
}

/// Handler for GET /metrics/application-load
pub async fn application_load_handler(
    State(state): State<AppState>,
) -> Result<Json<ApplicationLoad>> {
    Ok(Json(state.metrics.application_load().await?))
}

/// Handler for GET /cache/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let cache = state.cache.read().await;
    Json(StatsResponse::from(cache.stats()))
}

/// Handler for GET /cache/config
pub async fn get_config_handler(State(state): State<AppState>) -> Json<ConfigResponse> {
    let cache = state.cache.read().await;
    Json(ConfigResponse::from(cache.config()))
}

/// Handler for PATCH /cache/config
///
/// Applies a partial update; omitted fields keep their current value.
pub async fn patch_config_handler(
    State(state): State<AppState>,
    Json(req): Json<ConfigPatchRequest>,
) -> Result<Json<ConfigResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    let mut cache = state.cache.write().await;
    cache.update_config(&req.into_patch());
    Ok(Json(ConfigResponse::from(cache.config())))
}

/// Handler for POST /cache/clean
///
/// Sweeps expired entries out of the persisted blob.
pub async fn clean_handler(State(state): State<AppState>) -> Json<CleanResponse> {
    let removed = state.cache.write().await.clean_expired();
    Json(CleanResponse::new(removed))
}

/// Handler for DELETE /cache
///
/// Clears every cached metric, even while caching is disabled.
pub async fn clear_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    state.cache.write().await.clear_all();
    Json(ClearResponse::cleared())
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
