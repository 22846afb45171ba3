//! API Routes
//!
//! Configures the Axum router with all metrics service endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    application_load_handler, areas_of_interest_handler, clean_handler, clear_handler,
    competency_gap_handler, get_config_handler, health_handler, patch_config_handler,
    stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /metrics/competency-gap` - Offer/demand gap per competency
/// - `GET /metrics/areas-of-interest` - Students per area of interest
/// - `GET /metrics/application-load` - Applicants per posting
/// - `GET /cache/stats` - Cache diagnostics
/// - `GET /cache/config` - Current cache configuration
/// - `PATCH /cache/config` - Partial cache configuration update
/// - `POST /cache/clean` - Sweep expired entries
/// - `DELETE /cache` - Clear all cached metrics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin (the dashboard runs on a separate origin)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/metrics/competency-gap", get(competency_gap_handler))
        .route("/metrics/areas-of-interest", get(areas_of_interest_handler))
        .route("/metrics/application-load", get(application_load_handler))
        .route("/cache/stats", get(stats_handler))
        .route(
            "/cache/config",
            get(get_config_handler).patch(patch_config_handler),
        )
        .route("/cache/clean", post(clean_handler))
        .route("/cache", delete(clear_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
