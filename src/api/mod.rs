//! API Module
//!
//! HTTP handlers and routing for the metrics service REST API.
//!
//! # Endpoints
//! - `GET /metrics/competency-gap` - Offer/demand gap per competency
//! - `GET /metrics/areas-of-interest` - Students per area of interest
//! - `GET /metrics/application-load` - Applicants per posting
//! - `GET /cache/stats` - Cache diagnostics
//! - `GET /cache/config`, `PATCH /cache/config` - Cache configuration
//! - `POST /cache/clean` - Sweep expired entries
//! - `DELETE /cache` - Clear all cached metrics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
