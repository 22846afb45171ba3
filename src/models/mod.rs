//! Request and Response models for the metrics service API
//!
//! DTOs used for serializing/deserializing HTTP request and response
//! bodies. Metric results themselves serialize directly from the
//! aggregation types.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::ConfigPatchRequest;
pub use responses::{
    CleanResponse, ClearResponse, ConfigResponse, ErrorResponse, HealthResponse, StatsResponse,
};
