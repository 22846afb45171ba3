//! Metrics Module
//!
//! Dashboard aggregations, split the way the cache depends on: pure
//! `*_from_data` functions over already-fetched records, and a cached
//! service wrapper that fetches, computes, and memoizes.

mod aggregate;
mod records;
mod service;

pub use aggregate::{
    application_load_from_data, areas_of_interest_from_data, competency_gap_from_data,
    ApplicationLoad, AreaCount, CompetencyGap, PostingApplicants,
};
pub use records::{ApplicationEvent, JobPosting, StudentProfile};
pub use service::{cache_keys, collections, MetricsService};
