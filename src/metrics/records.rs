//! Domain Records
//!
//! Raw record shapes as fetched from the document store. Documents carry
//! arbitrary extra fields; only the fields the aggregations use are
//! declared, and all but the identifiers are defaulted so sparsely filled
//! documents still decode.

use serde::{Deserialize, Serialize};

// == Job Posting ==
/// An internship/job posting ("práctica") offered on the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub area: String,
    /// Competencies the posting asks for
    #[serde(default)]
    pub competencies: Vec<String>,
}

// == Student Profile ==
/// A student account with its declared competencies and interest area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentProfile {
    pub id: String,
    #[serde(default)]
    pub area_of_interest: Option<String>,
    /// Competencies the student claims
    #[serde(default)]
    pub competencies: Vec<String>,
}

// == Application Event ==
/// One student applying to one posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationEvent {
    pub student_id: String,
    pub posting_id: String,
}
