//! Pure Aggregations
//!
//! Each function here is deterministic and does no I/O: it takes
//! already-fetched record slices and returns a serializable, chart-ready
//! summary. The cache's correctness rests on this determinism, since a
//! memoized result can only be invalidated by TTL. Result orderings are
//! fully specified (count descending, then name) so equal inputs always
//! produce byte-equal payloads.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::metrics::records::{ApplicationEvent, JobPosting, StudentProfile};

// == Competency Gap ==
/// Demand vs. supply for one competency across the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetencyGap {
    pub competency: String,
    /// Postings asking for this competency
    pub demand: u64,
    /// Students claiming this competency
    pub supply: u64,
    /// demand - supply; positive means under-supplied
    pub gap: i64,
}

/// Computes the offer/demand gap per competency.
///
/// A competency listed twice by the same posting or student counts once
/// for that record. Competencies appearing on either side are included.
pub fn competency_gap_from_data(
    postings: &[JobPosting],
    students: &[StudentProfile],
) -> Vec<CompetencyGap> {
    let mut demand: BTreeMap<String, u64> = BTreeMap::new();
    for posting in postings {
        let unique: HashSet<&str> = posting.competencies.iter().map(String::as_str).collect();
        for competency in unique {
            *demand.entry(competency.to_string()).or_default() += 1;
        }
    }

    let mut supply: BTreeMap<String, u64> = BTreeMap::new();
    for student in students {
        let unique: HashSet<&str> = student.competencies.iter().map(String::as_str).collect();
        for competency in unique {
            *supply.entry(competency.to_string()).or_default() += 1;
        }
    }

    let names: HashSet<String> = demand.keys().chain(supply.keys()).cloned().collect();
    let mut gaps: Vec<CompetencyGap> = names
        .into_iter()
        .map(|competency| {
            let demand = demand.get(&competency).copied().unwrap_or(0);
            let supply = supply.get(&competency).copied().unwrap_or(0);
            CompetencyGap {
                gap: demand as i64 - supply as i64,
                competency,
                demand,
                supply,
            }
        })
        .collect();

    gaps.sort_by(|a, b| b.gap.cmp(&a.gap).then_with(|| a.competency.cmp(&b.competency)));
    gaps
}

// == Area Of Interest Distribution ==
/// Number of students declaring a given area of interest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaCount {
    pub name: String,
    pub value: u64,
}

/// Counts students per declared area of interest. Students without one
/// (or with an empty one) are skipped.
pub fn areas_of_interest_from_data(students: &[StudentProfile]) -> Vec<AreaCount> {
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for student in students {
        if let Some(area) = student.area_of_interest.as_deref() {
            if !area.is_empty() {
                *counts.entry(area.to_string()).or_default() += 1;
            }
        }
    }

    let mut areas: Vec<AreaCount> = counts
        .into_iter()
        .map(|(name, value)| AreaCount { name, value })
        .collect();
    areas.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| a.name.cmp(&b.name)));
    areas
}

// == Application Load ==
/// Applicant count for one posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingApplicants {
    pub posting_id: String,
    pub title: String,
    pub applicants: u64,
}

/// Students-per-offer summary across all postings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationLoad {
    pub total_postings: u64,
    pub total_applications: u64,
    /// total_applications / total_postings, 0.0 with no postings
    pub average_per_posting: f64,
    pub per_posting: Vec<PostingApplicants>,
}

/// Counts applications per posting. Events referencing a posting that is
/// not in `postings` are skipped, so the totals stay consistent with the
/// per-posting list.
pub fn application_load_from_data(
    postings: &[JobPosting],
    events: &[ApplicationEvent],
) -> ApplicationLoad {
    let mut counts: BTreeMap<&str, u64> = postings
        .iter()
        .map(|posting| (posting.id.as_str(), 0))
        .collect();

    let mut total_applications = 0u64;
    for event in events {
        if let Some(count) = counts.get_mut(event.posting_id.as_str()) {
            *count += 1;
            total_applications += 1;
        }
    }

    let mut per_posting: Vec<PostingApplicants> = postings
        .iter()
        .map(|posting| PostingApplicants {
            posting_id: posting.id.clone(),
            title: posting.title.clone(),
            applicants: counts.get(posting.id.as_str()).copied().unwrap_or(0),
        })
        .collect();
    per_posting.sort_by(|a, b| {
        b.applicants
            .cmp(&a.applicants)
            .then_with(|| a.title.cmp(&b.title))
            .then_with(|| a.posting_id.cmp(&b.posting_id))
    });

    let total_postings = postings.len() as u64;
    let average_per_posting = if total_postings == 0 {
        0.0
    } else {
        total_applications as f64 / total_postings as f64
    };

    ApplicationLoad {
        total_postings,
        total_applications,
        average_per_posting,
        per_posting,
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn posting(id: &str, title: &str, competencies: &[&str]) -> JobPosting {
        JobPosting {
            id: id.to_string(),
            title: title.to_string(),
            area: String::new(),
            competencies: competencies.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn student(id: &str, area: Option<&str>, competencies: &[&str]) -> StudentProfile {
        StudentProfile {
            id: id.to_string(),
            area_of_interest: area.map(str::to_string),
            competencies: competencies.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn event(student_id: &str, posting_id: &str) -> ApplicationEvent {
        ApplicationEvent {
            student_id: student_id.to_string(),
            posting_id: posting_id.to_string(),
        }
    }

    #[test]
    fn test_competency_gap_counts_and_ordering() {
        let postings = vec![
            posting("p1", "Backend", &["Rust", "SQL"]),
            posting("p2", "Data", &["SQL", "Python"]),
        ];
        let students = vec![
            student("u1", None, &["SQL"]),
            student("u2", None, &["Python", "Excel"]),
        ];

        let gaps = competency_gap_from_data(&postings, &students);

        // Rust: 1-0, SQL: 2-1, Python: 1-1, Excel: 0-1
        assert_eq!(gaps[0], CompetencyGap { competency: "Rust".into(), demand: 1, supply: 0, gap: 1 });
        assert_eq!(gaps[1], CompetencyGap { competency: "SQL".into(), demand: 2, supply: 1, gap: 1 });
        assert_eq!(gaps[2], CompetencyGap { competency: "Python".into(), demand: 1, supply: 1, gap: 0 });
        assert_eq!(gaps[3], CompetencyGap { competency: "Excel".into(), demand: 0, supply: 1, gap: -1 });
    }

    #[test]
    fn test_competency_gap_dedupes_within_record() {
        let postings = vec![posting("p1", "Backend", &["Rust", "Rust"])];
        let gaps = competency_gap_from_data(&postings, &[]);
        assert_eq!(gaps.len(), 1);
        assert_eq!(gaps[0].demand, 1);
    }

    #[test]
    fn test_competency_gap_empty_inputs() {
        assert!(competency_gap_from_data(&[], &[]).is_empty());
    }

    #[test]
    fn test_competency_gap_is_deterministic() {
        let postings = vec![posting("p1", "A", &["X", "Y", "Z"])];
        let students = vec![student("u1", None, &["Y"])];

        let first = competency_gap_from_data(&postings, &students);
        let second = competency_gap_from_data(&postings, &students);
        assert_eq!(first, second);
    }

    #[test]
    fn test_areas_of_interest_distribution() {
        let students = vec![
            student("u1", Some("Programming"), &[]),
            student("u2", Some("Programming"), &[]),
            student("u3", Some("Design"), &[]),
            student("u4", None, &[]),
            student("u5", Some(""), &[]),
        ];

        let areas = areas_of_interest_from_data(&students);
        assert_eq!(
            areas,
            vec![
                AreaCount { name: "Programming".into(), value: 2 },
                AreaCount { name: "Design".into(), value: 1 },
            ]
        );
    }

    #[test]
    fn test_areas_ties_break_by_name() {
        let students = vec![
            student("u1", Some("Design"), &[]),
            student("u2", Some("Analytics"), &[]),
        ];

        let areas = areas_of_interest_from_data(&students);
        assert_eq!(areas[0].name, "Analytics");
        assert_eq!(areas[1].name, "Design");
    }

    #[test]
    fn test_application_load_counts_per_posting() {
        let postings = vec![
            posting("p1", "Backend", &[]),
            posting("p2", "Data", &[]),
        ];
        let events = vec![
            event("u1", "p1"),
            event("u2", "p1"),
            event("u3", "p2"),
            event("u4", "deleted_posting"),
        ];

        let load = application_load_from_data(&postings, &events);
        assert_eq!(load.total_postings, 2);
        // The event against the unknown posting is skipped
        assert_eq!(load.total_applications, 3);
        assert!((load.average_per_posting - 1.5).abs() < f64::EPSILON);
        assert_eq!(load.per_posting[0].posting_id, "p1");
        assert_eq!(load.per_posting[0].applicants, 2);
        assert_eq!(load.per_posting[1].applicants, 1);
    }

    #[test]
    fn test_application_load_no_postings() {
        let load = application_load_from_data(&[], &[event("u1", "p1")]);
        assert_eq!(load.total_postings, 0);
        assert_eq!(load.total_applications, 0);
        assert_eq!(load.average_per_posting, 0.0);
        assert!(load.per_posting.is_empty());
    }

    #[test]
    fn test_application_load_lists_postings_without_applicants() {
        let load = application_load_from_data(&[posting("p1", "Quiet", &[])], &[]);
        assert_eq!(load.per_posting.len(), 1);
        assert_eq!(load.per_posting[0].applicants, 0);
    }
}
