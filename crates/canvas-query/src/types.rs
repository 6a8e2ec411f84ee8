//! Core data types for Canvas courses, assignments, and grades.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fixed page size requested from every Canvas list endpoint.
pub const PAGE_SIZE: u32 = 100;

/// A course the current user is enrolled in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub course_code: String,
    #[serde(default)]
    pub enrollment_term_id: Option<u64>,
}

/// An assignment as returned by `courses/{id}/assignments`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub due_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub points_possible: Option<f64>,
    #[serde(default)]
    pub submission_types: Vec<String>,
    pub course_id: u64,
    #[serde(default)]
    pub html_url: String,
    /// Present only when requested with `include[]=submission`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submission: Option<Submission>,
}

/// The current user's submission for an assignment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub grade: Option<String>,
    #[serde(default)]
    pub workflow_state: Option<String>,
}

/// An enrollment record, carrying the computed course grade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enrollment {
    #[serde(rename = "type", default)]
    pub enrollment_type: String,
    #[serde(default)]
    pub grades: Option<EnrollmentGrades>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnrollmentGrades {
    #[serde(default)]
    pub current_grade: Option<String>,
    #[serde(default)]
    pub current_score: Option<f64>,
    #[serde(default)]
    pub final_grade: Option<String>,
    #[serde(default)]
    pub final_score: Option<f64>,
}

/// An assignment due inside the look-ahead window, annotated with its course.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpcomingAssignment {
    #[serde(flatten)]
    pub assignment: Assignment,
    pub course_name: String,
    pub days_until_due: i64,
}

/// A search hit, annotated with the owning course name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchMatch {
    #[serde(flatten)]
    pub assignment: Assignment,
    pub course_name: String,
}

/// Score and grade the user received on a single assignment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignmentScore {
    pub assignment_id: u64,
    pub name: String,
    pub score: Option<f64>,
    pub grade: Option<String>,
    pub points_possible: Option<f64>,
}

/// Per-course grade summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeSummary {
    pub course_id: u64,
    pub course_name: String,
    pub current_grade: Option<String>,
    pub current_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignments: Option<Vec<AssignmentScore>>,
}

/// Short form of an assignment that still needs a submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PendingAssignment {
    pub id: u64,
    pub name: String,
    pub due_at: Option<DateTime<Utc>>,
    pub points_possible: Option<f64>,
}

/// Submission progress for a single course.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseProgress {
    pub course_id: u64,
    pub course_name: String,
    pub course_code: String,
    pub grades: GradeSummary,
    pub total_assignments: usize,
    pub completed_assignments: usize,
    pub pending_assignments: usize,
    /// Percentage of assignments with a submission, rounded. Zero when the course has none.
    pub completion_rate: u32,
    pub pending: Vec<PendingAssignment>,
}

/// Errors raised by the Canvas client and query layer.
#[derive(Debug, thiserror::Error)]
pub enum CanvasError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Canvas API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl CanvasError {
    /// Build an API error from a non-success status and the raw response body.
    ///
    /// Canvas reports failures as `{"errors": [{"message": ..}]}` or
    /// `{"message": ..}`; anything else is passed through verbatim.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| {
                v.get("errors")
                    .and_then(|e| e.get(0))
                    .and_then(|e| e.get("message"))
                    .or_else(|| v.get("message"))
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| {
                let trimmed = body.trim();
                if trimmed.is_empty() {
                    format!("request failed with status {status}")
                } else {
                    trimmed.to_string()
                }
            });

        Self::Api { status, message }
    }
}

/// Convenience result type.
pub type CanvasResult<T> = Result<T, CanvasError>;
