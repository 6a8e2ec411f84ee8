//! Assignment listings for a single course.

use chrono::{DateTime, Utc};

use crate::client::{fetch, CanvasApi};
use crate::types::{Assignment, CanvasResult, PAGE_SIZE};

/// Endpoint listing a course's assignments, optionally embedding the user's submission.
pub fn assignments_endpoint(course_id: u64, with_submission: bool) -> String {
    if with_submission {
        format!("courses/{course_id}/assignments?include[]=submission&per_page={PAGE_SIZE}")
    } else {
        format!("courses/{course_id}/assignments?per_page={PAGE_SIZE}")
    }
}

pub async fn list_assignments(
    api: &dyn CanvasApi,
    course_id: u64,
    with_submission: bool,
) -> CanvasResult<Vec<Assignment>> {
    fetch(api, &assignments_endpoint(course_id, with_submission)).await
}

/// True when the assignment has a due date strictly before `now`.
pub fn is_past_due(assignment: &Assignment, now: DateTime<Utc>) -> bool {
    matches!(assignment.due_at, Some(due) if due < now)
}

/// Drop assignments whose due date has passed. Undated assignments are kept.
pub fn exclude_past(assignments: Vec<Assignment>, now: DateTime<Utc>) -> Vec<Assignment> {
    assignments
        .into_iter()
        .filter(|a| !is_past_due(a, now))
        .collect()
}

/// All assignments of a course, optionally without those already past due.
pub async fn course_assignments(
    api: &dyn CanvasApi,
    course_id: u64,
    include_past: bool,
    now: DateTime<Utc>,
) -> CanvasResult<Vec<Assignment>> {
    let assignments = list_assignments(api, course_id, false).await?;
    if include_past {
        Ok(assignments)
    } else {
        Ok(exclude_past(assignments, now))
    }
}
