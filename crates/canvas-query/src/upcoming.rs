//! Assignments due within a look-ahead window, across all active courses.

use chrono::{DateTime, Duration, Utc};

use crate::assignments::list_assignments;
use crate::client::CanvasApi;
use crate::courses::list_active_courses;
use crate::types::{Assignment, CanvasResult, UpcomingAssignment};

/// Default look-ahead window in days.
pub const DEFAULT_DAYS_AHEAD: u32 = 7;

/// Keep assignments due within `[now, now + days_ahead]` and annotate them with
/// the course name and whole days remaining.
///
/// A window reaching past the last representable date is open-ended.
pub fn select_upcoming(
    assignments: Vec<Assignment>,
    course_name: &str,
    now: DateTime<Utc>,
    days_ahead: u32,
) -> Vec<UpcomingAssignment> {
    let horizon = window_end(now, days_ahead);

    assignments
        .into_iter()
        .filter_map(|a| {
            let due = a.due_at?;
            if due < now || due > horizon {
                return None;
            }
            Some(UpcomingAssignment {
                days_until_due: (due - now).num_days(),
                course_name: course_name.to_string(),
                assignment: a,
            })
        })
        .collect()
}

fn window_end(now: DateTime<Utc>, days_ahead: u32) -> DateTime<Utc> {
    Duration::try_days(i64::from(days_ahead))
        .and_then(|d| now.checked_add_signed(d))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Sort ascending by due date. Ties keep their fetch order.
pub fn sort_by_due(items: &mut [UpcomingAssignment]) {
    items.sort_by_key(|u| u.assignment.due_at);
}

/// Upcoming assignments for every active course, soonest first.
///
/// Courses are queried one at a time.
pub async fn upcoming_assignments(
    api: &dyn CanvasApi,
    now: DateTime<Utc>,
    days_ahead: u32,
) -> CanvasResult<Vec<UpcomingAssignment>> {
    let courses = list_active_courses(api).await?;
    let mut upcoming = Vec::new();

    for course in &courses {
        let assignments = list_assignments(api, course.id, false).await?;
        upcoming.extend(select_upcoming(assignments, &course.name, now, days_ahead));
    }

    sort_by_due(&mut upcoming);
    tracing::debug!(
        "{} assignments due in the next {days_ahead} days across {} courses",
        upcoming.len(),
        courses.len()
    );
    Ok(upcoming)
}
