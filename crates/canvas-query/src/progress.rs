//! Per-course submission progress.

use crate::assignments::list_assignments;
use crate::client::CanvasApi;
use crate::courses::get_course;
use crate::grades::{list_enrollments, summarize};
use crate::types::{Assignment, CanvasResult, Course, CourseProgress, Enrollment, PendingAssignment};

/// Rounded completion percentage. A course with no assignments reports 0.
pub fn completion_rate(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((completed as f64 / total as f64) * 100.0).round() as u32
}

/// An assignment counts as completed once a submission timestamp exists.
pub fn is_completed(assignment: &Assignment) -> bool {
    assignment
        .submission
        .as_ref()
        .and_then(|s| s.submitted_at)
        .is_some()
}

pub fn build_progress(
    course: &Course,
    enrollments: &[Enrollment],
    assignments: &[Assignment],
) -> CourseProgress {
    let (completed, pending): (Vec<&Assignment>, Vec<&Assignment>) =
        assignments.iter().partition(|a| is_completed(a));

    let total = assignments.len();
    CourseProgress {
        course_id: course.id,
        course_name: course.name.clone(),
        course_code: course.course_code.clone(),
        grades: summarize(course, enrollments, None),
        total_assignments: total,
        completed_assignments: completed.len(),
        pending_assignments: pending.len(),
        completion_rate: completion_rate(completed.len(), total),
        pending: pending
            .into_iter()
            .map(|a| PendingAssignment {
                id: a.id,
                name: a.name.clone(),
                due_at: a.due_at,
                points_possible: a.points_possible,
            })
            .collect(),
    }
}

/// Fetch course, enrollments, and assignments concurrently and compute progress.
pub async fn course_progress(api: &dyn CanvasApi, course_id: u64) -> CanvasResult<CourseProgress> {
    let (course, enrollments, assignments) = tokio::try_join!(
        get_course(api, course_id),
        list_enrollments(api, course_id),
        list_assignments(api, course_id, true),
    )?;

    let progress = build_progress(&course, &enrollments, &assignments);
    tracing::debug!(
        "Course {course_id}: {}/{} assignments submitted",
        progress.completed_assignments,
        progress.total_assignments
    );
    Ok(progress)
}
