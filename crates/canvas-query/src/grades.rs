//! Course grade summaries.

use crate::assignments::list_assignments;
use crate::client::{fetch, CanvasApi};
use crate::courses::{get_course, list_active_courses};
use crate::types::{
    Assignment, AssignmentScore, CanvasResult, Course, Enrollment, EnrollmentGrades, GradeSummary,
    PAGE_SIZE,
};

const STUDENT_ENROLLMENT: &str = "StudentEnrollment";

/// Endpoint listing the current user's enrollments in a course.
pub fn enrollments_endpoint(course_id: u64) -> String {
    format!("courses/{course_id}/enrollments?user_id=self&per_page={PAGE_SIZE}")
}

pub async fn list_enrollments(api: &dyn CanvasApi, course_id: u64) -> CanvasResult<Vec<Enrollment>> {
    fetch(api, &enrollments_endpoint(course_id)).await
}

/// Grades from the student enrollment, falling back to any enrollment that carries grades.
pub fn student_grades(enrollments: &[Enrollment]) -> Option<&EnrollmentGrades> {
    enrollments
        .iter()
        .find(|e| e.enrollment_type == STUDENT_ENROLLMENT && e.grades.is_some())
        .or_else(|| enrollments.iter().find(|e| e.grades.is_some()))
        .and_then(|e| e.grades.as_ref())
}

pub fn assignment_scores(assignments: &[Assignment]) -> Vec<AssignmentScore> {
    assignments
        .iter()
        .map(|a| {
            let submission = a.submission.as_ref();
            AssignmentScore {
                assignment_id: a.id,
                name: a.name.clone(),
                score: submission.and_then(|s| s.score),
                grade: submission.and_then(|s| s.grade.clone()),
                points_possible: a.points_possible,
            }
        })
        .collect()
}

/// Build a course's grade summary from already-fetched records.
pub fn summarize(
    course: &Course,
    enrollments: &[Enrollment],
    assignments: Option<&[Assignment]>,
) -> GradeSummary {
    let grades = student_grades(enrollments);
    GradeSummary {
        course_id: course.id,
        course_name: course.name.clone(),
        current_grade: grades.and_then(|g| g.current_grade.clone()),
        current_score: grades.and_then(|g| g.current_score),
        assignments: assignments.map(assignment_scores),
    }
}

pub async fn course_grades(
    api: &dyn CanvasApi,
    course: &Course,
    include_assignments: bool,
) -> CanvasResult<GradeSummary> {
    let enrollments = list_enrollments(api, course.id).await?;
    let assignments = if include_assignments {
        Some(list_assignments(api, course.id, true).await?)
    } else {
        None
    };
    Ok(summarize(course, &enrollments, assignments.as_deref()))
}

/// Grade summaries for one course, or every active course when `course_id` is `None`.
pub async fn grade_summaries(
    api: &dyn CanvasApi,
    course_id: Option<u64>,
    include_assignments: bool,
) -> CanvasResult<Vec<GradeSummary>> {
    let courses = match course_id {
        Some(id) => vec![get_course(api, id).await?],
        None => list_active_courses(api).await?,
    };

    let mut summaries = Vec::with_capacity(courses.len());
    for course in &courses {
        summaries.push(course_grades(api, course, include_assignments).await?);
    }
    Ok(summaries)
}
