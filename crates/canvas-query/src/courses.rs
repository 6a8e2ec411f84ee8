//! Course lookups.

use crate::client::{fetch, CanvasApi};
use crate::types::{CanvasResult, Course, PAGE_SIZE};

/// Endpoint listing the user's active courses.
pub fn active_courses_endpoint() -> String {
    format!("courses?enrollment_state=active&per_page={PAGE_SIZE}")
}

/// List all courses the user is actively enrolled in.
pub async fn list_active_courses(api: &dyn CanvasApi) -> CanvasResult<Vec<Course>> {
    let courses: Vec<Course> = fetch(api, &active_courses_endpoint()).await?;
    tracing::debug!("Fetched {} active courses", courses.len());
    Ok(courses)
}

/// Fetch a single course by ID.
pub async fn get_course(api: &dyn CanvasApi, course_id: u64) -> CanvasResult<Course> {
    fetch(api, &format!("courses/{course_id}")).await
}
