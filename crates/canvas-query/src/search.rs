//! Case-insensitive assignment search by assignment or course name.

use crate::assignments::list_assignments;
use crate::client::CanvasApi;
use crate::courses::{get_course, list_active_courses};
use crate::types::{Assignment, CanvasError, CanvasResult, SearchMatch};

/// True when `needle` (already lowercased) occurs in either name.
pub fn matches_query(assignment_name: &str, course_name: &str, needle: &str) -> bool {
    assignment_name.to_lowercase().contains(needle) || course_name.to_lowercase().contains(needle)
}

/// Filter one course's assignments against a search query.
pub fn filter_matches(assignments: Vec<Assignment>, course_name: &str, query: &str) -> Vec<SearchMatch> {
    let needle = query.to_lowercase();
    assignments
        .into_iter()
        .filter(|a| matches_query(&a.name, course_name, &needle))
        .map(|a| SearchMatch {
            assignment: a,
            course_name: course_name.to_string(),
        })
        .collect()
}

/// Search a single course, or every active course when `course_id` is `None`.
pub async fn search_assignments(
    api: &dyn CanvasApi,
    query: &str,
    course_id: Option<u64>,
) -> CanvasResult<Vec<SearchMatch>> {
    let query = query.trim();
    if query.is_empty() {
        return Err(CanvasError::InvalidInput("search query must not be empty".to_string()));
    }

    let courses = match course_id {
        Some(id) => vec![get_course(api, id).await?],
        None => list_active_courses(api).await?,
    };

    let mut results = Vec::new();
    for course in &courses {
        let assignments = list_assignments(api, course.id, false).await?;
        results.extend(filter_matches(assignments, &course.name, query));
    }

    tracing::debug!("Search '{query}' matched {} assignments", results.len());
    Ok(results)
}
