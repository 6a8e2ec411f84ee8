//! canvas-query: Canvas LMS client and query layer for courses, assignments, grades, and progress.

pub mod assignments;
pub mod client;
pub mod courses;
pub mod grades;
pub mod progress;
pub mod search;
pub mod types;
pub mod upcoming;

pub use assignments::course_assignments;
pub use client::{CanvasApi, CanvasClient, ClientConfig, DEFAULT_BASE_URL};
pub use courses::list_active_courses;
pub use grades::grade_summaries;
pub use progress::{completion_rate, course_progress};
pub use search::search_assignments;
pub use types::*;
pub use upcoming::{upcoming_assignments, DEFAULT_DAYS_AHEAD};
