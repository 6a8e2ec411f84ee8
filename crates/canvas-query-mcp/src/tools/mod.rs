//! MCP tool implementations.

pub mod get_course_assignments;
pub mod get_course_progress;
pub mod get_grades;
pub mod get_upcoming_assignments;
pub mod list_courses;
pub mod registry;
pub mod search_assignments;

pub use registry::ToolRegistry;
