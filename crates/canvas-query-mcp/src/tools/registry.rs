//! Tool registration and dispatch.

use serde_json::Value;

use canvas_query::CanvasApi;

use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};

use super::{
    get_course_assignments, get_course_progress, get_grades, get_upcoming_assignments,
    list_courses, search_assignments,
};

pub struct ToolRegistry;

impl ToolRegistry {
    pub fn list_tools() -> Vec<ToolDefinition> {
        vec![
            list_courses::definition(),
            get_course_assignments::definition(),
            get_upcoming_assignments::definition(),
            get_grades::definition(),
            search_assignments::definition(),
            get_course_progress::definition(),
        ]
    }

    pub fn tool_names() -> Vec<String> {
        Self::list_tools().into_iter().map(|t| t.name).collect()
    }

    /// Run a tool by name.
    ///
    /// Unknown names are `MethodNotFound`. Protocol errors from a handler pass
    /// through; any other failure becomes an `InternalError` with its message.
    pub async fn call(
        name: &str,
        arguments: Option<Value>,
        api: &dyn CanvasApi,
    ) -> McpResult<ToolCallResult> {
        let args = match arguments {
            None | Some(Value::Null) => Value::Object(serde_json::Map::new()),
            Some(args) => args,
        };

        let result = match name {
            "list_courses" => list_courses::execute(args, api).await,
            "get_course_assignments" => get_course_assignments::execute(args, api).await,
            "get_upcoming_assignments" => get_upcoming_assignments::execute(args, api).await,
            "get_grades" => get_grades::execute(args, api).await,
            "search_assignments" => search_assignments::execute(args, api).await,
            "get_course_progress" => get_course_progress::execute(args, api).await,
            _ => return Err(McpError::MethodNotFound(format!("Unknown tool: {name}"))),
        };

        result.map_err(|e| {
            if e.is_protocol_error() {
                e
            } else {
                tracing::warn!("Tool {name} failed: {e}");
                match e {
                    McpError::InternalError(_) => e,
                    other => McpError::InternalError(other.to_string()),
                }
            }
        })
    }
}
