//! Tool `list_courses`. List the user's active courses.

use serde_json::{json, Value};

use canvas_query::{list_active_courses, CanvasApi};

use crate::types::{McpResult, ToolCallResult, ToolDefinition};

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "list_courses".to_string(),
        description: Some(
            "List all courses you are actively enrolled in, with IDs, names, and course codes"
                .to_string(),
        ),
        input_schema: json!({
            "type": "object",
            "properties": {}
        }),
    }
}

pub async fn execute(_args: Value, api: &dyn CanvasApi) -> McpResult<ToolCallResult> {
    let courses = list_active_courses(api).await?;

    Ok(ToolCallResult::json(&json!({
        "total": courses.len(),
        "courses": courses,
    })))
}
