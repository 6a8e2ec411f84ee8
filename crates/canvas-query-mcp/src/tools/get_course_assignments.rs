//! Tool `get_course_assignments`. List a course's assignments.

use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

use canvas_query::{course_assignments, CanvasApi};

use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};

#[derive(Debug, Deserialize)]
struct AssignmentsParams {
    course_id: u64,
    #[serde(default = "default_include_past")]
    include_past: bool,
}

fn default_include_past() -> bool {
    true
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "get_course_assignments".to_string(),
        description: Some("List assignments for a course".to_string()),
        input_schema: json!({
            "type": "object",
            "properties": {
                "course_id": { "type": "integer", "description": "Canvas course ID" },
                "include_past": {
                    "type": "boolean",
                    "default": true,
                    "description": "Include assignments whose due date has passed"
                }
            },
            "required": ["course_id"]
        }),
    }
}

pub async fn execute(args: Value, api: &dyn CanvasApi) -> McpResult<ToolCallResult> {
    let params: AssignmentsParams =
        serde_json::from_value(args).map_err(|e| McpError::InvalidParams(e.to_string()))?;

    let assignments =
        course_assignments(api, params.course_id, params.include_past, Utc::now()).await?;

    Ok(ToolCallResult::json(&json!({
        "course_id": params.course_id,
        "total": assignments.len(),
        "assignments": assignments,
    })))
}
