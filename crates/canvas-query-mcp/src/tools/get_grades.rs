//! Tool `get_grades`. Current grades for one or all courses.

use serde::Deserialize;
use serde_json::{json, Value};

use canvas_query::{grade_summaries, CanvasApi};

use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};

#[derive(Debug, Deserialize)]
struct GradesParams {
    #[serde(default)]
    course_id: Option<u64>,
    #[serde(default)]
    include_assignments: bool,
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "get_grades".to_string(),
        description: Some(
            "Current letter grade and score for a course, or for every active course".to_string(),
        ),
        input_schema: json!({
            "type": "object",
            "properties": {
                "course_id": {
                    "type": "integer",
                    "description": "Canvas course ID (omit for all active courses)"
                },
                "include_assignments": {
                    "type": "boolean",
                    "default": false,
                    "description": "Include per-assignment scores"
                }
            }
        }),
    }
}

pub async fn execute(args: Value, api: &dyn CanvasApi) -> McpResult<ToolCallResult> {
    let params: GradesParams =
        serde_json::from_value(args).map_err(|e| McpError::InvalidParams(e.to_string()))?;

    let summaries = grade_summaries(api, params.course_id, params.include_assignments).await?;

    Ok(ToolCallResult::json(&json!({
        "total": summaries.len(),
        "grades": summaries,
    })))
}
