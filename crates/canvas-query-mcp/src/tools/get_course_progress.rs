//! Tool `get_course_progress`. Submission progress and grade for a course.

use serde::Deserialize;
use serde_json::Value;

use canvas_query::{course_progress, CanvasApi};

use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};

#[derive(Debug, Deserialize)]
struct ProgressParams {
    course_id: u64,
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "get_course_progress".to_string(),
        description: Some(
            "Completed vs pending assignments, completion rate, and current grade for a course"
                .to_string(),
        ),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "course_id": { "type": "integer", "description": "Canvas course ID" }
            },
            "required": ["course_id"]
        }),
    }
}

pub async fn execute(args: Value, api: &dyn CanvasApi) -> McpResult<ToolCallResult> {
    let params: ProgressParams =
        serde_json::from_value(args).map_err(|e| McpError::InvalidParams(e.to_string()))?;

    let progress = course_progress(api, params.course_id).await?;
    Ok(ToolCallResult::json(&progress))
}
