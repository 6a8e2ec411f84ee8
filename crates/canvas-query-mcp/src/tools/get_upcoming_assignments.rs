//! Tool `get_upcoming_assignments`. Deadlines across all active courses.

use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

use canvas_query::{upcoming_assignments, CanvasApi, DEFAULT_DAYS_AHEAD};

use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};

#[derive(Debug, Deserialize)]
struct UpcomingParams {
    #[serde(default = "default_days_ahead")]
    days_ahead: u32,
}

fn default_days_ahead() -> u32 {
    DEFAULT_DAYS_AHEAD
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "get_upcoming_assignments".to_string(),
        description: Some(
            "Assignments due in the next N days across all active courses, soonest first"
                .to_string(),
        ),
        input_schema: json!({
            "type": "object",
            "properties": {
                "days_ahead": {
                    "type": "integer",
                    "minimum": 0,
                    "default": DEFAULT_DAYS_AHEAD,
                    "description": "Number of days to look ahead"
                }
            }
        }),
    }
}

pub async fn execute(args: Value, api: &dyn CanvasApi) -> McpResult<ToolCallResult> {
    let params: UpcomingParams =
        serde_json::from_value(args).map_err(|e| McpError::InvalidParams(e.to_string()))?;

    let assignments = upcoming_assignments(api, Utc::now(), params.days_ahead).await?;

    Ok(ToolCallResult::json(&json!({
        "days_ahead": params.days_ahead,
        "total": assignments.len(),
        "assignments": assignments,
    })))
}
