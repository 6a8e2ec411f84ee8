//! Tool `search_assignments`. Find assignments by name or course name.

use serde::Deserialize;
use serde_json::{json, Value};

use canvas_query::{search_assignments, CanvasApi};

use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};

#[derive(Debug, Deserialize)]
struct SearchParams {
    query: String,
    #[serde(default)]
    course_id: Option<u64>,
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "search_assignments".to_string(),
        description: Some(
            "Case-insensitive search over assignment names and course names".to_string(),
        ),
        input_schema: json!({
            "type": "object",
            "properties": {
                "query": { "type": "string", "description": "Text to search for" },
                "course_id": {
                    "type": "integer",
                    "description": "Restrict the search to one course"
                }
            },
            "required": ["query"]
        }),
    }
}

pub async fn execute(args: Value, api: &dyn CanvasApi) -> McpResult<ToolCallResult> {
    let params: SearchParams =
        serde_json::from_value(args).map_err(|e| McpError::InvalidParams(e.to_string()))?;

    if params.query.trim().is_empty() {
        return Err(McpError::InvalidParams("'query' must not be empty".to_string()));
    }

    let results = search_assignments(api, &params.query, params.course_id).await?;

    Ok(ToolCallResult::json(&json!({
        "query": params.query,
        "total": results.len(),
        "results": results,
    })))
}
