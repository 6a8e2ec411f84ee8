//! JSON-RPC request validation.

use serde_json::Value;

use crate::types::{JsonRpcRequest, McpError, McpResult, JSONRPC_VERSION};

/// Check the version tag, method name, and params shape of a request.
pub fn validate_request(request: &JsonRpcRequest) -> McpResult<()> {
    if request.jsonrpc != JSONRPC_VERSION {
        return Err(McpError::InvalidRequest(format!(
            "Expected jsonrpc version \"{JSONRPC_VERSION}\", got \"{}\"",
            request.jsonrpc
        )));
    }

    if request.method.is_empty() {
        return Err(McpError::InvalidRequest(
            "Method name must not be empty".to_string(),
        ));
    }

    // JSON-RPC 2.0: params, when present, is structured.
    match &request.params {
        None | Some(Value::Object(_)) | Some(Value::Array(_)) | Some(Value::Null) => Ok(()),
        Some(_) => Err(McpError::InvalidRequest(
            "params must be an object or array".to_string(),
        )),
    }
}
