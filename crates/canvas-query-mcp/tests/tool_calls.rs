//! Integration tests for canvas-query-mcp, driven through the protocol handler
//! with an in-memory Canvas API.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, SecondsFormat, Utc};
use serde_json::{json, Value};

use canvas_query::assignments::assignments_endpoint;
use canvas_query::courses::active_courses_endpoint;
use canvas_query::grades::enrollments_endpoint;
use canvas_query::{CanvasApi, CanvasClient, CanvasError, CanvasResult, ClientConfig};
use canvas_query_mcp::protocol::ProtocolHandler;
use canvas_query_mcp::transport::StdioTransport;
use canvas_query_mcp::types::*;

// ─────────────────────── helpers ───────────────────────

#[derive(Default)]
struct FakeCanvas {
    routes: HashMap<String, Value>,
}

impl FakeCanvas {
    fn route(mut self, endpoint: impl Into<String>, body: Value) -> Self {
        self.routes.insert(endpoint.into(), body);
        self
    }
}

#[async_trait]
impl CanvasApi for FakeCanvas {
    async fn get_json(&self, endpoint: &str) -> CanvasResult<Value> {
        self.routes.get(endpoint).cloned().ok_or_else(|| CanvasError::Api {
            status: 404,
            message: format!("The specified resource does not exist: {endpoint}"),
        })
    }
}

/// RFC 3339 timestamp `days` from now (may be negative).
fn in_days(days: i64) -> String {
    (Utc::now() + Duration::days(days)).to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn canvas() -> FakeCanvas {
    FakeCanvas::default()
        .route(
            active_courses_endpoint(),
            json!([
                { "id": 101, "name": "Organic Chemistry", "course_code": "CHEM-210", "enrollment_term_id": 3 },
                { "id": 202, "name": "Modern Poetry", "course_code": "ENG-330", "enrollment_term_id": 3 }
            ]),
        )
        .route("courses/101", json!({ "id": 101, "name": "Organic Chemistry", "course_code": "CHEM-210" }))
        .route("courses/303", json!({ "id": 303, "name": "Independent Study", "course_code": "IND-1" }))
        .route(
            assignments_endpoint(101, false),
            json!([
                { "id": 1, "course_id": 101, "name": "Lab Report: Titration", "due_at": in_days(3), "points_possible": 50.0 },
                { "id": 2, "course_id": 101, "name": "Problem Set 4", "due_at": in_days(-2), "points_possible": 20.0 },
                { "id": 3, "course_id": 101, "name": "Final Exam", "due_at": in_days(40), "points_possible": 200.0 }
            ]),
        )
        .route(
            assignments_endpoint(202, false),
            json!([
                { "id": 4, "course_id": 202, "name": "Close reading ESSAY", "due_at": in_days(1) },
                { "id": 5, "course_id": 202, "name": "Journal", "due_at": null }
            ]),
        )
        .route(
            enrollments_endpoint(101),
            json!([{ "type": "StudentEnrollment", "grades": { "current_grade": "B", "current_score": 84.5 } }]),
        )
        .route(
            enrollments_endpoint(202),
            json!([{ "type": "StudentEnrollment", "grades": { "current_grade": "A", "current_score": 95.0 } }]),
        )
        .route(
            assignments_endpoint(101, true),
            json!([
                { "id": 1, "course_id": 101, "name": "Lab Report: Titration",
                  "submission": { "submitted_at": null } },
                { "id": 2, "course_id": 101, "name": "Problem Set 4",
                  "submission": { "submitted_at": in_days(-3), "score": 18.0, "grade": "18" } },
                { "id": 3, "course_id": 101, "name": "Final Exam" }
            ]),
        )
        .route(enrollments_endpoint(303), json!([]))
        .route(assignments_endpoint(303, true), json!([]))
}

fn handler() -> ProtocolHandler {
    ProtocolHandler::new(Arc::new(canvas()))
}

fn mcp_request(id: i64, method: &str, params: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": method,
        "params": params
    })
}

fn tool_call(id: i64, name: &str, arguments: Value) -> Value {
    mcp_request(id, "tools/call", json!({ "name": name, "arguments": arguments }))
}

async fn send(handler: &ProtocolHandler, msg: Value) -> Option<Value> {
    let parsed: JsonRpcMessage = serde_json::from_value(msg).unwrap();
    handler.handle_message(parsed).await
}

async fn send_unwrap(handler: &ProtocolHandler, msg: Value) -> Value {
    send(handler, msg).await.expect("expected response")
}

/// Decode the pretty-printed JSON text block of a successful tool call.
fn tool_payload(resp: &Value) -> Value {
    assert!(resp.get("error").is_none(), "unexpected error: {resp}");
    let content = resp["result"]["content"].as_array().expect("content array");
    assert_eq!(content.len(), 1, "tool results are a single block");
    assert_eq!(content[0]["type"], "text");
    serde_json::from_str(content[0]["text"].as_str().unwrap()).unwrap()
}

// ═══════════════════════════════════════════════════════
// PROTOCOL
// ═══════════════════════════════════════════════════════

#[tokio::test]
async fn test_initialize_handshake() {
    let handler = handler();
    let resp = send_unwrap(
        &handler,
        mcp_request(
            0,
            "initialize",
            json!({
                "protocolVersion": "2025-06-18",
                "capabilities": {},
                "clientInfo": { "name": "test-client", "version": "1.0" }
            }),
        ),
    )
    .await;

    assert_eq!(resp["result"]["protocolVersion"], MCP_VERSION);
    assert_eq!(resp["result"]["serverInfo"]["name"], SERVER_NAME);
    assert!(resp["result"]["capabilities"]["tools"].is_object());

    let notif = json!({ "jsonrpc": "2.0", "method": "notifications/initialized" });
    assert!(send(&handler, notif).await.is_none());
}

#[tokio::test]
async fn test_tools_list_has_six_stable_names() {
    let resp = send_unwrap(&handler(), mcp_request(1, "tools/list", json!({}))).await;
    let tools = resp["result"]["tools"].as_array().unwrap();

    let names: Vec<&str> = tools.iter().map(|t| t["name"].as_str().unwrap()).collect();
    assert_eq!(
        names,
        vec![
            "list_courses",
            "get_course_assignments",
            "get_upcoming_assignments",
            "get_grades",
            "search_assignments",
            "get_course_progress",
        ]
    );
    for tool in tools {
        assert_eq!(tool["inputSchema"]["type"], "object");
        assert!(tool["description"].is_string());
    }
}

#[tokio::test]
async fn test_unknown_tool_is_method_not_found() {
    let resp = send_unwrap(&handler(), tool_call(2, "delete_course", json!({}))).await;
    assert_eq!(resp["error"]["code"], -32601);
    assert!(resp["error"]["message"].as_str().unwrap().contains("delete_course"));
}

#[tokio::test]
async fn test_unknown_method_is_method_not_found() {
    let resp = send_unwrap(&handler(), mcp_request(3, "resources/list", json!({}))).await;
    assert_eq!(resp["error"]["code"], -32601);
}

#[tokio::test]
async fn test_ping() {
    let resp = send_unwrap(&handler(), mcp_request(4, "ping", json!({}))).await;
    assert_eq!(resp["result"], json!({}));
}

// ═══════════════════════════════════════════════════════
// TOOLS
// ═══════════════════════════════════════════════════════

#[tokio::test]
async fn test_list_courses() {
    let resp = send_unwrap(&handler(), tool_call(10, "list_courses", json!({}))).await;
    let payload = tool_payload(&resp);
    assert_eq!(payload["total"], 2);
    assert_eq!(payload["courses"][0]["course_code"], "CHEM-210");
}

#[tokio::test]
async fn test_list_courses_without_arguments_field() {
    let msg = mcp_request(11, "tools/call", json!({ "name": "list_courses" }));
    let payload = tool_payload(&send_unwrap(&handler(), msg).await);
    assert_eq!(payload["total"], 2);
}

#[tokio::test]
async fn test_course_assignments_include_past_toggle() {
    let handler = handler();

    let all = tool_payload(
        &send_unwrap(&handler, tool_call(12, "get_course_assignments", json!({ "course_id": 101 }))).await,
    );
    assert_eq!(all["total"], 3);

    let open = tool_payload(
        &send_unwrap(
            &handler,
            tool_call(13, "get_course_assignments", json!({ "course_id": 101, "include_past": false })),
        )
        .await,
    );
    let ids: Vec<u64> = open["assignments"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 3]);
}

#[tokio::test]
async fn test_upcoming_assignments_window_and_order() {
    let resp = send_unwrap(&handler(), tool_call(14, "get_upcoming_assignments", json!({}))).await;
    let payload = tool_payload(&resp);

    assert_eq!(payload["days_ahead"], 7);
    let items = payload["assignments"].as_array().unwrap();
    let ids: Vec<u64> = items.iter().map(|a| a["id"].as_u64().unwrap()).collect();
    assert_eq!(ids, vec![4, 1], "soonest first, past and far-future excluded");

    assert_eq!(items[0]["course_name"], "Modern Poetry");
    assert_eq!(items[1]["course_name"], "Organic Chemistry");
    assert!(items[1]["days_until_due"].as_i64().unwrap() >= 2);
}

#[tokio::test]
async fn test_upcoming_assignments_custom_window() {
    let resp = send_unwrap(
        &handler(),
        tool_call(15, "get_upcoming_assignments", json!({ "days_ahead": 60 })),
    )
    .await;
    let payload = tool_payload(&resp);
    assert_eq!(payload["total"], 3);
    assert_eq!(payload["assignments"][2]["id"], 3);
}

#[tokio::test]
async fn test_upcoming_assignments_window_past_calendar_end() {
    let resp = send_unwrap(
        &handler(),
        tool_call(30, "get_upcoming_assignments", json!({ "days_ahead": 100_000_000u32 })),
    )
    .await;
    let payload = tool_payload(&resp);
    assert_eq!(payload["days_ahead"], 100_000_000u32);
    assert_eq!(payload["total"], 3, "everything from now on is in the window");
}

#[tokio::test]
async fn test_search_matches_assignment_and_course_names() {
    let handler = handler();

    let by_assignment = tool_payload(
        &send_unwrap(&handler, tool_call(16, "search_assignments", json!({ "query": "essay" }))).await,
    );
    assert_eq!(by_assignment["total"], 1);
    assert_eq!(by_assignment["results"][0]["id"], 4);

    let by_course = tool_payload(
        &send_unwrap(&handler, tool_call(17, "search_assignments", json!({ "query": "CHEMISTRY" }))).await,
    );
    assert_eq!(by_course["total"], 3);
    assert!(by_course["results"]
        .as_array()
        .unwrap()
        .iter()
        .all(|r| r["course_name"] == "Organic Chemistry"));
}

#[tokio::test]
async fn test_search_rejects_empty_query() {
    let resp = send_unwrap(&handler(), tool_call(18, "search_assignments", json!({ "query": "" }))).await;
    assert_eq!(resp["error"]["code"], -32602);
}

#[tokio::test]
async fn test_grades_all_courses_and_single_course() {
    let handler = handler();

    let all = tool_payload(&send_unwrap(&handler, tool_call(19, "get_grades", json!({}))).await);
    assert_eq!(all["total"], 2);
    assert_eq!(all["grades"][0]["current_grade"], "B");
    assert!(all["grades"][0].get("assignments").is_none());

    let one = tool_payload(
        &send_unwrap(
            &handler,
            tool_call(20, "get_grades", json!({ "course_id": 101, "include_assignments": true })),
        )
        .await,
    );
    assert_eq!(one["total"], 1);
    assert_eq!(one["grades"][0]["current_score"], 84.5);
    assert_eq!(one["grades"][0]["assignments"][1]["score"], 18.0);
}

#[tokio::test]
async fn test_course_progress() {
    let resp = send_unwrap(&handler(), tool_call(21, "get_course_progress", json!({ "course_id": 101 }))).await;
    let payload = tool_payload(&resp);

    assert_eq!(payload["course_name"], "Organic Chemistry");
    assert_eq!(payload["total_assignments"], 3);
    assert_eq!(payload["completed_assignments"], 1);
    assert_eq!(payload["pending_assignments"], 2);
    assert_eq!(payload["completion_rate"], 33);
    assert_eq!(payload["grades"]["current_grade"], "B");
    assert_eq!(payload["pending"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_course_progress_without_assignments() {
    let resp = send_unwrap(&handler(), tool_call(22, "get_course_progress", json!({ "course_id": 303 }))).await;
    let payload = tool_payload(&resp);
    assert_eq!(payload["total_assignments"], 0);
    assert_eq!(payload["completion_rate"], 0);
}

// ═══════════════════════════════════════════════════════
// ERRORS
// ═══════════════════════════════════════════════════════

#[tokio::test]
async fn test_missing_required_argument_is_invalid_params() {
    let resp = send_unwrap(&handler(), tool_call(30, "get_course_progress", json!({}))).await;
    assert_eq!(resp["error"]["code"], -32602);

    let resp = send_unwrap(
        &handler(),
        tool_call(31, "get_course_assignments", json!({ "course_id": "not-a-number" })),
    )
    .await;
    assert_eq!(resp["error"]["code"], -32602);
}

#[tokio::test]
async fn test_upstream_failure_is_internal_error_with_message() {
    let resp = send_unwrap(&handler(), tool_call(32, "get_course_progress", json!({ "course_id": 999 }))).await;
    assert_eq!(resp["error"]["code"], -32603);
    assert!(resp["error"]["message"]
        .as_str()
        .unwrap()
        .contains("The specified resource does not exist"));
}

#[tokio::test]
async fn test_missing_token_fails_before_network() {
    let err = CanvasClient::new(ClientConfig::new(None).with_base_url("http://127.0.0.1:9")).unwrap_err();
    assert!(matches!(err, CanvasError::Config(_)));
}

// ═══════════════════════════════════════════════════════
// TRANSPORT
// ═══════════════════════════════════════════════════════

#[tokio::test]
async fn test_stdio_transport_round_trip() {
    let input = [
        r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#,
        "",
        r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
        r#"{"broken":"#,
        r#"{"jsonrpc":"2.0","id":"b","method":"tools/call","params":{"name":"list_courses","arguments":{}}}"#,
    ]
    .join("\n");

    let transport = StdioTransport::new(handler());
    let mut output: Vec<u8> = Vec::new();
    transport
        .serve(tokio::io::BufReader::new(input.as_bytes()), &mut output)
        .await
        .unwrap();

    let lines: Vec<Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 3, "notification and blank line produce no output");

    assert_eq!(lines[0]["id"], 1);
    assert_eq!(lines[0]["result"]["tools"].as_array().unwrap().len(), 6);

    assert_eq!(lines[1]["id"], Value::Null);
    assert_eq!(lines[1]["error"]["code"], -32700);

    assert_eq!(lines[2]["id"], "b");
    assert_eq!(tool_payload(&lines[2])["total"], 2);
}

#[tokio::test]
async fn test_stdio_transport_survives_invalid_utf8() {
    let mut input: Vec<u8> = Vec::new();
    input.extend_from_slice(br#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#);
    input.extend_from_slice(b"\n\xff\xfe\n");
    input.extend_from_slice(br#"{"jsonrpc":"2.0","id":2,"method":"ping"}"#);
    input.push(b'\n');

    let transport = StdioTransport::new(handler());
    let mut output: Vec<u8> = Vec::new();
    transport
        .serve(tokio::io::BufReader::new(input.as_slice()), &mut output)
        .await
        .unwrap();

    let lines: Vec<Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 3);

    assert_eq!(lines[0]["id"], 1);
    assert_eq!(lines[1]["id"], Value::Null);
    assert_eq!(lines[1]["error"]["code"], -32700);
    assert_eq!(lines[2]["id"], 2);
    assert_eq!(lines[2]["result"], json!({}));
}
