//! `POST <mcp_path>`: one JSON-RPC message or batch per request.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;

use super::AppState;
use crate::mcp::jsonrpc::Response as RpcResponse;
use crate::network::HealthState;

/// Handles an MCP message posted over HTTP.
///
/// - 200 with the JSON-RPC response (or batch of responses)
/// - 202 with an empty body when the message held only notifications
/// - 400 with a JSON-RPC parse error when the body is not JSON
/// - 503 once the server is draining
///
/// Runs inside the bearer-context scope, so every tool call made while
/// handling this request sees the request's own credential.
pub async fn mcp_handler(State(state): State<AppState>, body: Bytes) -> Response {
    if state.shutdown.health_state() != HealthState::Ready {
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }
    let _guard = state.shutdown.in_flight_guard();

    let message: Value = match serde_json::from_slice(&body) {
        Ok(message) => message,
        Err(e) => {
            let reply: Value = RpcResponse::parse_error(e).into();
            return (StatusCode::BAD_REQUEST, Json(reply)).into_response();
        }
    };

    match state.mcp.handle_message(message).await {
        Some(reply) => Json(reply).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}
