//! MCP method handling, shared by the stdio and HTTP transports.
//!
//! Transports hand decoded JSON messages to [`McpServer::handle_message`]
//! and write back whatever it returns. Tool calls go through the tool
//! pipeline; everything else is answered locally.

use std::sync::Arc;

use serde_json::{json, Map, Value};
use tower::ServiceExt;
use tracing::debug;

use super::jsonrpc::{Request, Response, RpcError, INVALID_REQUEST};
use crate::service::{OperationError, ToolInvocation, ToolPipeline, ToolRegistry};

/// Protocol revision advertised when the client asks for one we don't know.
pub const PROTOCOL_VERSION: &str = "2025-03-26";

/// Revisions whose tool surface this server implements unchanged.
const SUPPORTED_PROTOCOL_VERSIONS: &[&str] = &["2024-11-05", "2025-03-26", "2025-06-18"];

pub const SERVER_NAME: &str = "openwebui-mcp-server";

const INSTRUCTIONS: &str = "Manage an Open WebUI instance: users, groups, models, knowledge \
bases, chats, tools, functions and system configuration. Every call runs with the caller's \
own Open WebUI permissions; admin-only tools fail with an auth error for regular users. \
Pass `api_key` to act with a different key for a single call.";

#[derive(Clone)]
pub struct McpServer {
    pipeline: ToolPipeline,
    registry: Arc<ToolRegistry>,
}

impl McpServer {
    #[must_use]
    pub fn new(pipeline: ToolPipeline, registry: Arc<ToolRegistry>) -> Self {
        Self { pipeline, registry }
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    /// Handles one decoded message: a single request/notification or a batch.
    ///
    /// Returns `None` when nothing should be written back (notifications,
    /// or a batch made only of notifications).
    pub async fn handle_message(&self, message: Value) -> Option<Value> {
        match message {
            Value::Array(batch) if batch.is_empty() => {
                let reply =
                    Response::error(Value::Null, INVALID_REQUEST, "Invalid Request: empty batch");
                Some(reply.into())
            }
            Value::Array(batch) => {
                let mut responses = Vec::with_capacity(batch.len());
                for item in batch {
                    if let Some(response) = self.handle_single(item).await {
                        responses.push(Value::from(response));
                    }
                }
                (!responses.is_empty()).then_some(Value::Array(responses))
            }
            single => self.handle_single(single).await.map(Value::from),
        }
    }

    /// Parses raw bytes and handles the result; malformed JSON yields a
    /// parse-error response.
    pub async fn handle_bytes(&self, raw: &[u8]) -> Option<Value> {
        match serde_json::from_slice::<Value>(raw) {
            Ok(message) => self.handle_message(message).await,
            Err(e) => Some(Response::parse_error(e).into()),
        }
    }

    async fn handle_single(&self, message: Value) -> Option<Response> {
        let request = match Request::from_value(message) {
            Ok(request) => request,
            Err(response) => return Some(response),
        };

        let Some(id) = request.id.clone() else {
            debug!(method = %request.method, "notification received");
            return None;
        };

        let outcome = match request.method.as_str() {
            "initialize" => Ok(Self::initialize(request.params.as_ref())),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({ "tools": self.registry.tool_definitions() })),
            "tools/call" => self.call_tool(request.params).await,
            other => Err(RpcError::method_not_found(other)),
        };
        Some(Response { id, outcome })
    }

    fn initialize(params: Option<&Value>) -> Value {
        let requested = params
            .and_then(|p| p.get("protocolVersion"))
            .and_then(Value::as_str);
        let version = requested
            .filter(|v| SUPPORTED_PROTOCOL_VERSIONS.contains(v))
            .unwrap_or(PROTOCOL_VERSION);

        json!({
            "protocolVersion": version,
            "capabilities": { "tools": { "listChanged": false } },
            "serverInfo": {
                "name": SERVER_NAME,
                "version": env!("CARGO_PKG_VERSION"),
            },
            "instructions": INSTRUCTIONS,
        })
    }

    async fn call_tool(&self, params: Option<Value>) -> Result<Value, RpcError> {
        let Some(Value::Object(mut params)) = params else {
            return Err(RpcError::invalid_params("tools/call requires an object with `name`"));
        };
        let Some(Value::String(name)) = params.remove("name") else {
            return Err(RpcError::invalid_params("tools/call requires a string `name`"));
        };
        let arguments = match params.remove("arguments") {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(arguments)) => arguments,
            Some(_) => return Err(RpcError::invalid_params("`arguments` must be an object")),
        };

        let invocation = ToolInvocation::new(name, arguments);
        match self.pipeline.clone().oneshot(invocation).await {
            Ok(output) => Ok(tool_success(output.value)),
            Err(OperationError::UnknownTool { name }) => {
                Err(RpcError::invalid_params(format!("Unknown tool: {name}")))
            }
            Err(OperationError::Gateway(err)) => Ok(json!({
                "content": [{ "type": "text", "text": err.to_string() }],
                "structuredContent": err.to_json(),
                "isError": true,
            })),
        }
    }
}

fn tool_success(value: Value) -> Value {
    let text = serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string());
    let structured = if value.is_object() {
        value
    } else {
        json!({ "result": value })
    };
    json!({
        "content": [{ "type": "text", "text": text }],
        "structuredContent": structured,
        "isError": false,
    })
}
