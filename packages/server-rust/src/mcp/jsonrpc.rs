//! JSON-RPC 2.0 envelopes.

use serde::Deserialize;
use serde_json::{json, Value};

pub const JSONRPC_VERSION: &str = "2.0";

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;

/// A decoded request or notification.
#[derive(Debug, Clone, Deserialize)]
pub struct Request {
    pub jsonrpc: String,
    /// `None` for notifications. Set by [`Request::from_value`], which can
    /// tell an absent `id` from an explicit `null`.
    #[serde(skip)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
}

impl Request {
    /// Decodes one message.
    ///
    /// # Errors
    ///
    /// Returns an `INVALID_REQUEST` error, addressed to the message's `id`
    /// when one could be read, for anything that is not a JSON-RPC 2.0
    /// request object.
    pub fn from_value(value: Value) -> Result<Self, Response> {
        let Value::Object(object) = value else {
            return Err(Response::error(Value::Null, INVALID_REQUEST, "Invalid Request"));
        };
        let id = object.get("id").cloned();
        let reply_id = id.clone().unwrap_or(Value::Null);

        let mut request: Self = serde_json::from_value(Value::Object(object)).map_err(|e| {
            Response::error(reply_id.clone(), INVALID_REQUEST, format!("Invalid Request: {e}"))
        })?;
        if request.jsonrpc != JSONRPC_VERSION {
            return Err(Response::error(
                reply_id,
                INVALID_REQUEST,
                "Invalid Request: jsonrpc must be \"2.0\"",
            ));
        }
        request.id = id;
        Ok(request)
    }

    #[must_use]
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// Error object carried in a failed response.
#[derive(Debug, Clone, PartialEq)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

impl RpcError {
    #[must_use]
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn method_not_found(method: &str) -> Self {
        Self::new(METHOD_NOT_FOUND, format!("Method not found: {method}"))
    }

    #[must_use]
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(INVALID_PARAMS, message)
    }
}

/// A response addressed to a request id.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub id: Value,
    pub outcome: Result<Value, RpcError>,
}

impl Response {
    #[must_use]
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            id,
            outcome: Ok(result),
        }
    }

    #[must_use]
    pub fn error(id: Value, code: i64, message: impl Into<String>) -> Self {
        Self {
            id,
            outcome: Err(RpcError::new(code, message)),
        }
    }

    /// Response for input that is not valid JSON.
    #[must_use]
    pub fn parse_error(detail: impl std::fmt::Display) -> Self {
        Self::error(Value::Null, PARSE_ERROR, format!("Parse error: {detail}"))
    }
}

impl From<Response> for Value {
    fn from(response: Response) -> Self {
        match response.outcome {
            Ok(result) => json!({
                "jsonrpc": JSONRPC_VERSION,
                "id": response.id,
                "result": result,
            }),
            Err(error) => json!({
                "jsonrpc": JSONRPC_VERSION,
                "id": response.id,
                "error": { "code": error.code, "message": error.message },
            }),
        }
    }
}
