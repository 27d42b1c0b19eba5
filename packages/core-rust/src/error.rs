//! Classified failures surfaced to the invoking caller.
//!
//! Backend failures keep their status code and body unmodified so callers can
//! react programmatically. Nothing here is retried.

use serde_json::{json, Value};

/// Sub-kind of a [`GatewayError::Transport`] failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// The per-call timeout ceiling elapsed.
    Timeout,
    /// The backend could not be reached.
    Connect,
    /// The backend declared JSON but the body did not decode.
    Decode,
    /// Any other client-side I/O failure.
    Other,
}

impl TransportErrorKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Connect => "connect",
            Self::Decode => "decode",
            Self::Other => "other",
        }
    }
}

/// Error taxonomy for configuration, validation, and backend dispatch.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GatewayError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("backend rejected credentials with status {status}: {body}")]
    Auth { status: u16, body: String },

    #[error("backend resource not found (status {status}): {body}")]
    NotFound { status: u16, body: String },

    #[error("invalid parameters: {}", .errors.join("; "))]
    Validation { errors: Vec<String> },

    #[error("transport error ({}): {message}", .kind.as_str())]
    Transport {
        kind: TransportErrorKind,
        message: String,
    },

    #[error("backend returned status {status}: {body}")]
    UnclassifiedBackend { status: u16, body: String },
}

impl GatewayError {
    /// Classifies a non-success backend response.
    ///
    /// 401/403 map to `Auth`, 404 to `NotFound`, everything else to
    /// `UnclassifiedBackend`. Status and body are carried verbatim.
    #[must_use]
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        match status {
            401 | 403 => Self::Auth { status, body },
            404 => Self::NotFound { status, body },
            _ => Self::UnclassifiedBackend { status, body },
        }
    }

    /// Builds a single-message validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            errors: vec![message.into()],
        }
    }

    /// Builds a transport error of the given kind.
    #[must_use]
    pub fn transport(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self::Transport {
            kind,
            message: message.into(),
        }
    }

    /// Stable snake-case label for the taxonomy kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration_error",
            Self::Auth { .. } => "auth_error",
            Self::NotFound { .. } => "not_found_error",
            Self::Validation { .. } => "validation_error",
            Self::Transport { .. } => "transport_error",
            Self::UnclassifiedBackend { .. } => "unclassified_backend_error",
        }
    }

    /// Backend status code, for errors that originated from a backend response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Auth { status, .. }
            | Self::NotFound { status, .. }
            | Self::UnclassifiedBackend { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Backend response body, for errors that originated from a backend response.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Auth { body, .. }
            | Self::NotFound { body, .. }
            | Self::UnclassifiedBackend { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Structured form returned to MCP clients alongside the text message.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut error = json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        if let Some(status) = self.status() {
            error["status"] = json!(status);
        }
        if let Some(body) = self.body() {
            // Backend bodies are usually JSON; keep them structured when they are.
            error["body"] = serde_json::from_str::<Value>(body).unwrap_or_else(|_| json!(body));
        }
        match self {
            Self::Validation { errors } => error["errors"] = json!(errors),
            Self::Transport { kind, .. } => error["transport_kind"] = json!(kind.as_str()),
            _ => {}
        }
        json!({ "error": error })
    }
}
