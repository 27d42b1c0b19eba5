//! Values flowing through the tool pipeline.

use serde_json::{Map, Value};
use uuid::Uuid;

use openwebui_mcp_core::GatewayError;

/// One inbound tool call, as handed to the pipeline by a transport.
#[derive(Debug, Clone)]
pub struct ToolInvocation {
    /// Correlates log lines of a single invocation; never sent to the backend.
    pub invocation_id: Uuid,
    pub tool: String,
    pub arguments: Map<String, Value>,
}

impl ToolInvocation {
    #[must_use]
    pub fn new(tool: impl Into<String>, arguments: Map<String, Value>) -> Self {
        Self {
            invocation_id: Uuid::new_v4(),
            tool: tool.into(),
            arguments,
        }
    }
}

/// Normalized backend result of a successful tool call.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutput {
    pub value: Value,
}

/// Errors returned by the tool pipeline.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OperationError {
    /// No operation with this name is registered.
    #[error("unknown tool: {name}")]
    UnknownTool { name: String },
    /// Validation, configuration, transport or backend failure.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl OperationError {
    /// Label used for the `outcome` span field and metrics.
    #[must_use]
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::UnknownTool { .. } => "unknown_tool",
            Self::Gateway(err) => err.kind(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invocation_ids_are_unique() {
        let a = ToolInvocation::new("list_users", Map::new());
        let b = ToolInvocation::new("list_users", Map::new());
        assert_ne!(a.invocation_id, b.invocation_id);
    }

    #[test]
    fn outcome_labels() {
        let unknown = OperationError::UnknownTool {
            name: "nope".to_string(),
        };
        assert_eq!(unknown.outcome(), "unknown_tool");

        let gateway: OperationError = GatewayError::from_status(404, "").into();
        assert_eq!(gateway.outcome(), "not_found_error");
    }
}
