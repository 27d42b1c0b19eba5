//! Tool routing: looks up the operation, binds arguments, resolves the
//! credential and dispatches to the backend.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use serde_json::{Map, Value};
use tower::Service;
use tracing::debug;

use openwebui_mcp_core::{CredentialResolver, Dispatcher, OperationDescriptor};

use super::operation::{OperationError, ToolInvocation, ToolOutput};
use super::registry::ToolRegistry;

type RouterFuture = Pin<Box<dyn Future<Output = Result<ToolOutput, OperationError>> + Send>>;

// ---------------------------------------------------------------------------
// ToolRouter
// ---------------------------------------------------------------------------

/// Innermost service of the tool pipeline.
///
/// Cheap to clone; every field is shared. Credential resolution happens
/// while the returned future is polled, so the ambient tier is whatever the
/// transport installed around that poll.
#[derive(Clone)]
pub struct ToolRouter {
    registry: Arc<ToolRegistry>,
    resolver: Arc<CredentialResolver>,
    dispatcher: Arc<dyn Dispatcher>,
}

impl ToolRouter {
    #[must_use]
    pub fn new(
        registry: Arc<ToolRegistry>,
        resolver: CredentialResolver,
        dispatcher: Arc<dyn Dispatcher>,
    ) -> Self {
        Self {
            registry,
            resolver: Arc::new(resolver),
            dispatcher,
        }
    }

    async fn invoke(self, invocation: ToolInvocation) -> Result<ToolOutput, OperationError> {
        let descriptor =
            self.registry
                .get(&invocation.tool)
                .ok_or_else(|| OperationError::UnknownTool {
                    name: invocation.tool.clone(),
                })?;

        let arguments = unwrap_params_envelope(descriptor, invocation.arguments);
        let binding = descriptor.bind(&arguments)?;

        let resolved = self.resolver.resolve(binding.explicit_credential);
        tracing::Span::current().record("credential_source", resolved.source.as_str());
        debug!(
            tool = descriptor.name,
            credential_source = resolved.source.as_str(),
            "credential resolved"
        );

        let request = binding.request.with_credential(resolved.credential);
        let value = self.dispatcher.execute(request).await?;
        Ok(ToolOutput { value })
    }
}

impl Service<ToolInvocation> for ToolRouter {
    type Response = ToolOutput;
    type Error = OperationError;
    type Future = RouterFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, invocation: ToolInvocation) -> Self::Future {
        Box::pin(self.clone().invoke(invocation))
    }
}

/// Accepts `{"params": {...}}`, the argument shape produced by clients that
/// wrap every tool's arguments in a single model object.
///
/// Only unwrapped when `params` is the sole key, holds an object, and the
/// operation has no parameter of its own named `params`.
fn unwrap_params_envelope(
    descriptor: &OperationDescriptor,
    mut arguments: Map<String, Value>,
) -> Map<String, Value> {
    let wrapped = arguments.len() == 1
        && matches!(arguments.get("params"), Some(Value::Object(_)))
        && !descriptor.params.iter().any(|p| p.name == "params");
    if !wrapped {
        return arguments;
    }
    match arguments.remove("params") {
        Some(Value::Object(inner)) => inner,
        _ => arguments,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
