//! Per-invocation tracing span and metrics.
//!
//! Records duration and outcome on an `invocation` span and emits the
//! `mcp_tool_invocations_total` / `mcp_tool_invocation_duration_seconds`
//! metrics. The router records `credential_source` on the same span.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use tower::{Layer, Service};
use tracing::{info_span, Instrument};

use crate::service::operation::{OperationError, ToolInvocation, ToolOutput};

// ---------------------------------------------------------------------------
// InstrumentLayer
// ---------------------------------------------------------------------------

/// Tower layer that wraps each tool invocation in a span and records metrics.
#[derive(Debug, Clone)]
pub struct InstrumentLayer;

impl<S> Layer<S> for InstrumentLayer {
    type Service = InstrumentService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        InstrumentService { inner }
    }
}

// ---------------------------------------------------------------------------
// InstrumentService
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct InstrumentService<S> {
    inner: S,
}

impl<S> Service<ToolInvocation> for InstrumentService<S>
where
    S: Service<ToolInvocation, Response = ToolOutput, Error = OperationError> + Send,
    S::Future: Send + 'static,
{
    type Response = ToolOutput;
    type Error = OperationError;
    type Future = Pin<Box<dyn Future<Output = Result<ToolOutput, OperationError>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, invocation: ToolInvocation) -> Self::Future {
        let tool = invocation.tool.clone();

        let span = info_span!(
            "invocation",
            tool = %tool,
            invocation_id = %invocation.invocation_id,
            credential_source = tracing::field::Empty,
            duration_ms = tracing::field::Empty,
            outcome = tracing::field::Empty,
        );

        let fut = self.inner.call(invocation);

        Box::pin(
            async move {
                let start = Instant::now();
                let result = fut.await;
                let elapsed = start.elapsed();

                let outcome = match &result {
                    Ok(_) => "ok",
                    Err(e) => e.outcome(),
                };

                #[allow(clippy::cast_possible_truncation)]
                let duration_ms = elapsed.as_millis() as u64;
                tracing::Span::current().record("duration_ms", duration_ms);
                tracing::Span::current().record("outcome", outcome);

                metrics::counter!(
                    "mcp_tool_invocations_total",
                    "tool" => tool.clone(),
                    "outcome" => outcome
                )
                .increment(1);
                metrics::histogram!("mcp_tool_invocation_duration_seconds", "tool" => tool)
                    .record(elapsed.as_secs_f64());

                match &result {
                    Ok(_) => tracing::info!(duration_ms, outcome, "invocation complete"),
                    Err(e) => tracing::warn!(duration_ms, outcome, error = %e, "invocation failed"),
                }

                result
            }
            .instrument(span),
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use serde_json::{json, Map};
    use tower::ServiceExt;

    use openwebui_mcp_core::GatewayError;

    use super::*;

    /// Answers immediately; fails for the tool named `fail`.
    struct ImmediateService;

    impl Service<ToolInvocation> for ImmediateService {
        type Response = ToolOutput;
        type Error = OperationError;
        type Future = Pin<Box<dyn Future<Output = Result<ToolOutput, OperationError>> + Send>>;

        fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }

        fn call(&mut self, invocation: ToolInvocation) -> Self::Future {
            Box::pin(async move {
                if invocation.tool == "fail" {
                    Err(GatewayError::from_status(500, "boom").into())
                } else {
                    Ok(ToolOutput {
                        value: json!({"tool": invocation.tool}),
                    })
                }
            })
        }
    }

    #[tokio::test]
    async fn passes_through_response() {
        let svc = InstrumentLayer.layer(ImmediateService);
        let output = svc
            .oneshot(ToolInvocation::new("list_users", Map::new()))
            .await
            .unwrap();
        assert_eq!(output.value, json!({"tool": "list_users"}));
    }

    #[tokio::test]
    async fn passes_through_error() {
        let svc = InstrumentLayer.layer(ImmediateService);
        let err = svc
            .oneshot(ToolInvocation::new("fail", Map::new()))
            .await
            .unwrap_err();
        assert_eq!(err.outcome(), "unclassified_backend_error");
    }
}
