use async_trait::async_trait;
use serde_json::Value;

use crate::error::GatewayError;
use crate::types::RequestOptions;

/// Issues one backend call and normalizes the response.
///
/// Implementations attach `request.credential` as-is and must not consult the
/// ambient invocation context; resolution happens before dispatch so the
/// credential on an in-flight call can never change underneath it.
/// Implementations: reqwest-backed HTTP client (server), recording fakes (tests).
#[async_trait]
pub trait Dispatcher: Send + Sync {
    /// Executes `request`, returning the decoded JSON or `{"text": ...}` envelope.
    ///
    /// # Errors
    ///
    /// Returns a classified [`GatewayError`]: `Auth`, `NotFound`, or
    /// `UnclassifiedBackend` for non-success statuses, `Transport` for network
    /// failures, timeouts, and undecodable bodies.
    async fn execute(&self, request: RequestOptions) -> Result<Value, GatewayError>;
}
