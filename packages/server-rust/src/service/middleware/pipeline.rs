//! Pipeline composition: wraps the router with the operation-level layers.

use tower::ServiceBuilder;

use super::instrument::{InstrumentLayer, InstrumentService};
use crate::service::router::ToolRouter;

/// The assembled tool pipeline. Clone it per call and drive it with
/// `tower::ServiceExt::oneshot`.
pub type ToolPipeline = InstrumentService<ToolRouter>;

/// Builds the tool pipeline around `router`.
///
/// Layer order (outermost to innermost):
/// 1. `InstrumentLayer` -- span, duration, outcome, metrics
/// 2. `ToolRouter` -- lookup, validation, credential resolution, dispatch
///
/// No pipeline-level timeout: the backend call carries its own ceiling.
#[must_use]
pub fn build_tool_pipeline(router: ToolRouter) -> ToolPipeline {
    ServiceBuilder::new().layer(InstrumentLayer).service(router)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;
    use tower::ServiceExt;

    use openwebui_mcp_core::{context, Credential, CredentialResolver};

    use super::*;
    use crate::service::operation::ToolInvocation;
    use crate::service::registry::ToolRegistry;
    use crate::test_support::RecordingDispatcher;

    #[tokio::test]
    async fn pipeline_routes_through_all_layers() {
        let dispatcher = Arc::new(RecordingDispatcher::default());
        let router = ToolRouter::new(
            Arc::new(ToolRegistry::open_webui()),
            CredentialResolver::default(),
            dispatcher.clone(),
        );
        let pipeline = build_tool_pipeline(router);

        let args = json!({"group_id": "g1"}).as_object().cloned().unwrap();
        let output = context::scope(
            Credential::new("sk-session"),
            pipeline.oneshot(ToolInvocation::new("get_group", args)),
        )
        .await
        .unwrap();

        assert_eq!(output.value, json!({"ok": true}));
        let requests = dispatcher.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].path, "/api/v1/groups/id/g1");
        assert_eq!(requests[0].credential, Credential::new("sk-session"));
    }
}
