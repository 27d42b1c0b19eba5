//! Transport-level HTTP layers wrapped around every route.
//!
//! Listed outermost first: the first layer sees the request first and the
//! response last.

use axum::http::header::{HeaderName, AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method, StatusCode};
use tower::layer::util::{Identity, Stack};
use tower::ServiceBuilder;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

use super::config::NetworkConfig;

const REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");
const PROTOCOL_VERSION_HEADER: HeaderName = HeaderName::from_static("mcp-protocol-version");

/// Layer type produced by [`build_http_layers`].
pub type HttpLayers = Stack<
    PropagateRequestIdLayer,
    Stack<
        TimeoutLayer,
        Stack<
            CorsLayer,
            Stack<
                CompressionLayer,
                Stack<
                    TraceLayer<SharedClassifier<ServerErrorsAsFailures>>,
                    Stack<SetRequestIdLayer<MakeRequestUuid>, Identity>,
                >,
            >,
        >,
    >,
>;

/// Builds the HTTP layer stack.
///
/// 1. `SetRequestId` -- UUID v4 `x-request-id` unless the caller sent one
/// 2. `Trace` -- request/response spans
/// 3. `Compression` -- gzip when the client accepts it
/// 4. `CORS` -- configured origins; `Authorization` allowed for browser clients
/// 5. `Timeout` -- 408 after `request_timeout`, which sits above the backend
///    ceiling so backend timeouts still surface as tool errors
/// 6. `PropagateRequestId` -- echoes `x-request-id` on the response
#[must_use]
pub fn build_http_layers(config: &NetworkConfig) -> HttpLayers {
    ServiceBuilder::new()
        .layer(SetRequestIdLayer::new(REQUEST_ID, MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors_layer(&config.cors_origins))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            config.request_timeout,
        ))
        .layer(PropagateRequestIdLayer::new(REQUEST_ID))
        .into_inner()
}

/// `"*"` anywhere in the list allows every origin; otherwise only the
/// listed ones. Entries that are not valid header values are dropped.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|o| o.trim() == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins.iter().filter_map(|origin| {
            HeaderValue::from_str(origin.trim())
                .inspect_err(|_| warn!(%origin, "ignoring invalid CORS origin"))
                .ok()
        }))
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::POST, Method::GET])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, PROTOCOL_VERSION_HEADER])
        .expose_headers([REQUEST_ID])
}
