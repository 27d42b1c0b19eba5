//! Shared test fixtures: a recording dispatcher and an in-process fake
//! Open WebUI backend.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use axum::body::Bytes;
use axum::extract::Path;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, LOCATION};
use axum::http::{HeaderMap, HeaderName, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{any, get};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use openwebui_mcp_core::{CredentialResolver, Dispatcher, GatewayError, RequestOptions};

use crate::mcp::McpServer;
use crate::network::{AppState, NetworkConfig, ShutdownController};
use crate::service::{build_tool_pipeline, ToolRegistry, ToolRouter};

/// Full MCP server over the Open WebUI catalog and the given dispatcher.
pub(crate) fn test_mcp_server(
    dispatcher: Arc<dyn Dispatcher>,
    resolver: CredentialResolver,
) -> McpServer {
    let registry = Arc::new(ToolRegistry::open_webui());
    let router = ToolRouter::new(Arc::clone(&registry), resolver, dispatcher);
    McpServer::new(build_tool_pipeline(router), registry)
}

/// Handler state backed by a [`RecordingDispatcher`]; health is `Starting`.
pub(crate) fn test_app_state() -> AppState {
    AppState {
        mcp: Arc::new(test_mcp_server(
            Arc::new(RecordingDispatcher::default()),
            CredentialResolver::default(),
        )),
        shutdown: Arc::new(ShutdownController::new()),
        config: Arc::new(NetworkConfig::default()),
        start_time: Instant::now(),
    }
}

/// Records every request and answers `{"ok": true}` without any I/O.
#[derive(Debug, Default)]
pub(crate) struct RecordingDispatcher {
    requests: Mutex<Vec<RequestOptions>>,
}

impl RecordingDispatcher {
    pub(crate) fn requests(&self) -> Vec<RequestOptions> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Dispatcher for RecordingDispatcher {
    async fn execute(&self, request: RequestOptions) -> Result<Value, GatewayError> {
        self.requests.lock().unwrap().push(request);
        Ok(json!({"ok": true}))
    }
}

/// Starts the fake backend on an ephemeral port and returns its base URL.
///
/// Routes:
/// - `GET /api/v1/users/{id}`: `{"id", ...echo}`, or 404 for `does-not-exist`
/// - `GET /api/v1/configs/`: always 401
/// - `GET /plain`: `text/plain` body
/// - `ANY /moved`: 302 to a missing user, body `moved`
/// - `GET /boom`: 500
/// - `GET /slow`: responds after 5 s
/// - anything else: echoes method, path, query, headers and JSON body
pub(crate) async fn spawn_fake_backend() -> String {
    let app = Router::new()
        .route("/api/v1/users/{user_id}", get(user_by_id))
        .route(
            "/api/v1/configs/",
            get(|| async {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({"detail": "Not authenticated"})),
                )
            }),
        )
        .route("/plain", get(|| async { "plain body" }))
        .route(
            "/moved",
            any(|| async {
                (
                    StatusCode::FOUND,
                    [(LOCATION, "/api/v1/users/does-not-exist")],
                    "moved",
                )
            }),
        )
        .route(
            "/boom",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "internal failure") }),
        )
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "late"
            }),
        )
        .fallback(echo);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Returns a base URL on which nothing is listening.
pub(crate) async fn unused_local_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

async fn user_by_id(
    Path(user_id): Path<String>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    if user_id == "does-not-exist" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"detail": "User not found"})),
        )
            .into_response();
    }
    let mut value = echo_value(&method, &uri, &headers, &Bytes::new());
    value["id"] = json!(user_id);
    Json(value).into_response()
}

async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Json<Value> {
    Json(echo_value(&method, &uri, &headers, &body))
}

fn echo_value(method: &Method, uri: &Uri, headers: &HeaderMap, body: &Bytes) -> Value {
    let header = |name: HeaderName| headers.get(name).and_then(|v| v.to_str().ok());
    json!({
        "method": method.as_str(),
        "path": uri.path(),
        "query": uri.query(),
        "authorization": header(AUTHORIZATION),
        "content_type": header(CONTENT_TYPE),
        "body": serde_json::from_slice::<Value>(body).ok(),
    })
}
