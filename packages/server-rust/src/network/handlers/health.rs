//! `/health`, `/health/live` and `/health/ready`.
//!
//! None of these reach the Open WebUI backend: its availability is reported
//! per tool call, and a restart would not fix it.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use super::AppState;
use crate::mcp::SERVER_NAME;
use crate::network::HealthState;

/// Body of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub state: &'static str,
    pub server: &'static str,
    pub version: &'static str,
    pub tools: usize,
    pub in_flight: u64,
    pub uptime_secs: u64,
}

impl HealthReport {
    fn snapshot(state: &AppState) -> Self {
        Self {
            state: state.shutdown.health_state().as_str(),
            server: SERVER_NAME,
            version: env!("CARGO_PKG_VERSION"),
            tools: state.mcp.registry().len(),
            in_flight: state.shutdown.in_flight_count(),
            uptime_secs: state.start_time.elapsed().as_secs(),
        }
    }
}

/// Always 200; monitors read `state` to tell "draining" from "down".
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthReport> {
    Json(HealthReport::snapshot(&state))
}

pub async fn liveness_handler() -> StatusCode {
    StatusCode::OK
}

/// 200 only while `Ready`: 503 before `serve()`, while draining and after stop.
pub async fn readiness_handler(State(state): State<AppState>) -> StatusCode {
    match state.shutdown.health_state() {
        HealthState::Ready => StatusCode::OK,
        HealthState::Starting | HealthState::Draining | HealthState::Stopped => {
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
