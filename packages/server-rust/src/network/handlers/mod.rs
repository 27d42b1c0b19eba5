//! HTTP handler definitions for the MCP transport.
//!
//! This module defines `AppState` (the shared state carried through axum
//! extractors) and re-exports all handler functions for building the router.

pub mod health;
pub mod mcp;

pub use health::{health_handler, liveness_handler, readiness_handler};
pub use mcp::mcp_handler;

use std::sync::Arc;
use std::time::Instant;

use super::{NetworkConfig, ShutdownController};
use crate::mcp::McpServer;

/// Shared application state passed to all axum handlers via `State` extraction.
///
/// Holds `Arc` references to shared resources so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    /// Protocol handler shared with every request.
    pub mcp: Arc<McpServer>,
    /// Graceful shutdown controller with health state and in-flight tracking.
    pub shutdown: Arc<ShutdownController>,
    pub config: Arc<NetworkConfig>,
    /// Server process start time, used for uptime calculation.
    pub start_time: Instant,
}
