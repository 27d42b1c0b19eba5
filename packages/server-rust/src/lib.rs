//! Open WebUI MCP server: exposes the Open WebUI REST API as MCP tools over
//! stdio or HTTP, forwarding each caller's own credential to the backend.

pub mod client;
pub mod config;
pub mod mcp;
pub mod network;
pub mod service;
pub mod transport;

#[cfg(test)]
mod test_support;

pub use client::BackendClient;
pub use config::{
    startup_diagnostic, BackendConfig, Config, ConfigError, LogFormat, TransportMode,
};
pub use mcp::McpServer;
pub use network::NetworkModule;
pub use service::{build_tool_pipeline, ToolPipeline, ToolRegistry, ToolRouter};
