//! Model Context Protocol over JSON-RPC 2.0.

pub mod jsonrpc;
pub mod server;

pub use server::{McpServer, PROTOCOL_VERSION, SERVER_NAME};
