//! HTTP transport: configuration, bearer-context middleware, handlers,
//! lifecycle and shutdown control.

pub mod auth;
pub mod config;
pub mod handlers;
pub mod middleware;
pub mod module;
pub mod shutdown;

pub use auth::{bearer_context, bearer_credential};
pub use config::*;
pub use handlers::AppState;
pub use middleware::{build_http_layers, HttpLayers};
pub use module::NetworkModule;
pub use shutdown::*;
