//! Tool execution pipeline.
//!
//! 1. **Catalog** (`catalog`): static Open WebUI operation descriptors
//! 2. **Registry** (`registry`): name lookup and MCP tool definitions
//! 3. **Middleware** (`middleware`): Tower layers (span, metrics)
//! 4. **Routing** (`router`): validation, credential resolution, dispatch

pub mod catalog;
pub mod middleware;
pub mod operation;
pub mod registry;
pub mod router;

pub use middleware::{build_tool_pipeline, ToolPipeline};
pub use operation::{OperationError, ToolInvocation, ToolOutput};
pub use registry::ToolRegistry;
pub use router::ToolRouter;
