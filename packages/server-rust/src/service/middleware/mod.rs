//! Tower middleware layers for the tool pipeline.
//!
//! - [`instrument`]: invocation span, timing, outcome and metrics
//! - [`pipeline`]: composes the layers around the router

pub mod instrument;
pub mod pipeline;

pub use instrument::InstrumentLayer;
pub use pipeline::{build_tool_pipeline, ToolPipeline};
