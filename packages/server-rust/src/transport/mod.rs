//! Point-to-point transport. The networked transport lives in [`crate::network`].

pub mod stdio;

pub use stdio::{serve_lines, serve_stdio};
