//! CLI-specific utilities for roadgraph
//!
//! Terminal concerns only: spinners and text rendering. The engine lives in the
//! library crate.

pub mod progress;
pub mod report;

pub use progress::ProgressManager;
