//! Core engine modules for roadgraph
//!
//! Everything here is synchronous and free of terminal concerns; the CLI in
//! `src/cli` only formats what these modules return.

pub mod config;
pub mod edit;
pub mod graph;
pub mod import;
pub mod model;
pub mod projection;
pub mod route;
pub mod selection;
pub mod session;
pub mod spatial;
pub mod viewport;

