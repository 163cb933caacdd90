//! # Roadgraph Library
//!
//! Road-network graph engine: imports OpenStreetMap XML or POLY node/edge lists,
//! projects them onto a plane, builds a directed weighted graph and answers
//! shortest-path and nearest-node queries.
//!
//! ## Features
//!
//! - **Projection**: spherical Mercator, normalized to model units (2 m each by default)
//! - **One-way streets**: directed arcs from the `oneway` tag, with a hint when a
//!   route fails because of them
//! - **Spatial picking**: R-tree nearest-node lookup in screen space
//! - **Editing**: remove a way, or replace all ways with a Delaunay triangulation
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use roadgraph::GraphSession;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut session = GraphSession::default();
//!     let stats = session.load_file("monaco.osm")?;
//!     println!("{} nodes, {} arcs", stats.nodes, stats.arcs);
//!
//!     match session.shortest_path(0, 42) {
//!         Ok(route) => println!("{:.1} m via {} nodes", route.distance_meters, route.path.len()),
//!         Err(e) => println!("{}: {}", e.kind, e.details),
//!     }
//!     Ok(())
//! }
//! ```

// Re-export core types that users might need
pub use crate::core::config::{EngineConfig, PickingConfig, ViewportConfig};
pub use crate::core::edit::{
    remove_edge, synthesize_ways, DelaunayTriangulator, EditError, Triangulator,
};
pub use crate::core::graph::RoadGraph;
pub use crate::core::import::{import_file, parse_osm, parse_poly, ImportFormat};
pub use crate::core::model::{GeoCoord, GraphType, ImportedGraph, Node, Way};
pub use crate::core::projection::{project, Projector, EARTH_RADIUS_M};
pub use crate::core::route::{shortest_path, PathError, PathErrorKind, PathSuccess};
pub use crate::core::selection::{Selection, SelectionEvent};
pub use crate::core::session::{ClickOutcome, GraphSession, GraphSnapshot, GraphStats};
pub use crate::core::spatial::{nearest_linear, Nearest, SpatialIndex};
pub use crate::core::viewport::{DisplayScale, ScalingParams};
pub use roadgraph_common::{suggest_format, Error, Result};

// Internal modules
mod core;
