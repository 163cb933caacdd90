//! Owned engine state
//!
//! A `GraphSession` holds exactly one graph generation at a time. Each generation
//! is an immutable `GraphSnapshot` behind an `Arc`: imports and edits build a new
//! snapshot and swap it in, so a snapshot handed to another thread keeps answering
//! queries against the graph it was taken from.

use crate::core::config::EngineConfig;
use crate::core::edit::{self, DelaunayTriangulator, EditError, Triangulator};
use crate::core::graph::RoadGraph;
use crate::core::import::{self, ImportFormat};
use crate::core::model::{GraphType, Node, Way};
use crate::core::projection::Projector;
use crate::core::route::{self, PathError, PathSuccess};
use crate::core::selection::{Selection, SelectionEvent};
use crate::core::spatial::{Nearest, SpatialIndex};
use crate::core::viewport::{DisplayScale, ScalingParams};
use log::{debug, info};
use roadgraph_common::{Error, Result};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

/// One immutable graph generation
#[derive(Debug)]
pub struct GraphSnapshot {
    pub generation: u64,
    pub nodes: Vec<Node>,
    pub ways: Vec<Way>,
    pub graph: RoadGraph,
    pub index: SpatialIndex,
    /// `None` when the snapshot has no nodes
    pub params: Option<ScalingParams>,
}

impl GraphSnapshot {
    fn build(generation: u64, nodes: Vec<Node>, ways: Vec<Way>, config: &EngineConfig) -> Self {
        let graph = RoadGraph::build(&nodes, &ways);
        let index = SpatialIndex::build(&nodes);
        let params = ScalingParams::compute(&nodes, &config.viewport);

        Self {
            generation,
            nodes,
            ways,
            graph,
            index,
            params,
        }
    }

    pub fn graph_type(&self) -> GraphType {
        self.graph.graph_type()
    }

    pub fn stats(&self) -> GraphStats {
        let arcs = self
            .ways
            .iter()
            .map(|way| {
                let segments = way.segment_count();
                if way.oneway {
                    segments
                } else {
                    segments * 2
                }
            })
            .sum();

        GraphStats {
            nodes: self.nodes.len(),
            ways: self.ways.len(),
            arcs,
            one_way_ways: self.ways.iter().filter(|way| way.oneway).count(),
            skipped_segments: self.graph.skipped_segments(),
            graph_type: self.graph_type(),
        }
    }
}

/// Summary of the current graph generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    pub nodes: usize,
    pub ways: usize,
    /// Arcs implied by the ways: one per one-way segment, two per two-way segment
    pub arcs: usize,
    pub one_way_ways: usize,
    /// Segments the builder dropped for referencing unknown nodes
    pub skipped_segments: usize,
    pub graph_type: GraphType,
}

/// Result of a click on the canvas
#[derive(Debug, Clone, PartialEq)]
pub struct ClickOutcome {
    /// Node under the pointer, if any was within the pick radius
    pub picked: Option<usize>,
    pub event: Option<SelectionEvent>,
    /// Search result when the click completed a start/end pair
    pub route: Option<std::result::Result<PathSuccess, PathError>>,
}

/// Engine state: configuration, current graph generation and node selection
#[derive(Debug)]
pub struct GraphSession {
    config: EngineConfig,
    projector: Projector,
    snapshot: Arc<GraphSnapshot>,
    selection: Selection,
}

impl Default for GraphSession {
    fn default() -> Self {
        let config = EngineConfig::default();
        Self {
            projector: Projector::new(config.meters_per_unit),
            snapshot: Arc::new(GraphSnapshot::build(0, Vec::new(), Vec::new(), &config)),
            selection: Selection::new(),
            config,
        }
    }
}

impl GraphSession {
    /// Create an empty session; the configuration is validated first
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            projector: Projector::new(config.meters_per_unit),
            snapshot: Arc::new(GraphSnapshot::build(0, Vec::new(), Vec::new(), &config)),
            selection: Selection::new(),
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Current generation, cheap to clone and safe to send to a worker thread
    pub fn snapshot(&self) -> Arc<GraphSnapshot> {
        Arc::clone(&self.snapshot)
    }

    /// Import a file, choosing the importer from its extension
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<GraphStats> {
        let imported = import::import_file(path.as_ref(), &self.projector)?;
        self.replace(imported.nodes, imported.ways)
    }

    pub fn load_osm_str(&mut self, xml: &str) -> Result<GraphStats> {
        let imported = ImportFormat::Osm.parse(xml, &self.projector)?;
        self.replace(imported.nodes, imported.ways)
    }

    pub fn load_poly_str(&mut self, text: &str) -> Result<GraphStats> {
        let imported = ImportFormat::Poly.parse(text, &self.projector)?;
        self.replace(imported.nodes, imported.ways)
    }

    /// Install a new generation built from `nodes` and `ways`, clearing the selection.
    ///
    /// Every node must have finite coordinates; otherwise the current generation is
    /// kept and `Error::InvalidInput` names the first offending node.
    pub fn replace(&mut self, nodes: Vec<Node>, ways: Vec<Way>) -> Result<GraphStats> {
        if let Some((index, node)) = nodes
            .iter()
            .enumerate()
            .find(|(_, node)| !node.x.is_finite() || !node.y.is_finite())
        {
            return Err(Error::InvalidInput(format!(
                "node {index} ('{}') has non-finite coordinates ({}, {})",
                node.id, node.x, node.y
            )));
        }
        Ok(self.install(nodes, ways))
    }

    /// Swap in a new generation; `nodes` are already known to be finite
    fn install(&mut self, nodes: Vec<Node>, ways: Vec<Way>) -> GraphStats {
        let generation = self.snapshot.generation + 1;
        let snapshot = GraphSnapshot::build(generation, nodes, ways, &self.config);
        let stats = snapshot.stats();

        self.snapshot = Arc::new(snapshot);
        self.selection.clear();
        info!(
            "Graph generation {generation}: {} nodes, {} ways, {} arcs",
            stats.nodes, stats.ways, stats.arcs
        );
        stats
    }

    pub fn stats(&self) -> GraphStats {
        self.snapshot.stats()
    }

    pub fn shortest_path(&self, start: usize, end: usize) -> std::result::Result<PathSuccess, PathError> {
        route::shortest_path(&self.snapshot.graph, start, end, self.config.meters_per_unit)
    }

    /// Nearest node to a point in model units
    pub fn nearest(&self, x: f64, y: f64) -> Option<Nearest> {
        self.snapshot.index.nearest(x, y)
    }

    /// Node within the pick radius of a device point
    pub fn pick(&self, device_x: f64, device_y: f64, display: DisplayScale) -> Option<usize> {
        let params = self.snapshot.params.as_ref()?;
        self.snapshot
            .index
            .pick(device_x, device_y, params, display, &self.config.picking)
    }

    /// Pick a node and toggle it in the selection; a completed pair runs the search
    pub fn click(&mut self, device_x: f64, device_y: f64, display: DisplayScale) -> ClickOutcome {
        let Some(index) = self.pick(device_x, device_y, display) else {
            debug!("Click at ({device_x}, {device_y}) hit no node");
            return ClickOutcome {
                picked: None,
                event: None,
                route: None,
            };
        };

        let event = self.selection.toggle(index);
        let route = match event {
            SelectionEvent::Ready { start, end } => Some(self.shortest_path(start, end)),
            _ => None,
        };

        ClickOutcome {
            picked: Some(index),
            event: Some(event),
            route,
        }
    }

    /// Remove the first way connecting `a` and `b`, then rebuild
    pub fn remove_edge(&mut self, a: usize, b: usize) -> std::result::Result<Way, EditError> {
        let mut ways = self.snapshot.ways.clone();
        let removed = edit::remove_edge(&mut ways, a, b)?;
        self.install(self.snapshot.nodes.clone(), ways);
        Ok(removed)
    }

    /// Replace every way with a Delaunay triangulation of the nodes
    pub fn synthesize_edges(&mut self) -> std::result::Result<GraphStats, EditError> {
        self.synthesize_edges_with(&DelaunayTriangulator)
    }

    pub fn synthesize_edges_with(
        &mut self,
        triangulator: &dyn Triangulator,
    ) -> std::result::Result<GraphStats, EditError> {
        let ways = edit::synthesize_ways(&self.snapshot.nodes, triangulator)?;
        Ok(self.install(self.snapshot.nodes.clone(), ways))
    }

    /// Number of weakly connected components, or a `DisconnectedGraph` report
    pub fn check_connectivity(&self) -> std::result::Result<usize, PathError> {
        let graph = &self.snapshot.graph;
        if graph.is_empty() {
            return Err(PathError::invalid_nodes());
        }

        match graph.component_count() {
            1 => Ok(1),
            components => Err(PathError::disconnected(components)),
        }
    }
}
