use crate::core::model::{GraphType, Node, Way};
use log::{info, warn};
use petgraph::algo::connected_components;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

/// Directed adjacency structure derived from nodes and ways.
///
/// Graph node `i` is node `i` of the snapshot it was built from. Edge weights are
/// Euclidean distances in model units. Parallel arcs are kept.
#[derive(Debug, Clone)]
pub struct RoadGraph {
    graph: DiGraph<(), f64>,
    graph_type: GraphType,
    skipped_segments: usize,
}

impl RoadGraph {
    /// Build the adjacency structure from scratch.
    ///
    /// Segments that reference an index outside `[0, nodes.len())`, or whose length
    /// overflows to a non-finite weight, are skipped (and counted) instead of failing
    /// the build: a partially corrupt import still yields a usable graph.
    pub fn build(nodes: &[Node], ways: &[Way]) -> Self {
        let mut graph = DiGraph::with_capacity(nodes.len(), ways.len() * 2);
        for _ in nodes {
            graph.add_node(());
        }

        let mut graph_type = GraphType::default();
        let mut skipped_segments = 0;
        let mut non_finite_segments = 0;

        for way in ways {
            for window in way.nodes.windows(2) {
                let (u, v) = (window[0], window[1]);

                let (Some(node_u), Some(node_v)) = (nodes.get(u), nodes.get(v)) else {
                    skipped_segments += 1;
                    continue;
                };

                let weight = node_u.distance_to(node_v);
                if !weight.is_finite() {
                    non_finite_segments += 1;
                    continue;
                }
                graph.add_edge(NodeIndex::new(u), NodeIndex::new(v), weight);

                if way.oneway {
                    graph_type.has_one_way_streets = true;
                    graph_type.is_directed = true;
                } else {
                    graph.add_edge(NodeIndex::new(v), NodeIndex::new(u), weight);
                }
            }
        }

        if skipped_segments > 0 {
            warn!("Skipped {skipped_segments} way segments referencing unknown node indices");
        }
        if non_finite_segments > 0 {
            warn!("Skipped {non_finite_segments} way segments with a non-finite length");
            skipped_segments += non_finite_segments;
        }
        info!(
            "Built graph: {} nodes, {} arcs (one-way streets: {})",
            graph.node_count(),
            graph.edge_count(),
            graph_type.has_one_way_streets
        );

        RoadGraph {
            graph,
            graph_type,
            skipped_segments,
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn arc_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn graph_type(&self) -> GraphType {
        self.graph_type
    }

    /// Segments dropped during the build (out-of-range indices or non-finite length)
    pub fn skipped_segments(&self) -> usize {
        self.skipped_segments
    }

    /// Outgoing arcs of `node` as `(target, weight)`; empty for unknown nodes
    pub fn arcs_from(&self, node: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let index = (node < self.node_count()).then(|| NodeIndex::new(node));
        index
            .into_iter()
            .flat_map(move |idx| self.graph.edges(idx))
            .map(|edge| (edge.target().index(), *edge.weight()))
    }

    pub fn out_degree(&self, node: usize) -> usize {
        self.arcs_from(node).count()
    }

    /// True when at least one arc anywhere targets `node`
    pub fn has_incoming(&self, node: usize) -> bool {
        node < self.node_count()
            && self
                .graph
                .edges_directed(NodeIndex::new(node), Direction::Incoming)
                .next()
                .is_some()
    }

    /// True when an arc `from -> to` exists
    pub fn has_arc(&self, from: usize, to: usize) -> bool {
        self.arcs_from(from).any(|(target, _)| target == to)
    }

    /// Number of weakly connected components (isolated nodes count as components)
    pub fn component_count(&self) -> usize {
        connected_components(&self.graph)
    }
}
