//! Road network data model
//!
//! Nodes are addressed by their position in the node sequence. The external `id` is
//! carried for display only; every algorithm works on the contiguous index `[0, n)`.

use serde::Serialize;

/// Geographic origin of a projected node (degrees)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoCoord {
    pub lat: f64,
    pub lon: f64,
}

/// Graph vertex in model units
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    /// External identifier (OSM id, POLY id)
    pub id: String,
    pub x: f64,
    pub y: f64,
    /// Latitude/longitude before projection, when the source was geographic
    pub origin: Option<GeoCoord>,
}

impl Node {
    pub fn new(id: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            origin: None,
        }
    }

    pub fn with_origin(mut self, origin: GeoCoord) -> Self {
        self.origin = Some(origin);
        self
    }

    /// Euclidean distance to another node in model units
    pub fn distance_to(&self, other: &Node) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Polyline of node indices with a one-way flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Way {
    pub nodes: Vec<usize>,
    pub oneway: bool,
}

impl Way {
    pub fn new(nodes: Vec<usize>, oneway: bool) -> Self {
        Self { nodes, oneway }
    }

    /// Two-node, two-way segment
    pub fn segment(a: usize, b: usize) -> Self {
        Self {
            nodes: vec![a, b],
            oneway: false,
        }
    }

    /// Number of consecutive node pairs
    pub fn segment_count(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    /// First and last node, if the way has any
    pub fn endpoints(&self) -> Option<(usize, usize)> {
        Some((*self.nodes.first()?, *self.nodes.last()?))
    }

    /// True when the endpoints are `{a, b}` in either order
    pub fn connects(&self, a: usize, b: usize) -> bool {
        match self.endpoints() {
            Some((first, last)) => (first == a && last == b) || (first == b && last == a),
            None => false,
        }
    }
}

/// Directionality summary of a built graph.
///
/// Only refines error classification; the search itself ignores it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GraphType {
    pub is_directed: bool,
    pub has_one_way_streets: bool,
}

/// Importer output consumed by the graph builder
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportedGraph {
    pub nodes: Vec<Node>,
    pub ways: Vec<Way>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_distance() {
        let a = Node::new("a", 0.0, 0.0);
        let b = Node::new("b", 3.0, 4.0);
        assert_eq!(a.distance_to(&b), 5.0);
        assert_eq!(b.distance_to(&b), 0.0);
    }

    #[test]
    fn test_way_connects_either_direction() {
        let way = Way::new(vec![4, 7, 9], true);
        assert!(way.connects(4, 9));
        assert!(way.connects(9, 4));
        assert!(!way.connects(4, 7));
        assert_eq!(way.segment_count(), 2);
    }

    #[test]
    fn test_empty_way() {
        let way = Way::new(Vec::new(), false);
        assert_eq!(way.endpoints(), None);
        assert_eq!(way.segment_count(), 0);
        assert!(!way.connects(0, 0));
    }
}
