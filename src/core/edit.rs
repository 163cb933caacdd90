//! Runtime graph edits
//!
//! Edits operate on the way list only. The caller rebuilds the graph from the
//! result, so a failed edit never leaves a half-applied way set behind.

use crate::core::model::{Node, Way};
use log::{debug, info};
use spade::{DelaunayTriangulation, Point2, Triangulation};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditError {
    #[error("No way connects nodes {a} and {b}")]
    EdgeNotFound { a: usize, b: usize },

    #[error("Triangulation needs at least 3 nodes, graph has {count}")]
    TooFewNodes { count: usize },

    #[error("All nodes are collinear or coincident; no triangle can be formed")]
    Degenerate,

    #[error("Triangulation failed: {0}")]
    Triangulation(String),
}

/// Remove the first way whose endpoints are `{a, b}` in either order.
///
/// Returns the removed way. Indices are not bounds-checked: a pair that matches
/// no way is simply `EdgeNotFound`.
pub fn remove_edge(ways: &mut Vec<Way>, a: usize, b: usize) -> Result<Way, EditError> {
    let position = ways
        .iter()
        .position(|way| way.connects(a, b))
        .ok_or(EditError::EdgeNotFound { a, b })?;

    let removed = ways.remove(position);
    info!("Removed way #{position} between nodes {a} and {b}");
    Ok(removed)
}

/// Planar triangulation over 2-D points
pub trait Triangulator {
    /// Triangles as triples of indices into `points`
    fn triangulate(&self, points: &[[f64; 2]]) -> Result<Vec<[usize; 3]>, EditError>;
}

/// Delaunay triangulation backed by `spade`
#[derive(Debug, Default, Clone, Copy)]
pub struct DelaunayTriangulator;

impl Triangulator for DelaunayTriangulator {
    fn triangulate(&self, points: &[[f64; 2]]) -> Result<Vec<[usize; 3]>, EditError> {
        let mut triangulation: DelaunayTriangulation<Point2<f64>> = DelaunayTriangulation::new();
        // spade vertex index -> first point inserted at that position
        let mut owners: HashMap<usize, usize> = HashMap::with_capacity(points.len());

        for (index, point) in points.iter().enumerate() {
            let handle = triangulation
                .insert(Point2::new(point[0], point[1]))
                .map_err(|e| EditError::Triangulation(format!("point {index}: {e}")))?;
            owners.entry(handle.index()).or_insert(index);
        }

        let mut triangles = Vec::with_capacity(triangulation.num_inner_faces());
        for face in triangulation.inner_faces() {
            let mut triangle = [0usize; 3];
            for (slot, vertex) in face.vertices().iter().enumerate() {
                triangle[slot] = *owners.get(&vertex.fix().index()).ok_or_else(|| {
                    EditError::Triangulation("face references an unknown vertex".to_string())
                })?;
            }
            triangles.push(triangle);
        }

        debug!(
            "Delaunay: {} points, {} distinct vertices, {} triangles",
            points.len(),
            owners.len(),
            triangles.len()
        );
        Ok(triangles)
    }
}

/// Build a fresh way set from a triangulation of every node.
///
/// Each triangle contributes its three sides as two-node, two-way ways, skipping
/// any unordered pair already emitted. Ways come out in triangle order.
pub fn synthesize_ways(
    nodes: &[Node],
    triangulator: &dyn Triangulator,
) -> Result<Vec<Way>, EditError> {
    if nodes.len() < 3 {
        return Err(EditError::TooFewNodes { count: nodes.len() });
    }

    let points: Vec<[f64; 2]> = nodes.iter().map(|node| [node.x, node.y]).collect();
    let triangles = triangulator.triangulate(&points)?;
    if triangles.is_empty() {
        return Err(EditError::Degenerate);
    }

    let mut seen: HashSet<(usize, usize)> = HashSet::new();
    let mut ways = Vec::new();
    for [a, b, c] in triangles {
        for (u, v) in [(a, b), (b, c), (c, a)] {
            if u == v {
                continue;
            }
            if seen.insert((u.min(v), u.max(v))) {
                ways.push(Way::segment(u, v));
            }
        }
    }

    info!(
        "Synthesized {} ways from triangulation of {} nodes",
        ways.len(),
        nodes.len()
    );
    Ok(ways)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// Fixed output, for exercising the way synthesis without spade
    struct FixedTriangles(Vec<[usize; 3]>);

    impl Triangulator for FixedTriangles {
        fn triangulate(&self, _points: &[[f64; 2]]) -> Result<Vec<[usize; 3]>, EditError> {
            Ok(self.0.clone())
        }
    }

    fn square() -> Vec<Node> {
        vec![
            Node::new("0", 0.0, 0.0),
            Node::new("1", 10.0, 0.0),
            Node::new("2", 10.0, 10.0),
            Node::new("3", 0.0, 10.0),
        ]
    }

    fn unordered(ways: &[Way]) -> Vec<(usize, usize)> {
        let mut pairs: Vec<(usize, usize)> = ways
            .iter()
            .map(|way| (way.nodes[0].min(way.nodes[1]), way.nodes[0].max(way.nodes[1])))
            .collect();
        pairs.sort_unstable();
        pairs
    }

    #[test]
    fn test_remove_edge_either_direction() {
        let mut ways = vec![
            Way::segment(0, 1),
            Way::new(vec![2, 3], true),
            Way::segment(3, 2),
        ];

        let removed = remove_edge(&mut ways, 3, 2).unwrap();
        assert_eq!(removed, Way::new(vec![2, 3], true));
        assert_eq!(ways.len(), 2);

        // Second match is still there and goes next
        let removed = remove_edge(&mut ways, 2, 3).unwrap();
        assert_eq!(removed, Way::segment(3, 2));
        assert_eq!(ways, vec![Way::segment(0, 1)]);
    }

    #[test]
    fn test_remove_edge_matches_polyline_endpoints_only() {
        let mut ways = vec![Way::new(vec![0, 1, 2], false)];

        assert_eq!(
            remove_edge(&mut ways, 0, 1),
            Err(EditError::EdgeNotFound { a: 0, b: 1 })
        );
        assert!(remove_edge(&mut ways, 2, 0).is_ok());
        assert!(ways.is_empty());
    }

    #[test]
    fn test_square_triangulation() {
        let ways = synthesize_ways(&square(), &DelaunayTriangulator).unwrap();

        // Four sides plus one diagonal
        assert_eq!(ways.len(), 5);
        assert!(ways.iter().all(|way| way.nodes.len() == 2 && !way.oneway));
        let pairs = unordered(&ways);
        for side in [(0, 1), (1, 2), (2, 3), (0, 3)] {
            assert!(pairs.contains(&side));
        }
    }

    #[test]
    fn test_random_triangulation_has_no_duplicate_pairs() {
        let mut rng = StdRng::seed_from_u64(11);
        let nodes: Vec<Node> = (0..200)
            .map(|i| {
                Node::new(
                    i.to_string(),
                    rng.random_range(0.0..1000.0),
                    rng.random_range(0.0..1000.0),
                )
            })
            .collect();

        let ways = synthesize_ways(&nodes, &DelaunayTriangulator).unwrap();
        let pairs = unordered(&ways);
        let distinct: HashSet<(usize, usize)> = pairs.iter().copied().collect();

        assert_eq!(pairs.len(), distinct.len());
        assert!(pairs.iter().all(|&(a, b)| a != b && b < nodes.len()));
        // Planar triangulation bound
        assert!(ways.len() <= 3 * nodes.len() - 6);
    }

    #[test]
    fn test_coincident_nodes_map_to_first() {
        let mut nodes = square();
        nodes.push(Node::new("dup", 10.0, 10.0));

        let ways = synthesize_ways(&nodes, &DelaunayTriangulator).unwrap();
        assert!(ways.iter().all(|way| !way.nodes.contains(&4)));
        assert_eq!(ways.len(), 5);
    }

    #[test]
    fn test_too_few_nodes() {
        let nodes = &square()[..2];
        assert_eq!(
            synthesize_ways(nodes, &DelaunayTriangulator),
            Err(EditError::TooFewNodes { count: 2 })
        );
    }

    #[test]
    fn test_collinear_nodes_are_degenerate() {
        let nodes: Vec<Node> = (0..5).map(|i| Node::new(i.to_string(), i as f64, 0.0)).collect();
        assert_eq!(
            synthesize_ways(&nodes, &DelaunayTriangulator),
            Err(EditError::Degenerate)
        );
    }

    #[test]
    fn test_synthesis_dedups_shared_sides_in_triangle_order() {
        let triangles = FixedTriangles(vec![[0, 1, 2], [2, 1, 3]]);
        let ways = synthesize_ways(&square(), &triangles).unwrap();

        assert_eq!(
            ways,
            vec![
                Way::segment(0, 1),
                Way::segment(1, 2),
                Way::segment(2, 0),
                Way::segment(1, 3),
                Way::segment(3, 2),
            ]
        );
    }

    #[test]
    fn test_non_finite_point_is_reported() {
        let mut nodes = square();
        nodes[1].x = f64::NAN;
        assert!(matches!(
            synthesize_ways(&nodes, &DelaunayTriangulator),
            Err(EditError::Triangulation(_))
        ));
    }
}
