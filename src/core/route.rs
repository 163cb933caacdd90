use crate::core::graph::RoadGraph;
use log::debug;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;
use std::time::Instant;

/// Successful search payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathSuccess {
    /// Total distance in model units
    pub distance: f64,
    /// `distance * meters_per_unit`
    pub distance_meters: f64,
    /// Node indices from start to end, inclusive
    pub path: Vec<usize>,
    /// Nodes finalized before the search stopped
    pub visited_count: usize,
    pub elapsed_ms: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PathErrorKind {
    /// Empty graph or query index out of bounds
    InvalidNodes,
    /// The end node is not reachable from the start node
    NoPath,
    /// Unreachable, and one-way streets are the likely cause
    OneWayBlocked,
    /// Global connectivity report; never produced by a point-to-point search
    DisconnectedGraph,
}

impl fmt::Display for PathErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PathErrorKind::InvalidNodes => "INVALID_NODES",
            PathErrorKind::NoPath => "NO_PATH",
            PathErrorKind::OneWayBlocked => "ONE_WAY_BLOCKED",
            PathErrorKind::DisconnectedGraph => "DISCONNECTED_GRAPH",
        };
        f.write_str(name)
    }
}

/// Search failure, returned as a value so callers can render it directly
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[error("{message}")]
pub struct PathError {
    pub kind: PathErrorKind,
    pub message: String,
    pub details: String,
}

impl PathError {
    pub fn invalid_nodes() -> Self {
        Self {
            kind: PathErrorKind::InvalidNodes,
            message: "Invalid nodes or empty graph".to_string(),
            details: "Check that a graph is loaded and that both selected nodes exist."
                .to_string(),
        }
    }

    pub fn no_path() -> Self {
        Self {
            kind: PathErrorKind::NoPath,
            message: "No path exists between the selected nodes".to_string(),
            details: "The selected nodes are not connected in the graph.".to_string(),
        }
    }

    pub fn one_way_blocked() -> Self {
        Self {
            kind: PathErrorKind::OneWayBlocked,
            message: "Path blocked by one-way streets".to_string(),
            details: "Street directions prevent reaching the destination. Try selecting different nodes."
                .to_string(),
        }
    }

    pub fn disconnected(components: usize) -> Self {
        Self {
            kind: PathErrorKind::DisconnectedGraph,
            message: "The graph is disconnected".to_string(),
            details: format!("The graph has {components} separate components; some node pairs have no path."),
        }
    }
}

/// Min-heap entry keyed by tentative distance, ties popping the lower node index
#[derive(Copy, Clone, Debug)]
struct State {
    cost: f64,
    node: usize,
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for State {}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Single-source Dijkstra from `start`, stopping as soon as `end` is finalized.
///
/// Relaxation pushes a fresh heap entry instead of decreasing a key, so the heap
/// can hold stale entries for nodes that were already finalized. Popping such an
/// entry is always safe to skip: with non-negative weights a node's distance is
/// final the first time it is popped.
///
/// Ties between equal tentative distances are broken by heap order, which is not
/// deterministic across graphs with symmetric distances.
pub fn shortest_path(
    graph: &RoadGraph,
    start: usize,
    end: usize,
    meters_per_unit: f64,
) -> Result<PathSuccess, PathError> {
    let n = graph.node_count();
    if n == 0 || start >= n || end >= n {
        return Err(PathError::invalid_nodes());
    }

    let started = Instant::now();
    let mut dist = vec![f64::INFINITY; n];
    let mut prev: Vec<Option<usize>> = vec![None; n];
    let mut visited = vec![false; n];
    let mut visited_count = 0usize;

    let mut heap = BinaryHeap::new();
    dist[start] = 0.0;
    heap.push(State {
        cost: 0.0,
        node: start,
    });

    while let Some(State { cost, node }) = heap.pop() {
        if visited[node] {
            continue;
        }
        visited[node] = true;
        visited_count += 1;

        if node == end {
            break;
        }

        for (next, weight) in graph.arcs_from(node) {
            let alt = cost + weight;
            if alt < dist[next] {
                dist[next] = alt;
                prev[next] = Some(node);
                heap.push(State {
                    cost: alt,
                    node: next,
                });
            }
        }
    }

    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
    debug!("Dijkstra {start} -> {end}: {visited_count} nodes finalized in {elapsed_ms:.3}ms");

    if dist[end].is_infinite() {
        return Err(classify_unreachable(graph, start, end));
    }

    let mut path = vec![end];
    let mut current = end;
    while let Some(previous) = prev[current] {
        path.push(previous);
        current = previous;
    }
    path.reverse();

    Ok(PathSuccess {
        distance: dist[end],
        distance_meters: dist[end] * meters_per_unit,
        path,
        visited_count,
        elapsed_ms,
    })
}

/// Attribute an unreachable target to one-way streets or to plain disconnection.
///
/// This is a hint for the user, not a proof: it only looks at whether the graph has
/// one-way streets and whether the start has no way out or the end has no way in.
/// A graph can satisfy it and still be disconnected for unrelated reasons, and a
/// one-way restriction deeper in the network is reported as `NoPath`.
fn classify_unreachable(graph: &RoadGraph, start: usize, end: usize) -> PathError {
    let one_way_issue = graph.graph_type().has_one_way_streets
        && (graph.out_degree(start) == 0 || !graph.has_incoming(end));

    if one_way_issue {
        PathError::one_way_blocked()
    } else {
        PathError::no_path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{Node, Way};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_heap_pops_lowest_cost_then_lowest_node() {
        let mut heap: BinaryHeap<State> = [
            State { cost: 2.0, node: 0 },
            State { cost: 1.0, node: 5 },
            State { cost: 1.0, node: 3 },
            State { cost: 0.5, node: 9 },
        ]
        .into_iter()
        .collect();

        let order: Vec<usize> = std::iter::from_fn(|| heap.pop().map(|state| state.node)).collect();
        assert_eq!(order, vec![9, 3, 5, 0]);
    }

    #[test]
    fn test_state_equality_agrees_with_ordering() {
        let a = State { cost: 1.0, node: 3 };
        let b = State { cost: 1.0, node: 4 };

        assert_ne!(a, b);
        assert_ne!(a.cmp(&b), Ordering::Equal);
        assert_eq!(a, State { cost: 1.0, node: 3 });

        // NaN is equal to itself under the total order
        let nan = State { cost: f64::NAN, node: 1 };
        assert_eq!(nan, nan);
        assert_eq!(nan.cmp(&nan), Ordering::Equal);
    }

    fn square() -> Vec<Node> {
        vec![
            Node::new("0", 0.0, 0.0),
            Node::new("1", 10.0, 0.0),
            Node::new("2", 10.0, 10.0),
            Node::new("3", 0.0, 10.0),
        ]
    }

    fn path_weight(graph: &RoadGraph, path: &[usize]) -> f64 {
        path.windows(2)
            .map(|pair| {
                graph
                    .arcs_from(pair[0])
                    .filter(|&(target, _)| target == pair[1])
                    .map(|(_, weight)| weight)
                    .fold(f64::INFINITY, f64::min)
            })
            .sum()
    }

    #[test]
    fn test_square_polyline_route() {
        let graph = RoadGraph::build(&square(), &[Way::new(vec![0, 1, 2, 3], false)]);
        let result = shortest_path(&graph, 0, 2, 2.0).unwrap();

        assert_eq!(result.distance, 20.0);
        assert_eq!(result.distance_meters, 40.0);
        assert_eq!(result.path, vec![0, 1, 2]);
        assert!(result.visited_count >= 3);
        assert!(result.elapsed_ms >= 0.0);
    }

    #[test]
    fn test_same_start_and_end() {
        let graph = RoadGraph::build(&square(), &[Way::new(vec![0, 1, 2, 3], false)]);

        for node in 0..4 {
            let result = shortest_path(&graph, node, node, 2.0).unwrap();
            assert_eq!(result.distance, 0.0);
            assert_eq!(result.path, vec![node]);
            assert_eq!(result.visited_count, 1);
        }
    }

    #[test]
    fn test_isolated_node_reaches_itself() {
        let graph = RoadGraph::build(&square(), &[]);
        let result = shortest_path(&graph, 3, 3, 2.0).unwrap();
        assert_eq!(result.path, vec![3]);
    }

    #[test]
    fn test_one_way_against_direction_fails() {
        let graph = RoadGraph::build(&square(), &[Way::new(vec![0, 1], true)]);
        let err = shortest_path(&graph, 1, 0, 2.0).unwrap_err();

        assert!(matches!(
            err.kind,
            PathErrorKind::NoPath | PathErrorKind::OneWayBlocked
        ));
        // Node 1 has no outgoing arc in a graph with one-way streets
        assert_eq!(err.kind, PathErrorKind::OneWayBlocked);

        let ok = shortest_path(&graph, 0, 1, 2.0).unwrap();
        assert_eq!(ok.path, vec![0, 1]);
    }

    #[test]
    fn test_empty_graph_is_invalid() {
        let graph = RoadGraph::build(&[], &[]);
        let err = shortest_path(&graph, 0, 0, 2.0).unwrap_err();
        assert_eq!(err.kind, PathErrorKind::InvalidNodes);
    }

    #[test]
    fn test_out_of_bounds_is_invalid() {
        let graph = RoadGraph::build(&square(), &[Way::new(vec![0, 1], false)]);
        assert_eq!(
            shortest_path(&graph, 0, 4, 2.0).unwrap_err().kind,
            PathErrorKind::InvalidNodes
        );
        assert_eq!(
            shortest_path(&graph, 9, 0, 2.0).unwrap_err().kind,
            PathErrorKind::InvalidNodes
        );
    }

    #[test]
    fn test_disconnected_two_way_graph_is_no_path() {
        let ways = [Way::segment(0, 1), Way::segment(2, 3)];
        let graph = RoadGraph::build(&square(), &ways);
        let err = shortest_path(&graph, 0, 3, 2.0).unwrap_err();

        assert_eq!(err.kind, PathErrorKind::NoPath);
        assert_eq!(err.to_string(), "No path exists between the selected nodes");
    }

    #[test]
    fn test_one_way_deep_in_network_is_reported_as_no_path() {
        // 0 <-> 1 -> 2, 3 <-> 2: end has incoming arcs and start has outgoing ones,
        // so the heuristic does not blame directionality
        let ways = [
            Way::segment(0, 1),
            Way::new(vec![2, 1], true),
            Way::segment(3, 2),
        ];
        let graph = RoadGraph::build(&square(), &ways);
        let err = shortest_path(&graph, 0, 3, 2.0).unwrap_err();

        assert_eq!(err.kind, PathErrorKind::NoPath);
    }

    #[test]
    fn test_parallel_arcs_shortest_survives() {
        let nodes = vec![
            Node::new("a", 0.0, 0.0),
            Node::new("b", 4.0, 3.0),
            Node::new("c", 8.0, 0.0),
        ];
        // Direct a-c (8) competes with a-b-c (5 + 5)
        let ways = [Way::new(vec![0, 1, 2], false), Way::segment(0, 2)];
        let graph = RoadGraph::build(&nodes, &ways);
        let result = shortest_path(&graph, 0, 2, 1.0).unwrap();

        assert_eq!(result.path, vec![0, 2]);
        assert_eq!(result.distance, 8.0);
    }

    #[test]
    fn test_zero_weight_arcs() {
        let nodes = vec![
            Node::new("a", 0.0, 0.0),
            Node::new("b", 0.0, 0.0),
            Node::new("c", 3.0, 4.0),
        ];
        let graph = RoadGraph::build(&nodes, &[Way::new(vec![0, 1, 2], false)]);
        let result = shortest_path(&graph, 0, 2, 1.0).unwrap();

        assert_eq!(result.distance, 5.0);
        assert_eq!(result.path, vec![0, 1, 2]);
    }

    #[test]
    fn test_path_weight_matches_distance_on_random_graphs() {
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..20 {
            let n = 60;
            let nodes: Vec<Node> = (0..n)
                .map(|i| {
                    Node::new(
                        i.to_string(),
                        rng.random_range(0.0..500.0),
                        rng.random_range(0.0..500.0),
                    )
                })
                .collect();
            let ways: Vec<Way> = (0..150)
                .map(|_| {
                    let len = rng.random_range(2..5);
                    let refs = (0..len).map(|_| rng.random_range(0..n)).collect();
                    Way::new(refs, rng.random_bool(0.3))
                })
                .collect();
            let graph = RoadGraph::build(&nodes, &ways);

            for _ in 0..20 {
                let start = rng.random_range(0..n);
                let end = rng.random_range(0..n);
                match shortest_path(&graph, start, end, 2.0) {
                    Ok(result) => {
                        assert_eq!(result.path.first(), Some(&start));
                        assert_eq!(result.path.last(), Some(&end));
                        let summed = path_weight(&graph, &result.path);
                        let tolerance = 1e-9 * result.distance.max(1.0);
                        assert!((summed - result.distance).abs() <= tolerance);
                        assert!((result.distance_meters - result.distance * 2.0).abs() <= tolerance);
                    }
                    Err(err) => {
                        assert!(matches!(
                            err.kind,
                            PathErrorKind::NoPath | PathErrorKind::OneWayBlocked
                        ));
                    }
                }
            }
        }
    }

    #[test]
    fn test_error_kind_serializes_screaming_case() {
        let json = serde_json::to_string(&PathError::one_way_blocked()).unwrap();
        assert!(json.contains("\"kind\":\"ONE_WAY_BLOCKED\""));
        assert_eq!(PathErrorKind::DisconnectedGraph.to_string(), "DISCONNECTED_GRAPH");
    }
}
