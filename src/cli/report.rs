//! Plain-text rendering of engine results

use roadgraph::{GraphSnapshot, GraphStats, PathError, PathSuccess};
use std::fmt::Write;

pub fn render_stats(stats: &GraphStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Nodes:     {}", stats.nodes);
    let _ = writeln!(out, "Ways:      {} ({} one-way)", stats.ways, stats.one_way_ways);
    let _ = writeln!(out, "Arcs:      {}", stats.arcs);
    let _ = writeln!(
        out,
        "Directed:  {}",
        if stats.graph_type.is_directed { "yes" } else { "no" }
    );
    if stats.skipped_segments > 0 {
        let _ = writeln!(out, "Skipped:   {} segments with unknown nodes", stats.skipped_segments);
    }
    out
}

/// Node label: index, external id and geographic origin when known
pub fn describe_node(snapshot: &GraphSnapshot, index: usize) -> String {
    let Some(node) = snapshot.nodes.get(index) else {
        return format!("#{index}");
    };
    match node.origin {
        Some(origin) => format!(
            "#{index} (id {}, {:.6}, {:.6})",
            node.id, origin.lat, origin.lon
        ),
        None => format!("#{index} (id {}, x {:.2}, y {:.2})", node.id, node.x, node.y),
    }
}

pub fn render_route(snapshot: &GraphSnapshot, result: &Result<PathSuccess, PathError>) -> String {
    let mut out = String::new();
    match result {
        Ok(route) => {
            let _ = writeln!(out, "✅ Route found");
            let _ = writeln!(
                out,
                "Distance:  {:.2} units ({:.1} m)",
                route.distance, route.distance_meters
            );
            let _ = writeln!(out, "Nodes:     {}", route.path.len());
            let _ = writeln!(
                out,
                "Search:    {} nodes visited in {:.3} ms",
                route.visited_count, route.elapsed_ms
            );
            if let (Some(&first), Some(&last)) = (route.path.first(), route.path.last()) {
                let _ = writeln!(out, "From:      {}", describe_node(snapshot, first));
                let _ = writeln!(out, "To:        {}", describe_node(snapshot, last));
            }
            let path: Vec<String> = route.path.iter().map(usize::to_string).collect();
            let _ = writeln!(out, "Path:      {}", path.join(" -> "));
        }
        Err(err) => out.push_str(&render_path_error(err)),
    }
    out
}

pub fn render_path_error(err: &PathError) -> String {
    format!("❌ {}: {}\n   {}\n", err.kind, err.message, err.details)
}
