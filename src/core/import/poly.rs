//! POLY node/edge list importer
//!
//! ```text
//! 4            <- node count
//! a 0 0        <- id x y, already in plane coordinates
//! b 10 0
//! c 10 10
//! d 0 10
//! 3 0 1        <- edge header, only the first token is read
//! e0 0 1       <- _ from to (0-based)
//! e1 1 2
//! e2 2 3
//! 0            <- terminator
//! ```
//!
//! Every edge becomes a two-way, two-node way.

use crate::core::model::{ImportedGraph, Node, Way};
use log::{debug, warn};
use roadgraph_common::{Error, Result};

const FORMAT: &str = "POLY";

fn parse_error(line: usize, message: impl Into<String>) -> Error {
    Error::Parse {
        format: FORMAT,
        line,
        message: message.into(),
    }
}

/// Parse POLY text into nodes and two-way ways
pub fn parse_poly(text: &str) -> Result<ImportedGraph> {
    // (1-based line number, trimmed content), blank lines dropped
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(number, line)| (number + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty());

    let (header_line, header) = lines
        .next()
        .ok_or_else(|| parse_error(1, "empty file, expected node count"))?;
    let count: usize = header
        .split_whitespace()
        .next()
        .and_then(|token| token.parse().ok())
        .ok_or_else(|| parse_error(header_line, format!("invalid node count '{header}'")))?;

    let mut nodes = Vec::with_capacity(count);
    for expected in 0..count {
        let (number, line) = lines.next().ok_or_else(|| {
            parse_error(
                header_line,
                format!("expected {count} node lines, found {expected}"),
            )
        })?;
        nodes.push(parse_node(number, line)?);
    }

    let Some((edge_header_line, edge_header)) = lines.next() else {
        debug!("POLY file has no edge section");
        return Ok(ImportedGraph {
            nodes,
            ways: Vec::new(),
        });
    };
    let declared_edges: Option<usize> = edge_header
        .split_whitespace()
        .next()
        .and_then(|token| token.parse().ok());
    if declared_edges.is_none() {
        warn!("Line {edge_header_line}: unreadable edge count '{edge_header}'");
    }

    let mut ways = Vec::new();
    for (number, line) in lines.by_ref() {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 3 {
            break;
        }
        match (tokens[1].parse::<usize>(), tokens[2].parse::<usize>()) {
            (Ok(from), Ok(to)) => ways.push(Way::segment(from, to)),
            _ => warn!("Line {number}: skipping edge with invalid indices '{line}'"),
        }
    }

    let trailing = lines.count();
    if trailing > 0 {
        debug!("Ignoring {trailing} lines after the POLY terminator");
    }
    if let Some(declared) = declared_edges {
        if declared != ways.len() {
            warn!("Edge header declares {declared} edges, read {}", ways.len());
        }
    }

    Ok(ImportedGraph { nodes, ways })
}

fn parse_node(number: usize, line: &str) -> Result<Node> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let [id, x, y, ..] = tokens.as_slice() else {
        return Err(parse_error(number, format!("expected 'id x y', got '{line}'")));
    };

    let coordinate = |value: &str| {
        value
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| parse_error(number, format!("invalid coordinate '{value}'")))
    };

    Ok(Node::new(*id, coordinate(*x)?, coordinate(*y)?))
}
