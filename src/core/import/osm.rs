//! OpenStreetMap XML importer
//!
//! Only `<node>`, `<way>`, `<nd>` and the `oneway` tag are read; relations and every
//! other tag are ignored. Way references are resolved after the whole document has
//! been read, so element order does not matter. Malformed records are skipped with
//! a warning; only a broken XML document aborts the import.

use crate::core::model::{GeoCoord, ImportedGraph, Node, Way};
use crate::core::projection::Projector;
use log::{debug, warn};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use roadgraph_common::{Error, Result};
use std::collections::HashMap;

/// Tag values that mark a way as one-way
const ONEWAY_VALUES: &[&str] = &["yes", "true", "1"];

#[derive(Debug)]
struct RawNode {
    id: String,
    lat: f64,
    lon: f64,
}

#[derive(Debug, Default)]
struct RawWay {
    id: String,
    refs: Vec<String>,
    oneway: bool,
}

fn xml_error(reader: &Reader<&[u8]>, err: impl std::fmt::Display) -> Error {
    Error::Xml(format!("at byte {}: {err}", reader.buffer_position()))
}

/// Attribute values by name, unescaped
fn attributes(reader: &Reader<&[u8]>, element: &BytesStart) -> Result<HashMap<String, String>> {
    let mut values = HashMap::new();
    for attr in element.attributes() {
        let attr = attr.map_err(|e| xml_error(reader, e))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| xml_error(reader, e))?
            .into_owned();
        values.insert(key, value);
    }
    Ok(values)
}

/// Validate a `<node>` element; `None` (with a warning) when it must be skipped
fn read_node(attrs: &HashMap<String, String>) -> Option<RawNode> {
    let Some(id) = attrs.get("id").filter(|id| id.trim().parse::<i64>().is_ok()) else {
        warn!("Skipping node without a valid id: {attrs:?}");
        return None;
    };
    let id = id.trim().to_string();

    let coordinate = |name: &str| attrs.get(name).and_then(|v| v.trim().parse::<f64>().ok());
    let (Some(lat), Some(lon)) = (coordinate("lat"), coordinate("lon")) else {
        warn!("Skipping node {id}: missing or unparsable lat/lon");
        return None;
    };

    // NaN passes every range comparison; poles excluded since Mercator diverges there
    if !lat.is_finite()
        || !lon.is_finite()
        || lat.abs() >= 90.0
        || !(-180.0..=180.0).contains(&lon)
    {
        warn!("Skipping node {id}: coordinate ({lat}, {lon}) out of range");
        return None;
    }

    Some(RawNode { id, lat, lon })
}

/// Parse an OSM XML document into projected nodes and ways
pub fn parse_osm(xml: &str, projector: &Projector) -> Result<ImportedGraph> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut raw_nodes: Vec<RawNode> = Vec::new();
    let mut raw_ways: Vec<RawWay> = Vec::new();
    let mut current_way: Option<RawWay> = None;

    loop {
        let event = reader.read_event().map_err(|e| xml_error(&reader, e))?;
        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let is_empty = matches!(event, Event::Empty(_));
                match e.name().as_ref() {
                    b"node" => {
                        let attrs = attributes(&reader, e)?;
                        if let Some(node) = read_node(&attrs) {
                            raw_nodes.push(node);
                        }
                    }
                    b"way" => {
                        let attrs = attributes(&reader, e)?;
                        let way = RawWay {
                            id: attrs.get("id").cloned().unwrap_or_default(),
                            ..RawWay::default()
                        };
                        if is_empty {
                            raw_ways.push(way);
                        } else {
                            current_way = Some(way);
                        }
                    }
                    b"nd" => {
                        if let Some(way) = current_way.as_mut() {
                            let attrs = attributes(&reader, e)?;
                            match attrs.get("ref") {
                                Some(node_ref) => way.refs.push(node_ref.trim().to_string()),
                                None => warn!("Way {}: <nd> without ref", way.id),
                            }
                        }
                    }
                    b"tag" => {
                        if let Some(way) = current_way.as_mut() {
                            let attrs = attributes(&reader, e)?;
                            if attrs.get("k").map(String::as_str) == Some("oneway") {
                                way.oneway = attrs
                                    .get("v")
                                    .is_some_and(|v| ONEWAY_VALUES.contains(&v.trim()));
                            }
                        }
                    }
                    _ => {}
                }
            }
            Event::End(ref e) if e.name().as_ref() == b"way" => {
                if let Some(way) = current_way.take() {
                    raw_ways.push(way);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    resolve(raw_nodes, raw_ways, projector)
}

/// Deduplicate nodes, project them and map way references to node indices
fn resolve(raw_nodes: Vec<RawNode>, raw_ways: Vec<RawWay>, projector: &Projector) -> Result<ImportedGraph> {
    let mut index_by_id: HashMap<String, usize> = HashMap::with_capacity(raw_nodes.len());
    let mut kept: Vec<RawNode> = Vec::with_capacity(raw_nodes.len());
    for node in raw_nodes {
        if index_by_id.contains_key(&node.id) {
            warn!("Skipping duplicate node id {}", node.id);
            continue;
        }
        index_by_id.insert(node.id.clone(), kept.len());
        kept.push(node);
    }

    let coords: Vec<(f64, f64)> = kept.iter().map(|node| (node.lat, node.lon)).collect();
    let projected = projector.project_batch(&coords);
    let nodes: Vec<Node> = kept
        .into_iter()
        .zip(projected)
        .map(|(raw, (x, y))| {
            Node::new(raw.id, x, y).with_origin(GeoCoord {
                lat: raw.lat,
                lon: raw.lon,
            })
        })
        .collect();

    let mut ways = Vec::with_capacity(raw_ways.len());
    for raw in raw_ways {
        let total = raw.refs.len();
        let indices: Vec<usize> = raw
            .refs
            .iter()
            .filter_map(|node_ref| index_by_id.get(node_ref).copied())
            .collect();

        if indices.len() < total {
            warn!(
                "Way {}: dropped {} references to unknown nodes",
                raw.id,
                total - indices.len()
            );
        }
        if indices.len() < 2 {
            warn!("Skipping way {}: fewer than two resolvable nodes", raw.id);
            continue;
        }
        ways.push(Way::new(indices, raw.oneway));
    }

    debug!("OSM document resolved to {} nodes and {} ways", nodes.len(), ways.len());
    Ok(ImportedGraph { nodes, ways })
}
