//! Text importers producing `(nodes, ways)` for the graph builder

pub mod osm;
pub mod poly;

use crate::core::model::ImportedGraph;
use crate::core::projection::Projector;
use log::info;
use roadgraph_common::{Error, Result};
use std::path::Path;

pub use osm::parse_osm;
pub use poly::parse_poly;

/// Input formats, detected from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    /// OpenStreetMap XML (`.osm`, `.xml`)
    Osm,
    /// Plane-coordinate node/edge list (`.poly`)
    Poly,
}

impl ImportFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();

        match extension.to_ascii_lowercase().as_str() {
            "osm" | "xml" => Ok(ImportFormat::Osm),
            "poly" => Ok(ImportFormat::Poly),
            _ => Err(Error::unsupported_format(extension)),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ImportFormat::Osm => "OSM",
            ImportFormat::Poly => "POLY",
        }
    }

    /// Parse already-loaded file content
    pub fn parse(&self, content: &str, projector: &Projector) -> Result<ImportedGraph> {
        match self {
            ImportFormat::Osm => parse_osm(content, projector),
            ImportFormat::Poly => parse_poly(content),
        }
    }
}

/// Read a file and parse it with the importer matching its extension
pub fn import_file(path: &Path, projector: &Projector) -> Result<ImportedGraph> {
    let format = ImportFormat::from_path(path)?;
    let content = std::fs::read_to_string(path)?;
    let imported = format.parse(&content, projector)?;

    info!(
        "Imported {} from {}: {} nodes, {} ways",
        format.name(),
        path.display(),
        imported.nodes.len(),
        imported.ways.len()
    );
    Ok(imported)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            ImportFormat::from_path(Path::new("monaco.osm")).unwrap(),
            ImportFormat::Osm
        );
        assert_eq!(
            ImportFormat::from_path(Path::new("export.XML")).unwrap(),
            ImportFormat::Osm
        );
        assert_eq!(
            ImportFormat::from_path(Path::new("dir/grid.poly")).unwrap(),
            ImportFormat::Poly
        );
    }

    #[test]
    fn test_unknown_extension_suggests_format() {
        let err = ImportFormat::from_path(Path::new("map.osn")).unwrap_err();
        match err {
            Error::UnsupportedFormat {
                extension,
                suggestion,
            } => {
                assert_eq!(extension, "osn");
                assert_eq!(suggestion.as_deref(), Some("osm"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_extension() {
        assert!(matches!(
            ImportFormat::from_path(Path::new("README")),
            Err(Error::UnsupportedFormat { suggestion: None, .. })
        ));
    }
}
