//! Error types and utilities for the roadgraph engine
//!
//! Import, configuration and I/O failures share one error type. Search failures are
//! not errors of this kind: they are values (`PathError`) owned by the engine.

use strsim::{jaro_winkler, normalized_levenshtein};
use thiserror::Error;

/// File extensions the importers understand, lowercase and without the dot.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["osm", "xml", "poly"];

/// Find the closest supported extension for a misspelled one.
///
/// Scoring is 70% Jaro-Winkler plus 30% normalized Levenshtein. Extensions are short,
/// so no prefix or length bonuses apply.
///
/// Minimum threshold: 0.65
fn find_best_fuzzy_match(input: &str, candidates: &[&str]) -> Option<String> {
    let input_lower = input.to_lowercase();
    let min_threshold = 0.65;

    let mut best_match = None;
    let mut best_score = 0.0f64;

    for candidate in candidates {
        let jw_score = jaro_winkler(&input_lower, candidate);
        let lev_score = normalized_levenshtein(&input_lower, candidate);
        let score = (jw_score * 0.7) + (lev_score * 0.3);

        if score >= min_threshold && score > best_score {
            best_score = score;
            best_match = Some((*candidate).to_string());
        }
    }

    best_match
}

/// Suggest a supported extension for a potentially misspelled one.
///
/// Returns `None` when the extension is already supported (case-insensitive) or when
/// nothing is close enough to be a plausible typo.
pub fn suggest_format(extension: &str) -> Option<String> {
    let trimmed = extension.trim_start_matches('.');
    if SUPPORTED_EXTENSIONS
        .iter()
        .any(|ext| ext.eq_ignore_ascii_case(trimmed))
    {
        return None;
    }

    find_best_fuzzy_match(trimmed, SUPPORTED_EXTENSIONS)
}

/// Main error type for roadgraph operations
#[derive(Debug, Error)]
pub enum Error {
    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The XML document itself could not be read
    #[error("XML error: {0}")]
    Xml(String),

    /// Structural problem that makes the whole import impossible
    #[error("{format} parse error at line {line}: {message}")]
    Parse {
        format: &'static str,
        line: usize,
        message: String,
    },

    /// Input file extension not handled by any importer
    #[error("unsupported input format '{extension}'{}", suggestion_hint(.suggestion))]
    UnsupportedFormat {
        extension: String,
        suggestion: Option<String>,
    },

    /// Invalid parameters or input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Invalid engine configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

fn suggestion_hint(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(ext) => format!(" (did you mean '.{ext}'?)"),
        None => String::new(),
    }
}

impl Error {
    /// Build an `UnsupportedFormat` error, attaching a fuzzy suggestion when one exists
    pub fn unsupported_format(extension: &str) -> Self {
        Error::UnsupportedFormat {
            extension: extension.to_string(),
            suggestion: suggest_format(extension),
        }
    }
}

/// Convenience result type for roadgraph operations
pub type Result<T> = std::result::Result<T, Error>;
