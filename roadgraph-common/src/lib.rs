//! Common utilities for the roadgraph engine

pub mod error;

pub use error::{suggest_format, Error, Result, SUPPORTED_EXTENSIONS};

#[cfg(test)]
mod tests {
    use crate::error::suggest_format;

    #[test]
    fn suggest_format_returns_expected_extension() {
        assert_eq!(suggest_format("osn"), Some("osm".to_string()));
    }
}
