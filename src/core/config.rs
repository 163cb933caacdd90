//! Engine configuration
//!
//! Every value has a default matching the interactive map view, so an empty TOML file
//! (or no file at all) yields a working engine.

use roadgraph_common::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Plane-to-device layout used for scale parameters and picking
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub padding: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            canvas_width: 1400.0,
            canvas_height: 900.0,
            padding: 20.0,
        }
    }
}

/// Click tolerance for nearest-node selection, in device pixels
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PickingConfig {
    pub radius_px: f64,
    pub min_radius_px: f64,
    pub tolerance: f64,
}

impl Default for PickingConfig {
    fn default() -> Self {
        Self {
            radius_px: 15.0,
            min_radius_px: 8.0,
            tolerance: 1.5,
        }
    }
}

/// Top-level engine configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Meters represented by one model unit (projector scale and path distance conversion)
    pub meters_per_unit: f64,
    pub viewport: ViewportConfig,
    pub picking: PickingConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            meters_per_unit: 2.0,
            viewport: ViewportConfig::default(),
            picking: PickingConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: EngineConfig =
            toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Reject values that would make projection or picking meaningless
    pub fn validate(&self) -> Result<()> {
        let checks = [
            ("meters_per_unit", self.meters_per_unit),
            ("viewport.canvas_width", self.viewport.canvas_width),
            ("viewport.canvas_height", self.viewport.canvas_height),
            ("picking.radius_px", self.picking.radius_px),
            ("picking.min_radius_px", self.picking.min_radius_px),
            ("picking.tolerance", self.picking.tolerance),
        ];

        for (name, value) in checks {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::Config(format!(
                    "{name} must be a positive finite number, got {value}"
                )));
            }
        }

        let padding = self.viewport.padding;
        if !padding.is_finite() || padding < 0.0 {
            return Err(Error::Config(format!(
                "viewport.padding must be a non-negative finite number, got {padding}"
            )));
        }

        if 2.0 * padding >= self.viewport.canvas_width.min(self.viewport.canvas_height) {
            return Err(Error::Config(
                "viewport.padding leaves no drawable area on the canvas".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_yields_defaults() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.meters_per_unit, 2.0);
        assert_eq!(config.viewport.padding, 20.0);
    }

    #[test]
    fn test_partial_override_keeps_other_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
            meters_per_unit = 5.0

            [picking]
            radius_px = 20.0
            "#,
        )
        .unwrap();

        assert_eq!(config.meters_per_unit, 5.0);
        assert_eq!(config.picking.radius_px, 20.0);
        assert_eq!(config.picking.tolerance, 1.5);
        assert_eq!(config.viewport.canvas_width, 1400.0);
    }

    #[test]
    fn test_rejects_non_positive_scale() {
        let err = EngineConfig::from_toml_str("meters_per_unit = 0.0").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_rejects_oversized_padding() {
        let err = EngineConfig::from_toml_str("[viewport]\npadding = 500.0").unwrap_err();
        assert!(err.to_string().contains("padding"));
    }

    #[test]
    fn test_rejects_malformed_toml() {
        let err = EngineConfig::from_toml_str("meters_per_unit = \"two\"").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.toml");
        std::fs::write(&path, "[viewport]\ncanvas_width = 800.0\n").unwrap();

        let config = EngineConfig::load(&path).unwrap();
        assert_eq!(config.viewport.canvas_width, 800.0);
    }
}
