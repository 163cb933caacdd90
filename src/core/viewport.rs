//! Model plane to device canvas mapping
//!
//! Scale parameters are derived once per graph generation and are read-only for
//! callers. Device points arrive in rendered (CSS) pixels; `DisplayScale` converts
//! them to canvas pixels before the inverse mapping to model units.

use crate::core::config::ViewportConfig;
use crate::core::model::Node;
use serde::Serialize;

/// Rendered size over canvas size, per axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DisplayScale {
    pub x: f64,
    pub y: f64,
}

impl DisplayScale {
    pub fn uniform(scale: f64) -> Self {
        Self { x: scale, y: scale }
    }

    /// Canvas rendered at its native size
    pub fn identity() -> Self {
        Self::uniform(1.0)
    }
}

impl Default for DisplayScale {
    fn default() -> Self {
        Self::identity()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScalingParams {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub padding: f64,
    pub canvas_width: f64,
    pub canvas_height: f64,
}

impl ScalingParams {
    /// Fit the node extent into the padded canvas; `None` for an empty node set
    pub fn compute(nodes: &[Node], viewport: &ViewportConfig) -> Option<Self> {
        if nodes.is_empty() {
            return None;
        }

        let mut min_x = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for node in nodes {
            min_x = min_x.min(node.x);
            max_x = max_x.max(node.x);
            min_y = min_y.min(node.y);
            max_y = max_y.max(node.y);
        }

        let padding = viewport.padding;
        let dx = max_x - min_x;
        let dy = max_y - min_y;
        let scale_x = if dx == 0.0 {
            1.0
        } else {
            (viewport.canvas_width - 2.0 * padding) / dx
        };
        let scale_y = if dy == 0.0 {
            1.0
        } else {
            (viewport.canvas_height - 2.0 * padding) / dy
        };

        Some(Self {
            min_x,
            max_x,
            min_y,
            max_y,
            scale_x,
            scale_y,
            padding,
            canvas_width: viewport.canvas_width,
            canvas_height: viewport.canvas_height,
        })
    }

    /// All nodes share one position
    pub fn is_degenerate(&self) -> bool {
        self.max_x == self.min_x && self.max_y == self.min_y
    }

    /// Model point to canvas pixels
    pub fn to_canvas(&self, x: f64, y: f64) -> (f64, f64) {
        if self.is_degenerate() {
            return (self.canvas_width / 2.0, self.canvas_height / 2.0);
        }
        (
            self.padding + (x - self.min_x) * self.scale_x,
            self.padding + (y - self.min_y) * self.scale_y,
        )
    }

    /// Canvas pixels to model point.
    ///
    /// A degenerate extent is drawn at the canvas centre, so offsets are taken
    /// from the centre at unit scale.
    pub fn to_model(&self, canvas_x: f64, canvas_y: f64) -> (f64, f64) {
        if self.is_degenerate() {
            return (
                (canvas_x - self.canvas_width / 2.0) / self.scale_x + self.min_x,
                (canvas_y - self.canvas_height / 2.0) / self.scale_y + self.min_y,
            );
        }
        (
            (canvas_x - self.padding) / self.scale_x + self.min_x,
            (canvas_y - self.padding) / self.scale_y + self.min_y,
        )
    }

    /// Device (rendered) pixels to model point
    pub fn device_to_model(&self, device_x: f64, device_y: f64, display: DisplayScale) -> (f64, f64) {
        self.to_model(device_x / display.x, device_y / display.y)
    }

    /// Canvas pixels per model unit along the tighter axis
    pub fn pixels_per_unit(&self) -> f64 {
        self.scale_x.abs().min(self.scale_y.abs())
    }
}
