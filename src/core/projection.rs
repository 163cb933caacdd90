//! Geographic to planar projection
//!
//! Spherical Mercator on the WGS84 semi-major axis, followed by a batch normalization
//! that moves the extract to the origin, flips the y axis (screen convention) and
//! divides by a meters-per-unit scale. Translation, reflection and uniform scaling
//! keep every pairwise distance ratio intact.

use std::f64::consts::PI;

/// WGS84 semi-major axis in meters
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Project latitude/longitude (degrees) to spherical Mercator meters
pub fn project(lat: f64, lon: f64) -> (f64, f64) {
    let x = EARTH_RADIUS_M * lon * PI / 180.0;
    let y = EARTH_RADIUS_M * (PI / 4.0 + lat * PI / 360.0).tan().ln();
    (x, y)
}

/// Projector with the batch normalization step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    meters_per_unit: f64,
}

impl Projector {
    pub fn new(meters_per_unit: f64) -> Self {
        Self { meters_per_unit }
    }

    pub fn meters_per_unit(&self) -> f64 {
        self.meters_per_unit
    }

    /// Project and normalize a whole batch of coordinates at once.
    ///
    /// Output order matches input order. The transform depends on the batch extent
    /// (`minX`, `maxY`), so callers must pass every node of one graph together.
    pub fn project_batch(&self, coords: &[(f64, f64)]) -> Vec<(f64, f64)> {
        let projected: Vec<(f64, f64)> = coords.iter().map(|&(lat, lon)| project(lat, lon)).collect();
        self.normalize(&projected)
    }

    /// Translate by `-minX`, reflect via `maxY - y`, divide by the scale
    pub fn normalize(&self, points: &[(f64, f64)]) -> Vec<(f64, f64)> {
        let min_x = points.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
        let max_y = points.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);

        points
            .iter()
            .map(|&(x, y)| {
                (
                    (x - min_x) / self.meters_per_unit,
                    (max_y - y) / self.meters_per_unit,
                )
            })
            .collect()
    }
}

impl Default for Projector {
    fn default() -> Self {
        Self::new(2.0)
    }
}
