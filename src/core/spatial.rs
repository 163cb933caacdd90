//! Spatial index for snapping points to graph nodes

use rstar::{PointDistance, RTree, RTreeObject, AABB};
use serde::Serialize;

use crate::core::config::PickingConfig;
use crate::core::model::Node;
use crate::core::viewport::{DisplayScale, ScalingParams};

/// Point with node index for R-tree
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IndexedPoint {
    pub coords: [f64; 2], // [x, y] model units
    pub index: usize,
}

impl RTreeObject for IndexedPoint {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.coords)
    }
}

impl PointDistance for IndexedPoint {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.coords[0] - point[0];
        let dy = self.coords[1] - point[1];
        dx * dx + dy * dy
    }

    fn contains_point(&self, point: &[f64; 2]) -> bool {
        self.coords == *point
    }
}

/// Nearest node and its distance in model units
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Nearest {
    pub index: usize,
    pub distance: f64,
}

/// Spatial index over graph nodes
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    tree: RTree<IndexedPoint>,
}

impl SpatialIndex {
    /// Build spatial index from nodes
    pub fn build(nodes: &[Node]) -> Self {
        let points: Vec<IndexedPoint> = nodes
            .iter()
            .enumerate()
            .map(|(index, node)| IndexedPoint {
                coords: [node.x, node.y],
                index,
            })
            .collect();

        Self {
            tree: RTree::bulk_load(points),
        }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Nearest node to a model point, without any distance limit
    pub fn nearest(&self, x: f64, y: f64) -> Option<Nearest> {
        let query = [x, y];
        self.tree.nearest_neighbor(&query).map(|point| Nearest {
            index: point.index,
            distance: point.distance_2(&query).sqrt(),
        })
    }

    /// Nearest selectable node for a device point.
    ///
    /// The pick radius is defined in screen pixels, so the model distance is
    /// converted back to pixels with the current scale parameters before the
    /// comparison. Points farther than the radius select nothing.
    pub fn pick(
        &self,
        device_x: f64,
        device_y: f64,
        params: &ScalingParams,
        display: DisplayScale,
        picking: &PickingConfig,
    ) -> Option<usize> {
        let (x, y) = params.device_to_model(device_x, device_y, display);
        let nearest = self.nearest(x, y)?;

        let scale_factor = display.x.min(display.y);
        let threshold = (picking.radius_px / scale_factor).max(picking.min_radius_px);
        let distance_px = nearest.distance * params.pixels_per_unit() * scale_factor;

        (distance_px < threshold * picking.tolerance).then_some(nearest.index)
    }
}

/// Linear search for nearest node - O(n) complexity
/// Use `SpatialIndex::nearest` for O(log n) performance with R-tree
pub fn nearest_linear(nodes: &[Node], x: f64, y: f64) -> Option<Nearest> {
    let mut best: Option<(usize, f64)> = None;

    for (index, node) in nodes.iter().enumerate() {
        let dx = x - node.x;
        let dy = y - node.y;
        let dist_2 = dx * dx + dy * dy;
        if best.map_or(true, |(_, min)| dist_2 < min) {
            best = Some((index, dist_2));
        }
    }

    best.map(|(index, dist_2)| Nearest {
        index,
        distance: dist_2.sqrt(),
    })
}
