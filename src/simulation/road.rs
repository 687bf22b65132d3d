//! Road geometry: lanes, centers and the border segments vehicles can
//! crash into.

use super::geometry::{Shape, point};
use super::params::Params;

/// Practically-infinite extent for the road borders along the travel axis.
const INFINITY_Y: f32 = 10_000_000.0;

/// A straight vertical road. Travel direction is negative y.
#[derive(Debug, Clone)]
pub struct Road {
    /// x coordinate of the left border.
    pub left: f32,
    /// x coordinate of the right border.
    pub right: f32,
    /// Number of lanes.
    pub lane_count: usize,
    /// Width of a single lane.
    pub lane_width: f32,
}

impl Road {
    /// Builds the road described by the simulation parameters, centered on
    /// x = 0.
    pub fn new(params: &Params) -> Self {
        let half = params.road_width() / 2.0;
        Self {
            left: -half,
            right: half,
            lane_count: params.lane_count,
            lane_width: params.lane_width,
        }
    }

    /// Center x coordinate of lane `i` (0 = leftmost).
    pub fn lane_center(&self, i: usize) -> f32 {
        self.left + self.lane_width / 2.0 + i.min(self.lane_count - 1) as f32 * self.lane_width
    }

    /// Border segments as two-point shapes, for sensing and collision.
    pub fn borders(&self) -> Vec<Shape> {
        vec![
            Shape::segment(point(self.left, -INFINITY_Y), point(self.left, INFINITY_Y)),
            Shape::segment(point(self.right, -INFINITY_Y), point(self.right, INFINITY_Y)),
        ]
    }
}
