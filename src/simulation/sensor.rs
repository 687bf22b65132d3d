//! Raycasting sensor that vehicles use to perceive obstacles.
//!
//! The sensor owns no world state: rays are recomputed from the vehicle's
//! pose every frame, and collisions must be refreshed before the autopilot
//! or the scoring heuristics read them in the same tick.

use ndarray::Array1;

use super::geometry::{self, SegmentHit, Shape, point};

/// A fan of rays cast from a vehicle's position along its heading.
#[derive(Debug, Clone)]
pub struct Sensor {
    /// Number of rays in the fan.
    pub ray_count: usize,
    /// Maximum reach of each ray.
    pub ray_length: f32,
    /// Total fan angle in radians.
    pub ray_spread: f32,
    /// Ray segments recomputed by [`Sensor::cast_rays`].
    pub rays: Vec<(Array1<f32>, Array1<f32>)>,
    /// Nearest hit per ray, recomputed by [`Sensor::check_collisions`].
    pub readings: Vec<Option<SegmentHit>>,
}

impl Sensor {
    /// Creates a sensor. Panics on a zero ray count.
    pub fn new(ray_count: usize, ray_length: f32, ray_spread: f32) -> Self {
        assert!(ray_count >= 1, "sensor needs at least one ray");
        Self {
            ray_count,
            ray_length,
            ray_spread,
            rays: Vec::with_capacity(ray_count),
            readings: Vec::with_capacity(ray_count),
        }
    }

    /// Angular offset of ray `i` from the vehicle's heading.
    ///
    /// Rays are spread evenly across `[-spread/2, +spread/2]`; a single ray
    /// points straight ahead.
    pub fn ray_angle(&self, i: usize) -> f32 {
        if self.ray_count == 1 {
            0.0
        } else {
            -self.ray_spread / 2.0
                + self.ray_spread * i as f32 / (self.ray_count - 1) as f32
        }
    }

    /// Recomputes the ray segments from the current pose. Always produces
    /// exactly `ray_count` segments.
    pub fn cast_rays(&mut self, pos: &Array1<f32>, heading: f32) {
        self.rays.clear();
        for i in 0..self.ray_count {
            let angle = heading + self.ray_angle(i);
            let end = point(
                pos[0] - angle.sin() * self.ray_length,
                pos[1] - angle.cos() * self.ray_length,
            );
            self.rays.push((pos.clone(), end));
        }
    }

    /// Finds the nearest intersection per ray against the flattened edge
    /// list of all obstacle shapes. Rays that hit nothing read `None`.
    pub fn check_collisions(&mut self, obstacles: &[Shape]) {
        self.readings = self
            .rays
            .iter()
            .map(|(start, end)| nearest_hit(start, end, obstacles))
            .collect();
    }

    /// Distance of the nearest hit on ray `i`, if any.
    pub fn distance(&self, i: usize) -> Option<f32> {
        self.readings
            .get(i)
            .and_then(|r| r.as_ref())
            .map(|hit| hit.offset * self.ray_length)
    }

    /// Restricted scan: tests only rays whose angular offset lies in
    /// `[from_angle, to_angle]` and returns the minimum hit distance, or
    /// infinity when none of them hit anything.
    pub fn distance_in_cone(&self, obstacles: &[Shape], from_angle: f32, to_angle: f32) -> f32 {
        let mut min_distance = f32::INFINITY;

        for (i, (start, end)) in self.rays.iter().enumerate() {
            let angle = self.ray_angle(i);
            if angle < from_angle || angle > to_angle {
                continue;
            }
            if let Some(hit) = nearest_hit(start, end, obstacles) {
                min_distance = min_distance.min(hit.offset * self.ray_length);
            }
        }

        min_distance
    }
}

/// Nearest intersection of one ray against every edge of every shape,
/// picked by minimum offset along the ray.
fn nearest_hit(start: &Array1<f32>, end: &Array1<f32>, obstacles: &[Shape]) -> Option<SegmentHit> {
    let mut nearest: Option<SegmentHit> = None;

    for shape in obstacles {
        for (e0, e1) in shape.edges() {
            if let Some(hit) = geometry::intersect(start, end, e0, e1) {
                let closer = match &nearest {
                    Some(best) => hit.offset < best.offset,
                    None => true,
                };
                if closer {
                    nearest = Some(hit);
                }
            }
        }
    }

    nearest
}
