//! Geometry primitives for the collision and sensor systems.
//!
//! Everything is built from 2-D points and line-segment intersection tests;
//! polygons are ordered point lists whose edges wrap around.

use ndarray::Array1;

/// Builds a 2-D point.
pub fn point(x: f32, y: f32) -> Array1<f32> {
    Array1::from_vec(vec![x, y])
}

/// Result of a segment-segment intersection.
#[derive(Debug, Clone)]
pub struct SegmentHit {
    /// World-space intersection point.
    pub point: Array1<f32>,
    /// Interpolation fraction along the first segment, in [0, 1].
    ///
    /// Doubles as a hit priority: a smaller offset is hit first. Scaled by
    /// the segment length it becomes a distance.
    pub offset: f32,
}

/// Intersects segment `a0..a1` with segment `b0..b1`.
///
/// Returns `None` for parallel segments (including collinear ones) and when
/// the intersection parameter of either segment falls outside [0, 1].
pub fn intersect(
    a0: &Array1<f32>,
    a1: &Array1<f32>,
    b0: &Array1<f32>,
    b1: &Array1<f32>,
) -> Option<SegmentHit> {
    let t_top = (b1[0] - b0[0]) * (a0[1] - b0[1]) - (b1[1] - b0[1]) * (a0[0] - b0[0]);
    let u_top = (b0[1] - a0[1]) * (a0[0] - a1[0]) - (b0[0] - a0[0]) * (a0[1] - a1[1]);
    let bottom = (b1[1] - b0[1]) * (a1[0] - a0[0]) - (b1[0] - b0[0]) * (a1[1] - a0[1]);

    if bottom == 0.0 {
        return None;
    }

    let t = t_top / bottom;
    let u = u_top / bottom;

    if !(0.0..=1.0).contains(&t) || !(0.0..=1.0).contains(&u) {
        return None;
    }

    Some(SegmentHit {
        point: point(
            a0[0] + (a1[0] - a0[0]) * t,
            a0[1] + (a1[1] - a0[1]) * t,
        ),
        offset: t,
    })
}

/// An ordered list of points. Two points form a line segment; three or more
/// form a polygon whose edges wrap from the last point back to the first.
#[derive(Debug, Clone)]
pub struct Shape {
    /// Vertices in insertion order.
    pub points: Vec<Array1<f32>>,
}

impl Shape {
    /// Creates a shape from its vertices. Panics on fewer than 2 points.
    pub fn new(points: Vec<Array1<f32>>) -> Self {
        assert!(points.len() >= 2, "a shape needs at least 2 points");
        Self { points }
    }

    /// Creates a two-point line segment.
    pub fn segment(a: Array1<f32>, b: Array1<f32>) -> Self {
        Self::new(vec![a, b])
    }

    /// Builds the oriented rectangle for a vehicle body.
    ///
    /// Heading 0 faces negative y; the rectangle is recomputed from the pose
    /// every tick, it has no persistent identity.
    pub fn oriented_rect(center: &Array1<f32>, heading: f32, width: f32, height: f32) -> Self {
        use std::f32::consts::PI;

        let rad = (width * width + height * height).sqrt() / 2.0;
        let alpha = width.atan2(height);

        let corner = |angle: f32| {
            point(
                center[0] - angle.sin() * rad,
                center[1] - angle.cos() * rad,
            )
        };

        Self::new(vec![
            corner(heading - alpha),
            corner(heading + alpha),
            corner(PI + heading - alpha),
            corner(PI + heading + alpha),
        ])
    }

    /// Iterates over the shape's edges as point pairs.
    ///
    /// A 2-point shape yields its single segment; larger shapes wrap the last
    /// point back to the first.
    pub fn edges(&self) -> impl Iterator<Item = (&Array1<f32>, &Array1<f32>)> {
        let n = self.points.len();
        let count = if n == 2 { 1 } else { n };
        (0..count).map(move |i| (&self.points[i], &self.points[(i + 1) % n]))
    }
}

/// Reports whether two shapes intersect.
///
/// Decomposes both shapes into edges and returns true on the first pairwise
/// segment intersection found. Containment without edge crossing does not
/// count as an intersection.
pub fn polygons_intersect(a: &Shape, b: &Shape) -> bool {
    for (a0, a1) in a.edges() {
        for (b0, b1) in b.edges() {
            if intersect(a0, a1, b0, b1).is_some() {
                return true;
            }
        }
    }
    false
}
