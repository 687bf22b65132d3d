#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use neurodrive::simulation::geometry::{Shape, intersect, point, polygons_intersect};

#[test]
fn test_segment_intersection_at_midpoint() {
    let a0 = point(0.0, 0.0);
    let a1 = point(10.0, 0.0);
    let b0 = point(5.0, -5.0);
    let b1 = point(5.0, 5.0);

    let hit = intersect(&a0, &a1, &b0, &b1).expect("segments cross");

    assert!((hit.point[0] - 5.0).abs() < 1e-6);
    assert!((hit.point[1]).abs() < 1e-6);
    assert!((hit.offset - 0.5).abs() < 1e-6);
}

#[test]
fn test_intersection_offset_is_relative_to_first_segment() {
    let a0 = point(0.0, 0.0);
    let a1 = point(10.0, 0.0);
    let b0 = point(2.0, -1.0);
    let b1 = point(2.0, 9.0);

    // Crossing point is (2, 0): 20% along a, 10% along b.
    let forward = intersect(&a0, &a1, &b0, &b1).expect("segments cross");
    let swapped = intersect(&b0, &b1, &a0, &a1).expect("segments cross");

    assert!((forward.offset - 0.2).abs() < 1e-6);
    assert!((swapped.offset - 0.1).abs() < 1e-6);
    assert!((forward.point[0] - swapped.point[0]).abs() < 1e-6);
    assert!((forward.point[1] - swapped.point[1]).abs() < 1e-6);
}

#[test]
fn test_parallel_segments_never_intersect() {
    let a0 = point(0.0, 0.0);
    let a1 = point(10.0, 0.0);
    let b0 = point(0.0, 1.0);
    let b1 = point(10.0, 1.0);

    assert!(intersect(&a0, &a1, &b0, &b1).is_none());

    // Collinear overlap also reads as no intersection.
    let c0 = point(5.0, 0.0);
    let c1 = point(15.0, 0.0);
    assert!(intersect(&a0, &a1, &c0, &c1).is_none());
}

#[test]
fn test_intersection_outside_segment_bounds() {
    let a0 = point(0.0, 0.0);
    let a1 = point(10.0, 0.0);

    // The crossing lines meet at x = 20, beyond the end of a.
    let b0 = point(20.0, -5.0);
    let b1 = point(20.0, 5.0);
    assert!(intersect(&a0, &a1, &b0, &b1).is_none());

    // Meets a but not b.
    let c0 = point(5.0, 1.0);
    let c1 = point(5.0, 10.0);
    assert!(intersect(&a0, &a1, &c0, &c1).is_none());
}

#[test]
fn test_two_point_shape_has_one_edge() {
    let segment = Shape::segment(point(0.0, 0.0), point(1.0, 1.0));
    assert_eq!(segment.edges().count(), 1);

    let square = Shape::new(vec![
        point(0.0, 0.0),
        point(1.0, 0.0),
        point(1.0, 1.0),
        point(0.0, 1.0),
    ]);
    assert_eq!(square.edges().count(), 4);

    // The last edge wraps back to the first point.
    let (last_start, last_end) = square.edges().last().unwrap();
    assert_eq!(last_start[1], 1.0);
    assert_eq!(last_end[0], 0.0);
    assert_eq!(last_end[1], 0.0);
}

#[test]
fn test_oriented_rect_corners_at_heading_zero() {
    let rect = Shape::oriented_rect(&point(0.0, 0.0), 0.0, 2.0, 4.0);

    assert_eq!(rect.points.len(), 4);
    for corner in &rect.points {
        assert!((corner[0].abs() - 1.0).abs() < 1e-5, "corner x: {}", corner[0]);
        assert!((corner[1].abs() - 2.0).abs() < 1e-5, "corner y: {}", corner[1]);
    }
}

#[test]
fn test_oriented_rect_rotates_with_heading() {
    // A quarter turn swaps the roles of width and height.
    let rect = Shape::oriented_rect(&point(0.0, 0.0), std::f32::consts::FRAC_PI_2, 2.0, 4.0);

    for corner in &rect.points {
        assert!((corner[0].abs() - 2.0).abs() < 1e-5, "corner x: {}", corner[0]);
        assert!((corner[1].abs() - 1.0).abs() < 1e-5, "corner y: {}", corner[1]);
    }
}

#[test]
fn test_overlapping_polygons_intersect() {
    let a = Shape::oriented_rect(&point(0.0, 0.0), 0.0, 30.0, 50.0);
    let b = Shape::oriented_rect(&point(10.0, 10.0), 0.5, 30.0, 50.0);
    assert!(polygons_intersect(&a, &b));
}

#[test]
fn test_distant_polygons_do_not_intersect() {
    let a = Shape::oriented_rect(&point(0.0, 0.0), 0.0, 30.0, 50.0);
    let b = Shape::oriented_rect(&point(200.0, 0.0), 0.0, 30.0, 50.0);
    assert!(!polygons_intersect(&a, &b));
}

#[test]
fn test_polygon_intersects_border_segment() {
    let body = Shape::oriented_rect(&point(90.0, 0.0), 0.0, 30.0, 50.0);
    let border = Shape::segment(point(90.0, -1000.0), point(90.0, 1000.0));
    assert!(polygons_intersect(&body, &border));
}
