//! Unit tests for point-in-polygon containment.

use crate::helpers::{rect, square};
use yardmap::geometry::contains;
use yardmap::Point;

#[test]
fn test_square_inside_and_outside() {
    let boundary = square(10.0);
    assert!(contains(Point::new(5.0, 5.0), &boundary, 0.0));
    assert!(!contains(Point::new(15.0, 5.0), &boundary, 0.0));
    assert!(!contains(Point::new(5.0, -1.0), &boundary, 0.0));
}

#[test]
fn test_offset_shifts_polygon() {
    let boundary = square(10.0);
    assert!(contains(Point::new(125.0, 5.0), &boundary, 120.0));
    assert!(!contains(Point::new(5.0, 5.0), &boundary, 120.0));
}

#[test]
fn test_offset_equivalent_to_shifted_point() {
    let boundary = rect(-3.0, 2.0, 17.0, 9.0);
    let samples = [
        Point::new(0.0, 5.0),
        Point::new(16.9, 8.9),
        Point::new(-4.0, 5.0),
        Point::new(10.0, 12.0),
    ];
    for dx in [0.0, 20.0, -7.5, 1000.0] {
        for p in samples {
            assert_eq!(
                contains(p.offset_x(dx), &boundary, dx),
                contains(p, &boundary, 0.0),
                "point {:?} with offset {}",
                p,
                dx
            );
        }
    }
}

#[test]
fn test_degenerate_boundaries_contain_nothing() {
    assert!(!contains(Point::ZERO, &[], 0.0));
    let line = [Point::new(0.0, 0.0), Point::new(10.0, 10.0)];
    assert!(!contains(Point::new(5.0, 5.0), &line, 0.0));
}

#[test]
fn test_concave_notch_excluded() {
    // U shape open at the top between x = 4 and x = 6
    let boundary = vec![
        Point::new(0.0, 0.0),
        Point::new(10.0, 0.0),
        Point::new(10.0, 10.0),
        Point::new(6.0, 10.0),
        Point::new(6.0, 4.0),
        Point::new(4.0, 4.0),
        Point::new(4.0, 10.0),
        Point::new(0.0, 10.0),
    ];
    assert!(contains(Point::new(2.0, 8.0), &boundary, 0.0));
    assert!(!contains(Point::new(5.0, 8.0), &boundary, 0.0));
    assert!(contains(Point::new(5.0, 2.0), &boundary, 0.0));
}
