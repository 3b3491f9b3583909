//! Point-in-polygon membership.

use crate::constants::MIN_POLYGON_VERTICES;
use crate::types::Point;

/// Even-odd ray-casting test of `point` against `boundary` placed at
/// `x_offset` on the map.
///
/// The offset is removed from the point rather than added to every vertex.
/// Boundaries with fewer than three vertices contain nothing. Points exactly
/// on an edge are classified consistently but without a guarantee of side.
pub fn contains(point: Point, boundary: &[Point], x_offset: f64) -> bool {
    if boundary.len() < MIN_POLYGON_VERTICES {
        return false;
    }

    let p = point.offset_x(-x_offset);
    let mut inside = false;
    let mut j = boundary.len() - 1;
    for i in 0..boundary.len() {
        let a = boundary[i];
        let b = boundary[j];
        if (a.y > p.y) != (b.y > p.y) {
            let crossing_x = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
            if p.x < crossing_x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}
