//! Graphics target.

use super::scene::{Drawable, MarkerShape};
use super::style::Style;
use crate::types::Point;

/// Anything that can paint screen-space primitives. All coordinates and
/// lengths are already in screen pixels.
pub trait Surface {
    fn polygon(&mut self, points: &[Point], style: &Style);
    fn polyline(&mut self, points: &[Point], closed: bool, style: &Style);
    fn marker(&mut self, center: Point, radius: f64, shape: MarkerShape, style: &Style);
}

/// Paint `drawables` in order, back to front.
pub fn paint(surface: &mut dyn Surface, drawables: &[Drawable]) {
    for drawable in drawables {
        match drawable {
            Drawable::Polygon { points, style, .. } => surface.polygon(points, style),
            Drawable::Polyline {
                points,
                closed,
                style,
            } => surface.polyline(points, *closed, style),
            Drawable::Marker {
                center,
                radius,
                shape,
                style,
                ..
            } => surface.marker(*center, *radius, *shape, style),
        }
    }
}
