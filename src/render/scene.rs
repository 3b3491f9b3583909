//! Scene composition - the pure function from state to drawables.
//!
//! Coordinates flow through three spaces:
//!
//! ```text
//! yard-local --(+ layout offset on x)--> map --(+ origin)--> world --(viewport)--> screen
//! ```
//!
//! Paint order, back to front: every yard with its areas, the in-progress
//! area outline, then every marker. Nothing is cached between calls, so a
//! marker's in-right-area flag always comes from the snapshot passed in.

use super::style::{Style, area_style, bike_style, creation_style, tag_style, yard_style};
use crate::area_creation::AreaCreationSession;
use crate::geometry::YardLayout;
use crate::input::ViewportState;
use crate::selection::{SelectionSource, SelectionState};
use crate::types::{AreaStatus, MarkerId, Point, SubsidiarySnapshot, TagBinding};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerShape {
    /// Bike bound to a tag
    Triangle,
    /// Bare tag
    Circle,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PolygonKind {
    Yard { yard_id: u64 },
    Area { area_id: u64, status: AreaStatus },
}

/// A positioned, styled primitive in screen coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Drawable {
    Polygon {
        kind: PolygonKind,
        points: Vec<Point>,
        style: Style,
    },
    Polyline {
        points: Vec<Point>,
        closed: bool,
        style: Style,
    },
    Marker {
        id: MarkerId,
        center: Point,
        radius: f64,
        shape: MarkerShape,
        style: Style,
    },
}

impl Drawable {
    pub fn marker_id(&self) -> Option<MarkerId> {
        match self {
            Drawable::Marker { id, .. } => Some(*id),
            _ => None,
        }
    }
}

/// Everything one frame is composed from.
#[derive(Debug, Clone, Copy)]
pub struct SceneInput<'a> {
    pub snapshot: Option<&'a SubsidiarySnapshot>,
    pub viewport: &'a ViewportState,
    /// World position of the map origin (the canvas centre)
    pub origin: Point,
    pub session: &'a AreaCreationSession,
    pub selection: &'a SelectionState,
    pub yard_gap: f64,
    /// Marker radius in world units
    pub marker_radius: f64,
}

impl SceneInput<'_> {
    fn to_screen(&self, map: Point) -> Point {
        self.viewport.world_to_screen(map + self.origin)
    }

    fn place(&self, points: &[Point], x_offset: f64) -> Vec<Point> {
        points
            .iter()
            .map(|p| self.to_screen(p.offset_x(x_offset)))
            .collect()
    }

    fn marker(&self, binding: &TagBinding, x_offset: f64) -> Drawable {
        let scale = self.viewport.scale;
        let id = binding.marker_id();
        let active: Option<SelectionSource> = self
            .selection
            .active_with_source()
            .filter(|(active_id, _)| *active_id == id)
            .map(|(_, source)| source);

        let (shape, style) = match id {
            MarkerId::Bike(_) => (
                MarkerShape::Triangle,
                bike_style(active, binding.in_right_area, scale),
            ),
            MarkerId::Tag(_) => (MarkerShape::Circle, tag_style(active.is_some(), scale)),
        };

        Drawable::Marker {
            id,
            center: self.to_screen(binding.position.offset_x(x_offset)),
            radius: self.viewport.length_to_screen(self.marker_radius),
            shape,
            style,
        }
    }
}

/// Compose the frame for `input`.
pub fn render_scene(input: &SceneInput<'_>) -> Vec<Drawable> {
    let scale = input.viewport.scale;
    let mut drawables = Vec::new();
    let mut markers = Vec::new();

    if let Some(snapshot) = input.snapshot {
        let layout = YardLayout::compute(snapshot.yards(), input.yard_gap);

        for (index, entry) in snapshot.yards.iter().enumerate() {
            let offset = layout.at(index).unwrap_or(0.0);

            drawables.push(Drawable::Polygon {
                kind: PolygonKind::Yard {
                    yard_id: entry.yard.id,
                },
                points: input.place(&entry.yard.boundary, offset),
                style: yard_style(scale),
            });

            for area in &entry.yard.areas {
                drawables.push(Drawable::Polygon {
                    kind: PolygonKind::Area {
                        area_id: area.id,
                        status: area.status,
                    },
                    points: input.place(&area.boundary, offset),
                    style: area_style(area.status, scale),
                });
            }

            markers.extend(entry.tags.iter().map(|binding| input.marker(binding, offset)));
        }
    }

    let session_points = input.session.points();
    if input.session.target().is_some() && !session_points.is_empty() {
        drawables.push(Drawable::Polyline {
            points: input.place(session_points, 0.0),
            closed: session_points.len() >= 3,
            style: creation_style(scale),
        });
    }

    tracing::trace!(
        shapes = drawables.len(),
        markers = markers.len(),
        "Scene composed"
    );

    drawables.extend(markers);
    drawables
}
