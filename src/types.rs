//! Core types for the yard map.
//!
//! These mirror the snapshot payload the backend serves for a subsidiary:
//! yards with their areas, and the tag bindings observed inside each yard.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::ops::{Add, AddAssign, Div, Mul, Sub};

// ============================================================================
// Geometry
// ============================================================================

/// A world-space coordinate pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Shift horizontally by `dx`.
    #[inline]
    pub fn offset_x(self, dx: f64) -> Self {
        Self::new(self.x + dx, self.y)
    }

    #[inline]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f64> for Point {
    type Output = Point;

    fn div(self, rhs: f64) -> Point {
        Point::new(self.x / rhs, self.y / rhs)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point::new(x, y)
    }
}

// ============================================================================
// Yards & Areas
// ============================================================================

/// Operational status of an area. Unknown values from the backend map to `Unset`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AreaStatus {
    Ready,
    Broken,
    #[default]
    #[serde(other)]
    Unset,
}

/// A sub-polygon of a yard with an operational status.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Area {
    pub id: u64,
    #[serde(default)]
    pub status: AreaStatus,
    pub boundary: Vec<Point>,
}

/// A bounded region where bikes are parked. Boundary coordinates are local
/// to the yard's own origin; the layout engine places yards side by side.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Yard {
    pub id: u64,
    pub name: String,
    pub boundary: Vec<Point>,
    #[serde(default)]
    pub areas: Vec<Area>,
}

impl Yard {
    /// Largest x of the boundary, or 0 for an empty boundary.
    pub fn rightmost_x(&self) -> f64 {
        self.boundary
            .iter()
            .map(|p| p.x)
            .fold(None, |acc: Option<f64>, x| Some(acc.map_or(x, |m| m.max(x))))
            .unwrap_or(0.0)
    }
}

// ============================================================================
// Tags & Bikes
// ============================================================================

/// A fiducial marker.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: u64,
    pub code: String,
}

/// A bike bound to a tag.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BikeMarker {
    pub id: u64,
    pub plate: String,
    #[serde(default)]
    pub chassis: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub status: String,
}

/// One observed tag position inside a yard, in yard-local coordinates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagBinding {
    pub tag: Tag,
    #[serde(default)]
    pub bike: Option<BikeMarker>,
    pub position: Point,
    #[serde(default)]
    pub in_right_area: bool,
}

impl TagBinding {
    /// The marker this binding draws as: the bike when bound, the bare tag otherwise.
    pub fn marker_id(&self) -> MarkerId {
        match &self.bike {
            Some(bike) => MarkerId::Bike(bike.id),
            None => MarkerId::Tag(self.tag.id),
        }
    }
}

/// Identity of a selectable marker on the map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum MarkerId {
    Bike(u64),
    Tag(u64),
}

// ============================================================================
// Snapshot
// ============================================================================

/// A yard together with the tags currently observed in it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct YardTags {
    pub yard: Yard,
    #[serde(default)]
    pub tags: Vec<TagBinding>,
}

/// One atomically replaced read of every yard and marker of a subsidiary.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SubsidiarySnapshot {
    pub yards: Vec<YardTags>,
}

/// Where a bike currently is, for the detail panel.
#[derive(Clone, Debug, PartialEq)]
pub struct BikeLocation<'a> {
    pub bike: &'a BikeMarker,
    pub tag_code: &'a str,
    pub yard: &'a Yard,
    pub position: Point,
}

impl SubsidiarySnapshot {
    pub fn new(yards: Vec<YardTags>) -> Self {
        Self { yards }
    }

    /// Yards in layout order.
    pub fn yards(&self) -> impl Iterator<Item = &Yard> {
        self.yards.iter().map(|entry| &entry.yard)
    }

    /// Layout index and entry for a yard id.
    pub fn find_yard(&self, yard_id: u64) -> Option<(usize, &YardTags)> {
        self.yards
            .iter()
            .enumerate()
            .find(|(_, entry)| entry.yard.id == yard_id)
    }

    /// Every marker id present in this snapshot.
    pub fn marker_ids(&self) -> HashSet<MarkerId> {
        self.yards
            .iter()
            .flat_map(|entry| entry.tags.iter().map(TagBinding::marker_id))
            .collect()
    }

    /// The binding that draws as `marker`, if any.
    pub fn binding(&self, marker: MarkerId) -> Option<&TagBinding> {
        self.yards
            .iter()
            .flat_map(|entry| entry.tags.iter())
            .find(|binding| binding.marker_id() == marker)
    }

    /// Locate a bike by id, with the tag it carries and the yard it is in.
    pub fn find_bike(&self, bike_id: u64) -> Option<BikeLocation<'_>> {
        self.yards.iter().find_map(|entry| {
            entry.tags.iter().find_map(|binding| match &binding.bike {
                Some(bike) if bike.id == bike_id => Some(BikeLocation {
                    bike,
                    tag_code: &binding.tag.code,
                    yard: &entry.yard,
                    position: binding.position,
                }),
                _ => None,
            })
        })
    }

    /// Locate a bike by plate, case-insensitively.
    pub fn find_bike_by_plate(&self, plate: &str) -> Option<BikeLocation<'_>> {
        let plate = plate.trim();
        let bike_id = self
            .yards
            .iter()
            .flat_map(|entry| entry.tags.iter())
            .filter_map(|binding| binding.bike.as_ref())
            .find(|bike| bike.plate.eq_ignore_ascii_case(plate))?
            .id;
        self.find_bike(bike_id)
    }
}
