//! Marker hit testing.
//!
//! Provides R-tree based spatial indexing of bike and tag markers in map
//! space, so pointer hover and press resolve to a marker in O(log n).

use crate::geometry::YardLayout;
use crate::types::{MarkerId, Point, SubsidiarySnapshot};
use rstar::{AABB, RTree, RTreeObject};
use std::collections::HashMap;

/// A marker's hit circle, stored by its bounding box.
#[derive(Debug, Clone, Copy)]
pub struct MarkerEntry {
    pub id: MarkerId,
    pub center: Point,
    pub radius: f64,
}

impl MarkerEntry {
    pub fn new(id: MarkerId, center: Point, radius: f64) -> Self {
        Self { id, center, radius }
    }
}

impl RTreeObject for MarkerEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(
            [self.center.x - self.radius, self.center.y - self.radius],
            [self.center.x + self.radius, self.center.y + self.radius],
        )
    }
}

/// Spatial index over the markers of one snapshot.
pub struct MarkerIndex {
    tree: RTree<MarkerEntry>,
    entries: HashMap<MarkerId, MarkerEntry>,
}

impl MarkerIndex {
    pub fn new() -> Self {
        Self {
            tree: RTree::new(),
            entries: HashMap::new(),
        }
    }

    /// Index every marker of `snapshot` at its laid-out map position.
    pub fn from_snapshot(snapshot: &SubsidiarySnapshot, yard_gap: f64, radius: f64) -> Self {
        let mut index = Self::new();
        index.rebuild(snapshot, yard_gap, radius);
        index
    }

    pub fn rebuild(&mut self, snapshot: &SubsidiarySnapshot, yard_gap: f64, radius: f64) {
        let layout = YardLayout::compute(snapshot.yards(), yard_gap);
        let entries: Vec<MarkerEntry> = snapshot
            .yards
            .iter()
            .enumerate()
            .flat_map(|(i, entry)| {
                let offset = layout.at(i).unwrap_or(0.0);
                entry.tags.iter().map(move |binding| {
                    MarkerEntry::new(binding.marker_id(), binding.position.offset_x(offset), radius)
                })
            })
            .collect();

        self.entries = entries.iter().map(|e| (e.id, *e)).collect();
        self.tree = RTree::bulk_load(entries);
    }

    /// The marker under a map-space point, closest centre first.
    /// `slop` widens every hit circle.
    pub fn query_point(&self, p: Point, slop: f64) -> Option<MarkerId> {
        let envelope = AABB::from_corners([p.x - slop, p.y - slop], [p.x + slop, p.y + slop]);

        self.tree
            .locate_in_envelope_intersecting(&envelope)
            .filter(|entry| entry.center.distance(p) <= entry.radius + slop)
            .min_by(|a, b| a.center.distance(p).total_cmp(&b.center.distance(p)))
            .map(|entry| entry.id)
    }

    pub fn get(&self, id: MarkerId) -> Option<&MarkerEntry> {
        self.entries.get(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.tree = RTree::new();
        self.entries.clear();
    }
}

impl Default for MarkerIndex {
    fn default() -> Self {
        Self::new()
    }
}
