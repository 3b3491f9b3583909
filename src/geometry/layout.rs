//! Horizontal placement of yards on the shared map.
//!
//! Yards are authored around their own origin, so drawn as-is they pile up
//! near (0, 0). Each yard after the first is pushed right by the rightmost x
//! of the yard immediately before it plus `index * gap`. The rule is not
//! cumulative: a narrow yard following a wide one can pull the next yard back
//! over the wide one. That overlap is current product behavior and is pinned
//! by tests.

use crate::types::Yard;

/// Offsets for `yards` in order: `0` for the first yard, then
/// `rightmost_x(yards[i - 1]) + i * gap`.
pub fn yard_offsets(yards: &[Yard], gap: f64) -> Vec<f64> {
    YardLayout::compute(yards, gap)
        .offsets
        .into_iter()
        .map(|(_, offset)| offset)
        .collect()
}

/// Resolved offsets for one snapshot generation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct YardLayout {
    offsets: Vec<(u64, f64)>,
}

impl YardLayout {
    pub fn compute<'a, I>(yards: I, gap: f64) -> Self
    where
        I: IntoIterator<Item = &'a Yard>,
    {
        let mut previous: Option<&Yard> = None;
        let offsets = yards
            .into_iter()
            .enumerate()
            .map(|(i, yard)| {
                let offset = previous.map_or(0.0, |prev| prev.rightmost_x() + i as f64 * gap);
                previous = Some(yard);
                (yard.id, offset)
            })
            .collect();
        Self { offsets }
    }

    /// Offset of the yard at layout position `index`.
    pub fn at(&self, index: usize) -> Option<f64> {
        self.offsets.get(index).map(|(_, offset)| *offset)
    }

    /// Offset of the yard with `yard_id`.
    pub fn offset_of(&self, yard_id: u64) -> Option<f64> {
        self.offsets
            .iter()
            .find(|(id, _)| *id == yard_id)
            .map(|(_, offset)| *offset)
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}
