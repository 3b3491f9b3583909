//! Marker selection state machine.
//!
//! One marker at a time drives the detail panel. Three inputs compete for it:
//!
//! ```text
//! forced   set by an external search (plate lookup), cleared only by clearing the search
//! pinned   toggled by pressing a marker; pressing another marker moves the pin
//! hovered  follows the pointer while nothing is pinned
//!
//! active = forced ?? pinned ?? hovered
//! ```
//!
//! While a forced selection is active, hover changes are suppressed entirely.

use crate::types::MarkerId;
use std::collections::HashSet;
use tracing::debug;

/// Which input the active marker came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionSource {
    Forced,
    Pinned,
    Hovered,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionState {
    hovered: Option<MarkerId>,
    pinned: Option<MarkerId>,
    forced: Option<MarkerId>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hovered(&self) -> Option<MarkerId> {
        self.hovered
    }

    pub fn pinned(&self) -> Option<MarkerId> {
        self.pinned
    }

    pub fn forced(&self) -> Option<MarkerId> {
        self.forced
    }

    /// The published selection: forced, else pinned, else hovered.
    pub fn active(&self) -> Option<MarkerId> {
        self.forced.or(self.pinned).or(self.hovered)
    }

    pub fn active_with_source(&self) -> Option<(MarkerId, SelectionSource)> {
        self.forced
            .map(|id| (id, SelectionSource::Forced))
            .or(self.pinned.map(|id| (id, SelectionSource::Pinned)))
            .or(self.hovered.map(|id| (id, SelectionSource::Hovered)))
    }

    pub fn is_active(&self, id: MarkerId) -> bool {
        self.active() == Some(id)
    }

    /// Pointer entered a marker. Returns true if the state changed.
    pub fn on_pointer_enter(&mut self, id: MarkerId) -> bool {
        if self.pinned.is_some() || self.forced.is_some() || self.hovered == Some(id) {
            return false;
        }
        self.hovered = Some(id);
        true
    }

    /// Pointer left a marker. Returns true if the state changed.
    pub fn on_pointer_leave(&mut self, id: MarkerId) -> bool {
        if self.pinned.is_some() || self.hovered != Some(id) {
            return false;
        }
        self.hovered = None;
        true
    }

    /// Pointer pressed a marker: toggles the pin on it, or moves the pin to it.
    pub fn on_pointer_down(&mut self, id: MarkerId) {
        if self.pinned == Some(id) {
            debug!(?id, "Marker unpinned");
            self.pinned = None;
        } else {
            debug!(?id, previous = ?self.pinned, "Marker pinned");
            self.pinned = Some(id);
        }
    }

    /// Install an external selection that overrides hover and pin.
    pub fn force(&mut self, id: MarkerId) {
        debug!(?id, "Forced selection set");
        self.forced = Some(id);
        self.hovered = None;
    }

    pub fn clear_forced(&mut self) {
        if self.forced.take().is_some() {
            debug!("Forced selection cleared");
        }
    }

    /// Forget hover and pin entries for markers that left the snapshot.
    /// The forced selection stays until its search is cleared.
    pub fn retain_present(&mut self, present: &HashSet<MarkerId>) -> bool {
        let mut changed = false;
        if self.hovered.is_some_and(|id| !present.contains(&id)) {
            self.hovered = None;
            changed = true;
        }
        if self.pinned.is_some_and(|id| !present.contains(&id)) {
            debug!(id = ?self.pinned, "Pinned marker vanished from snapshot");
            self.pinned = None;
            changed = true;
        }
        changed
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
