//! Generation-guarded snapshot holder.
//!
//! Every change of subsidiary bumps the generation. A fetch carries the
//! generation it was started under, and its response is only applied if that
//! generation is still current. Responses never patch the previous snapshot:
//! they replace the shared `Arc` in one assignment.

use super::subscribers::{SubscriptionId, Subscribers};
use crate::error::{CanvasError, CanvasResult};
use crate::types::SubsidiarySnapshot;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Read side of the backend: one full snapshot per call.
pub trait SnapshotSource: Send + Sync {
    fn fetch(&self, subsidiary_id: &str) -> anyhow::Result<SubsidiarySnapshot>;
}

/// Identifies the request a response belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub subsidiary_id: String,
}

/// What happened to a fetch response.
#[derive(Debug)]
pub enum FetchOutcome {
    /// Became the current snapshot
    Applied(Arc<SubsidiarySnapshot>),
    /// Requested for an abandoned selection; dropped
    Stale,
    /// The fetch failed; the previous snapshot stays and the next tick retries
    Failed(CanvasError),
    /// The feed was shut down before the response arrived
    Closed,
}

#[derive(Debug, Default)]
pub struct SnapshotFeed {
    subsidiary_id: Option<String>,
    generation: u64,
    current: Option<Arc<SubsidiarySnapshot>>,
    in_flight: Option<u64>,
    subscribers: Subscribers<Arc<SubsidiarySnapshot>>,
    closed: bool,
}

impl SnapshotFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subsidiary_id(&self) -> Option<&str> {
        self.subsidiary_id.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The latest applied snapshot for the current selection.
    pub fn current(&self) -> Option<Arc<SubsidiarySnapshot>> {
        self.current.clone()
    }

    /// Borrow the latest applied snapshot.
    pub fn snapshot(&self) -> Option<&SubsidiarySnapshot> {
        self.current.as_deref()
    }

    pub fn is_fetching(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Switch to another subsidiary (or none). Outstanding requests become stale
    /// and the snapshot of the previous selection is dropped.
    pub fn select_subsidiary(&mut self, subsidiary_id: Option<String>) {
        if self.subsidiary_id == subsidiary_id {
            return;
        }
        self.generation += 1;
        debug!(
            generation = self.generation,
            subsidiary = ?subsidiary_id,
            "Subsidiary selection changed"
        );
        self.subsidiary_id = subsidiary_id;
        self.current = None;
        self.in_flight = None;
    }

    /// Open a request for the current selection. Returns `None` when nothing
    /// is selected, the feed is closed, or a request is already outstanding.
    pub fn begin_fetch(&mut self) -> Option<FetchTicket> {
        if self.closed || self.in_flight == Some(self.generation) {
            return None;
        }
        let subsidiary_id = self.subsidiary_id.clone()?;
        self.in_flight = Some(self.generation);
        Some(FetchTicket {
            generation: self.generation,
            subsidiary_id,
        })
    }

    /// Apply the response for `ticket`.
    pub fn complete(
        &mut self,
        ticket: FetchTicket,
        result: CanvasResult<SubsidiarySnapshot>,
    ) -> FetchOutcome {
        if self.closed {
            return FetchOutcome::Closed;
        }
        if ticket.generation != self.generation {
            warn!(
                ticket = ticket.generation,
                current = self.generation,
                subsidiary = %ticket.subsidiary_id,
                "Dropping stale snapshot response"
            );
            return FetchOutcome::Stale;
        }
        self.in_flight = None;

        match result {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                self.current = Some(Arc::clone(&snapshot));
                self.subscribers.notify(&snapshot);
                debug!(
                    generation = self.generation,
                    yards = snapshot.yards.len(),
                    "Snapshot applied"
                );
                FetchOutcome::Applied(snapshot)
            }
            Err(err) => {
                error!(subsidiary = %ticket.subsidiary_id, "Snapshot poll failed: {}", err);
                FetchOutcome::Failed(err)
            }
        }
    }

    /// Fetch synchronously from `source` and apply the result.
    pub fn poll(&mut self, source: &dyn SnapshotSource) -> Option<FetchOutcome> {
        let ticket = self.begin_fetch()?;
        let result = source
            .fetch(&ticket.subsidiary_id)
            .map_err(CanvasError::network);
        Some(self.complete(ticket, result))
    }

    pub fn subscribe(
        &mut self,
        callback: impl FnMut(&Arc<SubsidiarySnapshot>) + 'static,
    ) -> SubscriptionId {
        self.subscribers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    /// Tear down: later responses are ignored and subscribers are released.
    pub fn shutdown(&mut self) {
        self.closed = true;
        self.in_flight = None;
        self.subscribers.clear();
    }
}
