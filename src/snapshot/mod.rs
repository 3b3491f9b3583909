//! Snapshot polling and distribution.
//!
//! The backend is polled on a repeating timer for the selected subsidiary.
//! Every response replaces the previous snapshot wholesale; responses that
//! were requested for a selection the user has since abandoned are dropped.
//!
//! - `feed` - generation-guarded holder of the current snapshot
//! - `poll` - cancellable repeating timer
//! - `subscribers` - explicit change notification

mod feed;
mod poll;
mod subscribers;

pub use feed::{FetchOutcome, FetchTicket, SnapshotFeed, SnapshotSource};
pub use poll::PollTimer;
pub use subscribers::{SubscriptionId, Subscribers};
