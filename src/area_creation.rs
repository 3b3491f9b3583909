//! Area creation session - drawing a new area boundary inside a yard.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> YardSelected          (select_yard)
//! YardSelected -> Collecting    (add_point inside the yard)
//! Collecting -> Collecting      (add_point, undo_last, clear)
//! Any -> YardSelected           (select_yard, points discarded)
//! Any -> Idle                   (cancel, or a submission that succeeded)
//! ```
//!
//! The area status is carried next to the state and survives `select_yard`.
//! The session is ready to submit once it has a yard, a non-empty status and
//! at least three points.
//!
//! Points are validated once, at insertion, against the yard boundary as
//! placed by the layout. A later snapshot may move or reshape the yard; the
//! points already collected are kept as they are.

use crate::constants::MIN_POLYGON_VERTICES;
use crate::error::{CanvasError, CanvasResult};
use crate::geometry;
use crate::types::{Point, Yard};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// The yard a session draws into, with its layout offset at selection time.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetYard {
    pub id: u64,
    pub name: String,
    /// Yard-local boundary
    pub boundary: Vec<Point>,
    /// Horizontal placement on the map
    pub offset: f64,
}

impl TargetYard {
    pub fn new(yard: &Yard, offset: f64) -> Self {
        Self {
            id: yard.id,
            name: yard.name.clone(),
            boundary: yard.boundary.clone(),
            offset,
        }
    }

    /// Whether a map-space point lies inside this yard.
    pub fn contains(&self, point: Point) -> bool {
        geometry::contains(point, &self.boundary, self.offset)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum SessionState {
    /// No area is being drawn
    #[default]
    Idle,

    /// A yard is chosen, no point placed yet
    YardSelected { target: TargetYard },

    /// Points are being placed
    Collecting {
        target: TargetYard,
        /// Map-space points in placement order
        points: Vec<Point>,
    },
}

/// Payload handed to the area-persistence collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaSubmission {
    pub status: String,
    /// Yard-local boundary, in placement order
    pub boundary: Vec<Point>,
    pub yard_id: u64,
}

/// Persists new areas. Binary outcome: the area was stored or it was not.
pub trait AreaSubmitter {
    fn submit_area(&self, submission: &AreaSubmission) -> anyhow::Result<()>;
}

/// A submission that left the session and has not resolved yet.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitTicket {
    pub token: u64,
    pub submission: AreaSubmission,
}

/// How a resolved submission affected the session.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Stored; the session is back to Idle
    Submitted(AreaSubmission),
    /// Not stored; the session is unchanged so the user can retry
    Failed(CanvasError),
    /// The session was cancelled or restarted since; nothing changed
    Stale,
}

#[derive(Debug, Default)]
pub struct AreaCreationSession {
    state: SessionState,
    status: String,
    in_flight: Option<u64>,
    next_token: u64,
}

impl AreaCreationSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn target(&self) -> Option<&TargetYard> {
        match &self.state {
            SessionState::Idle => None,
            SessionState::YardSelected { target } | SessionState::Collecting { target, .. } => {
                Some(target)
            }
        }
    }

    pub fn points(&self) -> &[Point] {
        match &self.state {
            SessionState::Collecting { points, .. } => points,
            _ => &[],
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, SessionState::Idle)
    }

    pub fn is_collecting(&self) -> bool {
        matches!(self.state, SessionState::Collecting { .. })
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Yard chosen, status set and enough points for a polygon.
    pub fn is_ready(&self) -> bool {
        self.readiness().is_ok()
    }

    /// Start (or restart) drawing into `target`. Points are discarded, status is kept.
    pub fn select_yard(&mut self, target: TargetYard) {
        debug!(yard_id = target.id, offset = target.offset, "Area creation yard selected");
        self.in_flight = None;
        self.state = SessionState::YardSelected { target };
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    /// Replace the target boundary after a snapshot refresh. Collected points
    /// are not re-checked against the new boundary.
    pub fn refresh_target(&mut self, yard: &Yard, offset: f64) {
        if let SessionState::YardSelected { target } | SessionState::Collecting { target, .. } =
            &mut self.state
        {
            if target.id == yard.id {
                target.name.clone_from(&yard.name);
                target.boundary.clone_from(&yard.boundary);
                target.offset = offset;
            }
        }
    }

    /// Place a map-space point. Rejected points leave the session untouched.
    ///
    /// Returns the number of points collected so far.
    pub fn add_point(&mut self, candidate: Point) -> CanvasResult<usize> {
        let target = self.target().ok_or(CanvasError::NoTargetYard)?;
        if !target.contains(candidate) {
            warn!(
                x = candidate.x,
                y = candidate.y,
                yard_id = target.id,
                "Point rejected: outside yard boundary"
            );
            return Err(CanvasError::OutsideBoundary {
                x: candidate.x,
                y: candidate.y,
                yard_id: target.id,
            });
        }

        match std::mem::take(&mut self.state) {
            SessionState::YardSelected { target } => {
                self.state = SessionState::Collecting {
                    target,
                    points: vec![candidate],
                };
            }
            SessionState::Collecting { target, mut points } => {
                points.push(candidate);
                self.state = SessionState::Collecting { target, points };
            }
            SessionState::Idle => return Err(CanvasError::NoTargetYard),
        }
        Ok(self.points().len())
    }

    /// Remove the most recent point. No-op when there is none.
    pub fn undo_last(&mut self) -> Option<Point> {
        match &mut self.state {
            SessionState::Collecting { points, .. } => points.pop(),
            _ => None,
        }
    }

    /// Remove every point but keep drawing into the same yard.
    pub fn clear(&mut self) {
        if let SessionState::Collecting { points, .. } = &mut self.state {
            points.clear();
        }
    }

    /// Abandon the session: yard, status and points are discarded.
    pub fn cancel(&mut self) {
        if !self.is_idle() {
            debug!("Area creation cancelled");
        }
        self.state = SessionState::Idle;
        self.status.clear();
        self.in_flight = None;
    }

    fn readiness(&self) -> CanvasResult<(&TargetYard, &[Point])> {
        let target = self.target().ok_or(CanvasError::NoTargetYard)?;
        let points = self.points();
        if points.len() < MIN_POLYGON_VERTICES {
            return Err(CanvasError::NotEnoughPoints {
                count: points.len(),
                min: MIN_POLYGON_VERTICES,
            });
        }
        if self.status.is_empty() {
            return Err(CanvasError::MissingStatus);
        }
        Ok((target, points))
    }

    /// Build the payload and mark the session as submitting.
    ///
    /// Degenerate sessions are refused here even if the UI failed to gate them.
    pub fn begin_submit(&mut self) -> CanvasResult<SubmitTicket> {
        if self.in_flight.is_some() {
            return Err(CanvasError::SubmissionInFlight);
        }
        let (target, points) = self.readiness()?;
        let submission = AreaSubmission {
            status: self.status.clone(),
            boundary: points.iter().map(|p| p.offset_x(-target.offset)).collect(),
            yard_id: target.id,
        };

        self.next_token += 1;
        self.in_flight = Some(self.next_token);
        Ok(SubmitTicket {
            token: self.next_token,
            submission,
        })
    }

    /// Apply the collaborator's answer for `ticket`.
    pub fn finish_submit(
        &mut self,
        ticket: SubmitTicket,
        result: CanvasResult<()>,
    ) -> SubmitOutcome {
        if self.in_flight != Some(ticket.token) {
            debug!(token = ticket.token, "Ignoring stale submission result");
            return SubmitOutcome::Stale;
        }
        self.in_flight = None;

        match result {
            Ok(()) => {
                info!(
                    yard_id = ticket.submission.yard_id,
                    points = ticket.submission.boundary.len(),
                    "Area submitted"
                );
                self.state = SessionState::Idle;
                self.status.clear();
                SubmitOutcome::Submitted(ticket.submission)
            }
            Err(err) => {
                warn!("Area submission failed, session kept for retry: {}", err);
                SubmitOutcome::Failed(err)
            }
        }
    }

    /// Submit synchronously through `submitter`.
    pub fn submit(&mut self, submitter: &dyn AreaSubmitter) -> CanvasResult<AreaSubmission> {
        let ticket = self.begin_submit()?;
        let result = submitter
            .submit_area(&ticket.submission)
            .map_err(CanvasError::network);
        match self.finish_submit(ticket, result) {
            SubmitOutcome::Submitted(submission) => Ok(submission),
            SubmitOutcome::Failed(err) => Err(err),
            SubmitOutcome::Stale => Err(CanvasError::from("submission superseded")),
        }
    }
}
