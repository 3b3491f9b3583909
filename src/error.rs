//! Error types for canvas operations
//!
//! One taxonomy for everything the canvas can refuse or fail at. None of
//! these are fatal: every variant leaves the canvas interactive.

use thiserror::Error;

/// Errors that can occur during canvas operations
#[derive(Error, Debug)]
pub enum CanvasError {
    /// Candidate point lies outside the target yard boundary
    #[error("Point ({x:.1}, {y:.1}) is outside yard {yard_id}")]
    OutsideBoundary { x: f64, y: f64, yard_id: u64 },

    /// Operation needs a target yard but none is selected
    #[error("No yard selected")]
    NoTargetYard,

    /// Submission attempted with a degenerate polygon
    #[error("Area needs at least {min} points, has {count}")]
    NotEnoughPoints { count: usize, min: usize },

    /// Submission attempted without an area status
    #[error("Area status is not set")]
    MissingStatus,

    /// A submission for this session has not resolved yet
    #[error("Submission already in flight")]
    SubmissionInFlight,

    /// Yard id is not part of the current snapshot
    #[error("Unknown yard: {0}")]
    UnknownYard(u64),

    /// Poll or submission failed at the collaborator
    #[error("Network failure: {0}")]
    Network(String),

    /// IO error from std::io
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error from serde_json
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File watcher error
    #[error("Watch error: {0}")]
    Watch(#[from] notify::Error),

    /// Generic error message
    #[error("{0}")]
    Other(String),
}

impl CanvasError {
    /// True for the recoverable rejection of a single user input
    pub fn is_validation(&self) -> bool {
        matches!(self, CanvasError::OutsideBoundary { .. })
    }

    /// True for state invariant violations the UI should have gated
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            CanvasError::NoTargetYard
                | CanvasError::NotEnoughPoints { .. }
                | CanvasError::MissingStatus
                | CanvasError::SubmissionInFlight
        )
    }

    /// Wrap a collaborator failure as a network error, keeping its context chain
    pub fn network(err: anyhow::Error) -> Self {
        CanvasError::Network(format!("{:#}", err))
    }
}

/// Result type alias for canvas operations
pub type CanvasResult<T> = Result<T, CanvasError>;

impl From<String> for CanvasError {
    fn from(s: String) -> Self {
        CanvasError::Other(s)
    }
}

impl From<&str> for CanvasError {
    fn from(s: &str) -> Self {
        CanvasError::Other(s.to_string())
    }
}
