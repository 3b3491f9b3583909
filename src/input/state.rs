//! Gesture state machine for the map canvas.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Panning     (pointer down anywhere on the canvas)
//! Panning -> Panning  (pointer move, offset follows the pointer)
//! Panning -> Idle     (pointer up or pointer leave)
//! ```

use crate::types::Point;

/// In-flight pointer gesture. Ephemeral: it touches only the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InputState {
    /// No button held
    #[default]
    Idle,

    /// Button held, canvas follows the pointer
    Panning {
        /// Where the press started, for click detection
        press_pos: Point,
        /// Previous sampled position for delta calculation
        last_pos: Point,
        /// Furthest distance from `press_pos` reached so far
        travelled: f64,
    },
}

impl InputState {
    /// Returns true if a press is being held
    pub fn is_panning(&self) -> bool {
        matches!(self, Self::Panning { .. })
    }

    /// Returns true if the state is Idle
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Start a press at `pos`
    pub fn start_panning(&mut self, pos: Point) {
        *self = Self::Panning {
            press_pos: pos,
            last_pos: pos,
            travelled: 0.0,
        };
    }

    /// Get last sampled pointer position, if panning
    pub fn last_pos(&self) -> Option<Point> {
        match self {
            Self::Panning { last_pos, .. } => Some(*last_pos),
            _ => None,
        }
    }

    /// Get the press position, if panning
    pub fn press_pos(&self) -> Option<Point> {
        match self {
            Self::Panning { press_pos, .. } => Some(*press_pos),
            _ => None,
        }
    }

    /// Record a new pointer sample and return the delta from the previous one
    pub fn advance(&mut self, pos: Point) -> Option<Point> {
        match self {
            Self::Panning {
                press_pos,
                last_pos,
                travelled,
            } => {
                let delta = pos - *last_pos;
                *last_pos = pos;
                *travelled = travelled.max(pos.distance(*press_pos));
                Some(delta)
            }
            Self::Idle => None,
        }
    }

    /// Reset to Idle state
    pub fn reset(&mut self) {
        *self = Self::Idle;
    }
}
