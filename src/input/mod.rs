//! Pointer and wheel input for the map canvas.
//!
//! ## Architecture
//!
//! The viewport (`ViewportState`) is plain data persisted across frames. The
//! in-flight gesture lives in an explicit state machine (`InputState`) so a
//! press, a pan and a click can never be confused with each other.
//!
//! ## Modules
//!
//! - `viewport` - Pan offset + zoom scale and the screen/world conversions
//! - `state` - Gesture state machine enum and helper methods
//! - `drag` - Pointer down/move/up/leave and wheel handling

mod drag;
mod state;
pub mod viewport;

pub use drag::{GestureOutcome, PanGesture};
pub use state::InputState;
pub use viewport::{ViewportState, ZoomLimits};
