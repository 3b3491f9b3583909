//! Pointer handling for pan and zoom.

use super::state::InputState;
use super::viewport::{ViewportState, ZoomLimits};
use crate::constants::CLICK_SLOP;
use crate::types::Point;

/// What a released or abandoned gesture amounted to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureOutcome {
    /// Nothing was held
    None,
    /// Press and release without meaningful travel, at this screen position
    Click(Point),
    /// A pan finished
    DragEnd,
}

/// Drives `ViewportState` from pointer and wheel events.
#[derive(Debug, Clone)]
pub struct PanGesture {
    state: InputState,
    click_slop: f64,
}

impl Default for PanGesture {
    fn default() -> Self {
        Self::new(CLICK_SLOP)
    }
}

impl PanGesture {
    pub fn new(click_slop: f64) -> Self {
        Self {
            state: InputState::Idle,
            click_slop,
        }
    }

    pub fn state(&self) -> &InputState {
        &self.state
    }

    pub fn set_click_slop(&mut self, click_slop: f64) {
        self.click_slop = click_slop;
    }

    pub fn pointer_down(&mut self, pos: Point) {
        self.state.start_panning(pos);
    }

    /// Pan by the delta from the previous sample. Returns true if the viewport moved.
    pub fn pointer_move(&mut self, viewport: &mut ViewportState, pos: Point) -> bool {
        match self.state.advance(pos) {
            Some(delta) if delta != Point::ZERO => {
                viewport.pan_by(delta);
                true
            }
            _ => false,
        }
    }

    pub fn pointer_up(&mut self, viewport: &mut ViewportState, pos: Point) -> GestureOutcome {
        if self.state.is_idle() {
            return GestureOutcome::None;
        }
        self.pointer_move(viewport, pos);

        let outcome = match self.state {
            InputState::Panning { travelled, .. } if travelled <= self.click_slop => {
                GestureOutcome::Click(pos)
            }
            _ => GestureOutcome::DragEnd,
        };
        self.state.reset();
        outcome
    }

    /// Leaving the canvas ends any pan without producing a click.
    pub fn pointer_leave(&mut self) -> GestureOutcome {
        if self.state.is_idle() {
            return GestureOutcome::None;
        }
        self.state.reset();
        GestureOutcome::DragEnd
    }

    /// Wheel zoom around `pos`. A positive `delta_y` (scrolling down) zooms out.
    pub fn wheel(
        &mut self,
        viewport: &mut ViewportState,
        pos: Point,
        delta_y: f64,
        limits: &ZoomLimits,
    ) -> bool {
        viewport.zoom_with(pos, -delta_y, limits)
    }
}
