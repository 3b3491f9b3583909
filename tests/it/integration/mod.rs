//! Integration tests for yardmap.
//!
//! These drive `MapCanvas` through its event reducer and check the
//! interaction between input, selection, area creation and polling.

mod area_workflow_tests;
mod polling_tests;
mod selection_flow_tests;

use std::time::{Duration, Instant};
use yardmap::canvas::{CanvasEvent, MapCanvas};
use yardmap::Point;

/// Press and release at the same screen position.
pub fn click(canvas: &mut MapCanvas, x: f64, y: f64) {
    let pos = Point::new(x, y);
    canvas.dispatch(CanvasEvent::PointerDown { pos });
    canvas.dispatch(CanvasEvent::PointerUp { pos });
}

/// Tick the canvas until `condition` holds or `timeout` passes.
pub fn pump_until<F>(canvas: &mut MapCanvas, mut condition: F, timeout: Duration) -> bool
where
    F: FnMut(&MapCanvas) -> bool,
{
    let start = Instant::now();
    while start.elapsed() < timeout {
        canvas.dispatch(CanvasEvent::Tick(Instant::now()));
        if condition(canvas) {
            return true;
        }
        std::thread::yield_now();
    }
    canvas.dispatch(CanvasEvent::Tick(Instant::now()));
    condition(canvas)
}
