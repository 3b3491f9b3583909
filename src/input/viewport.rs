//! Viewport transform: pan offset + zoom scale.
//!
//! Screen space is pointer/device pixels; world space is the map coordinate
//! system yards and tags are laid out in.

use crate::constants::{DEFAULT_SCALE, ZOOM_STEP};
use crate::types::Point;
use serde::{Deserialize, Serialize};

/// Zoom step and optional scale bounds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomLimits {
    /// Multiplicative step per notch, keeps perceived zoom speed constant
    pub step: f64,
    pub min_scale: Option<f64>,
    pub max_scale: Option<f64>,
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self {
            step: ZOOM_STEP,
            min_scale: None,
            max_scale: None,
        }
    }
}

impl ZoomLimits {
    fn clamp(&self, scale: f64) -> f64 {
        let scale = self.min_scale.map_or(scale, |min| scale.max(min));
        self.max_scale.map_or(scale, |max| scale.min(max))
    }
}

/// Pan offset and zoom scale. `scale` is always > 0.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    pub offset: Point,
    pub scale: f64,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            offset: Point::ZERO,
            scale: DEFAULT_SCALE,
        }
    }
}

impl ViewportState {
    /// Convert a pointer position to world coordinates
    #[inline]
    pub fn screen_to_world(&self, p: Point) -> Point {
        (p - self.offset) / self.scale
    }

    /// Convert a world position to pointer coordinates
    #[inline]
    pub fn world_to_screen(&self, p: Point) -> Point {
        p * self.scale + self.offset
    }

    /// Convert a world-space length to screen pixels
    #[inline]
    pub fn length_to_screen(&self, length: f64) -> f64 {
        length * self.scale
    }

    pub fn pan_by(&mut self, delta: Point) {
        self.offset += delta;
    }

    /// Zoom one step around `pointer` with the default step and no bounds.
    pub fn zoom_at(&mut self, pointer: Point, direction: f64) -> bool {
        self.zoom_with(pointer, direction, &ZoomLimits::default())
    }

    /// Zoom one step around `pointer`; positive `direction` zooms in.
    ///
    /// The world point under `pointer` stays under `pointer`. Returns false
    /// when the scale did not change (zero direction or already at a bound).
    pub fn zoom_with(&mut self, pointer: Point, direction: f64, limits: &ZoomLimits) -> bool {
        if direction == 0.0 || direction.is_nan() {
            return false;
        }

        let stepped = if direction > 0.0 {
            self.scale * limits.step
        } else {
            self.scale / limits.step
        };
        let new_scale = limits.clamp(stepped);
        if new_scale == self.scale || !new_scale.is_finite() || new_scale <= 0.0 {
            return false;
        }

        let anchor = (pointer - self.offset) / self.scale;
        self.offset = pointer - anchor * new_scale;
        self.scale = new_scale;
        true
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
