//! User-tunable canvas settings, persisted as JSON.
//!
//! Every field has a default, so a partial or empty file is valid. A file
//! that cannot be read or parsed falls back to the defaults with a warning.

use crate::constants::{
    CLICK_SLOP, HIT_SLOP, MARKER_RADIUS, NOTICE_DURATION_MS, POLL_INTERVAL_MS, YARD_GAP, ZOOM_STEP,
};
use crate::error::{CanvasError, CanvasResult};
use crate::input::ZoomLimits;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasSettings {
    pub zoom_step: f64,
    pub min_scale: Option<f64>,
    pub max_scale: Option<f64>,
    pub yard_gap: f64,
    pub poll_interval_ms: u64,
    pub notice_duration_ms: u64,
    pub marker_radius: f64,
    pub hit_slop: f64,
    pub click_slop: f64,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            zoom_step: ZOOM_STEP,
            min_scale: None,
            max_scale: None,
            yard_gap: YARD_GAP,
            poll_interval_ms: POLL_INTERVAL_MS,
            notice_duration_ms: NOTICE_DURATION_MS,
            marker_radius: MARKER_RADIUS,
            hit_slop: HIT_SLOP,
            click_slop: CLICK_SLOP,
        }
    }
}

/// `<config dir>/yardmap/settings.json`
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("yardmap").join("settings.json"))
}

impl CanvasSettings {
    /// Load from the default location, falling back to defaults.
    pub fn load() -> Self {
        let Some(path) = default_settings_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Failed to load settings from {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> CanvasResult<Self> {
        let contents = fs::read_to_string(path)?;
        let settings: Self = serde_json::from_str(&contents)?;
        debug!(path = %path.display(), "Settings loaded");
        Ok(settings.sanitized())
    }

    pub fn save_to(&self, path: &Path) -> CanvasResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Save to the default location.
    pub fn save(&self) -> CanvasResult<()> {
        let path = default_settings_path()
            .ok_or_else(|| CanvasError::from("No config directory on this platform"))?;
        self.save_to(&path)
    }

    /// Replace out-of-range values with their defaults.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(self.zoom_step.is_finite() && self.zoom_step > 1.0) {
            warn!(zoom_step = self.zoom_step, "Ignoring invalid zoom step");
            self.zoom_step = defaults.zoom_step;
        }
        self.min_scale = self.min_scale.filter(|s| s.is_finite() && *s > 0.0);
        self.max_scale = self.max_scale.filter(|s| s.is_finite() && *s > 0.0);
        if let (Some(min), Some(max)) = (self.min_scale, self.max_scale) {
            if min > max {
                warn!(min, max, "Ignoring inverted scale bounds");
                self.min_scale = None;
                self.max_scale = None;
            }
        }
        if self.poll_interval_ms == 0 {
            self.poll_interval_ms = defaults.poll_interval_ms;
        }
        if !(self.marker_radius.is_finite() && self.marker_radius > 0.0) {
            self.marker_radius = defaults.marker_radius;
        }
        if !(self.yard_gap.is_finite() && self.yard_gap >= 0.0) {
            self.yard_gap = defaults.yard_gap;
        }
        if !(self.hit_slop.is_finite() && self.hit_slop >= 0.0) {
            self.hit_slop = defaults.hit_slop;
        }
        if !(self.click_slop.is_finite() && self.click_slop >= 0.0) {
            self.click_slop = defaults.click_slop;
        }
        self
    }

    pub fn zoom_limits(&self) -> ZoomLimits {
        ZoomLimits {
            step: self.zoom_step,
            min_scale: self.min_scale,
            max_scale: self.max_scale,
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn notice_duration(&self) -> Duration {
        Duration::from_millis(self.notice_duration_ms)
    }
}
