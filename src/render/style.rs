//! Drawable styling.

use crate::constants::*;
use crate::selection::SelectionSource;
use crate::types::AreaStatus;
use serde::Serialize;

/// Fill, stroke and stroke width (screen pixels) for one drawable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Style {
    pub fill: &'static str,
    pub stroke: &'static str,
    pub stroke_width: f64,
}

pub fn yard_style(scale: f64) -> Style {
    Style {
        fill: YARD_FILL,
        stroke: YARD_STROKE,
        stroke_width: 2.0 * scale,
    }
}

pub fn area_style(status: AreaStatus, scale: f64) -> Style {
    let (fill, stroke) = match status {
        AreaStatus::Broken => (AREA_BROKEN_FILL, AREA_BROKEN_STROKE),
        AreaStatus::Ready => (AREA_READY_FILL, AREA_READY_STROKE),
        AreaStatus::Unset => (AREA_DEFAULT_COLOR, AREA_DEFAULT_COLOR),
    };
    Style {
        fill,
        stroke,
        stroke_width: 3.0 * scale,
    }
}

pub fn creation_style(scale: f64) -> Style {
    Style {
        fill: CREATION_FILL,
        stroke: CREATION_STROKE,
        stroke_width: 2.0 * scale,
    }
}

/// Bike triangles: fill says whether it is the active marker, stroke
/// whether it is parked in its assigned area.
pub fn bike_style(active: Option<SelectionSource>, in_right_area: bool, scale: f64) -> Style {
    let fill = match active {
        Some(SelectionSource::Forced) => BIKE_SEARCHED,
        Some(_) => BIKE_SELECTED,
        None => BIKE_NOT_SELECTED,
    };
    let stroke = if in_right_area {
        BIKE_IN_RIGHT_AREA
    } else {
        BIKE_NOT_IN_RIGHT_AREA
    };
    Style {
        fill,
        stroke,
        stroke_width: scale,
    }
}

pub fn tag_style(active: bool, scale: f64) -> Style {
    Style {
        fill: if active { TAG_SELECTED } else { TAG_NOT_SELECTED },
        stroke: TAG_STROKE,
        stroke_width: scale,
    }
}
