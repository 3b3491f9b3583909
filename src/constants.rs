//! Canvas-wide constants.
//!
//! Centralizes magic numbers and default colors so the layout, input and
//! render code agree on them.

// ============================================================================
// Zoom & Pan
// ============================================================================

/// Multiplicative zoom step per wheel notch
pub const ZOOM_STEP: f64 = 1.05;

/// Default zoom level
pub const DEFAULT_SCALE: f64 = 1.0;

/// Maximum pointer travel (screen pixels) for a press/release to count as a click
pub const CLICK_SLOP: f64 = 3.0;

// ============================================================================
// Layout
// ============================================================================

/// Horizontal gap between consecutive yards, in world units
pub const YARD_GAP: f64 = 20.0;

/// Minimum vertices for a polygon to enclose anything
pub const MIN_POLYGON_VERTICES: usize = 3;

// ============================================================================
// Markers
// ============================================================================

/// Radius of bike and tag markers, in world units
pub const MARKER_RADIUS: f64 = 5.0;

/// Extra hit-test tolerance around markers, in world units
pub const HIT_SLOP: f64 = 2.0;

// ============================================================================
// Timing
// ============================================================================

/// Default snapshot poll interval in milliseconds
pub const POLL_INTERVAL_MS: u64 = 5000;

/// Default lifetime of a transient notice in milliseconds
pub const NOTICE_DURATION_MS: u64 = 3000;

/// Default background worker count
pub const DEFAULT_WORKERS: usize = 2;

// ============================================================================
// Colors
// ============================================================================

/// Yard boundary fill
pub const YARD_FILL: &str = "#a7f3d0";

/// Yard boundary stroke
pub const YARD_STROKE: &str = "#6ee7b7";

/// BROKEN area fill
pub const AREA_BROKEN_FILL: &str = "#fda4af";

/// BROKEN area stroke
pub const AREA_BROKEN_STROKE: &str = "#fb7185";

/// READY area fill
pub const AREA_READY_FILL: &str = "#60a5fa";

/// READY area stroke
pub const AREA_READY_STROKE: &str = "#93c5fd";

/// Fill and stroke for areas with any other status
pub const AREA_DEFAULT_COLOR: &str = "gray";

/// In-progress area stroke
pub const CREATION_STROKE: &str = "#f59e42";

/// In-progress area fill
pub const CREATION_FILL: &str = "#fbbf24aa";

/// Bike marker fill when it is the active selection
pub const BIKE_SELECTED: &str = "#22c55e";

/// Bike marker fill when it was forced by a plate search
pub const BIKE_SEARCHED: &str = "#7c3aed";

/// Bike marker fill otherwise
pub const BIKE_NOT_SELECTED: &str = "#ea580c";

/// Bike marker stroke when parked in its assigned area
pub const BIKE_IN_RIGHT_AREA: &str = "#e2e8f0";

/// Bike marker stroke when parked outside its assigned area
pub const BIKE_NOT_IN_RIGHT_AREA: &str = "#f9a8d4";

/// Tag marker fill when it is the active selection
pub const TAG_SELECTED: &str = "orange";

/// Tag marker fill otherwise
pub const TAG_NOT_SELECTED: &str = "yellow";

/// Tag marker stroke
pub const TAG_STROKE: &str = "#fff";
