//! Interactive spatial canvas for locating tagged motorcycles across yards.
//!
//! The crate owns the parts of the yard map with real invariants: the
//! pan/zoom transform, the multi-yard layout, the containment gate used while
//! drawing new areas, the marker selection state machine and the pure scene
//! composition that turns all of it into drawables. Network access, widgets
//! and painting are collaborators behind traits.

pub mod area_creation;
pub mod background;
pub mod canvas;
pub mod constants;
pub mod error;
pub mod geometry;
pub mod hit_testing;
pub mod input;
pub mod logging;
pub mod notifications;
pub mod render;
pub mod selection;
pub mod settings;
pub mod settings_watcher;
pub mod snapshot;
pub mod types;

pub use error::{CanvasError, CanvasResult};
pub use types::Point;
