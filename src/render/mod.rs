//! Scene composition and painting.
//!
//! - `scene` - pure `(snapshot, viewport, session, selection) -> drawables`
//! - `style` - colors derived from area status and selection
//! - `surface` - the graphics target trait and `paint`

mod scene;
mod style;
mod surface;

pub use scene::{Drawable, MarkerShape, PolygonKind, SceneInput, render_scene};
pub use style::{Style, area_style, bike_style, creation_style, tag_style, yard_style};
pub use surface::{Surface, paint};
