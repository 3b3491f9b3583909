//! Planar geometry used by the canvas.
//!
//! - `containment` - even-odd point-in-polygon test with a horizontal offset
//! - `layout` - side-by-side placement of yards on the shared map

mod containment;
mod layout;

pub use containment::contains;
pub use layout::{YardLayout, yard_offsets};
