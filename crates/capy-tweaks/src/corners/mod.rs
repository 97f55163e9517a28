//! Rounded corner cutouts.
//!
//! Both kinds follow the same policy: on every relevant layout event the
//! module destroys all of its actors and builds them again from the current
//! geometry. Nothing is built while the host is still starting up.

pub mod geometry;
mod panel;
mod screen;

pub use geometry::{CORNER_RADIUS, CornerActor, CornerKind, ScreenCorner, Side};
pub use panel::{PanelCorner, PanelCorners};
pub use screen::ScreenCorners;
