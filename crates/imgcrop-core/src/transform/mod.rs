//! Raster extraction: rotation onto a working surface and region copy.
//!
//! # Coordinate System
//!
//! - Rotation angles are in degrees, positive = clockwise on screen
//! - Crop rectangles are in pixels, origin at the top-left corner
//! - With a non-zero rotation, crop rectangles address the rotation-expanded
//!   working surface rather than the source image

mod crop;
mod extract;
mod rotation;

pub use crop::copy_region;
pub use extract::extract;
pub use rotation::{is_identity_rotation, render_working_surface, working_surface_bounds};
