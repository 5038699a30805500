//! Raster extraction: the pixels the user framed in the editor.
//!
//! Without rotation this is a plain region copy out of the source. With
//! rotation the source is first drawn onto an expanded working surface and
//! the region is copied out of that surface instead, so the crop rectangle
//! must already be in working-surface coordinates.

use crate::color::FillColor;
use crate::decode::DecodedImage;
use crate::geometry::CropRect;

use super::crop::copy_region;
use super::rotation::{is_identity_rotation, render_working_surface};

/// Produce the output buffer for a crop rectangle and rotation.
///
/// The result is always exactly `rect.width` x `rect.height`. Any part of
/// the rectangle not covered by the (rotated) source is `fill`.
///
/// # Example
///
/// ```
/// use imgcrop_core::color::FillColor;
/// use imgcrop_core::decode::DecodedImage;
/// use imgcrop_core::geometry::CropRect;
/// use imgcrop_core::transform::extract;
///
/// let source = DecodedImage::filled(800, 600, [10, 20, 30]);
/// let out = extract(&source, &CropRect::new(100, 100, 400, 300), 0.0, FillColor::WHITE);
/// assert_eq!((out.width, out.height), (400, 300));
/// ```
pub fn extract(
    source: &DecodedImage,
    rect: &CropRect,
    rotation_degrees: f64,
    fill: FillColor,
) -> DecodedImage {
    if is_identity_rotation(rotation_degrees) {
        return copy_region(source, rect, fill);
    }

    let surface = render_working_surface(source, rotation_degrees, fill);
    copy_region(&surface, rect, fill)
}
