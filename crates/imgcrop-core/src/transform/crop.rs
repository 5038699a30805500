//! Region copy with background fill.
//!
//! The crop rectangle is allowed to hang over any edge of the source (the
//! user can pan or zoom past the image). Overhanging output pixels keep the
//! background color; the copy itself never fails.

use crate::color::FillColor;
use crate::decode::DecodedImage;
use crate::geometry::CropRect;

/// Copy `rect` out of `image` into a fresh `rect.width` x `rect.height`
/// buffer pre-filled with `fill`.
///
/// # Example
///
/// ```
/// use imgcrop_core::color::FillColor;
/// use imgcrop_core::decode::DecodedImage;
/// use imgcrop_core::geometry::CropRect;
/// use imgcrop_core::transform::copy_region;
///
/// let image = DecodedImage::filled(100, 100, [128, 128, 128]);
/// let out = copy_region(&image, &CropRect::new(-10, 0, 50, 50), FillColor::WHITE);
/// assert_eq!(out.pixel(0, 0), [255, 255, 255]);
/// assert_eq!(out.pixel(10, 0), [128, 128, 128]);
/// ```
pub fn copy_region(image: &DecodedImage, rect: &CropRect, fill: FillColor) -> DecodedImage {
    let mut output = DecodedImage::filled(rect.width, rect.height, fill.rgb());

    // Intersection of the crop rectangle with the source, in source space
    let left = (rect.x as i64).max(0);
    let top = (rect.y as i64).max(0);
    let right = (rect.x as i64 + rect.width as i64).min(image.width as i64);
    let bottom = (rect.y as i64 + rect.height as i64).min(image.height as i64);

    if left >= right || top >= bottom {
        return output;
    }

    let row_bytes = ((right - left) * 3) as usize;
    let out_x = (left - rect.x as i64) as usize;

    // Copy pixel data row by row for efficiency
    for src_y in top..bottom {
        let out_y = (src_y - rect.y as i64) as usize;
        let src_start = ((src_y as usize) * (image.width as usize) + left as usize) * 3;
        let dst_start = (out_y * (rect.width as usize) + out_x) * 3;

        output.pixels[dst_start..dst_start + row_bytes]
            .copy_from_slice(&image.pixels[src_start..src_start + row_bytes]);
    }

    output
}
