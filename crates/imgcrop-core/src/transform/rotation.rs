//! Rotation onto an expanded working surface.
//!
//! The working surface is large enough to hold the whole source image after
//! rotation, so nothing is clipped. It is filled with the background color,
//! then the source is drawn centred and rotated about the surface centre.
//!
//! # Algorithm
//!
//! Inverse mapping: for each pixel centre on the surface we rotate back by
//! -θ and bilinearly sample the source. With the y axis pointing down, a
//! positive angle turns the image clockwise on screen:
//! ```text
//! src_x =  (dst_x - cx) * cos(θ) + (dst_y - cy) * sin(θ) + src_cx
//! src_y = -(dst_x - cx) * sin(θ) + (dst_y - cy) * cos(θ) + src_cy
//! ```

use crate::color::FillColor;
use crate::decode::DecodedImage;

const ANGLE_EPSILON: f64 = 0.001;

/// True when `angle_degrees` is a whole number of turns.
pub fn is_identity_rotation(angle_degrees: f64) -> bool {
    let normalized = angle_degrees % 360.0;
    normalized.abs() < ANGLE_EPSILON || (360.0 - normalized.abs()).abs() < ANGLE_EPSILON
}

/// Sine and cosine of an angle in degrees. Quarter turns are snapped to
/// exact values so 90/180/270 degree rotations copy pixels without drift.
fn sin_cos(angle_degrees: f64) -> (f64, f64) {
    let normalized = angle_degrees.rem_euclid(360.0);
    for (quarter, sin, cos) in [
        (0.0, 0.0, 1.0),
        (90.0, 1.0, 0.0),
        (180.0, 0.0, -1.0),
        (270.0, -1.0, 0.0),
        (360.0, 0.0, 1.0),
    ] {
        if (normalized - quarter).abs() < ANGLE_EPSILON {
            return (sin, cos);
        }
    }
    angle_degrees.to_radians().sin_cos()
}

/// Compute the working surface size for a rotated image.
///
/// ```text
/// width  = w * |cos θ| + h * |sin θ|
/// height = h * |cos θ| + w * |sin θ|
/// ```
///
/// Results are rounded to whole pixels and never drop below 1.
///
/// # Example
///
/// ```
/// use imgcrop_core::transform::working_surface_bounds;
///
/// // 90-degree rotation swaps dimensions
/// assert_eq!(working_surface_bounds(100, 50, 90.0), (50, 100));
///
/// // 45 degrees on a square grows it to the diagonal
/// assert_eq!(working_surface_bounds(200, 200, 45.0), (283, 283));
/// ```
pub fn working_surface_bounds(width: u32, height: u32, angle_degrees: f64) -> (u32, u32) {
    if is_identity_rotation(angle_degrees) {
        return (width, height);
    }

    let (sin, cos) = sin_cos(angle_degrees);
    let (sin, cos) = (sin.abs(), cos.abs());
    let w = width as f64;
    let h = height as f64;

    let new_w = (w * cos + h * sin).round() as u32;
    let new_h = (h * cos + w * sin).round() as u32;

    (new_w.max(1), new_h.max(1))
}

/// Draw `image` rotated by `angle_degrees` onto a background-filled working
/// surface sized by [`working_surface_bounds`].
pub fn render_working_surface(
    image: &DecodedImage,
    angle_degrees: f64,
    fill: FillColor,
) -> DecodedImage {
    let (dst_w, dst_h) = working_surface_bounds(image.width, image.height, angle_degrees);
    let mut surface = DecodedImage::filled(dst_w, dst_h, fill.rgb());
    if image.is_empty() {
        return surface;
    }

    let (sin, cos) = sin_cos(angle_degrees);
    let (src_w, src_h) = (image.width as f64, image.height as f64);
    let src_cx = src_w / 2.0;
    let src_cy = src_h / 2.0;
    let dst_cx = dst_w as f64 / 2.0;
    let dst_cy = dst_h as f64 / 2.0;

    for dst_y in 0..dst_h {
        let dy = dst_y as f64 + 0.5 - dst_cy;
        for dst_x in 0..dst_w {
            let dx = dst_x as f64 + 0.5 - dst_cx;

            let src_x = dx * cos + dy * sin + src_cx;
            let src_y = -dx * sin + dy * cos + src_cy;

            // Outside the drawn image the background shows through
            if src_x < 0.0 || src_y < 0.0 || src_x >= src_w || src_y >= src_h {
                continue;
            }

            let pixel = sample_bilinear(image, src_x - 0.5, src_y - 0.5);
            let idx = ((dst_y as usize) * (dst_w as usize) + dst_x as usize) * 3;
            surface.pixels[idx..idx + 3].copy_from_slice(&pixel);
        }
    }

    surface
}

/// Get a pixel as [f64; 3] from an image at the given coordinates.
#[inline]
fn get_pixel_f64(image: &DecodedImage, px: usize, py: usize) -> [f64; 3] {
    let idx = (py * image.width as usize + px) * 3;
    [
        image.pixels[idx] as f64,
        image.pixels[idx + 1] as f64,
        image.pixels[idx + 2] as f64,
    ]
}

/// Sample a pixel using bilinear interpolation.
///
/// `x`/`y` are in pixel-index space (pixel centres at integers). Samples
/// near the border reuse the edge pixels.
fn sample_bilinear(image: &DecodedImage, x: f64, y: f64) -> [u8; 3] {
    let max_x = (image.width - 1) as f64;
    let max_y = (image.height - 1) as f64;
    let x = x.clamp(0.0, max_x);
    let y = y.clamp(0.0, max_y);

    let x0 = x.floor() as usize;
    let y0 = y.floor() as usize;
    let x1 = (x0 + 1).min(image.width as usize - 1);
    let y1 = (y0 + 1).min(image.height as usize - 1);

    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let p00 = get_pixel_f64(image, x0, y0);
    let p10 = get_pixel_f64(image, x1, y0);
    let p01 = get_pixel_f64(image, x0, y1);
    let p11 = get_pixel_f64(image, x1, y1);

    let mut result = [0u8; 3];
    for i in 0..3 {
        let v = p00[i] * (1.0 - fx) * (1.0 - fy)
            + p10[i] * fx * (1.0 - fy)
            + p01[i] * (1.0 - fx) * fy
            + p11[i] * fx * fy;
        result[i] = v.clamp(0.0, 255.0).round() as u8;
    }

    result
}
