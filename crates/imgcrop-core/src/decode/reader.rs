//! Image decoding with EXIF orientation handling.
//!
//! Any format enabled on the `image` crate is accepted; the format is sniffed
//! from the bytes rather than trusted from the file's MIME type.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageReader};

use super::{DecodeError, DecodedImage, Orientation};
use crate::color::FillColor;

/// Decode an image from bytes, applying EXIF orientation correction.
///
/// Transparent pixels are composited onto white, the way a page shows them.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the format cannot be recognised,
/// `DecodeError::CorruptedFile` if decoding fails part way, and
/// `DecodeError::EmptyImage` for zero-sized images.
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    decode_image_onto(bytes, FillColor::WHITE)
}

/// Decode an image from bytes and composite any alpha channel onto
/// `background`, applying EXIF orientation correction.
pub fn decode_image_onto(bytes: &[u8], background: FillColor) -> Result<DecodedImage, DecodeError> {
    let orientation = extract_orientation(bytes);
    let img = decode_dynamic(bytes)?;
    finish(apply_orientation(img, orientation), background)
}

fn decode_dynamic(bytes: &[u8]) -> Result<DynamicImage, DecodeError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }

    reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))
}

fn finish(img: DynamicImage, background: FillColor) -> Result<DecodedImage, DecodeError> {
    let (width, height) = (img.width(), img.height());
    if width == 0 || height == 0 {
        return Err(DecodeError::EmptyImage { width, height });
    }

    if !img.color().has_alpha() {
        return Ok(DecodedImage::from_rgb_image(img.into_rgb8()));
    }

    let rgba = img.into_rgba8();
    let mut pixels = Vec::with_capacity((width as usize) * (height as usize) * 3);
    for px in rgba.pixels() {
        pixels.extend_from_slice(&flatten(px.0, background.rgb()));
    }
    Ok(DecodedImage::new(width, height, pixels))
}

/// Source-over composite of one RGBA pixel onto an opaque background.
#[inline]
fn flatten([r, g, b, a]: [u8; 4], background: [u8; 3]) -> [u8; 3] {
    let a = a as u32;
    let blend = |c: u8, bg: u8| ((c as u32 * a + bg as u32 * (255 - a) + 127) / 255) as u8;
    [
        blend(r, background[0]),
        blend(g, background[1]),
        blend(b, background[2]),
    ]
}

/// Extract EXIF orientation from image bytes.
///
/// Returns `Orientation::Normal` if no EXIF data is found or orientation
/// cannot be determined.
fn extract_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);

    match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from)
            .unwrap_or_default(),
        Err(_) => Orientation::Normal,
    }
}

/// Apply EXIF orientation transformation to an image.
fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}

/// Extract EXIF orientation value from image bytes (for external use).
pub fn get_orientation(bytes: &[u8]) -> Orientation {
    extract_orientation(bytes)
}
