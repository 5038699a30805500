//! Format selection and encoding using the `image` crate's encoders.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use std::io::Cursor;
use thiserror::Error;

use crate::decode::DecodedImage;

/// Errors that can occur while encoding an extracted crop.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The underlying encoder failed
    #[error("{format:?} encoding failed: {message}")]
    EncodingFailed {
        format: OutputFormat,
        message: String,
    },
}

/// Output container format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Lossy, honours the quality factor.
    Jpeg,
    /// Lossless.
    Png,
    /// Lossless WebP.
    WebP,
}

impl OutputFormat {
    /// Pick a format for a MIME type.
    ///
    /// Unknown or unsupported types fall back to PNG, matching what a
    /// browser canvas does when asked for a type it cannot produce.
    pub fn from_mime(mime: &str) -> Self {
        let essence = mime.split(';').next().unwrap_or("").trim();
        match essence.to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" | "image/pjpeg" => OutputFormat::Jpeg,
            "image/webp" => OutputFormat::WebP,
            _ => OutputFormat::Png,
        }
    }

    /// The canonical MIME type of the bytes this format produces.
    pub fn mime(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
            OutputFormat::WebP => "image/webp",
        }
    }
}

/// Map a quality factor in `[0, 1]` onto the encoder's 1-100 scale.
///
/// Out-of-range and NaN factors are clamped.
pub fn quality_to_percent(quality: f32) -> u8 {
    let quality = if quality.is_nan() { 0.0 } else { quality };
    ((quality.clamp(0.0, 1.0) * 100.0).round() as u8).clamp(1, 100)
}

/// Encode an RGB image.
///
/// # Arguments
///
/// * `image` - RGB image produced by the raster extractor
/// * `format` - Output container format
/// * `quality` - Quality factor in `[0, 1]`, used for lossy formats
///
/// # Example
///
/// ```
/// use imgcrop_core::decode::DecodedImage;
/// use imgcrop_core::encode::{encode_image, OutputFormat};
///
/// let image = DecodedImage::filled(100, 100, [128, 128, 128]);
/// let jpeg = encode_image(&image, OutputFormat::Jpeg, 0.9).unwrap();
///
/// // Verify JPEG magic bytes
/// assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
/// ```
pub fn encode_image(
    image: &DecodedImage,
    format: OutputFormat,
    quality: f32,
) -> Result<Vec<u8>, EncodeError> {
    let (width, height) = (image.width, image.height);
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected_len = (width as usize) * (height as usize) * 3;
    if image.pixels.len() != expected_len {
        return Err(EncodeError::InvalidPixelData {
            expected: expected_len,
            actual: image.pixels.len(),
        });
    }

    let mut buffer = Cursor::new(Vec::new());
    let pixels = image.pixels.as_slice();
    let color = ExtendedColorType::Rgb8;

    let result = match format {
        OutputFormat::Jpeg => {
            JpegEncoder::new_with_quality(&mut buffer, quality_to_percent(quality))
                .write_image(pixels, width, height, color)
        }
        OutputFormat::Png => PngEncoder::new(&mut buffer).write_image(pixels, width, height, color),
        OutputFormat::WebP => {
            WebPEncoder::new_lossless(&mut buffer).write_image(pixels, width, height, color)
        }
    };

    result.map_err(|e| EncodeError::EncodingFailed {
        format,
        message: e.to_string(),
    })?;

    Ok(buffer.into_inner())
}
