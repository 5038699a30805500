//! Image decoding WASM bindings.
//!
//! # Example
//!
//! ```typescript
//! import { decode_image } from '@imgcrop/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const image = decode_image(bytes);
//! console.log(`Decoded ${image.width}x${image.height}`);
//! ```

use crate::types::{to_js_error, JsDecodedImage};
use imgcrop_core::decode;
use wasm_bindgen::prelude::*;

/// Decode a JPEG, PNG or WebP file to RGB pixels.
///
/// EXIF orientation is applied, so the result matches what an `<img>`
/// element would show.
///
/// # Errors
///
/// Returns an error string if the format is unknown or the file is corrupt.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsDecodedImage, JsValue> {
    decode::decode_image(bytes)
        .map(JsDecodedImage::from_decoded)
        .map_err(to_js_error)
}

/// Read the EXIF orientation tag (1-8, 1 when absent).
#[wasm_bindgen]
pub fn get_orientation(bytes: &[u8]) -> u8 {
    decode::get_orientation(bytes) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use imgcrop_core::decode::DecodedImage;
    use imgcrop_core::encode::{encode_image, OutputFormat};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = DecodedImage::filled(width, height, [1, 2, 3]);
        encode_image(&img, OutputFormat::Png, 1.0).unwrap()
    }

    #[test]
    fn test_decode_png() {
        let img = decode_image(&png_bytes(12, 7)).ok().unwrap();
        assert_eq!(img.width(), 12);
        assert_eq!(img.height(), 7);
        assert_eq!(&img.pixels()[..3], &[1, 2, 3]);
    }

    #[test]
    fn test_png_has_default_orientation() {
        assert_eq!(get_orientation(&png_bytes(2, 2)), 1);
    }
}
