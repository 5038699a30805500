//! Image encoding WASM bindings.
//!
//! # Example
//!
//! ```typescript
//! import { encode_image } from '@imgcrop/wasm';
//!
//! const bytes = encode_image(crop, file.type, 0.4);
//! const edited = new File([bytes], file.name, { type: file.type });
//! ```

use crate::types::{to_js_error, JsDecodedImage};
use imgcrop_core::encode::{self, OutputFormat};
use wasm_bindgen::prelude::*;

/// Encode an image in the format named by `mime`.
///
/// `image/jpeg` is lossy and honours `quality` in `[0, 1]`; `image/png` and
/// `image/webp` are lossless. Any other MIME type is encoded as PNG.
///
/// # Errors
///
/// Returns an error if the image has zero width or height, or if the
/// encoder fails.
#[wasm_bindgen]
pub fn encode_image(image: &JsDecodedImage, mime: &str, quality: f32) -> Result<Vec<u8>, JsValue> {
    encode::encode_image(&image.to_decoded(), OutputFormat::from_mime(mime), quality)
        .map_err(to_js_error)
}

/// MIME type of the bytes [`encode_image`] produces for `mime`.
#[wasm_bindgen]
pub fn output_mime(mime: &str) -> String {
    OutputFormat::from_mime(mime).mime().to_string()
}
