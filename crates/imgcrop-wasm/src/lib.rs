//! ImgCrop WASM - WebAssembly bindings for ImgCrop
//!
//! This crate exposes the raster side of imgcrop-core to the page that
//! renders the crop dialog: decoding the selected file, extracting the
//! confirmed crop and encoding it back to the file's format.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrapper types for image data
//! - `config` - Crop configuration from plain objects
//! - `decode` - Image decoding (JPEG, PNG, WebP, with EXIF orientation)
//! - `transform` - Crop extraction and working-surface sizing
//! - `encode` - Encoding by MIME type
//!
//! # Usage
//!
//! ```typescript
//! import init, { decode_image, extract_crop, encode_image } from '@imgcrop/wasm';
//!
//! await init();
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const image = decode_image(bytes);
//! const crop = extract_crop(image, geometry, '#ffffff');
//! const edited = encode_image(crop, file.type, 0.4);
//! ```

use wasm_bindgen::prelude::*;

mod config;
mod decode;
mod encode;
mod transform;
mod types;

pub use config::JsCropConfig;
pub use decode::{decode_image, get_orientation};
pub use encode::{encode_image, output_mime};
pub use transform::{extract_crop, working_surface_bounds};
pub use types::JsDecodedImage;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
