//! Image decoding for the edit session.
//!
//! A candidate file is decoded once, when its session enters the loading
//! state. The decoded RGB buffer is what the dialog displays and what the
//! raster extractor reads from at confirm time.

mod reader;
mod types;

pub use reader::{decode_image, decode_image_onto, get_orientation};
pub use types::{DecodeError, DecodedImage, Orientation};
