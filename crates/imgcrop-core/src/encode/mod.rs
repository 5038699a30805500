//! Encoding of extracted crops back into file bytes.
//!
//! The output format follows the original file's MIME type, so a JPEG stays a
//! JPEG. The caller-supplied quality factor in `[0, 1]` applies to lossy
//! formats only.
//!
//! # Examples
//!
//! ```ignore
//! use imgcrop_core::encode::{encode_image, OutputFormat};
//!
//! let bytes = encode_image(&image, OutputFormat::from_mime("image/jpeg"), 0.4)?;
//! ```

mod codec;

pub use codec::{encode_image, quality_to_percent, EncodeError, OutputFormat};
