//! ImgCrop Core - crop-before-upload library
//!
//! This crate intercepts files on their way to an upload pipeline, lets the
//! user crop, zoom and rotate each image in a dialog, and hands the edited
//! file (same name, MIME type and uid) back to the host's own upload hook.
//!
//! - [`upload`]: pre-check gate, edit sessions, dialog queue, orchestration
//! - [`transform`]: the raster extractor (rotation and region copy)
//! - [`decode`] / [`encode`]: bytes to RGB pixels and back

pub mod color;
pub mod config;
pub mod decode;
pub mod encode;
pub mod error;
pub mod geometry;
pub mod transform;
pub mod upload;

pub use color::FillColor;
pub use config::{CropConfig, DialogText, Locale};
pub use error::ImgCropError;
pub use geometry::{CropGeometry, CropRect, CropShape};
pub use transform::{extract, working_surface_bounds};
pub use upload::{
    CropDialog, CropHooks, EditHandle, EditOutcome, EditRequest, ImgCrop, PreUploadHook,
    Settlement, UploadFile,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(CropConfig::default().validate().is_ok());
    }

    #[test]
    fn test_config_from_partial_json() {
        let config: CropConfig =
            serde_json::from_str(r##"{"quality": 0.9, "fill_color": "#000", "crop_shape": "round"}"##)
                .unwrap();
        assert_eq!(config.quality, 0.9);
        assert_eq!(config.fill_color, FillColor::BLACK);
        assert_eq!(config.crop_shape, CropShape::Round);
        assert_eq!(config.max_zoom, 3.0);
    }
}
