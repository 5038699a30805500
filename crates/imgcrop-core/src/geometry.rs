//! Crop geometry reported by the interactive editor.
//!
//! # Coordinate System
//!
//! - Crop rectangles are in pixels, origin at the top-left corner
//! - `x`/`y` may be negative and the rectangle may extend past the image
//!   when the user pans beyond an edge
//! - When rotation is non-zero the rectangle is expressed in the coordinate
//!   space of the rotation-expanded working surface, not the source image

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when the editor reports malformed geometry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// Width or height is zero
    #[error("Invalid crop size: width ({width}) and height ({height}) must be non-zero")]
    EmptyRect { width: u32, height: u32 },

    /// A floating point field is NaN or infinite
    #[error("Invalid crop geometry: {field} must be finite")]
    NonFinite { field: &'static str },

    /// A bound pair has min > max or a non-positive min
    #[error("Invalid {name} bounds: min ({min}) must be positive and <= max ({max})")]
    InvalidBounds {
        name: &'static str,
        min: f64,
        max: f64,
    },
}

/// Axis-aligned crop rectangle in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CropRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl CropRect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

}

/// Shape of the crop overlay shown to the user.
///
/// The extracted buffer is always rectangular; `Round` only changes what
/// the editor draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CropShape {
    #[default]
    Rect,
    Round,
}

/// Inclusive `[min, max]` range for zoom or aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn validate(&self, name: &'static str) -> Result<(), GeometryError> {
        if !(self.min.is_finite() && self.max.is_finite()) || self.min <= 0.0 || self.min > self.max
        {
            return Err(GeometryError::InvalidBounds {
                name,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }

    #[inline]
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Live editor state: crop rectangle, rotation, zoom and aspect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropGeometry {
    pub rect: CropRect,
    /// Rotation in degrees, 0 = untouched.
    pub rotation: f64,
    pub zoom: f64,
    pub aspect: f64,
}

impl CropGeometry {
    /// Initial geometry for an image: the largest centred rectangle with
    /// the given aspect ratio, shrunk by `zoom`, with no rotation.
    pub fn initial(image_width: u32, image_height: u32, aspect: f64, zoom: f64) -> Self {
        let (w, h) = (image_width as f64, image_height as f64);

        let (mut crop_w, mut crop_h) = if w / h > aspect {
            (h * aspect, h)
        } else {
            (w, w / aspect)
        };
        crop_w /= zoom;
        crop_h /= zoom;

        let width = (crop_w.round() as u32).max(1);
        let height = (crop_h.round() as u32).max(1);
        let x = ((w - width as f64) / 2.0).round() as i32;
        let y = ((h - height as f64) / 2.0).round() as i32;

        Self {
            rect: CropRect::new(x, y, width, height),
            rotation: 0.0,
            zoom,
            aspect,
        }
    }

    /// Check the structural invariants: positive size and finite numbers.
    pub fn validate(&self) -> Result<(), GeometryError> {
        if self.rect.width == 0 || self.rect.height == 0 {
            return Err(GeometryError::EmptyRect {
                width: self.rect.width,
                height: self.rect.height,
            });
        }
        for (field, value) in [
            ("rotation", self.rotation),
            ("zoom", self.zoom),
            ("aspect", self.aspect),
        ] {
            if !value.is_finite() {
                return Err(GeometryError::NonFinite { field });
            }
        }
        Ok(())
    }
}
