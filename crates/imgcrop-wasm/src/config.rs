//! Crop configuration WASM bindings.
//!
//! Lets the page build a validated configuration from a plain object and
//! read back the values the extractor needs.

use crate::types::to_js_error;
use imgcrop_core::CropConfig;
use wasm_bindgen::prelude::*;

/// Crop configuration wrapper for JavaScript
#[wasm_bindgen]
pub struct JsCropConfig {
    inner: CropConfig,
}

#[wasm_bindgen]
impl JsCropConfig {
    /// Create a configuration with default values
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            inner: CropConfig::default(),
        }
    }

    /// Lossy output quality in `[0, 1]`
    #[wasm_bindgen(getter)]
    pub fn quality(&self) -> f32 {
        self.inner.quality
    }

    /// Background color as `#rrggbb`
    #[wasm_bindgen(getter)]
    pub fn fill_color(&self) -> String {
        self.inner.fill_color.into()
    }

    #[wasm_bindgen(getter)]
    pub fn rotation_enabled(&self) -> bool {
        self.inner.rotation_enabled
    }

    /// Accept filter for the file input
    #[wasm_bindgen(getter)]
    pub fn accept(&self) -> String {
        self.inner.accept.clone()
    }

    /// Serialize to a plain object
    pub fn to_json(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner).map_err(to_js_error)
    }

    /// Deserialize from a plain object; missing fields take their defaults.
    /// Fails when a value is out of range.
    pub fn from_json(value: JsValue) -> Result<JsCropConfig, JsValue> {
        let inner: CropConfig = serde_wasm_bindgen::from_value(value).map_err(to_js_error)?;
        inner.validate().map_err(to_js_error)?;
        Ok(Self { inner })
    }
}

impl Default for JsCropConfig {
    fn default() -> Self {
        Self::new()
    }
}
