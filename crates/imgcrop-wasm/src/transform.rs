//! WASM bindings for the raster extractor.
//!
//! The crop editor in the page reports geometry as a plain object:
//!
//! ```typescript
//! const crop = extract_crop(image, {
//!   rect: { x: 10, y: 0, width: 200, height: 200 },
//!   rotation: 15,
//!   zoom: 1.2,
//!   aspect: 1,
//! }, '#ffffff');
//! ```

use crate::types::{to_js_error, JsDecodedImage};
use imgcrop_core::geometry::CropGeometry;
use imgcrop_core::transform;
use imgcrop_core::FillColor;
use wasm_bindgen::prelude::*;

/// Extract the crop described by `geometry` from `image`.
///
/// With a non-zero rotation the rectangle addresses the rotation-expanded
/// working surface (see [`working_surface_bounds`]). Pixels outside the
/// source are filled with `fill_color`, a CSS name or hex string.
///
/// # Errors
///
/// Returns an error if `geometry` does not deserialize, has an empty
/// rectangle or non-finite values, or if `fill_color` does not parse.
#[wasm_bindgen]
pub fn extract_crop(
    image: &JsDecodedImage,
    geometry: JsValue,
    fill_color: &str,
) -> Result<JsDecodedImage, JsValue> {
    let geometry: CropGeometry = serde_wasm_bindgen::from_value(geometry)
        .map_err(|e| JsValue::from_str(&format!("Invalid crop geometry: {e}")))?;
    let fill = FillColor::parse(fill_color).map_err(to_js_error)?;
    extract_with(image, &geometry, fill).map_err(to_js_error)
}

fn extract_with(
    image: &JsDecodedImage,
    geometry: &CropGeometry,
    fill: FillColor,
) -> Result<JsDecodedImage, imgcrop_core::geometry::GeometryError> {
    geometry.validate()?;
    let src = image.to_decoded();
    let result = transform::extract(&src, &geometry.rect, geometry.rotation, fill);
    Ok(JsDecodedImage::from_decoded(result))
}

/// Size of the working surface for a rotated image, as `[width, height]`.
///
/// The editor uses this to map its overlay onto the coordinates that
/// [`extract_crop`] expects.
#[wasm_bindgen]
pub fn working_surface_bounds(width: u32, height: u32, angle_degrees: f64) -> Vec<u32> {
    let (w, h) = transform::working_surface_bounds(width, height, angle_degrees);
    vec![w, h]
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use imgcrop_core::decode::DecodedImage;
    use serde::Serialize;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[derive(Serialize)]
    struct TestRect {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    }

    #[derive(Serialize)]
    struct TestGeometry {
        rect: TestRect,
        rotation: f64,
        zoom: f64,
        aspect: f64,
    }

    #[wasm_bindgen_test]
    fn test_extract_crop_from_js_object() {
        let img = JsDecodedImage::from_decoded(DecodedImage::filled(20, 20, [9, 9, 9]));
        let geometry = TestGeometry {
            rect: TestRect {
                x: 5,
                y: 5,
                width: 10,
                height: 6,
            },
            rotation: 0.0,
            zoom: 1.0,
            aspect: 1.0,
        };
        let value = serde_wasm_bindgen::to_value(&geometry).unwrap();
        let result = extract_crop(&img, value, "white").unwrap();
        assert_eq!(result.width(), 10);
        assert_eq!(result.height(), 6);
    }

    #[wasm_bindgen_test]
    fn test_extract_crop_rejects_bad_color() {
        let img = JsDecodedImage::from_decoded(DecodedImage::filled(4, 4, [0, 0, 0]));
        let value = serde_wasm_bindgen::to_value(&TestGeometry {
            rect: TestRect {
                x: 0,
                y: 0,
                width: 2,
                height: 2,
            },
            rotation: 0.0,
            zoom: 1.0,
            aspect: 1.0,
        })
        .unwrap();
        assert!(extract_crop(&img, value, "chartreuse-ish").is_err());
    }
}
