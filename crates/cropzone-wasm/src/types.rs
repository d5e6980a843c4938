//! WASM-compatible wrapper types.
//!
//! JavaScript-friendly types wrapping the core crop results, plus helpers for
//! moving serde values across the boundary.

use cropzone_core::{CroppedImageData, Rectangle};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Cropped pixels returned to JavaScript.
///
/// # Memory Management
///
/// The pixel data is stored in WASM memory. When you call `pixels()`, a copy is made
/// to JavaScript memory as a `Uint8Array`.
///
/// The `free()` method can be called to explicitly release WASM memory, but this is
/// optional as wasm-bindgen's finalizer will handle cleanup automatically.
#[wasm_bindgen]
pub struct JsCroppedImage {
    name: String,
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsCroppedImage {
    /// Name of the image the region was cut from
    #[wasm_bindgen(getter)]
    pub fn name(&self) -> String {
        self.name.clone()
    }

    /// Get the image width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the image height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the number of bytes in the pixel buffer (width * height * 3 for RGB)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Returns RGB pixel data as Uint8Array.
    ///
    /// Note: This creates a copy of the pixel data.
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }

    /// Explicitly free WASM memory.
    pub fn free(self) {
        // Dropping self releases the memory
    }
}

impl JsCroppedImage {
    pub(crate) fn from_cropped(data: CroppedImageData) -> Self {
        let (width, height) = data.image.dimensions();
        Self {
            name: data.name,
            width,
            height,
            pixels: data.image.into_raw(),
        }
    }
}

/// Serialize a value for JavaScript.
pub(crate) fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization failed: {}", e)))
}

/// Serialize an optional rectangle, using `null` for "no usable crop region".
pub(crate) fn rect_to_js(rect: Option<Rectangle>) -> Result<JsValue, JsValue> {
    match rect {
        Some(rect) => to_js(&rect),
        None => Ok(JsValue::NULL),
    }
}

/// Log a warning to the browser console.
pub(crate) fn warn(message: &str) {
    web_sys::console::warn_1(&JsValue::from_str(message));
}
