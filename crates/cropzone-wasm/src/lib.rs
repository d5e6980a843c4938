//! Cropzone WASM - WebAssembly bindings for the crop-zone engine
//!
//! This crate exposes the cropzone-core geometry functions and crop session
//! controller to JavaScript/TypeScript applications.
//!
//! # Module Structure
//!
//! - `geometry` - Pure rectangle computations (drag, preset, position, default)
//! - `cropper` - `JsCropper`, a crop session driven by forwarded input events
//! - `types` - WASM-compatible wrapper types for cropped image data
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsCropper, rect_from_preset_ratio } from '@cropzone/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! // Largest centered 16:9 rectangle on an 800x600 canvas
//! const rect = rect_from_preset_ratio(16 / 9, 800, 600);
//! console.log(`${rect.width}x${rect.height} at (${rect.left}, ${rect.top})`);
//! ```

use wasm_bindgen::prelude::*;

mod cropper;
mod geometry;
mod types;

// Re-export public types
pub use cropper::JsCropper;
pub use geometry::{
    default_rect, preset_names, preset_ratio, rect_from_drag, rect_from_position,
    rect_from_preset_ratio,
};
pub use types::JsCroppedImage;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    // Future: Set up panic hook for better error messages in browser console
    // when console_error_panic_hook feature is added
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
