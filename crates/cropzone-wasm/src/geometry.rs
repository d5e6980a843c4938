//! WASM bindings for the crop geometry functions.
//!
//! These are the pure computations, usable without a session: a host that
//! draws its own overlay can call them directly and keep the rectangle itself.
//! Rectangles cross the boundary as plain `{left, top, width, height,
//! presetRatio?}` objects.

use crate::types::to_js;
use cropzone_core::geometry::{
    default_rect as core_default_rect, rect_from_drag as core_drag,
    rect_from_position as core_position, rect_from_preset_ratio as core_preset,
    DEFAULT_FALLBACK_SCALE,
};
use cropzone_core::{Bounds, Point, PositionInfo, PresetRatio, Size};
use wasm_bindgen::prelude::*;

/// Compute the rectangle for a drag from an anchor to the current pointer.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const rect = rect_from_drag(100, 100, 50, 50, 800, 600, false);
/// // { left: 50, top: 50, width: 50, height: 50 }
/// ```
#[wasm_bindgen]
pub fn rect_from_drag(
    anchor_x: f64,
    anchor_y: f64,
    x: f64,
    y: f64,
    max_width: f64,
    max_height: f64,
    aspect_locked: bool,
) -> Result<JsValue, JsValue> {
    let rect = core_drag(
        Point::new(anchor_x, anchor_y),
        Point::new(x, y),
        Bounds::new(max_width, max_height),
        aspect_locked,
    );
    to_js(&rect)
}

/// Compute the largest centered rectangle with `width / height == ratio`.
#[wasm_bindgen]
pub fn rect_from_preset_ratio(
    ratio: f64,
    max_width: f64,
    max_height: f64,
) -> Result<JsValue, JsValue> {
    to_js(&core_preset(ratio, Bounds::new(max_width, max_height)))
}

/// Clamp a partial `{left?, top?, width?, height?}` object into the canvas.
#[wasm_bindgen]
pub fn rect_from_position(
    position: JsValue,
    max_width: f64,
    max_height: f64,
) -> Result<JsValue, JsValue> {
    let info: PositionInfo = if position.is_undefined() || position.is_null() {
        PositionInfo::default()
    } else {
        serde_wasm_bindgen::from_value(position)
            .map_err(|e| JsValue::from_str(&format!("Invalid position: {}", e)))?
    };
    to_js(&core_position(&info, Bounds::new(max_width, max_height)))
}

/// Compute the rectangle a new session starts with.
///
/// Uses the preferred size when both dimensions are given and fit, otherwise
/// 75% of each canvas dimension.
#[wasm_bindgen]
pub fn default_rect(
    max_width: f64,
    max_height: f64,
    preferred_width: Option<f64>,
    preferred_height: Option<f64>,
) -> Result<JsValue, JsValue> {
    let rect = core_default_rect(
        Bounds::new(max_width, max_height),
        preferred_size(preferred_width, preferred_height),
        DEFAULT_FALLBACK_SCALE,
    );
    to_js(&rect)
}

/// Look up a named preset ("square", "3:2", "4:3", "5:4", "7:5", "16:9").
///
/// Returns `undefined` for unknown names.
#[wasm_bindgen]
pub fn preset_ratio(name: &str) -> Option<f64> {
    PresetRatio::from_name(name).map(PresetRatio::ratio)
}

/// Names of every built-in preset, in menu order.
#[wasm_bindgen]
pub fn preset_names() -> Vec<String> {
    PresetRatio::ALL
        .iter()
        .map(|preset| preset.name().to_string())
        .collect()
}

fn preferred_size(width: Option<f64>, height: Option<f64>) -> Option<Size> {
    match (width, height) {
        (Some(width), Some(height)) => Some(Size::new(width, height)),
        _ => None,
    }
}
