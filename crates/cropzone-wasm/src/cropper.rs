//! Crop session bindings.
//!
//! `JsCropper` runs a crop session over an in-memory copy of the image. The
//! host keeps drawing the canvas itself: it forwards pointer and keyboard
//! events as method calls, reads the rectangle back with `get_rect()`, and
//! receives live updates through the `updateUI` callback passed to `start()`.
//!
//! # Example (TypeScript)
//!
//! ```typescript
//! const cropper = new JsCropper('photo.jpg', width, height, rgbPixels, { dragThreshold: 10 });
//! cropper.start((rect) => {
//!   widthInput.value = rect.width;
//!   heightInput.value = rect.height;
//! });
//!
//! canvas.addEventListener('pointerdown', (e) => cropper.pointer_down(e.offsetX, e.offsetY));
//! canvas.addEventListener('pointermove', (e) => cropper.pointer_move(e.offsetX, e.offsetY));
//! canvas.addEventListener('pointerup', (e) => cropper.pointer_up(e.offsetX, e.offsetY));
//! document.addEventListener('keydown', (e) => cropper.key_down(e.key));
//! document.addEventListener('keyup', (e) => cropper.key_up(e.key));
//!
//! widthInput.addEventListener('input', (e) => cropper.input_width(Number(e.target.value), false));
//! widthInput.addEventListener('change', (e) => cropper.input_width(Number(e.target.value), true));
//!
//! const cropped = cropper.get_cropped_image_data(cropper.get_rect());
//! cropper.end();
//! ```

use crate::types::{rect_to_js, to_js, warn, JsCroppedImage};
use cropzone_core::{
    Axis, Corner, CropCallbacks, Cropper, CropperOptions, InputEvent, Key, Limits,
    MemorySurface, Point, PositionInfo, PresetRatio, Rectangle, RenderSurface,
};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

/// Options as JavaScript passes them (camelCase, every field optional).
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct OptionsJs {
    drag_threshold: Option<f64>,
    default_width: Option<f64>,
    default_height: Option<f64>,
    fallback_scale: Option<f64>,
}

impl OptionsJs {
    fn into_options(self) -> CropperOptions {
        let mut options = CropperOptions::default();
        if let Some(threshold) = self.drag_threshold {
            options.drag_threshold = threshold;
        }
        if let (Some(width), Some(height)) = (self.default_width, self.default_height) {
            options = options.with_default_size(width, height);
        }
        if let Some(scale) = self.fallback_scale {
            options.fallback_scale = scale;
        }
        options
    }
}

/// A crop session over an image, driven from JavaScript.
#[wasm_bindgen]
pub struct JsCropper {
    inner: Cropper<MemorySurface>,
}

#[wasm_bindgen]
impl JsCropper {
    /// Create a cropper for an RGB image. The canvas starts at the image size.
    ///
    /// # Arguments
    /// * `name` - Image name, reported back with cropped data
    /// * `width`, `height` - Image dimensions in pixels
    /// * `pixels` - RGB pixel data (3 bytes per pixel, row-major order)
    /// * `options` - Optional `{dragThreshold, defaultWidth, defaultHeight, fallbackScale}`
    ///
    /// # Errors
    /// Returns error if the pixel buffer doesn't match the dimensions or an
    /// option value is out of range. An options object that can't be read at
    /// all is reported to the console and replaced with defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(
        name: String,
        width: u32,
        height: u32,
        pixels: Vec<u8>,
        options: JsValue,
    ) -> Result<JsCropper, JsValue> {
        let surface = MemorySurface::from_raw(name, width, height, pixels)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Self::with_options(surface, parse_options(options))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Resize the canvas the crop zone is constrained to.
    pub fn set_canvas_size(&mut self, width: f64, height: f64) {
        self.inner.surface_mut().set_canvas_size(width, height);
    }

    /// Set how event coordinates map to canvas space:
    /// `canvas = (event - offset) / scale`.
    pub fn set_pointer_mapping(&mut self, scale: f64, offset_x: f64, offset_y: f64) {
        self.inner
            .surface_mut()
            .set_pointer_mapping(scale, Point::new(offset_x, offset_y));
    }

    /// Start a crop session. `update_ui` receives every rectangle change.
    pub fn start(&mut self, update_ui: Option<js_sys::Function>) {
        let callbacks = match update_ui {
            Some(update_ui) => CropCallbacks::new().on_rect_updated(move |rect| {
                match serde_wasm_bindgen::to_value(rect) {
                    Ok(value) => {
                        if let Err(e) = update_ui.call1(&JsValue::NULL, &value) {
                            web_sys::console::warn_2(&JsValue::from_str("updateUI threw:"), &e);
                        }
                    }
                    Err(e) => warn(&format!("Could not serialize crop rectangle: {}", e)),
                }
            }),
            None => CropCallbacks::new(),
        };
        self.inner.start(callbacks);
    }

    /// End the crop session and release its listeners.
    pub fn end(&mut self) {
        self.inner.end();
    }

    #[wasm_bindgen(getter)]
    pub fn active(&self) -> bool {
        self.inner.is_active()
    }

    #[wasm_bindgen(getter)]
    pub fn dragging(&self) -> bool {
        self.inner.is_dragging()
    }

    pub fn set_visibility(&mut self, visible: bool) {
        self.inner.set_visibility(visible);
    }

    /// The committed rectangle, or `null` when there is no usable crop region.
    pub fn get_rect(&self) -> Result<JsValue, JsValue> {
        rect_to_js(self.inner.rect())
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) -> bool {
        self.inner.handle_event(InputEvent::PointerDown { x, y })
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) -> bool {
        self.inner.handle_event(InputEvent::PointerMove { x, y })
    }

    pub fn pointer_up(&mut self, x: f64, y: f64) -> bool {
        self.inner.handle_event(InputEvent::PointerUp { x, y })
    }

    /// Forward a `KeyboardEvent.key` value from a keydown.
    pub fn key_down(&mut self, key: &str) -> bool {
        self.inner.handle_event(InputEvent::KeyDown {
            key: key_from_name(key),
        })
    }

    /// Forward a `KeyboardEvent.key` value from a keyup.
    pub fn key_up(&mut self, key: &str) -> bool {
        self.inner.handle_event(InputEvent::KeyUp {
            key: key_from_name(key),
        })
    }

    /// Apply a width/height ratio, or the default rectangle when omitted.
    pub fn apply_preset(&mut self, ratio: Option<f64>) {
        self.inner.apply_preset(ratio);
    }

    /// Apply a named preset ("square", "3:2", "4:3", "5:4", "7:5", "16:9").
    pub fn apply_preset_named(&mut self, name: &str) -> Result<(), JsValue> {
        let preset = PresetRatio::from_name(name)
            .ok_or_else(|| JsValue::from_str(&format!("Unknown preset: {}", name)))?;
        self.inner.apply_preset_named(preset);
        Ok(())
    }

    /// Apply a partial `{left?, top?, width?, height?}` object.
    pub fn apply_position(&mut self, position: JsValue) -> Result<(), JsValue> {
        let info: PositionInfo = serde_wasm_bindgen::from_value(position)
            .map_err(|e| JsValue::from_str(&format!("Invalid position: {}", e)))?;
        self.inner.apply_position(&info);
        Ok(())
    }

    /// Apply typed width and/or height, clamped to the canvas.
    pub fn apply_dimensions(&mut self, width: Option<f64>, height: Option<f64>) {
        let limits = Limits::for_bounds(self.inner.surface().bounds());
        self.inner.apply_dimensions(width, height, &limits);
    }

    /// Feed a typed width into the session's width field and resize the zone.
    ///
    /// Returns the `{value, isFinal}` change, with `value` clamped to the
    /// canvas, or `null` without a session.
    pub fn input_width(&mut self, raw: f64, is_final: bool) -> Result<JsValue, JsValue> {
        self.input_dimension(Axis::Width, raw, is_final)
    }

    /// Feed a typed height into the session's height field and resize the zone.
    pub fn input_height(&mut self, raw: f64, is_final: bool) -> Result<JsValue, JsValue> {
        self.input_dimension(Axis::Height, raw, is_final)
    }

    /// The `{min, max, value}` model of the "width" or "height" field, or
    /// `null` without a session. The value follows every zone change.
    pub fn dimension_input(&self, axis: &str) -> Result<JsValue, JsValue> {
        let axis = axis_from_name(axis)
            .ok_or_else(|| JsValue::from_str(&format!("Unknown axis: {}", axis)))?;
        match self.inner.dimension_input(axis) {
            Some(input) => to_js(input),
            None => Ok(JsValue::NULL),
        }
    }

    /// Forward a native move of the zone.
    pub fn move_zone(&mut self, left: f64, top: f64) {
        self.inner.move_zone(left, top);
    }

    /// Forward a native corner resize ("top-left", "top-right",
    /// "bottom-left", "bottom-right"). `x`, `y` are in canvas space.
    pub fn resize_zone(&mut self, corner: &str, x: f64, y: f64) -> Result<(), JsValue> {
        let corner = corner_from_name(corner)
            .ok_or_else(|| JsValue::from_str(&format!("Unknown corner: {}", corner)))?;
        self.inner.resize_zone(corner, Point::new(x, y));
        Ok(())
    }

    /// Extract the pixels under `rect` as a `JsCroppedImage`. Returns `null`
    /// for a missing rect.
    pub fn get_cropped_image_data(&mut self, rect: JsValue) -> Result<JsValue, JsValue> {
        let rect: Option<Rectangle> = if rect.is_null() || rect.is_undefined() {
            None
        } else {
            Some(
                serde_wasm_bindgen::from_value(rect)
                    .map_err(|e| JsValue::from_str(&format!("Invalid rectangle: {}", e)))?,
            )
        };
        Ok(self
            .cropped(rect.as_ref())?
            .map_or(JsValue::NULL, JsValue::from))
    }

    /// Explicitly free WASM memory, ending any active session first.
    pub fn free(self) {
        // Dropping self ends the session and releases the memory
    }
}

impl JsCropper {
    pub(crate) fn with_options(
        surface: MemorySurface,
        options: CropperOptions,
    ) -> Result<Self, cropzone_core::CropError> {
        Ok(Self {
            inner: Cropper::new(surface, options)?,
        })
    }

    fn input_dimension(
        &mut self,
        axis: Axis,
        raw: f64,
        is_final: bool,
    ) -> Result<JsValue, JsValue> {
        match self.inner.input_dimension(axis, raw, is_final) {
            Some(change) => to_js(&change),
            None => Ok(JsValue::NULL),
        }
    }

    fn cropped(&mut self, rect: Option<&Rectangle>) -> Result<Option<JsCroppedImage>, JsValue> {
        let data = self
            .inner
            .cropped_image_data(rect)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(data.map(JsCroppedImage::from_cropped))
    }
}

fn parse_options(value: JsValue) -> CropperOptions {
    if value.is_undefined() || value.is_null() {
        return CropperOptions::default();
    }
    match serde_wasm_bindgen::from_value::<OptionsJs>(value) {
        Ok(options) => options.into_options(),
        Err(e) => {
            warn(&format!("Invalid cropper options, using defaults: {}", e));
            CropperOptions::default()
        }
    }
}

fn key_from_name(key: &str) -> Key {
    if key == "Shift" {
        Key::Shift
    } else {
        Key::Other
    }
}

fn axis_from_name(name: &str) -> Option<Axis> {
    match name {
        "width" => Some(Axis::Width),
        "height" => Some(Axis::Height),
        _ => None,
    }
}

fn corner_from_name(name: &str) -> Option<Corner> {
    match name {
        "top-left" | "tl" => Some(Corner::TopLeft),
        "top-right" | "tr" => Some(Corner::TopRight),
        "bottom-left" | "bl" => Some(Corner::BottomLeft),
        "bottom-right" | "br" => Some(Corner::BottomRight),
        _ => None,
    }
}
