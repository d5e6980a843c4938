//! Keeping external widgets in step with the crop zone.
//!
//! Two directions:
//!
//! - **Outbound**: every geometry change the engine makes (drag, preset,
//!   position, handle edits) is pushed to the `on_rect_updated` callback the
//!   host supplied when the session started, so numeric fields can mirror the
//!   live size without polling.
//! - **Inbound**: typed width/height values go through [`DimensionInput`] and
//!   [`Limits`], which clamp out-of-range values instead of rejecting them.
//!
//! The session owns one [`DimensionInput`] per [`Axis`]. Outbound updates
//! mirror the new size into them, so a field never lags behind a drag.

use crate::geometry::Rectangle;
use crate::Bounds;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Callback invoked with the zone's new rectangle.
pub type RectCallback = Box<dyn FnMut(&Rectangle)>;

/// Callbacks supplied when a crop session starts.
#[derive(Default)]
pub struct CropCallbacks {
    /// Called after every internally produced geometry change.
    pub on_rect_updated: Option<RectCallback>,
}

impl CropCallbacks {
    /// Create an empty callback table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the rectangle-updated callback.
    pub fn on_rect_updated(mut self, callback: impl FnMut(&Rectangle) + 'static) -> Self {
        self.on_rect_updated = Some(Box::new(callback));
        self
    }
}

impl fmt::Debug for CropCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CropCallbacks")
            .field("on_rect_updated", &self.on_rect_updated.is_some())
            .finish()
    }
}

/// Which typed dimension a numeric field edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Width,
    Height,
}

/// Dispatches geometry changes to the session's callbacks and keeps the
/// session's numeric fields on the live size.
#[derive(Debug)]
pub(crate) struct SyncBridge {
    callbacks: CropCallbacks,
    width: DimensionInput,
    height: DimensionInput,
}

impl SyncBridge {
    /// Create a bridge whose fields span `bounds` and show `rect`.
    pub(crate) fn new(callbacks: CropCallbacks, bounds: Bounds, rect: &Rectangle) -> Self {
        let limits = Limits::for_bounds(bounds);
        Self {
            callbacks,
            width: DimensionInput::new(limits.min_width, limits.max_width, rect.width),
            height: DimensionInput::new(limits.min_height, limits.max_height, rect.height),
        }
    }

    pub(crate) fn input(&self, axis: Axis) -> &DimensionInput {
        match axis {
            Axis::Width => &self.width,
            Axis::Height => &self.height,
        }
    }

    pub(crate) fn input_mut(&mut self, axis: Axis) -> &mut DimensionInput {
        match axis {
            Axis::Width => &mut self.width,
            Axis::Height => &mut self.height,
        }
    }

    /// Re-range both fields to the canvas. The canvas can change size under a
    /// live session.
    pub(crate) fn set_limits(&mut self, limits: &Limits) {
        self.width = DimensionInput::new(limits.min_width, limits.max_width, self.width.value());
        self.height =
            DimensionInput::new(limits.min_height, limits.max_height, self.height.value());
    }

    pub(crate) fn notify(&mut self, rect: &Rectangle) {
        self.width.mirror(rect.width);
        self.height.mirror(rect.height);
        if let Some(callback) = self.callbacks.on_rect_updated.as_mut() {
            callback(rect);
        }
    }
}

/// Size limits for typed crop dimensions.
///
/// Only the numeric-entry path uses these; pointer drags are limited by the
/// canvas alone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Limits {
    pub min_width: f64,
    pub min_height: f64,
    pub max_width: f64,
    pub max_height: f64,
}

impl Limits {
    /// Limits from one pixel up to the full canvas.
    pub fn for_bounds(bounds: Bounds) -> Self {
        Self {
            min_width: 1.0_f64.min(bounds.max_width),
            min_height: 1.0_f64.min(bounds.max_height),
            max_width: bounds.max_width,
            max_height: bounds.max_height,
        }
    }

    pub fn clamp_width(&self, width: f64) -> f64 {
        clamp_range(width, self.min_width, self.max_width)
    }

    pub fn clamp_height(&self, height: f64) -> f64 {
        clamp_range(height, self.min_height, self.max_height)
    }
}

/// Clamp without panicking on inverted or NaN limits.
fn clamp_range(value: f64, min: f64, max: f64) -> f64 {
    let value = if value.is_nan() { min } else { value };
    value.max(min).min(max)
}

/// Change reported by a numeric field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionChange {
    /// Clamped value.
    pub value: f64,
    /// `false` while the user is still typing or dragging a slider.
    pub is_final: bool,
}

/// Model of a numeric width/height field.
///
/// The value always stays within `[min, max]`; setters and typed input clamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DimensionInput {
    min: f64,
    max: f64,
    value: f64,
}

impl DimensionInput {
    /// Create a field; an inverted range collapses to `max`.
    pub fn new(min: f64, max: f64, value: f64) -> Self {
        let min = if min.is_finite() { min } else { 0.0 };
        let max = if max.is_finite() { max.max(min) } else { min };
        Self {
            min,
            max,
            value: clamp_range(value, min, max),
        }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Set the minimum, re-clamping the current value.
    pub fn set_min(&mut self, min: f64) {
        if min.is_finite() {
            self.min = min.min(self.max);
            self.value = clamp_range(self.value, self.min, self.max);
        }
    }

    /// Set the maximum, re-clamping the current value.
    pub fn set_max(&mut self, max: f64) {
        if max.is_finite() {
            self.max = max.max(self.min);
            self.value = clamp_range(self.value, self.min, self.max);
        }
    }

    /// Set the value programmatically, clamped.
    pub fn set_value(&mut self, value: f64) {
        self.value = clamp_range(value, self.min, self.max);
    }

    /// Handle a user-typed value. Non-numeric input keeps the current value.
    pub fn input(&mut self, raw: f64, is_final: bool) -> DimensionChange {
        if raw.is_finite() {
            self.value = clamp_range(raw, self.min, self.max);
        }
        DimensionChange {
            value: self.value,
            is_final,
        }
    }

    /// Follow a live value from the engine without producing a change.
    pub fn mirror(&mut self, value: f64) {
        self.set_value(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn canvas() -> Bounds {
        Bounds::new(800.0, 600.0)
    }

    fn start_rect() -> Rectangle {
        Rectangle::new(100.0, 75.0, 600.0, 450.0)
    }

    #[test]
    fn test_bridge_without_callback_is_silent() {
        let mut bridge = SyncBridge::new(CropCallbacks::new(), canvas(), &start_rect());
        bridge.notify(&Rectangle::new(0.0, 0.0, 1.0, 1.0));
    }

    #[test]
    fn test_bridge_fields_start_on_rect() {
        let bridge = SyncBridge::new(CropCallbacks::new(), canvas(), &start_rect());
        let width = bridge.input(Axis::Width);
        assert_eq!((width.min(), width.max(), width.value()), (1.0, 800.0, 600.0));
        let height = bridge.input(Axis::Height);
        assert_eq!((height.min(), height.max(), height.value()), (1.0, 600.0, 450.0));
    }

    #[test]
    fn test_bridge_notify_mirrors_fields() {
        let mut bridge = SyncBridge::new(CropCallbacks::new(), canvas(), &start_rect());
        bridge.notify(&Rectangle::new(10.0, 20.0, 123.5, 45.25));
        assert_eq!(bridge.input(Axis::Width).value(), 123.5);
        assert_eq!(bridge.input(Axis::Height).value(), 45.25);
    }

    #[test]
    fn test_bridge_set_limits_reclamps() {
        let mut bridge = SyncBridge::new(CropCallbacks::new(), canvas(), &start_rect());
        bridge.set_limits(&Limits::for_bounds(Bounds::new(400.0, 300.0)));
        assert_eq!(bridge.input(Axis::Width).max(), 400.0);
        assert_eq!(bridge.input(Axis::Width).value(), 400.0);
        assert_eq!(bridge.input(Axis::Height).value(), 300.0);
    }


    #[test]
    fn test_bridge_forwards_rectangles() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut bridge = SyncBridge::new(
            CropCallbacks::new().on_rect_updated(move |rect| sink.borrow_mut().push(*rect)),
            canvas(),
            &start_rect(),
        );

        bridge.notify(&Rectangle::new(1.0, 2.0, 3.0, 4.0));
        bridge.notify(&Rectangle::new(5.0, 6.0, 7.0, 8.0));

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1], Rectangle::new(5.0, 6.0, 7.0, 8.0));
    }

    #[test]
    fn test_callbacks_debug_hides_closure() {
        let callbacks = CropCallbacks::new().on_rect_updated(|_| {});
        assert_eq!(
            format!("{:?}", callbacks),
            "CropCallbacks { on_rect_updated: true }"
        );
    }

    #[test]
    fn test_limits_for_bounds() {
        let limits = Limits::for_bounds(Bounds::new(800.0, 600.0));
        assert_eq!(limits.clamp_width(0.0), 1.0);
        assert_eq!(limits.clamp_width(1000.0), 800.0);
        assert_eq!(limits.clamp_height(300.0), 300.0);
        assert_eq!(limits.clamp_height(f64::NAN), 1.0);
    }

    #[test]
    fn test_limits_on_empty_canvas() {
        let limits = Limits::for_bounds(Bounds::new(0.0, 0.0));
        assert_eq!(limits.clamp_width(50.0), 0.0);
    }

    #[test]
    fn test_dimension_input_clamps_typed_values() {
        let mut input = DimensionInput::new(10.0, 500.0, 100.0);

        let change = input.input(900.0, false);
        assert_eq!(change.value, 500.0);
        assert!(!change.is_final);

        let change = input.input(-3.0, true);
        assert_eq!(change.value, 10.0);
        assert!(change.is_final);
        assert_eq!(input.value(), 10.0);
    }

    #[test]
    fn test_dimension_input_ignores_nan() {
        let mut input = DimensionInput::new(0.0, 100.0, 42.0);
        let change = input.input(f64::NAN, true);
        assert_eq!(change.value, 42.0);
    }

    #[test]
    fn test_dimension_input_range_setters_reclamp() {
        let mut input = DimensionInput::new(0.0, 1000.0, 800.0);
        input.set_max(600.0);
        assert_eq!(input.value(), 600.0);

        input.set_min(700.0);
        // min cannot exceed max
        assert_eq!(input.min(), 600.0);
        assert_eq!(input.value(), 600.0);
    }

    #[test]
    fn test_dimension_input_inverted_range() {
        let input = DimensionInput::new(50.0, 10.0, 30.0);
        assert_eq!(input.min(), 50.0);
        assert_eq!(input.max(), 50.0);
        assert_eq!(input.value(), 50.0);
    }

    #[test]
    fn test_dimension_input_mirror() {
        let mut input = DimensionInput::new(1.0, 800.0, 100.0);
        input.mirror(250.5);
        assert_eq!(input.value(), 250.5);
        input.mirror(2000.0);
        assert_eq!(input.value(), 800.0);
    }
}
