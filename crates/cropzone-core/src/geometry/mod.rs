//! Crop rectangle geometry.
//!
//! This module contains the pure computations behind every crop rectangle the
//! engine produces. Nothing here touches the rendering surface or the session
//! state: each function takes points, sizes and the current canvas bounds and
//! returns an immutable [`Rectangle`] value that the session applies to the
//! crop zone in a single step.
//!
//! ## Rectangle Sources
//!
//! - **Drag**: two points (anchor and pointer), optionally aspect-locked
//! - **Preset ratio**: the largest centered rectangle of a fixed ratio
//! - **Position**: a partial `{left, top, width, height}` clamped to the canvas
//! - **Default**: a preferred size, or a fraction of the canvas when it does not fit
//!
//! ## Invariant
//!
//! Every rectangle returned here satisfies `left >= 0`, `top >= 0`,
//! `left + width <= max_width` and `top + height <= max_height` for the bounds
//! it was computed against.

mod drag;
mod position;
mod preset;

pub use drag::rect_from_drag;
pub(crate) use drag::constrain_to_ratio;
pub use position::{rect_from_position, PositionInfo};
pub use preset::{default_rect, rect_from_preset_ratio, PresetRatio, DEFAULT_FALLBACK_SCALE};

use crate::Bounds;
use serde::{Deserialize, Serialize};

/// Number of decimal digits kept when normalizing computed positions.
pub const FLOATING_POINT_DIGITS: i32 = 2;

/// A crop rectangle in canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rectangle {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    /// Width/height ratio this rectangle was produced from, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset_ratio: Option<f64>,
}

impl Rectangle {
    /// Create a free-form rectangle (no preset ratio).
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
            preset_ratio: None,
        }
    }

    /// Tag this rectangle with the ratio it was produced from.
    pub fn with_preset_ratio(mut self, ratio: Option<f64>) -> Self {
        self.preset_ratio = ratio;
        self
    }

    /// Right edge (`left + width`).
    #[inline]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Bottom edge (`top + height`).
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// A rectangle is usable for cropping only when it has a positive area.
    pub fn is_valid(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Check whether the rectangle lies inside the bounds, allowing `epsilon`
    /// of floating-point slack on every edge.
    pub fn fits_within(&self, bounds: &Bounds, epsilon: f64) -> bool {
        self.left >= -epsilon
            && self.top >= -epsilon
            && self.width >= 0.0
            && self.height >= 0.0
            && self.right() <= bounds.max_width + epsilon
            && self.bottom() <= bounds.max_height + epsilon
    }

    /// Check whether a point lies inside the rectangle (edges inclusive).
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.right() && y >= self.top && y <= self.bottom()
    }
}

/// Round a value to [`FLOATING_POINT_DIGITS`] decimal places.
///
/// Centering and scaling produce values like `99.99999999999997`; rounding
/// them keeps repeated applications from drifting by sub-pixel amounts.
#[inline]
pub fn fix_floating_point(value: f64) -> f64 {
    let factor = 10f64.powi(FLOATING_POINT_DIGITS);
    (value * factor).round() / factor
}

/// Replace NaN or infinite input with a fallback.
#[inline]
pub(crate) fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

/// Center a `width` x `height` rectangle inside the bounds.
///
/// Only the offsets are normalized; the size is kept as given so that a
/// preset ratio survives. Offsets are clamped after rounding so the far edge
/// never passes the canvas.
pub(crate) fn centered(width: f64, height: f64, bounds: &Bounds) -> Rectangle {
    let width = finite_or(width, 0.0).clamp(0.0, bounds.max_width);
    let height = finite_or(height, 0.0).clamp(0.0, bounds.max_height);
    let left = fix_floating_point((bounds.max_width - width) / 2.0)
        .clamp(0.0, bounds.max_width - width);
    let top = fix_floating_point((bounds.max_height - height) / 2.0)
        .clamp(0.0, bounds.max_height - height);

    Rectangle::new(left, top, width, height)
}
