//! Rectangles from explicit position/size values.

use super::{finite_or, Rectangle};
use crate::Bounds;
use serde::{Deserialize, Serialize};

/// A partial rectangle supplied by a caller (typed values, restored state).
///
/// Missing fields default to `left = 0`, `top = 0`, `width = max_width`,
/// `height = max_height`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PositionInfo {
    #[serde(default)]
    pub left: Option<f64>,
    #[serde(default)]
    pub top: Option<f64>,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
}

impl PositionInfo {
    /// Position info with every field set.
    pub fn full(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left: Some(left),
            top: Some(top),
            width: Some(width),
            height: Some(height),
        }
    }
}

impl From<Rectangle> for PositionInfo {
    fn from(rect: Rectangle) -> Self {
        Self::full(rect.left, rect.top, rect.width, rect.height)
    }
}

/// Clamp a partial rectangle into the canvas.
///
/// # Behavior
///
/// - `left` and `top` are clamped into `[0, max]`
/// - `width` is limited to `max_width - left`, `height` to `max_height - top`
/// - Negative or non-finite sizes become zero
///
/// The returned rectangle is tagged with `preset_ratio = width / height`, so a
/// later corner resize keeps the typed proportions. A zero height leaves the
/// rectangle untagged.
pub fn rect_from_position(info: &PositionInfo, bounds: Bounds) -> Rectangle {
    let left = finite_or(info.left.unwrap_or(0.0), 0.0).clamp(0.0, bounds.max_width);
    let top = finite_or(info.top.unwrap_or(0.0), 0.0).clamp(0.0, bounds.max_height);

    let width = finite_or(info.width.unwrap_or(bounds.max_width), 0.0)
        .clamp(0.0, bounds.max_width - left);
    let height = finite_or(info.height.unwrap_or(bounds.max_height), 0.0)
        .clamp(0.0, bounds.max_height - top);

    let ratio = if height > 0.0 {
        Some(width / height)
    } else {
        None
    };

    Rectangle::new(left, top, width, height).with_preset_ratio(ratio)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: Any position input is clamped into the canvas.
        #[test]
        fn prop_position_contained(
            (w, h) in (0.0f64..=4000.0, 0.0f64..=4000.0),
            (left, top) in (-1000.0f64..=5000.0, -1000.0f64..=5000.0),
            (width, height) in (-1000.0f64..=5000.0, -1000.0f64..=5000.0),
        ) {
            let bounds = Bounds::new(w, h);
            let rect = rect_from_position(&PositionInfo::full(left, top, width, height), bounds);
            prop_assert!(rect.fits_within(&bounds, 1e-9));
        }
    }
}
