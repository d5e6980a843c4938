//! Preset-ratio and default rectangles.
//!
//! Both kinds are centered in the canvas. Preset rectangles are the largest
//! rectangle of the requested width/height ratio that fits; default rectangles
//! use a preferred size when it fits and a fixed fraction of the canvas
//! otherwise.

use super::{centered, finite_or, Rectangle};
use crate::{Bounds, Size};
use serde::{Deserialize, Serialize};

/// Fraction of each canvas dimension used when the preferred size does not fit.
pub const DEFAULT_FALLBACK_SCALE: f64 = 0.75;

/// Common crop ratios offered as one-click presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PresetRatio {
    /// 1:1
    #[serde(rename = "square")]
    Square,
    /// 3:2
    #[serde(rename = "3:2")]
    ThreeTwo,
    /// 4:3
    #[serde(rename = "4:3")]
    FourThree,
    /// 5:4
    #[serde(rename = "5:4")]
    FiveFour,
    /// 7:5
    #[serde(rename = "7:5")]
    SevenFive,
    /// 16:9
    #[serde(rename = "16:9")]
    SixteenNine,
}

impl PresetRatio {
    /// All presets, in menu order.
    pub const ALL: [PresetRatio; 6] = [
        PresetRatio::Square,
        PresetRatio::ThreeTwo,
        PresetRatio::FourThree,
        PresetRatio::FiveFour,
        PresetRatio::SevenFive,
        PresetRatio::SixteenNine,
    ];

    /// Width divided by height.
    pub fn ratio(self) -> f64 {
        match self {
            PresetRatio::Square => 1.0,
            PresetRatio::ThreeTwo => 3.0 / 2.0,
            PresetRatio::FourThree => 4.0 / 3.0,
            PresetRatio::FiveFour => 5.0 / 4.0,
            PresetRatio::SevenFive => 7.0 / 5.0,
            PresetRatio::SixteenNine => 16.0 / 9.0,
        }
    }

    /// Menu name, accepted back by [`PresetRatio::from_name`].
    pub fn name(self) -> &'static str {
        match self {
            PresetRatio::Square => "square",
            PresetRatio::ThreeTwo => "3:2",
            PresetRatio::FourThree => "4:3",
            PresetRatio::FiveFour => "5:4",
            PresetRatio::SevenFive => "7:5",
            PresetRatio::SixteenNine => "16:9",
        }
    }

    /// Look up a preset by its menu name (`"square"`, `"16:9"`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "square" | "1:1" => Some(PresetRatio::Square),
            "3:2" => Some(PresetRatio::ThreeTwo),
            "4:3" => Some(PresetRatio::FourThree),
            "5:4" => Some(PresetRatio::FiveFour),
            "7:5" => Some(PresetRatio::SevenFive),
            "16:9" => Some(PresetRatio::SixteenNine),
            _ => None,
        }
    }
}

/// Compute the largest centered rectangle with the given width/height ratio.
///
/// # Arguments
///
/// * `ratio` - Width divided by height, must be positive and finite
/// * `bounds` - Canvas bounds at the time of the call
///
/// # Algorithm
///
/// The result touches the canvas on its limiting axis: when `max_width /
/// ratio` fits the height, the width is the full canvas width and the height
/// is derived from it; otherwise the height is the full canvas height and the
/// width is derived. Dividing before multiplying keeps extreme ratios from
/// overflowing, and the derived side is never rounded, so the ratio holds to
/// floating-point precision for ratios from `1e-300` to `f64::MAX`.
///
/// # Returns
///
/// A centered rectangle tagged with `preset_ratio = Some(ratio)`. Offsets are
/// rounded to a stable precision. Non-positive or non-finite ratios produce an
/// empty rectangle with no tag.
///
/// # Example
///
/// ```ignore
/// // Square on an 800x600 canvas
/// let rect = rect_from_preset_ratio(1.0, Bounds::new(800.0, 600.0));
/// assert_eq!((rect.left, rect.top, rect.width, rect.height), (100.0, 0.0, 600.0, 600.0));
/// ```
pub fn rect_from_preset_ratio(ratio: f64, bounds: Bounds) -> Rectangle {
    if !ratio.is_finite() || ratio <= 0.0 || bounds.is_empty() {
        tracing::debug!(ratio, "preset ratio ignored: degenerate ratio or empty canvas");
        return Rectangle::default();
    }

    let height_for_full_width = bounds.max_width / ratio;
    let (width, height) = if height_for_full_width <= bounds.max_height {
        (bounds.max_width, height_for_full_width)
    } else {
        (bounds.max_height * ratio, bounds.max_height)
    };

    centered(width, height, &bounds).with_preset_ratio(Some(ratio))
}

/// Compute the rectangle shown when a crop session starts.
///
/// # Arguments
///
/// * `bounds` - Canvas bounds at the time of the call
/// * `preferred` - Preferred crop size, if one is configured
/// * `fallback_scale` - Fraction of each canvas dimension to use when the
///   preferred size is absent or exceeds the canvas on either axis
///
/// # Returns
///
/// A centered rectangle with no preset ratio.
pub fn default_rect(bounds: Bounds, preferred: Option<Size>, fallback_scale: f64) -> Rectangle {
    let fallback_scale = finite_or(fallback_scale, DEFAULT_FALLBACK_SCALE).clamp(0.0, 1.0);

    let (width, height) = match preferred {
        Some(size)
            if size.width <= bounds.max_width
                && size.height <= bounds.max_height
                && size.width >= 0.0
                && size.height >= 0.0 =>
        {
            (size.width, size.height)
        }
        _ => (
            bounds.max_width * fallback_scale,
            bounds.max_height * fallback_scale,
        ),
    };

    centered(width, height, &bounds)
}


// ============================================================================
// Property-Based Tests
// ============================================================================
