//! Crop session options.
//!
//! Options are plain data with serde defaults so a host can pass a partial
//! object (for example from JavaScript) and get sensible values for the rest.

use crate::geometry::DEFAULT_FALLBACK_SCALE;
use crate::Size;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Manhattan distance (canvas units) a drag must exceed before it draws.
pub const DEFAULT_DRAG_THRESHOLD: f64 = 10.0;

/// Errors for invalid session options.
#[derive(Debug, Error, PartialEq)]
pub enum OptionsError {
    /// Drag threshold is negative or not a number
    #[error("Invalid drag threshold: {0} (must be a finite value >= 0)")]
    InvalidDragThreshold(f64),

    /// Fallback scale is outside (0, 1]
    #[error("Invalid fallback scale: {0} (must be in (0, 1])")]
    InvalidFallbackScale(f64),

    /// Preferred default size has a negative or non-finite dimension
    #[error("Invalid default size: {width}x{height}")]
    InvalidDefaultSize { width: f64, height: f64 },
}

/// Options for a [`Cropper`](crate::Cropper) session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropperOptions {
    /// Distance a pointer must travel from the anchor before a drag updates
    /// the zone. Prevents a plain click from collapsing the zone.
    pub drag_threshold: f64,
    /// Preferred crop size when a session starts. `None` uses the fallback.
    pub default_size: Option<Size>,
    /// Fraction of each canvas dimension used when `default_size` is absent
    /// or larger than the canvas.
    pub fallback_scale: f64,
}

impl Default for CropperOptions {
    fn default() -> Self {
        Self {
            drag_threshold: DEFAULT_DRAG_THRESHOLD,
            default_size: None,
            fallback_scale: DEFAULT_FALLBACK_SCALE,
        }
    }
}

impl CropperOptions {
    /// Create options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the preferred default crop size.
    pub fn with_default_size(mut self, width: f64, height: f64) -> Self {
        self.default_size = Some(Size::new(width, height));
        self
    }

    /// Set the drag threshold.
    pub fn with_drag_threshold(mut self, threshold: f64) -> Self {
        self.drag_threshold = threshold;
        self
    }

    /// Check that every option is usable.
    pub fn validate(&self) -> Result<(), OptionsError> {
        if !self.drag_threshold.is_finite() || self.drag_threshold < 0.0 {
            return Err(OptionsError::InvalidDragThreshold(self.drag_threshold));
        }
        if !(self.fallback_scale > 0.0 && self.fallback_scale <= 1.0) {
            return Err(OptionsError::InvalidFallbackScale(self.fallback_scale));
        }
        if let Some(size) = self.default_size {
            let usable = |v: f64| v.is_finite() && v >= 0.0;
            if !usable(size.width) || !usable(size.height) {
                return Err(OptionsError::InvalidDefaultSize {
                    width: size.width,
                    height: size.height,
                });
            }
        }
        Ok(())
    }
}
