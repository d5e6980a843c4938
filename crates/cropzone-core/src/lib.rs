//! Cropzone Core - crop region interaction engine
//!
//! This crate owns the geometry of an interactive crop rectangle drawn over a
//! rendered image: it turns pointer gestures, preset ratios and typed
//! dimensions into a rectangle that always fits the canvas, and keeps a
//! rendering surface's overlay in step with that rectangle.
//!
//! # Module Structure
//!
//! - `geometry` - Pure rectangle computations (drag, preset ratio, position, default)
//! - `zone` - The crop-zone overlay model
//! - `interaction` - Pointer/keyboard gesture state machine
//! - `session` - The `Cropper` session controller (start/end, public queries)
//! - `sync` - Change notifications and numeric-entry support
//! - `surface` - The rendering surface contract and an in-memory implementation
//! - `config` - Session options
//!
//! # Coordinate System
//!
//! All values are in canvas space: origin at the top-left corner, units equal
//! to the rendered image's pixels.

pub mod config;
pub mod geometry;
pub mod interaction;
pub mod session;
pub mod surface;
pub mod sync;
pub mod zone;

pub use config::{CropperOptions, OptionsError};
pub use geometry::{
    default_rect, rect_from_drag, rect_from_position, rect_from_preset_ratio, PositionInfo,
    PresetRatio, Rectangle,
};
pub use interaction::{InputEvent, InteractionState, Key};
pub use session::{CropError, CroppedImageData, Cropper};
pub use surface::{Cursor, ListenerKind, MemorySurface, RenderSurface, SurfaceError};
pub use sync::{Axis, CropCallbacks, DimensionChange, DimensionInput, Limits};
pub use zone::{Corner, CropZone};

/// A point in canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Manhattan distance to another point.
    pub fn manhattan_distance(&self, other: &Point) -> f64 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

/// A width/height pair, used for preferred default sizes.
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Canvas bounds at the moment a computation runs.
///
/// Bounds are read from the surface for every operation and never cached,
/// since the canvas can be resized between operations.
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct Bounds {
    pub max_width: f64,
    pub max_height: f64,
}

impl Bounds {
    /// Create bounds, treating negative or NaN dimensions as zero.
    pub fn new(max_width: f64, max_height: f64) -> Self {
        Self {
            max_width: sanitize_extent(max_width),
            max_height: sanitize_extent(max_height),
        }
    }

    /// Clamp a point into the canvas.
    pub fn clamp_point(&self, point: Point) -> Point {
        Point::new(
            point.x.clamp(0.0, self.max_width),
            point.y.clamp(0.0, self.max_height),
        )
    }

    /// Check whether the canvas has zero area.
    pub fn is_empty(&self) -> bool {
        self.max_width <= 0.0 || self.max_height <= 0.0
    }
}

fn sanitize_extent(value: f64) -> f64 {
    if !value.is_finite() || value < 0.0 {
        0.0
    } else {
        value
    }
}
