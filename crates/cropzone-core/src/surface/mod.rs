//! The rendering surface contract.
//!
//! The crop engine never draws anything itself. It drives a rendering surface
//! (a canvas library, a GPU view, a test double) through the [`RenderSurface`]
//! trait: reading the canvas size, mapping pointer coordinates, adding and
//! removing the crop overlay, toggling interactivity and listeners, and
//! extracting pixels for a committed crop.
//!
//! # Listener Pairing
//!
//! Every `add_listener` the engine performs is matched by exactly one
//! `remove_listener` for the same kind before the session ends. Surfaces can
//! rely on this to keep one handler slot per kind.
//!
//! [`MemorySurface`] is an in-memory implementation backed by an RGB image. It
//! records every call the engine makes, which is what the session tests
//! assert against, and it is the surface the WASM bindings use.

mod extract;
mod memory;

pub use extract::extract_region;
pub use memory::{MemorySurface, SurfaceObject};

use crate::geometry::Rectangle;
use crate::zone::CropZone;
use crate::{Bounds, Point};
use image::RgbImage;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors reported by a rendering surface.
#[derive(Debug, Error, PartialEq)]
pub enum SurfaceError {
    /// The requested region has no pixels after clamping to the image
    #[error("Crop region is empty: {width}x{height} at ({left}, {top})")]
    EmptyRegion {
        left: f64,
        top: f64,
        width: f64,
        height: f64,
    },

    /// The surface has no image to extract from
    #[error("Surface has no image loaded")]
    NoImage,

    /// Pixel buffer length doesn't match the stated dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },
}

/// Pointer affordance shown over the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cursor {
    #[default]
    Default,
    Crosshair,
}

/// Input listeners the engine installs on the surface.
///
/// Pointer listeners are scoped to the canvas; key listeners are
/// document-wide so the aspect lock follows shift regardless of focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ListenerKind {
    PointerDown,
    PointerMove,
    PointerUp,
    KeyDown,
    KeyUp,
}

impl ListenerKind {
    /// Listeners held for the whole session.
    pub const SESSION: [ListenerKind; 3] = [
        ListenerKind::PointerDown,
        ListenerKind::KeyDown,
        ListenerKind::KeyUp,
    ];

    /// Listeners held only while a drag is in progress.
    pub const GESTURE: [ListenerKind; 2] = [ListenerKind::PointerMove, ListenerKind::PointerUp];
}

/// Operations the crop engine needs from a rendering surface.
pub trait RenderSurface {
    /// Current canvas size. Read on every operation, never cached.
    fn bounds(&self) -> Bounds;

    /// Map a pointer position reported by the host into canvas space.
    fn pointer_to_canvas(&self, x: f64, y: f64) -> Point;

    /// Whether an interactive object (including the overlay) is under `point`.
    fn has_target_at(&self, point: Point) -> bool;

    /// Put the crop overlay on top of the canvas.
    fn add_overlay(&mut self, zone: &CropZone);

    /// Take the crop overlay off the canvas.
    fn remove_overlay(&mut self);

    /// Push the zone's current properties (geometry, visibility) to the overlay.
    fn update_overlay(&mut self, zone: &CropZone);

    /// Make the overlay the active, manipulable object.
    fn select_overlay(&mut self);

    /// Drop the active selection.
    fn clear_selection(&mut self);

    /// Enable or disable pointer interactivity on every non-overlay object.
    fn set_objects_interactive(&mut self, interactive: bool);

    /// Enable or disable rubber-band multi-selection.
    fn set_multi_select(&mut self, enabled: bool);

    fn set_cursor(&mut self, cursor: Cursor);

    fn add_listener(&mut self, kind: ListenerKind);

    fn remove_listener(&mut self, kind: ListenerKind);

    /// Extract the rendered pixels inside `rect`.
    fn extract_region(&mut self, rect: &Rectangle) -> Result<RgbImage, SurfaceError>;

    /// Name of the image being edited.
    fn image_name(&self) -> String;

    /// Schedule a repaint.
    fn request_render(&mut self);
}

impl<S: RenderSurface + ?Sized> RenderSurface for &mut S {
    fn bounds(&self) -> Bounds {
        (**self).bounds()
    }

    fn pointer_to_canvas(&self, x: f64, y: f64) -> Point {
        (**self).pointer_to_canvas(x, y)
    }

    fn has_target_at(&self, point: Point) -> bool {
        (**self).has_target_at(point)
    }

    fn add_overlay(&mut self, zone: &CropZone) {
        (**self).add_overlay(zone)
    }

    fn remove_overlay(&mut self) {
        (**self).remove_overlay()
    }

    fn update_overlay(&mut self, zone: &CropZone) {
        (**self).update_overlay(zone)
    }

    fn select_overlay(&mut self) {
        (**self).select_overlay()
    }

    fn clear_selection(&mut self) {
        (**self).clear_selection()
    }

    fn set_objects_interactive(&mut self, interactive: bool) {
        (**self).set_objects_interactive(interactive)
    }

    fn set_multi_select(&mut self, enabled: bool) {
        (**self).set_multi_select(enabled)
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        (**self).set_cursor(cursor)
    }

    fn add_listener(&mut self, kind: ListenerKind) {
        (**self).add_listener(kind)
    }

    fn remove_listener(&mut self, kind: ListenerKind) {
        (**self).remove_listener(kind)
    }

    fn extract_region(&mut self, rect: &Rectangle) -> Result<RgbImage, SurfaceError> {
        (**self).extract_region(rect)
    }

    fn image_name(&self) -> String {
        (**self).image_name()
    }

    fn request_render(&mut self) {
        (**self).request_render()
    }
}
