//! In-memory rendering surface.
//!
//! `MemorySurface` keeps the canvas as plain data: an RGB backdrop, a list of
//! background objects, the overlay state and counters for every call the
//! engine makes. It has no drawing of its own; `request_render` only counts.

use super::{extract_region, Cursor, ListenerKind, RenderSurface, SurfaceError};
use crate::geometry::Rectangle;
use crate::zone::CropZone;
use crate::{Bounds, Point};
use image::RgbImage;

/// A background object on the canvas (an annotation, a shape, ...).
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceObject {
    pub rect: Rectangle,
    /// Whether the object receives pointer events.
    pub interactive: bool,
}

/// Overlay as the surface currently shows it.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Overlay {
    rect: Rectangle,
    visible: bool,
}

/// An in-memory [`RenderSurface`] backed by an RGB image.
#[derive(Debug, Clone)]
pub struct MemorySurface {
    name: String,
    image: RgbImage,
    bounds: Bounds,
    /// Screen-to-canvas mapping: `canvas = (screen - offset) / scale`
    scale: f64,
    offset: Point,
    objects: Vec<SurfaceObject>,
    overlay: Option<Overlay>,
    overlay_selected: bool,
    multi_select: bool,
    cursor: Cursor,
    listeners: Vec<ListenerKind>,
    overlay_adds: usize,
    overlay_removes: usize,
    renders: usize,
}

impl MemorySurface {
    /// Create a surface showing `image`; the canvas matches the image size.
    pub fn new(name: impl Into<String>, image: RgbImage) -> Self {
        let bounds = Bounds::new(image.width() as f64, image.height() as f64);
        Self {
            name: name.into(),
            image,
            bounds,
            scale: 1.0,
            offset: Point::default(),
            objects: Vec::new(),
            overlay: None,
            overlay_selected: false,
            multi_select: true,
            cursor: Cursor::Default,
            listeners: Vec::new(),
            overlay_adds: 0,
            overlay_removes: 0,
            renders: 0,
        }
    }

    /// Create a surface with a black image of the given size.
    pub fn blank(width: u32, height: u32) -> Self {
        Self::new("image", RgbImage::new(width, height))
    }

    /// Create a surface from raw RGB bytes (3 bytes per pixel, row-major).
    pub fn from_raw(
        name: impl Into<String>,
        width: u32,
        height: u32,
        pixels: Vec<u8>,
    ) -> Result<Self, SurfaceError> {
        let expected = width as usize * height as usize * 3;
        let actual = pixels.len();
        let image = RgbImage::from_raw(width, height, pixels)
            .ok_or(SurfaceError::InvalidPixelData { expected, actual })?;
        Ok(Self::new(name, image))
    }

    /// Change the canvas size without touching the image.
    pub fn set_canvas_size(&mut self, width: f64, height: f64) {
        self.bounds = Bounds::new(width, height);
    }

    /// Set how host pointer coordinates map to canvas space.
    pub fn set_pointer_mapping(&mut self, scale: f64, offset: Point) {
        self.scale = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            1.0
        };
        self.offset = offset;
    }

    /// Add a background object and return its index.
    pub fn add_object(&mut self, rect: Rectangle) -> usize {
        self.objects.push(SurfaceObject {
            rect,
            interactive: true,
        });
        self.objects.len() - 1
    }

    pub fn objects(&self) -> &[SurfaceObject] {
        &self.objects
    }

    /// Rectangle the overlay currently shows, if it is on the canvas.
    pub fn overlay_rect(&self) -> Option<Rectangle> {
        self.overlay.map(|o| o.rect)
    }

    pub fn overlay_visible(&self) -> bool {
        self.overlay.is_some_and(|o| o.visible)
    }

    pub fn overlay_selected(&self) -> bool {
        self.overlay_selected
    }

    pub fn multi_select(&self) -> bool {
        self.multi_select
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Number of registered listeners of one kind.
    pub fn listener_count(&self, kind: ListenerKind) -> usize {
        self.listeners.iter().filter(|k| **k == kind).count()
    }

    /// Number of registered listeners of all kinds.
    pub fn total_listeners(&self) -> usize {
        self.listeners.len()
    }

    /// How many times the overlay was added and removed.
    pub fn overlay_churn(&self) -> (usize, usize) {
        (self.overlay_adds, self.overlay_removes)
    }

    pub fn render_count(&self) -> usize {
        self.renders
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }
}

impl RenderSurface for MemorySurface {
    fn bounds(&self) -> Bounds {
        self.bounds
    }

    fn pointer_to_canvas(&self, x: f64, y: f64) -> Point {
        Point::new(
            (x - self.offset.x) / self.scale,
            (y - self.offset.y) / self.scale,
        )
    }

    fn has_target_at(&self, point: Point) -> bool {
        let on_overlay = self
            .overlay
            .is_some_and(|o| o.visible && o.rect.is_valid() && o.rect.contains(point.x, point.y));
        on_overlay
            || self
                .objects
                .iter()
                .any(|obj| obj.interactive && obj.rect.contains(point.x, point.y))
    }

    fn add_overlay(&mut self, zone: &CropZone) {
        self.overlay = Some(Overlay {
            rect: zone.rect(),
            visible: zone.is_visible(),
        });
        self.overlay_adds += 1;
    }

    fn remove_overlay(&mut self) {
        if self.overlay.take().is_some() {
            self.overlay_removes += 1;
        }
        self.overlay_selected = false;
    }

    fn update_overlay(&mut self, zone: &CropZone) {
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.rect = zone.rect();
            overlay.visible = zone.is_visible();
        }
    }

    fn select_overlay(&mut self) {
        self.overlay_selected = self.overlay.is_some();
    }

    fn clear_selection(&mut self) {
        self.overlay_selected = false;
    }

    fn set_objects_interactive(&mut self, interactive: bool) {
        for obj in &mut self.objects {
            obj.interactive = interactive;
        }
    }

    fn set_multi_select(&mut self, enabled: bool) {
        self.multi_select = enabled;
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        self.cursor = cursor;
    }

    fn add_listener(&mut self, kind: ListenerKind) {
        self.listeners.push(kind);
    }

    fn remove_listener(&mut self, kind: ListenerKind) {
        if let Some(pos) = self.listeners.iter().position(|k| *k == kind) {
            self.listeners.remove(pos);
        }
    }

    fn extract_region(&mut self, rect: &Rectangle) -> Result<RgbImage, SurfaceError> {
        extract_region(&self.image, rect)
    }

    fn image_name(&self) -> String {
        self.name.clone()
    }

    fn request_render(&mut self) {
        self.renders += 1;
    }
}
