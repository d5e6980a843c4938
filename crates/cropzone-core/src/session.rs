//! The crop session controller.
//!
//! [`Cropper`] owns the crop zone for the lifetime of a session and is the
//! only writer of its geometry. A session is acquired with [`Cropper::start`]
//! and released with [`Cropper::end`]; dropping the cropper ends any active
//! session, so every listener the engine installed is removed on every exit
//! path.
//!
//! # Session Lifecycle
//!
//! ```text
//! start()  -> background objects inert, zone added and selected,
//!             multi-select off, crosshair cursor, session listeners on
//! drag     -> gesture listeners on, zone re-added per move, callback fired
//! end()    -> zone removed, objects interactive again, defaults restored,
//!             every listener off, aspect lock cleared
//! ```
//!
//! `start` and `end` are idempotent: calling either twice in a row is the
//! same as calling it once.

use crate::config::{CropperOptions, OptionsError};
use crate::geometry::{
    default_rect, rect_from_position, rect_from_preset_ratio, PositionInfo, PresetRatio,
    Rectangle,
};
use crate::interaction::{InputEvent, InteractionState, Key};
use crate::surface::{Cursor, ListenerKind, RenderSurface, SurfaceError};
use crate::sync::{Axis, CropCallbacks, DimensionChange, DimensionInput, Limits, SyncBridge};
use crate::zone::{Corner, CropZone};
use crate::Point;
use image::RgbImage;
use thiserror::Error;
use tracing::{debug, trace};

/// Errors from crop session operations.
#[derive(Debug, Error, PartialEq)]
pub enum CropError {
    /// The rendering surface could not produce pixels
    #[error(transparent)]
    Surface(#[from] SurfaceError),

    /// Session options were rejected
    #[error(transparent)]
    Options(#[from] OptionsError),
}

/// Pixels extracted for a committed crop.
#[derive(Debug, Clone, PartialEq)]
pub struct CroppedImageData {
    /// Name of the source image
    pub name: String,
    pub image: RgbImage,
}

/// State that exists only while a session is active.
#[derive(Debug)]
struct Session {
    zone: CropZone,
    interaction: InteractionState,
    bridge: SyncBridge,
    /// Listeners this session installed and has not yet removed.
    listeners: Vec<ListenerKind>,
}

impl Session {
    fn has_listener(&self, kind: ListenerKind) -> bool {
        self.listeners.contains(&kind)
    }
}

/// Crop session controller driving a [`RenderSurface`].
///
/// # Example
///
/// ```ignore
/// let mut cropper = Cropper::new(MemorySurface::blank(800, 600), CropperOptions::default())?;
/// cropper.start(CropCallbacks::new().on_rect_updated(|r| println!("{r:?}")));
/// cropper.apply_preset(Some(1.0));
/// assert_eq!(cropper.rect().unwrap().width, 600.0);
/// cropper.end();
/// ```
#[derive(Debug)]
pub struct Cropper<S: RenderSurface> {
    surface: S,
    options: CropperOptions,
    session: Option<Session>,
}

impl<S: RenderSurface> Cropper<S> {
    /// Create a controller for `surface`. No session is started.
    pub fn new(surface: S, options: CropperOptions) -> Result<Self, CropError> {
        options.validate()?;
        Ok(Self {
            surface,
            options,
            session: None,
        })
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access to the surface, for host-driven changes such as a
    /// canvas resize. Changes made here bypass the engine.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn options(&self) -> &CropperOptions {
        &self.options
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// The live crop zone, if a session is active.
    pub fn zone(&self) -> Option<&CropZone> {
        self.session.as_ref().map(|s| &s.zone)
    }

    /// Whether a drag gesture is in progress.
    pub fn is_dragging(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| s.interaction.is_dragging())
    }

    /// Begin a crop session. Does nothing if one is already active.
    pub fn start(&mut self, callbacks: CropCallbacks) {
        if self.session.is_some() {
            debug!("crop session already active");
            return;
        }

        let bounds = self.surface.bounds();
        let rect = default_rect(
            bounds,
            self.options.default_size,
            self.options.fallback_scale,
        );
        let mut session = Session {
            zone: CropZone::new(rect),
            interaction: InteractionState::new(self.options.drag_threshold),
            bridge: SyncBridge::new(callbacks, bounds, &rect),
            listeners: Vec::new(),
        };

        self.surface.set_objects_interactive(false);
        self.surface.add_overlay(&session.zone);
        self.surface.set_multi_select(false);
        self.surface.set_cursor(Cursor::Crosshair);
        install(
            &mut self.surface,
            &mut session.listeners,
            &ListenerKind::SESSION,
        );
        self.surface.select_overlay();
        self.surface.request_render();

        debug!(
            left = rect.left,
            top = rect.top,
            width = rect.width,
            height = rect.height,
            "crop session started"
        );
        self.session = Some(session);
    }

    /// End the crop session. Does nothing if none is active.
    pub fn end(&mut self) {
        let Some(mut session) = self.session.take() else {
            return;
        };

        self.surface.remove_overlay();
        self.surface.set_objects_interactive(true);
        self.surface.set_multi_select(true);
        self.surface.set_cursor(Cursor::Default);
        for kind in session.listeners.drain(..) {
            self.surface.remove_listener(kind);
        }
        session.interaction.reset();
        self.surface.request_render();

        debug!("crop session ended");
    }

    /// Show or hide the zone without changing its geometry.
    pub fn set_visibility(&mut self, visible: bool) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.zone.set_visible(visible);
        self.surface.update_overlay(&session.zone);
        self.surface.request_render();
    }

    /// The committed crop rectangle, or `None` if there is no session or the
    /// zone has no area.
    pub fn rect(&self) -> Option<Rectangle> {
        self.session
            .as_ref()
            .filter(|s| s.zone.is_valid())
            .map(|s| s.zone.rect())
    }

    /// Feed a raw input event to the session.
    ///
    /// Events are only acted on while the matching listener is installed.
    /// Returns whether the event changed any state.
    pub fn handle_event(&mut self, event: InputEvent) -> bool {
        match event {
            InputEvent::PointerDown { x, y } => self.pointer_down(x, y),
            InputEvent::PointerMove { x, y } => self.pointer_move(x, y),
            InputEvent::PointerUp { .. } => self.pointer_up(),
            InputEvent::KeyDown { key } => self.key_event(key, true),
            InputEvent::KeyUp { key } => self.key_event(key, false),
        }
    }

    fn pointer_down(&mut self, x: f64, y: f64) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if !session.has_listener(ListenerKind::PointerDown) {
            return false;
        }

        let point = self.surface.pointer_to_canvas(x, y);
        let over_target = self.surface.has_target_at(point);
        if !session.interaction.pointer_down(point, over_target) {
            trace!(x = point.x, y = point.y, over_target, "pointer-down ignored");
            return false;
        }

        install(
            &mut self.surface,
            &mut session.listeners,
            &ListenerKind::GESTURE,
        );
        debug!(x = point.x, y = point.y, "drag started");
        true
    }

    fn pointer_move(&mut self, x: f64, y: f64) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if !session.has_listener(ListenerKind::PointerMove) {
            return false;
        }

        let point = self.surface.pointer_to_canvas(x, y);
        let Some(rect) = session
            .interaction
            .pointer_move(point, self.surface.bounds())
        else {
            return false;
        };

        // Re-adding keeps the overlay on top of anything drawn meanwhile
        self.surface.remove_overlay();
        session.zone.apply_rect(rect);
        self.surface.add_overlay(&session.zone);
        notify(&self.surface, session, &rect);
        self.surface.request_render();

        trace!(
            left = rect.left,
            top = rect.top,
            width = rect.width,
            height = rect.height,
            "drag updated"
        );
        true
    }

    fn pointer_up(&mut self) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if !session.has_listener(ListenerKind::PointerUp) || !session.interaction.pointer_up() {
            return false;
        }

        self.surface.select_overlay();
        release(
            &mut self.surface,
            &mut session.listeners,
            &ListenerKind::GESTURE,
        );
        self.surface.request_render();

        debug!(valid = session.zone.is_valid(), "drag finished");
        true
    }

    fn key_event(&mut self, key: Key, pressed: bool) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        let kind = if pressed {
            ListenerKind::KeyDown
        } else {
            ListenerKind::KeyUp
        };
        if !session.has_listener(kind) {
            return false;
        }

        let before = session.interaction.shift_held();
        if pressed {
            session.interaction.key_down(key);
        } else {
            session.interaction.key_up(key);
        }
        before != session.interaction.shift_held()
    }

    /// Resize the zone to a preset ratio, or back to the default rectangle
    /// when `ratio` is `None`.
    pub fn apply_preset(&mut self, ratio: Option<f64>) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        let bounds = self.surface.bounds();
        let rect = match ratio {
            Some(ratio) => rect_from_preset_ratio(ratio, bounds),
            None => default_rect(
                bounds,
                self.options.default_size,
                self.options.fallback_scale,
            ),
        };
        debug!(?ratio, width = rect.width, height = rect.height, "preset applied");
        replace_rect(&mut self.surface, session, rect);
    }

    /// Resize the zone to one of the named presets.
    pub fn apply_preset_named(&mut self, preset: PresetRatio) {
        self.apply_preset(Some(preset.ratio()));
    }

    /// Set the zone from explicit position values, clamped to the canvas.
    pub fn apply_position(&mut self, info: &PositionInfo) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        let rect = rect_from_position(info, self.surface.bounds());
        debug!(
            left = rect.left,
            top = rect.top,
            width = rect.width,
            height = rect.height,
            "position applied"
        );
        replace_rect(&mut self.surface, session, rect);
    }

    /// Apply typed dimensions.
    ///
    /// Each value is clamped to `limits`; a `None` keeps the current size on
    /// that axis. The origin is kept when the new size fits from there and is
    /// otherwise moved back just enough for it to fit.
    pub fn apply_dimensions(&mut self, width: Option<f64>, height: Option<f64>, limits: &Limits) {
        let Some(current) = self.session.as_ref().map(|s| s.zone.rect()) else {
            return;
        };
        let bounds = self.surface.bounds();

        let width = width.map_or(current.width, |w| limits.clamp_width(w));
        let height = height.map_or(current.height, |h| limits.clamp_height(h));
        let left = current.left.min((bounds.max_width - width).max(0.0));
        let top = current.top.min((bounds.max_height - height).max(0.0));

        self.apply_position(&PositionInfo::full(left, top, width, height));
    }

    /// The numeric field for `axis`, mirroring the zone's live size.
    pub fn dimension_input(&self, axis: Axis) -> Option<&DimensionInput> {
        self.session.as_ref().map(|s| s.bridge.input(axis))
    }

    /// Feed a typed value into the `axis` field and resize the zone to it.
    ///
    /// The field is ranged to the current canvas first, so out-of-range input
    /// is clamped rather than rejected. Non-numeric input keeps the current
    /// size. Returns the change the field reported, or `None` without a
    /// session.
    pub fn input_dimension(
        &mut self,
        axis: Axis,
        raw: f64,
        is_final: bool,
    ) -> Option<DimensionChange> {
        let limits = Limits::for_bounds(self.surface.bounds());
        let session = self.session.as_mut()?;
        session.bridge.set_limits(&limits);
        let change = session.bridge.input_mut(axis).input(raw, is_final);

        match axis {
            Axis::Width => self.apply_dimensions(Some(change.value), None, &limits),
            Axis::Height => self.apply_dimensions(None, Some(change.value), &limits),
        }
        Some(change)
    }

    /// Move the zone, as its native move handle would, keeping its size.
    pub fn move_zone(&mut self, left: f64, top: f64) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let rect = session.zone.moved_to(left, top, &self.surface.bounds());
        update_rect(&mut self.surface, session, rect);
    }

    /// Drag one corner handle to `point` (canvas space).
    pub fn resize_zone(&mut self, corner: Corner, point: Point) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let rect = session
            .zone
            .resized_from(corner, point, &self.surface.bounds());
        update_rect(&mut self.surface, session, rect);
    }

    /// Extract the pixels under `rect`.
    ///
    /// Returns `Ok(None)` for a missing rectangle without touching the
    /// surface. Otherwise the overlay is taken off for the extraction and put
    /// back afterwards, also when extraction fails.
    pub fn cropped_image_data(
        &mut self,
        rect: Option<&Rectangle>,
    ) -> Result<Option<CroppedImageData>, CropError> {
        let Some(rect) = rect else {
            return Ok(None);
        };

        if self.session.is_some() {
            self.surface.remove_overlay();
        }
        let extracted = self.surface.extract_region(rect);
        if let Some(session) = self.session.as_ref() {
            self.surface.add_overlay(&session.zone);
            self.surface.select_overlay();
        }
        self.surface.request_render();

        let image = extracted?;
        debug!(
            width = image.width(),
            height = image.height(),
            "crop region extracted"
        );
        Ok(Some(CroppedImageData {
            name: self.surface.image_name(),
            image,
        }))
    }
}

impl<S: RenderSurface> Drop for Cropper<S> {
    fn drop(&mut self) {
        self.end();
    }
}

fn install<S: RenderSurface>(
    surface: &mut S,
    listeners: &mut Vec<ListenerKind>,
    kinds: &[ListenerKind],
) {
    for &kind in kinds {
        surface.add_listener(kind);
        listeners.push(kind);
    }
}

/// Remove listeners of the given kinds, but only ones this session holds.
fn release<S: RenderSurface>(
    surface: &mut S,
    listeners: &mut Vec<ListenerKind>,
    kinds: &[ListenerKind],
) {
    for &kind in kinds {
        if let Some(pos) = listeners.iter().position(|k| *k == kind) {
            listeners.remove(pos);
            surface.remove_listener(kind);
        }
    }
}

/// Swap in a rectangle computed from outside the drag path: deselect, remove,
/// apply, re-add, reselect, notify.
fn replace_rect<S: RenderSurface>(surface: &mut S, session: &mut Session, rect: Rectangle) {
    surface.clear_selection();
    surface.remove_overlay();
    session.zone.apply_rect(rect);
    surface.add_overlay(&session.zone);
    surface.select_overlay();
    notify(surface, session, &rect);
    surface.request_render();
}

/// Report a new rectangle to the host and mirror it into the numeric fields,
/// ranged to the canvas as it is now.
fn notify<S: RenderSurface>(surface: &S, session: &mut Session, rect: &Rectangle) {
    session.bridge.set_limits(&Limits::for_bounds(surface.bounds()));
    session.bridge.notify(rect);
}

/// Apply a handle edit in place.
fn update_rect<S: RenderSurface>(surface: &mut S, session: &mut Session, rect: Rectangle) {
    session.zone.apply_rect(rect);
    surface.update_overlay(&session.zone);
    notify(surface, session, &rect);
    surface.request_render();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::MemorySurface;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn cropper(width: u32, height: u32) -> Cropper<MemorySurface> {
        Cropper::new(MemorySurface::blank(width, height), CropperOptions::default()).unwrap()
    }

    /// A session whose default zone is a small square in the middle of an
    /// 800x600 canvas, leaving the corners free for drags.
    fn small_zone_cropper() -> Cropper<MemorySurface> {
        let options = CropperOptions::default().with_default_size(50.0, 50.0);
        let mut cropper = Cropper::new(MemorySurface::blank(800, 600), options).unwrap();
        cropper.start(CropCallbacks::new());
        cropper
    }

    fn recording_callbacks() -> (CropCallbacks, Rc<RefCell<Vec<Rectangle>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let callbacks =
            CropCallbacks::new().on_rect_updated(move |rect| sink.borrow_mut().push(*rect));
        (callbacks, seen)
    }

    fn drag(cropper: &mut Cropper<MemorySurface>, from: (f64, f64), to: (f64, f64)) {
        cropper.handle_event(InputEvent::PointerDown {
            x: from.0,
            y: from.1,
        });
        cropper.handle_event(InputEvent::PointerMove { x: to.0, y: to.1 });
        cropper.handle_event(InputEvent::PointerUp { x: to.0, y: to.1 });
    }

    #[test]
    fn test_new_rejects_invalid_options() {
        let options = CropperOptions::default().with_drag_threshold(f64::NAN);
        let err = Cropper::new(MemorySurface::blank(10, 10), options).unwrap_err();
        assert!(matches!(
            err,
            CropError::Options(OptionsError::InvalidDragThreshold(_))
        ));
    }

    #[test]
    fn test_start_uses_fallback_default() {
        let mut cropper = cropper(800, 600);
        cropper.start(CropCallbacks::new());

        assert_eq!(
            cropper.rect(),
            Some(Rectangle::new(100.0, 75.0, 600.0, 450.0))
        );
    }

    #[test]
    fn test_start_uses_configured_default() {
        let options = CropperOptions::default().with_default_size(800.0, 600.0);
        let mut cropper = Cropper::new(MemorySurface::blank(800, 600), options).unwrap();
        cropper.start(CropCallbacks::new());

        assert_eq!(cropper.rect(), Some(Rectangle::new(0.0, 0.0, 800.0, 600.0)));
    }

    #[test]
    fn test_start_prepares_surface() {
        let mut cropper = cropper(800, 600);
        cropper.surface_mut().add_object(Rectangle::new(0.0, 0.0, 20.0, 20.0));
        cropper.start(CropCallbacks::new());

        let surface = cropper.surface();
        assert!(!surface.objects()[0].interactive);
        assert!(!surface.multi_select());
        assert_eq!(surface.cursor(), Cursor::Crosshair);
        assert!(surface.overlay_selected());
        assert_eq!(surface.total_listeners(), 3);
        for kind in ListenerKind::SESSION {
            assert_eq!(surface.listener_count(kind), 1);
        }
    }

    #[test]
    fn test_end_restores_surface() {
        let mut cropper = cropper(800, 600);
        cropper.surface_mut().add_object(Rectangle::new(0.0, 0.0, 20.0, 20.0));
        cropper.start(CropCallbacks::new());
        cropper.end();

        let surface = cropper.surface();
        assert!(surface.objects()[0].interactive);
        assert!(surface.multi_select());
        assert_eq!(surface.cursor(), Cursor::Default);
        assert!(surface.overlay_rect().is_none());
        assert_eq!(surface.total_listeners(), 0);
        assert!(cropper.rect().is_none());
        assert!(!cropper.is_active());
    }

    #[test]
    fn test_empty_canvas_has_no_rect() {
        let mut cropper = cropper(0, 0);
        cropper.start(CropCallbacks::new());
        assert!(cropper.is_active());
        assert!(cropper.rect().is_none());
    }

    #[test]
    fn test_start_twice_is_start_once() {
        let mut cropper = cropper(800, 600);
        cropper.start(CropCallbacks::new());
        cropper.start(CropCallbacks::new());

        assert_eq!(cropper.surface().total_listeners(), 3);
        assert_eq!(cropper.surface().overlay_churn(), (1, 0));
    }

    #[test]
    fn test_end_twice_is_end_once() {
        let mut cropper = cropper(800, 600);
        cropper.start(CropCallbacks::new());
        cropper.end();
        let renders = cropper.surface().render_count();
        cropper.end();

        assert_eq!(cropper.surface().overlay_churn(), (1, 1));
        assert_eq!(cropper.surface().render_count(), renders);
    }

    #[test]
    fn test_end_without_start_is_noop() {
        let mut cropper = cropper(800, 600);
        cropper.end();
        assert_eq!(cropper.surface().render_count(), 0);
    }

    #[test]
    fn test_listeners_pair_across_sessions() {
        let mut cropper = small_zone_cropper();
        cropper.end();

        for _ in 0..3 {
            cropper.start(CropCallbacks::new());
            // Leave a drag unfinished so gesture listeners are live at end()
            cropper.handle_event(InputEvent::PointerDown { x: 10.0, y: 10.0 });
            assert_eq!(cropper.surface().total_listeners(), 5);
            cropper.end();
            assert_eq!(cropper.surface().total_listeners(), 0);
        }
    }

    #[test]
    fn test_drop_releases_listeners() {
        let mut surface = MemorySurface::blank(800, 600);
        {
            let options = CropperOptions::default().with_default_size(50.0, 50.0);
            let mut cropper = Cropper::new(&mut surface, options).unwrap();
            cropper.start(CropCallbacks::new());
            cropper.handle_event(InputEvent::PointerDown { x: 10.0, y: 10.0 });
        }

        assert_eq!(surface.total_listeners(), 0);
        assert!(surface.overlay_rect().is_none());
        assert_eq!(surface.cursor(), Cursor::Default);
    }

    #[test]
    fn test_drag_scenario() {
        let (callbacks, seen) = recording_callbacks();
        let options = CropperOptions::default().with_default_size(50.0, 50.0);
        let mut cropper = Cropper::new(MemorySurface::blank(800, 600), options).unwrap();
        cropper.start(callbacks);

        drag(&mut cropper, (100.0, 100.0), (50.0, 50.0));

        let expected = Rectangle::new(50.0, 50.0, 50.0, 50.0);
        assert_eq!(cropper.rect(), Some(expected));
        assert_eq!(cropper.surface().overlay_rect(), Some(expected));
        assert_eq!(*seen.borrow(), vec![expected]);

        assert!(!cropper.is_dragging());
        assert!(cropper.surface().overlay_selected());
        assert_eq!(cropper.surface().total_listeners(), 3);
    }

    #[test]
    fn test_aspect_locked_drag_scenario() {
        let mut cropper = small_zone_cropper();
        cropper.handle_event(InputEvent::KeyDown { key: Key::Shift });
        drag(&mut cropper, (100.0, 100.0), (300.0, 150.0));

        assert_eq!(
            cropper.rect(),
            Some(Rectangle::new(100.0, 100.0, 200.0, 200.0))
        );
    }

    #[test]
    fn test_shift_reset_on_end() {
        let mut cropper = small_zone_cropper();
        cropper.handle_event(InputEvent::KeyDown { key: Key::Shift });
        cropper.end();
        cropper.start(CropCallbacks::new());

        drag(&mut cropper, (100.0, 100.0), (300.0, 150.0));
        assert_eq!(
            cropper.rect(),
            Some(Rectangle::new(100.0, 100.0, 200.0, 50.0))
        );
    }

    #[test]
    fn test_click_does_not_collapse_zone() {
        let mut cropper = small_zone_cropper();
        let before = cropper.rect();

        drag(&mut cropper, (100.0, 100.0), (104.0, 103.0));
        assert_eq!(cropper.rect(), before);
        assert_eq!(cropper.surface().total_listeners(), 3);
    }

    #[test]
    fn test_pointer_down_on_zone_is_native_move() {
        let mut cropper = small_zone_cropper();
        // Zone is 50x50 centered at (400, 300)
        assert!(!cropper.handle_event(InputEvent::PointerDown { x: 400.0, y: 300.0 }));
        assert!(!cropper.is_dragging());
        assert_eq!(cropper.surface().total_listeners(), 3);
    }

    #[test]
    fn test_drag_clears_preset_ratio() {
        let mut cropper = small_zone_cropper();
        cropper.apply_preset(Some(1.0));
        assert_eq!(cropper.zone().unwrap().preset_ratio(), Some(1.0));

        drag(&mut cropper, (10.0, 10.0), (60.0, 40.0));
        assert_eq!(cropper.zone().unwrap().preset_ratio(), None);
    }

    #[test]
    fn test_drag_uses_pointer_mapping() {
        let mut cropper = small_zone_cropper();
        cropper
            .surface_mut()
            .set_pointer_mapping(2.0, Point::new(0.0, 0.0));

        drag(&mut cropper, (200.0, 200.0), (100.0, 100.0));
        assert_eq!(cropper.rect(), Some(Rectangle::new(50.0, 50.0, 50.0, 50.0)));
    }

    #[test]
    fn test_events_ignored_without_session() {
        let mut cropper = cropper(800, 600);
        assert!(!cropper.handle_event(InputEvent::PointerDown { x: 1.0, y: 1.0 }));
        assert!(!cropper.handle_event(InputEvent::KeyDown { key: Key::Shift }));
        assert_eq!(cropper.surface().total_listeners(), 0);
    }

    #[test]
    fn test_move_without_pointer_down_is_ignored() {
        let mut cropper = small_zone_cropper();
        let before = cropper.rect();
        assert!(!cropper.handle_event(InputEvent::PointerMove { x: 10.0, y: 10.0 }));
        assert!(!cropper.handle_event(InputEvent::PointerUp { x: 10.0, y: 10.0 }));
        assert_eq!(cropper.rect(), before);
    }

    #[test]
    fn test_drag_readds_overlay_per_move() {
        let mut cropper = small_zone_cropper();
        cropper.handle_event(InputEvent::PointerDown { x: 10.0, y: 10.0 });
        cropper.handle_event(InputEvent::PointerMove { x: 100.0, y: 100.0 });
        cropper.handle_event(InputEvent::PointerMove { x: 200.0, y: 150.0 });

        assert_eq!(cropper.surface().overlay_churn(), (3, 2));
        assert!(cropper.is_dragging());
    }

    #[test]
    fn test_apply_square_preset() {
        let (callbacks, seen) = recording_callbacks();
        let mut cropper = cropper(800, 600);
        cropper.start(callbacks);
        cropper.apply_preset(Some(1.0));

        let rect = cropper.rect().unwrap();
        assert_eq!(
            (rect.left, rect.top, rect.width, rect.height),
            (100.0, 0.0, 600.0, 600.0)
        );
        assert_eq!(rect.preset_ratio, Some(1.0));
        assert_eq!(seen.borrow().len(), 1);
        assert!(cropper.surface().overlay_selected());
    }

    #[test]
    fn test_apply_huge_preset_stays_inside() {
        let mut cropper = cropper(800, 600);
        cropper.start(CropCallbacks::new());
        cropper.apply_preset(Some(1e308));

        let rect = cropper.rect().unwrap();
        assert_eq!(rect.width, 800.0);
        assert!(rect.fits_within(&cropper.surface().bounds(), 0.0));
    }

    #[test]
    fn test_apply_preset_none_restores_default() {
        let mut cropper = cropper(800, 600);
        cropper.start(CropCallbacks::new());
        cropper.apply_preset_named(PresetRatio::SixteenNine);
        cropper.apply_preset(None);

        assert_eq!(
            cropper.rect(),
            Some(Rectangle::new(100.0, 75.0, 600.0, 450.0))
        );
    }

    #[test]
    fn test_apply_preset_reads_current_bounds() {
        let mut cropper = cropper(800, 600);
        cropper.start(CropCallbacks::new());
        cropper.surface_mut().set_canvas_size(400.0, 400.0);
        cropper.apply_preset(Some(1.0));

        assert_eq!(cropper.rect().unwrap().width, 400.0);
    }

    #[test]
    fn test_apply_position_clamps() {
        let mut cropper = cropper(800, 600);
        cropper.start(CropCallbacks::new());
        cropper.apply_position(&PositionInfo::full(700.0, 500.0, 300.0, 300.0));

        let rect = cropper.rect().unwrap();
        assert_eq!(
            (rect.left, rect.top, rect.width, rect.height),
            (700.0, 500.0, 100.0, 100.0)
        );
    }

    #[test]
    fn test_operations_without_session_are_noops() {
        let mut cropper = cropper(800, 600);
        cropper.apply_preset(Some(1.0));
        cropper.apply_position(&PositionInfo::default());
        cropper.set_visibility(false);
        cropper.move_zone(10.0, 10.0);

        assert!(cropper.rect().is_none());
        assert_eq!(cropper.surface().render_count(), 0);
    }

    #[test]
    fn test_set_visibility_keeps_geometry() {
        let mut cropper = cropper(800, 600);
        cropper.start(CropCallbacks::new());
        let before = cropper.rect();

        cropper.set_visibility(false);
        assert!(!cropper.surface().overlay_visible());
        assert_eq!(cropper.rect(), before);

        cropper.set_visibility(true);
        assert!(cropper.surface().overlay_visible());
    }

    #[test]
    fn test_apply_dimensions_keeps_origin_when_it_fits() {
        let mut cropper = cropper(800, 600);
        cropper.start(CropCallbacks::new());
        let limits = Limits::for_bounds(cropper.surface().bounds());

        cropper.apply_dimensions(Some(300.0), None, &limits);
        assert_eq!(
            cropper.rect(),
            Some(Rectangle::new(100.0, 75.0, 300.0, 450.0).with_preset_ratio(Some(300.0 / 450.0)))
        );
    }

    #[test]
    fn test_apply_dimensions_clamps_and_shifts() {
        let mut cropper = cropper(800, 600);
        cropper.start(CropCallbacks::new());
        let limits = Limits::for_bounds(cropper.surface().bounds());

        cropper.apply_dimensions(Some(5000.0), Some(500.0), &limits);
        let rect = cropper.rect().unwrap();
        assert_eq!(
            (rect.left, rect.top, rect.width, rect.height),
            (0.0, 75.0, 800.0, 500.0)
        );
    }

    #[test]
    fn test_dimension_inputs_follow_drag() {
        let mut cropper = small_zone_cropper();
        assert_eq!(cropper.dimension_input(Axis::Width).unwrap().value(), 50.0);

        drag(&mut cropper, (100.0, 100.0), (300.0, 250.0));
        let width = cropper.dimension_input(Axis::Width).unwrap();
        assert_eq!((width.min(), width.max(), width.value()), (1.0, 800.0, 200.0));
        assert_eq!(cropper.dimension_input(Axis::Height).unwrap().value(), 150.0);
    }

    #[test]
    fn test_input_dimension_clamps_and_applies() {
        let (callbacks, seen) = recording_callbacks();
        let mut cropper = cropper(800, 600);
        cropper.start(callbacks);

        let change = cropper.input_dimension(Axis::Width, 5000.0, false).unwrap();
        assert_eq!(change.value, 800.0);
        assert!(!change.is_final);
        let rect = cropper.rect().unwrap();
        assert_eq!((rect.left, rect.width), (0.0, 800.0));
        assert_eq!(seen.borrow().len(), 1);

        let change = cropper.input_dimension(Axis::Height, 0.0, true).unwrap();
        assert_eq!(change.value, 1.0);
        assert!(change.is_final);
        assert_eq!(cropper.rect().unwrap().height, 1.0);
        assert_eq!(cropper.dimension_input(Axis::Height).unwrap().value(), 1.0);
    }

    #[test]
    fn test_input_dimension_ignores_nan() {
        let mut cropper = cropper(800, 600);
        cropper.start(CropCallbacks::new());

        let change = cropper.input_dimension(Axis::Width, f64::NAN, true).unwrap();
        assert_eq!(change.value, 600.0);
        assert_eq!(cropper.rect().unwrap().width, 600.0);
    }

    #[test]
    fn test_input_dimension_follows_canvas_resize() {
        let mut cropper = cropper(800, 600);
        cropper.start(CropCallbacks::new());
        cropper.surface_mut().set_canvas_size(400.0, 300.0);

        let change = cropper.input_dimension(Axis::Width, 700.0, true).unwrap();
        assert_eq!(change.value, 400.0);
        assert_eq!(cropper.dimension_input(Axis::Width).unwrap().max(), 400.0);
    }

    #[test]
    fn test_input_dimension_without_session() {
        let mut cropper = cropper(800, 600);
        assert!(cropper.input_dimension(Axis::Width, 10.0, true).is_none());
        assert!(cropper.dimension_input(Axis::Width).is_none());
    }

    #[test]
    fn test_move_zone_stays_inside() {
        let (callbacks, seen) = recording_callbacks();
        let mut cropper = cropper(800, 600);
        cropper.start(callbacks);

        cropper.move_zone(500.0, -20.0);
        assert_eq!(
            cropper.rect(),
            Some(Rectangle::new(200.0, 0.0, 600.0, 450.0))
        );
        assert_eq!(cropper.surface().overlay_rect(), cropper.rect());
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn test_resize_zone_from_corner() {
        let mut cropper = cropper(800, 600);
        cropper.start(CropCallbacks::new());

        cropper.resize_zone(Corner::BottomRight, Point::new(400.0, 300.0));
        assert_eq!(
            cropper.rect(),
            Some(Rectangle::new(100.0, 75.0, 300.0, 225.0))
        );
    }

    #[test]
    fn test_cropped_image_data_none_is_untouched() {
        let mut cropper = cropper(800, 600);
        cropper.start(CropCallbacks::new());
        let renders = cropper.surface().render_count();
        let churn = cropper.surface().overlay_churn();

        assert_eq!(cropper.cropped_image_data(None), Ok(None));
        assert_eq!(cropper.surface().render_count(), renders);
        assert_eq!(cropper.surface().overlay_churn(), churn);
    }

    #[test]
    fn test_cropped_image_data_restores_overlay() {
        let mut cropper = cropper(800, 600);
        cropper.start(CropCallbacks::new());
        let rect = cropper.rect().unwrap();

        let data = cropper.cropped_image_data(Some(&rect)).unwrap().unwrap();
        assert_eq!(data.name, "image");
        assert_eq!(data.image.dimensions(), (600, 450));

        assert_eq!(cropper.surface().overlay_rect(), Some(rect));
        assert_eq!(cropper.surface().overlay_churn(), (2, 1));
    }

    #[test]
    fn test_cropped_image_data_error_restores_overlay() {
        let mut cropper = cropper(800, 600);
        cropper.start(CropCallbacks::new());

        let empty = Rectangle::new(10.0, 10.0, 0.0, 0.0);
        let err = cropper.cropped_image_data(Some(&empty)).unwrap_err();
        assert!(matches!(
            err,
            CropError::Surface(SurfaceError::EmptyRegion { .. })
        ));
        assert!(cropper.surface().overlay_rect().is_some());
    }

    #[test]
    fn test_cropped_image_data_without_session() {
        let mut cropper = cropper(100, 100);
        let rect = Rectangle::new(0.0, 0.0, 10.0, 10.0);

        let data = cropper.cropped_image_data(Some(&rect)).unwrap().unwrap();
        assert_eq!(data.image.dimensions(), (10, 10));
        assert_eq!(cropper.surface().overlay_churn(), (0, 0));
    }
}
