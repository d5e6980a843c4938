//! The crop-zone overlay model.
//!
//! A [`CropZone`] wraps the current crop [`Rectangle`] together with its
//! visibility. It is created when a crop session starts and dropped when the
//! session ends; the session is its only writer. Every geometry change goes
//! through [`CropZone::apply_rect`], which replaces the whole rectangle at once.
//!
//! The zone also computes where its own move and corner handles would take
//! it, so a host that forwards native handle edits gets the same containment
//! guarantees as the drag path.

use crate::geometry::{constrain_to_ratio, Rectangle};
use crate::{Bounds, Point};
use serde::{Deserialize, Serialize};

/// A corner handle of the crop zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    /// Direction the zone grows when this corner is dragged outward, as
    /// `(grows_left, grows_up)`.
    fn growth(self) -> (bool, bool) {
        match self {
            Corner::TopLeft => (true, true),
            Corner::TopRight => (false, true),
            Corner::BottomLeft => (true, false),
            Corner::BottomRight => (false, false),
        }
    }
}

/// The live crop overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct CropZone {
    rect: Rectangle,
    visible: bool,
}

impl CropZone {
    /// Create a visible zone showing `rect`.
    pub fn new(rect: Rectangle) -> Self {
        Self {
            rect,
            visible: true,
        }
    }

    /// Current rectangle, including any preset ratio tag.
    pub fn rect(&self) -> Rectangle {
        self.rect
    }

    /// Replace the zone's geometry in a single step.
    pub fn apply_rect(&mut self, rect: Rectangle) {
        self.rect = rect;
    }

    /// Ratio the zone was last sized from, if any.
    pub fn preset_ratio(&self) -> Option<f64> {
        self.rect.preset_ratio
    }

    /// A zone is valid only when it has a positive area.
    pub fn is_valid(&self) -> bool {
        self.rect.is_valid()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Check whether a canvas point falls on the zone.
    pub fn contains(&self, point: Point) -> bool {
        self.visible && self.is_valid() && self.rect.contains(point.x, point.y)
    }

    /// Rectangle after moving the zone's origin to `(left, top)`.
    ///
    /// The size and preset ratio are kept; the origin is clamped so the zone
    /// stays inside the canvas.
    pub fn moved_to(&self, left: f64, top: f64, bounds: &Bounds) -> Rectangle {
        let max_left = (bounds.max_width - self.rect.width).max(0.0);
        let max_top = (bounds.max_height - self.rect.height).max(0.0);

        let left = if left.is_finite() { left } else { self.rect.left };
        let top = if top.is_finite() { top } else { self.rect.top };

        Rectangle {
            left: left.clamp(0.0, max_left),
            top: top.clamp(0.0, max_top),
            ..self.rect
        }
    }

    /// Rectangle after dragging one corner handle to `point`.
    ///
    /// The opposite corner stays fixed. The dragged corner cannot cross the
    /// fixed one (no flipping) and is clamped to the canvas. When the zone
    /// carries a preset ratio, the result keeps that ratio.
    pub fn resized_from(&self, corner: Corner, point: Point, bounds: &Bounds) -> Rectangle {
        let rect = self.rect;
        let anchor = match corner {
            Corner::TopLeft => Point::new(rect.right(), rect.bottom()),
            Corner::TopRight => Point::new(rect.left, rect.bottom()),
            Corner::BottomLeft => Point::new(rect.right(), rect.top),
            Corner::BottomRight => Point::new(rect.left, rect.top),
        };
        let anchor = bounds.clamp_point(anchor);

        let x = if point.x.is_finite() { point.x } else { anchor.x };
        let y = if point.y.is_finite() { point.y } else { anchor.y };
        let (x, y) = match corner {
            Corner::TopLeft => (x.clamp(0.0, anchor.x), y.clamp(0.0, anchor.y)),
            Corner::TopRight => (
                x.clamp(anchor.x, bounds.max_width),
                y.clamp(0.0, anchor.y),
            ),
            Corner::BottomLeft => (
                x.clamp(0.0, anchor.x),
                y.clamp(anchor.y, bounds.max_height),
            ),
            Corner::BottomRight => (
                x.clamp(anchor.x, bounds.max_width),
                y.clamp(anchor.y, bounds.max_height),
            ),
        };

        let width = (x - anchor.x).abs();
        let height = (y - anchor.y).abs();

        match rect.preset_ratio.filter(|r| r.is_finite() && *r > 0.0) {
            Some(ratio) => {
                // Follow whichever axis the pointer pulled further
                let requested = width.max(height * ratio);
                constrain_to_ratio(anchor, corner.growth(), requested, ratio, bounds)
                    .with_preset_ratio(Some(ratio))
            }
            None => Rectangle::new(anchor.x.min(x), anchor.y.min(y), width, height),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> Bounds {
        Bounds::new(800.0, 600.0)
    }

    fn ratio_zone(left: f64, top: f64, width: f64, height: f64, ratio: f64) -> CropZone {
        CropZone::new(Rectangle::new(left, top, width, height).with_preset_ratio(Some(ratio)))
    }

    #[test]
    fn test_new_zone_is_visible() {
        let zone = CropZone::new(Rectangle::new(0.0, 0.0, 10.0, 10.0));
        assert!(zone.is_visible());
        assert!(zone.is_valid());
    }

    #[test]
    fn test_apply_rect_replaces_everything() {
        let mut zone = ratio_zone(0.0, 0.0, 10.0, 10.0, 1.0);
        zone.apply_rect(Rectangle::new(5.0, 6.0, 7.0, 8.0));
        assert_eq!(zone.rect(), Rectangle::new(5.0, 6.0, 7.0, 8.0));
        assert!(zone.preset_ratio().is_none());
    }

    #[test]
    fn test_zero_area_zone_is_invalid() {
        let zone = CropZone::new(Rectangle::new(10.0, 10.0, 0.0, 50.0));
        assert!(!zone.is_valid());
        assert!(!zone.contains(Point::new(10.0, 20.0)));
    }

    #[test]
    fn test_hidden_zone_does_not_hit() {
        let mut zone = CropZone::new(Rectangle::new(0.0, 0.0, 100.0, 100.0));
        assert!(zone.contains(Point::new(50.0, 50.0)));
        zone.set_visible(false);
        assert!(!zone.contains(Point::new(50.0, 50.0)));
    }

    #[test]
    fn test_move_is_clamped() {
        let zone = CropZone::new(Rectangle::new(100.0, 100.0, 200.0, 100.0));

        let rect = zone.moved_to(700.0, -30.0, &canvas());
        assert_eq!(rect, Rectangle::new(600.0, 0.0, 200.0, 100.0));

        let rect = zone.moved_to(50.0, 60.0, &canvas());
        assert_eq!(rect, Rectangle::new(50.0, 60.0, 200.0, 100.0));
    }

    #[test]
    fn test_move_keeps_preset_ratio() {
        let zone = ratio_zone(0.0, 0.0, 200.0, 100.0, 2.0);
        let rect = zone.moved_to(10.0, 10.0, &canvas());
        assert_eq!(rect.preset_ratio, Some(2.0));
    }

    #[test]
    fn test_free_resize_bottom_right() {
        let zone = CropZone::new(Rectangle::new(100.0, 100.0, 100.0, 100.0));
        let rect = zone.resized_from(Corner::BottomRight, Point::new(400.0, 250.0), &canvas());
        assert_eq!(rect, Rectangle::new(100.0, 100.0, 300.0, 150.0));
    }

    #[test]
    fn test_free_resize_top_left_cannot_flip() {
        let zone = CropZone::new(Rectangle::new(100.0, 100.0, 100.0, 100.0));
        // Pointer dragged past the opposite corner
        let rect = zone.resized_from(Corner::TopLeft, Point::new(500.0, 500.0), &canvas());
        assert_eq!(rect, Rectangle::new(200.0, 200.0, 0.0, 0.0));
    }

    #[test]
    fn test_free_resize_clamped_to_canvas() {
        let zone = CropZone::new(Rectangle::new(100.0, 100.0, 100.0, 100.0));
        let rect = zone.resized_from(Corner::TopRight, Point::new(2000.0, -100.0), &canvas());
        assert_eq!(rect, Rectangle::new(100.0, 0.0, 700.0, 200.0));
    }

    #[test]
    fn test_ratio_resize_keeps_ratio() {
        let zone = ratio_zone(100.0, 100.0, 200.0, 100.0, 2.0);
        let rect = zone.resized_from(Corner::BottomRight, Point::new(500.0, 150.0), &canvas());
        assert_eq!(rect.left, 100.0);
        assert_eq!(rect.top, 100.0);
        assert_eq!(rect.width, 400.0);
        assert_eq!(rect.height, 200.0);
        assert_eq!(rect.preset_ratio, Some(2.0));
    }

    #[test]
    fn test_ratio_resize_limited_by_canvas() {
        let zone = ratio_zone(400.0, 400.0, 100.0, 100.0, 1.0);
        let rect = zone.resized_from(Corner::BottomRight, Point::new(800.0, 800.0), &canvas());
        assert_eq!(rect.width, 200.0);
        assert_eq!(rect.height, 200.0);
        assert!(rect.fits_within(&canvas(), 0.0));
    }

    #[test]
    fn test_ratio_resize_top_left_grows_away_from_anchor() {
        let zone = ratio_zone(300.0, 300.0, 100.0, 100.0, 1.0);
        let rect = zone.resized_from(Corner::TopLeft, Point::new(250.0, 200.0), &canvas());
        let expected = Rectangle::new(200.0, 200.0, 200.0, 200.0).with_preset_ratio(Some(1.0));
        assert_eq!(rect, expected);
    }
}
