//! Rectangles drawn by dragging from an anchor point.
//!
//! The anchor is where the pointer went down; the current point is where it
//! is now. The pointer may be on either side of the anchor on either axis, and
//! may leave the canvas entirely, so both edges are clamped into the bounds
//! before the size is derived.

use super::{finite_or, Rectangle};
use crate::{Bounds, Point};

/// Compute the crop rectangle spanned by a drag.
///
/// # Arguments
///
/// * `anchor` - Canvas point where the drag started
/// * `current` - Current pointer position in canvas space
/// * `bounds` - Canvas bounds at the time of the call
/// * `aspect_locked` - Force a square (shift held)
///
/// # Behavior
///
/// - The near edge is `clamp(current, 0, anchor)` on each axis
/// - The far edge is `clamp(current, anchor, max)` and the size is the far edge
///   minus the near edge
/// - With `aspect_locked`, the smaller side grows to match the larger, limited
///   to the room available from the anchor in the drag direction. The square
///   grows outward from the anchor: if the pointer is left of (or above) the
///   anchor, that axis' origin becomes `anchor - size`
///
/// The result is always contained in `bounds`. It never carries a preset ratio.
///
/// # Example
///
/// ```ignore
/// let rect = rect_from_drag(
///     Point::new(100.0, 100.0),
///     Point::new(50.0, 50.0),
///     Bounds::new(800.0, 600.0),
///     false,
/// );
/// assert_eq!(rect, Rectangle::new(50.0, 50.0, 50.0, 50.0));
/// ```
pub fn rect_from_drag(
    anchor: Point,
    current: Point,
    bounds: Bounds,
    aspect_locked: bool,
) -> Rectangle {
    let anchor = bounds.clamp_point(Point::new(
        finite_or(anchor.x, 0.0),
        finite_or(anchor.y, 0.0),
    ));
    let current = Point::new(
        finite_or(current.x, anchor.x),
        finite_or(current.y, anchor.y),
    );

    let left = current.x.clamp(0.0, anchor.x);
    let top = current.y.clamp(0.0, anchor.y);
    let width = current.x.clamp(anchor.x, bounds.max_width) - left;
    let height = current.y.clamp(anchor.y, bounds.max_height) - top;

    if aspect_locked {
        let grows_left = current.x <= anchor.x;
        let grows_up = current.y <= anchor.y;
        return constrain_to_ratio(
            anchor,
            (grows_left, grows_up),
            width.max(height),
            1.0,
            &bounds,
        );
    }

    Rectangle::new(left, top, width, height)
}

/// Build a rectangle of a fixed ratio that grows outward from `anchor`.
///
/// `growth` is `(grows_left, grows_up)`. `width` is the requested width
/// before limiting. The rectangle is shrunk (keeping the ratio) until it fits
/// the room between the anchor and the canvas edges in the growth direction.
/// On an axis that grows toward the origin, the rectangle's origin becomes
/// `anchor - size`.
///
/// `ratio` must be positive and finite.
pub(crate) fn constrain_to_ratio(
    anchor: Point,
    growth: (bool, bool),
    width: f64,
    ratio: f64,
    bounds: &Bounds,
) -> Rectangle {
    let (grows_left, grows_up) = growth;

    let room_x = if grows_left {
        anchor.x
    } else {
        bounds.max_width - anchor.x
    };
    let room_y = if grows_up {
        anchor.y
    } else {
        bounds.max_height - anchor.y
    };

    let mut width = width.max(0.0);
    let mut height = width / ratio;
    if width > room_x {
        width = room_x;
        height = width / ratio;
    }
    if height > room_y {
        height = room_y;
        width = height * ratio;
    }
    let left = if grows_left { anchor.x - width } else { anchor.x };
    let top = if grows_up { anchor.y - height } else { anchor.y };

    Rectangle::new(left, top, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> Bounds {
        Bounds::new(800.0, 600.0)
    }

    #[test]
    fn test_drag_up_left() {
        let rect = rect_from_drag(
            Point::new(100.0, 100.0),
            Point::new(50.0, 50.0),
            canvas(),
            false,
        );
        assert_eq!(rect, Rectangle::new(50.0, 50.0, 50.0, 50.0));
    }

    #[test]
    fn test_drag_down_right() {
        let rect = rect_from_drag(
            Point::new(100.0, 100.0),
            Point::new(300.0, 150.0),
            canvas(),
            false,
        );
        assert_eq!(rect, Rectangle::new(100.0, 100.0, 200.0, 50.0));
    }

    #[test]
    fn test_drag_locked_grows_from_anchor() {
        let rect = rect_from_drag(
            Point::new(100.0, 100.0),
            Point::new(300.0, 150.0),
            canvas(),
            true,
        );
        assert_eq!(rect.width, 200.0);
        assert_eq!(rect.height, 200.0);
        assert_eq!(rect.left, 100.0);
        assert_eq!(rect.top, 100.0);
        assert_eq!(rect.right(), 300.0);
        assert_eq!(rect.bottom(), 300.0);
    }

    #[test]
    fn test_drag_locked_up_left_reanchors_origin() {
        let rect = rect_from_drag(
            Point::new(300.0, 300.0),
            Point::new(250.0, 100.0),
            canvas(),
            true,
        );
        // Larger delta is 200 on the y axis
        assert_eq!(rect, Rectangle::new(100.0, 100.0, 200.0, 200.0));
    }

    #[test]
    fn test_drag_clamps_outside_canvas() {
        let rect = rect_from_drag(
            Point::new(700.0, 500.0),
            Point::new(1200.0, 900.0),
            canvas(),
            false,
        );
        assert_eq!(rect, Rectangle::new(700.0, 500.0, 100.0, 100.0));

        let rect = rect_from_drag(
            Point::new(100.0, 100.0),
            Point::new(-50.0, -80.0),
            canvas(),
            false,
        );
        assert_eq!(rect, Rectangle::new(0.0, 0.0, 100.0, 100.0));
    }

    #[test]
    fn test_drag_locked_limited_by_room() {
        // Near the bottom edge: the square cannot grow past the canvas
        let rect = rect_from_drag(
            Point::new(100.0, 500.0),
            Point::new(300.0, 550.0),
            canvas(),
            true,
        );
        assert_eq!(rect.width, rect.height);
        assert_eq!(rect.width, 100.0);
        assert!(rect.fits_within(&canvas(), 0.0));
    }

    #[test]
    fn test_drag_zero_movement() {
        let rect = rect_from_drag(
            Point::new(100.0, 100.0),
            Point::new(100.0, 100.0),
            canvas(),
            false,
        );
        assert_eq!(rect.width, 0.0);
        assert_eq!(rect.height, 0.0);
        assert!(!rect.is_valid());
    }

    #[test]
    fn test_drag_nan_pointer_falls_back_to_anchor() {
        let rect = rect_from_drag(
            Point::new(100.0, 100.0),
            Point::new(f64::NAN, 200.0),
            canvas(),
            false,
        );
        assert_eq!(rect, Rectangle::new(100.0, 100.0, 0.0, 100.0));
    }

    #[test]
    fn test_drag_empty_canvas() {
        let rect = rect_from_drag(
            Point::new(10.0, 10.0),
            Point::new(50.0, 50.0),
            Bounds::new(0.0, 0.0),
            true,
        );
        assert_eq!(rect, Rectangle::new(0.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn test_drag_has_no_preset_ratio() {
        let rect = rect_from_drag(
            Point::new(0.0, 0.0),
            Point::new(10.0, 20.0),
            canvas(),
            false,
        );
        assert!(rect.preset_ratio.is_none());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
