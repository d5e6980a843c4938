//! Pointer and keyboard gesture state machine.
//!
//! A gesture runs `Idle -> Dragging -> Idle`. Pointer-down over empty canvas
//! records an anchor; each pointer-move farther than the drag threshold
//! (Manhattan distance) produces a new rectangle through
//! [`rect_from_drag`](crate::geometry::rect_from_drag); pointer-up finalizes.
//!
//! The shift flag is tracked separately from the gesture. It is read by every
//! drag computation and reset only when the session ends.
//!
//! This module decides *what* happens; the session controller applies the
//! results to the zone and the surface.

use crate::geometry::{rect_from_drag, Rectangle};
use crate::{Bounds, Point};
use serde::{Deserialize, Serialize};

/// Keys the state machine distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Key {
    Shift,
    Other,
}

/// A raw input event. Pointer coordinates are in host space and are mapped
/// to canvas space by the surface before use.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum InputEvent {
    PointerDown { x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp { x: f64, y: f64 },
    KeyDown { key: Key },
    KeyUp { key: Key },
}

/// Per-drag data, alive between pointer-down and pointer-up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureState {
    pub anchor: Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum Phase {
    #[default]
    Idle,
    Dragging(GestureState),
}

/// Gesture tracking for one crop session.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionState {
    phase: Phase,
    shift_held: bool,
    threshold: f64,
}

impl InteractionState {
    pub fn new(threshold: f64) -> Self {
        Self {
            phase: Phase::Idle,
            shift_held: false,
            threshold,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, Phase::Dragging(_))
    }

    /// Aspect lock flag.
    pub fn shift_held(&self) -> bool {
        self.shift_held
    }

    pub fn gesture(&self) -> Option<GestureState> {
        match self.phase {
            Phase::Dragging(gesture) => Some(gesture),
            Phase::Idle => None,
        }
    }

    /// Begin a drag at `point` (canvas space).
    ///
    /// Returns `false` without changing state when the pointer is over an
    /// existing target or a drag is already running.
    pub fn pointer_down(&mut self, point: Point, over_target: bool) -> bool {
        if over_target || self.is_dragging() {
            return false;
        }
        if !point.x.is_finite() || !point.y.is_finite() {
            return false;
        }
        self.phase = Phase::Dragging(GestureState { anchor: point });
        true
    }

    /// Compute the rectangle for a pointer move, if the drag is past the
    /// threshold.
    pub fn pointer_move(&self, point: Point, bounds: Bounds) -> Option<Rectangle> {
        let gesture = self.gesture()?;
        let distance = gesture.anchor.manhattan_distance(&point);
        if distance.is_nan() || distance <= self.threshold {
            return None;
        }
        Some(rect_from_drag(
            gesture.anchor,
            point,
            bounds,
            self.shift_held,
        ))
    }

    /// Finish the current drag. Returns whether one was running.
    pub fn pointer_up(&mut self) -> bool {
        let was_dragging = self.is_dragging();
        self.phase = Phase::Idle;
        was_dragging
    }

    pub fn key_down(&mut self, key: Key) {
        if key == Key::Shift {
            self.shift_held = true;
        }
    }

    pub fn key_up(&mut self, key: Key) {
        if key == Key::Shift {
            self.shift_held = false;
        }
    }

    /// Return to idle with the aspect lock off.
    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.shift_held = false;
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
