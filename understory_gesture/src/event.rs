// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canonical UI events: the modality-independent records produced by the
//! [`Normalizer`](crate::normalize::Normalizer).
//!
//! Every variant except [`UiEvent::Key`] carries a screen coordinate
//! `(sx, sy)` in capture-surface space. Routers rewrite it into target-local
//! space exactly once, with [`UiEvent::relativized`], before dispatch.

use alloc::string::String;

use kurbo::Point;

pub use understory_event_state::moves::MoveKind;
pub use understory_event_state::phase::PhaseStep;

bitflags::bitflags! {
    /// Keyboard modifiers held while the event was produced.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Shift key.
        const SHIFT = 0b0000_0001;
        /// Control key.
        const CTRL  = 0b0000_0010;
        /// Alt / Option key.
        const ALT   = 0b0000_0100;
        /// Meta / Command key.
        const META  = 0b0000_1000;
    }
}

/// A phase of a single pointer drag.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PanEvent {
    /// Gesture phase.
    pub phase: PhaseStep,
    /// Screen x.
    pub sx: f64,
    /// Screen y.
    pub sy: f64,
    /// Cumulative x offset since the gesture started.
    pub delta_x: f64,
    /// Cumulative y offset since the gesture started.
    pub delta_y: f64,
    /// Modifiers.
    pub modifiers: Modifiers,
}

/// A phase of a two pointer scale gesture.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PinchEvent {
    /// Gesture phase.
    pub phase: PhaseStep,
    /// Screen x.
    pub sx: f64,
    /// Screen y.
    pub sy: f64,
    /// Distance between the pointers relative to the start distance.
    pub scale: f64,
    /// Modifiers.
    pub modifiers: Modifiers,
}

/// A phase of a two pointer rotation gesture.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RotateEvent {
    /// Gesture phase.
    pub phase: PhaseStep,
    /// Screen x.
    pub sx: f64,
    /// Screen y.
    pub sy: f64,
    /// Rotation since the start, in degrees.
    pub rotation: f64,
    /// Modifiers.
    pub modifiers: Modifiers,
}

/// Which discrete gesture a [`TapEvent`] reports.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TapKind {
    /// A confirmed single tap.
    Tap,
    /// Two taps in quick succession.
    DoubleTap,
    /// A long press.
    Press,
    /// Release after a long press.
    PressUp,
}

/// A discrete gesture.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TapEvent {
    /// Which gesture.
    pub kind: TapKind,
    /// Screen x.
    pub sx: f64,
    /// Screen y.
    pub sy: f64,
    /// Modifiers.
    pub modifiers: Modifiers,
}

/// Pointer hover movement, including enter and leave.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MoveEvent {
    /// Enter, move or leave.
    pub kind: MoveKind,
    /// Screen x.
    pub sx: f64,
    /// Screen y.
    pub sy: f64,
    /// Modifiers.
    pub modifiers: Modifiers,
}

/// Wheel input.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScrollEvent {
    /// Screen x.
    pub sx: f64,
    /// Screen y.
    pub sy: f64,
    /// Vertical delta in pixels; positive scrolls up (away from the user).
    pub delta: f64,
    /// Modifiers.
    pub modifiers: Modifiers,
}

/// Key transition direction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum KeyKind {
    /// Key pressed.
    Down,
    /// Key released.
    Up,
}

/// Keyboard input. Keys carry no screen position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    /// Pressed or released.
    pub kind: KeyKind,
    /// Logical key value, e.g. `"Escape"` or `"a"`.
    pub key: String,
    /// Legacy numeric key code.
    pub code: u32,
    /// Modifiers.
    pub modifiers: Modifiers,
}

/// The canonical UI event.
#[derive(Clone, Debug, PartialEq)]
pub enum UiEvent {
    /// Pan start, update or end.
    Pan(PanEvent),
    /// Pinch start, update or end.
    Pinch(PinchEvent),
    /// Rotate start, update or end.
    Rotate(RotateEvent),
    /// Tap, double tap, press or press up.
    Tap(TapEvent),
    /// Pointer enter, move or leave.
    Move(MoveEvent),
    /// Wheel.
    Scroll(ScrollEvent),
    /// Key down or up.
    Key(KeyEvent),
}

impl UiEvent {
    /// Screen position, or `None` for key events.
    pub fn position(&self) -> Option<Point> {
        let (sx, sy) = match self {
            Self::Pan(e) => (e.sx, e.sy),
            Self::Pinch(e) => (e.sx, e.sy),
            Self::Rotate(e) => (e.sx, e.sy),
            Self::Tap(e) => (e.sx, e.sy),
            Self::Move(e) => (e.sx, e.sy),
            Self::Scroll(e) => (e.sx, e.sy),
            Self::Key(_) => return None,
        };
        Some(Point::new(sx, sy))
    }

    /// Modifiers held for this event.
    pub fn modifiers(&self) -> Modifiers {
        match self {
            Self::Pan(e) => e.modifiers,
            Self::Pinch(e) => e.modifiers,
            Self::Rotate(e) => e.modifiers,
            Self::Tap(e) => e.modifiers,
            Self::Move(e) => e.modifiers,
            Self::Scroll(e) => e.modifiers,
            Self::Key(e) => e.modifiers,
        }
    }

    /// The gesture phase, for pan, pinch and rotate.
    pub fn phase(&self) -> Option<PhaseStep> {
        match self {
            Self::Pan(e) => Some(e.phase),
            Self::Pinch(e) => Some(e.phase),
            Self::Rotate(e) => Some(e.phase),
            _ => None,
        }
    }

    /// Return a copy with the screen position mapped through `map`.
    ///
    /// Key events are returned unchanged.
    #[must_use]
    pub fn relativized(mut self, map: impl FnOnce(Point) -> Point) -> Self {
        let Some(pos) = self.position() else {
            return self;
        };
        let Point { x, y } = map(pos);
        let slots = match &mut self {
            Self::Pan(e) => Some((&mut e.sx, &mut e.sy)),
            Self::Pinch(e) => Some((&mut e.sx, &mut e.sy)),
            Self::Rotate(e) => Some((&mut e.sx, &mut e.sy)),
            Self::Tap(e) => Some((&mut e.sx, &mut e.sy)),
            Self::Move(e) => Some((&mut e.sx, &mut e.sy)),
            Self::Scroll(e) => Some((&mut e.sx, &mut e.sy)),
            Self::Key(_) => None,
        };
        if let Some((sx, sy)) = slots {
            *sx = x;
            *sy = y;
        }
        self
    }
}
