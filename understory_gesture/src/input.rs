// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Raw input records, as delivered by the host's native event callbacks.
//!
//! Positions are page coordinates; the [`Normalizer`](crate::normalize::Normalizer)
//! subtracts the capture surface offset. Timestamps are milliseconds on any
//! monotonic clock shared with [`Normalizer::advance`](crate::normalize::Normalizer::advance).

use alloc::string::String;

use kurbo::Point;

use crate::event::{KeyKind, Modifiers};

/// The device behind a pointer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PointerKind {
    /// Mouse or trackpad cursor.
    Mouse,
    /// Finger on a touch surface.
    Touch,
    /// Stylus.
    Pen,
}

/// Identifier of a pointer for the duration of one contact.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PointerId(pub u64);

/// What happened to the pointer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PointerAction {
    /// Contact started (button pressed or finger down).
    Down,
    /// Contact moved.
    Move,
    /// Contact ended.
    Up,
    /// Contact was taken away by the platform.
    Cancel,
}

/// A pointer contact sample, fed to the gesture recognizer.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerInput {
    /// Which contact.
    pub id: PointerId,
    /// Device kind.
    pub kind: PointerKind,
    /// Transition.
    pub action: PointerAction,
    /// Page position.
    pub page: Point,
    /// Timestamp in milliseconds.
    pub time: u64,
    /// Modifiers.
    pub modifiers: Modifiers,
    /// `false` when the native event's composed path no longer contains the
    /// capture surface, e.g. because an overlay consumed it.
    pub reached_surface: bool,
}

impl PointerInput {
    /// A sample that reached the capture surface, with no modifiers.
    pub fn new(id: u64, kind: PointerKind, action: PointerAction, page: Point, time: u64) -> Self {
        Self {
            id: PointerId(id),
            kind,
            action,
            page,
            time,
            modifiers: Modifiers::empty(),
            reached_surface: true,
        }
    }

    /// Builder-style modifiers setter.
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Builder-style setter for [`PointerInput::reached_surface`].
    #[must_use]
    pub fn with_reached_surface(mut self, reached: bool) -> Self {
        self.reached_surface = reached;
        self
    }
}

/// A hover sample (mouse move, enter, leave, context menu).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointInput {
    /// Page position.
    pub page: Point,
    /// Modifiers.
    pub modifiers: Modifiers,
}

impl PointInput {
    /// A sample at `page` with no modifiers.
    pub fn at(page: Point) -> Self {
        Self {
            page,
            modifiers: Modifiers::empty(),
        }
    }
}

/// Unit of a native wheel delta.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum WheelDeltaMode {
    /// Pixels.
    #[default]
    Pixel,
    /// Lines of text.
    Line,
    /// Pages.
    Page,
}

/// A native wheel sample.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WheelInput {
    /// Page position.
    pub page: Point,
    /// Native vertical delta; positive scrolls down (towards the user).
    pub delta_y: f64,
    /// Unit of `delta_y`.
    pub mode: WheelDeltaMode,
    /// Modifiers.
    pub modifiers: Modifiers,
}

/// A native key sample.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyInput {
    /// Pressed or released.
    pub kind: KeyKind,
    /// Logical key value.
    pub key: String,
    /// Legacy numeric key code.
    pub code: u32,
    /// Modifiers.
    pub modifiers: Modifiers,
}

/// Everything the capture surface and the document can report.
#[derive(Clone, Debug, PartialEq)]
pub enum RawInput {
    /// Pointer contact, routed through the gesture recognizer.
    Pointer(PointerInput),
    /// Native mouse move on the surface.
    MouseMove(PointInput),
    /// Native mouse enter on the surface.
    MouseEnter(PointInput),
    /// Native mouse leave on the surface.
    MouseLeave(PointInput),
    /// Native context menu request on the surface.
    ContextMenu(PointInput),
    /// Native wheel on the surface.
    Wheel(WheelInput),
    /// Document-level key event.
    Key(KeyInput),
}
