// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input normalization: raw input to [`UiEvent`]s in capture-surface space.
//!
//! The [`Normalizer`] owns a [`Recognizer`] and routes pointer contacts through
//! it. Hover, wheel and key input bypass recognition and map one to one.
//!
//! Coordinate rules:
//! - Screen coordinates are page coordinates minus the capture surface offset
//!   ([`Normalizer::set_surface_offset`]).
//! - Touch gestures report the first contact still down, or the first contact
//!   that just lifted when none remain.
//! - A pan start is reported at the gesture origin: the recognized point is
//!   moved back by the offset accumulated while crossing the pan threshold.
//! - Wheel deltas are converted to pixels and sign flipped, so a positive
//!   [`ScrollEvent::delta`] scrolls up.

use alloc::boxed::Box;
use alloc::vec::Vec;

use kurbo::{Point, Vec2};

use crate::event::{
    KeyEvent, MoveEvent, MoveKind, PanEvent, PhaseStep, PinchEvent, RotateEvent, ScrollEvent,
    TapEvent, TapKind, UiEvent,
};
use crate::input::{PointInput, PointerKind, RawInput, WheelDeltaMode, WheelInput};
use crate::recognizer::{GestureType, PointerRecognizer, Recognized, Recognizer};

/// Unit conversions for wheel input.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct NormalizerConfig {
    /// Pixels per wheel line.
    pub line_height: f64,
    /// Pixels per wheel page.
    pub page_height: f64,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            line_height: 16.0,
            page_height: 600.0,
        }
    }
}

impl NormalizerConfig {
    /// Set the pixel height of a wheel line.
    #[must_use]
    pub fn with_line_height(mut self, line_height: f64) -> Self {
        self.line_height = line_height;
        self
    }

    /// Set the pixel height of a wheel page.
    #[must_use]
    pub fn with_page_height(mut self, page_height: f64) -> Self {
        self.page_height = page_height;
        self
    }
}

/// Facts about the raw input behind a [`Normalized`] event that routers need
/// but that are not part of the canonical record.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SourceInfo {
    /// Whether the native event still reached the capture surface.
    pub reached_surface: bool,
    /// Pointer device, for pointer-derived events.
    pub pointer_kind: Option<PointerKind>,
}

impl SourceInfo {
    const DIRECT: Self = Self {
        reached_surface: true,
        pointer_kind: None,
    };
}

/// A canonical event plus its [`SourceInfo`].
#[derive(Clone, Debug, PartialEq)]
pub struct Normalized {
    /// The canonical event, in capture-surface coordinates.
    pub event: UiEvent,
    /// Where it came from.
    pub source: SourceInfo,
}

/// Converts raw input into canonical events.
pub struct Normalizer {
    recognizer: Box<dyn Recognizer>,
    config: NormalizerConfig,
    offset: Vec2,
    scratch: Vec<Recognized>,
}

impl core::fmt::Debug for Normalizer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Normalizer")
            .field("recognizer", self.recognizer.config())
            .field("config", &self.config)
            .field("offset", &self.offset)
            .finish_non_exhaustive()
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(
            Box::new(PointerRecognizer::default()),
            NormalizerConfig::default(),
        )
    }
}

impl Normalizer {
    /// Create a normalizer around `recognizer`.
    pub fn new(recognizer: Box<dyn Recognizer>, config: NormalizerConfig) -> Self {
        Self {
            recognizer,
            config,
            offset: Vec2::ZERO,
            scratch: Vec::new(),
        }
    }

    /// The owned recognizer.
    pub fn recognizer(&self) -> &dyn Recognizer {
        self.recognizer.as_ref()
    }

    /// Wheel unit configuration.
    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Record the page position of the capture surface's origin.
    pub fn set_surface_offset(&mut self, origin: Point) {
        self.offset = origin.to_vec2();
    }

    /// Page to capture-surface coordinates.
    pub fn to_screen(&self, page: Point) -> Point {
        page - self.offset
    }

    /// Normalize one raw input, appending the resulting events to `out`.
    ///
    /// Context menu requests produce nothing.
    pub fn handle(&mut self, input: &RawInput, out: &mut Vec<Normalized>) {
        match input {
            RawInput::Pointer(pointer) => {
                let mut recognized = core::mem::take(&mut self.scratch);
                self.recognizer.pointer(pointer, &mut recognized);
                self.flush(&mut recognized, out);
                self.scratch = recognized;
            }
            RawInput::MouseMove(p) => out.push(self.hover(MoveKind::Move, p)),
            RawInput::MouseEnter(p) => out.push(self.hover(MoveKind::Enter, p)),
            RawInput::MouseLeave(p) => out.push(self.hover(MoveKind::Leave, p)),
            RawInput::ContextMenu(_) => {}
            RawInput::Wheel(w) => out.push(self.wheel(w)),
            RawInput::Key(k) => out.push(Normalized {
                event: UiEvent::Key(KeyEvent {
                    kind: k.kind,
                    key: k.key.clone(),
                    code: k.code,
                    modifiers: k.modifiers,
                }),
                source: SourceInfo::DIRECT,
            }),
        }
    }

    /// Let time pass, appending timer-confirmed gestures to `out`.
    pub fn advance(&mut self, now: u64, out: &mut Vec<Normalized>) {
        let mut recognized = core::mem::take(&mut self.scratch);
        self.recognizer.advance(now, &mut recognized);
        self.flush(&mut recognized, out);
        self.scratch = recognized;
    }

    /// Abandon every contact and pending recognition.
    pub fn reset(&mut self) {
        self.recognizer.reset();
    }

    fn flush(&self, recognized: &mut Vec<Recognized>, out: &mut Vec<Normalized>) {
        out.extend(recognized.drain(..).map(|r| Normalized {
            event: self.gesture(&r),
            source: SourceInfo {
                reached_surface: r.reached_surface,
                pointer_kind: Some(r.pointer_kind),
            },
        }));
    }

    fn gesture(&self, r: &Recognized) -> UiEvent {
        let page = match r.pointer_kind {
            PointerKind::Touch => r
                .touches
                .first()
                .or(r.changed.first())
                .copied()
                .unwrap_or(r.src),
            PointerKind::Mouse | PointerKind::Pen => r.src,
        };
        let Point { x: sx, y: sy } = self.to_screen(page);
        let modifiers = r.modifiers;
        match r.gesture {
            GestureType::Pan(phase) => {
                let (sx, sy) = if phase == PhaseStep::Start {
                    (sx - r.delta.x, sy - r.delta.y)
                } else {
                    (sx, sy)
                };
                UiEvent::Pan(PanEvent {
                    phase,
                    sx,
                    sy,
                    delta_x: r.delta.x,
                    delta_y: r.delta.y,
                    modifiers,
                })
            }
            GestureType::Pinch(phase) => UiEvent::Pinch(PinchEvent {
                phase,
                sx,
                sy,
                scale: r.scale,
                modifiers,
            }),
            GestureType::Rotate(phase) => UiEvent::Rotate(RotateEvent {
                phase,
                sx,
                sy,
                rotation: r.rotation,
                modifiers,
            }),
            GestureType::Tap => tap(TapKind::Tap, sx, sy, r),
            GestureType::DoubleTap => tap(TapKind::DoubleTap, sx, sy, r),
            GestureType::Press => tap(TapKind::Press, sx, sy, r),
            GestureType::PressUp => tap(TapKind::PressUp, sx, sy, r),
        }
    }

    fn hover(&self, kind: MoveKind, p: &PointInput) -> Normalized {
        let Point { x: sx, y: sy } = self.to_screen(p.page);
        Normalized {
            event: UiEvent::Move(MoveEvent {
                kind,
                sx,
                sy,
                modifiers: p.modifiers,
            }),
            source: SourceInfo {
                reached_surface: true,
                pointer_kind: Some(PointerKind::Mouse),
            },
        }
    }

    fn wheel(&self, w: &WheelInput) -> Normalized {
        let Point { x: sx, y: sy } = self.to_screen(w.page);
        let pixels = match w.mode {
            WheelDeltaMode::Pixel => w.delta_y,
            WheelDeltaMode::Line => w.delta_y * self.config.line_height,
            WheelDeltaMode::Page => w.delta_y * self.config.page_height,
        };
        Normalized {
            event: UiEvent::Scroll(ScrollEvent {
                sx,
                sy,
                delta: -pixels,
                modifiers: w.modifiers,
            }),
            source: SourceInfo {
                reached_surface: true,
                pointer_kind: Some(PointerKind::Mouse),
            },
        }
    }
}

fn tap(kind: TapKind, sx: f64, sy: f64, r: &Recognized) -> UiEvent {
    UiEvent::Tap(TapEvent {
        kind,
        sx,
        sy,
        modifiers: r.modifiers,
    })
}
