// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_gesture --heading-base-level=0

//! Understory Gesture: raw input to canonical UI events.
//!
//! ## Overview
//!
//! A plot canvas receives pointer, touch, pen, wheel and key input from the
//! host. This crate turns that stream into one [`UiEvent`](event::UiEvent) per
//! recognized step, independent of the input device:
//!
//! - [`input`]: raw records in page coordinates, as the host reports them.
//! - [`recognizer`]: the [`Recognizer`](recognizer::Recognizer) seam and the
//!   built-in [`PointerRecognizer`](recognizer::PointerRecognizer) for tap,
//!   double tap, press, press up, pan, pinch and rotate.
//! - [`normalize`]: the [`Normalizer`](normalize::Normalizer), which owns a
//!   recognizer, converts to capture-surface coordinates, and handles hover,
//!   wheel and key input directly.
//! - [`listeners`]: explicit ownership of the native listener registrations
//!   feeding the normalizer, including document-level key listeners.
//!
//! Routing events to plots and tools is left to the caller; see
//! `understory_plot_events`.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::Point;
//! use understory_gesture::event::{PhaseStep, UiEvent};
//! use understory_gesture::input::{PointerAction, PointerInput, PointerKind, RawInput};
//! use understory_gesture::normalize::Normalizer;
//!
//! let mut normalizer = Normalizer::default();
//! normalizer.set_surface_offset(Point::new(8.0, 8.0));
//!
//! let sample = |action, x, t| {
//!     RawInput::Pointer(PointerInput::new(1, PointerKind::Mouse, action, Point::new(x, 108.0), t))
//! };
//! let mut out = Vec::new();
//! normalizer.handle(&sample(PointerAction::Down, 208.0, 0), &mut out);
//! normalizer.handle(&sample(PointerAction::Move, 240.0, 16), &mut out);
//!
//! // The pan starts where the pointer went down, in surface coordinates.
//! let UiEvent::Pan(pan) = &out[0].event else { unreachable!() };
//! assert_eq!(pan.phase, PhaseStep::Start);
//! assert_eq!((pan.sx, pan.sy), (200.0, 100.0));
//! ```
//!
//! This crate is `no_std` compatible (with `alloc`).

#![no_std]

extern crate alloc;

pub mod event;
pub mod input;
pub mod listeners;
pub mod normalize;
pub mod recognizer;
