// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gesture recognition: pointer contact sequences to tap, press, pan, pinch and rotate.
//!
//! The [`Recognizer`] trait is the seam between the normalizer and whatever
//! low-level engine turns contact samples into gestures. [`PointerRecognizer`]
//! is the built-in engine. Its rules:
//!
//! - **Tap / double tap**: a contact released within `tap_time` after moving
//!   at most `tap_threshold` is a tap candidate. A second candidate within
//!   `double_tap_interval` and `double_tap_distance` of the first is a double
//!   tap. With `double_tap_preempts_tap` (the default), a single tap is held
//!   back until the double tap window has elapsed without a second tap, so a
//!   double tap never also reports a tap.
//! - **Press / press up**: a contact held for `press_time` without moving
//!   more than `press_threshold` is a press; its release is a press up.
//! - **Pan**: a single contact that travels more than `pan_threshold`. Deltas
//!   are cumulative from the contact's origin.
//! - **Pinch / rotate**: two contacts. With `simultaneous_transforms` (the
//!   default) both can be in flight at once; otherwise the first to start wins.
//!   A second contact ends an in-flight pan.
//!
//! Timer-driven decisions (tap confirmation, press) happen in
//! [`Recognizer::advance`], which the host calls from a timer and which is also
//! applied implicitly before each contact sample.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::Point;
//! use understory_gesture::input::{PointerAction, PointerInput, PointerKind};
//! use understory_gesture::recognizer::{GestureType, PointerRecognizer, Recognizer};
//!
//! let mut r = PointerRecognizer::default();
//! let mut out = Vec::new();
//! let at = Point::new(10.0, 10.0);
//! r.pointer(&PointerInput::new(1, PointerKind::Touch, PointerAction::Down, at, 0), &mut out);
//! r.pointer(&PointerInput::new(1, PointerKind::Touch, PointerAction::Up, at, 50), &mut out);
//! assert!(out.is_empty()); // waiting for a possible second tap
//!
//! r.advance(400, &mut out);
//! assert_eq!(out[0].gesture, GestureType::Tap);
//! ```

use alloc::vec::Vec;

use kurbo::{Point, Vec2};
use smallvec::SmallVec;
use understory_event_state::drag::DragState;
use understory_event_state::phase::PhaseStep;

use crate::event::Modifiers;
use crate::input::{PointerAction, PointerId, PointerInput, PointerKind};

/// A recognized gesture and its phase.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GestureType {
    /// Confirmed single tap.
    Tap,
    /// Double tap.
    DoubleTap,
    /// Long press.
    Press,
    /// Release of a long press.
    PressUp,
    /// Single contact drag.
    Pan(PhaseStep),
    /// Two contact scale.
    Pinch(PhaseStep),
    /// Two contact rotation.
    Rotate(PhaseStep),
}

/// Recognizer output for one gesture step.
#[derive(Clone, Debug, PartialEq)]
pub struct Recognized {
    /// What was recognized.
    pub gesture: GestureType,
    /// Device of the contacts.
    pub pointer_kind: PointerKind,
    /// Page position of the sample that produced this step.
    pub src: Point,
    /// Page positions of the contacts still down, in contact order.
    pub touches: SmallVec<[Point; 2]>,
    /// Page positions of the contacts that changed with this sample.
    pub changed: SmallVec<[Point; 2]>,
    /// Cumulative pan offset.
    pub delta: Vec2,
    /// Pinch scale, `1.0` when not pinching.
    pub scale: f64,
    /// Rotation in degrees, `0.0` when not rotating.
    pub rotation: f64,
    /// Modifiers of the producing sample.
    pub modifiers: Modifiers,
    /// Whether the producing sample reached the capture surface.
    pub reached_surface: bool,
    /// Timestamp of the producing sample.
    pub time: u64,
}

/// Thresholds and exclusivity rules for gesture recognition.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RecognizerConfig {
    /// Longest contact, in milliseconds, that can still be a tap.
    pub tap_time: u64,
    /// Farthest travel, in pixels, that can still be a tap.
    pub tap_threshold: f64,
    /// Longest gap between two taps of a double tap.
    pub double_tap_interval: u64,
    /// Farthest distance between two taps of a double tap.
    pub double_tap_distance: f64,
    /// Hold time before a press is recognized.
    pub press_time: u64,
    /// Farthest travel that still allows a press.
    pub press_threshold: f64,
    /// Travel needed before a pan starts.
    pub pan_threshold: f64,
    /// Scale change needed before a pinch starts.
    pub pinch_threshold: f64,
    /// Rotation, in degrees, needed before a rotate starts.
    pub rotate_threshold: f64,
    /// Hold single taps back until the double tap window elapses.
    pub double_tap_preempts_tap: bool,
    /// Allow pinch and rotate to be recognized together.
    pub simultaneous_transforms: bool,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            tap_time: 250,
            tap_threshold: 9.0,
            double_tap_interval: 300,
            double_tap_distance: 10.0,
            press_time: 251,
            press_threshold: 9.0,
            pan_threshold: 10.0,
            pinch_threshold: 0.0,
            rotate_threshold: 0.0,
            double_tap_preempts_tap: true,
            simultaneous_transforms: true,
        }
    }
}

impl RecognizerConfig {
    /// Set whether single taps wait for the double tap window.
    #[must_use]
    pub fn with_double_tap_preempts_tap(mut self, preempts: bool) -> Self {
        self.double_tap_preempts_tap = preempts;
        self
    }

    /// Set whether pinch and rotate may run together.
    #[must_use]
    pub fn with_simultaneous_transforms(mut self, simultaneous: bool) -> Self {
        self.simultaneous_transforms = simultaneous;
        self
    }

    /// Set the pan start threshold.
    #[must_use]
    pub fn with_pan_threshold(mut self, threshold: f64) -> Self {
        self.pan_threshold = threshold;
        self
    }
}

/// A gesture recognition engine.
pub trait Recognizer {
    /// Active configuration.
    fn config(&self) -> &RecognizerConfig;

    /// Feed one contact sample, appending recognized steps to `out`.
    fn pointer(&mut self, input: &PointerInput, out: &mut Vec<Recognized>);

    /// Let time pass without input, appending timer-driven steps to `out`.
    fn advance(&mut self, now: u64, out: &mut Vec<Recognized>);

    /// Drop every tracked contact and pending decision.
    fn reset(&mut self);
}

#[derive(Copy, Clone, Debug, PartialEq)]
struct Contact {
    id: PointerId,
    pos: Point,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum PressState {
    Idle,
    Pending { deadline: u64 },
    Fired,
    Failed,
}

#[derive(Copy, Clone, Debug, PartialEq)]
struct Transform {
    start_distance: f64,
    start_angle: f64,
    pinch: bool,
    rotate: bool,
}

/// The built-in contact-sequence recognizer.
#[derive(Clone, Debug)]
pub struct PointerRecognizer {
    config: RecognizerConfig,
    kind: PointerKind,
    modifiers: Modifiers,
    contacts: SmallVec<[Contact; 2]>,
    drag: DragState,
    // The current contact sequence never had more than one contact.
    single: bool,
    panning: bool,
    press: PressState,
    transform: Option<Transform>,
    pending_tap: Option<Recognized>,
    last_tap: Option<(Point, u64)>,
}

impl Default for PointerRecognizer {
    fn default() -> Self {
        Self::new(RecognizerConfig::default())
    }
}

impl PointerRecognizer {
    /// Create a recognizer with the given configuration.
    pub fn new(config: RecognizerConfig) -> Self {
        Self {
            config,
            kind: PointerKind::Mouse,
            modifiers: Modifiers::empty(),
            contacts: SmallVec::new(),
            drag: DragState::default(),
            single: false,
            panning: false,
            press: PressState::Idle,
            transform: None,
            pending_tap: None,
            last_tap: None,
        }
    }

    /// Number of contacts currently down.
    pub fn contact_count(&self) -> usize {
        self.contacts.len()
    }

    /// Returns `true` while a single tap waits for the double tap window.
    pub fn has_pending_tap(&self) -> bool {
        self.pending_tap.is_some()
    }

    fn step(&self, gesture: GestureType, changed: Point, time: u64, reached: bool) -> Recognized {
        let (scale, rotation) = self.transform_values();
        Recognized {
            gesture,
            pointer_kind: self.kind,
            src: changed,
            touches: self.contacts.iter().map(|c| c.pos).collect(),
            changed: SmallVec::from_slice(&[changed]),
            delta: self.drag.total_offset().unwrap_or(Vec2::ZERO),
            scale,
            rotation,
            modifiers: self.modifiers,
            reached_surface: reached,
            time,
        }
    }

    /// Distance and angle (degrees) between the first two contacts.
    fn span(&self) -> Option<(f64, f64)> {
        let [a, b] = [self.contacts.first()?, self.contacts.get(1)?];
        let v = b.pos - a.pos;
        Some((v.hypot(), v.atan2().to_degrees()))
    }

    fn transform_values(&self) -> (f64, f64) {
        match (self.transform, self.span()) {
            (Some(t), Some((distance, angle))) => {
                let scale = if t.start_distance > 0.0 {
                    distance / t.start_distance
                } else {
                    1.0
                };
                (scale, angle - t.start_angle)
            }
            _ => (1.0, 0.0),
        }
    }

    fn down(&mut self, input: &PointerInput, out: &mut Vec<Recognized>) {
        if self.contacts.iter().any(|c| c.id == input.id) {
            return;
        }
        self.contacts.push(Contact {
            id: input.id,
            pos: input.page,
        });
        if self.contacts.len() == 1 {
            self.drag.start(input.page, input.time);
            self.single = true;
            self.panning = false;
            self.press = PressState::Pending {
                deadline: input.time.saturating_add(self.config.press_time),
            };
            return;
        }

        // Another contact turns the sequence into a transform gesture.
        if self.single {
            if self.panning {
                out.push(self.step(
                    GestureType::Pan(PhaseStep::End),
                    input.page,
                    input.time,
                    input.reached_surface,
                ));
                self.panning = false;
            }
            if self.press == PressState::Fired {
                out.push(self.step(
                    GestureType::PressUp,
                    input.page,
                    input.time,
                    input.reached_surface,
                ));
            }
        }
        self.single = false;
        self.press = PressState::Failed;
        if self.contacts.len() == 2 {
            if let Some((start_distance, start_angle)) = self.span() {
                self.transform = Some(Transform {
                    start_distance,
                    start_angle,
                    pinch: false,
                    rotate: false,
                });
            }
        }
    }

    fn moved(&mut self, input: &PointerInput, out: &mut Vec<Recognized>) {
        let Some(contact) = self.contacts.iter_mut().find(|c| c.id == input.id) else {
            return;
        };
        contact.pos = input.page;
        let reached = input.reached_surface;

        if self.single {
            self.drag.update(input.page);
            if matches!(self.press, PressState::Pending { .. })
                && self.drag.travel() > self.config.press_threshold
            {
                self.press = PressState::Failed;
            }
            let offset = self.drag.total_offset().unwrap_or(Vec2::ZERO);
            if self.panning {
                out.push(self.step(
                    GestureType::Pan(PhaseStep::Update),
                    input.page,
                    input.time,
                    reached,
                ));
            } else if offset.hypot() > self.config.pan_threshold {
                self.panning = true;
                out.push(self.step(
                    GestureType::Pan(PhaseStep::Start),
                    input.page,
                    input.time,
                    reached,
                ));
            }
            return;
        }

        let Some(mut t) = self.transform else {
            return;
        };
        let (scale, rotation) = self.transform_values();
        let simultaneous = self.config.simultaneous_transforms;
        let mut steps: SmallVec<[GestureType; 2]> = SmallVec::new();
        if t.pinch {
            steps.push(GestureType::Pinch(PhaseStep::Update));
        } else if (scale - 1.0).abs() > self.config.pinch_threshold && (simultaneous || !t.rotate)
        {
            t.pinch = true;
            steps.push(GestureType::Pinch(PhaseStep::Start));
        }
        if t.rotate {
            steps.push(GestureType::Rotate(PhaseStep::Update));
        } else if rotation.abs() > self.config.rotate_threshold && (simultaneous || !t.pinch) {
            t.rotate = true;
            steps.push(GestureType::Rotate(PhaseStep::Start));
        }
        self.transform = Some(t);
        for gesture in steps {
            out.push(self.step(gesture, input.page, input.time, reached));
        }
    }

    fn up(&mut self, input: &PointerInput, cancelled: bool, out: &mut Vec<Recognized>) {
        let Some(idx) = self.contacts.iter().position(|c| c.id == input.id) else {
            return;
        };
        self.contacts[idx].pos = input.page;
        let reached = input.reached_surface;

        if self.single {
            self.drag.update(input.page);
            let was_panning = self.panning;
            if was_panning {
                out.push(self.step(
                    GestureType::Pan(PhaseStep::End),
                    input.page,
                    input.time,
                    reached,
                ));
                self.panning = false;
            }
            if self.press == PressState::Fired {
                out.push(self.step(GestureType::PressUp, input.page, input.time, reached));
            } else if !cancelled && !was_panning && self.is_tap_candidate(input.time) {
                self.contacts.remove(idx);
                self.tap(input, out);
                self.finish_if_idle();
                return;
            }
        } else if self.contacts.len() == 2 {
            if let Some(t) = self.transform {
                // Values are measured before the contact is removed.
                let (scale, rotation) = self.transform_values();
                self.transform = None;
                self.contacts.remove(idx);
                let phases = [
                    (t.pinch, GestureType::Pinch(PhaseStep::End)),
                    (t.rotate, GestureType::Rotate(PhaseStep::End)),
                ];
                for (_, gesture) in phases.into_iter().filter(|(active, _)| *active) {
                    let mut end = self.step(gesture, input.page, input.time, reached);
                    end.scale = scale;
                    end.rotation = rotation;
                    out.push(end);
                }
                self.finish_if_idle();
                return;
            }
        }
        self.contacts.remove(idx);
        self.finish_if_idle();
    }

    fn is_tap_candidate(&self, now: u64) -> bool {
        let quick = self
            .drag
            .elapsed(now)
            .is_some_and(|elapsed| elapsed < self.config.tap_time);
        quick && self.drag.travel() <= self.config.tap_threshold
    }

    fn tap(&mut self, input: &PointerInput, out: &mut Vec<Recognized>) {
        let mut tap = self.step(
            GestureType::Tap,
            input.page,
            input.time,
            input.reached_surface,
        );
        if let Some((last_pos, last_time)) = self.last_tap {
            let in_time = input.time.saturating_sub(last_time) <= self.config.double_tap_interval;
            let in_place = (input.page - last_pos).hypot() <= self.config.double_tap_distance;
            if in_time && in_place {
                self.pending_tap = None;
                self.last_tap = None;
                tap.gesture = GestureType::DoubleTap;
                out.push(tap);
                return;
            }
        }
        if let Some(pending) = self.pending_tap.take() {
            out.push(pending);
        }
        self.last_tap = Some((input.page, input.time));
        if self.config.double_tap_preempts_tap {
            self.pending_tap = Some(tap);
        } else {
            out.push(tap);
        }
    }

    fn finish_if_idle(&mut self) {
        if self.contacts.is_empty() {
            self.drag.end();
            self.single = false;
            self.panning = false;
            self.press = PressState::Idle;
            self.transform = None;
        }
    }
}

impl Recognizer for PointerRecognizer {
    fn config(&self) -> &RecognizerConfig {
        &self.config
    }

    fn pointer(&mut self, input: &PointerInput, out: &mut Vec<Recognized>) {
        self.advance(input.time, out);
        self.kind = input.kind;
        self.modifiers = input.modifiers;
        match input.action {
            PointerAction::Down => self.down(input, out),
            PointerAction::Move => self.moved(input, out),
            PointerAction::Up => self.up(input, false, out),
            PointerAction::Cancel => self.up(input, true, out),
        }
    }

    fn advance(&mut self, now: u64, out: &mut Vec<Recognized>) {
        let window = self.config.double_tap_interval;
        if self
            .pending_tap
            .as_ref()
            .is_some_and(|tap| now > tap.time.saturating_add(window))
        {
            if let Some(tap) = self.pending_tap.take() {
                out.push(tap);
            }
            self.last_tap = None;
        }
        if let PressState::Pending { deadline } = self.press {
            if now >= deadline && self.single {
                if let Some(contact) = self.contacts.first().copied() {
                    self.press = PressState::Fired;
                    out.push(self.step(GestureType::Press, contact.pos, now, true));
                }
            }
        }
    }

    fn reset(&mut self) {
        *self = Self::new(self.config);
    }
}
