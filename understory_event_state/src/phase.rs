// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gesture phase slots: remember which target owns a multi-phase gesture.
//!
//! ## Usage
//!
//! 1) On a *start* phase, hit test the start coordinate and pass the result to
//!    [`GestureSlot::step`] with [`PhaseStep::Start`].
//! 2) On *update* and *end* phases, pass [`PhaseStep::Update`] or
//!    [`PhaseStep::End`]; the hit test result is ignored and the target
//!    recorded at start is returned instead.
//! 3) A `None` return means "drop the event".
//!
//! [`GestureSlots`] bundles one slot per [`PhaseGesture`] so pan, pinch and
//! rotate can be in flight at the same time without interfering.

/// The multi-phase gesture categories that own a slot.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PhaseGesture {
    /// Single pointer drag.
    Pan,
    /// Two pointer scale.
    Pinch,
    /// Two pointer rotation.
    Rotate,
}

impl PhaseGesture {
    /// All slot-owning gestures, in slot order.
    pub const ALL: [Self; 3] = [Self::Pan, Self::Pinch, Self::Rotate];

    const fn index(self) -> usize {
        match self {
            Self::Pan => 0,
            Self::Pinch => 1,
            Self::Rotate => 2,
        }
    }
}

/// The phase of an incoming gesture event.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PhaseStep {
    /// The gesture was recognized.
    Start,
    /// The gesture continues.
    Update,
    /// The gesture finished.
    End,
}

/// State of a single slot.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum SlotState<P> {
    /// No gesture of this category is in flight.
    #[default]
    Idle,
    /// A gesture is in flight and is routed to the contained target.
    Active(P),
}

/// Tracks the target of one gesture category.
///
/// Transitions:
/// - `Idle --start(hit)--> Active(hit)`; a start without a hit leaves the slot idle.
/// - `Active(p) --start(hit)--> Active(hit)`; a new start overwrites a stale one.
///   A start without a hit resets the slot to idle.
/// - `Active(p) --update--> Active(p)` regardless of what is under the pointer.
/// - `Active(p) --end--> Idle`.
/// - Updates and ends while idle are dropped and leave the slot untouched.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct GestureSlot<P> {
    state: SlotState<P>,
}

impl<P: Copy + Eq> GestureSlot<P> {
    /// Create an idle slot.
    pub const fn new() -> Self {
        Self {
            state: SlotState::Idle,
        }
    }

    /// Current state.
    pub fn state(&self) -> SlotState<P> {
        self.state
    }

    /// The target that owns the in-flight gesture, if any.
    pub fn current(&self) -> Option<P> {
        match self.state {
            SlotState::Idle => None,
            SlotState::Active(p) => Some(p),
        }
    }

    /// Returns `true` while a gesture is in flight.
    pub fn is_active(&self) -> bool {
        matches!(self.state, SlotState::Active(_))
    }

    /// Advance the slot and return the target the event should be routed to.
    ///
    /// `hit` is only consulted for [`PhaseStep::Start`].
    pub fn step(&mut self, step: PhaseStep, hit: Option<P>) -> Option<P> {
        match step {
            PhaseStep::Start => {
                self.state = match hit {
                    Some(p) => SlotState::Active(p),
                    None => SlotState::Idle,
                };
                hit
            }
            PhaseStep::Update => self.current(),
            PhaseStep::End => self.cancel(),
        }
    }

    /// Abandon the in-flight gesture, returning its target.
    pub fn cancel(&mut self) -> Option<P> {
        let current = self.current();
        self.state = SlotState::Idle;
        current
    }
}

/// One [`GestureSlot`] per [`PhaseGesture`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct GestureSlots<P> {
    slots: [GestureSlot<P>; 3],
}

impl<P: Copy + Eq> GestureSlots<P> {
    /// Create a set of idle slots.
    pub const fn new() -> Self {
        Self {
            slots: [GestureSlot::new(), GestureSlot::new(), GestureSlot::new()],
        }
    }

    /// Borrow the slot for `gesture`.
    pub fn slot(&self, gesture: PhaseGesture) -> &GestureSlot<P> {
        &self.slots[gesture.index()]
    }

    /// Advance the slot for `gesture`. See [`GestureSlot::step`].
    pub fn step(&mut self, gesture: PhaseGesture, step: PhaseStep, hit: Option<P>) -> Option<P> {
        self.slots[gesture.index()].step(step, hit)
    }

    /// Returns `true` if any gesture is in flight.
    pub fn any_active(&self) -> bool {
        self.slots.iter().any(GestureSlot::is_active)
    }

    /// Abandon every in-flight gesture.
    pub fn cancel_all(&mut self) {
        for slot in &mut self.slots {
            slot.cancel();
        }
    }
}
