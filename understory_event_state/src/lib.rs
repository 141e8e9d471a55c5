// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_event_state --heading-base-level=0

//! Understory Event State: small state machines behind plot interaction.
//!
//! Each module tracks just enough state across a stream of input events to
//! compute transitions that an event router can act on:
//!
//! - [`phase`]: Which target owns an in-flight pan, pinch or rotate gesture.
//! - [`moves`]: Balanced enter/exit transitions as the pointer crosses targets.
//! - [`drag`]: Incremental and cumulative offsets of a pointer drag.
//!
//! None of these managers perform hit testing. They accept the result of a hit
//! test (an application-defined target key, usually a plot id) and answer
//! "where should this event go" questions.
//!
//! ## Gesture phases
//!
//! A gesture is sticky to the target it started on. Intermediate and end
//! phases without a matching start are dropped:
//!
//! ```rust
//! use understory_event_state::phase::{GestureSlot, PhaseStep};
//!
//! let mut pan: GestureSlot<u32> = GestureSlot::new();
//!
//! // An update with no preceding start goes nowhere.
//! assert_eq!(pan.step(PhaseStep::Update, Some(7)), None);
//!
//! // Start on target 1; later updates stay on 1 whatever is under the pointer.
//! assert_eq!(pan.step(PhaseStep::Start, Some(1)), Some(1));
//! assert_eq!(pan.step(PhaseStep::Update, Some(2)), Some(1));
//! assert_eq!(pan.step(PhaseStep::End, None), Some(1));
//! assert!(!pan.is_active());
//! ```
//!
//! ## Move tracking
//!
//! ```rust
//! use kurbo::Point;
//! use understory_event_state::moves::{MoveKind, MoveState, MoveTransition};
//!
//! let mut moves: MoveState<u32> = MoveState::new();
//! let p = Point::new(10.0, 10.0);
//!
//! assert_eq!(
//!     moves.update(MoveKind::Move, p, Some(1)),
//!     vec![MoveTransition::Enter(1), MoveTransition::Move(1)]
//! );
//! assert_eq!(
//!     moves.update(MoveKind::Move, p, Some(2)),
//!     vec![MoveTransition::Exit(1), MoveTransition::Enter(2), MoveTransition::Move(2)]
//! );
//! ```
//!
//! This crate is `no_std` compatible (with `alloc`).

#![no_std]

extern crate alloc;

pub mod drag;
pub mod moves;
pub mod phase;
