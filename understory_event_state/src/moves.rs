// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Move tracking: synthesize balanced enter/exit transitions between targets.
//!
//! A capture surface usually reports a single native enter and leave, even
//! when it hosts several targets side by side. [`MoveState`] remembers the last
//! `(position, target)` pair and, for every native enter, move or leave,
//! computes the transitions a router should dispatch:
//!
//! - `Exit(prev)` when the target changed, or the native event is a leave.
//! - `Enter(curr)` when the target changed, or the native event is an enter.
//! - `Move(curr)` for native moves over a target.
//!
//! Exits always precede enters, and both precede the native move.
//! Native enter and leave are fully represented by the synthesized
//! transitions and are not repeated.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::Point;
//! use understory_event_state::moves::{MoveKind, MoveState, MoveTransition};
//!
//! let mut moves: MoveState<&str> = MoveState::new();
//! let at = Point::new(5.0, 5.0);
//!
//! moves.update(MoveKind::Enter, at, Some("left"));
//! let out = moves.update(MoveKind::Move, at, None);
//! assert_eq!(out, vec![MoveTransition::Exit("left")]);
//! assert_eq!(moves.last_target(), None);
//! ```

use alloc::vec::Vec;

use kurbo::Point;

/// The native move-family event being tracked.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MoveKind {
    /// The pointer entered the capture surface.
    Enter,
    /// The pointer moved within the capture surface.
    Move,
    /// The pointer left the capture surface.
    Leave,
}

/// A transition to dispatch for a move-family event.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveTransition<P> {
    /// The pointer is no longer over this target.
    Exit(P),
    /// The pointer is now over this target.
    Enter(P),
    /// The pointer moved over this target.
    Move(P),
}

/// Last known pointer position and the target it hit.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MoveState<P> {
    last: Option<(Point, Option<P>)>,
}

impl<P: Copy + Eq> MoveState<P> {
    /// Create a tracker with no recorded position.
    pub const fn new() -> Self {
        Self { last: None }
    }

    /// Target recorded by the previous update, if any.
    pub fn last_target(&self) -> Option<P> {
        self.last.and_then(|(_, target)| target)
    }

    /// Position recorded by the previous update, if any.
    pub fn last_position(&self) -> Option<Point> {
        self.last.map(|(pos, _)| pos)
    }

    /// Record a native event at `pos` that hit `hit`, returning the transitions
    /// to dispatch in order.
    ///
    /// The recorded pair is updated whether or not a target was hit.
    pub fn update(&mut self, kind: MoveKind, pos: Point, hit: Option<P>) -> Vec<MoveTransition<P>> {
        let prev = self.last_target();
        let changed = prev != hit;
        let mut out = Vec::with_capacity(3);
        if let Some(prev) = prev {
            if kind == MoveKind::Leave || changed {
                out.push(MoveTransition::Exit(prev));
            }
        }
        if let Some(curr) = hit {
            if kind == MoveKind::Enter || changed {
                out.push(MoveTransition::Enter(curr));
            }
            if kind == MoveKind::Move {
                out.push(MoveTransition::Move(curr));
            }
        }
        self.last = Some((pos, hit));
        out
    }

    /// Forget the recorded position and target.
    pub fn clear(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    const AT: Point = Point::new(1.0, 2.0);

    #[test]
    fn first_move_over_target_enters_then_moves() {
        let mut m: MoveState<u32> = MoveState::new();
        assert_eq!(
            m.update(MoveKind::Move, AT, Some(1)),
            vec![MoveTransition::Enter(1), MoveTransition::Move(1)]
        );
        assert_eq!(m.last_target(), Some(1));
        assert_eq!(m.last_position(), Some(AT));
    }

    #[test]
    fn move_within_same_target_only_moves() {
        let mut m: MoveState<u32> = MoveState::new();
        m.update(MoveKind::Move, AT, Some(1));
        assert_eq!(
            m.update(MoveKind::Move, AT, Some(1)),
            vec![MoveTransition::Move(1)]
        );
    }

    #[test]
    fn crossing_targets_exits_before_enter_before_move() {
        let mut m: MoveState<u32> = MoveState::new();
        m.update(MoveKind::Move, AT, Some(1));
        assert_eq!(
            m.update(MoveKind::Move, AT, Some(2)),
            vec![
                MoveTransition::Exit(1),
                MoveTransition::Enter(2),
                MoveTransition::Move(2)
            ]
        );
    }

    #[test]
    fn moving_into_empty_space_exits_once() {
        let mut m: MoveState<u32> = MoveState::new();
        m.update(MoveKind::Move, AT, Some(1));
        assert_eq!(
            m.update(MoveKind::Move, AT, None),
            vec![MoveTransition::Exit(1)]
        );
        assert!(m.update(MoveKind::Move, AT, None).is_empty());
        assert_eq!(m.last_position(), Some(AT));
    }

    #[test]
    fn native_leave_exits_even_without_target_change() {
        let mut m: MoveState<u32> = MoveState::new();
        m.update(MoveKind::Move, AT, Some(1));
        // Leaving at the plot edge still hit-tests to plot 1.
        assert_eq!(
            m.update(MoveKind::Leave, AT, Some(1)),
            vec![MoveTransition::Exit(1)]
        );
        // Re-entering the same plot enters without a spurious exit.
        assert_eq!(
            m.update(MoveKind::Enter, AT, Some(1)),
            vec![MoveTransition::Enter(1)]
        );
    }

    #[test]
    fn native_enter_without_target_is_silent() {
        let mut m: MoveState<u32> = MoveState::new();
        assert!(m.update(MoveKind::Enter, AT, None).is_empty());
        assert_eq!(m.last_position(), Some(AT));
    }

    #[test]
    fn clear_forgets_target() {
        let mut m: MoveState<u32> = MoveState::new();
        m.update(MoveKind::Move, AT, Some(3));
        m.clear();
        assert_eq!(m.last_target(), None);
        assert_eq!(
            m.update(MoveKind::Move, AT, Some(3)),
            vec![MoveTransition::Enter(3), MoveTransition::Move(3)]
        );
    }
}
