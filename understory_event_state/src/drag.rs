// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag state helper: incremental deltas, cumulative offsets and travel.
//!
//! ## Usage
//!
//! 1) Start tracking with [`DragState::start`] at the press position and time.
//! 2) On each move, call [`DragState::update`] for the delta since the last update.
//! 3) [`DragState::total_offset`] is the cumulative offset from the start; this
//!    is what gesture recognizers report as a pan's `delta`.
//! 4) [`DragState::travel`] is the farthest distance reached from the start, used
//!    to decide whether a press is still a tap candidate.
//! 5) End with [`DragState::end`].
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::Point;
//! use understory_event_state::drag::DragState;
//!
//! let mut drag = DragState::default();
//! drag.start(Point::new(10.0, 20.0), 0);
//!
//! let delta = drag.update(Point::new(15.0, 25.0)).unwrap();
//! assert_eq!((delta.x, delta.y), (5.0, 5.0));
//!
//! drag.update(Point::new(13.0, 20.0));
//! let total = drag.total_offset().unwrap();
//! assert_eq!((total.x, total.y), (3.0, 0.0));
//! assert!(drag.travel() > 7.0);
//! ```

use kurbo::{Point, Vec2};

/// Tracks one pointer's drag from press to release.
#[derive(Debug, Clone, Default, Copy, PartialEq)]
pub struct DragState {
    /// Position where the drag started.
    pub start_pos: Option<Point>,
    /// Last recorded position.
    pub last_pos: Option<Point>,
    /// Timestamp of the start, in milliseconds.
    pub start_time: u64,
    /// Farthest distance reached from `start_pos`.
    pub max_distance: f64,
}

impl DragState {
    /// Start tracking a new drag from `pos` at time `now`.
    pub fn start(&mut self, pos: Point, now: u64) {
        self.start_pos = Some(pos);
        self.last_pos = Some(pos);
        self.start_time = now;
        self.max_distance = 0.0;
    }

    /// Record a new position, returning the delta since the last update.
    pub fn update(&mut self, pos: Point) -> Option<Vec2> {
        let start = self.start_pos?;
        let delta = self.last_pos.map(|last| pos - last);
        self.last_pos = Some(pos);
        self.max_distance = self.max_distance.max((pos - start).hypot());
        delta
    }

    /// Offset of the last recorded position from the start.
    pub fn total_offset(&self) -> Option<Vec2> {
        Some(self.last_pos? - self.start_pos?)
    }

    /// Farthest distance reached from the start; `0.0` when idle.
    pub fn travel(&self) -> f64 {
        self.max_distance
    }

    /// Milliseconds elapsed since the start, if dragging.
    pub fn elapsed(&self, now: u64) -> Option<u64> {
        self.start_pos.map(|_| now.saturating_sub(self.start_time))
    }

    /// Stop tracking and reset state.
    pub fn end(&mut self) {
        *self = Self::default();
    }

    /// Returns `true` while a drag is being tracked.
    pub fn is_dragging(&self) -> bool {
        self.start_pos.is_some()
    }
}
