// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Renderer hit interface.

use alloc::boxed::Box;

use kurbo::{Point, Shape};

use crate::canvas::Cursor;

/// What the router needs from a renderer view.
pub trait InteractiveHit {
    /// Returns `true` if the renderer claims the screen point.
    fn interactive_hit(&self, pos: Point) -> bool;

    /// Cursor to show over the renderer, if it declares one.
    fn cursor(&self, _pos: Point) -> Option<Cursor> {
        None
    }

    /// Called when a tap lands on the renderer.
    fn on_hit(&mut self, _pos: Point) {}
}

/// A renderer whose interactive area is a kurbo [`Shape`].
pub struct ShapeRenderer<S> {
    shape: S,
    cursor: Option<Cursor>,
    on_hit: Option<Box<dyn FnMut(Point)>>,
}

impl<S: core::fmt::Debug> core::fmt::Debug for ShapeRenderer<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ShapeRenderer")
            .field("shape", &self.shape)
            .field("cursor", &self.cursor)
            .field("on_hit", &self.on_hit.is_some())
            .finish()
    }
}

impl<S: Shape> ShapeRenderer<S> {
    /// A renderer that claims the interior of `shape`.
    pub fn new(shape: S) -> Self {
        Self {
            shape,
            cursor: None,
            on_hit: None,
        }
    }

    /// Declare a cursor for the renderer's area.
    #[must_use]
    pub fn with_cursor(mut self, cursor: Cursor) -> Self {
        self.cursor = Some(cursor);
        self
    }

    /// Install a tap handler.
    #[must_use]
    pub fn with_on_hit(mut self, f: impl FnMut(Point) + 'static) -> Self {
        self.on_hit = Some(Box::new(f));
        self
    }
}

impl<S: Shape> InteractiveHit for ShapeRenderer<S> {
    fn interactive_hit(&self, pos: Point) -> bool {
        self.shape.contains(pos)
    }

    fn cursor(&self, _pos: Point) -> Option<Cursor> {
        self.cursor.clone()
    }

    fn on_hit(&mut self, pos: Point) {
        if let Some(f) = self.on_hit.as_mut() {
            f(pos);
        }
    }
}
