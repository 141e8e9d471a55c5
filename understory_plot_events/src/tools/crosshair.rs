// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Point;
use understory_gesture::event::MoveEvent;

use super::Dimensions;
use crate::tool::{Capabilities, Category, EventTypes, Overlay, ToolContext, ToolView};

/// Hover inspector drawing spans through the pointer while it is over the
/// frame.
#[derive(Clone, Debug, Default)]
pub struct CrosshairTool {
    dimensions: Dimensions,
    horizontal: Option<f64>,
    vertical: Option<f64>,
}

impl CrosshairTool {
    /// A crosshair over `dimensions`. `Width` draws only the horizontal span.
    pub fn new(dimensions: Dimensions) -> Self {
        Self {
            dimensions,
            ..Self::default()
        }
    }

    fn set_spans(&mut self, at: Option<(f64, f64)>) {
        self.horizontal = at
            .filter(|_| self.dimensions.has_width())
            .map(|(_, sy)| sy);
        self.vertical = at
            .filter(|_| self.dimensions.has_height())
            .map(|(sx, _)| sx);
    }
}

impl ToolView for CrosshairTool {
    fn name(&self) -> &str {
        "Crosshair"
    }

    fn event_types(&self) -> EventTypes {
        Category::Move.into()
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::MOVE | Capabilities::MOVE_EXIT
    }

    fn is_inspector(&self) -> bool {
        true
    }

    fn overlay(&self) -> Option<Overlay> {
        (self.horizontal.is_some() || self.vertical.is_some()).then_some(Overlay::Spans {
            horizontal: self.horizontal,
            vertical: self.vertical,
        })
    }

    fn mouse_move(&mut self, ctx: &mut ToolContext<'_>, event: &MoveEvent) {
        let inside = ctx
            .frame()
            .is_some_and(|f| f.contains(Point::new(event.sx, event.sy)));
        self.set_spans(inside.then_some((event.sx, event.sy)));
    }

    fn move_exit(&mut self, _ctx: &mut ToolContext<'_>, _event: &MoveEvent) {
        self.set_spans(None);
    }
}
