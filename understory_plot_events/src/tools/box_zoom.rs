// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Rect};
use understory_gesture::event::{KeyEvent, PanEvent};

use super::Dimensions;
use crate::geometry::Frame;
use crate::tool::{Capabilities, Category, EventTypes, Overlay, ToolContext, ToolView};

/// Boxes this small or smaller, in either direction, are ignored.
const MIN_EXTENT: f64 = 5.0;

/// Drag out a box and zoom the ranges to it.
///
/// While dragging the box is exposed as an [`Overlay::Box`]. Escape cancels.
#[derive(Clone, Debug, Default)]
pub struct BoxZoomTool {
    dimensions: Dimensions,
    base: Option<Point>,
    overlay: Option<Rect>,
}

impl BoxZoomTool {
    /// A box zoom over `dimensions`.
    pub fn new(dimensions: Dimensions) -> Self {
        Self {
            dimensions,
            ..Self::default()
        }
    }

    /// The box between `base` and `current`, clipped to the frame, with
    /// excluded axes spanning the whole frame.
    fn limits(&self, frame: &Frame, base: Point, current: Point) -> Rect {
        let (hx0, hx1) = frame.h_range();
        let (vy0, vy1) = frame.v_range();
        let (x0, x1) = if self.dimensions.has_width() {
            (
                base.x.min(current.x).max(hx0),
                base.x.max(current.x).min(hx1),
            )
        } else {
            (hx0, hx1)
        };
        let (y0, y1) = if self.dimensions.has_height() {
            (
                base.y.min(current.y).max(vy0),
                base.y.max(current.y).min(vy1),
            )
        } else {
            (vy0, vy1)
        };
        Rect::new(x0, y0, x1, y1)
    }
}

impl ToolView for BoxZoomTool {
    fn name(&self) -> &str {
        "Box Zoom"
    }

    fn event_types(&self) -> EventTypes {
        Category::Pan.into()
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::PAN_ALL | Capabilities::KEY_UP
    }

    fn overlay(&self) -> Option<Overlay> {
        self.overlay.map(Overlay::Box)
    }

    fn pan_start(&mut self, _ctx: &mut ToolContext<'_>, event: &PanEvent) {
        self.base = Some(Point::new(event.sx, event.sy));
        self.overlay = None;
    }

    fn pan(&mut self, ctx: &mut ToolContext<'_>, event: &PanEvent) {
        let (Some(base), Some(frame)) = (self.base, ctx.frame()) else {
            return;
        };
        self.overlay = Some(self.limits(&frame, base, Point::new(event.sx, event.sy)));
    }

    fn pan_end(&mut self, ctx: &mut ToolContext<'_>, event: &PanEvent) {
        let base = self.base.take();
        self.overlay = None;
        let (Some(base), Some(frame)) = (base, ctx.frame()) else {
            return;
        };
        let b = self.limits(&frame, base, Point::new(event.sx, event.sy));
        if b.width() <= MIN_EXTENT || b.height() <= MIN_EXTENT {
            return;
        }
        let x = frame.x_scale().r_invert(b.x0, b.x1);
        let y = frame.y_scale().r_invert(b.y0, b.y1);
        ctx.update_ranges(Some(x), Some(y));
    }

    fn key_up(&mut self, _ctx: &mut ToolContext<'_>, event: &KeyEvent) {
        if event.key == "Escape" {
            self.base = None;
            self.overlay = None;
        }
    }
}
