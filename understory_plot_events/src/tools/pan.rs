// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use understory_gesture::event::PanEvent;

use super::Dimensions;
use crate::geometry::Frame;
use crate::tool::{Capabilities, Category, EventTypes, ToolContext, ToolView};

/// Drag to move the data ranges.
///
/// A drag that starts beside the frame, over an axis, only pans that axis.
#[derive(Clone, Debug, Default)]
pub struct PanTool {
    dimensions: Dimensions,
    last_dx: f64,
    last_dy: f64,
    h_axis_only: bool,
    v_axis_only: bool,
}

impl PanTool {
    /// A pan tool over `dimensions`.
    pub fn new(dimensions: Dimensions) -> Self {
        Self {
            dimensions,
            ..Self::default()
        }
    }

    /// Configured axes.
    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    fn update(&mut self, ctx: &mut ToolContext<'_>, frame: &Frame, dx: f64, dy: f64) {
        let new_dx = dx - self.last_dx;
        let new_dy = dy - self.last_dy;
        self.last_dx = dx;
        self.last_dy = dy;

        let (x0, x1) = frame.h_range();
        let (y0, y1) = frame.v_range();
        let x = (self.dimensions.has_width() && !self.v_axis_only)
            .then(|| frame.x_scale().r_invert(x0 - new_dx, x1 - new_dx));
        let y = (self.dimensions.has_height() && !self.h_axis_only)
            .then(|| frame.y_scale().r_invert(y0 - new_dy, y1 - new_dy));
        if x.is_some() || y.is_some() {
            ctx.update_ranges(x, y);
        }
    }
}

impl ToolView for PanTool {
    fn name(&self) -> &str {
        "Pan"
    }

    fn event_types(&self) -> EventTypes {
        Category::Pan.into()
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::PAN_ALL
    }

    fn pan_start(&mut self, ctx: &mut ToolContext<'_>, event: &PanEvent) {
        self.last_dx = 0.0;
        self.last_dy = 0.0;
        let Some(frame) = ctx.frame() else {
            return;
        };
        let (x0, x1) = frame.h_range();
        let (y0, y1) = frame.v_range();
        if event.sx < x0 || event.sx > x1 {
            self.v_axis_only = true;
        }
        if event.sy < y0 || event.sy > y1 {
            self.h_axis_only = true;
        }
    }

    fn pan(&mut self, ctx: &mut ToolContext<'_>, event: &PanEvent) {
        if let Some(frame) = ctx.frame() {
            self.update(ctx, &frame, event.delta_x, event.delta_y);
        }
    }

    fn pan_end(&mut self, _ctx: &mut ToolContext<'_>, _event: &PanEvent) {
        self.h_axis_only = false;
        self.v_axis_only = false;
    }
}
