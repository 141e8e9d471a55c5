// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use understory_gesture::event::ScrollEvent;

use super::Dimensions;
use crate::tool::{Capabilities, Category, EventTypes, ToolContext, ToolView};

/// Pan the ranges with the wheel.
///
/// Each wheel step shifts the frame by a fraction of its own extent.
#[derive(Clone, Debug)]
pub struct WheelPanTool {
    dimensions: Dimensions,
    speed: f64,
}

impl Default for WheelPanTool {
    fn default() -> Self {
        Self {
            dimensions: Dimensions::Width,
            speed: 1.0 / 1000.0,
        }
    }
}

impl WheelPanTool {
    /// A wheel pan over `dimensions`.
    pub fn new(dimensions: Dimensions) -> Self {
        Self {
            dimensions,
            ..Self::default()
        }
    }

    /// Frame fraction per wheel pixel.
    #[must_use]
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }
}

impl ToolView for WheelPanTool {
    fn name(&self) -> &str {
        "Wheel Pan"
    }

    fn event_types(&self) -> EventTypes {
        Category::Scroll.into()
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::SCROLL
    }

    fn scroll(&mut self, ctx: &mut ToolContext<'_>, event: &ScrollEvent) {
        let Some(frame) = ctx.frame() else {
            return;
        };
        let factor = (self.speed * event.delta).clamp(-0.9, 0.9);
        let x = self.dimensions.has_width().then(|| {
            let (s0, s1) = frame.h_range();
            let shift = (s1 - s0).abs() * factor;
            frame.x_scale().r_invert(s0 - shift, s1 - shift)
        });
        let y = self.dimensions.has_height().then(|| {
            let (s0, s1) = frame.v_range();
            let shift = (s1 - s0).abs() * factor;
            frame.y_scale().r_invert(s0 - shift, s1 - shift)
        });
        ctx.update_ranges(x, y);
    }
}
