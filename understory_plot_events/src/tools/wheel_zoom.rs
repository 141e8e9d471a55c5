// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use understory_gesture::event::{PinchEvent, ScrollEvent};

use super::Dimensions;
use crate::tool::{Capabilities, Category, EventTypes, ToolContext, ToolView};

/// Zoom around the pointer with the wheel.
///
/// Declared for the scroll category by default. With
/// [`with_touch`](Self::with_touch) it is declared for pinch instead, zooms
/// on pinch gestures and still receives the wheel from a touch capable bus.
#[derive(Clone, Debug)]
pub struct WheelZoomTool {
    dimensions: Dimensions,
    speed: f64,
    touch: bool,
}

impl Default for WheelZoomTool {
    fn default() -> Self {
        Self {
            dimensions: Dimensions::Both,
            speed: 1.0 / 600.0,
            touch: false,
        }
    }
}

impl WheelZoomTool {
    /// A wheel zoom over `dimensions`.
    pub fn new(dimensions: Dimensions) -> Self {
        Self {
            dimensions,
            ..Self::default()
        }
    }

    /// Zoom per wheel pixel.
    #[must_use]
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    /// Declare the tool for pinch instead of scroll.
    ///
    /// Pass the bus's [`touch_capable`](crate::bus::BusConfig::touch_capable).
    #[must_use]
    pub fn with_touch(mut self, touch: bool) -> Self {
        self.touch = touch;
        self
    }

    fn zoom(&self, ctx: &mut ToolContext<'_>, sx: f64, sy: f64, delta: f64) {
        let Some(frame) = ctx.frame() else {
            return;
        };
        let (x0, x1) = frame.h_range();
        let (y0, y1) = frame.v_range();
        let h_axis = self.dimensions.has_width() && x0 < sx && sx < x1;
        let v_axis = self.dimensions.has_height() && y0 < sy && sy < y1;
        if !(h_axis || v_axis) {
            return;
        }
        let factor = (self.speed * delta).clamp(-0.9, 0.9);
        let x = h_axis.then(|| {
            let (s0, s1) = scale_highlow((x0, x1), factor, sx);
            frame.x_scale().r_invert(s0, s1)
        });
        let y = v_axis.then(|| {
            let (s0, s1) = scale_highlow((y0, y1), factor, sy);
            frame.y_scale().r_invert(s0, s1)
        });
        ctx.update_ranges(x, y);
    }
}

/// Wheel delta equivalent to a pinch `scale`.
fn pinch_delta(scale: f64) -> f64 {
    if scale >= 1.0 {
        (scale - 1.0) * 20.0
    } else {
        -20.0 / scale
    }
}

/// Scale `[low, high]` towards `center` by `factor`.
fn scale_highlow((low, high): (f64, f64), factor: f64, center: f64) -> (f64, f64) {
    (low - (low - center) * factor, high - (high - center) * factor)
}

impl ToolView for WheelZoomTool {
    fn name(&self) -> &str {
        "Wheel Zoom"
    }

    fn event_types(&self) -> EventTypes {
        if self.touch {
            Category::Pinch.into()
        } else {
            Category::Scroll.into()
        }
    }

    fn capabilities(&self) -> Capabilities {
        if self.touch {
            Capabilities::SCROLL | Capabilities::PINCH
        } else {
            Capabilities::SCROLL
        }
    }

    fn scroll(&mut self, ctx: &mut ToolContext<'_>, event: &ScrollEvent) {
        self.zoom(ctx, event.sx, event.sy, event.delta);
    }

    fn pinch(&mut self, ctx: &mut ToolContext<'_>, event: &PinchEvent) {
        self.zoom(ctx, event.sx, event.sy, pinch_delta(event.scale));
    }
}
