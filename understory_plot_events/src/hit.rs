// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Screen-space hit testing against mounted plots and their renderers.
//!
//! Plots are tested in mount order and the first whose outer box contains the
//! point wins; there is no z-order between overlapping plots. Renderers are
//! tested topmost first, that is in reverse mount order.

use kurbo::Point;

use crate::canvas::{Canvas, PlotId, PlotView, RendererId};

/// The first mounted plot whose outer box contains `pos`.
pub fn find_plot(canvas: &Canvas, pos: Point) -> Option<PlotId> {
    canvas
        .plots()
        .find(|plot| contains_closed(plot, pos))
        .map(PlotView::id)
}

/// The topmost renderer of `plot` that claims `pos`.
pub fn find_renderer(plot: &PlotView, pos: Point) -> Option<RendererId> {
    plot.renderers()
        .rev()
        .find(|(_, r)| r.interactive_hit(pos))
        .map(|(id, _)| id)
}

/// Returns `true` if `pos` lies in `plot`'s data frame.
pub fn find_frame(plot: &PlotView, pos: Point) -> bool {
    plot.frame().contains(pos)
}

fn contains_closed(plot: &PlotView, pos: Point) -> bool {
    let b = plot.bbox();
    pos.x >= b.x0 && pos.x <= b.x1 && pos.y >= b.y0 && pos.y <= b.y1
}
