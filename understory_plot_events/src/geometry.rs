// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Data ranges, linear scales and the plot data frame.
//!
//! A [`Frame`] is the region of a plot where data is drawn. It owns the x and
//! y [`Range1d`]s and maps between screen and data space with a
//! [`LinearScale`] per axis. The y scale is flipped: screen y grows downwards
//! while data y grows upwards.

use kurbo::{Point, Rect};

/// A data-space interval. `start > end` means the axis is reversed.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Range1d {
    /// Value at the low screen end of the axis.
    pub start: f64,
    /// Value at the high screen end of the axis.
    pub end: f64,
}

impl Range1d {
    /// Creates a range.
    #[must_use]
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Returns `true` if `start > end`.
    #[must_use]
    pub fn is_reversed(&self) -> bool {
        self.start > self.end
    }

    /// Smaller bound.
    #[must_use]
    pub fn min(&self) -> f64 {
        self.start.min(self.end)
    }

    /// Larger bound.
    #[must_use]
    pub fn max(&self) -> f64 {
        self.start.max(self.end)
    }

    /// `end - start`.
    #[must_use]
    pub fn span(&self) -> f64 {
        self.end - self.start
    }
}

/// Linear map from a data [`Range1d`] onto a screen interval.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LinearScale {
    source: Range1d,
    target: (f64, f64),
}

impl LinearScale {
    /// Map `source` onto the screen interval `target.0 .. target.1`.
    #[must_use]
    pub const fn new(source: Range1d, target: (f64, f64)) -> Self {
        Self { source, target }
    }

    /// The data range.
    #[must_use]
    pub fn source(&self) -> Range1d {
        self.source
    }

    fn coefficients(&self) -> (f64, f64) {
        let span = self.source.span();
        if span == 0.0 {
            return (0.0, self.target.0);
        }
        let factor = (self.target.1 - self.target.0) / span;
        (factor, self.target.0 - factor * self.source.start)
    }

    /// Data to screen.
    #[must_use]
    pub fn compute(&self, x: f64) -> f64 {
        let (factor, offset) = self.coefficients();
        factor * x + offset
    }

    /// Screen to data.
    ///
    /// A degenerate range inverts every screen value to its start.
    #[must_use]
    pub fn invert(&self, sx: f64) -> f64 {
        let (factor, offset) = self.coefficients();
        if factor == 0.0 {
            return self.source.start;
        }
        (sx - offset) / factor
    }

    /// Invert a screen interval into a data interval ordered like the source
    /// range: ascending, or descending for reversed ranges.
    #[must_use]
    pub fn r_invert(&self, sx0: f64, sx1: f64) -> Range1d {
        let (x0, x1) = (self.invert(sx0), self.invert(sx1));
        let (lo, hi) = (x0.min(x1), x0.max(x1));
        if self.source.is_reversed() {
            Range1d::new(hi, lo)
        } else {
            Range1d::new(lo, hi)
        }
    }
}

/// The data frame of a plot: its screen box and data ranges.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Frame {
    bbox: Rect,
    x_range: Range1d,
    y_range: Range1d,
}

impl Frame {
    /// Creates a frame covering `bbox` in screen space.
    #[must_use]
    pub const fn new(bbox: Rect, x_range: Range1d, y_range: Range1d) -> Self {
        Self {
            bbox,
            x_range,
            y_range,
        }
    }

    /// Screen box.
    #[must_use]
    pub fn bbox(&self) -> Rect {
        self.bbox
    }

    /// Horizontal screen extent `(x0, x1)`.
    #[must_use]
    pub fn h_range(&self) -> (f64, f64) {
        (self.bbox.x0, self.bbox.x1)
    }

    /// Vertical screen extent `(y0, y1)`.
    #[must_use]
    pub fn v_range(&self) -> (f64, f64) {
        (self.bbox.y0, self.bbox.y1)
    }

    /// The x data range.
    #[must_use]
    pub fn x_range(&self) -> Range1d {
        self.x_range
    }

    /// The y data range.
    #[must_use]
    pub fn y_range(&self) -> Range1d {
        self.y_range
    }

    /// Replace the data ranges. `None` keeps the current one.
    pub fn set_ranges(&mut self, x: Option<Range1d>, y: Option<Range1d>) {
        if let Some(x) = x {
            self.x_range = x;
        }
        if let Some(y) = y {
            self.y_range = y;
        }
    }

    /// Scale for the x axis.
    #[must_use]
    pub fn x_scale(&self) -> LinearScale {
        LinearScale::new(self.x_range, (self.bbox.x0, self.bbox.x1))
    }

    /// Scale for the y axis, flipped so that `start` sits at the bottom.
    #[must_use]
    pub fn y_scale(&self) -> LinearScale {
        LinearScale::new(self.y_range, (self.bbox.y1, self.bbox.y0))
    }

    /// Screen point to data point.
    #[must_use]
    pub fn invert(&self, screen: Point) -> Point {
        Point::new(
            self.x_scale().invert(screen.x),
            self.y_scale().invert(screen.y),
        )
    }

    /// Returns `true` if `screen` is inside the frame box.
    ///
    /// The box is closed on every edge.
    #[must_use]
    pub fn contains(&self, screen: Point) -> bool {
        screen.x >= self.bbox.x0
            && screen.x <= self.bbox.x1
            && screen.y >= self.bbox.y0
            && screen.y <= self.bbox.y1
    }
}
