// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reference tools built on [`ToolView`](crate::tool::ToolView).

mod box_zoom;
mod crosshair;
mod pan;
mod wheel_pan;
mod wheel_zoom;

pub use box_zoom::BoxZoomTool;
pub use crosshair::CrosshairTool;
pub use pan::PanTool;
pub use wheel_pan::WheelPanTool;
pub use wheel_zoom::WheelZoomTool;

/// Axes a tool acts on.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Dimensions {
    /// The x axis only.
    Width,
    /// The y axis only.
    Height,
    /// Both axes.
    #[default]
    Both,
}

impl Dimensions {
    /// Returns `true` if the x axis is included.
    pub const fn has_width(self) -> bool {
        matches!(self, Self::Width | Self::Both)
    }

    /// Returns `true` if the y axis is included.
    pub const fn has_height(self) -> bool {
        matches!(self, Self::Height | Self::Both)
    }
}
