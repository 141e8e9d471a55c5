// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tool views: gesture categories, capability records and the handler trait.
//!
//! A tool declares the [`Category`]s it is interested in through
//! [`EventTypes`], and the handlers it implements through a [`Capabilities`]
//! record fixed at construction. Registration wires exactly the channels named
//! by both; no handler existence is probed at dispatch time.

use alloc::borrow::Cow;
use alloc::string::String;
use core::fmt;
use core::str::FromStr;

use kurbo::Rect;
use smallvec::SmallVec;
use understory_event_state::phase::PhaseGesture;
use understory_gesture::event::{
    KeyEvent, MoveEvent, PanEvent, PinchEvent, RotateEvent, ScrollEvent, TapEvent, TapKind, UiEvent,
};

use crate::canvas::{Canvas, PlotId};
use crate::channel::Channel;
use crate::geometry::{Frame, Range1d};

/// Identifier assigned to a tool at registration.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ToolId(pub u32);

/// A gesture category: the unit of tool activation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    /// Single pointer drag.
    Pan,
    /// Two pointer scale.
    Pinch,
    /// Two pointer rotation.
    Rotate,
    /// Tap.
    Tap,
    /// Double tap.
    DoubleTap,
    /// Long press and its release.
    Press,
    /// Hover.
    Move,
    /// Wheel.
    Scroll,
}

impl Category {
    /// Every category.
    pub const ALL: [Self; 8] = [
        Self::Pan,
        Self::Pinch,
        Self::Rotate,
        Self::Tap,
        Self::DoubleTap,
        Self::Press,
        Self::Move,
        Self::Scroll,
    ];

    /// Lowercase name, as tools declare it.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Pan => "pan",
            Self::Pinch => "pinch",
            Self::Rotate => "rotate",
            Self::Tap => "tap",
            Self::DoubleTap => "doubletap",
            Self::Press => "press",
            Self::Move => "move",
            Self::Scroll => "scroll",
        }
    }

    /// Returns `true` if the first tool registered for this category becomes
    /// active without being asked.
    pub const fn auto_activates(self) -> bool {
        matches!(self, Self::Tap | Self::Pan)
    }

    /// Channels wired for a tool interested in this category.
    ///
    /// Tap tools also receive double taps.
    pub const fn channels(self) -> &'static [Channel] {
        match self {
            Self::Pan => &[Channel::PanStart, Channel::Pan, Channel::PanEnd],
            Self::Pinch => &[Channel::PinchStart, Channel::Pinch, Channel::PinchEnd],
            Self::Rotate => &[Channel::RotateStart, Channel::Rotate, Channel::RotateEnd],
            Self::Tap => &[Channel::Tap, Channel::DoubleTap],
            Self::DoubleTap => &[Channel::DoubleTap],
            Self::Press => &[Channel::Press, Channel::PressUp],
            Self::Move => &[Channel::MoveEnter, Channel::Move, Channel::MoveExit],
            Self::Scroll => &[Channel::Scroll],
        }
    }

    /// The phase slot backing this category, for multi-phase gestures.
    pub const fn phase_gesture(self) -> Option<PhaseGesture> {
        match self {
            Self::Pan => Some(PhaseGesture::Pan),
            Self::Pinch => Some(PhaseGesture::Pinch),
            Self::Rotate => Some(PhaseGesture::Rotate),
            _ => None,
        }
    }

    /// Category of a routed event. Key events have none.
    pub fn of_event(event: &UiEvent) -> Option<Self> {
        Some(match event {
            UiEvent::Pan(_) => Self::Pan,
            UiEvent::Pinch(_) => Self::Pinch,
            UiEvent::Rotate(_) => Self::Rotate,
            UiEvent::Tap(e) => match e.kind {
                TapKind::Tap => Self::Tap,
                TapKind::DoubleTap => Self::DoubleTap,
                TapKind::Press | TapKind::PressUp => Self::Press,
            },
            UiEvent::Move(_) => Self::Move,
            UiEvent::Scroll(_) => Self::Scroll,
            UiEvent::Key(_) => return None,
        })
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A category name the router does not know.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unsupported event type `{0}`")]
pub struct ParseCategoryError(pub String);

impl FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| ParseCategoryError(s.into()))
    }
}

/// The categories a tool declares: one, or an ordered list for multi-gesture
/// tools.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventTypes {
    names: SmallVec<[Cow<'static, str>; 2]>,
    multi: bool,
}

impl EventTypes {
    /// A single category, by name.
    pub fn single(name: impl Into<Cow<'static, str>>) -> Self {
        let mut names = SmallVec::new();
        names.push(name.into());
        Self {
            names,
            multi: false,
        }
    }

    /// An ordered list of categories, by name.
    pub fn multi<I, N>(names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Cow<'static, str>>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            multi: true,
        }
    }

    /// Returns `true` for a list declaration.
    pub fn is_multi(&self) -> bool {
        self.multi
    }

    /// Declared names, in order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.names.iter().map(|n| &**n)
    }

    /// Parse every declared name.
    pub fn categories(&self) -> Result<SmallVec<[Category; 2]>, ParseCategoryError> {
        self.names().map(str::parse::<Category>).collect()
    }
}

impl From<Category> for EventTypes {
    fn from(category: Category) -> Self {
        Self::single(category.name())
    }
}

bitflags::bitflags! {
    /// Handler slots a tool view implements.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Capabilities: u32 {
        /// [`ToolView::pan_start`].
        const PAN_START    = 1 << 0;
        /// [`ToolView::pan`].
        const PAN          = 1 << 1;
        /// [`ToolView::pan_end`].
        const PAN_END      = 1 << 2;
        /// [`ToolView::pinch_start`].
        const PINCH_START  = 1 << 3;
        /// [`ToolView::pinch`].
        const PINCH        = 1 << 4;
        /// [`ToolView::pinch_end`].
        const PINCH_END    = 1 << 5;
        /// [`ToolView::rotate_start`].
        const ROTATE_START = 1 << 6;
        /// [`ToolView::rotate`].
        const ROTATE       = 1 << 7;
        /// [`ToolView::rotate_end`].
        const ROTATE_END   = 1 << 8;
        /// [`ToolView::tap`].
        const TAP          = 1 << 9;
        /// [`ToolView::double_tap`].
        const DOUBLE_TAP   = 1 << 10;
        /// [`ToolView::press`].
        const PRESS        = 1 << 11;
        /// [`ToolView::press_up`].
        const PRESS_UP     = 1 << 12;
        /// [`ToolView::move_enter`].
        const MOVE_ENTER   = 1 << 13;
        /// [`ToolView::mouse_move`].
        const MOVE         = 1 << 14;
        /// [`ToolView::move_exit`].
        const MOVE_EXIT    = 1 << 15;
        /// [`ToolView::scroll`].
        const SCROLL       = 1 << 16;
        /// [`ToolView::key_down`].
        const KEY_DOWN     = 1 << 17;
        /// [`ToolView::key_up`].
        const KEY_UP       = 1 << 18;

        /// Every pan phase.
        const PAN_ALL = Self::PAN_START.bits() | Self::PAN.bits() | Self::PAN_END.bits();
        /// Every pinch phase.
        const PINCH_ALL = Self::PINCH_START.bits() | Self::PINCH.bits() | Self::PINCH_END.bits();
        /// Every rotate phase.
        const ROTATE_ALL = Self::ROTATE_START.bits() | Self::ROTATE.bits() | Self::ROTATE_END.bits();
        /// Every move transition.
        const MOVE_ALL = Self::MOVE_ENTER.bits() | Self::MOVE.bits() | Self::MOVE_EXIT.bits();
    }
}

/// A transient visual a tool wants drawn over its plot.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Overlay {
    /// A selection or zoom box, in screen space.
    Box(Rect),
    /// Crosshair spans at screen positions.
    Spans {
        /// Screen y of the horizontal span.
        horizontal: Option<f64>,
        /// Screen x of the vertical span.
        vertical: Option<f64>,
    },
}

/// What a handler can reach while it runs.
#[derive(Debug)]
pub struct ToolContext<'a> {
    canvas: &'a mut Canvas,
    plot: PlotId,
    tool: ToolId,
}

impl<'a> ToolContext<'a> {
    pub(crate) fn new(canvas: &'a mut Canvas, plot: PlotId, tool: ToolId) -> Self {
        Self { canvas, plot, tool }
    }

    /// The tool being run.
    pub fn tool(&self) -> ToolId {
        self.tool
    }

    /// The plot the tool is attached to.
    pub fn plot(&self) -> PlotId {
        self.plot
    }

    /// The plot's data frame.
    pub fn frame(&self) -> Option<Frame> {
        self.canvas.plot(self.plot).map(|p| *p.frame())
    }

    /// Set the plot's data ranges; `None` keeps an axis unchanged.
    ///
    /// Publishes a range update to the plot's model. Returns `false` if the
    /// plot is gone.
    pub fn update_ranges(&mut self, x: Option<Range1d>, y: Option<Range1d>) -> bool {
        self.canvas.update_ranges(self.plot, x, y)
    }

    /// The whole canvas.
    pub fn canvas(&self) -> &Canvas {
        &*self.canvas
    }
}

/// A tool's event handlers.
///
/// Every handler defaults to doing nothing. Only the handlers named by
/// [`ToolView::capabilities`] are ever called.
pub trait ToolView {
    /// Display name.
    fn name(&self) -> &str;

    /// Declared categories.
    fn event_types(&self) -> EventTypes;

    /// Implemented handlers.
    fn capabilities(&self) -> Capabilities;

    /// Returns `true` for passive hover observers.
    fn is_inspector(&self) -> bool {
        false
    }

    /// Transient overlay to draw, if any.
    fn overlay(&self) -> Option<Overlay> {
        None
    }

    /// Pan started.
    fn pan_start(&mut self, _ctx: &mut ToolContext<'_>, _event: &PanEvent) {}
    /// Pan moved.
    fn pan(&mut self, _ctx: &mut ToolContext<'_>, _event: &PanEvent) {}
    /// Pan ended.
    fn pan_end(&mut self, _ctx: &mut ToolContext<'_>, _event: &PanEvent) {}
    /// Pinch started.
    fn pinch_start(&mut self, _ctx: &mut ToolContext<'_>, _event: &PinchEvent) {}
    /// Pinch moved.
    fn pinch(&mut self, _ctx: &mut ToolContext<'_>, _event: &PinchEvent) {}
    /// Pinch ended.
    fn pinch_end(&mut self, _ctx: &mut ToolContext<'_>, _event: &PinchEvent) {}
    /// Rotate started.
    fn rotate_start(&mut self, _ctx: &mut ToolContext<'_>, _event: &RotateEvent) {}
    /// Rotate moved.
    fn rotate(&mut self, _ctx: &mut ToolContext<'_>, _event: &RotateEvent) {}
    /// Rotate ended.
    fn rotate_end(&mut self, _ctx: &mut ToolContext<'_>, _event: &RotateEvent) {}
    /// Tap.
    fn tap(&mut self, _ctx: &mut ToolContext<'_>, _event: &TapEvent) {}
    /// Double tap.
    fn double_tap(&mut self, _ctx: &mut ToolContext<'_>, _event: &TapEvent) {}
    /// Long press.
    fn press(&mut self, _ctx: &mut ToolContext<'_>, _event: &TapEvent) {}
    /// Long press released.
    fn press_up(&mut self, _ctx: &mut ToolContext<'_>, _event: &TapEvent) {}
    /// Pointer entered the plot.
    fn move_enter(&mut self, _ctx: &mut ToolContext<'_>, _event: &MoveEvent) {}
    /// Pointer moved over the plot.
    fn mouse_move(&mut self, _ctx: &mut ToolContext<'_>, _event: &MoveEvent) {}
    /// Pointer left the plot, or overlays should be cleared.
    fn move_exit(&mut self, _ctx: &mut ToolContext<'_>, _event: &MoveEvent) {}
    /// Wheel.
    fn scroll(&mut self, _ctx: &mut ToolContext<'_>, _event: &ScrollEvent) {}
    /// Key pressed.
    fn key_down(&mut self, _ctx: &mut ToolContext<'_>, _event: &KeyEvent) {}
    /// Key released.
    fn key_up(&mut self, _ctx: &mut ToolContext<'_>, _event: &KeyEvent) {}
}

/// Call the handler behind `channel`. Mismatched payloads are ignored.
pub(crate) fn deliver(
    tool: &mut dyn ToolView,
    channel: Channel,
    ctx: &mut ToolContext<'_>,
    event: &UiEvent,
) {
    match (channel, event) {
        (Channel::PanStart, UiEvent::Pan(e)) => tool.pan_start(ctx, e),
        (Channel::Pan, UiEvent::Pan(e)) => tool.pan(ctx, e),
        (Channel::PanEnd, UiEvent::Pan(e)) => tool.pan_end(ctx, e),
        (Channel::PinchStart, UiEvent::Pinch(e)) => tool.pinch_start(ctx, e),
        (Channel::Pinch, UiEvent::Pinch(e)) => tool.pinch(ctx, e),
        (Channel::PinchEnd, UiEvent::Pinch(e)) => tool.pinch_end(ctx, e),
        (Channel::RotateStart, UiEvent::Rotate(e)) => tool.rotate_start(ctx, e),
        (Channel::Rotate, UiEvent::Rotate(e)) => tool.rotate(ctx, e),
        (Channel::RotateEnd, UiEvent::Rotate(e)) => tool.rotate_end(ctx, e),
        (Channel::Tap, UiEvent::Tap(e)) => tool.tap(ctx, e),
        (Channel::DoubleTap, UiEvent::Tap(e)) => tool.double_tap(ctx, e),
        (Channel::Press, UiEvent::Tap(e)) => tool.press(ctx, e),
        (Channel::PressUp, UiEvent::Tap(e)) => tool.press_up(ctx, e),
        (Channel::MoveEnter, UiEvent::Move(e)) => tool.move_enter(ctx, e),
        (Channel::Move, UiEvent::Move(e)) => tool.mouse_move(ctx, e),
        (Channel::MoveExit, UiEvent::Move(e)) => tool.move_exit(ctx, e),
        (Channel::Scroll, UiEvent::Scroll(e)) => tool.scroll(ctx, e),
        (Channel::KeyDown, UiEvent::Key(e)) => tool.key_down(ctx, e),
        (Channel::KeyUp, UiEvent::Key(e)) => tool.key_up(ctx, e),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use understory_gesture::event::Modifiers;

    #[test]
    fn category_names_parse() {
        for c in Category::ALL {
            assert_eq!(c.name().parse::<Category>(), Ok(c));
        }
        assert_eq!(
            "hover".parse::<Category>(),
            Err(ParseCategoryError("hover".into()))
        );
    }

    #[test]
    fn multi_declarations_keep_order() {
        let types = EventTypes::multi(["pan", "tap", "scroll"]);
        assert!(types.is_multi());
        assert_eq!(
            types.categories().unwrap().as_slice(),
            &[Category::Pan, Category::Tap, Category::Scroll]
        );
    }

    #[test]
    fn unknown_name_fails_to_parse() {
        let types = EventTypes::multi(["pan", "lasso"]);
        assert_eq!(
            types.categories(),
            Err(ParseCategoryError("lasso".into()))
        );
    }

    #[test]
    fn every_channel_has_one_capability() {
        let mut all = Capabilities::empty();
        for channel in Channel::ALL {
            let cap = channel.capability();
            assert_eq!(cap.bits().count_ones(), 1, "{channel:?}");
            assert!(!all.intersects(cap), "{channel:?} shares a capability");
            all |= cap;
        }
        assert_eq!(all.bits().count_ones(), 19);
    }

    #[test]
    fn press_up_belongs_to_press() {
        let ev = UiEvent::Tap(TapEvent {
            kind: TapKind::PressUp,
            sx: 0.0,
            sy: 0.0,
            modifiers: Modifiers::empty(),
        });
        assert_eq!(Category::of_event(&ev), Some(Category::Press));
    }
}
