// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Named event channels with owner-tagged delivery.
//!
//! There is one [`Channel`] per gesture phase and discrete event. Every
//! emission carries an optional owner [`ToolId`]. A tool connected with
//! [`Delivery::Owned`] only receives emissions tagged with its own id;
//! [`Delivery::Broadcast`] connections receive every emission on the channel.
//!
//! Observers added with [`Channels::observe`] see every emission on every
//! channel before any tool does.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use smallvec::SmallVec;
use understory_gesture::event::{KeyKind, MoveKind, PhaseStep, TapKind, UiEvent};

use crate::tool::{Capabilities, ToolId};

/// A named event stream.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    /// `pan:start`
    PanStart,
    /// `pan`
    Pan,
    /// `pan:end`
    PanEnd,
    /// `pinch:start`
    PinchStart,
    /// `pinch`
    Pinch,
    /// `pinch:end`
    PinchEnd,
    /// `rotate:start`
    RotateStart,
    /// `rotate`
    Rotate,
    /// `rotate:end`
    RotateEnd,
    /// `tap`
    Tap,
    /// `doubletap`
    DoubleTap,
    /// `press`
    Press,
    /// `pressup`
    PressUp,
    /// `move:enter`
    MoveEnter,
    /// `move`
    Move,
    /// `move:exit`
    MoveExit,
    /// `scroll`
    Scroll,
    /// `keydown`
    KeyDown,
    /// `keyup`
    KeyUp,
}

impl Channel {
    /// Number of channels.
    pub const COUNT: usize = 19;

    /// Every channel.
    pub const ALL: [Self; Self::COUNT] = [
        Self::PanStart,
        Self::Pan,
        Self::PanEnd,
        Self::PinchStart,
        Self::Pinch,
        Self::PinchEnd,
        Self::RotateStart,
        Self::Rotate,
        Self::RotateEnd,
        Self::Tap,
        Self::DoubleTap,
        Self::Press,
        Self::PressUp,
        Self::MoveEnter,
        Self::Move,
        Self::MoveExit,
        Self::Scroll,
        Self::KeyDown,
        Self::KeyUp,
    ];

    /// Channel name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::PanStart => "pan:start",
            Self::Pan => "pan",
            Self::PanEnd => "pan:end",
            Self::PinchStart => "pinch:start",
            Self::Pinch => "pinch",
            Self::PinchEnd => "pinch:end",
            Self::RotateStart => "rotate:start",
            Self::Rotate => "rotate",
            Self::RotateEnd => "rotate:end",
            Self::Tap => "tap",
            Self::DoubleTap => "doubletap",
            Self::Press => "press",
            Self::PressUp => "pressup",
            Self::MoveEnter => "move:enter",
            Self::Move => "move",
            Self::MoveExit => "move:exit",
            Self::Scroll => "scroll",
            Self::KeyDown => "keydown",
            Self::KeyUp => "keyup",
        }
    }

    /// The handler slot a tool needs to be connected to this channel.
    pub const fn capability(self) -> Capabilities {
        match self {
            Self::PanStart => Capabilities::PAN_START,
            Self::Pan => Capabilities::PAN,
            Self::PanEnd => Capabilities::PAN_END,
            Self::PinchStart => Capabilities::PINCH_START,
            Self::Pinch => Capabilities::PINCH,
            Self::PinchEnd => Capabilities::PINCH_END,
            Self::RotateStart => Capabilities::ROTATE_START,
            Self::Rotate => Capabilities::ROTATE,
            Self::RotateEnd => Capabilities::ROTATE_END,
            Self::Tap => Capabilities::TAP,
            Self::DoubleTap => Capabilities::DOUBLE_TAP,
            Self::Press => Capabilities::PRESS,
            Self::PressUp => Capabilities::PRESS_UP,
            Self::MoveEnter => Capabilities::MOVE_ENTER,
            Self::Move => Capabilities::MOVE,
            Self::MoveExit => Capabilities::MOVE_EXIT,
            Self::Scroll => Capabilities::SCROLL,
            Self::KeyDown => Capabilities::KEY_DOWN,
            Self::KeyUp => Capabilities::KEY_UP,
        }
    }

    /// The channel an event is emitted on.
    pub fn for_event(event: &UiEvent) -> Self {
        let phased = |phase: PhaseStep, start: Self, update: Self, end: Self| match phase {
            PhaseStep::Start => start,
            PhaseStep::Update => update,
            PhaseStep::End => end,
        };
        match event {
            UiEvent::Pan(e) => phased(e.phase, Self::PanStart, Self::Pan, Self::PanEnd),
            UiEvent::Pinch(e) => phased(e.phase, Self::PinchStart, Self::Pinch, Self::PinchEnd),
            UiEvent::Rotate(e) => phased(e.phase, Self::RotateStart, Self::Rotate, Self::RotateEnd),
            UiEvent::Tap(e) => match e.kind {
                TapKind::Tap => Self::Tap,
                TapKind::DoubleTap => Self::DoubleTap,
                TapKind::Press => Self::Press,
                TapKind::PressUp => Self::PressUp,
            },
            UiEvent::Move(e) => match e.kind {
                MoveKind::Enter => Self::MoveEnter,
                MoveKind::Move => Self::Move,
                MoveKind::Leave => Self::MoveExit,
            },
            UiEvent::Scroll(_) => Self::Scroll,
            UiEvent::Key(e) => match e.kind {
                KeyKind::Down => Self::KeyDown,
                KeyKind::Up => Self::KeyUp,
            },
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a connected tool filters emissions.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Delivery {
    /// Only emissions tagged with the tool's id.
    Owned,
    /// Every emission.
    Broadcast,
}

/// One event published on a channel.
#[derive(Copy, Clone, Debug)]
pub struct Emission<'a> {
    /// Where.
    pub channel: Channel,
    /// Intended tool, or `None` for broadcasts.
    pub owner: Option<ToolId>,
    /// Payload, in plot-local coordinates.
    pub event: &'a UiEvent,
}

/// A tool's connection to a channel.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Connection {
    /// The connected tool.
    pub tool: ToolId,
    /// Its filter.
    pub delivery: Delivery,
}

impl Connection {
    /// Returns `true` if an emission tagged `owner` reaches this connection.
    pub fn accepts(&self, owner: Option<ToolId>) -> bool {
        match self.delivery {
            Delivery::Broadcast => true,
            Delivery::Owned => owner == Some(self.tool),
        }
    }
}

/// Handle returned by [`Channels::observe`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ObserverId(u32);

/// Callback type for channel observers.
pub type Observer = Box<dyn FnMut(&Emission<'_>)>;

/// Connections for every channel, plus external observers.
pub struct Channels {
    connections: [Vec<Connection>; Channel::COUNT],
    observers: Vec<(ObserverId, Observer)>,
    next_observer: u32,
}

impl fmt::Debug for Channels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let connections: usize = self.connections.iter().map(Vec::len).sum();
        f.debug_struct("Channels")
            .field("connections", &connections)
            .field("observers", &self.observers.len())
            .field("next_observer", &self.next_observer)
            .finish()
    }
}

impl Default for Channels {
    fn default() -> Self {
        Self::new()
    }
}

impl Channels {
    /// No connections, no observers.
    pub fn new() -> Self {
        Self {
            connections: core::array::from_fn(|_| Vec::new()),
            observers: Vec::new(),
            next_observer: 0,
        }
    }

    /// Connect `tool` to `channel`. Returns `false` if it already was.
    pub fn connect(&mut self, channel: Channel, tool: ToolId, delivery: Delivery) -> bool {
        let list = &mut self.connections[channel.index()];
        if list.iter().any(|c| c.tool == tool) {
            return false;
        }
        list.push(Connection { tool, delivery });
        true
    }

    /// Drop every connection of `tool`, returning how many there were.
    pub fn disconnect_tool(&mut self, tool: ToolId) -> usize {
        let mut removed = 0;
        for list in &mut self.connections {
            let before = list.len();
            list.retain(|c| c.tool != tool);
            removed += before - list.len();
        }
        removed
    }

    /// Connections on `channel`, in connection order.
    pub fn connections(&self, channel: Channel) -> &[Connection] {
        &self.connections[channel.index()]
    }

    /// Tools an emission tagged `owner` on `channel` reaches, in connection order.
    pub fn receivers(&self, channel: Channel, owner: Option<ToolId>) -> SmallVec<[ToolId; 4]> {
        self.connections(channel)
            .iter()
            .filter(|c| c.accepts(owner))
            .map(|c| c.tool)
            .collect()
    }

    /// Watch every emission.
    pub fn observe(&mut self, observer: impl FnMut(&Emission<'_>) + 'static) -> ObserverId {
        let id = ObserverId(self.next_observer);
        self.next_observer += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Stop watching. Returns `false` for unknown ids.
    pub fn unobserve(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(o, _)| *o != id);
        self.observers.len() != before
    }

    pub(crate) fn notify(&mut self, emission: &Emission<'_>) {
        for (_, observer) in &mut self.observers {
            observer(emission);
        }
    }

    /// Drop every connection and observer.
    pub fn clear(&mut self) {
        for list in &mut self.connections {
            list.clear();
        }
        self.observers.clear();
    }
}
