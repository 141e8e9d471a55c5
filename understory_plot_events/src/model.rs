// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public model events and the subscription facade.
//!
//! Every routed input event is also offered to user code as a [`ModelEvent`]:
//! a class-tagged record carrying both screen and data coordinates. Delivery
//! has two legs:
//!
//! - Per-model callbacks registered with [`EventSubscriptions::on_event`].
//! - A [`Document`]-wide [`EventManager`] that queues events for models whose
//!   subscriptions were published with
//!   [`Canvas::update_subscriptions`](crate::canvas::Canvas::update_subscriptions).
//!
//! The document also holds the model registry searched by
//! [`Document::select`] and [`Document::select_one`].

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

use hashbrown::{HashMap, HashSet};
use kurbo::Point;
use understory_gesture::event::{Modifiers, MoveKind, PhaseStep, TapKind, UiEvent};

use crate::geometry::{Frame, Range1d};

/// Identifier of a model in a [`Document`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelId(pub u64);

/// Position data shared by every pointer-derived model event.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerData {
    /// Screen x.
    pub sx: f64,
    /// Screen y.
    pub sy: f64,
    /// Data x.
    pub x: f64,
    /// Data y.
    pub y: f64,
    /// Modifiers.
    pub modifiers: Modifiers,
}

impl PointerData {
    fn at(frame: &Frame, sx: f64, sy: f64, modifiers: Modifiers) -> Self {
        let Point { x, y } = frame.invert(Point::new(sx, sy));
        Self {
            sx,
            sy,
            x,
            y,
            modifiers,
        }
    }
}

/// A public, class-tagged plot event.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ModelEvent {
    /// Confirmed tap.
    Tap(PointerData),
    /// Double tap.
    DoubleTap(PointerData),
    /// Long press.
    Press(PointerData),
    /// Long press release.
    PressUp(PointerData),
    /// Pan started.
    PanStart(PointerData),
    /// Pan moved; deltas are cumulative.
    Pan {
        /// Where.
        point: PointerData,
        /// Cumulative x offset.
        delta_x: f64,
        /// Cumulative y offset.
        delta_y: f64,
    },
    /// Pan ended.
    PanEnd(PointerData),
    /// Pinch started.
    PinchStart(PointerData),
    /// Pinch moved.
    Pinch {
        /// Where.
        point: PointerData,
        /// Scale relative to the start.
        scale: f64,
    },
    /// Pinch ended.
    PinchEnd(PointerData),
    /// Rotate started.
    RotateStart(PointerData),
    /// Rotate moved.
    Rotate {
        /// Where.
        point: PointerData,
        /// Degrees since the start.
        rotation: f64,
    },
    /// Rotate ended.
    RotateEnd(PointerData),
    /// Pointer entered the plot.
    MouseEnter(PointerData),
    /// Pointer moved over the plot.
    MouseMove(PointerData),
    /// Pointer left the plot.
    MouseLeave(PointerData),
    /// Wheel over the plot.
    MouseWheel {
        /// Where.
        point: PointerData,
        /// Pixels; positive scrolls up.
        delta: f64,
    },
    /// A tool changed the plot's data ranges.
    RangesUpdate {
        /// New x range.
        x: Range1d,
        /// New y range.
        y: Range1d,
    },
}

macro_rules! event_kinds {
    ($($variant:ident => $name:literal,)*) => {
        /// The class tag of a [`ModelEvent`].
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
        pub enum ModelEventKind {
            $(
                #[doc = concat!("`", $name, "`")]
                $variant,
            )*
        }

        impl ModelEventKind {
            /// Every kind.
            pub const ALL: &'static [Self] = &[$(Self::$variant,)*];

            /// Wire name of the kind.
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)*
                }
            }
        }
    };
}

event_kinds! {
    Tap => "tap",
    DoubleTap => "doubletap",
    Press => "press",
    PressUp => "pressup",
    PanStart => "panstart",
    Pan => "pan",
    PanEnd => "panend",
    PinchStart => "pinchstart",
    Pinch => "pinch",
    PinchEnd => "pinchend",
    RotateStart => "rotatestart",
    Rotate => "rotate",
    RotateEnd => "rotateend",
    MouseEnter => "mouseenter",
    MouseMove => "mousemove",
    MouseLeave => "mouseleave",
    MouseWheel => "wheel",
    RangesUpdate => "rangesupdate",
}

impl fmt::Display for ModelEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An event name that is not a [`ModelEventKind`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown model event `{0}`")]
pub struct ParseEventKindError(pub String);

impl FromStr for ModelEventKind {
    type Err = ParseEventKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| ParseEventKindError(s.into()))
    }
}

impl ModelEvent {
    /// Build the public event for a routed UI event, with data coordinates
    /// inverted through `frame`. Key events have no public counterpart.
    pub fn from_ui(event: &UiEvent, frame: &Frame) -> Option<Self> {
        let pos = event.position()?;
        let point = PointerData::at(frame, pos.x, pos.y, event.modifiers());
        Some(match event {
            UiEvent::Pan(e) => match e.phase {
                PhaseStep::Start => Self::PanStart(point),
                PhaseStep::Update => Self::Pan {
                    point,
                    delta_x: e.delta_x,
                    delta_y: e.delta_y,
                },
                PhaseStep::End => Self::PanEnd(point),
            },
            UiEvent::Pinch(e) => match e.phase {
                PhaseStep::Start => Self::PinchStart(point),
                PhaseStep::Update => Self::Pinch {
                    point,
                    scale: e.scale,
                },
                PhaseStep::End => Self::PinchEnd(point),
            },
            UiEvent::Rotate(e) => match e.phase {
                PhaseStep::Start => Self::RotateStart(point),
                PhaseStep::Update => Self::Rotate {
                    point,
                    rotation: e.rotation,
                },
                PhaseStep::End => Self::RotateEnd(point),
            },
            UiEvent::Tap(e) => match e.kind {
                TapKind::Tap => Self::Tap(point),
                TapKind::DoubleTap => Self::DoubleTap(point),
                TapKind::Press => Self::Press(point),
                TapKind::PressUp => Self::PressUp(point),
            },
            UiEvent::Move(e) => match e.kind {
                MoveKind::Enter => Self::MouseEnter(point),
                MoveKind::Move => Self::MouseMove(point),
                MoveKind::Leave => Self::MouseLeave(point),
            },
            UiEvent::Scroll(e) => Self::MouseWheel {
                point,
                delta: e.delta,
            },
            UiEvent::Key(_) => return None,
        })
    }

    /// The class tag.
    pub fn kind(&self) -> ModelEventKind {
        match self {
            Self::Tap(_) => ModelEventKind::Tap,
            Self::DoubleTap(_) => ModelEventKind::DoubleTap,
            Self::Press(_) => ModelEventKind::Press,
            Self::PressUp(_) => ModelEventKind::PressUp,
            Self::PanStart(_) => ModelEventKind::PanStart,
            Self::Pan { .. } => ModelEventKind::Pan,
            Self::PanEnd(_) => ModelEventKind::PanEnd,
            Self::PinchStart(_) => ModelEventKind::PinchStart,
            Self::Pinch { .. } => ModelEventKind::Pinch,
            Self::PinchEnd(_) => ModelEventKind::PinchEnd,
            Self::RotateStart(_) => ModelEventKind::RotateStart,
            Self::Rotate { .. } => ModelEventKind::Rotate,
            Self::RotateEnd(_) => ModelEventKind::RotateEnd,
            Self::MouseEnter(_) => ModelEventKind::MouseEnter,
            Self::MouseMove(_) => ModelEventKind::MouseMove,
            Self::MouseLeave(_) => ModelEventKind::MouseLeave,
            Self::MouseWheel { .. } => ModelEventKind::MouseWheel,
            Self::RangesUpdate { .. } => ModelEventKind::RangesUpdate,
        }
    }

    /// Position data, for pointer-derived events.
    pub fn point(&self) -> Option<&PointerData> {
        match self {
            Self::Tap(p)
            | Self::DoubleTap(p)
            | Self::Press(p)
            | Self::PressUp(p)
            | Self::PanStart(p)
            | Self::PanEnd(p)
            | Self::PinchStart(p)
            | Self::PinchEnd(p)
            | Self::RotateStart(p)
            | Self::RotateEnd(p)
            | Self::MouseEnter(p)
            | Self::MouseMove(p)
            | Self::MouseLeave(p) => Some(p),
            Self::Pan { point, .. }
            | Self::Pinch { point, .. }
            | Self::Rotate { point, .. }
            | Self::MouseWheel { point, .. } => Some(point),
            Self::RangesUpdate { .. } => None,
        }
    }
}

/// A per-model event callback.
pub type EventCallback = Box<dyn FnMut(&ModelEvent)>;

/// Per-model callbacks and the kinds published to the document.
#[derive(Default)]
pub struct EventSubscriptions {
    callbacks: HashMap<ModelEventKind, Vec<EventCallback>>,
    subscribed: HashSet<ModelEventKind>,
}

impl fmt::Debug for EventSubscriptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let callbacks: usize = self.callbacks.values().map(Vec::len).sum();
        f.debug_struct("EventSubscriptions")
            .field("callbacks", &callbacks)
            .field("subscribed", &self.subscribed)
            .finish()
    }
}

impl EventSubscriptions {
    /// Run `callback` for every event of `kind` triggered on the model.
    pub fn on_event(&mut self, kind: ModelEventKind, callback: impl FnMut(&ModelEvent) + 'static) {
        self.callbacks
            .entry(kind)
            .or_default()
            .push(Box::new(callback));
    }

    /// Ask for `kind` to be forwarded to the document's event manager.
    ///
    /// Takes effect once the subscriptions are published.
    pub fn subscribe(&mut self, kind: ModelEventKind) {
        self.subscribed.insert(kind);
    }

    /// Stop forwarding `kind`.
    pub fn unsubscribe(&mut self, kind: ModelEventKind) {
        self.subscribed.remove(&kind);
    }

    /// Kinds requested for forwarding.
    pub fn subscribed(&self) -> &HashSet<ModelEventKind> {
        &self.subscribed
    }

    /// Returns `true` if any callback is registered for `kind`.
    pub fn has_callbacks(&self, kind: ModelEventKind) -> bool {
        self.callbacks.get(&kind).is_some_and(|cbs| !cbs.is_empty())
    }

    pub(crate) fn fire(&mut self, event: &ModelEvent) {
        if let Some(callbacks) = self.callbacks.get_mut(&event.kind()) {
            for callback in callbacks {
                callback(event);
            }
        }
    }
}

/// Document-wide forwarding of model events.
#[derive(Debug, Default)]
pub struct EventManager {
    subscribed: HashMap<ModelId, HashSet<ModelEventKind>>,
    outgoing: Vec<(ModelId, ModelEvent)>,
}

impl EventManager {
    /// Replace the published subscriptions of `model`.
    pub fn set_subscriptions(&mut self, model: ModelId, kinds: HashSet<ModelEventKind>) {
        if kinds.is_empty() {
            self.subscribed.remove(&model);
        } else {
            self.subscribed.insert(model, kinds);
        }
    }

    /// Returns `true` if `model` published a subscription to `kind`.
    pub fn is_subscribed(&self, model: ModelId, kind: ModelEventKind) -> bool {
        self.subscribed
            .get(&model)
            .is_some_and(|kinds| kinds.contains(&kind))
    }

    /// Queue `event` if its origin subscribed to it. Returns `true` if queued.
    pub fn send(&mut self, origin: ModelId, event: ModelEvent) -> bool {
        if !self.is_subscribed(origin, event.kind()) {
            return false;
        }
        self.outgoing.push((origin, event));
        true
    }

    /// Events waiting to be sent.
    pub fn pending(&self) -> &[(ModelId, ModelEvent)] {
        &self.outgoing
    }

    /// Take every queued event, oldest first.
    pub fn drain(&mut self) -> Vec<(ModelId, ModelEvent)> {
        core::mem::take(&mut self.outgoing)
    }

    fn forget(&mut self, model: ModelId) {
        self.subscribed.remove(&model);
    }
}

/// A model known to a [`Document`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelRecord {
    /// Identifier.
    pub id: ModelId,
    /// Model class, e.g. `"Plot"`.
    pub type_name: &'static str,
    /// Optional user-facing name.
    pub name: Option<String>,
    /// Free-form tags.
    pub tags: Vec<String>,
}

impl ModelRecord {
    /// An unnamed, untagged model.
    pub fn new(id: ModelId, type_name: &'static str) -> Self {
        Self {
            id,
            type_name,
            name: None,
            tags: Vec::new(),
        }
    }

    /// Builder-style name setter.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Builder-style tag appender.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }
}

/// Criteria for [`Document::select`]. Unset fields match everything.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selector {
    name: Option<String>,
    type_name: Option<&'static str>,
    tag: Option<String>,
}

impl Selector {
    /// Match models with this name.
    #[must_use]
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Match models of this class.
    #[must_use]
    pub fn of_type(type_name: &'static str) -> Self {
        Self {
            type_name: Some(type_name),
            ..Self::default()
        }
    }

    /// Additionally require `tag`.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Returns `true` if `record` satisfies every set criterion.
    pub fn matches(&self, record: &ModelRecord) -> bool {
        self.name
            .as_ref()
            .is_none_or(|name| record.name.as_ref() == Some(name))
            && self.type_name.is_none_or(|t| record.type_name == t)
            && self
                .tag
                .as_ref()
                .is_none_or(|tag| record.tags.contains(tag))
    }
}

/// A unique lookup matched several models.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SelectError {
    /// More than one model matched.
    #[error("selector matched {count} models, expected at most one")]
    Ambiguous {
        /// Number of matches.
        count: usize,
    },
}

/// The model registry and event manager shared by every plot on a page.
#[derive(Debug, Default)]
pub struct Document {
    models: Vec<ModelRecord>,
    event_manager: EventManager,
}

impl Document {
    /// An empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `record`, replacing any model with the same id.
    pub fn add_model(&mut self, record: ModelRecord) {
        self.models.retain(|m| m.id != record.id);
        self.models.push(record);
    }

    /// Remove a model and its published subscriptions.
    pub fn remove_model(&mut self, id: ModelId) -> Option<ModelRecord> {
        let idx = self.models.iter().position(|m| m.id == id)?;
        self.event_manager.forget(id);
        Some(self.models.remove(idx))
    }

    /// Returns `true` if `id` is in the document.
    pub fn contains(&self, id: ModelId) -> bool {
        self.models.iter().any(|m| m.id == id)
    }

    /// Every model matching `selector`, in insertion order.
    pub fn select<'a>(&'a self, selector: &'a Selector) -> impl Iterator<Item = &'a ModelRecord> + 'a {
        self.models.iter().filter(move |m| selector.matches(m))
    }

    /// The single model matching `selector`.
    ///
    /// No match is `Ok(None)`; several matches are an error.
    pub fn select_one(&self, selector: &Selector) -> Result<Option<&ModelRecord>, SelectError> {
        let mut matches = self.models.iter().filter(|m| selector.matches(m));
        let first = matches.next();
        let rest = matches.count();
        if rest > 0 {
            return Err(SelectError::Ambiguous { count: rest + 1 });
        }
        Ok(first)
    }

    /// The event manager.
    pub fn event_manager(&self) -> &EventManager {
        &self.event_manager
    }

    /// Mutable access to the event manager.
    pub fn event_manager_mut(&mut self) -> &mut EventManager {
        &mut self.event_manager
    }
}
