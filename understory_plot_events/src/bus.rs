// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The UI event bus: tool registration, routing and dispatch.
//!
//! [`UiEventBus`] owns the [`Canvas`], the [`Normalizer`] feeding it and the
//! [`Channels`] tools are connected to. Every canonical event goes through
//! three steps:
//!
//! 1. **Route.** Pan, pinch and rotate are sticky: the plot hit at the start
//!    receives every later phase, and phases without a start are dropped.
//!    Hover movement is tracked across plots so every crossing produces a
//!    move-exit on the old plot and a move-enter on the new one before the
//!    move itself. Taps and wheel go to whatever plot is under the pointer.
//!    Keys skip routing and are broadcast.
//! 2. **Dispatch.** The plot's toolbar names the active tool for the event's
//!    category and the emission is tagged with that tool's id. Hover also
//!    reaches every active inspector and updates the cursor.
//! 3. **Publish.** The matching [`ModelEvent`] is delivered to the plot's
//!    model whether or not a tool claimed the input.
//!
//! ## Example
//!
//! ```
//! use kurbo::Rect;
//! use understory_gesture::event::{TapEvent, TapKind, UiEvent, Modifiers};
//! use understory_gesture::normalize::SourceInfo;
//! use understory_plot_events::bus::{BusConfig, UiEventBus};
//! use understory_plot_events::canvas::Canvas;
//! use understory_plot_events::geometry::{Frame, Range1d};
//! use understory_plot_events::tool::{Capabilities, EventTypes, ToolContext, ToolView};
//!
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! struct Counter(Rc<Cell<u32>>);
//!
//! impl ToolView for Counter {
//!     fn name(&self) -> &str { "counter" }
//!     fn event_types(&self) -> EventTypes { EventTypes::single("tap") }
//!     fn capabilities(&self) -> Capabilities { Capabilities::TAP }
//!     fn tap(&mut self, _: &mut ToolContext<'_>, _: &TapEvent) { self.0.set(self.0.get() + 1); }
//! }
//!
//! let mut canvas = Canvas::new();
//! let bbox = Rect::new(0.0, 0.0, 400.0, 300.0);
//! let frame = Frame::new(bbox.inset(-40.0), Range1d::new(0.0, 1.0), Range1d::new(0.0, 1.0));
//! let plot = canvas.add_plot(bbox, frame);
//!
//! let mut bus = UiEventBus::new(canvas, BusConfig::default());
//! let taps = Rc::new(Cell::new(0));
//! bus.register_tool(plot, Counter(taps.clone())).unwrap();
//!
//! let tap = |sx, sy| UiEvent::Tap(TapEvent { kind: TapKind::Tap, sx, sy, modifiers: Modifiers::empty() });
//! let source = SourceInfo { reached_surface: true, pointer_kind: None };
//! bus.dispatch_event(tap(200.0, 150.0), source);
//! // Inside the plot box, outside its data frame: no tool dispatch.
//! bus.dispatch_event(tap(10.0, 150.0), source);
//! assert_eq!(taps.get(), 1);
//! ```

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use hashbrown::HashMap;
use kurbo::Point;
use smallvec::SmallVec;
use understory_event_state::moves::{MoveState, MoveTransition};
use understory_event_state::phase::{GestureSlots, PhaseGesture};
use understory_gesture::event::{MoveEvent, MoveKind, PhaseStep, TapKind, UiEvent};
use understory_gesture::input::RawInput;
use understory_gesture::listeners::{Attachment, InputHost};
use understory_gesture::normalize::{Normalized, Normalizer, SourceInfo};

use crate::canvas::{Canvas, Cursor, PlotId};
use crate::channel::{Channel, Channels, Delivery, Emission, ObserverId};
use crate::hit::{find_frame, find_plot, find_renderer};
use crate::model::ModelEvent;
use crate::tool::{
    Capabilities, Category, Overlay, ParseCategoryError, ToolContext, ToolId, ToolView, deliver,
};

/// Bus configuration.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BusConfig {
    /// The device has a touch screen.
    ///
    /// Wheel input then resolves its active tool from the pinch category, and
    /// pinch tools that handle the wheel receive every wheel event over their
    /// own plot.
    pub touch_capable: bool,
}

impl BusConfig {
    /// Set [`BusConfig::touch_capable`].
    #[must_use]
    pub fn with_touch_capable(mut self, touch_capable: bool) -> Self {
        self.touch_capable = touch_capable;
        self
    }
}

bitflags::bitflags! {
    /// What the host should do with the native event after dispatch.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Propagation: u8 {
        /// Suppress the platform's default action (scrolling, selection).
        const PREVENT_DEFAULT  = 0b01;
        /// Stop the native event from reaching outer listeners.
        const STOP_PROPAGATION = 0b10;
    }
}

/// Why a tool could not be registered.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegisterError {
    /// The tool declares a category the router does not know.
    #[error(transparent)]
    UnsupportedEventType(#[from] ParseCategoryError),
    /// The target plot is not mounted on the canvas.
    #[error("plot {0:?} is not mounted")]
    UnknownPlot(PlotId),
    /// The tool declares no categories at all.
    #[error("tool declares no event types")]
    EmptyEventTypes,
}

struct ToolSlot {
    plot: PlotId,
    view: Box<dyn ToolView>,
    categories: SmallVec<[Category; 2]>,
}

/// Routes canonical events from one capture surface to plots and tools.
pub struct UiEventBus {
    canvas: Canvas,
    normalizer: Normalizer,
    slots: GestureSlots<PlotId>,
    moves: MoveState<PlotId>,
    channels: Channels,
    tools: HashMap<ToolId, ToolSlot>,
    next_tool: u32,
    config: BusConfig,
    attachment: Option<Attachment>,
    scratch: Vec<Normalized>,
}

impl fmt::Debug for UiEventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UiEventBus")
            .field("canvas", &self.canvas)
            .field("normalizer", &self.normalizer)
            .field("slots", &self.slots)
            .field("moves", &self.moves)
            .field("channels", &self.channels)
            .field("tools", &self.tools.len())
            .field("config", &self.config)
            .field("attached", &self.attachment.is_some())
            .finish_non_exhaustive()
    }
}

impl UiEventBus {
    /// A bus over `canvas` with the default normalizer.
    pub fn new(canvas: Canvas, config: BusConfig) -> Self {
        Self::with_normalizer(canvas, Normalizer::default(), config)
    }

    /// A bus over `canvas` fed by `normalizer`.
    pub fn with_normalizer(canvas: Canvas, normalizer: Normalizer, config: BusConfig) -> Self {
        Self {
            canvas,
            normalizer,
            slots: GestureSlots::new(),
            moves: MoveState::new(),
            channels: Channels::new(),
            tools: HashMap::new(),
            next_tool: 0,
            config,
            attachment: None,
            scratch: Vec::new(),
        }
    }

    /// Configuration.
    pub fn config(&self) -> &BusConfig {
        &self.config
    }

    /// The canvas.
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// The canvas, mutably.
    pub fn canvas_mut(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    /// The normalizer, e.g. to update the surface offset after layout.
    pub fn normalizer_mut(&mut self) -> &mut Normalizer {
        &mut self.normalizer
    }

    /// Register the native listeners feeding this bus with `host`.
    ///
    /// Does nothing if the bus is already attached.
    pub fn attach(&mut self, host: &mut dyn InputHost) {
        if self.attachment.is_none() {
            self.attachment = Some(Attachment::attach(host));
        }
    }

    /// Returns `true` while native listeners are registered.
    pub fn is_attached(&self) -> bool {
        self.attachment.is_some()
    }

    /// Tear the bus down: release every listener with `host`, drop every tool
    /// and the recognizer, and hand the canvas back.
    pub fn destroy(mut self, host: &mut dyn InputHost) -> Canvas {
        if let Some(attachment) = self.attachment.take() {
            attachment.detach(host);
        }
        self.channels.clear();
        self.normalizer.reset();
        tracing::debug!(tools = self.tools.len(), "event bus destroyed");
        self.canvas
    }

    /// Register `view` as a tool of `plot`.
    ///
    /// Every declared category is parsed up front, so an unknown category
    /// fails here and never at dispatch time. Tap and pan tools become active
    /// if their categories are vacant; other tools wait for
    /// [`UiEventBus::activate_tool`].
    pub fn register_tool(
        &mut self,
        plot: PlotId,
        view: impl ToolView + 'static,
    ) -> Result<ToolId, RegisterError> {
        self.register_boxed(plot, Box::new(view))
    }

    /// [`UiEventBus::register_tool`] for an already boxed view.
    pub fn register_boxed(
        &mut self,
        plot: PlotId,
        view: Box<dyn ToolView>,
    ) -> Result<ToolId, RegisterError> {
        let categories = view.event_types().categories()?;
        if categories.is_empty() {
            return Err(RegisterError::EmptyEventTypes);
        }
        let Some(plot_view) = self.canvas.plot_mut(plot) else {
            return Err(RegisterError::UnknownPlot(plot));
        };

        let id = ToolId(self.next_tool);
        self.next_tool += 1;
        let caps = view.capabilities();

        for (i, category) in categories.iter().enumerate() {
            for &channel in category.channels() {
                if caps.contains(channel.capability()) {
                    self.channels.connect(channel, id, Delivery::Owned);
                }
            }
            // Keys are shared by every category of a tool; wire them once.
            if i == 0 {
                for channel in [Channel::KeyDown, Channel::KeyUp] {
                    if caps.contains(channel.capability()) {
                        self.channels.connect(channel, id, Delivery::Broadcast);
                    }
                }
            }
        }

        if self.config.touch_capable
            && categories.contains(&Category::Pinch)
            && !categories.contains(&Category::Scroll)
            && caps.contains(Capabilities::SCROLL)
        {
            self.channels.connect(Channel::Scroll, id, Delivery::Broadcast);
            tracing::debug!(tool = id.0, name = view.name(), "wheel wired to pinch tool");
        }

        plot_view
            .toolbar_mut()
            .add_tool(id, &categories, view.is_inspector());
        tracing::debug!(
            tool = id.0,
            plot = plot.0,
            name = view.name(),
            categories = categories.len(),
            "registered tool"
        );
        self.tools.insert(
            id,
            ToolSlot {
                plot,
                view,
                categories,
            },
        );
        Ok(id)
    }

    /// Disconnect `tool` and remove it from its plot's toolbar.
    pub fn unregister_tool(&mut self, tool: ToolId) -> Option<Box<dyn ToolView>> {
        let slot = self.tools.remove(&tool)?;
        let connections = self.channels.disconnect_tool(tool);
        if let Some(view) = self.canvas.plot_mut(slot.plot) {
            view.toolbar_mut().remove_tool(tool);
        }
        tracing::debug!(tool = tool.0, connections, "unregistered tool");
        Some(slot.view)
    }

    /// A registered tool.
    pub fn tool(&self, tool: ToolId) -> Option<&dyn ToolView> {
        self.tools.get(&tool).map(|slot| slot.view.as_ref())
    }

    /// The plot `tool` is attached to.
    pub fn tool_plot(&self, tool: ToolId) -> Option<PlotId> {
        self.tools.get(&tool).map(|slot| slot.plot)
    }

    /// Categories `tool` declared, in declaration order.
    pub fn tool_categories(&self, tool: ToolId) -> Option<&[Category]> {
        self.tools.get(&tool).map(|slot| slot.categories.as_slice())
    }

    /// The overlay `tool` currently wants drawn.
    pub fn tool_overlay(&self, tool: ToolId) -> Option<Overlay> {
        self.tools.get(&tool).and_then(|slot| slot.view.overlay())
    }

    /// Make `tool` active: in every category it declares, or as an inspector.
    pub fn activate_tool(&mut self, tool: ToolId) -> bool {
        self.set_tool_active(tool, true)
    }

    /// Make `tool` inactive.
    pub fn deactivate_tool(&mut self, tool: ToolId) -> bool {
        self.set_tool_active(tool, false)
    }

    fn set_tool_active(&mut self, tool: ToolId, active: bool) -> bool {
        let Some(slot) = self.tools.get(&tool) else {
            return false;
        };
        let inspector = slot.view.is_inspector();
        let Some(view) = self.canvas.plot_mut(slot.plot) else {
            return false;
        };
        let toolbar = view.toolbar_mut();
        match (inspector, active) {
            (true, _) => toolbar.set_inspector_active(tool, active),
            (false, true) => toolbar.activate(tool),
            (false, false) => {
                toolbar.deactivate(tool);
                true
            }
        }
    }

    /// The plot an in-flight gesture is bound to.
    pub fn active_gesture(&self, gesture: PhaseGesture) -> Option<PlotId> {
        self.slots.slot(gesture).current()
    }

    /// Watch every emission on every channel.
    pub fn observe(&mut self, observer: impl FnMut(&Emission<'_>) + 'static) -> ObserverId {
        self.channels.observe(observer)
    }

    /// Stop watching.
    pub fn unobserve(&mut self, id: ObserverId) -> bool {
        self.channels.unobserve(id)
    }

    /// Abandon every in-flight gesture and pending recognition.
    ///
    /// Hosts call this when the surface loses focus or visibility, where the
    /// end phase of a gesture may never arrive.
    pub fn cancel_gestures(&mut self) {
        let in_flight = self.slots.any_active();
        self.slots.cancel_all();
        self.normalizer.reset();
        tracing::debug!(in_flight, "gestures cancelled");
    }

    /// Normalize and dispatch one raw input.
    pub fn handle(&mut self, input: &RawInput) -> Propagation {
        let mut batch = core::mem::take(&mut self.scratch);
        self.normalizer.handle(input, &mut batch);
        let propagation = self.dispatch_batch(&mut batch);
        self.scratch = batch;
        propagation
    }

    /// Let time pass, dispatching timer-confirmed gestures.
    pub fn advance(&mut self, now: u64) -> Propagation {
        let mut batch = core::mem::take(&mut self.scratch);
        self.normalizer.advance(now, &mut batch);
        let propagation = self.dispatch_batch(&mut batch);
        self.scratch = batch;
        propagation
    }

    fn dispatch_batch(&mut self, batch: &mut Vec<Normalized>) -> Propagation {
        let mut propagation = Propagation::empty();
        for normalized in batch.drain(..) {
            propagation |= self.dispatch_event(normalized.event, normalized.source);
        }
        propagation
    }

    /// Route and dispatch one canonical event in capture-surface coordinates.
    pub fn dispatch_event(&mut self, event: UiEvent, source: SourceInfo) -> Propagation {
        let (gesture, phase) = match &event {
            UiEvent::Pan(e) => (PhaseGesture::Pan, e.phase),
            UiEvent::Pinch(e) => (PhaseGesture::Pinch, e.phase),
            UiEvent::Rotate(e) => (PhaseGesture::Rotate, e.phase),
            UiEvent::Move(e) => return self.route_move(*e, source),
            UiEvent::Key(_) => {
                let channel = Channel::for_event(&event);
                self.emit(channel, None, None, &event);
                return Propagation::empty();
            }
            UiEvent::Tap(_) | UiEvent::Scroll(_) => {
                return match event.position().and_then(|p| find_plot(&self.canvas, p)) {
                    Some(plot) => self.dispatch(plot, event, source),
                    None => Propagation::empty(),
                };
            }
        };
        let hit = match phase {
            PhaseStep::Start => {
                event.position().and_then(|p| find_plot(&self.canvas, p))
            }
            _ => None,
        };
        match self.slots.step(gesture, phase, hit) {
            Some(plot) => self.dispatch(plot, event, source),
            None => Propagation::empty(),
        }
    }

    fn route_move(&mut self, event: MoveEvent, source: SourceInfo) -> Propagation {
        let pos = Point::new(event.sx, event.sy);
        let hit = find_plot(&self.canvas, pos);
        let mut propagation = Propagation::empty();
        for transition in self.moves.update(event.kind, pos, hit) {
            let (plot, kind) = match transition {
                MoveTransition::Exit(p) => (p, MoveKind::Leave),
                MoveTransition::Enter(p) => (p, MoveKind::Enter),
                MoveTransition::Move(p) => (p, MoveKind::Move),
            };
            let routed = UiEvent::Move(MoveEvent { kind, ..event });
            propagation |= self.dispatch(plot, routed, source);
        }
        propagation
    }

    fn dispatch(&mut self, plot: PlotId, event: UiEvent, source: SourceInfo) -> Propagation {
        let Some(view) = self.canvas.plot(plot) else {
            return Propagation::empty();
        };
        let event = event.relativized(|p| view.to_local(p));
        let frame = *view.frame();
        let toolbar = view.toolbar();
        let channel = Channel::for_event(&event);
        let mut propagation = Propagation::empty();

        match &event {
            UiEvent::Move(_) => self.dispatch_move(plot, &event, channel),
            UiEvent::Tap(tap) => {
                let pos = Point::new(tap.sx, tap.sy);
                let active = match tap.kind {
                    TapKind::Tap => {
                        if !source.reached_surface {
                            return propagation;
                        }
                        let active = toolbar.active(Category::Tap);
                        if let Some(renderer) = find_renderer(view, pos) {
                            if let Some(r) = self
                                .canvas
                                .plot_mut(plot)
                                .and_then(|v| v.renderer_mut(renderer))
                            {
                                r.on_hit(pos);
                            }
                        }
                        active.filter(|_| frame.contains(pos))
                    }
                    TapKind::DoubleTap => toolbar
                        .active(Category::DoubleTap)
                        .or_else(|| toolbar.active(Category::Tap))
                        .filter(|_| frame.contains(pos)),
                    TapKind::Press | TapKind::PressUp => toolbar.active(Category::Press),
                };
                if let Some(tool) = active {
                    self.emit(channel, Some(plot), Some(tool), &event);
                }
            }
            UiEvent::Scroll(_) => {
                let category = if self.config.touch_capable {
                    Category::Pinch
                } else {
                    Category::Scroll
                };
                if let Some(tool) = toolbar.active(category) {
                    propagation |= Propagation::PREVENT_DEFAULT | Propagation::STOP_PROPAGATION;
                    self.emit(channel, Some(plot), Some(tool), &event);
                }
            }
            UiEvent::Pan(_) => {
                if let Some(tool) = toolbar.active(Category::Pan) {
                    propagation |= Propagation::PREVENT_DEFAULT;
                    self.emit(channel, Some(plot), Some(tool), &event);
                }
            }
            UiEvent::Pinch(_) | UiEvent::Rotate(_) | UiEvent::Key(_) => {
                let active = Category::of_event(&event).and_then(|c| toolbar.active(c));
                if let Some(tool) = active {
                    self.emit(channel, Some(plot), Some(tool), &event);
                }
            }
        }

        if let Some(model_event) = ModelEvent::from_ui(&event, &frame) {
            self.canvas.trigger_event(plot, model_event);
        }
        propagation
    }

    fn dispatch_move(&mut self, plot: PlotId, event: &UiEvent, channel: Channel) {
        let (Some(view), Some(pos)) = (self.canvas.plot(plot), event.position()) else {
            return;
        };
        let toolbar = view.toolbar();
        let active = toolbar.active(Category::Move);
        let inspectors: SmallVec<[ToolId; 4]> = toolbar.active_inspectors().collect();

        let renderer = find_renderer(view, pos);
        let cursor = match renderer {
            Some(r) => view
                .renderer(r)
                .and_then(|r| r.cursor(pos))
                .unwrap_or_default(),
            None if !inspectors.is_empty() && find_frame(view, pos) => Cursor::Crosshair,
            None => Cursor::Default,
        };
        self.canvas.set_cursor(cursor);

        if let Some(tool) = active {
            if renderer.is_some() && !inspectors.is_empty() {
                let exit = exit_event(event);
                self.emit(Channel::MoveExit, Some(plot), Some(tool), &exit);
            } else {
                self.emit(channel, Some(plot), Some(tool), event);
            }
        }
        for inspector in inspectors {
            if Some(inspector) != active {
                self.emit(channel, Some(plot), Some(inspector), event);
            }
        }
    }

    /// Deliver `event` on `channel`.
    ///
    /// With `plot` set, broadcast receivers attached to other plots are skipped.
    fn emit(
        &mut self,
        channel: Channel,
        plot: Option<PlotId>,
        owner: Option<ToolId>,
        event: &UiEvent,
    ) {
        let emission = Emission {
            channel,
            owner,
            event,
        };
        self.channels.notify(&emission);
        for id in self.channels.receivers(channel, owner) {
            let Some(slot) = self.tools.get_mut(&id) else {
                continue;
            };
            if owner != Some(id) && plot.is_some_and(|p| p != slot.plot) {
                continue;
            }
            let mut ctx = ToolContext::new(&mut self.canvas, slot.plot, id);
            deliver(slot.view.as_mut(), channel, &mut ctx, event);
        }
    }
}

fn exit_event(event: &UiEvent) -> UiEvent {
    match event {
        UiEvent::Move(e) => UiEvent::Move(MoveEvent {
            kind: MoveKind::Leave,
            ..*e
        }),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Frame, Range1d};
    use alloc::rc::Rc;
    use alloc::vec;
    use core::cell::RefCell;
    use kurbo::Rect;
    use crate::tool::EventTypes;
    use understory_gesture::event::{
        KeyEvent, KeyKind, Modifiers, PanEvent, PinchEvent, RotateEvent, ScrollEvent, TapEvent,
    };
    use understory_gesture::listeners::{ListenerHandle, ListenerKind, ListenerScope};

    type Log = Rc<RefCell<Vec<(&'static str, Channel)>>>;

    struct Recorder {
        name: &'static str,
        types: EventTypes,
        caps: Capabilities,
        log: Log,
    }

    impl Recorder {
        fn new(name: &'static str, types: EventTypes, caps: Capabilities, log: &Log) -> Self {
            Self {
                name,
                types,
                caps,
                log: log.clone(),
            }
        }

        fn record(&self, channel: Channel) {
            self.log.borrow_mut().push((self.name, channel));
        }
    }

    impl ToolView for Recorder {
        fn name(&self) -> &str {
            self.name
        }
        fn event_types(&self) -> EventTypes {
            self.types.clone()
        }
        fn capabilities(&self) -> Capabilities {
            self.caps
        }
        fn pan_start(&mut self, _: &mut ToolContext<'_>, _: &PanEvent) {
            self.record(Channel::PanStart);
        }
        fn pan(&mut self, _: &mut ToolContext<'_>, _: &PanEvent) {
            self.record(Channel::Pan);
        }
        fn pan_end(&mut self, _: &mut ToolContext<'_>, _: &PanEvent) {
            self.record(Channel::PanEnd);
        }
        fn pinch_start(&mut self, _: &mut ToolContext<'_>, _: &PinchEvent) {
            self.record(Channel::PinchStart);
        }
        fn pinch(&mut self, _: &mut ToolContext<'_>, _: &PinchEvent) {
            self.record(Channel::Pinch);
        }
        fn pinch_end(&mut self, _: &mut ToolContext<'_>, _: &PinchEvent) {
            self.record(Channel::PinchEnd);
        }
        fn rotate_start(&mut self, _: &mut ToolContext<'_>, _: &RotateEvent) {
            self.record(Channel::RotateStart);
        }
        fn rotate(&mut self, _: &mut ToolContext<'_>, _: &RotateEvent) {
            self.record(Channel::Rotate);
        }
        fn rotate_end(&mut self, _: &mut ToolContext<'_>, _: &RotateEvent) {
            self.record(Channel::RotateEnd);
        }
        fn press(&mut self, _: &mut ToolContext<'_>, _: &TapEvent) {
            self.record(Channel::Press);
        }
        fn press_up(&mut self, _: &mut ToolContext<'_>, _: &TapEvent) {
            self.record(Channel::PressUp);
        }
        fn scroll(&mut self, _: &mut ToolContext<'_>, _: &ScrollEvent) {
            self.record(Channel::Scroll);
        }
    }

    /// Register a recorder and make it active in its category.
    fn install(
        bus: &mut UiEventBus,
        plot: PlotId,
        name: &'static str,
        category: Category,
        caps: Capabilities,
        log: &Log,
    ) -> ToolId {
        let tool = bus
            .register_tool(plot, Recorder::new(name, category.into(), caps, log))
            .unwrap();
        assert!(bus.activate_tool(tool));
        tool
    }

    fn bus(config: BusConfig) -> (UiEventBus, PlotId, PlotId) {
        let mut canvas = Canvas::new();
        let ranges = (Range1d::new(0.0, 1.0), Range1d::new(0.0, 1.0));
        let left = Rect::new(0.0, 0.0, 100.0, 100.0);
        let right = Rect::new(100.0, 0.0, 200.0, 100.0);
        let a = canvas.add_plot(left, Frame::new(left, ranges.0, ranges.1));
        let b = canvas.add_plot(right, Frame::new(right, ranges.0, ranges.1));
        (UiEventBus::new(canvas, config), a, b)
    }

    fn pan(phase: PhaseStep, sx: f64, sy: f64) -> UiEvent {
        UiEvent::Pan(PanEvent {
            phase,
            sx,
            sy,
            delta_x: 0.0,
            delta_y: 0.0,
            modifiers: Modifiers::empty(),
        })
    }

    fn pinch(phase: PhaseStep, sx: f64, sy: f64) -> UiEvent {
        UiEvent::Pinch(PinchEvent {
            phase,
            sx,
            sy,
            scale: 1.5,
            modifiers: Modifiers::empty(),
        })
    }

    fn rotate(phase: PhaseStep, sx: f64, sy: f64) -> UiEvent {
        UiEvent::Rotate(RotateEvent {
            phase,
            sx,
            sy,
            rotation: 15.0,
            modifiers: Modifiers::empty(),
        })
    }

    fn press(kind: TapKind, sx: f64, sy: f64) -> UiEvent {
        UiEvent::Tap(TapEvent {
            kind,
            sx,
            sy,
            modifiers: Modifiers::empty(),
        })
    }

    fn wheel(sx: f64, sy: f64) -> UiEvent {
        UiEvent::Scroll(ScrollEvent {
            sx,
            sy,
            delta: 120.0,
            modifiers: Modifiers::empty(),
        })
    }

    const SOURCE: SourceInfo = SourceInfo {
        reached_surface: true,
        pointer_kind: None,
    };

    #[test]
    fn unknown_category_fails_at_registration() {
        let log = Log::default();
        let (mut bus, a, _) = bus(BusConfig::default());
        let err = bus
            .register_tool(
                a,
                Recorder::new("lasso", EventTypes::single("lasso"), Capabilities::PAN_ALL, &log),
            )
            .unwrap_err();
        assert_eq!(
            err,
            RegisterError::UnsupportedEventType(ParseCategoryError("lasso".into()))
        );
        let err = bus
            .register_tool(
                PlotId(99),
                Recorder::new("pan", EventTypes::single("pan"), Capabilities::PAN_ALL, &log),
            )
            .unwrap_err();
        assert_eq!(err, RegisterError::UnknownPlot(PlotId(99)));
        let empty = EventTypes::multi(Vec::<&'static str>::new());
        let err = bus
            .register_tool(a, Recorder::new("none", empty, Capabilities::empty(), &log))
            .unwrap_err();
        assert_eq!(err, RegisterError::EmptyEventTypes);
    }

    #[test]
    fn pan_sticks_to_its_start_plot() {
        let log = Log::default();
        let (mut bus, a, b) = bus(BusConfig::default());
        install(&mut bus, a, "a", Category::Pan, Capabilities::PAN_ALL, &log);
        install(&mut bus, b, "b", Category::Pan, Capabilities::PAN_ALL, &log);

        let p = bus.dispatch_event(pan(PhaseStep::Start, 50.0, 50.0), SOURCE);
        assert_eq!(p, Propagation::PREVENT_DEFAULT);
        assert_eq!(bus.active_gesture(PhaseGesture::Pan), Some(a));
        bus.dispatch_event(pan(PhaseStep::Update, 150.0, 50.0), SOURCE);
        bus.dispatch_event(pan(PhaseStep::End, 500.0, 50.0), SOURCE);
        assert_eq!(bus.active_gesture(PhaseGesture::Pan), None);

        assert_eq!(
            *log.borrow(),
            vec![
                ("a", Channel::PanStart),
                ("a", Channel::Pan),
                ("a", Channel::PanEnd),
            ]
        );
    }

    #[test]
    fn phases_without_a_start_are_dropped() {
        let log = Log::default();
        let (mut bus, a, _) = bus(BusConfig::default());
        install(&mut bus, a, "a", Category::Pan, Capabilities::PAN_ALL, &log);
        assert!(bus.dispatch_event(pan(PhaseStep::Update, 50.0, 50.0), SOURCE).is_empty());
        assert!(bus.dispatch_event(pan(PhaseStep::End, 50.0, 50.0), SOURCE).is_empty());
        assert!(log.borrow().is_empty());
        assert_eq!(bus.active_gesture(PhaseGesture::Pan), None);

        // A start outside every plot is dropped as well.
        bus.dispatch_event(pan(PhaseStep::Start, 500.0, 50.0), SOURCE);
        bus.dispatch_event(pan(PhaseStep::Update, 50.0, 50.0), SOURCE);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn cancel_gestures_unsticks_an_abandoned_pan() {
        let log = Log::default();
        let (mut bus, a, _) = bus(BusConfig::default());
        install(&mut bus, a, "a", Category::Pan, Capabilities::PAN_ALL, &log);
        bus.dispatch_event(pan(PhaseStep::Start, 50.0, 50.0), SOURCE);
        bus.cancel_gestures();
        bus.dispatch_event(pan(PhaseStep::Update, 60.0, 50.0), SOURCE);
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn wheel_claims_suppress_native_scrolling() {
        let log = Log::default();
        let (mut bus, a, b) = bus(BusConfig::default());
        install(&mut bus, a, "zoom", Category::Scroll, Capabilities::SCROLL, &log);
        assert_eq!(
            bus.dispatch_event(wheel(50.0, 50.0), SOURCE),
            Propagation::PREVENT_DEFAULT | Propagation::STOP_PROPAGATION
        );
        // Plot b has no wheel tool: the page keeps scrolling.
        assert!(bus.dispatch_event(wheel(150.0, 50.0), SOURCE).is_empty());
        assert!(bus.canvas().plot(b).is_some());
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn touch_devices_route_wheel_to_pinch_tools() {
        let log = Log::default();
        let (mut bus, a, _) = bus(BusConfig::default().with_touch_capable(true));
        let caps = Capabilities::PINCH_ALL | Capabilities::SCROLL;
        let zoom = install(&mut bus, a, "zoom", Category::Pinch, caps, &log);
        assert_eq!(
            bus.channels.connections(Channel::Scroll),
            &[crate::channel::Connection {
                tool: zoom,
                delivery: Delivery::Broadcast,
            }]
        );
        let p = bus.dispatch_event(wheel(50.0, 50.0), SOURCE);
        assert!(p.contains(Propagation::PREVENT_DEFAULT));
        assert_eq!(log.borrow().as_slice(), &[("zoom", Channel::Scroll)]);
    }

    #[test]
    fn touch_wheel_stays_on_the_plot_under_the_pointer() {
        let log = Log::default();
        let (mut bus, a, b) = bus(BusConfig::default().with_touch_capable(true));
        let caps = Capabilities::PINCH_ALL | Capabilities::SCROLL;
        install(&mut bus, a, "zoom_a", Category::Pinch, caps, &log);
        install(&mut bus, b, "zoom_b", Category::Pinch, caps, &log);

        bus.dispatch_event(wheel(50.0, 50.0), SOURCE);
        assert_eq!(log.borrow().as_slice(), &[("zoom_a", Channel::Scroll)]);
        bus.dispatch_event(wheel(150.0, 50.0), SOURCE);
        assert_eq!(
            log.borrow().as_slice(),
            &[("zoom_a", Channel::Scroll), ("zoom_b", Channel::Scroll)]
        );
    }

    #[test]
    fn touch_wheel_without_an_active_pinch_tool_is_left_to_the_page() {
        let log = Log::default();
        let (mut bus, a, _) = bus(BusConfig::default().with_touch_capable(true));
        let caps = Capabilities::PINCH_ALL | Capabilities::SCROLL;
        // Registered but never activated.
        bus.register_tool(a, Recorder::new("pinch", Category::Pinch.into(), caps, &log))
            .unwrap();
        // Scroll tools are not consulted on touch devices.
        install(&mut bus, a, "wheel", Category::Scroll, Capabilities::SCROLL, &log);

        assert!(bus.dispatch_event(wheel(50.0, 50.0), SOURCE).is_empty());
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn wheel_tools_start_inactive() {
        let log = Log::default();
        let (mut bus, a, _) = bus(BusConfig::default());
        let zoom = Recorder::new("zoom", Category::Scroll.into(), Capabilities::SCROLL, &log);
        let zoom = bus.register_tool(a, zoom).unwrap();
        assert!(bus.dispatch_event(wheel(50.0, 50.0), SOURCE).is_empty());
        assert!(log.borrow().is_empty());

        assert!(bus.activate_tool(zoom));
        assert!(!bus.dispatch_event(wheel(50.0, 50.0), SOURCE).is_empty());
        assert_eq!(log.borrow().as_slice(), &[("zoom", Channel::Scroll)]);
    }

    #[test]
    fn press_up_goes_to_the_press_tool() {
        let log = Log::default();
        let (mut bus, a, _) = bus(BusConfig::default());
        install(&mut bus, a, "tap", Category::Tap, Capabilities::TAP, &log);
        let caps = Capabilities::PRESS | Capabilities::PRESS_UP;
        install(&mut bus, a, "press", Category::Press, caps, &log);

        bus.dispatch_event(press(TapKind::Press, 50.0, 50.0), SOURCE);
        bus.dispatch_event(press(TapKind::PressUp, 50.0, 50.0), SOURCE);
        assert_eq!(
            *log.borrow(),
            vec![("press", Channel::Press), ("press", Channel::PressUp)]
        );
    }

    #[test]
    fn pinch_and_rotate_stick_to_their_start_plot() {
        let log = Log::default();
        let (mut bus, a, b) = bus(BusConfig::default());
        install(&mut bus, a, "pinch_a", Category::Pinch, Capabilities::PINCH_ALL, &log);
        install(&mut bus, b, "pinch_b", Category::Pinch, Capabilities::PINCH_ALL, &log);
        install(&mut bus, a, "rotate_a", Category::Rotate, Capabilities::ROTATE_ALL, &log);
        install(&mut bus, b, "rotate_b", Category::Rotate, Capabilities::ROTATE_ALL, &log);

        bus.dispatch_event(pinch(PhaseStep::Start, 50.0, 50.0), SOURCE);
        assert_eq!(bus.active_gesture(PhaseGesture::Pinch), Some(a));
        bus.dispatch_event(pinch(PhaseStep::Update, 150.0, 50.0), SOURCE);
        bus.dispatch_event(pinch(PhaseStep::End, 150.0, 50.0), SOURCE);
        bus.dispatch_event(pinch(PhaseStep::Update, 150.0, 50.0), SOURCE);
        assert_eq!(
            *log.borrow(),
            vec![
                ("pinch_a", Channel::PinchStart),
                ("pinch_a", Channel::Pinch),
                ("pinch_a", Channel::PinchEnd),
            ]
        );

        log.borrow_mut().clear();
        bus.dispatch_event(rotate(PhaseStep::Update, 50.0, 50.0), SOURCE);
        assert!(log.borrow().is_empty());
        bus.dispatch_event(rotate(PhaseStep::Start, 150.0, 50.0), SOURCE);
        bus.dispatch_event(rotate(PhaseStep::Update, 50.0, 50.0), SOURCE);
        bus.dispatch_event(rotate(PhaseStep::End, 500.0, 50.0), SOURCE);
        assert_eq!(bus.active_gesture(PhaseGesture::Rotate), None);
        assert_eq!(
            *log.borrow(),
            vec![
                ("rotate_b", Channel::RotateStart),
                ("rotate_b", Channel::Rotate),
                ("rotate_b", Channel::RotateEnd),
            ]
        );
    }

    #[test]
    fn keys_are_broadcast_once_per_tool() {
        struct Keys(Rc<RefCell<u32>>);
        impl ToolView for Keys {
            fn name(&self) -> &str {
                "keys"
            }
            fn event_types(&self) -> EventTypes {
                EventTypes::multi(["pan", "tap"])
            }
            fn capabilities(&self) -> Capabilities {
                Capabilities::KEY_DOWN
            }
            fn key_down(&mut self, _: &mut ToolContext<'_>, _: &KeyEvent) {
                *self.0.borrow_mut() += 1;
            }
        }
        let count = Rc::new(RefCell::new(0));
        let (mut bus, a, _) = bus(BusConfig::default());
        bus.register_tool(a, Keys(count.clone())).unwrap();
        let key = UiEvent::Key(KeyEvent {
            kind: KeyKind::Down,
            key: "Escape".into(),
            code: 27,
            modifiers: Modifiers::empty(),
        });
        assert!(bus.dispatch_event(key, SOURCE).is_empty());
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn unregister_disconnects() {
        let log = Log::default();
        let (mut bus, a, _) = bus(BusConfig::default());
        let tool = install(&mut bus, a, "a", Category::Pan, Capabilities::PAN_ALL, &log);
        assert_eq!(bus.tool_categories(tool), Some(&[Category::Pan][..]));
        assert!(bus.unregister_tool(tool).is_some());
        assert!(bus.tool(tool).is_none());
        assert_eq!(bus.canvas().plot(a).unwrap().toolbar().active(Category::Pan), None);
        bus.dispatch_event(pan(PhaseStep::Start, 50.0, 50.0), SOURCE);
        assert!(log.borrow().is_empty());
    }

    #[derive(Default)]
    struct Host {
        next: u64,
        live: Vec<(ListenerHandle, ListenerScope)>,
    }

    impl InputHost for Host {
        fn listen(&mut self, scope: ListenerScope, _: ListenerKind) -> ListenerHandle {
            self.next += 1;
            let handle = ListenerHandle(self.next);
            self.live.push((handle, scope));
            handle
        }
        fn unlisten(&mut self, handle: ListenerHandle) {
            self.live.retain(|(h, _)| *h != handle);
        }
    }

    #[test]
    fn destroy_releases_document_listeners() {
        let mut host = Host::default();
        let (mut bus, a, _) = bus(BusConfig::default());
        bus.attach(&mut host);
        bus.attach(&mut host);
        assert!(bus.is_attached());
        assert_eq!(host.live.len(), ListenerKind::ALL.len());
        assert!(host.live.iter().any(|(_, s)| *s == ListenerScope::Document));

        let canvas = bus.destroy(&mut host);
        assert!(host.live.is_empty());
        assert!(canvas.plot(a).is_some());
    }
}
