// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Routing and dispatch through the public bus API.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use kurbo::{Circle, Point, Rect};
use understory_gesture::event::{
    Modifiers, MoveEvent, MoveKind, PanEvent, PhaseStep, TapEvent, TapKind, UiEvent,
};
use understory_gesture::input::{PointerAction, PointerInput, PointerKind, RawInput};
use understory_gesture::normalize::SourceInfo;
use understory_plot_events::bus::{BusConfig, UiEventBus};
use understory_plot_events::canvas::{Canvas, Cursor, PlotId};
use understory_plot_events::channel::Channel;
use understory_plot_events::geometry::{Frame, Range1d};
use understory_plot_events::model::{Document, ModelEventKind};
use understory_plot_events::renderer::ShapeRenderer;
use understory_plot_events::tool::{
    Capabilities, Category, EventTypes, Overlay, ToolContext, ToolView,
};
use understory_plot_events::tools::{CrosshairTool, Dimensions};

type Log = Rc<RefCell<Vec<(&'static str, Channel)>>>;

/// Records every handler call.
struct Probe {
    name: &'static str,
    category: Category,
    caps: Capabilities,
    log: Log,
}

impl Probe {
    fn new(name: &'static str, category: Category, caps: Capabilities, log: &Log) -> Self {
        Self {
            name,
            category,
            caps,
            log: log.clone(),
        }
    }

    fn record(&self, channel: Channel) {
        self.log.borrow_mut().push((self.name, channel));
    }
}

impl ToolView for Probe {
    fn name(&self) -> &str {
        self.name
    }
    fn event_types(&self) -> EventTypes {
        self.category.into()
    }
    fn capabilities(&self) -> Capabilities {
        self.caps
    }
    fn tap(&mut self, _: &mut ToolContext<'_>, _: &TapEvent) {
        self.record(Channel::Tap);
    }
    fn double_tap(&mut self, _: &mut ToolContext<'_>, _: &TapEvent) {
        self.record(Channel::DoubleTap);
    }
    fn move_enter(&mut self, _: &mut ToolContext<'_>, _: &MoveEvent) {
        self.record(Channel::MoveEnter);
    }
    fn mouse_move(&mut self, _: &mut ToolContext<'_>, _: &MoveEvent) {
        self.record(Channel::Move);
    }
    fn move_exit(&mut self, _: &mut ToolContext<'_>, _: &MoveEvent) {
        self.record(Channel::MoveExit);
    }
    fn pan(&mut self, _: &mut ToolContext<'_>, _: &PanEvent) {
        self.record(Channel::Pan);
    }
}

const SOURCE: SourceInfo = SourceInfo {
    reached_surface: true,
    pointer_kind: None,
};

/// Two plots side by side, each with a 10px margin around its data frame.
fn two_plots() -> (UiEventBus, PlotId, PlotId) {
    let mut canvas = Canvas::new();
    let mut mount = |bbox: Rect| {
        let frame = Frame::new(
            bbox.inset(-10.0),
            Range1d::new(0.0, 10.0),
            Range1d::new(0.0, 10.0),
        );
        canvas.add_plot(bbox, frame)
    };
    let a = mount(Rect::new(0.0, 0.0, 100.0, 100.0));
    let b = mount(Rect::new(100.0, 0.0, 200.0, 100.0));
    (UiEventBus::new(canvas, BusConfig::default()), a, b)
}

fn hover(kind: MoveKind, sx: f64, sy: f64) -> UiEvent {
    UiEvent::Move(MoveEvent {
        kind,
        sx,
        sy,
        modifiers: Modifiers::empty(),
    })
}

fn tap(kind: TapKind, sx: f64, sy: f64) -> UiEvent {
    UiEvent::Tap(TapEvent {
        kind,
        sx,
        sy,
        modifiers: Modifiers::empty(),
    })
}

type ModelLog = Rc<RefCell<Vec<(PlotId, ModelEventKind)>>>;

fn model_log(bus: &mut UiEventBus, plot: PlotId, kinds: &[ModelEventKind]) -> ModelLog {
    let log = ModelLog::default();
    let subs = bus.canvas_mut().plot_mut(plot).unwrap().subscriptions_mut();
    for &kind in kinds {
        let log = log.clone();
        subs.on_event(kind, move |ev| log.borrow_mut().push((plot, ev.kind())));
    }
    log
}

#[test]
fn crossing_plots_yields_balanced_enter_and_exit() {
    let (mut bus, a, b) = two_plots();
    let kinds = [
        ModelEventKind::MouseEnter,
        ModelEventKind::MouseMove,
        ModelEventKind::MouseLeave,
    ];
    let log = ModelLog::default();
    for plot in [a, b] {
        let subs = bus.canvas_mut().plot_mut(plot).unwrap().subscriptions_mut();
        for kind in kinds {
            let log = log.clone();
            subs.on_event(kind, move |ev| log.borrow_mut().push((plot, ev.kind())));
        }
    }

    bus.dispatch_event(hover(MoveKind::Enter, 50.0, 50.0), SOURCE);
    bus.dispatch_event(hover(MoveKind::Move, 60.0, 50.0), SOURCE);
    bus.dispatch_event(hover(MoveKind::Move, 150.0, 50.0), SOURCE);
    bus.dispatch_event(hover(MoveKind::Leave, 250.0, 50.0), SOURCE);

    assert_eq!(
        *log.borrow(),
        vec![
            (a, ModelEventKind::MouseEnter),
            (a, ModelEventKind::MouseMove),
            (a, ModelEventKind::MouseLeave),
            (b, ModelEventKind::MouseEnter),
            (b, ModelEventKind::MouseMove),
            (b, ModelEventKind::MouseLeave),
        ]
    );
}

#[test]
fn taps_outside_the_frame_skip_the_tool_but_reach_the_model() {
    let (mut bus, a, _) = two_plots();
    let log = Log::default();
    bus.register_tool(
        a,
        Probe::new("tap", Category::Tap, Capabilities::TAP | Capabilities::DOUBLE_TAP, &log),
    )
    .unwrap();
    let hits = Rc::new(Cell::new(0));
    let counter = hits.clone();
    bus.canvas_mut()
        .add_renderer(
            a,
            ShapeRenderer::new(Circle::new((50.0, 50.0), 10.0))
                .with_on_hit(move |_| counter.set(counter.get() + 1)),
        )
        .unwrap();
    let model = model_log(&mut bus, a, &[ModelEventKind::Tap, ModelEventKind::DoubleTap]);

    bus.dispatch_event(tap(TapKind::Tap, 50.0, 50.0), SOURCE);
    bus.dispatch_event(tap(TapKind::Tap, 5.0, 50.0), SOURCE);
    bus.dispatch_event(tap(TapKind::DoubleTap, 5.0, 50.0), SOURCE);
    bus.dispatch_event(tap(TapKind::DoubleTap, 30.0, 30.0), SOURCE);

    assert_eq!(hits.get(), 1);
    assert_eq!(
        *log.borrow(),
        vec![("tap", Channel::Tap), ("tap", Channel::DoubleTap)]
    );
    assert_eq!(model.borrow().len(), 4);
}

#[test]
fn taps_stopped_before_the_surface_are_ignored() {
    let (mut bus, a, _) = two_plots();
    let log = Log::default();
    bus.register_tool(a, Probe::new("tap", Category::Tap, Capabilities::TAP, &log))
        .unwrap();
    let model = model_log(&mut bus, a, &[ModelEventKind::Tap]);

    let blocked = SourceInfo {
        reached_surface: false,
        ..SOURCE
    };
    bus.dispatch_event(tap(TapKind::Tap, 50.0, 50.0), blocked);
    assert!(log.borrow().is_empty());
    assert!(model.borrow().is_empty());
}

#[test]
fn double_tap_suppresses_the_single_tap() {
    let (mut bus, a, _) = two_plots();
    let log = Log::default();
    bus.register_tool(
        a,
        Probe::new("tap", Category::Tap, Capabilities::TAP | Capabilities::DOUBLE_TAP, &log),
    )
    .unwrap();

    let pointer = |action, t| {
        RawInput::Pointer(PointerInput::new(
            1,
            PointerKind::Touch,
            action,
            Point::new(40.0, 40.0),
            t,
        ))
    };
    bus.handle(&pointer(PointerAction::Down, 0));
    bus.handle(&pointer(PointerAction::Up, 50));
    bus.handle(&pointer(PointerAction::Down, 100));
    bus.handle(&pointer(PointerAction::Up, 150));
    bus.advance(1_000);
    assert_eq!(*log.borrow(), vec![("tap", Channel::DoubleTap)]);

    log.borrow_mut().clear();
    bus.handle(&pointer(PointerAction::Down, 2_000));
    bus.handle(&pointer(PointerAction::Up, 2_050));
    assert!(log.borrow().is_empty());
    bus.advance(2_400);
    assert_eq!(*log.borrow(), vec![("tap", Channel::Tap)]);
}

#[test]
fn hovering_a_renderer_downgrades_the_move_tool() {
    let (mut bus, a, _) = two_plots();
    let log = Log::default();
    let hover_tool = bus
        .register_tool(a, Probe::new("hover", Category::Move, Capabilities::MOVE_ALL, &log))
        .unwrap();
    assert!(bus.activate_tool(hover_tool));
    let crosshair = bus
        .register_tool(a, CrosshairTool::new(Dimensions::Both))
        .unwrap();
    bus.canvas_mut()
        .add_renderer(
            a,
            ShapeRenderer::new(Circle::new((50.0, 50.0), 10.0)).with_cursor(Cursor::Pointer),
        )
        .unwrap();

    bus.dispatch_event(hover(MoveKind::Move, 50.0, 50.0), SOURCE);
    assert_eq!(bus.canvas().cursor(), &Cursor::Pointer);
    assert_eq!(
        *log.borrow(),
        vec![("hover", Channel::MoveExit), ("hover", Channel::MoveExit)]
    );
    assert_eq!(
        bus.tool_overlay(crosshair),
        Some(Overlay::Spans {
            horizontal: Some(50.0),
            vertical: Some(50.0),
        })
    );

    log.borrow_mut().clear();
    bus.dispatch_event(hover(MoveKind::Move, 80.0, 80.0), SOURCE);
    assert_eq!(bus.canvas().cursor(), &Cursor::Crosshair);
    assert_eq!(*log.borrow(), vec![("hover", Channel::Move)]);

    // Margin between the plot box and its frame.
    bus.dispatch_event(hover(MoveKind::Move, 5.0, 50.0), SOURCE);
    assert_eq!(bus.canvas().cursor(), &Cursor::Default);
    assert_eq!(bus.tool_overlay(crosshair), None);

    bus.dispatch_event(hover(MoveKind::Move, 80.0, 80.0), SOURCE);
    bus.dispatch_event(hover(MoveKind::Leave, 300.0, 80.0), SOURCE);
    assert_eq!(bus.tool_overlay(crosshair), None);
}

#[test]
fn switching_off_the_inspector_restores_plain_moves() {
    let (mut bus, a, _) = two_plots();
    let log = Log::default();
    let hover_tool = bus
        .register_tool(a, Probe::new("hover", Category::Move, Capabilities::MOVE_ALL, &log))
        .unwrap();
    assert!(bus.activate_tool(hover_tool));
    let crosshair = bus
        .register_tool(a, CrosshairTool::new(Dimensions::Both))
        .unwrap();
    bus.canvas_mut()
        .add_renderer(a, ShapeRenderer::new(Circle::new((50.0, 50.0), 10.0)))
        .unwrap();
    assert!(bus.deactivate_tool(crosshair));

    bus.dispatch_event(hover(MoveKind::Move, 50.0, 50.0), SOURCE);
    assert_eq!(
        *log.borrow(),
        vec![("hover", Channel::MoveEnter), ("hover", Channel::Move)]
    );
    assert_eq!(bus.canvas().cursor(), &Cursor::Default);
    assert_eq!(bus.tool_overlay(crosshair), None);
}

#[test]
fn pan_stays_on_its_start_plot() {
    let (mut bus, a, b) = two_plots();
    let log = Log::default();
    bus.register_tool(a, Probe::new("a", Category::Pan, Capabilities::PAN, &log))
        .unwrap();
    bus.register_tool(b, Probe::new("b", Category::Pan, Capabilities::PAN, &log))
        .unwrap();
    let pan = |phase, sx| {
        UiEvent::Pan(PanEvent {
            phase,
            sx,
            sy: 50.0,
            delta_x: 0.0,
            delta_y: 0.0,
            modifiers: Modifiers::empty(),
        })
    };
    bus.dispatch_event(pan(PhaseStep::Start, 150.0), SOURCE);
    bus.dispatch_event(pan(PhaseStep::Update, 50.0), SOURCE);
    bus.dispatch_event(pan(PhaseStep::Update, 500.0), SOURCE);
    bus.dispatch_event(pan(PhaseStep::End, 50.0), SOURCE);
    bus.dispatch_event(pan(PhaseStep::Update, 50.0), SOURCE);
    assert_eq!(*log.borrow(), vec![("b", Channel::Pan), ("b", Channel::Pan)]);
}

#[test]
fn subscriptions_reach_the_document_event_manager() {
    let (mut bus, a, _) = two_plots();
    let subs = bus.canvas_mut().plot_mut(a).unwrap().subscriptions_mut();
    subs.subscribe(ModelEventKind::Tap);

    // No document yet: a warning, nothing published.
    assert!(!bus.canvas_mut().update_subscriptions(a));

    bus.canvas_mut().attach_document(Document::new());
    assert!(bus.canvas_mut().update_subscriptions(a));
    bus.dispatch_event(tap(TapKind::Tap, 50.0, 50.0), SOURCE);
    bus.dispatch_event(hover(MoveKind::Move, 50.0, 50.0), SOURCE);

    let model = bus.canvas().plot(a).unwrap().model();
    let queued = bus
        .canvas_mut()
        .document_mut()
        .unwrap()
        .event_manager_mut()
        .drain();
    assert_eq!(queued.len(), 1);
    assert_eq!(queued[0].0, model);
    let point = queued[0].1.point().unwrap();
    assert_eq!((point.sx, point.sy), (50.0, 50.0));
    assert!((point.x - 5.0).abs() < 1e-9);
    assert!((point.y - 5.0).abs() < 1e-9);
}
