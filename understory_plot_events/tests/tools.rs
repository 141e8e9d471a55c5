// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The reference tools driven through the bus.

use std::cell::Cell;
use std::rc::Rc;

use kurbo::Rect;
use understory_gesture::event::{
    KeyEvent, KeyKind, Modifiers, PanEvent, PhaseStep, PinchEvent, ScrollEvent, UiEvent,
};
use understory_gesture::normalize::SourceInfo;
use understory_plot_events::bus::{BusConfig, UiEventBus};
use understory_plot_events::canvas::{Canvas, PlotId};
use understory_plot_events::geometry::{Frame, Range1d};
use understory_plot_events::model::ModelEventKind;
use understory_plot_events::tool::Overlay;
use understory_plot_events::tools::{
    BoxZoomTool, Dimensions, PanTool, WheelPanTool, WheelZoomTool,
};

const SOURCE: SourceInfo = SourceInfo {
    reached_surface: true,
    pointer_kind: None,
};

fn assert_range(actual: Range1d, start: f64, end: f64) {
    assert!(
        (actual.start - start).abs() < 1e-4 && (actual.end - end).abs() < 1e-4,
        "{actual:?} != [{start}, {end}]"
    );
}

fn pan(phase: PhaseStep, sx: f64, sy: f64, delta_x: f64, delta_y: f64) -> UiEvent {
    UiEvent::Pan(PanEvent {
        phase,
        sx,
        sy,
        delta_x,
        delta_y,
        modifiers: Modifiers::empty(),
    })
}

fn wheel(sx: f64, sy: f64, delta: f64) -> UiEvent {
    UiEvent::Scroll(ScrollEvent {
        sx,
        sy,
        delta,
        modifiers: Modifiers::empty(),
    })
}

/// One 600x600 plot whose frame covers `[5, 570] x [5, 595]`, ranges `[-1, 1]`.
fn large_plot() -> (UiEventBus, PlotId) {
    let mut canvas = Canvas::new();
    let frame = Frame::new(
        Rect::new(5.0, 5.0, 570.0, 595.0),
        Range1d::new(-1.0, 1.0),
        Range1d::new(-1.0, 1.0),
    );
    let plot = canvas.add_plot(Rect::new(0.0, 0.0, 600.0, 600.0), frame);
    (UiEventBus::new(canvas, BusConfig::default()), plot)
}

/// One 100x100 plot whose frame covers `[10, 90]` on both axes, ranges `[0, 10]`.
fn small_plot() -> (UiEventBus, PlotId) {
    small_plot_with(BusConfig::default())
}

fn small_plot_with(config: BusConfig) -> (UiEventBus, PlotId) {
    let mut canvas = Canvas::new();
    let frame = Frame::new(
        Rect::new(10.0, 10.0, 90.0, 90.0),
        Range1d::new(0.0, 10.0),
        Range1d::new(0.0, 10.0),
    );
    let plot = canvas.add_plot(Rect::new(0.0, 0.0, 100.0, 100.0), frame);
    (UiEventBus::new(canvas, config), plot)
}

fn ranges(bus: &UiEventBus, plot: PlotId) -> (Range1d, Range1d) {
    let frame = bus.canvas().plot(plot).unwrap().frame();
    (frame.x_range(), frame.y_range())
}

#[test]
fn box_zoom_reproduces_the_reference_ranges() {
    let (mut bus, plot) = large_plot();
    let zoom = bus
        .register_tool(plot, BoxZoomTool::new(Dimensions::Both))
        .unwrap();
    let updates = Rc::new(Cell::new(0));
    let seen = updates.clone();
    bus.canvas_mut()
        .plot_mut(plot)
        .unwrap()
        .subscriptions_mut()
        .on_event(ModelEventKind::RangesUpdate, move |_| seen.set(seen.get() + 1));

    bus.dispatch_event(pan(PhaseStep::Start, 200.0, 100.0, 0.0, 0.0), SOURCE);
    bus.dispatch_event(pan(PhaseStep::Update, 300.0, 300.0, 100.0, 200.0), SOURCE);
    assert_eq!(
        bus.tool_overlay(zoom),
        Some(Overlay::Box(Rect::new(200.0, 100.0, 300.0, 300.0)))
    );
    bus.dispatch_event(pan(PhaseStep::End, 400.0, 500.0, 200.0, 400.0), SOURCE);

    assert_eq!(bus.tool_overlay(zoom), None);
    let (x, y) = ranges(&bus, plot);
    assert_range(x, -0.30973, 0.39823);
    assert_range(y, -0.67797, 0.67797);
    assert_eq!(updates.get(), 1);
}

#[test]
fn box_zoom_ignores_thin_boxes() {
    let (mut bus, plot) = large_plot();
    bus.register_tool(plot, BoxZoomTool::new(Dimensions::Both))
        .unwrap();
    bus.dispatch_event(pan(PhaseStep::Start, 200.0, 100.0, 0.0, 0.0), SOURCE);
    bus.dispatch_event(pan(PhaseStep::End, 205.0, 400.0, 5.0, 300.0), SOURCE);
    let (x, y) = ranges(&bus, plot);
    assert_eq!((x, y), (Range1d::new(-1.0, 1.0), Range1d::new(-1.0, 1.0)));
}

#[test]
fn escape_cancels_a_box_in_progress() {
    let (mut bus, plot) = large_plot();
    let zoom = bus
        .register_tool(plot, BoxZoomTool::new(Dimensions::Both))
        .unwrap();
    bus.dispatch_event(pan(PhaseStep::Start, 200.0, 100.0, 0.0, 0.0), SOURCE);
    bus.dispatch_event(pan(PhaseStep::Update, 300.0, 300.0, 100.0, 200.0), SOURCE);
    let escape = UiEvent::Key(KeyEvent {
        kind: KeyKind::Up,
        key: "Escape".into(),
        code: 27,
        modifiers: Modifiers::empty(),
    });
    bus.dispatch_event(escape, SOURCE);
    assert_eq!(bus.tool_overlay(zoom), None);

    bus.dispatch_event(pan(PhaseStep::End, 400.0, 500.0, 200.0, 400.0), SOURCE);
    let (x, _) = ranges(&bus, plot);
    assert_eq!(x, Range1d::new(-1.0, 1.0));
}

#[test]
fn pan_tool_moves_ranges_by_increments() {
    let (mut bus, plot) = small_plot();
    bus.register_tool(plot, PanTool::new(Dimensions::Both))
        .unwrap();
    bus.dispatch_event(pan(PhaseStep::Start, 50.0, 50.0, 0.0, 0.0), SOURCE);
    bus.dispatch_event(pan(PhaseStep::Update, 58.0, 50.0, 8.0, 0.0), SOURCE);
    let (x, y) = ranges(&bus, plot);
    assert_range(x, -1.0, 9.0);
    assert_range(y, 0.0, 10.0);

    bus.dispatch_event(pan(PhaseStep::Update, 66.0, 50.0, 16.0, 0.0), SOURCE);
    bus.dispatch_event(pan(PhaseStep::End, 66.0, 50.0, 16.0, 0.0), SOURCE);
    let (x, _) = ranges(&bus, plot);
    assert_range(x, -2.0, 8.0);
}

#[test]
fn pan_starting_beside_the_frame_moves_one_axis() {
    let (mut bus, plot) = small_plot();
    bus.register_tool(plot, PanTool::new(Dimensions::Both))
        .unwrap();
    // Left margin: over the y axis.
    bus.dispatch_event(pan(PhaseStep::Start, 5.0, 50.0, 0.0, 0.0), SOURCE);
    bus.dispatch_event(pan(PhaseStep::Update, 13.0, 58.0, 8.0, 8.0), SOURCE);
    bus.dispatch_event(pan(PhaseStep::End, 13.0, 58.0, 8.0, 8.0), SOURCE);
    let (x, y) = ranges(&bus, plot);
    assert_range(x, 0.0, 10.0);
    assert_range(y, 1.0, 11.0);
}

#[test]
fn wheel_zoom_scales_around_the_pointer() {
    let (mut bus, plot) = small_plot();
    let zoom = bus
        .register_tool(plot, WheelZoomTool::new(Dimensions::Both))
        .unwrap();
    assert!(bus.activate_tool(zoom));
    bus.dispatch_event(wheel(50.0, 50.0, 120.0), SOURCE);
    let (x, y) = ranges(&bus, plot);
    assert_range(x, 1.0, 9.0);
    assert_range(y, 1.0, 9.0);
}

#[test]
fn wheel_zoom_over_an_axis_zooms_that_axis() {
    let (mut bus, plot) = small_plot();
    let zoom = bus
        .register_tool(plot, WheelZoomTool::new(Dimensions::Both))
        .unwrap();
    assert!(bus.activate_tool(zoom));
    bus.dispatch_event(wheel(5.0, 50.0, 120.0), SOURCE);
    let (x, y) = ranges(&bus, plot);
    assert_eq!(x, Range1d::new(0.0, 10.0));
    assert_range(y, 1.0, 9.0);
}

#[test]
fn wheel_pan_shifts_by_a_frame_fraction() {
    let (mut bus, plot) = small_plot();
    let wheel_pan = bus
        .register_tool(plot, WheelPanTool::new(Dimensions::Width))
        .unwrap();

    // Wheel tools do nothing until activated.
    assert!(!bus.canvas().plot(plot).unwrap().toolbar().is_active(wheel_pan));
    bus.dispatch_event(wheel(50.0, 50.0, 100.0), SOURCE);
    assert_eq!(ranges(&bus, plot).0, Range1d::new(0.0, 10.0));

    assert!(bus.activate_tool(wheel_pan));
    bus.dispatch_event(wheel(50.0, 50.0, 100.0), SOURCE);
    let (x, y) = ranges(&bus, plot);
    assert_range(x, -1.0, 9.0);
    assert_eq!(y, Range1d::new(0.0, 10.0));
}

#[test]
fn touch_wheel_zoom_answers_wheel_and_pinch() {
    let (mut bus, plot) = small_plot_with(BusConfig::default().with_touch_capable(true));
    let touch = bus.config().touch_capable;
    let zoom = bus
        .register_tool(plot, WheelZoomTool::new(Dimensions::Both).with_touch(touch))
        .unwrap();
    assert!(bus.activate_tool(zoom));

    bus.dispatch_event(wheel(50.0, 50.0, 120.0), SOURCE);
    let (x, y) = ranges(&bus, plot);
    assert_range(x, 1.0, 9.0);
    assert_range(y, 1.0, 9.0);

    let pinch = |phase, scale| {
        UiEvent::Pinch(PinchEvent {
            phase,
            sx: 50.0,
            sy: 50.0,
            scale,
            modifiers: Modifiers::empty(),
        })
    };
    bus.dispatch_event(pinch(PhaseStep::Start, 1.0), SOURCE);
    bus.dispatch_event(pinch(PhaseStep::Update, 1.5), SOURCE);
    bus.dispatch_event(pinch(PhaseStep::End, 1.5), SOURCE);
    let (x, _) = ranges(&bus, plot);
    let width = x.end - x.start;
    assert!(width < 8.0 - 1e-3 && width > 7.8, "{x:?}");
}
