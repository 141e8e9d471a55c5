// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scripted input against two plots.
//!
//! Wires a canvas with a pan tool, a box zoom, a wheel zoom and a crosshair,
//! replays hover, drag, wheel and tap input, and logs every model event.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p understory_examples --example plot_gestures`

use kurbo::{Circle, Point, Rect};
use understory_event_state::phase::PhaseGesture;
use understory_examples::{LoggingHost, init_tracing};
use understory_gesture::event::Modifiers;
use understory_gesture::input::{
    PointInput, PointerAction, PointerInput, PointerKind, RawInput, WheelDeltaMode, WheelInput,
};
use understory_plot_events::bus::{BusConfig, UiEventBus};
use understory_plot_events::canvas::{Canvas, Cursor, PlotId};
use understory_plot_events::geometry::{Frame, Range1d};
use understory_plot_events::model::{Document, ModelEventKind};
use understory_plot_events::renderer::ShapeRenderer;
use understory_plot_events::tools::{BoxZoomTool, CrosshairTool, Dimensions, PanTool, WheelZoomTool};

fn mount(canvas: &mut Canvas, name: &str, bbox: Rect) -> PlotId {
    let frame = Frame::new(
        bbox.inset(-30.0),
        Range1d::new(-1.0, 1.0),
        Range1d::new(-1.0, 1.0),
    );
    canvas.add_named_plot(name, bbox, frame)
}

fn log_model_events(bus: &mut UiEventBus, plot: PlotId, name: &'static str) {
    let Some(view) = bus.canvas_mut().plot_mut(plot) else {
        return;
    };
    for &kind in ModelEventKind::ALL {
        view.subscriptions_mut().on_event(kind, move |ev| match ev.point() {
            Some(p) => tracing::info!(plot = name, event = %ev.kind(), x = p.x, y = p.y),
            None => tracing::info!(plot = name, event = %ev.kind(), ?ev),
        });
    }
    view.subscriptions_mut().subscribe(ModelEventKind::RangesUpdate);
    bus.canvas_mut().update_subscriptions(plot);
}

fn main() {
    init_tracing();

    let mut canvas = Canvas::new();
    canvas.attach_document(Document::new());
    let left = mount(&mut canvas, "left", Rect::new(0.0, 0.0, 300.0, 300.0));
    let right = mount(&mut canvas, "right", Rect::new(300.0, 0.0, 600.0, 300.0));
    canvas.add_renderer(
        left,
        ShapeRenderer::new(Circle::new((150.0, 150.0), 20.0)).with_cursor(Cursor::Pointer),
    );

    let mut bus = UiEventBus::new(canvas, BusConfig::default());
    let mut host = LoggingHost::default();
    bus.attach(&mut host);
    bus.normalizer_mut().set_surface_offset(Point::new(8.0, 8.0));

    let touch = bus.config().touch_capable;
    let registered = [
        bus.register_tool(left, PanTool::new(Dimensions::Both)),
        bus.register_tool(left, WheelZoomTool::new(Dimensions::Both).with_touch(touch)),
        bus.register_tool(left, CrosshairTool::new(Dimensions::Both)),
        bus.register_tool(right, BoxZoomTool::new(Dimensions::Both)),
    ];
    let tools = match registered.into_iter().collect::<Result<Vec<_>, _>>() {
        Ok(tools) => tools,
        Err(err) => {
            tracing::error!(%err, "registration failed");
            return;
        }
    };
    // Wheel tools start inactive.
    if let [_, wheel_zoom, ..] = tools[..] {
        bus.activate_tool(wheel_zoom);
    }
    log_model_events(&mut bus, left, "left");
    log_model_events(&mut bus, right, "right");

    // Page coordinates: the surface sits at (8, 8).
    let page = |x: f64, y: f64| Point::new(x + 8.0, y + 8.0);
    let pointer = |action, x, y, t| {
        RawInput::Pointer(PointerInput::new(1, PointerKind::Mouse, action, page(x, y), t))
    };

    let script = [
        RawInput::MouseEnter(PointInput::at(page(100.0, 100.0))),
        RawInput::MouseMove(PointInput::at(page(150.0, 150.0))),
        RawInput::MouseMove(PointInput::at(page(350.0, 150.0))),
        pointer(PointerAction::Down, 350.0, 60.0, 1_000),
        pointer(PointerAction::Move, 420.0, 120.0, 1_016),
        pointer(PointerAction::Move, 520.0, 240.0, 1_032),
        pointer(PointerAction::Up, 520.0, 240.0, 1_048),
        RawInput::MouseMove(PointInput::at(page(100.0, 100.0))),
        pointer(PointerAction::Down, 100.0, 100.0, 2_000),
        pointer(PointerAction::Move, 140.0, 100.0, 2_016),
        pointer(PointerAction::Up, 140.0, 100.0, 2_032),
        RawInput::Wheel(WheelInput {
            page: page(150.0, 150.0),
            delta_y: -3.0,
            mode: WheelDeltaMode::Line,
            modifiers: Modifiers::empty(),
        }),
        pointer(PointerAction::Down, 200.0, 200.0, 3_000),
        pointer(PointerAction::Up, 200.0, 200.0, 3_040),
        RawInput::MouseLeave(PointInput::at(page(700.0, 150.0))),
    ];

    for input in &script {
        let propagation = bus.handle(input);
        if !propagation.is_empty() {
            tracing::debug!(?propagation, "native default suppressed");
        }
        if let Some(plot) = bus.active_gesture(PhaseGesture::Pan) {
            tracing::trace!(?plot, "pan in flight");
        }
    }
    bus.advance(4_000);

    for (name, plot) in [("left", left), ("right", right)] {
        if let Some(view) = bus.canvas().plot(plot) {
            let frame = view.frame();
            tracing::info!(plot = name, x = ?frame.x_range(), y = ?frame.y_range(), "final ranges");
        }
    }
    if let Some(doc) = bus.canvas().document() {
        tracing::info!(
            queued = doc.event_manager().pending().len(),
            "events queued for document subscribers"
        );
    }

    let canvas = bus.destroy(&mut host);
    tracing::info!(
        cursor = canvas.cursor().as_css(),
        listeners = host.live(),
        "torn down"
    );
}
