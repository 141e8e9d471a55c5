// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_plot_events --heading-base-level=0

//! Understory Plot Events: hit testing, gesture routing and tool dispatch for
//! interactive plot canvases.
//!
//! ## Overview
//!
//! A [`Canvas`](canvas::Canvas) holds every plot mounted on one capture
//! surface. The [`UiEventBus`](bus::UiEventBus) takes canonical events from
//! `understory_gesture`, decides which plot each one belongs to, hands it to
//! that plot's active tools and finally publishes a
//! [`ModelEvent`](model::ModelEvent) for external subscribers.
//!
//! - [`geometry`]: data ranges, linear scales and the plot's data frame.
//! - [`renderer`]: the per-renderer hit interface.
//! - [`canvas`]: plots, cursor and the optional [`Document`](model::Document).
//! - [`hit`]: plot, renderer and frame hit tests.
//! - [`tool`]: the [`ToolView`](tool::ToolView) trait and its capability record.
//! - [`toolbar`]: which tool is active for each gesture category.
//! - [`channel`]: named channels with owner-tagged delivery.
//! - [`bus`]: registration, routing and dispatch.
//! - [`model`]: public model events, per-model callbacks and the document.
//! - [`tools`]: pan, box zoom, wheel zoom, wheel pan and crosshair.
//!
//! ## Example
//!
//! Box zoom over a plot whose data frame spans most of the canvas:
//!
//! ```rust
//! use kurbo::{Point, Rect};
//! use understory_gesture::input::{PointerAction, PointerInput, PointerKind, RawInput};
//! use understory_plot_events::bus::{BusConfig, UiEventBus};
//! use understory_plot_events::canvas::Canvas;
//! use understory_plot_events::geometry::{Frame, Range1d};
//! use understory_plot_events::tools::{BoxZoomTool, Dimensions};
//!
//! let mut canvas = Canvas::new();
//! let frame = Frame::new(
//!     Rect::new(5.0, 5.0, 570.0, 595.0),
//!     Range1d::new(-1.0, 1.0),
//!     Range1d::new(-1.0, 1.0),
//! );
//! let plot = canvas.add_plot(Rect::new(0.0, 0.0, 600.0, 600.0), frame);
//!
//! let mut bus = UiEventBus::new(canvas, BusConfig::default());
//! bus.register_tool(plot, BoxZoomTool::new(Dimensions::Both)).unwrap();
//!
//! let pointer = |action, x, y, t| {
//!     RawInput::Pointer(PointerInput::new(1, PointerKind::Mouse, action, Point::new(x, y), t))
//! };
//! bus.handle(&pointer(PointerAction::Down, 200.0, 100.0, 0));
//! bus.handle(&pointer(PointerAction::Move, 300.0, 300.0, 16));
//! bus.handle(&pointer(PointerAction::Move, 400.0, 500.0, 32));
//! bus.handle(&pointer(PointerAction::Up, 400.0, 500.0, 48));
//!
//! let frame = bus.canvas().plot(plot).unwrap().frame();
//! let (x, y) = (frame.x_range(), frame.y_range());
//! assert!((x.start + 0.3097).abs() < 1e-4 && (x.end - 0.3982).abs() < 1e-4);
//! assert!((y.start + 0.6780).abs() < 1e-4 && (y.end - 0.6780).abs() < 1e-4);
//! ```
//!
//! This crate is `no_std` compatible (with `alloc`).

#![no_std]

extern crate alloc;

pub mod bus;
pub mod canvas;
pub mod channel;
pub mod geometry;
pub mod hit;
pub mod model;
pub mod renderer;
pub mod tool;
pub mod toolbar;
pub mod tools;
