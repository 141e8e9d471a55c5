// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The canvas: mounted plots, the shared cursor and the document.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use kurbo::{Point, Rect};

use crate::geometry::{Frame, Range1d};
use crate::model::{Document, EventSubscriptions, ModelEvent, ModelId, ModelRecord};
use crate::renderer::InteractiveHit;
use crate::toolbar::Toolbar;

/// Identifier of a mounted plot.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlotId(pub u32);

/// Identifier of a renderer view.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RendererId(pub u32);

/// Pointer cursor style.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Cursor {
    /// Platform default.
    #[default]
    Default,
    /// Crosshair.
    Crosshair,
    /// Pointing hand.
    Pointer,
    /// Move arrows.
    Move,
    /// Open hand.
    Grab,
    /// Closed hand.
    Grabbing,
    /// Text beam.
    Text,
    /// Any other CSS cursor keyword.
    Named(String),
}

impl Cursor {
    /// CSS keyword.
    pub fn as_css(&self) -> &str {
        match self {
            Self::Default => "default",
            Self::Crosshair => "crosshair",
            Self::Pointer => "pointer",
            Self::Move => "move",
            Self::Grab => "grab",
            Self::Grabbing => "grabbing",
            Self::Text => "text",
            Self::Named(name) => name,
        }
    }
}

/// A mounted plot: outer box, data frame, renderers, toolbar and model.
pub struct PlotView {
    id: PlotId,
    model: ModelId,
    name: Option<String>,
    bbox: Rect,
    frame: Frame,
    renderers: Vec<(RendererId, Box<dyn InteractiveHit>)>,
    toolbar: Toolbar,
    subscriptions: EventSubscriptions,
}

impl fmt::Debug for PlotView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlotView")
            .field("id", &self.id)
            .field("model", &self.model)
            .field("name", &self.name)
            .field("bbox", &self.bbox)
            .field("frame", &self.frame)
            .field("renderers", &self.renderers.len())
            .field("toolbar", &self.toolbar)
            .field("subscriptions", &self.subscriptions)
            .finish()
    }
}

impl PlotView {
    /// Plot id.
    pub fn id(&self) -> PlotId {
        self.id
    }

    /// Id of the plot's model in the document.
    pub fn model(&self) -> ModelId {
        self.model
    }

    /// Outer box, including axes and titles.
    pub fn bbox(&self) -> Rect {
        self.bbox
    }

    /// The data frame.
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Tool activation state.
    pub fn toolbar(&self) -> &Toolbar {
        &self.toolbar
    }

    /// Mutable tool activation state.
    pub fn toolbar_mut(&mut self) -> &mut Toolbar {
        &mut self.toolbar
    }

    /// Per-model event callbacks and subscriptions.
    pub fn subscriptions(&self) -> &EventSubscriptions {
        &self.subscriptions
    }

    /// Mutable per-model event callbacks and subscriptions.
    pub fn subscriptions_mut(&mut self) -> &mut EventSubscriptions {
        &mut self.subscriptions
    }

    /// Renderers in mount order.
    pub fn renderers(&self) -> impl DoubleEndedIterator<Item = (RendererId, &dyn InteractiveHit)> {
        self.renderers.iter().map(|(id, r)| (*id, r.as_ref()))
    }

    /// A renderer by id.
    pub fn renderer(&self, id: RendererId) -> Option<&dyn InteractiveHit> {
        self.renderers
            .iter()
            .find(|(r, _)| *r == id)
            .map(|(_, r)| r.as_ref())
    }

    /// A renderer by id, mutably.
    pub fn renderer_mut(&mut self, id: RendererId) -> Option<&mut (dyn InteractiveHit + 'static)> {
        self.renderers
            .iter_mut()
            .find(|(r, _)| *r == id)
            .map(|(_, r)| r.as_mut())
    }

    /// Remove a renderer. Returns `false` if it was not mounted here.
    pub fn remove_renderer(&mut self, id: RendererId) -> bool {
        let before = self.renderers.len();
        self.renderers.retain(|(r, _)| *r != id);
        self.renderers.len() != before
    }

    /// Rewrite a canvas coordinate into this plot's local space.
    ///
    /// Plots share the canvas origin, so this is the identity. Layouts that
    /// offset plots from the canvas origin apply the offset here.
    pub fn to_local(&self, screen: Point) -> Point {
        screen
    }

    fn record(&self) -> ModelRecord {
        let record = ModelRecord::new(self.model, "Plot");
        match &self.name {
            Some(name) => record.with_name(name.clone()),
            None => record,
        }
    }
}

/// Every plot mounted on one capture surface.
#[derive(Default)]
pub struct Canvas {
    plots: Vec<PlotView>,
    cursor: Cursor,
    document: Option<Document>,
    next_plot: u32,
    next_renderer: u32,
    next_model: u64,
}

impl fmt::Debug for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Canvas")
            .field("plots", &self.plots)
            .field("cursor", &self.cursor)
            .field("document", &self.document)
            .field("next_plot", &self.next_plot)
            .field("next_renderer", &self.next_renderer)
            .field("next_model", &self.next_model)
            .finish()
    }
}

impl Canvas {
    /// An empty canvas with no document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount a plot after every existing one.
    pub fn add_plot(&mut self, bbox: Rect, frame: Frame) -> PlotId {
        self.mount(None, bbox, frame)
    }

    /// Mount a plot whose model carries `name`.
    pub fn add_named_plot(&mut self, name: impl Into<String>, bbox: Rect, frame: Frame) -> PlotId {
        self.mount(Some(name.into()), bbox, frame)
    }

    fn mount(&mut self, name: Option<String>, bbox: Rect, frame: Frame) -> PlotId {
        let id = PlotId(self.next_plot);
        self.next_plot += 1;
        self.next_model += 1;
        let view = PlotView {
            id,
            model: ModelId(self.next_model),
            name,
            bbox,
            frame,
            renderers: Vec::new(),
            toolbar: Toolbar::new(),
            subscriptions: EventSubscriptions::default(),
        };
        if let Some(doc) = self.document.as_mut() {
            doc.add_model(view.record());
        }
        self.plots.push(view);
        id
    }

    /// Unmount a plot.
    pub fn remove_plot(&mut self, id: PlotId) -> Option<PlotView> {
        let idx = self.plots.iter().position(|p| p.id == id)?;
        let view = self.plots.remove(idx);
        if let Some(doc) = self.document.as_mut() {
            doc.remove_model(view.model);
        }
        Some(view)
    }

    /// Plots in mount order.
    pub fn plots(&self) -> impl Iterator<Item = &PlotView> {
        self.plots.iter()
    }

    /// A plot by id.
    pub fn plot(&self, id: PlotId) -> Option<&PlotView> {
        self.plots.iter().find(|p| p.id == id)
    }

    /// A plot by id, mutably.
    pub fn plot_mut(&mut self, id: PlotId) -> Option<&mut PlotView> {
        self.plots.iter_mut().find(|p| p.id == id)
    }

    /// Mount a renderer on top of `plot`'s existing renderers.
    pub fn add_renderer(
        &mut self,
        plot: PlotId,
        renderer: impl InteractiveHit + 'static,
    ) -> Option<RendererId> {
        let id = RendererId(self.next_renderer);
        let view = self.plots.iter_mut().find(|p| p.id == plot)?;
        view.renderers.push((id, Box::new(renderer)));
        self.next_renderer += 1;
        Some(id)
    }

    /// Current cursor.
    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    /// Replace the cursor.
    pub fn set_cursor(&mut self, cursor: Cursor) {
        self.cursor = cursor;
    }

    /// The attached document, if any.
    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    /// The attached document, mutably.
    pub fn document_mut(&mut self) -> Option<&mut Document> {
        self.document.as_mut()
    }

    /// Attach `doc` and register every mounted plot's model with it.
    pub fn attach_document(&mut self, mut doc: Document) {
        for view in &self.plots {
            doc.add_model(view.record());
        }
        self.document = Some(doc);
    }

    /// Detach and return the document.
    pub fn detach_document(&mut self) -> Option<Document> {
        self.document.take()
    }

    /// Publish `plot`'s subscribed kinds to the document's event manager.
    ///
    /// Logs a warning and does nothing when the plot's model is not attached
    /// to a document. Returns `true` if the subscriptions were published.
    pub fn update_subscriptions(&mut self, plot: PlotId) -> bool {
        let Some(view) = self.plots.iter().find(|p| p.id == plot) else {
            return false;
        };
        let Some(doc) = self
            .document
            .as_mut()
            .filter(|doc| doc.contains(view.model))
        else {
            tracing::warn!(
                plot = plot.0,
                model = view.model.0,
                "model is not attached to a document; event subscriptions not updated"
            );
            return false;
        };
        doc.event_manager_mut()
            .set_subscriptions(view.model, view.subscriptions.subscribed().clone());
        true
    }

    /// Deliver `event` to `plot`'s model: its callbacks first, then the
    /// document's event manager.
    pub fn trigger_event(&mut self, plot: PlotId, event: ModelEvent) {
        let Some(view) = self.plots.iter_mut().find(|p| p.id == plot) else {
            return;
        };
        view.subscriptions.fire(&event);
        if let Some(doc) = self.document.as_mut() {
            doc.event_manager_mut().send(view.model, event);
        }
    }

    /// Set `plot`'s data ranges and publish a range update.
    pub fn update_ranges(&mut self, plot: PlotId, x: Option<Range1d>, y: Option<Range1d>) -> bool {
        let Some(view) = self.plots.iter_mut().find(|p| p.id == plot) else {
            return false;
        };
        view.frame.set_ranges(x, y);
        let event = ModelEvent::RangesUpdate {
            x: view.frame.x_range(),
            y: view.frame.y_range(),
        };
        self.trigger_event(plot, event);
        true
    }
}
