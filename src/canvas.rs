//! The drawing surface's state, owned in one place.
//!
//! Input and rendering are two entry points on the same value:
//! [`Canvas::handle_input`] and [`Canvas::render`]. The host must call them
//! from one thread and never re-enter one from the other; a render always
//! sees the history as left by the last fully processed input event.

use crate::buffer::{BufferCoordinator, RenderBackend};
use crate::config::{BrushConfig, GeometryParams, SamplerParams};
use crate::geometry::GeometryBuilder;
use crate::history::StrokeHistory;
use crate::sampler::{InputSampler, PointerEvent};
use crate::types::{Rgb, Stroke, Vec2, Vertex};
use tracing::debug;

/// Everything a host can feed into the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown(PointerEvent),
    PointerMove(PointerEvent),
    PointerUp(PointerEvent),
    /// The pointer left the surface (or the host lost it) mid-stroke.
    PointerLost,
    Undo,
    Redo,
    Clear,
}

pub struct Canvas {
    size: Vec2,
    brush: BrushConfig,
    color: Rgb,
    sampler: InputSampler,
    history: StrokeHistory,
    coordinator: BufferCoordinator,
}

impl Canvas {
    /// A `width` x `height` surface with default tuning constants.
    pub fn new(width: f32, height: f32, brush: BrushConfig) -> Self {
        Self::with_params(width, height, brush, SamplerParams::default(), GeometryParams::default())
    }

    pub fn with_params(
        width: f32,
        height: f32,
        brush: BrushConfig,
        sampler: SamplerParams,
        geometry: GeometryParams,
    ) -> Self {
        Self {
            size: Vec2::new(width, height),
            brush,
            color: Rgb::BLACK,
            sampler: InputSampler::new(sampler),
            history: StrokeHistory::new(GeometryBuilder::new(geometry)),
            coordinator: BufferCoordinator::new(),
        }
    }

    pub fn brush(&self) -> &BrushConfig {
        &self.brush
    }

    /// Takes effect from the next sampled point.
    pub fn set_brush(&mut self, brush: BrushConfig) {
        self.brush = brush;
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    /// Applies to newly sampled points only; committed strokes keep theirs.
    pub fn set_color(&mut self, color: Rgb) {
        self.color = color;
    }

    pub fn history(&self) -> &StrokeHistory {
        &self.history
    }

    pub fn is_drawing(&self) -> bool {
        self.sampler.is_drawing()
    }

    /// Dispatch one host event.
    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerDown(e) => self.on_pointer_down(e),
            InputEvent::PointerMove(e) => self.on_pointer_move(e),
            InputEvent::PointerUp(e) => self.on_pointer_up(e),
            InputEvent::PointerLost => self.cancel_stroke(),
            InputEvent::Undo => self.undo(),
            InputEvent::Redo => self.redo(),
            InputEvent::Clear => self.clear(),
        }
    }

    pub fn on_pointer_down(&mut self, event: PointerEvent) {
        // new authored work invalidates redo
        self.history.discard_redo();
        self.sampler.on_pointer_down(event, &self.brush, self.color);
    }

    pub fn on_pointer_move(&mut self, event: PointerEvent) {
        self.sampler.on_pointer_move(event, &self.brush, self.color);
    }

    /// Finish the gesture. A release outside the surface cancels it.
    pub fn on_pointer_up(&mut self, event: PointerEvent) {
        let Some(stroke) = self.sampler.on_pointer_up() else {
            return;
        };
        if !self.contains(event.position) {
            debug!(points = stroke.len(), "stroke released off-surface, discarded");
            return;
        }
        self.commit(stroke);
    }

    pub fn cancel_stroke(&mut self) {
        if self.sampler.is_drawing() {
            debug!(points = self.sampler.live_stroke().len(), "stroke cancelled");
        }
        self.sampler.cancel();
    }

    /// Commit a finished stroke; one-point strokes are silently dropped.
    pub fn commit(&mut self, stroke: Stroke) {
        if self.history.commit(stroke) {
            self.coordinator.mark_dirty();
        }
    }

    pub fn undo(&mut self) {
        if self.history.undo() {
            self.coordinator.mark_dirty();
        }
    }

    pub fn redo(&mut self) {
        if self.history.redo() {
            self.coordinator.mark_dirty();
        }
    }

    /// Empty the history. An in-progress stroke is left alone and commits
    /// into the cleared history on release.
    pub fn clear(&mut self) {
        self.history.clear();
        self.coordinator.mark_dirty();
    }

    /// `(vertices, per-stroke vertex counts)` of everything committed.
    pub fn committed_geometry(&self) -> (&[Vertex], &[usize]) {
        (self.history.vertices(), self.history.vertex_counts())
    }

    pub fn live_stroke(&self) -> &Stroke {
        self.sampler.live_stroke()
    }

    /// Mesh the in-progress stroke with the same builder the history uses.
    pub fn live_vertices(&self) -> Vec<Vertex> {
        self.history.builder().build(self.sampler.live_stroke().points())
    }

    pub fn is_dirty(&self) -> bool {
        self.coordinator.is_dirty()
    }

    pub fn mark_clean(&mut self) {
        self.coordinator.mark_clean();
    }

    /// One frame: re-upload committed geometry if it changed, draw it stroke
    /// by stroke, then draw the live stroke on top.
    pub fn render<B: RenderBackend + ?Sized>(&mut self, backend: &mut B) {
        let live = self.live_vertices();
        self.coordinator.render_pass(
            backend,
            self.history.vertices(),
            self.history.vertex_counts(),
            &live,
        );
    }

    fn contains(&self, p: Vec2) -> bool {
        p.x >= 0.0 && p.y >= 0.0 && p.x <= self.size.x && p.y <= self.size.y
    }
}
