//! Committed strokes, the redo stack, and the flat vertex buffer derived
//! from them.
//!
//! Invariants after every public call:
//! - `sum(vertex_counts) == vertices.len()`
//! - `vertex_counts.len() == strokes.len()`
//!
//! Commit appends geometry incrementally. Undo and redo rebuild the whole
//! buffer from the remaining strokes; removal is never patched in place.

use crate::geometry::GeometryBuilder;
use crate::types::{Stroke, Vertex};
use tracing::debug;

#[derive(Debug, Default)]
pub struct StrokeHistory {
    builder: GeometryBuilder,
    strokes: Vec<Stroke>,
    redo_stack: Vec<Stroke>, // top = last element
    vertices: Vec<Vertex>,
    vertex_counts: Vec<usize>,
}

impl StrokeHistory {
    pub fn new(builder: GeometryBuilder) -> Self {
        Self { builder, ..Self::default() }
    }

    pub fn builder(&self) -> &GeometryBuilder {
        &self.builder
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn redo_stack(&self) -> &[Stroke] {
        &self.redo_stack
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn vertex_counts(&self) -> &[usize] {
        &self.vertex_counts
    }

    pub fn can_undo(&self) -> bool {
        !self.strokes.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Append a finished stroke. Strokes with one point or fewer are
    /// dropped. Returns whether the history changed.
    pub fn commit(&mut self, stroke: Stroke) -> bool {
        if !stroke.is_committable() {
            debug!(points = stroke.len(), "commit rejected: stroke too short");
            return false;
        }
        self.redo_stack.clear();
        self.append(stroke);
        debug!(
            strokes = self.strokes.len(),
            vertices = self.vertices.len(),
            "stroke committed"
        );
        true
    }

    /// Move the newest stroke onto the redo stack. No-op on an empty history.
    pub fn undo(&mut self) -> bool {
        let Some(stroke) = self.strokes.pop() else {
            return false;
        };
        self.redo_stack.push(stroke);
        self.rebuild();
        debug!(
            strokes = self.strokes.len(),
            redo = self.redo_stack.len(),
            "undo"
        );
        true
    }

    /// Reinstate the most recently undone stroke. No-op when nothing was undone.
    pub fn redo(&mut self) -> bool {
        let Some(stroke) = self.redo_stack.pop() else {
            return false;
        };
        self.strokes.push(stroke);
        self.rebuild();
        debug!(
            strokes = self.strokes.len(),
            redo = self.redo_stack.len(),
            "redo"
        );
        true
    }

    /// Invalidate redo history; called when new authored work begins.
    pub fn discard_redo(&mut self) {
        if !self.redo_stack.is_empty() {
            debug!(dropped = self.redo_stack.len(), "redo history discarded");
            self.redo_stack.clear();
        }
    }

    /// Drop everything, committed and undone alike.
    pub fn clear(&mut self) {
        self.strokes.clear();
        self.redo_stack.clear();
        self.vertices.clear();
        self.vertex_counts.clear();
        debug!("history cleared");
    }

    fn append(&mut self, stroke: Stroke) {
        let mesh = self.builder.build(stroke.points());
        self.vertex_counts.push(mesh.len());
        self.vertices.extend(mesh);
        self.strokes.push(stroke);
    }

    fn rebuild(&mut self) {
        self.vertices.clear();
        self.vertex_counts.clear();
        for stroke in &self.strokes {
            let mesh = self.builder.build(stroke.points());
            self.vertex_counts.push(mesh.len());
            self.vertices.extend(mesh);
        }
        debug_assert_eq!(self.vertex_counts.iter().sum::<usize>(), self.vertices.len());
    }
}
