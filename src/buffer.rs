//! Upload/draw handshake between the stroke history and a render backend.
//!
//! The history's vertex buffer is only re-sent to the backend when it
//! changed (dirty flag), always in full. Drawing then walks the per-stroke
//! vertex counts so each stroke is its own triangle strip; one strip over
//! the whole buffer would bridge the end of one stroke to the start of the
//! next with a stray band.

use crate::types::Vertex;
use std::ops::Range;
use tracing::trace;

/// What the core needs from whatever actually puts pixels on screen.
pub trait RenderBackend {
    /// Replace the backend's copy of the committed vertex buffer.
    fn upload(&mut self, vertices: &[Vertex]);

    /// Draw `range` of the last uploaded buffer as one triangle strip.
    fn draw_strip(&mut self, range: Range<usize>);

    /// Draw the in-progress stroke. These vertices are never uploaded.
    fn draw_live(&mut self, vertices: &[Vertex]);
}

/// Partition `0..sum(counts)` into consecutive ranges, skipping empty strokes.
pub fn strip_ranges(counts: &[usize]) -> impl Iterator<Item = Range<usize>> + '_ {
    counts
        .iter()
        .scan(0usize, |start, &count| {
            let range = *start..*start + count;
            *start += count;
            Some(range)
        })
        .filter(|range| !range.is_empty())
}

/// Tracks whether the backend's copy of the committed buffer is stale.
#[derive(Debug, Clone)]
pub struct BufferCoordinator {
    dirty: bool,
}

impl BufferCoordinator {
    /// Starts dirty so the first pass always uploads, even an empty buffer.
    pub fn new() -> Self {
        Self { dirty: true }
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Upload if needed, then draw each stroke's range, then the live geometry.
    pub fn render_pass<B: RenderBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        vertices: &[Vertex],
        counts: &[usize],
        live: &[Vertex],
    ) {
        if self.dirty {
            trace!(vertices = vertices.len(), "uploading committed geometry");
            backend.upload(vertices);
            self.mark_clean();
        }
        for range in strip_ranges(counts) {
            backend.draw_strip(range);
        }
        if !live.is_empty() {
            backend.draw_live(live);
        }
    }
}

impl Default for BufferCoordinator {
    fn default() -> Self {
        Self::new()
    }
}
