// Software render backend: fills triangle strips into a FrameBuffer.
// Visual: committed strokes appear as solid ribbons on white paper; the
// stroke you are still drawing shows on top at 80% opacity.

use crate::buffer::RenderBackend;
use crate::gamma::GammaLut;
use crate::types::{FrameBuffer, Rgb, Vertex};
use std::ops::Range;

pub const PAPER: u32 = 0x00_FF_FF_FF;
const LIVE_ALPHA: f32 = 0.8;

pub struct Rasterizer {
    target: FrameBuffer,
    uploaded: Vec<Vertex>, // our "GPU" copy; only refreshed by upload()
    lut: GammaLut,
}

impl Rasterizer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            target: FrameBuffer::new(width, height, PAPER),
            uploaded: Vec::new(),
            lut: GammaLut::new(),
        }
    }

    /// Wipe to paper before a new frame.
    pub fn begin_frame(&mut self) {
        self.target.fill(PAPER);
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.target
    }

    pub fn frame_mut(&mut self) -> &mut FrameBuffer {
        &mut self.target
    }

    pub fn uploaded_len(&self) -> usize {
        self.uploaded.len()
    }
}

impl RenderBackend for Rasterizer {
    fn upload(&mut self, vertices: &[Vertex]) {
        self.uploaded.clear();
        self.uploaded.extend_from_slice(vertices);
    }

    fn draw_strip(&mut self, range: Range<usize>) {
        let end = range.end.min(self.uploaded.len());
        let Some(strip) = self.uploaded.get(range.start..end) else {
            return;
        };
        for tri in strip.windows(3) {
            fill_triangle(&mut self.target, [&tri[0], &tri[1], &tri[2]], |_, c| pack(c));
        }
    }

    fn draw_live(&mut self, vertices: &[Vertex]) {
        let lut = &self.lut;
        for tri in vertices.windows(3) {
            fill_triangle(&mut self.target, [&tri[0], &tri[1], &tri[2]], |dst, c| {
                lut.blend_over(dst, c, LIVE_ALPHA)
            });
        }
    }
}

/// Pack a [0,1] color into 0x00RRGGBB.
fn pack(c: Rgb) -> u32 {
    let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u32;
    (q(c.r) << 16) | (q(c.g) << 8) | q(c.b)
}

#[inline]
fn edge(ax: f32, ay: f32, bx: f32, by: f32, px: f32, py: f32) -> f32 {
    (bx - ax) * (py - ay) - (by - ay) * (px - ax)
}

/// Whether a pixel center lying exactly on edge `a -> b` belongs to this
/// triangle. Two triangles sharing an edge walk it in opposite directions,
/// so exactly one of them owns it.
#[inline]
fn owns_edge(ax: f32, ay: f32, bx: f32, by: f32) -> bool {
    let (dx, dy) = (bx - ax, by - ay);
    dy > 0.0 || (dy == 0.0 && dx < 0.0)
}

#[inline]
fn inside(e: f32, owned: bool) -> bool {
    e > 0.0 || (e == 0.0 && owned)
}

/// Fill one triangle with barycentric color interpolation, sampling at pixel
/// centers. Winding does not matter: a strip alternates it every triangle.
/// Centers on a shared edge are covered once, never twice.
/// `shade(dst, color)` returns the new pixel value.
fn fill_triangle(fb: &mut FrameBuffer, tri: [&Vertex; 3], mut shade: impl FnMut(u32, Rgb) -> u32) {
    let [a, mut b, mut c] = tri;
    if edge(
        a.position[0],
        a.position[1],
        b.position[0],
        b.position[1],
        c.position[0],
        c.position[1],
    ) < 0.0
    {
        std::mem::swap(&mut b, &mut c);
    }
    let (ax, ay) = (a.position[0], a.position[1]);
    let (bx, by) = (b.position[0], b.position[1]);
    let (cx, cy) = (c.position[0], c.position[1]);

    let area = edge(ax, ay, bx, by, cx, cy);
    if area < f32::EPSILON || !area.is_finite() {
        return; // zero-area triangles cover no pixels
    }
    let (own_bc, own_ca, own_ab) =
        (owns_edge(bx, by, cx, cy), owns_edge(cx, cy, ax, ay), owns_edge(ax, ay, bx, by));

    // Bounding box clipped to the surface
    let min_x = ax.min(bx).min(cx).floor().max(0.0) as i64;
    let min_y = ay.min(by).min(cy).floor().max(0.0) as i64;
    let max_x = (ax.max(bx).max(cx).ceil() as i64).min(fb.width as i64 - 1);
    let max_y = (ay.max(by).max(cy).ceil() as i64).min(fb.height as i64 - 1);
    if min_x > max_x || min_y > max_y {
        return;
    }

    let (ca, cb, cc) = (a.color(), b.color(), c.color());
    for y in min_y..=max_y {
        let py = y as f32 + 0.5;
        for x in min_x..=max_x {
            let px = x as f32 + 0.5;
            let e0 = edge(bx, by, cx, cy, px, py);
            let e1 = edge(cx, cy, ax, ay, px, py);
            let e2 = edge(ax, ay, bx, by, px, py);
            if !(inside(e0, own_bc) && inside(e1, own_ca) && inside(e2, own_ab)) {
                continue;
            }
            let (w0, w1, w2) = (e0 / area, e1 / area, e2 / area);
            let color = Rgb::new(
                ca.r * w0 + cb.r * w1 + cc.r * w2,
                ca.g * w0 + cb.g * w1 + cc.g * w2,
                ca.b * w0 + cb.b * w1 + cc.b * w2,
            );
            let idx = y as usize * fb.width + x as usize;
            fb.pixels[idx] = shade(fb.pixels[idx], color);
        }
    }
}
