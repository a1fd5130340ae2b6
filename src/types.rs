// Core value types flowing through the pipeline:
// pointer samples -> StrokePoint -> Stroke -> Vertex -> FrameBuffer pixels.

use bytemuck::{Pod, Zeroable};
use std::ops::{Add, Mul, Sub};
use std::time::Duration;

/// 2D position or direction in surface units (window pixels, y grows downwards).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    #[inline]
    pub fn distance(self, other: Vec2) -> f32 {
        (other - self).length()
    }

    /// Linear interpolation, `t = 0` gives `self`, `t = 1` gives `other`.
    #[inline]
    pub fn lerp(self, other: Vec2, t: f32) -> Vec2 {
        Vec2::new(
            self.x * (1.0 - t) + other.x * t,
            self.y * (1.0 - t) + other.y * t,
        )
    }

    /// Counter-clockwise normal `(-y, x)`.
    #[inline]
    pub fn perp(self) -> Vec2 {
        Vec2::new(-self.y, self.x)
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// Linear RGB color, each channel in [0,1].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build from a packed `0x00RRGGBB` value (the window's pixel format).
    pub fn from_u32(packed: u32) -> Self {
        Self {
            r: ((packed >> 16) & 0xFF) as f32 / 255.0,
            g: ((packed >> 8) & 0xFF) as f32 / 255.0,
            b: (packed & 0xFF) as f32 / 255.0,
        }
    }
}

/// One accepted pointer sample, annotated with pressure and brush thickness.
/// Immutable once it has been appended to a [`Stroke`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokePoint {
    pub position: Vec2,
    pub pressure: f32,       // [0.01, 1.0] for stylus, [0.1, 1.0] when speed-derived
    pub thickness: f32,      // full brush width at this point, > 0
    pub timestamp: Duration, // monotonic, measured from an arbitrary host epoch
    pub color: Rgb,
}

/// An ordered run of stroke points; order defines the path direction.
///
/// Points can only be appended, never edited or removed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Stroke {
    points: Vec<StrokePoint>,
}

impl Stroke {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, point: StrokePoint) {
        self.points.push(point);
    }

    pub fn points(&self) -> &[StrokePoint] {
        &self.points
    }

    pub fn last(&self) -> Option<&StrokePoint> {
        self.points.last()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Only strokes with more than one point may enter the history.
    pub fn is_committable(&self) -> bool {
        self.points.len() > 1
    }
}

impl FromIterator<StrokePoint> for Stroke {
    fn from_iter<I: IntoIterator<Item = StrokePoint>>(iter: I) -> Self {
        Self { points: iter.into_iter().collect() }
    }
}

/// One ribbon vertex. Laid out as six packed `f32`s so a backend can hand
/// `bytemuck::cast_slice(&vertices)` straight to a GPU buffer.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 3],
    pub thickness: f32, // half-width of the ribbon where this vertex was emitted
}

impl Vertex {
    pub fn color(&self) -> Rgb {
        Rgb::new(self.color[0], self.color[1], self.color[2])
    }
}

/// Software render target.
#[derive(Clone)]
pub struct FrameBuffer {
    pub width: usize,     // how wide the surface is on screen (pixels)
    pub height: usize,    // how tall the surface is on screen (pixels)
    pub pixels: Vec<u32>, // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize, fill: u32) -> Self {
        Self { width, height, pixels: vec![fill; width * height] }
    }

    pub fn fill(&mut self, color: u32) {
        self.pixels.fill(color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_is_six_packed_floats() {
        assert_eq!(std::mem::size_of::<Vertex>(), 6 * std::mem::size_of::<f32>());
        let vs = [Vertex { position: [1.0, 2.0], color: [0.1, 0.2, 0.3], thickness: 4.0 }];
        let floats: &[f32] = bytemuck::cast_slice(&vs);
        assert_eq!(floats, &[1.0, 2.0, 0.1, 0.2, 0.3, 4.0]);
    }

    #[test]
    fn packed_color_unpacks_per_channel() {
        let c = Rgb::from_u32(0x00FF_8000);
        assert_eq!(c.r, 1.0);
        assert!((c.g - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(c.b, 0.0);
    }

    #[test]
    fn single_point_stroke_is_not_committable() {
        let p = StrokePoint {
            position: Vec2::new(1.0, 1.0),
            pressure: 0.2,
            thickness: 1.0,
            timestamp: Duration::ZERO,
            color: Rgb::BLACK,
        };
        let mut s = Stroke::new();
        assert!(!s.is_committable());
        s.push(p);
        assert!(!s.is_committable());
        s.push(p);
        assert!(s.is_committable());
    }
}
