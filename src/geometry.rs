//! Ribbon mesher: `Stroke -> Vec<Vertex>` laid out as one triangle strip.
//!
//! For every pair of consecutive stroke points the path is (optionally)
//! subdivided, and each polyline step emits a left/right vertex pair offset
//! perpendicular to the step direction by half the local thickness.
//! Consecutive pairs alternate sides, which is exactly what a triangle strip
//! wants.

use crate::config::GeometryParams;
use crate::types::{StrokePoint, Vec2, Vertex};
use tracing::warn;

/// Positions `a..=b` split into `segments` equal steps (`segments + 1` points).
pub fn interpolate_positions(a: Vec2, b: Vec2, segments: usize) -> Vec<Vec2> {
    let segments = segments.max(1);
    (0..=segments)
        .map(|i| a.lerp(b, i as f32 / segments as f32))
        .collect()
}

/// Stateless, deterministic mesher. Building the same points twice yields
/// identical vertices.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeometryBuilder {
    params: GeometryParams,
}

impl GeometryBuilder {
    pub fn new(params: GeometryParams) -> Self {
        Self { params }
    }

    /// Mesh an ordered run of stroke points.
    ///
    /// Fewer than two points, or points that never move farther than the
    /// degeneracy epsilon, yield an empty list. The result always has an
    /// even length.
    pub fn build(&self, points: &[StrokePoint]) -> Vec<Vertex> {
        let mut vertices = Vec::new();
        for pair in points.windows(2) {
            self.emit_segment(&pair[0], &pair[1], &mut vertices);
        }
        vertices
    }

    fn emit_segment(&self, p1: &StrokePoint, p2: &StrokePoint, out: &mut Vec<Vertex>) {
        let polyline = if p1.position.distance(p2.position) > self.params.interpolation_distance {
            interpolate_positions(p1.position, p2.position, self.params.segments)
        } else {
            vec![p1.position, p2.position]
        };
        let last_index = (polyline.len() - 1) as f32;

        for (j, step) in polyline.windows(2).enumerate() {
            let (a, b) = (step[0], step[1]);
            let delta = b - a;
            let len = delta.length();
            if len < self.params.degenerate_epsilon {
                continue;
            }
            let direction = delta * (1.0 / len);

            let t = j as f32 / last_index;
            let thickness = p1.thickness * (1.0 - t) + p2.thickness * t;
            let half_width = thickness.min(self.params.max_thickness) * 0.5;
            let offset = direction.perp() * half_width;

            let left = a + offset;
            let right = a - offset;
            let finite = left.is_finite() && right.is_finite();
            debug_assert!(finite, "non-finite ribbon vertex at {a:?}");
            if !finite {
                warn!(x = a.x, y = a.y, "skipping non-finite ribbon vertex pair");
                continue;
            }

            out.push(Vertex {
                position: [left.x, left.y],
                color: [p1.color.r, p1.color.g, p1.color.b],
                thickness: half_width,
            });
            out.push(Vertex {
                position: [right.x, right.y],
                color: [p2.color.r, p2.color.g, p2.color.b],
                thickness: half_width,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rgb;
    use std::time::Duration;

    fn pt(x: f32, y: f32, thickness: f32) -> StrokePoint {
        StrokePoint {
            position: Vec2::new(x, y),
            pressure: 0.5,
            thickness,
            timestamp: Duration::ZERO,
            color: Rgb::BLACK,
        }
    }

    #[test]
    fn short_inputs_yield_nothing() {
        let b = GeometryBuilder::default();
        assert!(b.build(&[]).is_empty());
        assert!(b.build(&[pt(1.0, 1.0, 2.0)]).is_empty());
    }

    #[test]
    fn identical_points_are_all_degenerate() {
        let b = GeometryBuilder::default();
        let p = pt(3.0, 3.0, 2.0);
        assert!(b.build(&[p, p, p, p]).is_empty());
        // below epsilon but not identical
        assert!(b.build(&[p, pt(3.05, 3.0, 2.0)]).is_empty());
    }

    #[test]
    fn short_segment_emits_one_pair() {
        let b = GeometryBuilder::default();
        let v = b.build(&[pt(0.0, 0.0, 2.0), pt(4.0, 0.0, 2.0)]);
        assert_eq!(v.len(), 2);
        // direction +x, perpendicular (0, 1) * half width 1.0
        assert_eq!(v[0].position, [0.0, 1.0]);
        assert_eq!(v[1].position, [0.0, -1.0]);
        assert_eq!(v[0].thickness, 1.0);
    }

    #[test]
    fn long_segments_are_subdivided() {
        let b = GeometryBuilder::default();
        let v = b.build(&[pt(0.0, 0.0, 2.0), pt(30.0, 0.0, 2.0), pt(60.0, 0.0, 2.0)]);
        // 3 sub-steps per segment, one pair each
        assert_eq!(v.len(), 2 * 3 * 2);
        assert!(v.len() / 2 > 2);
        let xs: Vec<f32> = v.iter().step_by(2).map(|v| v.position[0]).collect();
        for (x, want) in xs.iter().zip([0.0, 10.0, 20.0, 30.0, 40.0, 50.0]) {
            assert!((x - want).abs() < 1e-4, "{xs:?}");
        }
    }

    #[test]
    fn thickness_is_interpolated_clamped_and_halved() {
        let b = GeometryBuilder::default();
        let v = b.build(&[pt(0.0, 0.0, 1.0), pt(30.0, 0.0, 7.0)]);
        let halves: Vec<f32> = v.iter().step_by(2).map(|v| v.thickness).collect();
        // t = 0, 1/3, 2/3 -> 1, 3, 5 (clamped to 4)
        assert_eq!(halves.len(), 3);
        assert!((halves[0] - 0.5).abs() < 1e-5);
        assert!((halves[1] - 1.5).abs() < 1e-5);
        assert!((halves[2] - 2.0).abs() < 1e-5);
    }

    #[test]
    fn pairs_carry_endpoint_colors() {
        let b = GeometryBuilder::default();
        let mut a = pt(0.0, 0.0, 2.0);
        let mut c = pt(0.0, 3.0, 2.0);
        a.color = Rgb::new(1.0, 0.0, 0.0);
        c.color = Rgb::new(0.0, 0.0, 1.0);
        let v = b.build(&[a, c]);
        assert_eq!(v[0].color, [1.0, 0.0, 0.0]);
        assert_eq!(v[1].color, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn vertex_count_is_even_and_build_is_repeatable() {
        let b = GeometryBuilder::default();
        let stroke: Vec<StrokePoint> = (0..40)
            .map(|i| {
                let f = i as f32;
                pt(f * 3.7, (f * 0.9).sin() * 12.0, 1.0 + (i % 5) as f32)
            })
            .collect();
        let first = b.build(&stroke);
        assert!(!first.is_empty());
        assert_eq!(first.len() % 2, 0);
        assert_eq!(first, b.build(&stroke));
    }

    #[test]
    fn interpolation_includes_both_ends() {
        let ps = interpolate_positions(Vec2::new(0.0, 0.0), Vec2::new(9.0, 3.0), 3);
        assert_eq!(ps.len(), 4);
        assert_eq!(ps[0], Vec2::new(0.0, 0.0));
        assert_eq!(ps[3], Vec2::new(9.0, 3.0));
    }
}
