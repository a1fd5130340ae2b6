//! Input sampler: turns pointer events into an in-progress [`Stroke`].
//!
//! State machine: `Idle -> Drawing` on primary button down,
//! `Drawing -> Drawing` on accepted moves, `Drawing -> Idle` on release.
//! No geometry is produced here.

use crate::config::{BrushConfig, SamplerParams};
use crate::types::{Rgb, Stroke, StrokePoint, Vec2};
use std::time::Duration;
use tracing::trace;

/// One raw pointer sample as delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub position: Vec2,
    pub timestamp: Duration,
    /// Device pressure in [0,1] for pressure-capable input (stylus), `None` for a mouse.
    pub pressure: Option<f32>,
}

impl PointerEvent {
    pub fn mouse(position: Vec2, timestamp: Duration) -> Self {
        Self { position, timestamp, pressure: None }
    }

    pub fn stylus(position: Vec2, timestamp: Duration, pressure: f32) -> Self {
        Self { position, timestamp, pressure: Some(pressure) }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplerState {
    Idle,
    Drawing,
}

/// Pressure for non-pressure-capable input: slow strokes press harder.
///
/// `raw = 1 - (speed / max_speed) * sensitivity`, clamped to [0.1, 1.0].
/// A zero or negative time delta yields `fallback`; zero sensitivity yields 1.0.
pub fn speed_pressure(
    from: Vec2,
    to: Vec2,
    dt: Duration,
    sensitivity: f32,
    params: &SamplerParams,
) -> f32 {
    if dt.is_zero() {
        return params.fallback_pressure;
    }
    // speed never thins the line; also keeps `inf * 0` out of the formula
    if sensitivity == 0.0 {
        return 1.0;
    }
    let speed = from.distance(to) / dt.as_secs_f32();
    let pressure = 1.0 - (speed / params.max_speed) * sensitivity;
    // NaN from an infinite distance would slip past `clamp`
    if pressure.is_nan() {
        return 0.1;
    }
    pressure.clamp(0.1, 1.0)
}

pub struct InputSampler {
    state: SamplerState,
    stroke: Stroke,
    params: SamplerParams,
}

impl InputSampler {
    pub fn new(params: SamplerParams) -> Self {
        Self { state: SamplerState::Idle, stroke: Stroke::new(), params }
    }

    pub fn state(&self) -> SamplerState {
        self.state
    }

    pub fn is_drawing(&self) -> bool {
        self.state == SamplerState::Drawing
    }

    /// The in-progress stroke (empty while idle).
    pub fn live_stroke(&self) -> &Stroke {
        &self.stroke
    }

    /// Primary button down: start a fresh stroke with the initial pressure.
    pub fn on_pointer_down(&mut self, event: PointerEvent, brush: &BrushConfig, color: Rgb) {
        self.stroke = Stroke::new();
        self.state = SamplerState::Drawing;

        let pressure = match event.pressure {
            Some(p) => self.device_pressure(p),
            None => self.params.initial_pressure,
        };
        self.stroke.push(StrokePoint {
            position: event.position,
            pressure,
            thickness: brush.thickness_for(pressure),
            timestamp: event.timestamp,
            color,
        });
        trace!(x = event.position.x, y = event.position.y, "stroke started");
    }

    /// Pointer moved with the button held. Returns whether the sample was accepted.
    pub fn on_pointer_move(&mut self, event: PointerEvent, brush: &BrushConfig, color: Rgb) -> bool {
        if self.state != SamplerState::Drawing {
            return false;
        }
        let Some(last) = self.stroke.last().copied() else {
            return false;
        };
        if last.position.distance(event.position) <= self.params.min_movement {
            trace!("sample dropped below movement threshold");
            return false;
        }

        let pressure = match event.pressure {
            Some(p) => self.device_pressure(p),
            None => {
                let dt = event.timestamp.saturating_sub(last.timestamp);
                let raw = speed_pressure(
                    last.position,
                    event.position,
                    dt,
                    brush.speed_sensitivity(),
                    &self.params,
                );
                self.params.smoothing * last.pressure + (1.0 - self.params.smoothing) * raw
            }
        };

        self.stroke.push(StrokePoint {
            position: event.position,
            pressure,
            thickness: brush.thickness_for(pressure),
            timestamp: event.timestamp,
            color,
        });
        trace!(pressure, points = self.stroke.len(), "sample accepted");
        true
    }

    /// Primary button up: hand the finished stroke to the caller.
    /// Returns `None` when the sampler was not drawing.
    pub fn on_pointer_up(&mut self) -> Option<Stroke> {
        if self.state != SamplerState::Drawing {
            return None;
        }
        self.state = SamplerState::Idle;
        Some(std::mem::take(&mut self.stroke))
    }

    /// Drop the in-progress stroke without handing it anywhere.
    pub fn cancel(&mut self) {
        self.state = SamplerState::Idle;
        self.stroke = Stroke::new();
    }

    fn device_pressure(&self, pressure: f32) -> f32 {
        if pressure.is_nan() {
            return self.params.stylus_floor;
        }
        pressure.clamp(self.params.stylus_floor, 1.0)
    }
}

impl Default for InputSampler {
    fn default() -> Self {
        Self::new(SamplerParams::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn brush() -> BrushConfig {
        BrushConfig::new(1.0, 8.0, 0.5).unwrap()
    }

    #[test]
    fn speed_pressure_matches_worked_example() {
        let p = speed_pressure(
            Vec2::new(0.0, 0.0),
            Vec2::new(100.0, 0.0),
            ms(100),
            0.5,
            &SamplerParams::default(),
        );
        assert!((p - 0.5).abs() < 1e-6);
        assert!((brush().thickness_for(p) - 4.5).abs() < 1e-6);
    }

    #[test]
    fn speed_pressure_stays_in_range() {
        let params = SamplerParams::default();
        let origin = Vec2::new(0.0, 0.0);
        assert_eq!(speed_pressure(origin, Vec2::new(50.0, 0.0), Duration::ZERO, 1.0, &params), 0.5);
        assert_eq!(speed_pressure(origin, Vec2::new(1.0e6, 0.0), ms(1), 1.0, &params), 0.1);
        assert_eq!(speed_pressure(origin, origin, ms(10), 1.0, &params), 1.0);
        assert_eq!(speed_pressure(origin, Vec2::new(3.0, 4.0), ms(5), 100.0, &params), 0.1);
        for d in [0.0f32, 0.5, 7.0, 120.0, 9999.0, 1.0e9] {
            for t in [1u64, 3, 16, 100, 5000] {
                let p = speed_pressure(origin, Vec2::new(d, d), ms(t), 0.75, &params);
                assert!((0.1..=1.0).contains(&p), "d={d} t={t} p={p}");
            }
        }
    }

    #[test]
    fn zero_sensitivity_ignores_speed() {
        let params = SamplerParams::default();
        let origin = Vec2::new(0.0, 0.0);
        let far = Vec2::new(f32::MAX, f32::MAX);
        // distance overflows to infinity; the formula still says 1.0
        assert_eq!(speed_pressure(origin, far, ms(1), 0.0, &params), 1.0);
        assert_eq!(speed_pressure(origin, Vec2::new(500.0, 0.0), ms(10), 0.0, &params), 1.0);
        assert_eq!(speed_pressure(origin, far, ms(1), 0.5, &params), 0.1);
    }

    #[test]
    fn out_of_order_timestamp_uses_fallback_pressure() {
        let mut s = InputSampler::default();
        let b = brush();
        s.on_pointer_down(PointerEvent::mouse(Vec2::new(0.0, 0.0), ms(100)), &b, Rgb::BLACK);
        assert!(s.on_pointer_move(PointerEvent::mouse(Vec2::new(50.0, 0.0), ms(50)), &b, Rgb::BLACK));
        let p = s.live_stroke().points()[1];
        // 0.25 * 0.2 + 0.75 * 0.5
        assert!((p.pressure - 0.425).abs() < 1e-6);
    }

    #[test]
    fn first_point_uses_initial_pressure() {
        let mut s = InputSampler::default();
        s.on_pointer_down(PointerEvent::mouse(Vec2::new(5.0, 5.0), ms(0)), &brush(), Rgb::BLACK);
        assert!(s.is_drawing());
        let first = s.live_stroke().points()[0];
        assert_eq!(first.pressure, 0.2);
        assert!((first.thickness - (1.0 + 7.0 * 0.2)).abs() < 1e-6);
    }

    #[test]
    fn moves_are_smoothed_against_previous_pressure() {
        let mut s = InputSampler::default();
        let b = brush();
        s.on_pointer_down(PointerEvent::mouse(Vec2::new(0.0, 0.0), ms(0)), &b, Rgb::BLACK);
        assert!(s.on_pointer_move(PointerEvent::mouse(Vec2::new(100.0, 0.0), ms(100)), &b, Rgb::BLACK));
        let p = s.live_stroke().points()[1];
        // 0.25 * 0.2 + 0.75 * 0.5
        assert!((p.pressure - 0.425).abs() < 1e-6);
        assert!((p.thickness - b.thickness_for(0.425)).abs() < 1e-6);
    }

    #[test]
    fn small_moves_are_dropped() {
        let mut s = InputSampler::default();
        let b = brush();
        s.on_pointer_down(PointerEvent::mouse(Vec2::new(0.0, 0.0), ms(0)), &b, Rgb::BLACK);
        assert!(!s.on_pointer_move(PointerEvent::mouse(Vec2::new(1.0, 1.0), ms(10)), &b, Rgb::BLACK));
        assert_eq!(s.live_stroke().len(), 1);
        // distance is measured from the last *accepted* point, not the dropped one
        assert!(s.on_pointer_move(PointerEvent::mouse(Vec2::new(2.0, 0.0), ms(20)), &b, Rgb::BLACK));
        assert_eq!(s.live_stroke().len(), 2);
    }

    #[test]
    fn stylus_pressure_is_floored_not_smoothed() {
        let mut s = InputSampler::default();
        let b = brush();
        s.on_pointer_down(PointerEvent::stylus(Vec2::new(0.0, 0.0), ms(0), 0.0), &b, Rgb::BLACK);
        assert_eq!(s.live_stroke().points()[0].pressure, 0.01);
        s.on_pointer_move(PointerEvent::stylus(Vec2::new(10.0, 0.0), ms(5), 0.9), &b, Rgb::BLACK);
        assert_eq!(s.live_stroke().points()[1].pressure, 0.9);
        s.on_pointer_move(PointerEvent::stylus(Vec2::new(20.0, 0.0), ms(9), 1.7), &b, Rgb::BLACK);
        assert_eq!(s.live_stroke().points()[2].pressure, 1.0);
    }

    #[test]
    fn moves_while_idle_are_ignored() {
        let mut s = InputSampler::default();
        let b = brush();
        assert!(!s.on_pointer_move(PointerEvent::mouse(Vec2::new(9.0, 9.0), ms(1)), &b, Rgb::BLACK));
        assert!(s.on_pointer_up().is_none());
        assert_eq!(s.state(), SamplerState::Idle);
    }

    #[test]
    fn release_hands_over_and_clears() {
        let mut s = InputSampler::default();
        let b = brush();
        let red = Rgb::new(1.0, 0.0, 0.0);
        s.on_pointer_down(PointerEvent::mouse(Vec2::new(0.0, 0.0), ms(0)), &b, red);
        s.on_pointer_move(PointerEvent::mouse(Vec2::new(10.0, 0.0), ms(16)), &b, red);
        let stroke = s.on_pointer_up().unwrap();
        assert_eq!(stroke.len(), 2);
        assert!(stroke.points().iter().all(|p| p.color == red));
        assert!(s.live_stroke().is_empty());
        assert!(!s.is_drawing());
    }

    #[test]
    fn new_press_discards_previous_live_stroke() {
        let mut s = InputSampler::default();
        let b = brush();
        s.on_pointer_down(PointerEvent::mouse(Vec2::new(0.0, 0.0), ms(0)), &b, Rgb::BLACK);
        s.on_pointer_move(PointerEvent::mouse(Vec2::new(10.0, 0.0), ms(16)), &b, Rgb::BLACK);
        s.on_pointer_down(PointerEvent::mouse(Vec2::new(50.0, 50.0), ms(40)), &b, Rgb::BLACK);
        assert_eq!(s.live_stroke().len(), 1);
        assert_eq!(s.live_stroke().points()[0].position, Vec2::new(50.0, 50.0));
    }
}
