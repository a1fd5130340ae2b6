//! Brush configuration and the tunable constants of sampling and meshing.

use crate::error::Error;

/// User-facing brush settings. Changes apply to the next sampled point;
/// already sampled points keep the thickness they were given.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushConfig {
    min_thickness: f32,
    max_thickness: f32,
    speed_sensitivity: f32,
}

impl BrushConfig {
    /// Validate and build a brush. Thicknesses must be finite with
    /// `0 < min <= max`; sensitivity must be finite and non-negative.
    pub fn new(min_thickness: f32, max_thickness: f32, speed_sensitivity: f32) -> Result<Self, Error> {
        if !(min_thickness.is_finite() && max_thickness.is_finite()) {
            return Err(Error::InvalidBrush("thickness must be finite".into()));
        }
        if min_thickness <= 0.0 {
            return Err(Error::InvalidBrush(format!(
                "min thickness must be > 0, got {min_thickness}"
            )));
        }
        if min_thickness > max_thickness {
            return Err(Error::InvalidBrush(format!(
                "min thickness {min_thickness} exceeds max thickness {max_thickness}"
            )));
        }
        if !speed_sensitivity.is_finite() || speed_sensitivity < 0.0 {
            return Err(Error::InvalidBrush(format!(
                "speed sensitivity must be a non-negative number, got {speed_sensitivity}"
            )));
        }
        Ok(Self { min_thickness, max_thickness, speed_sensitivity })
    }

    pub fn min_thickness(&self) -> f32 {
        self.min_thickness
    }

    pub fn max_thickness(&self) -> f32 {
        self.max_thickness
    }

    pub fn speed_sensitivity(&self) -> f32 {
        self.speed_sensitivity
    }

    /// Map a pressure to a brush width: `min + (max - min) * pressure`.
    pub fn thickness_for(&self, pressure: f32) -> f32 {
        self.min_thickness + (self.max_thickness - self.min_thickness) * pressure
    }
}

impl Default for BrushConfig {
    fn default() -> Self {
        Self { min_thickness: 1.0, max_thickness: 5.0, speed_sensitivity: 0.5 }
    }
}

/// Constants of the input sampler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplerParams {
    /// Pressure given to the first point of every stroke.
    pub initial_pressure: f32,
    /// Moves closer than this to the last accepted point are dropped.
    pub min_movement: f32,
    /// Speed (units/s) at which speed-derived pressure bottoms out (with sensitivity 1).
    pub max_speed: f32,
    /// Weight of the previous point's pressure when smoothing.
    pub smoothing: f32,
    /// Pressure used when two samples share a timestamp.
    pub fallback_pressure: f32,
    /// Lowest pressure accepted from a pressure-capable device.
    pub stylus_floor: f32,
}

impl Default for SamplerParams {
    fn default() -> Self {
        Self {
            initial_pressure: 0.2,
            min_movement: 1.5,
            max_speed: 1000.0,
            smoothing: 0.25,
            fallback_pressure: 0.5,
            stylus_floor: 0.01,
        }
    }
}

/// Constants of the ribbon mesher.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryParams {
    /// Segments longer than this are subdivided.
    pub interpolation_distance: f32,
    /// Number of sub-segments a long segment is split into.
    pub segments: usize,
    /// Polyline steps shorter than this are skipped.
    pub degenerate_epsilon: f32,
    /// Upper bound on the ribbon width before halving.
    pub max_thickness: f32,
}

impl Default for GeometryParams {
    fn default() -> Self {
        Self {
            interpolation_distance: 5.0,
            segments: 3,
            degenerate_epsilon: 0.1,
            max_thickness: 4.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_inverted_or_empty_ranges() {
        assert!(BrushConfig::new(0.0, 5.0, 0.5).is_err());
        assert!(BrushConfig::new(6.0, 5.0, 0.5).is_err());
        assert!(BrushConfig::new(1.0, f32::NAN, 0.5).is_err());
        assert!(BrushConfig::new(1.0, 5.0, -0.1).is_err());
        assert!(BrushConfig::new(2.0, 2.0, 0.0).is_ok());
    }

    #[test]
    fn thickness_spans_min_to_max() {
        let brush = BrushConfig::new(1.0, 8.0, 0.5).unwrap();
        assert_eq!(brush.thickness_for(0.0), 1.0);
        assert_eq!(brush.thickness_for(0.5), 4.5);
        assert_eq!(brush.thickness_for(1.0), 8.0);
    }
}
