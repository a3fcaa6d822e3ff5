/// Tunables for the cube effect
use std::f32::consts::PI;

use crate::color::Rgba;
use crate::error::EffectError;
use crate::transform::TransformMode;

/// How the size pulsation follows the clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PulseMode {
    /// Whole seconds only: the size changes in steps once per second
    #[default]
    Stepped,
    /// Fractional seconds
    Smooth,
}

impl PulseMode {
    pub fn seconds(self, ticks_ms: u32) -> f64 {
        match self {
            PulseMode::Stepped => (ticks_ms / 1000) as f64,
            PulseMode::Smooth => ticks_ms as f64 / 1000.0,
        }
    }
}

/// How the projected edge endpoints are handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineMode {
    /// One polyline through all endpoints, joining consecutive edges
    #[default]
    Polyline,
    /// One independent segment per edge
    Segments,
}

/// Largest accepted frame width or height
pub const MAX_DIMENSION: u32 = 16384;

#[derive(Debug, Clone, PartialEq)]
pub struct EffectConfig {
    pub width: u32,
    pub height: u32,
    pub line_color: Rgba,
    /// Fill of the off-screen buffer before the gradient is drawn
    pub background: Rgba,
    pub initial_scale: f32,
    /// (angle_x, angle_y) applied once at init
    pub initial_rotation: (f32, f32),
    /// (angle_x, angle_y) applied every frame
    pub rotation_step: (f32, f32),
    pub pulse_amplitude: f64,
    pub pulse: PulseMode,
    pub lines: LineMode,
    pub transform: TransformMode,
}

impl EffectConfig {
    pub fn with_line_color(line_color: Rgba) -> Self {
        Self {
            line_color,
            ..Self::default()
        }
    }

    /// Per-frame scale factor for the given tick count
    pub fn scale_factor(&self, ticks_ms: u32) -> f32 {
        (1.0 + self.pulse.seconds(ticks_ms).sin() * self.pulse_amplitude) as f32
    }

    pub fn validate(&self) -> Result<(), EffectError> {
        if self.width == 0 || self.height == 0 {
            return Err(EffectError::InvalidConfig(format!(
                "frame size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.width > MAX_DIMENSION || self.height > MAX_DIMENSION {
            return Err(EffectError::InvalidConfig(format!(
                "frame size {}x{} exceeds {}x{}",
                self.width, self.height, MAX_DIMENSION, MAX_DIMENSION
            )));
        }
        let values = [
            self.initial_scale,
            self.initial_rotation.0,
            self.initial_rotation.1,
            self.rotation_step.0,
            self.rotation_step.1,
            self.pulse_amplitude as f32,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(EffectError::InvalidConfig(
                "scale, rotation and pulse values must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            width: 320,
            height: 240,
            line_color: Rgba::WHITE,
            background: Rgba::new(0, 0, 0, 200),
            initial_scale: 50.0,
            // Isometric view: a corner pointing at the viewer
            initial_rotation: (PI / 4.0, 2.0f32.sqrt().atan()),
            rotation_step: (PI / 180.0, PI / 270.0),
            pulse_amplitude: 0.01,
            pulse: PulseMode::default(),
            lines: LineMode::default(),
            transform: TransformMode::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stepped_pulse_ignores_sub_second_ticks() {
        let config = EffectConfig::default();
        assert_eq!(config.scale_factor(1000), config.scale_factor(1999));
        assert_ne!(config.scale_factor(1999), config.scale_factor(2000));
        assert_eq!(config.scale_factor(999), 1.0);
    }

    #[test]
    fn test_smooth_pulse_uses_fractional_seconds() {
        let config = EffectConfig {
            pulse: PulseMode::Smooth,
            ..EffectConfig::default()
        };
        assert_ne!(config.scale_factor(1000), config.scale_factor(1500));
        let expected = (1.0 + 1.5f64.sin() * 0.01) as f32;
        assert!((config.scale_factor(1500) - expected).abs() < 1e-7);
    }

    #[test]
    fn test_scale_factor_bounds() {
        let config = EffectConfig::default();
        for seconds in 0..100u32 {
            let f = config.scale_factor(seconds * 1000);
            assert!((0.99..=1.01).contains(&f));
        }
    }

    #[test]
    fn test_validate() {
        assert!(EffectConfig::default().validate().is_ok());
        let zero = EffectConfig {
            height: 0,
            ..EffectConfig::default()
        };
        assert!(zero.validate().is_err());
        let nan = EffectConfig {
            rotation_step: (f32::NAN, 0.0),
            ..EffectConfig::default()
        };
        assert!(nan.validate().is_err());
        let wide = EffectConfig {
            width: MAX_DIMENSION + 1,
            ..EffectConfig::default()
        };
        assert!(wide.validate().is_err());
        let edge = EffectConfig {
            width: MAX_DIMENSION,
            height: 1,
            ..EffectConfig::default()
        };
        assert!(edge.validate().is_ok());
    }
}
