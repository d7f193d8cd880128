use glam::Vec4;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{FractalError, FractalResult};
use crate::types::{MAX_DEPTH, MIN_DEPTH};

/// Inclusive `[min, max]` range expressed in degrees (or degrees/second).
///
/// Sampling happens in degrees and the result is converted to radians,
/// so the range endpoints read the same way they are configured.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DegreeRange {
    pub min: f32,
    pub max: f32,
}

impl DegreeRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Draws a value uniformly from the range and returns it in radians.
    pub fn sample_radians(&self, rng: &mut impl Rng) -> f32 {
        rng.random_range(self.min..=self.max).to_radians()
    }

    fn validate(&self, name: &str) -> FractalResult<()> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(FractalError::configuration(format!(
                "{name} bounds must be finite, got [{}, {}]",
                self.min, self.max
            )));
        }
        if self.min > self.max {
            return Err(FractalError::configuration(format!(
                "{name} is inverted: min {} > max {}",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

/// Two-stop linear color gradient.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorGradient {
    pub start: Vec4,
    pub end: Vec4,
}

impl ColorGradient {
    pub const fn new(start: Vec4, end: Vec4) -> Self {
        Self { start, end }
    }

    /// Color at `t`, clamped to `[0, 1]`.
    pub fn evaluate(&self, t: f32) -> Vec4 {
        self.start.lerp(self.end, t.clamp(0.0, 1.0))
    }
}

/// Configuration of a fractal instance.
///
/// Everything here is checked by [`FractalConfig::validate`] before any
/// level array is allocated. The root scale is deliberately absent: it is
/// taken from the host's root pose on every tick.
///
/// ### Fields
/// - `depth` - Number of levels, `3..=8`.
/// - `sag_angle_range` - Maximum sag per part, in degrees.
/// - `spin_speed_range` - Signed spin speed per part, in degrees/second.
/// - `reverse_spin_probability` - Chance that a part spins the other way.
/// - `gradient_a` / `gradient_b` - Color gradients sampled by non-leaf levels.
/// - `leaf_color_a` / `leaf_color_b` - Fixed colors of the deepest level.
/// - `threads` - Worker count for the level scheduler, `None` for the default.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FractalConfig {
    pub depth: usize,
    pub sag_angle_range: DegreeRange,
    pub spin_speed_range: DegreeRange,
    pub reverse_spin_probability: f32,
    pub gradient_a: ColorGradient,
    pub gradient_b: ColorGradient,
    pub leaf_color_a: Vec4,
    pub leaf_color_b: Vec4,
    pub threads: Option<usize>,
}

impl Default for FractalConfig {
    fn default() -> Self {
        Self {
            depth: 4,
            sag_angle_range: DegreeRange::new(15.0, 25.0),
            spin_speed_range: DegreeRange::new(20.0, 25.0),
            reverse_spin_probability: 0.25,
            gradient_a: ColorGradient::new(
                Vec4::new(0.55, 0.35, 0.20, 1.0),
                Vec4::new(0.75, 0.60, 0.35, 1.0),
            ),
            gradient_b: ColorGradient::new(
                Vec4::new(0.40, 0.25, 0.15, 1.0),
                Vec4::new(0.60, 0.50, 0.30, 1.0),
            ),
            leaf_color_a: Vec4::new(0.30, 0.70, 0.25, 1.0),
            leaf_color_b: Vec4::new(0.55, 0.85, 0.30, 1.0),
            threads: None,
        }
    }
}

impl FractalConfig {
    /// Rejects configurations that cannot produce a valid hierarchy.
    pub fn validate(&self) -> FractalResult<()> {
        if !(MIN_DEPTH..=MAX_DEPTH).contains(&self.depth) {
            return Err(FractalError::configuration(format!(
                "depth {} is outside {MIN_DEPTH}..={MAX_DEPTH}",
                self.depth
            )));
        }
        self.sag_angle_range.validate("sag angle range")?;
        self.spin_speed_range.validate("spin speed range")?;
        if !(0.0..=1.0).contains(&self.reverse_spin_probability) {
            return Err(FractalError::configuration(format!(
                "reverse spin probability {} is outside [0, 1]",
                self.reverse_spin_probability
            )));
        }
        if self.threads == Some(0) {
            return Err(FractalError::configuration(
                "threads must be >= 1 when set",
            ));
        }
        Ok(())
    }

    /// Parses a JSON document and validates the result.
    ///
    /// Missing fields fall back to [`FractalConfig::default`].
    pub fn from_json_str(json: &str) -> FractalResult<Self> {
        let cfg: Self =
            serde_json::from_str(json).map_err(|e| FractalError::serde(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn default_config_is_valid() {
        assert_eq!(FractalConfig::default().validate(), Ok(()));
    }

    #[test]
    fn depth_outside_bounds_is_rejected() {
        for depth in [0, 1, 2, 9, 12] {
            let cfg = FractalConfig {
                depth,
                ..FractalConfig::default()
            };
            assert!(matches!(
                cfg.validate(),
                Err(FractalError::Configuration(_))
            ));
        }
        for depth in MIN_DEPTH..=MAX_DEPTH {
            let cfg = FractalConfig {
                depth,
                ..FractalConfig::default()
            };
            assert!(cfg.validate().is_ok(), "depth {depth} should be accepted");
        }
    }

    #[test]
    fn inverted_ranges_are_rejected() {
        let cfg = FractalConfig {
            sag_angle_range: DegreeRange::new(30.0, 10.0),
            ..FractalConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(FractalError::Configuration(_))
        ));

        let cfg = FractalConfig {
            spin_speed_range: DegreeRange::new(25.0, 20.0),
            ..FractalConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(FractalError::Configuration(_))
        ));
    }

    #[test]
    fn degenerate_but_ordered_range_is_accepted() {
        let cfg = FractalConfig {
            sag_angle_range: DegreeRange::new(0.0, 0.0),
            ..FractalConfig::default()
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn ranges_spanning_zero_are_accepted() {
        let cfg = FractalConfig {
            spin_speed_range: DegreeRange::new(-10.0, 10.0),
            ..FractalConfig::default()
        };
        assert_eq!(cfg.validate(), Ok(()));

        let cfg = FractalConfig {
            spin_speed_range: DegreeRange::new(-40.0, -20.0),
            ..FractalConfig::default()
        };
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn probability_and_threads_are_checked() {
        let cfg = FractalConfig {
            reverse_spin_probability: 1.5,
            ..FractalConfig::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = FractalConfig {
            threads: Some(0),
            ..FractalConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn sample_radians_stays_inside_range() {
        let range = DegreeRange::new(15.0, 25.0);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let v = range.sample_radians(&mut rng);
            assert!(v >= 15f32.to_radians() && v <= 25f32.to_radians());
        }
    }

    #[test]
    fn gradient_clamps_interpolator() {
        let g = ColorGradient::new(Vec4::ZERO, Vec4::ONE);
        assert_eq!(g.evaluate(-1.0), Vec4::ZERO);
        assert_eq!(g.evaluate(0.5), Vec4::splat(0.5));
        assert_eq!(g.evaluate(3.0), Vec4::ONE);
    }

    #[test]
    fn json_fills_missing_fields_with_defaults() {
        let cfg = FractalConfig::from_json_str(r#"{ "depth": 6 }"#).unwrap();
        assert_eq!(cfg.depth, 6);
        assert_eq!(cfg.sag_angle_range, FractalConfig::default().sag_angle_range);

        let err = FractalConfig::from_json_str(r#"{ "depth": 2 }"#).unwrap_err();
        assert!(matches!(err, FractalError::Configuration(_)));

        let err = FractalConfig::from_json_str("not json").unwrap_err();
        assert!(matches!(err, FractalError::Serde(_)));
    }
}
