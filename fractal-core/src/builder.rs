//! Construction of the level arrays at activation time.

use glam::Vec4;
use rand::Rng;

use crate::config::FractalConfig;
use crate::error::FractalResult;
use crate::level_store::LevelStore;
use crate::part::PartRecord;
use crate::types::{PartIndex, level_len, slot_index};

/// Builds fresh [`LevelStore`]s from a validated configuration.
///
/// The random source is passed in explicitly, so two builds from the same
/// seed produce identical hierarchies.
#[derive(Debug, Clone)]
pub struct HierarchyBuilder<'a> {
    cfg: &'a FractalConfig,
}

impl<'a> HierarchyBuilder<'a> {
    /// Validates `cfg` up front; a builder only exists for good configs.
    ///
    /// ### Errors
    /// Whatever [`FractalConfig::validate`] rejects.
    pub fn new(cfg: &'a FractalConfig) -> FractalResult<Self> {
        cfg.validate()?;
        Ok(Self { cfg })
    }

    /// Samples one part for `index`'s slot.
    ///
    /// Draws, in order: the sag angle, the reverse-spin coin, the spin speed.
    pub fn sample_part(&self, index: PartIndex, rng: &mut impl Rng) -> PartRecord {
        let max_sag_angle = self.cfg.sag_angle_range.sample_radians(rng);
        let direction = if rng.random_bool(f64::from(self.cfg.reverse_spin_probability)) {
            -1.0
        } else {
            1.0
        };
        let spin_velocity = direction * self.cfg.spin_speed_range.sample_radians(rng);
        PartRecord::new(slot_index(index), spin_velocity, max_sag_angle)
    }

    /// Allocates and fills every level, root first.
    ///
    /// Level `k` holds `5^k` parts, each in slot `index % 5`. After the
    /// parts, one shading seed per level is drawn.
    pub fn build(&self, rng: &mut impl Rng) -> FractalResult<LevelStore> {
        let parts: Vec<Vec<PartRecord>> = (0..self.cfg.depth)
            .map(|level| {
                (0..level_len(level))
                    .map(|index| self.sample_part(index, rng))
                    .collect()
            })
            .collect();

        let sequence_numbers = (0..self.cfg.depth)
            .map(|_| Vec4::new(rng.random(), rng.random(), rng.random(), rng.random()))
            .collect();

        LevelStore::from_levels(parts, sequence_numbers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DegreeRange;
    use crate::error::FractalError;
    use crate::part::slot_rotation;
    use crate::types::{MAX_DEPTH, MIN_DEPTH};
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn level_lengths_are_powers_of_five_for_every_depth() {
        let mut rng = StdRng::seed_from_u64(1);
        for depth in MIN_DEPTH..=MAX_DEPTH {
            let cfg = FractalConfig {
                depth,
                ..FractalConfig::default()
            };
            let store = HierarchyBuilder::new(&cfg).unwrap().build(&mut rng).unwrap();
            assert_eq!(store.depth(), depth);
            for (level, len) in store.level_lengths().into_iter().enumerate() {
                assert_eq!(len, 5usize.pow(level as u32));
            }
        }
    }

    #[test]
    fn parts_take_the_orientation_of_their_slot() {
        let cfg = FractalConfig::default();
        let mut rng = StdRng::seed_from_u64(2);
        let store = HierarchyBuilder::new(&cfg).unwrap().build(&mut rng).unwrap();

        assert_eq!(store.parts(0)[0].local_rotation, slot_rotation(0));
        for level in 1..store.depth() {
            for (i, part) in store.parts(level).iter().enumerate() {
                assert_eq!(part.local_rotation, slot_rotation(i % 5));
            }
        }
    }

    #[test]
    fn sampled_fields_respect_configured_ranges() {
        let cfg = FractalConfig {
            depth: 5,
            sag_angle_range: DegreeRange::new(10.0, 20.0),
            spin_speed_range: DegreeRange::new(30.0, 40.0),
            reverse_spin_probability: 0.5,
            ..FractalConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(3);
        let store = HierarchyBuilder::new(&cfg).unwrap().build(&mut rng).unwrap();

        let mut reversed = 0;
        let mut total = 0;
        for level in 0..store.depth() {
            for part in store.parts(level) {
                assert!(part.max_sag_angle >= 10f32.to_radians());
                assert!(part.max_sag_angle <= 20f32.to_radians());
                let speed = part.spin_velocity.abs();
                assert!(speed >= 30f32.to_radians() && speed <= 40f32.to_radians());
                if part.spin_velocity < 0.0 {
                    reversed += 1;
                }
                total += 1;
                assert_eq!(part.spin_angle, 0.0);
            }
        }
        // 781 parts with p = 0.5; both directions must show up.
        assert!(reversed > total / 4 && reversed < total * 3 / 4);
    }

    #[test]
    fn spin_range_spanning_zero_yields_both_signs() {
        let cfg = FractalConfig {
            depth: 4,
            spin_speed_range: DegreeRange::new(-10.0, 10.0),
            reverse_spin_probability: 0.0,
            ..FractalConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(11);
        let store = HierarchyBuilder::new(&cfg).unwrap().build(&mut rng).unwrap();

        let limit = 10f32.to_radians();
        let velocities: Vec<f32> = (0..store.depth())
            .flat_map(|level| store.parts(level).iter().map(|part| part.spin_velocity))
            .collect();
        assert!(velocities.iter().all(|v| v.abs() <= limit));
        assert!(velocities.iter().any(|&v| v < 0.0));
        assert!(velocities.iter().any(|&v| v > 0.0));
    }

    #[test]
    fn reverse_probability_extremes_fix_the_direction() {
        for (p, negative) in [(0.0, false), (1.0, true)] {
            let cfg = FractalConfig {
                depth: 3,
                reverse_spin_probability: p,
                ..FractalConfig::default()
            };
            let mut rng = StdRng::seed_from_u64(4);
            let store = HierarchyBuilder::new(&cfg).unwrap().build(&mut rng).unwrap();
            for level in 0..store.depth() {
                let parts = store.parts(level);
                assert!(parts.iter().all(|part| (part.spin_velocity < 0.0) == negative));
            }
        }
    }

    #[test]
    fn same_seed_builds_same_hierarchy() {
        let cfg = FractalConfig::default();
        let builder = HierarchyBuilder::new(&cfg).unwrap();
        let a = builder.build(&mut StdRng::seed_from_u64(99)).unwrap();
        let b = builder.build(&mut StdRng::seed_from_u64(99)).unwrap();
        for level in 0..a.depth() {
            assert_eq!(a.parts(level), b.parts(level));
            assert_eq!(a.sequence_numbers(level), b.sequence_numbers(level));
        }
    }

    #[test]
    fn invalid_config_never_yields_a_builder() {
        let cfg = FractalConfig {
            depth: 2,
            ..FractalConfig::default()
        };
        assert!(matches!(
            HierarchyBuilder::new(&cfg),
            Err(FractalError::Configuration(_))
        ));

        let cfg = FractalConfig {
            spin_speed_range: DegreeRange::new(5.0, 1.0),
            ..FractalConfig::default()
        };
        assert!(HierarchyBuilder::new(&cfg).is_err());
    }
}
