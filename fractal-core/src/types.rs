/// Index of a part inside one level of a [`crate::level_store::LevelStore`].
///
/// Parent/child relationships are implicit in this index: part `i` of
/// level `k` hangs under part `i / SLOT_COUNT` of level `k - 1`.
pub type PartIndex = usize;

/// Index of a hierarchy level, `0` being the root.
pub type LevelIndex = usize;

/// Number of child slots under every part.
pub const SLOT_COUNT: usize = 5;

/// Smallest and largest supported hierarchy depth.
pub const MIN_DEPTH: usize = 3;
pub const MAX_DEPTH: usize = 8;

/// Returns the index of the parent of `index` in the previous level.
#[inline]
pub fn parent_index(index: PartIndex) -> PartIndex {
    index / SLOT_COUNT
}

/// Returns which of the [`SLOT_COUNT`] slots `index` occupies under its parent.
#[inline]
pub fn slot_index(index: PartIndex) -> usize {
    index % SLOT_COUNT
}

/// Number of parts stored in `level`, i.e. `5^level`.
#[inline]
pub fn level_len(level: LevelIndex) -> usize {
    SLOT_COUNT.pow(level as u32)
}

/// Uniform scale applied to parts of `level`: `root_scale * 0.5^level`.
#[inline]
pub fn level_scale(root_scale: f32, level: LevelIndex) -> f32 {
    root_scale * 0.5f32.powi(level as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_and_slot_follow_index_arithmetic() {
        assert_eq!(parent_index(0), 0);
        assert_eq!(parent_index(4), 0);
        assert_eq!(parent_index(5), 1);
        assert_eq!(parent_index(24), 4);
        assert_eq!(slot_index(7), 2);
        assert_eq!(slot_index(10), 0);
    }

    #[test]
    fn level_len_is_power_of_five() {
        assert_eq!(level_len(0), 1);
        assert_eq!(level_len(1), 5);
        assert_eq!(level_len(3), 125);
        assert_eq!(level_len(7), 78_125);
    }

    #[test]
    fn level_scale_halves_per_level() {
        for root_scale in [0.25f32, 1.0, 3.0, 17.5] {
            let mut expected = root_scale;
            for level in 0..MAX_DEPTH {
                assert_eq!(level_scale(root_scale, level), expected);
                expected *= 0.5;
            }
        }
    }
}
