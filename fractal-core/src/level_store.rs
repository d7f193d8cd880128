use glam::Vec4;

use crate::error::{FractalError, FractalResult};
use crate::matrix::PackedMatrix;
use crate::part::PartRecord;
use crate::types::{LevelIndex, SLOT_COUNT, level_len};

/// Arena of hierarchy levels.
///
/// Level `k` owns one contiguous array of `5^k` [`PartRecord`]s and one
/// array of the same length of [`PackedMatrix`] outputs. There are no node
/// handles; the parent of part `i` is part `i / 5` of the previous level.
///
/// The whole set is built together and dropped together: a store never
/// changes depth or level sizes after construction.
#[derive(Debug, Clone)]
pub struct LevelStore {
    parts: Vec<Vec<PartRecord>>,
    matrices: Vec<Vec<PackedMatrix>>,
    /// Per-level random seed forwarded to the renderer for shading variation.
    sequence_numbers: Vec<Vec4>,
}

impl LevelStore {
    /// Wraps prebuilt level arrays, checking the `1, 5, 25, ...` layout.
    ///
    /// Matrix arrays are allocated to match and start as identity.
    ///
    /// ### Errors
    /// - [`FractalError::Configuration`] if the level sizes or the number of
    ///   sequence seeds do not match the hierarchy layout.
    pub fn from_levels(
        parts: Vec<Vec<PartRecord>>,
        sequence_numbers: Vec<Vec4>,
    ) -> FractalResult<Self> {
        if parts.is_empty() {
            return Err(FractalError::configuration("a hierarchy needs at least one level"));
        }
        for (level, level_parts) in parts.iter().enumerate() {
            if level_parts.len() != level_len(level) {
                return Err(FractalError::configuration(format!(
                    "level {level} holds {} parts, expected {}",
                    level_parts.len(),
                    level_len(level)
                )));
            }
        }
        if sequence_numbers.len() != parts.len() {
            return Err(FractalError::configuration(format!(
                "{} sequence seeds for {} levels",
                sequence_numbers.len(),
                parts.len()
            )));
        }

        let matrices = parts
            .iter()
            .map(|level_parts| vec![PackedMatrix::IDENTITY; level_parts.len()])
            .collect();

        Ok(Self {
            parts,
            matrices,
            sequence_numbers,
        })
    }

    /// Number of levels.
    pub fn depth(&self) -> usize {
        self.parts.len()
    }

    /// Length of every level, root first.
    pub fn level_lengths(&self) -> Vec<usize> {
        self.parts.iter().map(Vec::len).collect()
    }

    /// Total number of parts across all levels.
    pub fn part_count(&self) -> usize {
        self.parts.iter().map(Vec::len).sum()
    }

    pub fn parts(&self, level: LevelIndex) -> &[PartRecord] {
        &self.parts[level]
    }

    pub fn matrices(&self, level: LevelIndex) -> &[PackedMatrix] {
        &self.matrices[level]
    }

    /// Matrix arrays of every level, root first.
    pub fn all_matrices(&self) -> Vec<&[PackedMatrix]> {
        self.matrices.iter().map(Vec::as_slice).collect()
    }

    pub fn sequence_numbers(&self, level: LevelIndex) -> Vec4 {
        self.sequence_numbers[level]
    }

    /// Mutable access to the single root part and its matrix.
    pub fn root_mut(&mut self) -> (&mut PartRecord, &mut PackedMatrix) {
        (&mut self.parts[0][0], &mut self.matrices[0][0])
    }

    /// Splits the store for updating `level`.
    ///
    /// Returns the previous level's parts (read-only) alongside the
    /// level's own parts and matrices (exclusive). This is the only way to
    /// write a non-root level, so a level is never written while its
    /// parents are being written.
    ///
    /// ### Panics
    /// Panics if `level` is `0` or not below [`LevelStore::depth`].
    pub fn split_level_mut(
        &mut self,
        level: LevelIndex,
    ) -> (&[PartRecord], &mut [PartRecord], &mut [PackedMatrix]) {
        assert!(level >= 1, "the root level has no parent level");
        let (head, tail) = self.parts.split_at_mut(level);
        let parents = head[level - 1].as_slice();
        let parts = tail[0].as_mut_slice();
        debug_assert_eq!(parts.len(), parents.len() * SLOT_COUNT);
        (parents, parts, self.matrices[level].as_mut_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn levels(depth: usize) -> Vec<Vec<PartRecord>> {
        (0..depth)
            .map(|level| (0..level_len(level)).map(|i| PartRecord::new(i, 0.0, 0.0)).collect())
            .collect()
    }

    #[test]
    fn from_levels_accepts_power_of_five_layout() {
        let store = LevelStore::from_levels(levels(4), vec![Vec4::ZERO; 4]).unwrap();
        assert_eq!(store.depth(), 4);
        assert_eq!(store.level_lengths(), vec![1, 5, 25, 125]);
        assert_eq!(store.part_count(), 156);
        for level in 0..4 {
            assert_eq!(store.matrices(level).len(), store.parts(level).len());
        }
    }

    #[test]
    fn from_levels_rejects_wrong_sizes() {
        let mut bad = levels(3);
        bad[2].pop();
        assert!(LevelStore::from_levels(bad, vec![Vec4::ZERO; 3]).is_err());
        assert!(LevelStore::from_levels(Vec::new(), Vec::new()).is_err());
        assert!(LevelStore::from_levels(levels(3), vec![Vec4::ZERO; 2]).is_err());
    }

    #[test]
    fn split_level_mut_pairs_level_with_its_parents() {
        let mut store = LevelStore::from_levels(levels(3), vec![Vec4::ZERO; 3]).unwrap();
        let (parents, parts, matrices) = store.split_level_mut(2);
        assert_eq!(parents.len(), 5);
        assert_eq!(parts.len(), 25);
        assert_eq!(matrices.len(), 25);
    }

    #[test]
    #[should_panic]
    fn split_level_mut_panics_for_root() {
        let mut store = LevelStore::from_levels(levels(3), vec![Vec4::ZERO; 3]).unwrap();
        let _ = store.split_level_mut(0);
    }
}
