use alloc::vec::Vec;
use chrono::{DateTime, Utc};
use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PuzzleConfig {
    pub grid_size: u8,
}

impl PuzzleConfig {
    pub fn new(grid_size: u8) -> Self {
        Self {
            grid_size: grid_size.max(2),
        }
    }
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self { grid_size: 3 }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SelectOutcome {
    NoChange,
    Selected,
    Deselected,
    Swapped,
    Solved,
}

impl SelectOutcome {
    pub const fn has_update(self) -> bool {
        use SelectOutcome::*;
        match self {
            NoChange => false,
            Selected => true,
            Deselected => true,
            Swapped => true,
            Solved => true,
        }
    }
}

/// Tile-swap puzzle over a slot->tile permutation.
///
/// Any two tiles may be swapped (no adjacency constraint), so every
/// permutation is reachable; the shuffle re-roll only exists to avoid a
/// pre-solved start. The permutation stays a bijection over `[0, N^2)`
/// because the only mutation is `swap`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SlidingPuzzleEngine {
    grid_size: u8,
    permutation: Vec<TileId>,
    selected: Option<usize>,
    session: RevealSession,
}

impl SlidingPuzzleEngine {
    pub fn new(config: PuzzleConfig, seed: u64) -> Self {
        let config = PuzzleConfig::new(config.grid_size);
        Self {
            grid_size: config.grid_size,
            permutation: Self::shuffled(config.grid_size, seed),
            selected: None,
            session: RevealSession::new(SessionConfig::default()),
        }
    }

    /// Fisher-Yates over `[0, grid_size^2)`, re-rolled while the result is
    /// the identity permutation.
    fn shuffled(grid_size: u8, seed: u64) -> Vec<TileId> {
        let total = square(grid_size) as usize;
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut permutation: Vec<TileId> = (0..total as TileId).collect();

        loop {
            for i in (1..total).rev() {
                let j = rng.random_range(0..=i);
                permutation.swap(i, j);
            }
            if !Self::is_identity(&permutation) {
                return permutation;
            }
            log::debug!("shuffle produced identity, re-rolling");
        }
    }

    fn is_identity(permutation: &[TileId]) -> bool {
        permutation
            .iter()
            .enumerate()
            .all(|(slot, &tile)| slot == tile as usize)
    }

    pub fn grid_size(&self) -> u8 {
        self.grid_size
    }

    pub fn total_tiles(&self) -> TileCount {
        square(self.grid_size)
    }

    pub fn permutation(&self) -> &[TileId] {
        &self.permutation
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn session(&self) -> &RevealSession {
        &self.session
    }

    pub fn tile_at(&self, slot: usize) -> Result<TileId> {
        self.permutation
            .get(slot)
            .copied()
            .ok_or(EngineError::IndexOutOfBounds)
    }

    pub fn is_solved(&self) -> bool {
        Self::is_identity(&self.permutation)
    }

    /// First call selects a slot, a second call on the same slot deselects,
    /// a second call on a different slot swaps the two tiles. Ignored once
    /// solved.
    pub fn select_tile(&mut self, slot: usize, now: DateTime<Utc>) -> Result<SelectOutcome> {
        use SelectOutcome::*;

        if slot >= self.permutation.len() {
            return Err(EngineError::IndexOutOfBounds);
        }

        if self.session.is_completed() {
            return Ok(NoChange);
        }

        self.session.begin(now);

        Ok(match self.selected {
            None => {
                self.selected = Some(slot);
                Selected
            }
            Some(prev) if prev == slot => {
                self.selected = None;
                Deselected
            }
            Some(prev) => {
                self.permutation.swap(prev, slot);
                self.selected = None;
                log::trace!("swapped slots {} and {}", prev, slot);

                if self.is_solved() {
                    self.session.update_progress(100.0, now);
                    Solved
                } else {
                    Swapped
                }
            }
        })
    }

    /// Re-shuffles under the same non-identity guarantee and clears the
    /// selection and solved state.
    pub fn reset_shuffle(&mut self, seed: u64) {
        self.permutation = Self::shuffled(self.grid_size, seed);
        self.selected = None;
        self.session.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t0() -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp_millis(0).unwrap()
    }

    fn solved_engine_with_permutation(permutation: &[TileId]) -> SlidingPuzzleEngine {
        let mut engine = SlidingPuzzleEngine::new(PuzzleConfig::new(3), 1);
        engine.permutation = permutation.to_vec();
        engine
    }

    fn is_bijection(permutation: &[TileId]) -> bool {
        let mut seen = alloc::vec![false; permutation.len()];
        for &tile in permutation {
            let tile = tile as usize;
            if tile >= seen.len() || seen[tile] {
                return false;
            }
            seen[tile] = true;
        }
        true
    }

    #[test]
    fn shuffle_never_yields_identity() {
        for grid_size in 2..=5u8 {
            for seed in 0..200u64 {
                let engine = SlidingPuzzleEngine::new(PuzzleConfig::new(grid_size), seed);
                assert!(!engine.is_solved(), "identity at size {grid_size} seed {seed}");
                assert!(is_bijection(engine.permutation()));
            }
        }
    }

    #[test]
    fn swaps_preserve_bijection() {
        let mut engine = SlidingPuzzleEngine::new(PuzzleConfig::new(4), 7);

        for (a, b) in [(0usize, 5usize), (5, 5), (3, 12), (12, 0), (1, 2)] {
            engine.select_tile(a, t0()).unwrap();
            engine.select_tile(b, t0()).unwrap();
            assert!(is_bijection(engine.permutation()));
        }
    }

    #[test]
    fn select_deselect_and_swap() {
        let mut engine = solved_engine_with_permutation(&[2, 0, 1, 3, 4, 5, 6, 7, 8]);

        assert_eq!(engine.select_tile(0, t0()).unwrap(), SelectOutcome::Selected);
        assert_eq!(engine.selected(), Some(0));
        assert_eq!(
            engine.select_tile(0, t0()).unwrap(),
            SelectOutcome::Deselected
        );
        assert_eq!(engine.selected(), None);

        engine.select_tile(0, t0()).unwrap();
        assert_eq!(engine.select_tile(1, t0()).unwrap(), SelectOutcome::Swapped);
        assert_eq!(engine.permutation(), &[0, 2, 1, 3, 4, 5, 6, 7, 8]);
        assert_eq!(engine.selected(), None);
    }

    #[test]
    fn solving_walk_completes_once() {
        let mut engine = solved_engine_with_permutation(&[2, 0, 1, 3, 4, 5, 6, 7, 8]);
        assert!(!engine.is_solved());

        engine.select_tile(0, t0()).unwrap();
        assert_eq!(engine.select_tile(1, t0()).unwrap(), SelectOutcome::Swapped);
        assert!(!engine.is_solved());

        engine.select_tile(1, t0()).unwrap();
        assert_eq!(engine.select_tile(2, t0()).unwrap(), SelectOutcome::Solved);
        assert!(engine.is_solved());
        assert_eq!(engine.session().state(), SessionState::Completed);

        // solved board no longer reacts
        assert_eq!(engine.select_tile(0, t0()).unwrap(), SelectOutcome::NoChange);
    }

    #[test]
    fn tile_at_reports_the_slot_occupant() {
        let engine = solved_engine_with_permutation(&[2, 0, 1, 3, 4, 5, 6, 7, 8]);

        assert_eq!(engine.tile_at(0), Ok(2));
        assert_eq!(engine.tile_at(2), Ok(1));
        assert_eq!(engine.tile_at(9), Err(EngineError::IndexOutOfBounds));
    }

    #[test]
    fn out_of_bounds_slot_is_rejected() {
        let mut engine = SlidingPuzzleEngine::new(PuzzleConfig::new(2), 3);

        assert_eq!(
            engine.select_tile(4, t0()),
            Err(EngineError::IndexOutOfBounds)
        );
    }

    #[test]
    fn reset_shuffle_clears_selection_and_session() {
        let mut engine = solved_engine_with_permutation(&[1, 0, 2, 3, 4, 5, 6, 7, 8]);

        engine.select_tile(0, t0()).unwrap();
        engine.select_tile(1, t0()).unwrap();
        assert!(engine.session().is_completed());

        engine.reset_shuffle(11);

        assert!(!engine.is_solved());
        assert_eq!(engine.selected(), None);
        assert_eq!(engine.session().state(), SessionState::NotStarted);
    }

    #[test]
    fn tiny_grid_config_is_normalized() {
        let engine = SlidingPuzzleEngine::new(PuzzleConfig::new(0), 9);

        assert_eq!(engine.grid_size(), 2);
        assert_eq!(engine.total_tiles(), 4);
    }
}
