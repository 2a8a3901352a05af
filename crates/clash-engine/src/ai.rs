//! Placement providers: who picks the next cell during placement.

use crate::grid::Grid;
use clash_core::{Coord, Owner, ZoneBounds, GRID_SIZE};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Suggested placement style for the next decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrategyHint {
    Random,
    Adjacent,
}

impl StrategyHint {
    /// Alternate per placement: even-numbered placements random, odd ones adjacent
    pub fn for_placement(placed_so_far: u32) -> Self {
        if placed_so_far % 2 == 1 {
            StrategyHint::Adjacent
        } else {
            StrategyHint::Random
        }
    }
}

/// Picks one cell per call; `None` means no legal cell is available
pub trait PlacementProvider: Send {
    fn decide(&mut self, grid: &Grid, bounds: ZoneBounds, hint: StrategyHint) -> Option<Coord>;
}

fn empty_cells(grid: &Grid, bounds: ZoneBounds) -> Vec<Coord> {
    bounds
        .rows()
        .flat_map(|row| (0..GRID_SIZE).map(move |col| Coord::new(row, col)))
        .filter(|&coord| grid.is_empty_at(coord))
        .collect()
}

/// Random or clustered placement driven by a seeded RNG
pub struct RandomAdjacentProvider {
    owner: Owner,
    rng: ChaCha8Rng,
}

impl RandomAdjacentProvider {
    pub fn new(owner: Owner, seed: u64) -> Self {
        Self {
            owner,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    fn random(&mut self, grid: &Grid, bounds: ZoneBounds) -> Option<Coord> {
        empty_cells(grid, bounds).choose(&mut self.rng).copied()
    }

    /// Empty band cells touching one of our cells; random when there are none
    fn adjacent(&mut self, grid: &Grid, bounds: ZoneBounds) -> Option<Coord> {
        let candidates: Vec<Coord> = empty_cells(grid, bounds)
            .into_iter()
            .filter(|coord| {
                coord
                    .neighbors()
                    .any(|n| bounds.contains(n.row) && grid.cell_at(n).owner == self.owner)
            })
            .collect();

        match candidates.choose(&mut self.rng).copied() {
            Some(coord) => Some(coord),
            None => {
                trace!(owner = ?self.owner, "No adjacent cell, falling back to random");
                self.random(grid, bounds)
            }
        }
    }
}

impl PlacementProvider for RandomAdjacentProvider {
    fn decide(&mut self, grid: &Grid, bounds: ZoneBounds, hint: StrategyHint) -> Option<Coord> {
        match hint {
            StrategyHint::Random => self.random(grid, bounds),
            StrategyHint::Adjacent => self.adjacent(grid, bounds),
        }
    }
}

/// Replays a fixed list of cells, skipping ones that are taken or out of band
#[derive(Debug, Clone)]
pub struct ScriptedProvider {
    cells: Vec<Coord>,
    cursor: usize,
    repeat: bool,
}

impl ScriptedProvider {
    /// Single pass over `cells`
    pub fn new(cells: Vec<Coord>) -> Self {
        Self {
            cells,
            cursor: 0,
            repeat: false,
        }
    }

    /// Restart from the first cell whenever the list is exhausted
    pub fn repeating(cells: Vec<Coord>) -> Self {
        Self {
            cells,
            cursor: 0,
            repeat: true,
        }
    }

    /// Mirror a script across the horizontal midline of the board
    pub fn mirrored(&self) -> Self {
        Self {
            cells: self
                .cells
                .iter()
                .map(|c| Coord::new(GRID_SIZE - 1 - c.row, c.col))
                .collect(),
            cursor: 0,
            repeat: self.repeat,
        }
    }
}

impl PlacementProvider for ScriptedProvider {
    fn decide(&mut self, grid: &Grid, bounds: ZoneBounds, _hint: StrategyHint) -> Option<Coord> {
        if self.cells.is_empty() {
            return None;
        }

        let mut scanned = 0;
        while scanned < self.cells.len() {
            if self.cursor >= self.cells.len() {
                if !self.repeat {
                    return None;
                }
                self.cursor = 0;
            }

            let coord = self.cells[self.cursor];
            self.cursor += 1;
            scanned += 1;

            if bounds.contains(coord.row) && coord.col < GRID_SIZE && grid.is_empty_at(coord) {
                return Some(coord);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clash_core::{Cell, AI_ZONE, PLAYER_ZONE};

    #[test]
    fn test_hint_alternates() {
        assert_eq!(StrategyHint::for_placement(0), StrategyHint::Random);
        assert_eq!(StrategyHint::for_placement(1), StrategyHint::Adjacent);
        assert_eq!(StrategyHint::for_placement(2), StrategyHint::Random);
    }

    #[test]
    fn test_random_stays_in_band() {
        let grid = Grid::new();
        let mut provider = RandomAdjacentProvider::new(Owner::Ai, 7);
        for _ in 0..50 {
            let coord = provider.decide(&grid, AI_ZONE, StrategyHint::Random).unwrap();
            assert!(AI_ZONE.contains(coord.row));
        }
    }

    #[test]
    fn test_adjacent_touches_own_cell() {
        let mut grid = Grid::new();
        grid.set(4, 10, Cell::alive(Owner::Ai)).unwrap();
        let mut provider = RandomAdjacentProvider::new(Owner::Ai, 3);

        for _ in 0..20 {
            let coord = provider.decide(&grid, AI_ZONE, StrategyHint::Adjacent).unwrap();
            assert!(coord.row.abs_diff(4) <= 1 && coord.col.abs_diff(10) <= 1);
            assert_ne!(coord, Coord::new(4, 10));
        }
    }

    #[test]
    fn test_full_band_yields_none() {
        let mut grid = Grid::new();
        for row in AI_ZONE.rows() {
            for col in 0..GRID_SIZE {
                grid.set(row, col, Cell::alive(Owner::Ai)).unwrap();
            }
        }
        let mut provider = RandomAdjacentProvider::new(Owner::Ai, 1);
        assert_eq!(provider.decide(&grid, AI_ZONE, StrategyHint::Random), None);
        assert_eq!(provider.decide(&grid, AI_ZONE, StrategyHint::Adjacent), None);
    }

    #[test]
    fn test_same_seed_same_choices() {
        let grid = Grid::new();
        let mut a = RandomAdjacentProvider::new(Owner::Player, 99);
        let mut b = RandomAdjacentProvider::new(Owner::Player, 99);
        for _ in 0..10 {
            assert_eq!(
                a.decide(&grid, PLAYER_ZONE, StrategyHint::Random),
                b.decide(&grid, PLAYER_ZONE, StrategyHint::Random)
            );
        }
    }

    #[test]
    fn test_scripted_skips_taken_cells() {
        let mut grid = Grid::new();
        grid.set(14, 2, Cell::alive(Owner::Player)).unwrap();
        let mut provider = ScriptedProvider::new(vec![
            Coord::new(14, 2),
            Coord::new(3, 3),
            Coord::new(14, 3),
        ]);

        assert_eq!(
            provider.decide(&grid, PLAYER_ZONE, StrategyHint::Random),
            Some(Coord::new(14, 3))
        );
        assert_eq!(provider.decide(&grid, PLAYER_ZONE, StrategyHint::Random), None);
    }

    #[test]
    fn test_scripted_repeat_and_mirror() {
        let grid = Grid::new();
        let script = ScriptedProvider::repeating(vec![Coord::new(13, 1), Coord::new(13, 2)]);
        let mut mirrored = script.mirrored();
        let mut script = script;

        let picks: Vec<_> = (0..3)
            .filter_map(|_| script.decide(&grid, PLAYER_ZONE, StrategyHint::Random))
            .collect();
        assert_eq!(
            picks,
            vec![Coord::new(13, 1), Coord::new(13, 2), Coord::new(13, 1)]
        );

        assert_eq!(
            mirrored.decide(&grid, AI_ZONE, StrategyHint::Random),
            Some(Coord::new(6, 1))
        );
    }
}
