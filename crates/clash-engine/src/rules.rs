//! Zone-aware generation step.
//!
//! The neutral band runs its own rules: Player/AI cells there only count
//! same-side neighbors to survive, Neutral cells resist isolation, births
//! are decided by domination among the three parents, and after each
//! generation Neutral cells surrounded by one side convert to it.
//! The two home bands run classic B3/S23 and births take the band's owner.

use crate::grid::Grid;
use clash_core::{Cell, Coord, Owner, RuleConfig, Zone};
use tracing::trace;

/// Live neighbors required for a birth
pub const BIRTH_NEIGHBORS: usize = 3;

#[derive(Debug, Clone, Default)]
pub struct RuleEngine {
    config: RuleConfig,
}

impl RuleEngine {
    pub fn new(config: RuleConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RuleConfig {
        &self.config
    }

    /// Compute the next generation, chameleon pass included.
    ///
    /// Every cell reads the untouched input grid; the result is returned whole.
    pub fn compute_next_generation(&self, grid: &Grid) -> Grid {
        let mut next = Grid::new();
        for (coord, cell) in grid.iter() {
            next.put(coord, self.next_cell(grid, coord, *cell));
        }
        self.chameleon_pass(&next)
    }

    /// Convert Neutral cells of the combat band that are surrounded by one side.
    ///
    /// Neighbor tallies are taken from `grid` as given and all flips are
    /// committed together, so the scan order never matters.
    pub fn chameleon_pass(&self, grid: &Grid) -> Grid {
        let mut next = grid.clone();
        let threshold = self.config.chameleon_threshold;

        for (coord, cell) in grid.iter() {
            if !cell.alive
                || cell.owner != Owner::Neutral
                || Zone::of_row(coord.row) != Zone::Neutral
            {
                continue;
            }

            let counts = grid.neighbor_counts(coord);
            let flipped = if counts.player >= threshold {
                Owner::Player
            } else if counts.ai >= threshold {
                Owner::Ai
            } else {
                continue;
            };

            trace!(row = coord.row, col = coord.col, owner = ?flipped, "Chameleon flip");
            next.put(coord, Cell::alive(flipped));
        }

        next
    }

    fn next_cell(&self, grid: &Grid, coord: Coord, cell: Cell) -> Cell {
        let counts = grid.neighbor_counts(coord);
        let total = counts.total();
        let zone = Zone::of_row(coord.row);

        if cell.alive {
            let survives = match (zone, cell.owner) {
                (Zone::Neutral, Owner::Player | Owner::Ai) => {
                    self.config.survives(counts.get(cell.owner))
                }
                (Zone::Neutral, Owner::Neutral) => {
                    self.config.survives(total) || total == self.config.neutral_resistance
                }
                (Zone::Neutral, Owner::None) => false,
                (Zone::Ai | Zone::Player, _) => self.config.survives(total),
            };

            return if survives {
                Cell::alive(cell.owner)
            } else {
                Cell::empty()
            };
        }

        if total != BIRTH_NEIGHBORS {
            return Cell::empty();
        }

        let owner = match zone {
            Zone::Neutral => counts.dominant(),
            Zone::Ai | Zone::Player => zone.native_owner(),
        };
        trace!(row = coord.row, col = coord.col, owner = ?owner, "Birth");
        Cell::alive(owner)
    }
}
