//! Conveyor: every live cell advances one row toward the combat band.

use crate::grid::Grid;
use clash_core::{Cell, Coord, Owner, NEUTRAL_ZONE};
use tracing::trace;

#[derive(Debug, Clone, Copy, Default)]
pub struct ConveyorMover;

impl ConveyorMover {
    pub fn new() -> Self {
        Self
    }

    /// Shift all live cells one row toward the neutral band.
    ///
    /// Sources are visited row-major. When two cells land on the same
    /// destination, a Neutral mover always wins; otherwise a mover of a
    /// different side displaces a non-Neutral occupant; in every other case
    /// the occupant stays.
    pub fn advance(&self, grid: &Grid) -> Grid {
        let mut next = Grid::new();

        for (coord, cell) in grid.iter() {
            if !cell.alive {
                continue;
            }

            let Some(dest) = Self::destination(coord) else {
                trace!(row = coord.row, col = coord.col, "Mover left the board");
                continue;
            };

            let occupant = next.cell_at(dest);
            if !occupant.alive || Self::displaces(*cell, occupant) {
                next.put(dest, Cell::alive(cell.owner));
            } else {
                trace!(
                    row = dest.row,
                    col = dest.col,
                    mover = ?cell.owner,
                    occupant = ?occupant.owner,
                    "Collision lost by mover"
                );
            }
        }

        next
    }

    fn destination(coord: Coord) -> Option<Coord> {
        if coord.row < NEUTRAL_ZONE.start {
            coord.offset(1, 0)
        } else if coord.row > NEUTRAL_ZONE.end {
            coord.offset(-1, 0)
        } else {
            Some(coord)
        }
    }

    fn displaces(mover: Cell, occupant: Cell) -> bool {
        mover.owner == Owner::Neutral
            || (occupant.owner != Owner::Neutral && mover.owner != occupant.owner)
    }
}
