//! Fixed 20x20 board split into three horizontal bands.

use clash_core::{Cell, Coord, Error, Owner, OwnerCounts, Result, Zone, GRID_SIZE};
use serde::{Deserialize, Serialize};

/// Row-major cell matrix, row 0 at the AI edge. Edges are clipped, not wrapped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGrid")]
pub struct Grid {
    cells: Vec<Cell>,
}

/// Unchecked wire form of [`Grid`]
#[derive(Deserialize)]
struct RawGrid {
    cells: Vec<Cell>,
}

impl TryFrom<RawGrid> for Grid {
    type Error = Error;

    fn try_from(raw: RawGrid) -> Result<Self> {
        if raw.cells.len() != GRID_SIZE * GRID_SIZE {
            return Err(Error::Serialization(format!(
                "grid needs {} cells, found {}",
                GRID_SIZE * GRID_SIZE,
                raw.cells.len()
            )));
        }
        Ok(Self {
            cells: raw.cells.into_iter().map(Cell::normalized).collect(),
        })
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Grid {
    pub fn new() -> Self {
        Self {
            cells: vec![Cell::empty(); GRID_SIZE * GRID_SIZE],
        }
    }

    /// Get cell at position
    pub fn get(&self, row: usize, col: usize) -> Result<Cell> {
        let index = Self::index(row, col)?;
        Ok(self.cells[index])
    }

    /// Set cell at position; dead cells lose their owner
    pub fn set(&mut self, row: usize, col: usize, cell: Cell) -> Result<()> {
        let index = Self::index(row, col)?;
        self.cells[index] = cell.normalized();
        Ok(())
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::empty());
    }

    pub fn zone_of(&self, row: usize, col: usize) -> Result<Zone> {
        Self::index(row, col)?;
        Ok(Zone::of_row(row))
    }

    /// Alive cells grid-wide, per owner
    pub fn count_by_owner(&self) -> OwnerCounts {
        self.cells
            .iter()
            .filter(|cell| cell.alive)
            .map(|cell| cell.owner)
            .collect()
    }

    pub fn count_in_zone(&self, zone: Zone) -> OwnerCounts {
        zone.bounds()
            .rows()
            .flat_map(|row| (0..GRID_SIZE).map(move |col| (row, col)))
            .map(|(row, col)| self.cell_at(Coord::new(row, col)))
            .filter(|cell| cell.alive)
            .map(|cell| cell.owner)
            .collect()
    }

    /// Alive cells in the Moore neighborhood, excluding the cell itself
    pub fn count_alive_neighbors(&self, row: usize, col: usize) -> Result<(usize, Vec<Cell>)> {
        Self::index(row, col)?;
        let alive: Vec<Cell> = self.alive_neighbors(Coord::new(row, col)).collect();
        Ok((alive.len(), alive))
    }

    /// Owner tally of the alive neighbors
    pub fn neighbor_owners(&self, row: usize, col: usize) -> Result<OwnerCounts> {
        Self::index(row, col)?;
        Ok(self.neighbor_counts(Coord::new(row, col)))
    }

    pub fn is_empty_at(&self, coord: Coord) -> bool {
        !self.cell_at(coord).alive
    }

    /// Iterator over all cells with coordinates
    pub fn iter(&self) -> impl Iterator<Item = (Coord, &Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, cell)| (Self::index_to_coord(i), cell))
    }

    /// Coordinates whose state differs between two grids
    pub fn diff<'a>(&'a self, other: &'a Grid) -> impl Iterator<Item = (Coord, Cell)> + 'a {
        self.cells
            .iter()
            .zip(other.cells.iter())
            .enumerate()
            .filter(|(_, (before, after))| before != after)
            .map(|(i, (_, after))| (Self::index_to_coord(i), *after))
    }

    pub(crate) fn cell_at(&self, coord: Coord) -> Cell {
        self.cells[coord.row * GRID_SIZE + coord.col]
    }

    pub(crate) fn put(&mut self, coord: Coord, cell: Cell) {
        self.cells[coord.row * GRID_SIZE + coord.col] = cell.normalized();
    }

    pub(crate) fn alive_neighbors(&self, coord: Coord) -> impl Iterator<Item = Cell> + '_ {
        coord
            .neighbors()
            .map(move |n| self.cell_at(n))
            .filter(|cell| cell.alive)
    }

    pub(crate) fn neighbor_counts(&self, coord: Coord) -> OwnerCounts {
        self.alive_neighbors(coord).map(|cell| cell.owner).collect()
    }

    fn index(row: usize, col: usize) -> Result<usize> {
        if row >= GRID_SIZE || col >= GRID_SIZE {
            return Err(Error::OutOfBounds { row, col });
        }
        Ok(row * GRID_SIZE + col)
    }

    fn index_to_coord(index: usize) -> Coord {
        Coord::new(index / GRID_SIZE, index % GRID_SIZE)
    }
}

/// Render the board as text, one row per line: `A` ai, `P` player, `N` neutral
impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                let glyph = match self.cell_at(Coord::new(row, col)).owner {
                    Owner::None => '.',
                    Owner::Player => 'P',
                    Owner::Ai => 'A',
                    Owner::Neutral => 'N',
                };
                write!(f, "{}", glyph)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
