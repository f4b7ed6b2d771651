//! Grid module - the square tile matrix
//!
//! The grid is an N x N matrix where each cell holds a tile value (0 = empty).
//! Uses a flat vector in row-major order: index = row * N + col.
//!
//! All directional operations go through one canonical frame in which tiles
//! travel left. [`Grid::rotate`] gathers the grid into that frame and
//! [`Grid::unrotate`] scatters it back; both use the same cell bijection
//! ([`Direction::canonical_cell`]), so they are exact inverses.

use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::types::{Direction, Tile, TILE_EMPTY};

/// The game grid - N x N tiles using flat vector storage
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grid {
    size: usize,
    /// Flat array of tiles, row-major order (row * size + col)
    cells: Vec<Tile>,
}

impl Grid {
    /// Create a new empty grid
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![TILE_EMPTY; size * size],
        }
    }

    /// Build a grid from rows of tiles.
    ///
    /// Fails with [`GameError::InvalidSize`] unless the rows form a non-empty square.
    pub fn from_rows<R: AsRef<[Tile]>>(rows: &[R]) -> Result<Self, GameError> {
        let size = rows.len();
        if size == 0 || rows.iter().any(|r| r.as_ref().len() != size) {
            return Err(GameError::InvalidSize(size));
        }
        let cells = rows.iter().flat_map(|r| r.as_ref().iter().copied()).collect();
        Ok(Self { size, cells })
    }

    #[inline(always)]
    fn index(&self, row: usize, col: usize) -> Option<usize> {
        if row >= self.size || col >= self.size {
            return None;
        }
        Some(row * self.size + col)
    }

    /// Grid dimension (N)
    pub fn size(&self) -> usize {
        self.size
    }

    /// Get tile at (row, col)
    /// Returns None if out of bounds
    pub fn get(&self, row: usize, col: usize) -> Option<Tile> {
        self.index(row, col).map(|i| self.cells[i])
    }

    /// Set tile at (row, col)
    /// Returns false if out of bounds
    pub fn set(&mut self, row: usize, col: usize, tile: Tile) -> bool {
        match self.index(row, col) {
            Some(i) => {
                self.cells[i] = tile;
                true
            }
            None => false,
        }
    }

    /// All tiles in row-major order
    pub fn cells(&self) -> &[Tile] {
        &self.cells
    }

    /// Iterate rows as slices
    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> {
        self.cells.chunks(self.size.max(1))
    }

    /// Coordinates of every empty cell, in row-major order
    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, t)| **t == TILE_EMPTY)
            .map(|(i, _)| (i / self.size, i % self.size))
            .collect()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|t| *t != TILE_EMPTY)
    }

    /// Highest tile on the grid (0 for an empty grid)
    pub fn max_tile(&self) -> Tile {
        self.cells.iter().copied().max().unwrap_or(TILE_EMPTY)
    }

    /// Sum of all tiles
    pub fn total(&self) -> u64 {
        self.cells.iter().map(|t| *t as u64).sum()
    }

    /// Check whether two horizontally or vertically adjacent cells hold the same value
    pub fn has_adjacent_pair(&self) -> bool {
        let n = self.size;
        for row in 0..n {
            for col in 0..n {
                let here = self.cells[row * n + col];
                if col + 1 < n && self.cells[row * n + col + 1] == here {
                    return true;
                }
                if row + 1 < n && self.cells[(row + 1) * n + col] == here {
                    return true;
                }
            }
        }
        false
    }

    /// Re-orient the grid so that moving in `direction` becomes moving left.
    pub fn rotate(&self, direction: Direction) -> Grid {
        let n = self.size;
        let mut out = Grid::new(n);
        for line in 0..n {
            for pos in 0..n {
                let (row, col) = direction.canonical_cell(n, line, pos);
                out.cells[line * n + pos] = self.cells[row * n + col];
            }
        }
        out
    }

    /// Undo [`Grid::rotate`] for the same direction.
    pub fn unrotate(&self, direction: Direction) -> Grid {
        let n = self.size;
        let mut out = Grid::new(n);
        for line in 0..n {
            for pos in 0..n {
                let (row, col) = direction.canonical_cell(n, line, pos);
                out.cells[row * n + col] = self.cells[line * n + pos];
            }
        }
        out
    }

    /// Push every tile as far as possible in `direction`, keeping relative order.
    pub fn shift(&mut self, direction: Direction) {
        let mut canonical = self.rotate(direction);
        let n = self.size;
        if n > 0 {
            for line in canonical.cells.chunks_mut(n) {
                compact_line(line);
            }
        }
        *self = canonical.unrotate(direction);
    }

    /// Merge adjacent equal tiles that would collide moving in `direction`.
    ///
    /// Each pair becomes a doubled tile on the leading side and an empty cell
    /// behind it. A tile merges at most once per call. Returns the sum of the
    /// newly created tiles.
    pub fn merge(&mut self, direction: Direction) -> u32 {
        let mut canonical = self.rotate(direction);
        let n = self.size;
        let mut gained = 0;
        if n > 0 {
            for line in canonical.cells.chunks_mut(n) {
                gained += merge_line(line);
            }
        }
        *self = canonical.unrotate(direction);
        gained
    }
}

/// Move nonzero tiles to the front of the line, empties to the back.
fn compact_line(line: &mut [Tile]) {
    let mut write = 0;
    for read in 0..line.len() {
        if line[read] != TILE_EMPTY {
            line.swap(write, read);
            write += 1;
        }
    }
}

/// Single left-to-right merge pass; merged tiles are not rescanned.
fn merge_line(line: &mut [Tile]) -> u32 {
    let mut gained = 0;
    let mut i = 0;
    while i + 1 < line.len() {
        if line[i] != TILE_EMPTY && line[i] == line[i + 1] {
            line[i] *= 2;
            line[i + 1] = TILE_EMPTY;
            gained += line[i];
            i += 2;
        } else {
            i += 1;
        }
    }
    gained
}

impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.rows() {
            let line: Vec<String> = row
                .iter()
                .map(|t| if *t == TILE_EMPTY { ".".to_string() } else { t.to_string() })
                .collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}
