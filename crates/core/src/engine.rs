//! Grid engine - the complete rules of the game
//!
//! Ties together the grid, the score, and the random source. It handles
//! shifting, merging, tile spawning, the game-over check, and exact state
//! capture/restore for undo. No I/O, no timing, no threads.

use arrayvec::ArrayVec;

use crate::error::GameError;
use crate::grid::Grid;
use crate::rng::SimpleRng;
use crate::snapshot::Snapshot;
use crate::types::{
    Direction, Tile, DEFAULT_GRID_SIZE, DEFAULT_INITIAL_TILES, DEFAULT_SPAWN_VALUES, TILE_EMPTY,
};

/// Maximum number of distinct spawn values.
pub const MAX_SPAWN_VALUES: usize = 8;

/// Construction parameters for a [`GridEngine`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridConfig {
    pub size: usize,
    pub spawn_values: Vec<Tile>,
    pub initial_tiles: usize,
    pub seed: u32,
}

impl GridConfig {
    pub fn new(seed: u32) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    pub fn with_spawn_values(mut self, values: &[Tile]) -> Self {
        self.spawn_values = values.to_vec();
        self
    }

    pub fn with_initial_tiles(mut self, count: usize) -> Self {
        self.initial_tiles = count;
        self
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_GRID_SIZE,
            spawn_values: DEFAULT_SPAWN_VALUES.to_vec(),
            initial_tiles: DEFAULT_INITIAL_TILES,
            seed: 1,
        }
    }
}

/// Result of the shift/merge/shift part of a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideResult {
    /// Whether any tile moved or merged
    pub changed: bool,
    /// Sum of the tiles created by merging
    pub gained: u32,
}

/// A tile written by [`GridEngine::place_tile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedTile {
    pub row: usize,
    pub col: usize,
    pub value: Tile,
}

/// Outcome of a complete, effective move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveReport {
    pub gained: u32,
    pub spawned: Option<PlacedTile>,
}

/// Authoritative game state: grid, score and random source.
#[derive(Debug, Clone)]
pub struct GridEngine {
    grid: Grid,
    score: u32,
    rng: SimpleRng,
    spawn_values: ArrayVec<Tile, MAX_SPAWN_VALUES>,
}

impl GridEngine {
    /// Create a board and place `config.initial_tiles` random tiles on it.
    pub fn new(config: GridConfig) -> Result<Self, GameError> {
        if config.size < 1 {
            return Err(GameError::InvalidSize(config.size));
        }
        if config.spawn_values.is_empty()
            || config
                .spawn_values
                .iter()
                .any(|v| *v < 2 || !v.is_power_of_two())
        {
            return Err(GameError::InvalidSpawnValues);
        }
        let mut spawn_values = ArrayVec::new();
        spawn_values
            .try_extend_from_slice(&config.spawn_values)
            .map_err(|_| GameError::InvalidSpawnValues)?;

        let mut engine = Self {
            grid: Grid::new(config.size),
            score: 0,
            rng: SimpleRng::new(config.seed),
            spawn_values,
        };
        for _ in 0..config.initial_tiles {
            if engine.place_tile().is_none() {
                break;
            }
        }
        Ok(engine)
    }

    /// Default 4x4 game with the given seed
    pub fn with_seed(seed: u32) -> Self {
        // The default configuration always validates.
        match Self::new(GridConfig::new(seed)) {
            Ok(engine) => engine,
            Err(_) => unreachable!("default grid config is valid"),
        }
    }

    /// Start from an explicit grid (score 0).
    pub fn from_grid(grid: Grid, seed: u32) -> Self {
        let mut spawn_values = ArrayVec::new();
        spawn_values.extend(DEFAULT_SPAWN_VALUES);
        Self {
            grid,
            score: 0,
            rng: SimpleRng::new(seed),
            spawn_values,
        }
    }

    pub fn size(&self) -> usize {
        self.grid.size()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Copy of the current tiles.
    pub fn tiles(&self) -> Grid {
        self.grid.clone()
    }

    pub fn best_tile(&self) -> Tile {
        self.grid.max_tile()
    }

    pub fn empty_cells(&self) -> usize {
        self.grid.cells().iter().filter(|t| **t == TILE_EMPTY).count()
    }

    /// Place a random spawn value in a random empty cell.
    ///
    /// A full grid is left untouched and the generator is not advanced.
    pub fn place_tile(&mut self) -> Option<PlacedTile> {
        let empty = self.grid.empty_cells();
        if empty.is_empty() {
            return None;
        }
        let value = *self.rng.choose(&self.spawn_values)?;
        let (row, col) = *self.rng.choose(&empty)?;
        self.grid.set(row, col, value);
        Some(PlacedTile { row, col, value })
    }

    /// Push all tiles as far as they go in `direction`.
    pub fn shift(&mut self, direction: Direction) {
        self.grid.shift(direction);
    }

    /// Merge colliding pairs in `direction` and add the new tiles to the score.
    pub fn merge(&mut self, direction: Direction) -> u32 {
        let gained = self.grid.merge(direction);
        self.score += gained;
        gained
    }

    /// Shift, merge, and shift again; no tile is placed.
    pub fn slide(&mut self, direction: Direction) -> SlideResult {
        let before = self.grid.clone();
        self.shift(direction);
        let gained = self.merge(direction);
        self.shift(direction);
        SlideResult {
            changed: self.grid != before,
            gained,
        }
    }

    /// Play a complete move: slide, then spawn a tile if anything changed.
    ///
    /// An ineffective move leaves the engine untouched and spawns nothing.
    pub fn play(&mut self, direction: Direction) -> Result<MoveReport, GameError> {
        let slide = self.slide(direction);
        if !slide.changed {
            return Err(GameError::IneffectiveMove);
        }
        let spawned = self.place_tile();
        Ok(MoveReport {
            gained: slide.gained,
            spawned,
        })
    }

    /// False once the grid is full and no two neighbours match.
    pub fn has_moves(&self) -> bool {
        !self.grid.is_full() || self.grid.has_adjacent_pair()
    }

    pub fn get_state(&self) -> Snapshot {
        Snapshot {
            tiles: self.grid.clone(),
            score: self.score,
            rng: self.rng.state(),
        }
    }

    pub fn set_state(&mut self, snapshot: Snapshot) {
        self.grid = snapshot.tiles;
        self.score = snapshot.score;
        self.rng = SimpleRng::from_state(snapshot.rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_places_initial_tiles() {
        let engine = GridEngine::with_seed(42);
        assert_eq!(engine.size(), 4);
        assert_eq!(engine.empty_cells(), 14);
        assert_eq!(engine.score(), 0);
        assert!(engine
            .tiles()
            .cells()
            .iter()
            .all(|t| *t == 0 || *t == 2 || *t == 4));
    }

    #[test]
    fn test_initial_tile_count_is_configurable() {
        let engine = GridEngine::new(GridConfig::new(3).with_initial_tiles(1)).unwrap();
        assert_eq!(engine.empty_cells(), 15);
    }

    #[test]
    fn test_initial_tiles_stop_once_grid_is_full() {
        let config = GridConfig::new(4).with_size(2).with_initial_tiles(usize::MAX);
        let engine = GridEngine::new(config).unwrap();
        assert!(engine.tiles().is_full());
    }

    #[test]
    fn test_new_rejects_bad_config() {
        assert_eq!(
            GridEngine::new(GridConfig::new(1).with_size(0)).unwrap_err(),
            GameError::InvalidSize(0)
        );
        assert_eq!(
            GridEngine::new(GridConfig::new(1).with_spawn_values(&[])).unwrap_err(),
            GameError::InvalidSpawnValues
        );
        assert_eq!(
            GridEngine::new(GridConfig::new(1).with_spawn_values(&[2, 3])).unwrap_err(),
            GameError::InvalidSpawnValues
        );
        assert_eq!(
            GridEngine::new(GridConfig::new(1).with_spawn_values(&[1])).unwrap_err(),
            GameError::InvalidSpawnValues
        );
    }

    #[test]
    fn test_one_by_one_grid() {
        let mut engine = GridEngine::new(GridConfig::new(9).with_size(1)).unwrap();
        assert!(engine.tiles().is_full());
        assert!(!engine.has_moves());
        assert_eq!(engine.play(Direction::Left), Err(GameError::IneffectiveMove));
    }

    #[test]
    fn test_place_tile_on_full_grid_is_noop() {
        let full = Grid::from_rows(&[[2, 4], [4, 2]]).unwrap();
        let mut engine = GridEngine::from_grid(full.clone(), 5);
        let rng_before = engine.get_state().rng;
        assert_eq!(engine.place_tile(), None);
        assert_eq!(engine.tiles(), full);
        assert_eq!(engine.get_state().rng, rng_before);
    }

    #[test]
    fn test_play_rejects_ineffective_move() {
        let grid = Grid::from_rows(&[[2, 0, 0, 0], [4, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]])
            .unwrap();
        let mut engine = GridEngine::from_grid(grid.clone(), 5);
        assert_eq!(engine.play(Direction::Left), Err(GameError::IneffectiveMove));
        assert_eq!(engine.tiles(), grid);
    }

    #[test]
    fn test_play_merges_scores_and_spawns() {
        let grid = Grid::from_rows(&[[2, 2, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]])
            .unwrap();
        let mut engine = GridEngine::from_grid(grid, 5);
        let report = engine.play(Direction::Left).unwrap();
        assert_eq!(report.gained, 4);
        assert_eq!(engine.score(), 4);
        assert_eq!(engine.tiles().get(0, 0), Some(4));
        assert!(report.spawned.is_some());
        assert_eq!(engine.empty_cells(), 14);
    }

    #[test]
    fn test_set_state_restores_future() {
        let mut engine = GridEngine::with_seed(77);
        let saved = engine.get_state();

        let mut a = engine.clone();
        let first = a.place_tile();

        engine.set_state(saved);
        assert_eq!(engine.place_tile(), first);
    }
}
