//! Core game logic module - pure, deterministic, and testable
//!
//! This module contains all the rules of the tile-merging game. It has
//! **zero dependencies** on rendering, input, threads, or I/O, making it:
//!
//! - **Deterministic**: Same seed produces identical games
//! - **Reversible**: Snapshots capture the random source, so undo replays the same future
//! - **Testable**: Every rule is a plain function of the grid
//!
//! # Module Structure
//!
//! - [`grid`]: N x N tile matrix with directional shift and merge
//! - [`engine`]: Grid + score + RNG; spawning, moves, game-over check, snapshots
//! - [`history`]: Bounded undo stack
//! - [`rng`]: Seeded LCG with capturable state
//! - [`snapshot`]: Restorable engine state
//! - [`error`]: Recoverable game errors
//!
//! # Game Rules
//!
//! - **Move**: `shift`, `merge`, `shift`, then one new tile if anything changed
//! - **Merge**: equal neighbours combine once per move, leading pair first
//! - **Score**: sum of every tile created by merging
//! - **Game over**: no empty cell and no equal neighbours
//!
//! # Example
//!
//! ```
//! use tilt_2048_core::{GridEngine, UndoHistory};
//! use tilt_2048_types::Direction;
//!
//! let mut engine = GridEngine::with_seed(12345);
//! let mut history = UndoHistory::default();
//!
//! let before = engine.get_state();
//! if engine.play(Direction::Left).is_ok() {
//!     history.push(before);
//! }
//!
//! // Take it back.
//! if let Ok(snapshot) = history.pop() {
//!     engine.set_state(snapshot);
//! }
//! assert!(engine.has_moves());
//! ```

pub mod engine;
pub mod error;
pub mod grid;
pub mod history;
pub mod rng;
pub mod snapshot;

pub use tilt_2048_types as types;

// Re-export commonly used types for convenience
pub use engine::{GridConfig, GridEngine, MoveReport, PlacedTile, SlideResult};
pub use error::GameError;
pub use grid::Grid;
pub use history::UndoHistory;
pub use rng::{RngState, SimpleRng};
pub use snapshot::Snapshot;
