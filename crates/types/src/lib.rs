//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (grid engine, input processing, LED rendering).
//!
//! # Board and Display
//!
//! - **Grid**: `DEFAULT_GRID_SIZE` x `DEFAULT_GRID_SIZE` tiles (4x4)
//! - **LED matrix**: `MATRIX_SIZE` x `MATRIX_SIZE` RGB pixels (8x8)
//!
//! # Timing and Tuning Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_UNDO_SIZE` | 4 | Consecutive moves that can be taken back |
//! | `JOYSTICK_HOLD_MS` | 500 | Middle-button hold time that counts as undo |
//! | `KEY_RELEASE_TIMEOUT_MS` | 650 | Synthetic release for terminals without release events |
//! | `FRAME_MS` | 16 | Delay after each animation frame (~60 FPS) |
//! | `FADE_STEPS` | 8 | Frames in a dissolve transition |
//! | `TILT_SENSITIVITY` | 0.4 | Tilt (in g) that counts as a press |
//! | `TILT_HYSTERESIS` | 0.2 | Tilt back toward level needed for a release |
//! | `TILT_DELAY_SAMPLES` | 15 | Stable samples required before an event fires |
//! | `TILT_POLL_MS` | 10 | Accelerometer sampling cadence |
//!
//! # Examples
//!
//! ```
//! use tilt_2048_types::{Direction, StickDirection, PlayerAction};
//!
//! // Parse from string (case-insensitive)
//! let parsed = Direction::from_str("Left").unwrap();
//! assert_eq!(parsed, Direction::Left);
//!
//! // Stick directions are directions plus the middle button
//! assert_eq!(StickDirection::from(Direction::Right).direction(), Some(Direction::Right));
//! assert_eq!(StickDirection::Middle.direction(), None);
//!
//! let action = PlayerAction::Move(Direction::Down);
//! assert_eq!(action.as_str(), "down");
//! ```

use std::time::Instant;

/// A single cell's value: 0 is empty, anything else is a power of two.
pub type Tile = u32;

/// Value of an empty cell.
pub const TILE_EMPTY: Tile = 0;

/// Tile value that wins the game.
pub const WINNING_TILE: Tile = 2048;

/// Default grid dimension (4x4)
pub const DEFAULT_GRID_SIZE: usize = 4;

/// Tile values a new tile is drawn from (uniformly)
pub const DEFAULT_SPAWN_VALUES: [Tile; 2] = [2, 4];

/// Tiles placed on a fresh board
pub const DEFAULT_INITIAL_TILES: usize = 2;

/// Maximum number of consecutive moves that can be reversed
pub const DEFAULT_UNDO_SIZE: usize = 4;

/// LED matrix width and height in pixels
pub const MATRIX_SIZE: usize = 8;

/// Middle-button hold duration that is treated as a long press (undo)
pub const JOYSTICK_HOLD_MS: u32 = 500;

/// Synthetic key release timeout for terminals that never report releases.
///
/// Longer than the usual keyboard auto-repeat delay, so a held key keeps
/// producing held events instead of being released between repeats.
pub const KEY_RELEASE_TIMEOUT_MS: u32 = 650;

/// Delay after each rendered animation frame (16ms ≈ 60 FPS)
pub const FRAME_MS: u32 = 16;

/// Number of frames in a dissolve transition
pub const FADE_STEPS: u32 = 8;

/// Tilt from level (in g) needed to trigger a directional press
pub const TILT_SENSITIVITY: f32 = 0.4;

/// Tilt back toward level (in g) from the press point needed to trigger a release
pub const TILT_HYSTERESIS: f32 = 0.2;

/// Consecutive identical samples required before a tilt change is accepted
pub const TILT_DELAY_SAMPLES: u32 = 15;

/// Accelerometer sampling interval in milliseconds
pub const TILT_POLL_MS: u32 = 10;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sense_hat_parity_defaults() {
        assert_eq!(DEFAULT_GRID_SIZE, 4);
        assert_eq!(DEFAULT_SPAWN_VALUES, [2, 4]);
        assert_eq!(DEFAULT_UNDO_SIZE, 4);
        assert_eq!(JOYSTICK_HOLD_MS, 500);
        assert_eq!(FADE_STEPS, 8);
        assert_eq!(TILT_DELAY_SAMPLES, 15);
        assert!(TILT_HYSTERESIS < TILT_SENSITIVITY);
        assert_eq!(MATRIX_SIZE % DEFAULT_GRID_SIZE, 0);
    }

    #[test]
    fn canonical_cell_is_a_bijection_for_every_direction() {
        let n = 5;
        for direction in Direction::ALL {
            let mut seen = vec![false; n * n];
            for line in 0..n {
                for pos in 0..n {
                    let (row, col) = direction.canonical_cell(n, line, pos);
                    assert!(row < n && col < n);
                    assert!(!seen[row * n + col], "{direction:?} maps two cells to ({row}, {col})");
                    seen[row * n + col] = true;
                }
            }
        }
    }

    #[test]
    fn canonical_position_zero_is_the_leading_edge() {
        let n = 4;
        assert_eq!(Direction::Left.canonical_cell(n, 2, 0), (2, 0));
        assert_eq!(Direction::Right.canonical_cell(n, 2, 0), (2, 3));
        assert_eq!(Direction::Up.canonical_cell(n, 2, 0), (0, 2));
        assert_eq!(Direction::Down.canonical_cell(n, 2, 0), (3, 2));
    }
}

/// The four directions tiles can be pushed in
///
/// Every grid operation is parameterized by a direction. A move toward
/// `Left` is the canonical frame; the other directions are mapped onto it
/// with [`Direction::canonical_cell`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// All directions, in a stable order
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    /// Parse direction from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tilt_2048_types::Direction;
    ///
    /// assert_eq!(Direction::from_str("up"), Some(Direction::Up));
    /// assert_eq!(Direction::from_str("RIGHT"), Some(Direction::Right));
    /// assert_eq!(Direction::from_str("middle"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "left" => Some(Direction::Left),
            "right" => Some(Direction::Right),
            "up" => Some(Direction::Up),
            "down" => Some(Direction::Down),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }

    /// Map a cell of the canonical frame back to the real grid.
    ///
    /// In the canonical frame every move is a move to the left: `line` selects
    /// a row of tiles travelling together and `pos` counts cells from the
    /// leading edge (`pos == 0` is where tiles pile up). Returns the `(row, col)`
    /// of the same cell in an `n` x `n` grid.
    ///
    /// For a fixed direction this is a bijection on the grid's cells, so
    /// gathering through it and scattering back through it are exact inverses.
    ///
    /// ```
    /// use tilt_2048_types::Direction;
    ///
    /// // Moving down, line 1 is column 1 and the leading edge is the bottom row.
    /// assert_eq!(Direction::Down.canonical_cell(4, 1, 0), (3, 1));
    /// ```
    #[inline]
    pub fn canonical_cell(&self, n: usize, line: usize, pos: usize) -> (usize, usize) {
        match self {
            Direction::Left => (line, pos),
            Direction::Right => (line, n - 1 - pos),
            Direction::Up => (pos, line),
            Direction::Down => (n - 1 - pos, line),
        }
    }
}

/// Joystick positions: the four directions plus pushing the stick in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StickDirection {
    Left,
    Right,
    Up,
    Down,
    Middle,
}

impl StickDirection {
    /// The movement direction, or `None` for the middle button
    pub fn direction(&self) -> Option<Direction> {
        match self {
            StickDirection::Left => Some(Direction::Left),
            StickDirection::Right => Some(Direction::Right),
            StickDirection::Up => Some(Direction::Up),
            StickDirection::Down => Some(Direction::Down),
            StickDirection::Middle => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StickDirection::Left => "left",
            StickDirection::Right => "right",
            StickDirection::Up => "up",
            StickDirection::Down => "down",
            StickDirection::Middle => "middle",
        }
    }
}

impl From<Direction> for StickDirection {
    fn from(value: Direction) -> Self {
        match value {
            Direction::Left => StickDirection::Left,
            Direction::Right => StickDirection::Right,
            Direction::Up => StickDirection::Up,
            Direction::Down => StickDirection::Down,
        }
    }
}

/// What happened to a stick position
///
/// - **Pressed**: the position was entered
/// - **Held**: the position is still held (repeats while held)
/// - **Released**: the position was left
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StickAction {
    Pressed,
    Held,
    Released,
}

impl StickAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            StickAction::Pressed => "pressed",
            StickAction::Held => "held",
            StickAction::Released => "released",
        }
    }
}

/// A discrete input event from the joystick or from tilt sensing.
///
/// Both sources produce the same shape so they can share one queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    pub timestamp: Instant,
    pub direction: StickDirection,
    pub action: StickAction,
}

impl InputEvent {
    pub fn new(direction: StickDirection, action: StickAction) -> Self {
        Self::at(Instant::now(), direction, action)
    }

    pub fn at(timestamp: Instant, direction: StickDirection, action: StickAction) -> Self {
        Self {
            timestamp,
            direction,
            action,
        }
    }

    pub fn pressed(direction: StickDirection) -> Self {
        Self::new(direction, StickAction::Pressed)
    }

    pub fn released(direction: StickDirection) -> Self {
        Self::new(direction, StickAction::Released)
    }
}

/// Player commands decoded from input events
///
/// - **Move**: slide the tiles in a direction
/// - **Undo**: take back the last move (long middle press)
/// - **Brightness**: toggle the low-light display mode (short middle press)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    Move(Direction),
    Undo,
    Brightness,
}

impl PlayerAction {
    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerAction::Move(direction) => direction.as_str(),
            PlayerAction::Undo => "undo",
            PlayerAction::Brightness => "brightness",
        }
    }
}
