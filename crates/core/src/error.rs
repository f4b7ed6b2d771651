//! Game errors.
//!
//! Every variant is recoverable: the session controller turns each one into a
//! rejected action (a screen flash) rather than aborting the game.

/// Errors raised by the grid engine and undo history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// Undo was requested but no snapshot is stored.
    EmptyHistory,
    /// Shift and merge left the grid unchanged.
    IneffectiveMove,
    /// A grid must be at least 1x1.
    InvalidSize(usize),
    /// Spawn values must be non-empty powers of two, each at least 2.
    InvalidSpawnValues,
}

impl std::fmt::Display for GameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyHistory => write!(f, "nothing to undo"),
            Self::IneffectiveMove => write!(f, "move does not change the board"),
            Self::InvalidSize(size) => write!(f, "invalid grid size: {size}"),
            Self::InvalidSpawnValues => {
                write!(f, "spawn values must be non-empty powers of two >= 2")
            }
        }
    }
}

impl std::error::Error for GameError {}
