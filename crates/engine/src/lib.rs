//! Game session for the LED 2048 game.
//!
//! Glue between the pure grid engine (`tilt-2048-core`), the input sources
//! (`tilt-2048-input`) and the LED display (`tilt-2048-term`):
//!
//! - [`ActionDecoder`] turns stick events into moves, undo, and brightness
//! - [`BoardView`] animates the board on an LED matrix
//! - [`SessionController`] runs the play loop

pub mod decoder;
pub mod session;
pub mod view;

pub use tilt_2048_core as core;
pub use tilt_2048_input as input;
pub use tilt_2048_term as term;
pub use tilt_2048_types as types;

pub use decoder::ActionDecoder;
pub use session::{ActionOutcome, GameSummary, SessionConfig, SessionController};
pub use view::BoardView;
