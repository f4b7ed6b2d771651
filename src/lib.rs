//! tilt-2048 (workspace facade crate).
//!
//! 2048 on an 8x8 LED matrix, played with a joystick or by tilting the
//! device. The implementation lives in dedicated crates under `crates/`;
//! this package re-exports them as `tilt_2048::{core,engine,input,term,types}`
//! and ships the `tilt-2048` and `tilt-monitor` binaries.

pub use tilt_2048_core as core;
pub use tilt_2048_engine as engine;
pub use tilt_2048_input as input;
pub use tilt_2048_term as term;
pub use tilt_2048_types as types;

/// Environment variable naming the log file for the binaries.
pub const LOG_PATH_VAR: &str = "TILT2048_LOG_PATH";

/// Environment variable that enables tilt input in the game.
pub const TILT_VAR: &str = "TILT2048_TILT";

/// Whether an environment flag is set to a truthy value (`1`, `true`, `yes`, `on`).
pub fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}
