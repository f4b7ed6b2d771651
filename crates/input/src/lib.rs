//! Input sources for the LED 2048 game.
//!
//! Everything that produces [`InputEvent`]s lives here:
//!
//! - [`TiltProcessor`]: turns accelerometer samples into debounced stick events
//! - [`TiltJoystick`]: runs a tilt processor on a background thread
//! - [`KeyboardJoystick`]: emulates the physical joystick from a terminal
//! - [`EventQueue`]: the shared queue both of them deliver into
//!
//! The crate has no notion of the game; mapping stick events to player
//! actions happens in the engine.

pub mod joystick;
pub mod keyboard;
pub mod map;
pub mod queue;
pub mod sensor;
pub mod tilt;

pub use tilt_2048_types as types;

pub use joystick::TiltJoystick;
pub use keyboard::{KeyTracker, KeyboardInput, KeyboardJoystick};
pub use map::{map_key, should_quit, KeyBinding};
pub use queue::{EventQueue, EventSource, Polled, ScriptedSource};
pub use sensor::{Acceleration, Accelerometer, ScriptedAccelerometer, VirtualTilt};
pub use tilt::{Tilt, TiltAxisState, TiltConfig, TiltConfigError, TiltProcessor};

pub use types::InputEvent;
