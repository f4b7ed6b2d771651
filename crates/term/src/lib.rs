//! Display layer: an 8x8 RGB LED matrix and what gets drawn on it.
//!
//! - [`led`]: the [`LedMatrix`] sink trait and its in-memory implementation
//! - [`palette`]: tile colours and scaling a grid onto the matrix
//! - [`effects`]: pure frame effects (dissolve, slide, dot fade)
//! - [`matrix`]: terminal emulation of the matrix, drawn through a diffing
//!   framebuffer renderer so 60 FPS animations stay cheap
//!
//! Everything except [`matrix`] and [`renderer`] is pure and unit-tested.

pub mod effects;
pub mod fb;
pub mod led;
pub mod matrix;
pub mod matrix_view;
pub mod palette;
pub mod renderer;

pub use tilt_2048_core as core;
pub use tilt_2048_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use led::{LedMatrix, MemoryMatrix, PixelFrame};
pub use matrix::TerminalMatrix;
pub use matrix_view::{MatrixText, MatrixView, Viewport};
pub use palette::{tile_colour, Palette};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
