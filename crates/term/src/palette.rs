//! Tile colours and board rendering.
//!
//! Every tile value has a fixed colour. Tiles beyond the winning tile also
//! pulse: their brightness follows the palette's frame counter, which the
//! play loop advances with [`Palette::tick`].

use crate::core::Grid;
use crate::fb::Rgb;
use crate::led::PixelFrame;
use crate::types::{Tile, MATRIX_SIZE, TILE_EMPTY, WINNING_TILE};

/// Colour for a value missing from the table. Should never be displayed.
pub const UNKNOWN_TILE_COLOUR: Rgb = Rgb::new(255, 127, 127);

/// Ticks in one full pulse cycle.
pub const PULSE_PERIOD: u32 = 32;

/// Dimmest pulse level, out of 255.
const PULSE_FLOOR: u32 = 96;

const TILE_COLOURS: [(Tile, Rgb); 18] = [
    (TILE_EMPTY, Rgb::new(0, 0, 0)),
    (2, Rgb::new(255, 255, 255)),
    (4, Rgb::new(255, 255, 0)),
    (8, Rgb::new(255, 127, 0)),
    (16, Rgb::new(255, 0, 0)),
    (32, Rgb::new(255, 0, 191)),
    (64, Rgb::new(127, 0, 255)),
    (128, Rgb::new(0, 0, 191)),
    (256, Rgb::new(0, 127, 255)),
    (512, Rgb::new(0, 255, 255)),
    (1024, Rgb::new(0, 255, 0)),
    (2048, Rgb::new(0, 95, 0)),
    (4096, Rgb::new(0, 95, 95)),
    (8192, Rgb::new(0, 0, 95)),
    (16384, Rgb::new(95, 0, 95)),
    (32768, Rgb::new(95, 0, 0)),
    (65536, Rgb::new(95, 95, 0)),
    (131072, Rgb::new(95, 95, 95)),
];

/// Static colour of a tile value.
pub fn tile_colour(tile: Tile) -> Rgb {
    TILE_COLOURS
        .iter()
        .find(|(value, _)| *value == tile)
        .map(|(_, colour)| *colour)
        .unwrap_or(UNKNOWN_TILE_COLOUR)
}

/// Tile value shown at an LED pixel when an `n` x `n` grid is scaled to the matrix.
#[inline]
pub fn tile_at_pixel(grid: &Grid, row: usize, col: usize) -> Tile {
    let n = grid.size();
    grid.get(row * n / MATRIX_SIZE, col * n / MATRIX_SIZE)
        .unwrap_or(TILE_EMPTY)
}

/// Animated tile colours.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Palette {
    frame: u32,
}

impl Palette {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the animation by one frame.
    pub fn tick(&mut self) {
        self.frame = self.frame.wrapping_add(1);
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// Pulse brightness for the current frame, in `PULSE_FLOOR..=255`.
    pub fn pulse_level(&self) -> u8 {
        let half = PULSE_PERIOD / 2;
        let phase = self.frame % PULSE_PERIOD;
        // Triangle wave: up for half a period, down for the other half.
        let rising = if phase < half { phase } else { PULSE_PERIOD - phase };
        (PULSE_FLOOR + (255 - PULSE_FLOOR) * rising / half) as u8
    }

    /// Colour of a tile value at the current frame.
    pub fn colour(&self, tile: Tile) -> Rgb {
        let base = tile_colour(tile);
        if tile > WINNING_TILE {
            base.scale(self.pulse_level() as u16, 255)
        } else {
            base
        }
    }

    /// Whether a grid contains anything that changes with [`tick`](Self::tick).
    pub fn is_animated(&self, grid: &Grid) -> bool {
        grid.max_tile() > WINNING_TILE
    }

    /// Render a grid scaled up to the LED matrix.
    pub fn render(&self, grid: &Grid) -> PixelFrame {
        let mut frame = PixelFrame::blank();
        for row in 0..MATRIX_SIZE {
            for col in 0..MATRIX_SIZE {
                frame.set(row, col, self.colour(tile_at_pixel(grid, row, col)));
            }
        }
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_and_unknown_colours() {
        assert_eq!(tile_colour(TILE_EMPTY), Rgb::BLACK);
        assert_eq!(tile_colour(2), Rgb::WHITE);
        assert_eq!(tile_colour(2048), Rgb::new(0, 95, 0));
        assert_eq!(tile_colour(3), UNKNOWN_TILE_COLOUR);
    }

    #[test]
    fn test_render_scales_each_tile_to_a_block() {
        let grid = Grid::from_rows(&[[2, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 4]])
            .unwrap();
        let frame = Palette::new().render(&grid);
        for (row, col) in [(0, 0), (0, 1), (1, 0), (1, 1)] {
            assert_eq!(frame.get(row, col), Rgb::WHITE);
        }
        assert_eq!(frame.get(0, 2), Rgb::BLACK);
        assert_eq!(frame.get(7, 7), tile_colour(4));
        assert_eq!(frame.lit_count(), 8);
    }

    #[test]
    fn test_pulse_only_affects_tiles_beyond_winning() {
        let mut palette = Palette::new();
        assert_eq!(palette.pulse_level(), PULSE_FLOOR as u8);
        for _ in 0..PULSE_PERIOD / 2 {
            palette.tick();
        }
        assert_eq!(palette.pulse_level(), 255);
        assert_eq!(palette.colour(4096), tile_colour(4096));

        palette.tick();
        assert_ne!(palette.colour(4096), tile_colour(4096));
        assert_eq!(palette.colour(2048), tile_colour(2048));
    }

    #[test]
    fn test_is_animated() {
        let palette = Palette::new();
        let calm = Grid::from_rows(&[[2048, 0], [0, 0]]).unwrap();
        let busy = Grid::from_rows(&[[4096, 0], [0, 0]]).unwrap();
        assert!(!palette.is_animated(&calm));
        assert!(palette.is_animated(&busy));
    }
}
