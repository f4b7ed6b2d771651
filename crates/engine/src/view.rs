//! Board animations on an LED matrix.
//!
//! [`BoardView`] owns the tile [`Palette`] and the frame pacing. Every
//! animation is a sequence of whole frames pushed to the matrix with a fixed
//! delay between them; a zero delay renders the same frames without sleeping.

use std::thread;
use std::time::Duration;

use anyhow::Result;

use crate::core::{Grid, SimpleRng};
use crate::term::effects::{dot_order, fade_frames, slide_frames, unchanged_tiles};
use crate::term::{LedMatrix, Palette, PixelFrame, Rgb};
use crate::types::Direction;

pub struct BoardView {
    palette: Palette,
    frame_delay: Duration,
    fade_steps: u32,
    rng: SimpleRng,
    /// Grid most recently put on screen, redrawn when the palette animates.
    shown: Option<Grid>,
}

impl BoardView {
    pub fn new(frame_delay: Duration, fade_steps: u32, seed: u32) -> Self {
        Self {
            palette: Palette::new(),
            frame_delay,
            fade_steps,
            rng: SimpleRng::new(seed),
            shown: None,
        }
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn frame_delay(&self) -> Duration {
        self.frame_delay
    }

    fn pause(&self) {
        if !self.frame_delay.is_zero() {
            thread::sleep(self.frame_delay);
        }
    }

    /// Sleep for `frames` frame delays.
    pub fn wait_frames(&self, frames: u32) {
        if !self.frame_delay.is_zero() {
            thread::sleep(self.frame_delay * frames);
        }
    }

    fn draw(&self, matrix: &mut impl LedMatrix, frame: &PixelFrame) -> Result<()> {
        matrix.set_pixels(frame)?;
        self.pause();
        Ok(())
    }

    /// Dissolve from whatever is displayed to `target`.
    pub fn fade_to(&self, matrix: &mut impl LedMatrix, target: &PixelFrame) -> Result<()> {
        for frame in fade_frames(&matrix.pixels(), target, self.fade_steps) {
            self.draw(matrix, &frame)?;
        }
        Ok(())
    }

    pub fn show_board(&mut self, matrix: &mut impl LedMatrix, grid: &Grid) -> Result<()> {
        let target = self.palette.render(grid);
        self.shown = Some(grid.clone());
        self.fade_to(matrix, &target)
    }

    /// Slide the displayed pixels toward `direction` until they settle.
    ///
    /// Only the display moves; the engine performs its own shift.
    pub fn animate_shift(&self, matrix: &mut impl LedMatrix, direction: Direction) -> Result<()> {
        for frame in slide_frames(&matrix.pixels(), direction) {
            self.draw(matrix, &frame)?;
        }
        Ok(())
    }

    /// Fade out the tiles that differ between `old` and `new`, then fade in `new`.
    pub fn animate_changed(
        &mut self,
        matrix: &mut impl LedMatrix,
        old: &Grid,
        new: &Grid,
    ) -> Result<()> {
        let faded = self.palette.render(&unchanged_tiles(old, new));
        self.fade_to(matrix, &faded)?;
        self.show_board(matrix, new)
    }

    /// Invert the display and back, `times` times.
    pub fn flash(&self, matrix: &mut impl LedMatrix, times: u32) -> Result<()> {
        for _ in 0..times * 2 {
            let inverted = matrix.pixels().inverted();
            self.fade_to(matrix, &inverted)?;
        }
        Ok(())
    }

    /// Switch every pixel off one at a time, in random order.
    pub fn fade_dots(&mut self, matrix: &mut impl LedMatrix) -> Result<()> {
        for (row, col) in dot_order(&mut self.rng) {
            matrix.set_pixel(row, col, Rgb::BLACK)?;
            self.pause();
        }
        self.shown = None;
        Ok(())
    }

    /// Advance the palette; redraw if the shown board has animated tiles.
    ///
    /// Also gives the matrix a chance to repaint after a resize.
    pub fn tick(&mut self, matrix: &mut impl LedMatrix) -> Result<()> {
        matrix.refresh()?;
        self.palette.tick();
        if let Some(grid) = &self.shown {
            if self.palette.is_animated(grid) {
                matrix.set_pixels(&self.palette.render(grid))?;
            }
        }
        Ok(())
    }
}
