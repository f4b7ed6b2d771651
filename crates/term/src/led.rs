//! LED matrix abstraction.
//!
//! The game only ever talks to an 8x8 RGB matrix through [`LedMatrix`]. The
//! binary drives a terminal emulation of it; tests use [`MemoryMatrix`].

use anyhow::Result;

use crate::fb::Rgb;
use crate::types::MATRIX_SIZE;

/// One full frame of the LED matrix, row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelFrame {
    pixels: [[Rgb; MATRIX_SIZE]; MATRIX_SIZE],
}

impl PixelFrame {
    /// All pixels off.
    pub const fn blank() -> Self {
        Self {
            pixels: [[Rgb::BLACK; MATRIX_SIZE]; MATRIX_SIZE],
        }
    }

    pub fn filled(colour: Rgb) -> Self {
        Self {
            pixels: [[colour; MATRIX_SIZE]; MATRIX_SIZE],
        }
    }

    pub fn get(&self, row: usize, col: usize) -> Rgb {
        self.pixels[row][col]
    }

    pub fn set(&mut self, row: usize, col: usize, colour: Rgb) {
        self.pixels[row][col] = colour;
    }

    pub fn rows(&self) -> &[[Rgb; MATRIX_SIZE]; MATRIX_SIZE] {
        &self.pixels
    }

    pub fn swap(&mut self, a: (usize, usize), b: (usize, usize)) {
        let tmp = self.pixels[a.0][a.1];
        self.pixels[a.0][a.1] = self.pixels[b.0][b.1];
        self.pixels[b.0][b.1] = tmp;
    }

    /// Every pixel's colour inverted.
    pub fn inverted(&self) -> Self {
        self.map(|c| c.inverted())
    }

    /// Pixel-wise linear blend toward `to`.
    pub fn blend(&self, to: &PixelFrame, opacity: f32) -> Self {
        let mut out = *self;
        for row in 0..MATRIX_SIZE {
            for col in 0..MATRIX_SIZE {
                out.pixels[row][col] = self.pixels[row][col].lerp(to.pixels[row][col], opacity);
            }
        }
        out
    }

    pub fn map(&self, f: impl Fn(Rgb) -> Rgb) -> Self {
        let mut out = *self;
        for row in out.pixels.iter_mut() {
            for px in row.iter_mut() {
                *px = f(*px);
            }
        }
        out
    }

    pub fn lit_count(&self) -> usize {
        self.pixels
            .iter()
            .flatten()
            .filter(|px| !px.is_black())
            .count()
    }
}

impl Default for PixelFrame {
    fn default() -> Self {
        Self::blank()
    }
}

/// Sink for rendered frames, modelled on an 8x8 LED add-on board.
pub trait LedMatrix {
    /// Replace the whole display.
    fn set_pixels(&mut self, frame: &PixelFrame) -> Result<()>;

    /// The frame currently displayed, before any low-light dimming.
    fn pixels(&self) -> PixelFrame;

    fn low_light(&self) -> bool;

    fn set_low_light(&mut self, enabled: bool) -> Result<()>;

    /// Show a one-off message (scrolling text on real hardware).
    fn show_message(&mut self, text: &str, colour: Rgb) -> Result<()>;

    /// Update the status line (the console on real hardware).
    fn show_status(&mut self, text: &str) -> Result<()>;

    /// Repaint if the output surface changed underneath the current frame.
    fn refresh(&mut self) -> Result<()> {
        Ok(())
    }

    /// Set a single pixel, keeping the rest of the frame.
    fn set_pixel(&mut self, row: usize, col: usize, colour: Rgb) -> Result<()> {
        let mut frame = self.pixels();
        frame.set(row, col, colour);
        self.set_pixels(&frame)
    }
}

/// In-memory matrix that records what was shown.
#[derive(Debug, Clone, Default)]
pub struct MemoryMatrix {
    frame: PixelFrame,
    low_light: bool,
    frames_drawn: usize,
    refreshes: usize,
    messages: Vec<(String, Rgb)>,
    statuses: Vec<String>,
}

impl MemoryMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames_drawn(&self) -> usize {
        self.frames_drawn
    }

    pub fn refreshes(&self) -> usize {
        self.refreshes
    }

    pub fn messages(&self) -> &[(String, Rgb)] {
        &self.messages
    }

    pub fn statuses(&self) -> &[String] {
        &self.statuses
    }

    pub fn last_status(&self) -> Option<&str> {
        self.statuses.last().map(String::as_str)
    }
}

impl LedMatrix for MemoryMatrix {
    fn set_pixels(&mut self, frame: &PixelFrame) -> Result<()> {
        self.frame = *frame;
        self.frames_drawn += 1;
        Ok(())
    }

    fn pixels(&self) -> PixelFrame {
        self.frame
    }

    fn low_light(&self) -> bool {
        self.low_light
    }

    fn set_low_light(&mut self, enabled: bool) -> Result<()> {
        self.low_light = enabled;
        Ok(())
    }

    fn show_message(&mut self, text: &str, colour: Rgb) -> Result<()> {
        self.messages.push((text.to_string(), colour));
        Ok(())
    }

    fn show_status(&mut self, text: &str) -> Result<()> {
        self.statuses.push(text.to_string());
        Ok(())
    }

    fn refresh(&mut self) -> Result<()> {
        self.refreshes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverted_blank_is_white() {
        let frame = PixelFrame::blank().inverted();
        assert_eq!(frame, PixelFrame::filled(Rgb::WHITE));
        assert_eq!(frame.lit_count(), MATRIX_SIZE * MATRIX_SIZE);
    }

    #[test]
    fn test_blend_full_opacity_reaches_target() {
        let mut target = PixelFrame::blank();
        target.set(3, 4, Rgb::new(255, 127, 0));
        let out = PixelFrame::filled(Rgb::WHITE).blend(&target, 1.0);
        assert_eq!(out, target);
    }

    #[test]
    fn test_memory_matrix_set_pixel_counts_frames() {
        let mut m = MemoryMatrix::new();
        m.set_pixel(0, 7, Rgb::WHITE).unwrap();
        assert_eq!(m.pixels().get(0, 7), Rgb::WHITE);
        assert_eq!(m.frames_drawn(), 1);
        m.show_status("score 4").unwrap();
        assert_eq!(m.last_status(), Some("score 4"));
    }
}
