//! MatrixView: lays out an emulated LED matrix in a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::led::PixelFrame;
use crate::types::MATRIX_SIZE;

/// Colour of an unlit LED, so the matrix stays visible when the board is empty.
const UNLIT: Rgb = Rgb::new(24, 24, 28);
const HOUSING: Rgb = Rgb::new(10, 10, 12);

/// Low-light mode divides every channel by this.
pub const LOW_LIGHT_DIVISOR: u16 = 3;

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Everything shown on screen besides the pixels.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatrixText<'a> {
    pub status: &'a str,
    pub message: Option<(&'a str, Rgb)>,
    pub help: &'a str,
}

pub struct MatrixView {
    /// Terminal columns per LED.
    led_w: u16,
}

impl Default for MatrixView {
    fn default() -> Self {
        // Two columns per LED keeps pixels roughly square.
        Self { led_w: 2 }
    }
}

impl MatrixView {
    pub fn new(led_w: u16) -> Self {
        Self { led_w: led_w.max(1) }
    }

    /// Width and height of the bordered matrix in cells.
    pub fn frame_size(&self) -> (u16, u16) {
        (MATRIX_SIZE as u16 * self.led_w + 2, MATRIX_SIZE as u16 + 2)
    }

    /// Colour actually emitted by an LED.
    pub fn led_colour(colour: Rgb, low_light: bool) -> Rgb {
        if low_light {
            colour.scale(1, LOW_LIGHT_DIVISOR)
        } else {
            colour
        }
    }

    pub fn render_into(
        &self,
        pixels: &PixelFrame,
        low_light: bool,
        text: MatrixText<'_>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().into_cell(' '));

        let (frame_w, frame_h) = self.frame_size();
        let start_x = viewport.width.saturating_sub(frame_w) / 2;
        let start_y = viewport.height.saturating_sub(frame_h + 3) / 2;

        let border = CellStyle {
            fg: Rgb::new(120, 120, 130),
            bg: Rgb::BLACK,
            bold: false,
            dim: false,
        };
        draw_border(fb, start_x, start_y, frame_w, frame_h, border);

        for (row, line) in pixels.rows().iter().enumerate() {
            for (col, &colour) in line.iter().enumerate() {
                let fg = if colour.is_black() {
                    UNLIT
                } else {
                    Self::led_colour(colour, low_light)
                };
                let style = CellStyle {
                    fg,
                    bg: HOUSING,
                    bold: false,
                    dim: false,
                };
                let x = start_x + 1 + col as u16 * self.led_w;
                let y = start_y + 1 + row as u16;
                fb.fill_rect(x, y, self.led_w, 1, '█', style);
            }
        }

        let mut y = start_y + frame_h;
        let status = CellStyle {
            bold: true,
            ..CellStyle::default()
        };
        fb.put_str(start_x, y, text.status, status);
        y = y.saturating_add(1);

        if let Some((message, colour)) = text.message {
            let style = CellStyle {
                fg: if colour.is_black() { Rgb::WHITE } else { colour },
                bg: Rgb::BLACK,
                bold: true,
                dim: false,
            };
            fb.put_str(start_x, y, message, style);
        }
        y = y.saturating_add(1);

        let help = CellStyle {
            dim: true,
            ..CellStyle::default()
        };
        fb.put_str(start_x, y, text.help, help);
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(
        &self,
        pixels: &PixelFrame,
        low_light: bool,
        text: MatrixText<'_>,
        viewport: Viewport,
    ) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(pixels, low_light, text, viewport, &mut fb);
        fb
    }
}

fn draw_border(fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: CellStyle) {
    if w < 2 || h < 2 {
        return;
    }

    fb.put_char(x, y, '┌', style);
    fb.put_char(x + w - 1, y, '┐', style);
    fb.put_char(x, y + h - 1, '└', style);
    fb.put_char(x + w - 1, y + h - 1, '┘', style);

    for dx in 1..w - 1 {
        fb.put_char(x + dx, y, '─', style);
        fb.put_char(x + dx, y + h - 1, '─', style);
    }
    for dy in 1..h - 1 {
        fb.put_char(x, y + dy, '│', style);
        fb.put_char(x + w - 1, y + dy, '│', style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        let (w, h) = MatrixView::default().frame_size();
        Viewport::new(w, h + 3)
    }

    #[test]
    fn test_pixels_land_inside_border() {
        let mut pixels = PixelFrame::blank();
        pixels.set(0, 0, Rgb::WHITE);
        pixels.set(7, 7, Rgb::new(255, 0, 0));
        let fb = MatrixView::default().render(&pixels, false, MatrixText::default(), viewport());

        assert_eq!(fb.get(0, 0).map(|c| c.ch), Some('┌'));
        let top_left = fb.get(1, 1).unwrap();
        assert_eq!(top_left.ch, '█');
        assert_eq!(top_left.style.fg, Rgb::WHITE);
        assert_eq!(fb.get(2, 1).unwrap().style.fg, Rgb::WHITE);
        assert_eq!(fb.get(3, 1).unwrap().style.fg, UNLIT);
        assert_eq!(fb.get(15, 8).unwrap().style.fg, Rgb::new(255, 0, 0));
    }

    #[test]
    fn test_low_light_dims_lit_pixels() {
        let pixels = PixelFrame::filled(Rgb::new(255, 255, 0));
        let fb = MatrixView::default().render(&pixels, true, MatrixText::default(), viewport());
        assert_eq!(fb.get(1, 1).unwrap().style.fg, Rgb::new(85, 85, 0));
    }

    #[test]
    fn test_text_lines_below_matrix() {
        let text = MatrixText {
            status: "Score: 12",
            message: Some(("Best tile: 8", Rgb::new(255, 127, 0))),
            help: "q quit",
        };
        let fb = MatrixView::default().render(&PixelFrame::blank(), false, text, viewport());
        assert!(fb.row_text(10).starts_with("Score: 12"));
        assert!(fb.row_text(11).starts_with("Best tile: 8"));
        assert_eq!(fb.get(0, 11).unwrap().style.fg, Rgb::new(255, 127, 0));
        assert!(fb.row_text(12).starts_with("q quit"));
    }
}
