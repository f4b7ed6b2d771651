//! Terminal emulation of the LED matrix.

use anyhow::Result;
use crossterm::terminal;

use crate::fb::{FrameBuffer, Rgb};
use crate::led::{LedMatrix, PixelFrame};
use crate::matrix_view::{MatrixText, MatrixView, Viewport};
use crate::renderer::TerminalRenderer;

/// Key reference shown under the matrix.
pub const HELP_TEXT: &str =
    "arrows/hjkl move  enter tap=light hold=undo  u undo  wasd tilt  q quit";

/// An [`LedMatrix`] drawn in the terminal.
///
/// Owns the terminal while alive: [`enter`](Self::enter) switches to raw mode
/// and the alternate screen, [`exit`](Self::exit) (or drop) restores it.
pub struct TerminalMatrix {
    renderer: TerminalRenderer,
    view: MatrixView,
    fb: FrameBuffer,
    frame: PixelFrame,
    low_light: bool,
    status: String,
    message: Option<(String, Rgb)>,
    help: &'static str,
    size: Option<(u16, u16)>,
    active: bool,
}

impl TerminalMatrix {
    pub fn enter() -> Result<Self> {
        let mut renderer = TerminalRenderer::new();
        renderer.enter()?;
        let mut matrix = Self {
            renderer,
            view: MatrixView::default(),
            fb: FrameBuffer::new(0, 0),
            frame: PixelFrame::blank(),
            low_light: false,
            status: String::new(),
            message: None,
            help: HELP_TEXT,
            size: None,
            active: true,
        };
        matrix.redraw()?;
        Ok(matrix)
    }

    /// Whether key releases are reported by the terminal.
    pub fn key_release_events(&self) -> bool {
        self.renderer.key_release_events()
    }

    pub fn exit(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        self.renderer.exit()
    }

    fn terminal_size(&self) -> (u16, u16) {
        let (min_w, min_h) = self.view.frame_size();
        terminal::size().unwrap_or((min_w, min_h + 3))
    }

    fn redraw(&mut self) -> Result<()> {
        let text = MatrixText {
            status: &self.status,
            message: self.message.as_ref().map(|(m, c)| (m.as_str(), *c)),
            help: self.help,
        };
        let (w, h) = self.terminal_size();
        self.size = Some((w, h));
        let viewport = Viewport::new(w, h);
        self.view
            .render_into(&self.frame, self.low_light, text, viewport, &mut self.fb);
        self.renderer.draw_swap(&mut self.fb)
    }
}

impl LedMatrix for TerminalMatrix {
    fn set_pixels(&mut self, frame: &PixelFrame) -> Result<()> {
        self.frame = *frame;
        self.redraw()
    }

    fn pixels(&self) -> PixelFrame {
        self.frame
    }

    fn low_light(&self) -> bool {
        self.low_light
    }

    fn set_low_light(&mut self, enabled: bool) -> Result<()> {
        self.low_light = enabled;
        self.redraw()
    }

    /// The message stays up until the next status update.
    fn show_message(&mut self, text: &str, colour: Rgb) -> Result<()> {
        self.message = Some((text.to_string(), colour));
        self.redraw()
    }

    fn show_status(&mut self, text: &str) -> Result<()> {
        self.status.clear();
        self.status.push_str(text);
        self.message = None;
        self.redraw()
    }

    /// A resized terminal keeps stale cells around; repaint it from scratch.
    fn refresh(&mut self) -> Result<()> {
        if self.size == Some(self.terminal_size()) {
            return Ok(());
        }
        self.renderer.invalidate();
        self.redraw()
    }
}

impl Drop for TerminalMatrix {
    fn drop(&mut self) {
        let _ = self.exit();
    }
}
