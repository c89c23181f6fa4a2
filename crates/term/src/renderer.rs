//! TerminalRenderer: flushes a framebuffer to a real terminal.
//!
//! Frames are diffed cell by cell against the previous one. A [`Painter`]
//! tracks the terminal cursor and the active style, so neighbouring changed
//! cells share one cursor move and a style is only sent when it changes.

use std::io::{self, Write};

use anyhow::Result;

use crossterm::{
    cursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, QueueableCommand,
};

use crate::fb::{Cell, CellStyle, FrameBuffer, Rgb};

pub struct TerminalRenderer {
    stdout: io::Stdout,
    last: Option<FrameBuffer>,
    buf: Vec<u8>,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            last: None,
            buf: Vec::with_capacity(64 * 1024),
        }
    }

    /// Raw mode, alternate screen and mouse capture.
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.buf.clear();
        self.buf
            .queue(terminal::EnterAlternateScreen)?
            .queue(EnableMouseCapture)?
            .queue(cursor::Hide)?
            .queue(terminal::DisableLineWrap)?;
        self.flush_buf()
    }

    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        self.buf
            .queue(ResetColor)?
            .queue(SetAttribute(Attribute::Reset))?
            .queue(terminal::EnableLineWrap)?
            .queue(cursor::Show)?
            .queue(DisableMouseCapture)?
            .queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Next draw repaints everything (after a resize).
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    pub fn bell(&mut self) -> Result<()> {
        self.buf.clear();
        self.buf.queue(Print('\x07'))?;
        self.flush_buf()
    }

    /// Draw `fb` and keep it as the diff base for the next frame.
    ///
    /// On return `fb` holds the previous frame's buffer, ready to be rendered
    /// into again, so no frame is ever cloned.
    pub fn draw_swap(&mut self, fb: &mut FrameBuffer) -> Result<()> {
        self.buf.clear();
        let mut base = match self.last.take() {
            Some(prev) => {
                encode_diff_into(&prev, fb, &mut self.buf)?;
                prev
            }
            None => {
                encode_full_into(fb, &mut self.buf)?;
                FrameBuffer::new(fb.width(), fb.height())
            }
        };
        self.flush_buf()?;

        base.resize(fb.width(), fb.height());
        std::mem::swap(&mut base, fb);
        self.last = Some(base);
        Ok(())
    }

    fn flush_buf(&mut self) -> Result<()> {
        self.stdout.write_all(&self.buf)?;
        self.stdout.flush()?;
        Ok(())
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Clear the screen and encode every cell of `fb` into `out`.
pub fn encode_full_into(fb: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    let mut painter = Painter::new(out);
    for (y, row) in rows(fb).enumerate() {
        for (x, cell) in row.iter().enumerate() {
            painter.cell(x as u16, y as u16, *cell)?;
        }
    }
    painter.finish()
}

/// Encode the cells of `next` that differ from `prev` into `out`.
///
/// Frames of different sizes fall back to a full redraw.
pub fn encode_diff_into(prev: &FrameBuffer, next: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    if prev.width() != next.width() || prev.height() != next.height() {
        return encode_full_into(next, out);
    }

    let mut painter = Painter::new(out);
    for (y, (old, new)) in rows(prev).zip(rows(next)).enumerate() {
        for (x, (a, b)) in old.iter().zip(new).enumerate() {
            if a != b {
                painter.cell(x as u16, y as u16, *b)?;
            }
        }
    }
    painter.finish()
}

fn rows(fb: &FrameBuffer) -> impl Iterator<Item = &[Cell]> {
    // chunks(0) panics; a zero-width frame has no rows to visit.
    fb.cells().chunks(usize::from(fb.width()).max(1))
}

/// Writes cells, sending only the cursor moves and style changes needed.
struct Painter<'a> {
    out: &'a mut Vec<u8>,
    style: Option<CellStyle>,
    cursor: Option<(u16, u16)>,
}

impl<'a> Painter<'a> {
    fn new(out: &'a mut Vec<u8>) -> Self {
        Self {
            out,
            style: None,
            cursor: None,
        }
    }

    fn cell(&mut self, x: u16, y: u16, cell: Cell) -> Result<()> {
        if self.cursor != Some((x, y)) {
            self.out.queue(cursor::MoveTo(x, y))?;
        }
        self.set_style(cell.style)?;
        self.out.queue(Print(cell.ch))?;
        self.cursor = Some((x.saturating_add(1), y));
        Ok(())
    }

    fn set_style(&mut self, next: CellStyle) -> Result<()> {
        let prev = self.style;
        if prev == Some(next) {
            return Ok(());
        }

        // SGR reset also clears colors, so both are re-sent after it.
        let attrs_changed = prev.map_or(true, |p| p.bold != next.bold || p.dim != next.dim);
        if attrs_changed {
            self.out.queue(SetAttribute(Attribute::Reset))?;
            if next.bold {
                self.out.queue(SetAttribute(Attribute::Bold))?;
            }
            if next.dim {
                self.out.queue(SetAttribute(Attribute::Dim))?;
            }
        }
        if attrs_changed || prev.map(|p| p.fg) != Some(next.fg) {
            self.out.queue(SetForegroundColor(color(next.fg)))?;
        }
        if attrs_changed || prev.map(|p| p.bg) != Some(next.bg) {
            self.out.queue(SetBackgroundColor(color(next.bg)))?;
        }

        self.style = Some(next);
        Ok(())
    }

    fn finish(mut self) -> Result<()> {
        self.out
            .queue(ResetColor)?
            .queue(SetAttribute(Attribute::Reset))?;
        Ok(())
    }
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}
