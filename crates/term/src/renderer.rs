//! TerminalRenderer: flushes a framebuffer to a real terminal.
//!
//! The renderer remembers the last frame it flushed. Each new frame is compared
//! row by row and only the runs of changed cells are written; a size change or
//! an explicit [`TerminalRenderer::invalidate`] forces a full redraw.

use std::io::{self, Write};

use anyhow::{Context, Result};

use crossterm::{
    cursor,
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

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            last: None,
            buf: Vec::with_capacity(16 * 1024),
        }
    }

    /// Switch to raw mode on the alternate screen.
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode().context("failed to enable raw mode")?;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        self.flush_buf()
    }

    /// Restore the terminal. Safe to call after a failed `enter`.
    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        self.buf.queue(ResetColor)?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf()?;
        terminal::disable_raw_mode().context("failed to disable raw mode")?;
        self.last = None;
        Ok(())
    }

    /// Force the next draw to be a full redraw (e.g. on resize).
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    /// Draw a frame, writing only what changed since the previous one.
    pub fn draw(&mut self, fb: &FrameBuffer) -> Result<()> {
        self.buf.clear();
        encode_frame_into(self.last.as_ref(), fb, &mut self.buf)?;
        if !self.buf.is_empty() {
            self.flush_buf()?;
        }

        match &mut self.last {
            Some(last) => last.clone_from(fb),
            None => self.last = Some(fb.clone()),
        }
        Ok(())
    }

    fn flush_buf(&mut self) -> Result<()> {
        self.stdout
            .write_all(&self.buf)
            .and_then(|_| self.stdout.flush())
            .context("failed to write to terminal")
    }
}

/// Encode `next` into `out` as terminal commands.
///
/// With a same-sized `prev` only changed runs are emitted, and nothing at all
/// when the frames are equal. Otherwise the screen is cleared and redrawn.
pub fn encode_frame_into(
    prev: Option<&FrameBuffer>,
    next: &FrameBuffer,
    out: &mut Vec<u8>,
) -> Result<()> {
    let prev = prev.filter(|p| p.width() == next.width() && p.height() == next.height());

    let mut style: Option<CellStyle> = None;
    match prev {
        Some(prev) => {
            for y in 0..next.height() {
                let (Some(old), Some(new)) = (prev.row(y), next.row(y)) else {
                    continue;
                };
                for (start, run) in changed_runs(old, new) {
                    out.queue(cursor::MoveTo(start as u16, y))?;
                    write_cells(out, run, &mut style)?;
                }
            }
        }
        None => {
            out.queue(terminal::Clear(terminal::ClearType::All))?;
            for y in 0..next.height() {
                if let Some(row) = next.row(y) {
                    out.queue(cursor::MoveTo(0, y))?;
                    write_cells(out, row, &mut style)?;
                }
            }
        }
    }

    if style.is_some() {
        out.queue(ResetColor)?;
        out.queue(SetAttribute(Attribute::Reset))?;
    }
    Ok(())
}

/// Maximal runs of cells that differ between two equally long rows, as
/// `(start column, new cells)`.
fn changed_runs<'a>(old: &'a [Cell], new: &'a [Cell]) -> impl Iterator<Item = (usize, &'a [Cell])> {
    let mut x = 0;
    std::iter::from_fn(move || {
        while x < new.len() && old[x] == new[x] {
            x += 1;
        }
        if x >= new.len() {
            return None;
        }
        let start = x;
        while x < new.len() && old[x] != new[x] {
            x += 1;
        }
        Some((start, &new[start..x]))
    })
}

fn write_cells(out: &mut Vec<u8>, cells: &[Cell], current: &mut Option<CellStyle>) -> Result<()> {
    for cell in cells {
        if *current != Some(cell.style) {
            apply_style_into(out, cell.style)?;
            *current = Some(cell.style);
        }
        out.queue(Print(cell.ch))?;
    }
    Ok(())
}

fn apply_style_into(out: &mut Vec<u8>, style: CellStyle) -> Result<()> {
    out.queue(SetAttribute(Attribute::Reset))?;
    out.queue(SetForegroundColor(rgb_to_color(style.fg)))?;
    out.queue(SetBackgroundColor(rgb_to_color(style.bg)))?;
    if style.bold {
        out.queue(SetAttribute(Attribute::Bold))?;
    }
    if style.dim {
        out.queue(SetAttribute(Attribute::Dim))?;
    }
    Ok(())
}

fn rgb_to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(ch: char) -> Cell {
        Cell {
            ch,
            style: CellStyle::default(),
        }
    }

    #[test]
    fn changed_runs_coalesce_adjacent_cells() {
        let old = vec![text(' '); 6];
        let mut new = old.clone();
        for x in [1, 2, 3, 5] {
            new[x] = text('X');
        }

        let runs: Vec<(usize, usize)> = changed_runs(&old, &new)
            .map(|(start, run)| (start, run.len()))
            .collect();
        assert_eq!(runs, vec![(1, 3), (5, 1)]);
    }

    #[test]
    fn identical_frames_encode_nothing() {
        let mut fb = FrameBuffer::new(4, 2);
        fb.put_str(0, 0, "ab", CellStyle::default());

        let mut out = Vec::new();
        encode_frame_into(Some(&fb.clone()), &fb, &mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn size_change_forces_full_redraw() {
        let prev = FrameBuffer::new(2, 2);
        let mut next = FrameBuffer::new(3, 2);
        next.put_char(2, 1, 'Z', CellStyle::default());

        let mut diff = Vec::new();
        encode_frame_into(Some(&prev), &next, &mut diff).unwrap();
        let mut full = Vec::new();
        encode_frame_into(None, &next, &mut full).unwrap();
        assert_eq!(diff, full);
        assert!(String::from_utf8_lossy(&full).contains('Z'));
    }

    #[test]
    fn diff_writes_only_changed_text() {
        let prev = FrameBuffer::new(5, 1);
        let mut next = prev.clone();
        next.put_str(2, 0, "Q", CellStyle::default());

        let mut out = Vec::new();
        encode_frame_into(Some(&prev), &next, &mut out).unwrap();
        let written = String::from_utf8_lossy(&out);
        assert!(written.contains('Q'));
        assert_eq!(written.matches(' ').count(), 0);
    }
}
