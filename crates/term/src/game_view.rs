//! GameView: maps a `core::GameSnapshot` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{shape_offsets, GameSnapshot};
use crate::fb::{Cell, CellStyle, FrameBuffer, Rgb};
use crate::types::{BlockColor, Cell as GridCell, ColorMode, RecordStandings, ShapeKind};

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

const FIELD_BG: Rgb = Rgb::new(30, 30, 40);
const PANEL_BG: Rgb = Rgb::new(0, 0, 0);
const PREVIEW_SIZE: u16 = 4;

/// A lightweight terminal renderer for the rectangle game.
pub struct GameView {
    /// Grid cell width in terminal columns.
    cell_w: u16,
    /// Grid cell height in terminal rows.
    cell_h: u16,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self { cell_w: 2, cell_h: 1 }
    }
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
        }
    }

    /// Render the current game state into an existing framebuffer.
    ///
    /// Callers can reuse a framebuffer across frames; it is resized to the
    /// viewport when the terminal size changes.
    pub fn render_into(
        &self,
        snap: &GameSnapshot,
        records: &RecordStandings,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(Cell::default());

        let field_px_w = snap.width as u16 * self.cell_w;
        let field_px_h = snap.height as u16 * self.cell_h;
        let frame_w = field_px_w + 2;
        let frame_h = field_px_h + 2;

        let start_x = 0;
        let start_y = viewport.height.saturating_sub(frame_h) / 2;

        let border = CellStyle::new(Rgb::new(200, 200, 200), PANEL_BG);
        fb.fill_rect(
            start_x + 1,
            start_y + 1,
            field_px_w,
            field_px_h,
            ' ',
            CellStyle::new(FIELD_BG, FIELD_BG),
        );
        self.draw_border(fb, start_x, start_y, frame_w, frame_h, border);

        for row in 0..snap.height {
            for column in 0..snap.width {
                let (ch, style) = field_glyph(snap.cell(row, column));
                let px = start_x + 1 + column as u16 * self.cell_w;
                let py = start_y + 1 + row as u16 * self.cell_h;
                fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
            }
        }

        let panel_x = start_x.saturating_add(frame_w).saturating_add(2);
        self.draw_side_panel(fb, snap, records, viewport, panel_x, start_y);

        if snap.paused {
            self.draw_overlay_text(fb, start_x, start_y, frame_w, frame_h, "PAUSED");
        } else if snap.game_over {
            self.draw_overlay_text(fb, start_x, start_y, frame_w, frame_h, "GAME OVER");
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(
        &self,
        snap: &GameSnapshot,
        records: &RecordStandings,
        viewport: Viewport,
    ) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, records, viewport, &mut fb);
        fb
    }

    fn draw_border(&self, fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: CellStyle) {
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

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        records: &RecordStandings,
        viewport: Viewport,
        panel_x: u16,
        start_y: u16,
    ) {
        if panel_x >= viewport.width || viewport.width - panel_x < 12 {
            return;
        }

        let label = CellStyle::new(Rgb::new(220, 220, 220), PANEL_BG).bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), PANEL_BG);

        let mut y = start_y;
        fb.put_str(panel_x, y, "NEXT", label);
        y += 1;
        self.draw_preview(fb, snap.next, snap.color_mode, panel_x, y);
        y += PREVIEW_SIZE * self.cell_h + 1;

        fb.put_str(panel_x, y, "SCORE", label);
        fb.put_u64(panel_x + 8, y, snap.scores, value);
        y += 1;
        fb.put_str(panel_x, y, "LEVEL", label);
        fb.put_u64(panel_x + 8, y, snap.level as u64, value);
        y += 1;
        fb.put_str(panel_x, y, "MODE", label);
        fb.put_str(panel_x + 8, y, snap.color_mode.as_str(), value);
        y += 2;

        fb.put_str(panel_x, y, "RECORDS", label);
        y += 1;
        let live = CellStyle::new(Rgb::new(240, 220, 80), PANEL_BG).bold();
        for (i, &entry) in records.entries.iter().enumerate() {
            if y >= viewport.height {
                break;
            }
            let style = if records.live == Some(i) { live } else { value };
            let x = fb.put_u64(panel_x, y, i as u64 + 1, style.dim());
            fb.put_char(x, y, '.', style.dim());
            fb.put_u64(panel_x + 4, y, entry, style);
            y += 1;
        }
    }

    fn draw_preview(
        &self,
        fb: &mut FrameBuffer,
        next: Option<(ShapeKind, BlockColor)>,
        mode: ColorMode,
        x: u16,
        y: u16,
    ) {
        let empty = CellStyle::new(Rgb::new(90, 90, 100), FIELD_BG).dim();
        fb.fill_rect(
            x,
            y,
            PREVIEW_SIZE * self.cell_w,
            PREVIEW_SIZE * self.cell_h,
            ' ',
            empty,
        );

        let Some((kind, color)) = next else {
            return;
        };
        let style = match mode {
            ColorMode::On => CellStyle::new(block_rgb(color), FIELD_BG).bold(),
            ColorMode::Gray => CellStyle::new(Rgb::new(150, 150, 150), FIELD_BG),
            ColorMode::Off => return,
        };

        // Offsets span rows -4..=-1 and columns -1..=1
        for &(d_row, d_column) in shape_offsets(kind).iter() {
            let px = x + (d_column + 1) as u16 * self.cell_w;
            let py = y + (d_row + PREVIEW_SIZE as i32) as u16 * self.cell_h;
            fb.fill_rect(px, py, self.cell_w, self.cell_h, '█', style);
        }
    }

    fn draw_overlay_text(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        frame_w: u16,
        frame_h: u16,
        text: &str,
    ) {
        let mid_y = start_y.saturating_add(frame_h / 2);
        let text_w = text.chars().count() as u16;
        let x = start_x.saturating_add(frame_w.saturating_sub(text_w) / 2);
        let style = CellStyle::new(Rgb::new(255, 255, 255), PANEL_BG).bold();
        fb.put_str(x, mid_y, text, style);
    }
}

fn block_rgb(color: BlockColor) -> Rgb {
    match color {
        BlockColor::Red => Rgb::new(220, 80, 80),
        BlockColor::Green => Rgb::new(100, 220, 120),
        BlockColor::Yellow => Rgb::new(240, 220, 80),
        BlockColor::Blue => Rgb::new(80, 120, 220),
    }
}

fn field_glyph(cell: GridCell) -> (char, CellStyle) {
    match cell {
        GridCell::Empty => ('·', CellStyle::new(Rgb::new(90, 90, 100), FIELD_BG).dim()),
        GridCell::Wall => ('▓', CellStyle::new(Rgb::new(120, 120, 120), FIELD_BG)),
        GridCell::Block(color) => ('█', CellStyle::new(block_rgb(color), FIELD_BG).bold()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(width: usize, height: usize) -> GameSnapshot {
        let mut cells = vec![GridCell::Empty; width * height];
        for row in 0..height {
            let column = if row % 2 == 0 { 0 } else { width - 1 };
            cells[row * width + column] = GridCell::Wall;
        }
        GameSnapshot {
            width,
            height,
            cells,
            level: 1,
            ..GameSnapshot::default()
        }
    }

    #[test]
    fn walls_and_blocks_use_distinct_glyphs() {
        let mut snap = snapshot(4, 2);
        snap.cells[1] = GridCell::Block(BlockColor::Green);
        let fb = GameView::new(1, 1).render(&snap, &RecordStandings::default(), Viewport::new(6, 4));

        assert_eq!(fb.row_text(1), "│▓█··│");
        assert_eq!(fb.row_text(2), "│···▓│");
        assert_eq!(
            fb.get(2, 1).unwrap().style.fg,
            block_rgb(BlockColor::Green)
        );
    }

    #[test]
    fn preview_hidden_when_color_mode_off() {
        let mut snap = snapshot(4, 2);
        snap.next = Some((ShapeKind::I, BlockColor::Red));
        snap.color_mode = ColorMode::Off;

        let view = GameView::new(1, 1);
        let fb = view.render(&snap, &RecordStandings::default(), Viewport::new(30, 20));
        // 4-row frame centered in 20 rows: panel starts at y = 8, preview at y = 9.
        // The panel is two columns right of the 6-wide frame.
        for y in 9..13 {
            assert!(!fb.row_text(y).contains('█'));
        }

        snap.color_mode = ColorMode::Gray;
        let fb = view.render(&snap, &RecordStandings::default(), Viewport::new(30, 20));
        let preview = fb.get(9, 9).unwrap();
        assert_eq!(preview.ch, '█');
        assert_eq!(preview.style.fg, Rgb::new(150, 150, 150));
    }
}
