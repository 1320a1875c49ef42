//! Snapshot module - plain-data view of a game for renderers

use crate::types::{BlockColor, Cell, ColorMode, ShapeKind};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GameSnapshot {
    pub width: usize,
    pub height: usize,
    /// Row-major cells, falling piece included
    pub cells: Vec<Cell>,
    pub current: Option<(ShapeKind, BlockColor)>,
    pub next: Option<(ShapeKind, BlockColor)>,
    pub scores: u64,
    pub level: u32,
    pub destroyed_rectangles: u32,
    pub color_mode: ColorMode,
    pub fell: bool,
    pub paused: bool,
    pub game_over: bool,
    pub tick_ms: u64,
}

impl GameSnapshot {
    /// Cell at `(row, column)`; out-of-range reads are empty
    pub fn cell(&self, row: usize, column: usize) -> Cell {
        if row >= self.height || column >= self.width {
            return Cell::Empty;
        }
        self.cells
            .get(row * self.width + column)
            .copied()
            .unwrap_or_default()
    }

    pub fn playable(&self) -> bool {
        !self.game_over && !self.paused
    }
}
