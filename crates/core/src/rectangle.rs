//! Rectangle module - maximal same-color rectangle search
//!
//! For one target color a cell *matches* when it holds exactly that color; empty
//! cells, walls and other colors all block. Two histograms are built row by row:
//!
//! - `heights[r][c]`: matching cells ending at `(r, c)` going upward
//! - `widths[r][c]`: matching cells ending at `(r, c)` going leftward
//!
//! Every matching cell is then treated as the bottom-right corner of candidate
//! rectangles. Walking `delta` rows up while the column stays matching, the
//! narrowest width seen so far bounds the rectangle, giving
//! `area = (delta + 1) * min_width`. The first strictly larger area wins, in
//! row-major scan order.
//!
//! A rectangle is *completed* once its area reaches `width - 1`: the two border
//! columns alternate as walls, so `width - 1` cells is a full playable row.

use crate::grid::Grid;
use crate::types::{BlockColor, Cell};

/// Inclusive, axis-aligned block of cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rectangle {
    pub top: usize,
    pub left: usize,
    pub bottom: usize,
    pub right: usize,
}

impl Rectangle {
    pub fn height(&self) -> usize {
        self.bottom - self.top + 1
    }

    pub fn width(&self) -> usize {
        self.right - self.left + 1
    }

    pub fn area(&self) -> usize {
        self.height() * self.width()
    }
}

/// One rectangle removed by [`Grid::remove_completed_rectangles`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemovedRectangle {
    pub color: BlockColor,
    pub rectangle: Rectangle,
    pub points: u64,
    /// Level the removal was scored at
    pub level: u32,
}

/// Everything a single removal pass destroyed, in removal order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClearReport {
    pub removed: Vec<RemovedRectangle>,
    pub points: u64,
}

impl ClearReport {
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty()
    }

    pub fn count(&self) -> usize {
        self.removed.len()
    }
}

/// Largest rectangle made only of `color`, or `None` if the color is absent.
pub fn find_color_rectangle(grid: &Grid, color: BlockColor) -> Option<Rectangle> {
    let width = grid.width();
    let target = Cell::Block(color);
    let cells = grid.cells();

    let mut heights = vec![0usize; cells.len()];
    let mut widths = vec![0usize; cells.len()];
    let mut best: Option<Rectangle> = None;
    let mut best_area = 0;

    for row in 0..grid.height() {
        for column in 0..width {
            let idx = row * width + column;
            if cells[idx] != target {
                continue;
            }

            heights[idx] = if row == 0 { 1 } else { heights[idx - width] + 1 };
            widths[idx] = if column == 0 { 1 } else { widths[idx - 1] + 1 };

            let mut min_width = widths[idx];
            for delta in 0..heights[idx] {
                min_width = min_width.min(widths[idx - delta * width]);
                let area = (delta + 1) * min_width;
                if area > best_area {
                    best_area = area;
                    best = Some(Rectangle {
                        top: row - delta,
                        left: column + 1 - min_width,
                        bottom: row,
                        right: column,
                    });
                }
            }
        }
    }

    best
}

/// Largest rectangle over all colors, if it is large enough to be removed.
///
/// Colors are searched in [`BlockColor::ALL`] order; a later color only wins
/// with a strictly larger area.
pub fn find_completed_rectangle(grid: &Grid) -> Option<(BlockColor, Rectangle)> {
    let mut best: Option<(BlockColor, Rectangle)> = None;
    for color in BlockColor::ALL {
        if let Some(rect) = find_color_rectangle(grid, color) {
            let better = best.map_or(true, |(_, b)| rect.area() > b.area());
            if better {
                best = Some((color, rect));
            }
        }
    }

    best.filter(|(_, rect)| rect.area() >= completion_threshold(grid.width()))
}

/// Minimum area of a removable rectangle on a `width`-wide field
pub fn completion_threshold(width: usize) -> usize {
    width - 1
}
