//! Grid module - the bounded cell matrix
//!
//! The grid is `height` rows by `width` columns stored as a flat row-major vector.
//! Coordinates are `(row, column)`: row 0 is the top, rows grow downward.
//! Rows above the field (`row < 0`) are never stored.
//!
//! Walls form a zig-zag border fixed at construction: column 0 on even rows and
//! the last column on odd rows. Walls never change; [`Grid::set`] refuses to
//! write over them or to create new ones.

use std::fmt;
use std::str::FromStr;

use log::debug;

use crate::piece::Piece;
use crate::rectangle::{find_completed_rectangle, ClearReport, Rectangle, RemovedRectangle};
use crate::scoring::Progress;
use crate::types::{Cell, MIN_FIELD_WIDTH};

/// Signed grid coordinate. `row` may be negative while a piece is above the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub row: i32,
    pub column: i32,
}

impl Position {
    pub const fn new(row: i32, column: i32) -> Self {
        Self { row, column }
    }

    pub fn shifted(self, d_row: i32, d_column: i32) -> Self {
        Self::new(self.row + d_row, self.column + d_column)
    }
}

/// True if `(row, column)` belongs to the zig-zag wall pattern of a
/// `width` x `height` field.
///
/// Rows above the field count up from the bottom: row `-1` has the walls of
/// row `height - 1`, row `-2` those of row `height - 2`, and so on.
pub fn is_wall_position(width: usize, height: usize, row: i32, column: i32) -> bool {
    let row = if row < 0 { row.rem_euclid(height as i32) } else { row };
    if row % 2 == 0 {
        column == 0
    } else {
        column == width as i32 - 1
    }
}

/// The playing field together with its score counters
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    width: usize,
    height: usize,
    /// Flat array of cells, row-major order (row * width + column)
    cells: Vec<Cell>,
    progress: Progress,
}

impl Grid {
    /// Create an empty grid with its walls in place.
    ///
    /// # Panics
    ///
    /// Panics if `width < 4` or `height == 0`.
    pub fn new(width: usize, height: usize) -> Self {
        assert!(
            width >= MIN_FIELD_WIDTH,
            "grid width must be at least {MIN_FIELD_WIDTH}, got {width}"
        );
        assert!(height > 0, "grid height must be positive");

        let mut cells = vec![Cell::Empty; width * height];
        for row in 0..height {
            let column = if row % 2 == 0 { 0 } else { width - 1 };
            cells[row * width + column] = Cell::Wall;
        }

        Self {
            width,
            height,
            cells,
            progress: Progress::new(),
        }
    }

    #[inline(always)]
    fn index(&self, row: i32, column: i32) -> Option<usize> {
        if row < 0 || column < 0 || row >= self.height as i32 || column >= self.width as i32 {
            return None;
        }
        Some(row as usize * self.width + column as usize)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Get cell at `(row, column)`. Returns `None` if out of bounds.
    pub fn get(&self, row: i32, column: i32) -> Option<Cell> {
        self.index(row, column).map(|idx| self.cells[idx])
    }

    /// Set cell at `(row, column)`.
    ///
    /// Returns false if the position is out of bounds, is a wall, or if `cell`
    /// is itself a wall.
    pub fn set(&mut self, row: i32, column: i32, cell: Cell) -> bool {
        if cell.is_wall() || self.is_wall_position(row, column) {
            return false;
        }
        match self.index(row, column) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    pub fn is_wall_position(&self, row: i32, column: i32) -> bool {
        is_wall_position(self.width, self.height, row, column)
    }

    /// Check if position is inside the field and holds a colored block
    pub fn is_occupied(&self, row: i32, column: i32) -> bool {
        matches!(self.get(row, column), Some(Cell::Block(_)))
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// One row of cells.
    ///
    /// # Panics
    ///
    /// Panics if `row >= height`.
    pub fn row(&self, row: usize) -> &[Cell] {
        let start = row * self.width;
        &self.cells[start..start + self.width]
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn scores(&self) -> u64 {
        self.progress.scores()
    }

    pub fn destroyed_rectangles(&self) -> u32 {
        self.progress.destroyed_rectangles()
    }

    pub fn current_level(&self) -> u32 {
        self.progress.level()
    }

    /// Scale the points of every following removal (see [`Progress::set_multiplier`]).
    pub fn set_score_multiplier(&mut self, multiplier: f64) {
        self.progress.set_multiplier(multiplier);
    }

    /// Remove the visible cells of `piece` from the grid
    pub fn erase_piece(&mut self, piece: &Piece) {
        for pos in piece.positions() {
            self.set(pos.row, pos.column, Cell::Empty);
        }
    }

    /// Draw the visible cells of `piece` onto the grid
    pub fn paint_piece(&mut self, piece: &Piece) {
        let cell = Cell::Block(piece.color());
        for pos in piece.positions() {
            self.set(pos.row, pos.column, cell);
        }
    }

    /// Remove every completed rectangle, one at a time, until none is left.
    ///
    /// `piece` is the falling piece, painted on the grid. Its visible cells take
    /// part in the first search. Once a rectangle is found the piece is lifted
    /// off the grid, so later searches and collapses leave it alone, and it is
    /// painted back where it stands after the loop ends.
    pub fn remove_completed_rectangles(&mut self, piece: &Piece) -> ClearReport {
        let mut report = ClearReport::default();
        let mut lifted = false;

        while let Some((color, rectangle)) = find_completed_rectangle(self) {
            self.erase_rectangle(&rectangle);
            if !lifted {
                self.erase_piece(piece);
                lifted = true;
            }
            self.collapse_above(&rectangle);

            let score = self.progress.record_removal(rectangle.area());
            debug!(
                "removed {} rectangle {:?} (area {}) for {} points at level {}",
                color.as_str(),
                rectangle,
                rectangle.area(),
                score.points,
                score.level
            );

            report.points += score.points;
            report.removed.push(RemovedRectangle {
                color,
                rectangle,
                points: score.points,
                level: score.level,
            });
        }
        if lifted {
            self.paint_piece(piece);
        }

        report
    }

    fn erase_rectangle(&mut self, rectangle: &Rectangle) {
        for row in rectangle.top..=rectangle.bottom {
            let start = row * self.width;
            self.cells[start + rectangle.left..=start + rectangle.right].fill(Cell::Empty);
        }
    }

    /// Column-scoped gravity after `rectangle` was erased.
    ///
    /// In each column of the rectangle, every non-wall cell above it moves down
    /// by as many non-wall slots as the rectangle cleared in that column. Away
    /// from the border this is a plain shift by the rectangle's height; walls
    /// are never moved or written over.
    fn collapse_above(&mut self, rectangle: &Rectangle) {
        let mut slots = Vec::with_capacity(rectangle.bottom + 1);
        for column in rectangle.left..=rectangle.right {
            slots.clear();
            slots.extend(
                (0..=rectangle.bottom).filter(|&row| !self.is_wall_position(row as i32, column as i32)),
            );
            let cleared = slots.iter().filter(|&&row| row >= rectangle.top).count();

            for i in (cleared..slots.len()).rev() {
                let from = slots[i - cleared] * self.width + column;
                let to = slots[i] * self.width + column;
                self.cells[to] = self.cells[from];
            }
            for &row in &slots[..cleared.min(slots.len())] {
                self.cells[row * self.width + column] = Cell::Empty;
            }
        }
    }

    /// Empty every non-wall cell and reset the score.
    ///
    /// Level and destroyed-rectangle count are left as they are.
    pub fn clear_field(&mut self) {
        for cell in &mut self.cells {
            if !cell.is_wall() {
                *cell = Cell::Empty;
            }
        }
        self.progress.reset_scores();
    }
}

/// Error returned when parsing a grid from its text form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridParseError {
    Empty,
    TooNarrow { width: usize },
    RaggedRow { row: usize, expected: usize, found: usize },
    UnknownSymbol { row: usize, column: usize, symbol: char },
    MisplacedWall { row: usize, column: usize },
}

impl fmt::Display for GridParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridParseError::Empty => write!(f, "grid text has no rows"),
            GridParseError::TooNarrow { width } => {
                write!(f, "grid width {width} is below the minimum of {MIN_FIELD_WIDTH}")
            }
            GridParseError::RaggedRow {
                row,
                expected,
                found,
            } => write!(f, "row {row} has {found} cells, expected {expected}"),
            GridParseError::UnknownSymbol {
                row,
                column,
                symbol,
            } => write!(f, "unknown symbol {symbol:?} at row {row}, column {column}"),
            GridParseError::MisplacedWall { row, column } => {
                write!(f, "wall pattern broken at row {row}, column {column}")
            }
        }
    }
}

impl std::error::Error for GridParseError {}

impl FromStr for Grid {
    type Err = GridParseError;

    /// Parse the text form: one line per row, `.` empty, `x` wall, `1`-`4` colors.
    ///
    /// Walls must sit exactly on the zig-zag pattern. The score counters start fresh.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = s.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
        let first = lines.first().ok_or(GridParseError::Empty)?;
        let width = first.chars().count();
        if width < MIN_FIELD_WIDTH {
            return Err(GridParseError::TooNarrow { width });
        }

        let mut grid = Grid::new(width, lines.len());
        for (row, line) in lines.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(GridParseError::RaggedRow {
                    row,
                    expected: width,
                    found,
                });
            }
            for (column, symbol) in line.chars().enumerate() {
                let cell = Cell::from_symbol(symbol).ok_or(GridParseError::UnknownSymbol {
                    row,
                    column,
                    symbol,
                })?;
                let wall_here = grid.is_wall_position(row as i32, column as i32);
                if cell.is_wall() != wall_here {
                    return Err(GridParseError::MisplacedWall { row, column });
                }
                if !wall_here {
                    grid.cells[row * width + column] = cell;
                }
            }
        }

        Ok(grid)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.height {
            if row > 0 {
                writeln!(f)?;
            }
            for cell in self.row(row) {
                write!(f, "{}", cell.symbol())?;
            }
        }
        Ok(())
    }
}
