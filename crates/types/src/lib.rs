//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! Everything here is plain data: the simulation core, the terminal view and the
//! key map all speak in these types.
//!
//! # Field Dimensions
//!
//! - **Width**: 10 columns by default (at least [`MIN_FIELD_WIDTH`])
//! - **Height**: 20 rows by default
//! - **Walls**: column 0 on even rows, the last column on odd rows
//!
//! # Scoring and Timing Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `RECTANGLES_PER_LEVEL` | 10 | Destroyed rectangles needed per level |
//! | `LEVEL_SCORE_BONUS` | 0.15 | Extra score factor per level |
//! | `BASE_TICK_MS` | 500 | Tick interval at level 1 |
//! | `TICK_SPEEDUP` | 0.85 | Interval factor applied per level gained |
//! | `RECORD_TABLE_LEN` | 8 | Entries in the record table |
//!
//! # Examples
//!
//! ```
//! use rectris_types::{BlockColor, Cell, ColorMode, Direction, ShapeKind};
//!
//! // Text fixtures use digits for colors
//! assert_eq!(Cell::from_symbol('2'), Some(Cell::Block(BlockColor::Green)));
//! assert_eq!(Cell::Wall.symbol(), 'x');
//!
//! // Directions know their own offset
//! assert_eq!(Direction::Down.offset(), (1, 0));
//!
//! // Shapes have short lowercase names for logs
//! assert_eq!(ShapeKind::N.as_str(), "n");
//!
//! // Color modes cycle On -> Off -> Gray -> On
//! assert_eq!(ColorMode::On.next(), ColorMode::Off);
//! ```

use serde::{Deserialize, Serialize};

/// Default field width in cells
pub const DEFAULT_FIELD_WIDTH: usize = 10;

/// Default field height in cells
pub const DEFAULT_FIELD_HEIGHT: usize = 20;

/// Smallest width that keeps every spawned piece inside the columns
pub const MIN_FIELD_WIDTH: usize = 4;

/// Destroyed rectangles needed to gain one level
pub const RECTANGLES_PER_LEVEL: u32 = 10;

/// Extra score factor gained per level
pub const LEVEL_SCORE_BONUS: f64 = 0.15;

/// Tick interval at level 1 (milliseconds)
pub const BASE_TICK_MS: u64 = 500;

/// Tick interval factor applied for every level above 1
pub const TICK_SPEEDUP: f64 = 0.85;

/// Number of entries kept in the record table
pub const RECORD_TABLE_LEN: usize = 8;

/// Block colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockColor {
    Red,
    Green,
    Yellow,
    Blue,
}

impl BlockColor {
    /// All colors, in search order
    pub const ALL: [BlockColor; 4] = [
        BlockColor::Red,
        BlockColor::Green,
        BlockColor::Yellow,
        BlockColor::Blue,
    ];

    /// Digit used for this color in text fixtures
    pub fn digit(self) -> char {
        match self {
            BlockColor::Red => '1',
            BlockColor::Green => '2',
            BlockColor::Yellow => '3',
            BlockColor::Blue => '4',
        }
    }

    pub fn from_digit(ch: char) -> Option<Self> {
        match ch {
            '1' => Some(BlockColor::Red),
            '2' => Some(BlockColor::Green),
            '3' => Some(BlockColor::Yellow),
            '4' => Some(BlockColor::Blue),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BlockColor::Red => "red",
            BlockColor::Green => "green",
            BlockColor::Yellow => "yellow",
            BlockColor::Blue => "blue",
        }
    }
}

/// Value of one grid coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    Wall,
    Block(BlockColor),
}

impl Cell {
    pub fn is_wall(&self) -> bool {
        matches!(self, Cell::Wall)
    }

    /// Symbol used in text fixtures: `.` empty, `x` wall, `1`-`4` colors
    pub fn symbol(&self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Wall => 'x',
            Cell::Block(color) => color.digit(),
        }
    }

    pub fn from_symbol(ch: char) -> Option<Self> {
        match ch {
            '.' => Some(Cell::Empty),
            'x' | 'X' => Some(Cell::Wall),
            _ => BlockColor::from_digit(ch).map(Cell::Block),
        }
    }
}

/// Movement directions for the falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// `(row, column)` delta of a single step
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
        }
    }
}

/// The seven piece shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    I,
    J,
    L,
    O,
    S,
    T,
    N,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 7] = [
        ShapeKind::I,
        ShapeKind::J,
        ShapeKind::L,
        ShapeKind::O,
        ShapeKind::S,
        ShapeKind::T,
        ShapeKind::N,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::I => "i",
            ShapeKind::J => "j",
            ShapeKind::L => "l",
            ShapeKind::O => "o",
            ShapeKind::S => "s",
            ShapeKind::T => "t",
            ShapeKind::N => "n",
        }
    }
}

/// Game actions issued by the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    MoveLeft,
    MoveRight,
    MoveDown,
    RotateLeft,
    Drop,
    Pause,
    Restart,
    CycleColorMode,
}

/// How much of the upcoming piece the preview reveals.
///
/// Revealing less pays more: each mode scales the points of every removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Shape and color are shown
    #[default]
    On,
    /// Shape is shown in gray
    Gray,
    /// Nothing is shown
    Off,
}

impl ColorMode {
    pub fn next(self) -> Self {
        match self {
            ColorMode::On => ColorMode::Off,
            ColorMode::Off => ColorMode::Gray,
            ColorMode::Gray => ColorMode::On,
        }
    }

    pub fn score_multiplier(self) -> f64 {
        match self {
            ColorMode::On => 0.6,
            ColorMode::Gray => 0.75,
            ColorMode::Off => 1.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ColorMode::On => "on",
            ColorMode::Gray => "gray",
            ColorMode::Off => "off",
        }
    }
}

/// The record table as a player sees it: best first, with the running game
/// merged in at `live` when it has made the table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecordStandings {
    pub entries: Vec<u64>,
    pub live: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_symbols_round_trip() {
        for cell in [
            Cell::Empty,
            Cell::Wall,
            Cell::Block(BlockColor::Red),
            Cell::Block(BlockColor::Blue),
        ] {
            assert_eq!(Cell::from_symbol(cell.symbol()), Some(cell));
        }
        assert_eq!(Cell::from_symbol('5'), None);
    }

    #[test]
    fn direction_offsets_are_unit_steps() {
        assert_eq!(Direction::Left.offset(), (0, -1));
        assert_eq!(Direction::Right.offset(), (0, 1));
        assert_eq!(Direction::Up.offset(), (-1, 0));
        assert_eq!(Direction::Down.offset(), (1, 0));
    }

    #[test]
    fn color_mode_cycle_visits_every_mode() {
        let mut mode = ColorMode::On;
        let mut seen = Vec::new();
        for _ in 0..3 {
            seen.push(mode);
            mode = mode.next();
        }
        assert_eq!(mode, ColorMode::On);
        assert_eq!(seen, vec![ColorMode::On, ColorMode::Off, ColorMode::Gray]);
    }

    #[test]
    fn hiding_the_preview_pays_more() {
        assert!(ColorMode::Off.score_multiplier() > ColorMode::Gray.score_multiplier());
        assert!(ColorMode::Gray.score_multiplier() > ColorMode::On.score_multiplier());
    }
}
