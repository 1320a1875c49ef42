//! Core game logic module - pure, deterministic, and testable
//!
//! This crate contains the rules of the rectangle-clearing falling-block game.
//! It has no dependencies on UI, terminal or files:
//!
//! - **Deterministic**: with a seeded or scripted [`ShapeSource`] a game replays exactly
//! - **Transactional**: every move, rotation and removal pass is validated before
//!   it mutates anything; refused transitions return `false`
//! - **Portable**: runs in the terminal front end or headless
//!
//! # Module Structure
//!
//! - [`grid`]: cell matrix, zig-zag walls, removal loop with column-scoped gravity
//! - [`rectangle`]: maximal same-color rectangle search
//! - [`piece`]: shape catalog, moves, computed rotation, hard drop
//! - [`scoring`]: score/level accumulator and tick interval
//! - [`rng`]: shape sources and the next-piece look-ahead
//! - [`game_state`]: the per-tick game loop and action handling
//! - [`snapshot`]: plain data for renderers
//!
//! # Game Rules
//!
//! - Pieces fall one row per tick and lock when they cannot fall further
//! - Any single-color rectangle of at least `width - 1` cells is removed, the
//!   largest first, and only the columns above it fall
//! - Each removal scores `area * (level * 0.15 + 1)`; every 10 removals raise the level
//! - The game ends when a piece cannot fall while still partly above the field
//!
//! # Example
//!
//! ```
//! use rectris_core::{GameState, Grid};
//! use rectris_core::types::GameAction;
//!
//! let mut game = GameState::new(10, 20, 12345);
//!
//! game.apply_action(GameAction::MoveRight);
//! game.apply_action(GameAction::RotateLeft);
//! game.apply_action(GameAction::Drop);
//! assert!(game.fell());
//!
//! // Removal works on any grid, e.g. one parsed from text
//! let mut grid: Grid = "x.........\n111111111x".parse().unwrap();
//! let report = grid.remove_completed_rectangles(game.piece());
//! assert_eq!(report.count(), 1);
//! assert_eq!(grid.scores(), 10);
//! ```

pub mod game_state;
pub mod grid;
pub mod piece;
pub mod rectangle;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use rectris_types as types;

// Re-export commonly used types for convenience
pub use game_state::GameState;
pub use grid::{Grid, GridParseError, Position};
pub use piece::{shape_offsets, Piece};
pub use rectangle::{find_color_rectangle, find_completed_rectangle, ClearReport, Rectangle};
pub use rng::{Lookahead, ScriptedSource, ShapeSource, SimpleRng};
pub use scoring::{removal_points, tick_interval_ms, Progress};
pub use snapshot::GameSnapshot;
