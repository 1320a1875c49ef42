//! Game state module - the per-tick game loop
//!
//! This module ties together the grid, the falling piece, the look-ahead and the
//! shape source. One piece lives through `Falling -> Locked`; locking spawns the
//! next piece and runs the rectangle removal pass with the new piece protected.
//!
//! The driver owns time. It should poll [`GameState::end_of_the_game`] before
//! each [`GameState::update`] and space the calls by
//! [`GameState::tick_interval_ms`].

use log::{debug, info, trace};

use crate::grid::Grid;
use crate::piece::Piece;
use crate::rectangle::ClearReport;
use crate::rng::{Lookahead, ShapeSource, SimpleRng};
use crate::scoring::tick_interval_ms;
use crate::snapshot::GameSnapshot;
use crate::types::{
    BlockColor, ColorMode, Direction, GameAction, ShapeKind, BASE_TICK_MS, TICK_SPEEDUP,
};

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState<S = SimpleRng> {
    grid: Grid,
    piece: Piece,
    lookahead: Lookahead,
    source: S,
    /// Set once the first piece of the current game has locked
    fell: bool,
    paused: bool,
    color_mode: ColorMode,
    base_tick_ms: u64,
    speedup: f64,
}

impl GameState<SimpleRng> {
    /// Create a new game on an empty `width` x `height` field with the given RNG seed
    pub fn new(width: usize, height: usize, seed: u32) -> Self {
        Self::with_source(Grid::new(width, height), SimpleRng::new(seed))
    }
}

impl<S: ShapeSource> GameState<S> {
    /// Start a game on `grid` (which may be pre-filled), drawing pieces from `source`.
    ///
    /// The color mode starts as [`ColorMode::Off`], which leaves scores unscaled.
    pub fn with_source(grid: Grid, mut source: S) -> Self {
        let mut lookahead = Lookahead::new();
        let (kind, color) = lookahead.advance(&mut source);
        let piece = Piece::spawn(kind, color, grid.width());

        let mut state = Self {
            grid,
            piece,
            lookahead,
            source,
            fell: false,
            paused: false,
            color_mode: ColorMode::Off,
            base_tick_ms: BASE_TICK_MS,
            speedup: TICK_SPEEDUP,
        };
        state.grid.paint_piece(&state.piece);
        state.apply_color_mode();
        state
    }

    /// Override the tick timing (base interval at level 1 and per-level factor)
    pub fn with_timing(mut self, base_tick_ms: u64, speedup: f64) -> Self {
        self.base_tick_ms = base_tick_ms;
        self.speedup = speedup;
        self
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn piece(&self) -> &Piece {
        &self.piece
    }

    pub fn current_shape(&self) -> Option<(ShapeKind, BlockColor)> {
        self.lookahead.current()
    }

    pub fn next_shape(&self) -> Option<(ShapeKind, BlockColor)> {
        self.lookahead.next()
    }

    pub fn scores(&self) -> u64 {
        self.grid.scores()
    }

    pub fn level(&self) -> u32 {
        self.grid.current_level()
    }

    pub fn destroyed_rectangles(&self) -> u32 {
        self.grid.destroyed_rectangles()
    }

    pub fn fell(&self) -> bool {
        self.fell
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn color_mode(&self) -> ColorMode {
        self.color_mode
    }

    /// Milliseconds the driver should wait between two updates at the current level
    pub fn tick_interval_ms(&self) -> u64 {
        tick_interval_ms(self.level(), self.base_tick_ms, self.speedup)
    }

    /// Advance the game by one tick.
    ///
    /// Moves the piece down one row if it can. Otherwise the piece locks where it
    /// is, the next piece spawns and takes one step down, and completed
    /// rectangles are removed. Returns the removal report when a lock happened.
    /// Does nothing while paused.
    pub fn update(&mut self) -> Option<ClearReport> {
        if self.paused {
            return None;
        }

        if self.piece.try_move(&mut self.grid, Direction::Down) {
            trace!("piece fell one row");
            return None;
        }

        self.fell = true;
        self.spawn_piece();
        self.piece.try_move(&mut self.grid, Direction::Down);
        Some(self.remove_rectangles())
    }

    /// True once the piece cannot move down while still partly above the field.
    pub fn end_of_the_game(&self) -> bool {
        self.piece.is_above_field() && !self.piece.check_move(&self.grid, Direction::Down)
    }

    /// Apply a game action. Returns true if it changed anything.
    ///
    /// Restart is always accepted. After game over nothing else is; while
    /// paused only Pause is.
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        if action == GameAction::Restart {
            self.reset();
            return true;
        }
        if self.end_of_the_game() {
            return false;
        }
        if action == GameAction::Pause {
            self.paused = !self.paused;
            info!("game {}", if self.paused { "paused" } else { "resumed" });
            return true;
        }
        if self.paused {
            return false;
        }

        match action {
            GameAction::MoveLeft => self.piece.try_move(&mut self.grid, Direction::Left),
            GameAction::MoveRight => self.piece.try_move(&mut self.grid, Direction::Right),
            GameAction::MoveDown => self.piece.try_move(&mut self.grid, Direction::Down),
            GameAction::RotateLeft => self.piece.try_rotate_left(&mut self.grid),
            GameAction::Drop => {
                self.hard_drop();
                true
            }
            GameAction::CycleColorMode => self.set_color_mode(self.color_mode.next()),
            GameAction::Pause | GameAction::Restart => unreachable!("handled above"),
        }
    }

    /// Drop the piece to the bottom and lock it at once.
    ///
    /// The next piece spawns above the field and the removal pass runs without
    /// the extra one-row step that [`GameState::update`] takes.
    pub fn hard_drop(&mut self) -> ClearReport {
        let rows = self.piece.drop_figure(&mut self.grid);
        debug!("hard drop fell {} rows", rows);

        self.fell = true;
        self.spawn_piece();
        self.remove_rectangles()
    }

    /// Start over on the same field: cells and score are cleared, level and
    /// destroyed count carry over, and the look-ahead is drawn fresh.
    pub fn reset(&mut self) {
        self.grid.clear_field();
        self.lookahead.reset();
        self.spawn_piece();
        self.fell = false;
        self.paused = false;
        info!("game reset at level {}", self.level());
    }

    /// Change how much of the next piece is revealed.
    ///
    /// Only allowed before the first piece of a game has locked.
    pub fn set_color_mode(&mut self, mode: ColorMode) -> bool {
        if self.fell {
            return false;
        }
        self.color_mode = mode;
        self.apply_color_mode();
        true
    }

    fn apply_color_mode(&mut self) {
        self.grid
            .set_score_multiplier(self.color_mode.score_multiplier());
    }

    fn spawn_piece(&mut self) {
        let (kind, color) = self.lookahead.advance(&mut self.source);
        self.piece = Piece::spawn(kind, color, self.grid.width());
        self.grid.paint_piece(&self.piece);
        debug!("spawned {} {} piece", color.as_str(), kind.as_str());
    }

    fn remove_rectangles(&mut self) -> ClearReport {
        let report = self.grid.remove_completed_rectangles(&self.piece);
        if !report.is_empty() {
            info!(
                "removed {} rectangle(s) for {} points, score {} level {}",
                report.count(),
                report.points,
                self.scores(),
                self.level()
            );
        }
        report
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.width = self.grid.width();
        out.height = self.grid.height();
        out.cells.clear();
        out.cells.extend_from_slice(self.grid.cells());
        out.current = self.current_shape();
        out.next = self.next_shape();
        out.scores = self.scores();
        out.level = self.level();
        out.destroyed_rectangles = self.destroyed_rectangles();
        out.color_mode = self.color_mode;
        out.fell = self.fell;
        out.paused = self.paused;
        out.game_over = self.end_of_the_game();
        out.tick_ms = self.tick_interval_ms();
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}
