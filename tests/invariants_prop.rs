//! Property tests for the grid and game loop invariants.
//!
//! - Walls never change, whatever the player or the removal pass does.
//! - A removal pass only touches the columns of the rectangles it removed.
//! - After a pass no removable rectangle is left, and a second pass is a no-op.
//! - Removed rectangles are single-colored and at least `width - 1` cells large.

use proptest::prelude::*;
use rectris::core::grid::is_wall_position;
use rectris::core::{find_completed_rectangle, GameState, Grid, Piece};
use rectris::types::{BlockColor, Cell, GameAction, ShapeKind};

fn assert_walls_intact(grid: &Grid) {
    for row in 0..grid.height() as i32 {
        for column in 0..grid.width() as i32 {
            let is_wall = grid.get(row, column) == Some(Cell::Wall);
            assert_eq!(
                is_wall,
                is_wall_position(grid.width(), grid.height(), row, column),
                "wall mismatch at ({row}, {column})"
            );
        }
    }
}

/// Random fields with few colors so that rectangles actually form
fn grid_strategy() -> impl Strategy<Value = Grid> {
    (4usize..=12, 1usize..=12).prop_flat_map(|(width, height)| {
        prop::collection::vec(0u8..=2, width * height).prop_map(move |codes| {
            let mut grid = Grid::new(width, height);
            for (i, code) in codes.into_iter().enumerate() {
                let cell = match code {
                    1 => Cell::Block(BlockColor::Red),
                    2 => Cell::Block(BlockColor::Green),
                    _ => Cell::Empty,
                };
                grid.set((i / width) as i32, (i % width) as i32, cell);
            }
            grid
        })
    })
}

fn action_from_code(code: u8) -> Option<GameAction> {
    match code {
        0 => Some(GameAction::MoveLeft),
        1 => Some(GameAction::MoveRight),
        2 => Some(GameAction::MoveDown),
        3 => Some(GameAction::RotateLeft),
        4 => Some(GameAction::Drop),
        5 => Some(GameAction::Restart),
        // Everything else is a timer tick
        _ => None,
    }
}

proptest! {
    #[test]
    fn removal_pass_keeps_walls_and_scopes_gravity(grid in grid_strategy()) {
        let before = grid.clone();
        let mut after = grid;
        let piece = Piece::spawn(ShapeKind::T, BlockColor::Red, after.width());
        let report = after.remove_completed_rectangles(&piece);

        assert_walls_intact(&after);

        let threshold = after.width() - 1;
        for removed in &report.removed {
            prop_assert!(removed.rectangle.area() >= threshold);
        }

        for column in 0..after.width() {
            let touched = report
                .removed
                .iter()
                .any(|r| (r.rectangle.left..=r.rectangle.right).contains(&column));
            if touched {
                continue;
            }
            for row in 0..after.height() as i32 {
                prop_assert_eq!(
                    after.get(row, column as i32),
                    before.get(row, column as i32),
                    "column {} changed", column
                );
            }
        }

        prop_assert_eq!(after.destroyed_rectangles() as usize, report.count());
        prop_assert_eq!(after.scores(), report.points);
    }

    #[test]
    fn removal_pass_terminates_and_is_idempotent(grid in grid_strategy()) {
        let mut grid = grid;
        let piece = Piece::spawn(ShapeKind::O, BlockColor::Green, grid.width());
        grid.remove_completed_rectangles(&piece);
        prop_assert!(find_completed_rectangle(&grid).is_none());

        let settled = grid.clone();
        let again = grid.remove_completed_rectangles(&piece);
        prop_assert!(again.is_empty());
        prop_assert_eq!(&grid, &settled);
        prop_assert_eq!(grid.scores(), settled.scores());
        prop_assert_eq!(grid.current_level(), settled.current_level());
    }

    #[test]
    fn generated_games_never_touch_walls(
        seed in any::<u32>(),
        width in 4usize..=12,
        height in 4usize..=16,
        codes in prop::collection::vec(0u8..10, 1..200),
    ) {
        let mut state = GameState::new(width, height, seed);

        for code in codes {
            match action_from_code(code) {
                Some(action) => {
                    state.apply_action(action);
                }
                None => {
                    if !state.end_of_the_game() {
                        state.update();
                    }
                }
            }

            assert_walls_intact(state.grid());
            // The falling piece is always drawn where it is
            for p in state.piece().positions() {
                if p.row >= 0 {
                    prop_assert_eq!(
                        state.grid().get(p.row, p.column),
                        Some(Cell::Block(state.piece().color()))
                    );
                }
            }
        }
    }
}
