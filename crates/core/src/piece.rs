//! Pieces module - shape catalog and the falling piece
//!
//! Shapes are fixed sets of four `(row, column)` offsets from an implicit pivot.
//! Every offset row is negative, so a freshly spawned piece sits entirely above
//! the field and enters it one row at a time.
//!
//! Rotation is computed rather than table driven: the cells are turned a quarter
//! turn around the bounding box origin and shifted back if they escaped it.
//! There are no wall kicks; a rotation either fits as computed or is refused.

use crate::grid::{Grid, Position};
use crate::types::{BlockColor, Direction, ShapeKind};

/// Offsets of the four cells of a shape
pub type ShapeOffsets = [(i32, i32); 4];

const I_OFFSETS: ShapeOffsets = [(-1, 0), (-2, 0), (-3, 0), (-4, 0)];
const J_OFFSETS: ShapeOffsets = [(-1, 0), (-2, 0), (-3, 0), (-1, -1)];
const L_OFFSETS: ShapeOffsets = [(-1, 0), (-2, 0), (-3, 0), (-1, 1)];
const O_OFFSETS: ShapeOffsets = [(-1, 0), (-2, 0), (-1, 1), (-2, 1)];
const S_OFFSETS: ShapeOffsets = [(-1, 0), (-2, 0), (-1, -1), (-2, 1)];
const T_OFFSETS: ShapeOffsets = [(-1, 0), (-2, 0), (-1, -1), (-1, 1)];
const N_OFFSETS: ShapeOffsets = [(-1, 0), (-2, 0), (-2, 1), (-3, 1)];

/// Get the cell offsets of a shape
pub fn shape_offsets(kind: ShapeKind) -> &'static ShapeOffsets {
    match kind {
        ShapeKind::I => &I_OFFSETS,
        ShapeKind::J => &J_OFFSETS,
        ShapeKind::L => &L_OFFSETS,
        ShapeKind::O => &O_OFFSETS,
        ShapeKind::S => &S_OFFSETS,
        ShapeKind::T => &T_OFFSETS,
        ShapeKind::N => &N_OFFSETS,
    }
}

/// Column added to every offset when a piece spawns on a `width`-wide field
pub fn spawn_column(width: usize) -> i32 {
    width as i32 / 2 - 1
}

/// The falling figure: four absolute positions and one color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    positions: [Position; 4],
    color: BlockColor,
}

impl Piece {
    /// Instantiate `kind` near the horizontal center of a `width`-wide field
    pub fn spawn(kind: ShapeKind, color: BlockColor, width: usize) -> Self {
        let shift = spawn_column(width);
        let positions = shape_offsets(kind).map(|(row, column)| Position::new(row, column + shift));
        Self { positions, color }
    }

    pub fn from_positions(positions: [Position; 4], color: BlockColor) -> Self {
        Self { positions, color }
    }

    pub fn positions(&self) -> &[Position; 4] {
        &self.positions
    }

    pub fn color(&self) -> BlockColor {
        self.color
    }

    pub fn occupies(&self, row: i32, column: i32) -> bool {
        self.positions
            .iter()
            .any(|p| p.row == row && p.column == column)
    }

    /// True while at least one cell is still above the field
    pub fn is_above_field(&self) -> bool {
        self.positions.iter().any(|p| p.row < 0)
    }

    /// Whether a cell of this piece could stand at `(row, column)`.
    ///
    /// Rows above the field are allowed; the piece's own cells never block it.
    fn is_valid_position(&self, grid: &Grid, row: i32, column: i32) -> bool {
        if row >= grid.height() as i32 || column < 0 || column >= grid.width() as i32 {
            return false;
        }
        if grid.is_wall_position(row, column) {
            return false;
        }
        !(row >= 0 && !self.occupies(row, column) && grid.is_occupied(row, column))
    }

    /// Check whether every cell can take one step in `direction`
    pub fn check_move(&self, grid: &Grid, direction: Direction) -> bool {
        let (d_row, d_column) = direction.offset();
        self.positions
            .iter()
            .all(|p| self.is_valid_position(grid, p.row + d_row, p.column + d_column))
    }

    /// Move one step in `direction` if possible. Returns false and changes
    /// nothing otherwise.
    pub fn try_move(&mut self, grid: &mut Grid, direction: Direction) -> bool {
        if !self.check_move(grid, direction) {
            return false;
        }

        let (d_row, d_column) = direction.offset();
        grid.erase_piece(self);
        for pos in &mut self.positions {
            *pos = pos.shifted(d_row, d_column);
        }
        grid.paint_piece(self);
        true
    }

    /// Candidate positions after a quarter turn to the left, if they all fit
    pub fn check_rotate_left(&self, grid: &Grid) -> Option<[Position; 4]> {
        let rotated = self.rotated_left();
        rotated
            .iter()
            .all(|p| self.is_valid_position(grid, p.row, p.column))
            .then_some(rotated)
    }

    /// Rotate a quarter turn to the left if the rotated cells fit.
    pub fn try_rotate_left(&mut self, grid: &mut Grid) -> bool {
        let Some(rotated) = self.check_rotate_left(grid) else {
            return false;
        };

        grid.erase_piece(self);
        self.positions = rotated;
        grid.paint_piece(self);
        true
    }

    fn rotated_left(&self) -> [Position; 4] {
        let min_row = self.positions.iter().map(|p| p.row).min().unwrap_or(0);
        let min_column = self.positions.iter().map(|p| p.column).min().unwrap_or(0);

        let mut rotated = self.positions.map(|p| {
            Position::new(
                min_row - (p.column - min_column),
                p.row - min_row + min_column,
            )
        });

        // Keep the turned cells inside the original bounding box origin
        let new_min_row = rotated.iter().map(|p| p.row).min().unwrap_or(min_row);
        let new_min_column = rotated.iter().map(|p| p.column).min().unwrap_or(min_column);
        let d_row = (min_row - new_min_row).max(0);
        let d_column = (min_column - new_min_column).max(0);
        for pos in &mut rotated {
            *pos = pos.shifted(d_row, d_column);
        }

        rotated
    }

    /// Hard drop: move down until the next step would be refused.
    ///
    /// Returns the number of rows fallen.
    pub fn drop_figure(&mut self, grid: &mut Grid) -> u32 {
        let mut rows = 0;
        while self.try_move(grid, Direction::Down) {
            rows += 1;
        }
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Cell;

    fn vertical_i(top_row: i32, column: i32) -> Piece {
        Piece::from_positions(
            [
                Position::new(top_row + 3, column),
                Position::new(top_row + 2, column),
                Position::new(top_row + 1, column),
                Position::new(top_row, column),
            ],
            BlockColor::Red,
        )
    }

    #[test]
    fn test_spawn_centers_shape() {
        let piece = Piece::spawn(ShapeKind::T, BlockColor::Blue, 10);
        assert_eq!(
            piece.positions(),
            &[
                Position::new(-1, 4),
                Position::new(-2, 4),
                Position::new(-1, 3),
                Position::new(-1, 5),
            ]
        );
        assert!(piece.is_above_field());
    }

    #[test]
    fn test_every_shape_has_four_distinct_cells() {
        for kind in ShapeKind::ALL {
            let offsets = shape_offsets(kind);
            for i in 0..4 {
                for j in (i + 1)..4 {
                    assert_ne!(offsets[i], offsets[j], "{:?} repeats a cell", kind);
                }
                assert!(offsets[i].0 < 0, "{:?} has a cell inside the field", kind);
            }
        }
    }

    #[test]
    fn test_move_down_shifts_and_repaints() {
        let mut grid = Grid::new(10, 10);
        let mut piece = vertical_i(0, 4);
        grid.paint_piece(&piece);

        assert!(piece.try_move(&mut grid, Direction::Down));
        assert_eq!(grid.get(0, 4), Some(Cell::Empty));
        assert_eq!(grid.get(4, 4), Some(Cell::Block(BlockColor::Red)));
    }

    #[test]
    fn test_move_into_wall_is_refused() {
        let mut grid = Grid::new(10, 10);
        let mut piece = vertical_i(0, 1);
        grid.paint_piece(&piece);
        let before = grid.clone();

        assert!(!piece.check_move(&grid, Direction::Left));
        assert!(!piece.try_move(&mut grid, Direction::Left));
        assert_eq!(grid, before);
        assert_eq!(piece, vertical_i(0, 1));
    }

    #[test]
    fn test_cells_above_field_ignore_blocks() {
        let mut grid = Grid::new(10, 10);
        grid.set(0, 3, Cell::Block(BlockColor::Green));
        // Entirely above the field: only the column range and walls matter
        let high = vertical_i(-5, 4);
        assert!(high.check_move(&grid, Direction::Left));

        // Entering the field onto a block is refused
        let low = vertical_i(-4, 3);
        assert!(!low.check_move(&grid, Direction::Down));
        assert!(!vertical_i(-5, 0).check_move(&grid, Direction::Left));
    }

    #[test]
    fn test_walls_above_an_odd_height_field() {
        // Row -1 takes its walls from row 4, the bottom row
        let grid = Grid::new(6, 5);
        let flat = Piece::from_positions(
            [
                Position::new(-1, 1),
                Position::new(-1, 2),
                Position::new(-1, 3),
                Position::new(-1, 4),
            ],
            BlockColor::Yellow,
        );
        assert!(!flat.check_move(&grid, Direction::Left));
        assert!(flat.check_move(&grid, Direction::Right));
    }

    #[test]
    fn test_rotate_vertical_i_to_horizontal() {
        let mut grid = Grid::new(10, 10);
        let mut piece = vertical_i(0, 4);
        grid.paint_piece(&piece);

        assert!(piece.try_rotate_left(&mut grid));
        let mut cols: Vec<i32> = piece.positions().iter().map(|p| p.column).collect();
        cols.sort();
        assert_eq!(cols, vec![4, 5, 6, 7]);
        assert!(piece.positions().iter().all(|p| p.row == 0));
    }

    #[test]
    fn test_rotation_onto_wall_is_refused() {
        let mut grid = Grid::new(10, 10);
        // Horizontal run would reach column 9 on row 1, which is a wall
        let mut piece = vertical_i(1, 6);
        grid.paint_piece(&piece);

        assert!(!piece.try_rotate_left(&mut grid));
        assert_eq!(piece, vertical_i(1, 6));
    }

    #[test]
    fn test_drop_counts_rows() {
        let mut grid = Grid::new(10, 10);
        let mut piece = vertical_i(0, 4);
        grid.paint_piece(&piece);

        assert_eq!(piece.drop_figure(&mut grid), 6);
        assert!(!piece.check_move(&grid, Direction::Down));
    }
}
