use serde::{Deserialize, Serialize};

use crate::core::{
    color::ColorTag,
    shape::{Shape, ShapeMatrix},
};

/// The falling piece.
///
/// A piece is a shape matrix anchored on the grid by the top-left corner of
/// its bounding box, plus the color it will leave behind when locked.
///
/// Pieces are pure geometry: [`Piece::translate`] and [`Piece::rotate`] never
/// look at the board. Callers check the result with
/// [`Board::is_colliding`](crate::Board::is_colliding) and undo the change
/// when it is not allowed.
///
/// # Example
///
/// ```
/// use blockfall_engine::{ColorTag, Piece, Shape};
///
/// let catalog = Shape::standard_catalog();
/// let mut piece = Piece::spawn(&catalog[0], ColorTag::new(0, 255, 255), 10);
/// assert_eq!((piece.position().column(), piece.position().row()), (3, 0));
///
/// piece.translate(1, 2);
/// piece.rotate();
/// assert_eq!(piece.matrix().height(), 4);
/// assert!(piece.undo_rotation());
/// assert_eq!(piece.matrix(), catalog[0].matrix());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    matrix: ShapeMatrix,
    previous_matrix: Option<ShapeMatrix>,
    color: ColorTag,
    position: PiecePosition,
}

impl Piece {
    #[must_use]
    pub fn new(matrix: ShapeMatrix, color: ColorTag, position: PiecePosition) -> Self {
        Self {
            matrix,
            previous_matrix: None,
            color,
            position,
        }
    }

    /// Creates a piece at its spawn position: row `0`, horizontally centered
    /// on a board with `columns` columns.
    #[must_use]
    pub fn spawn(shape: &Shape, color: ColorTag, columns: usize) -> Self {
        let matrix = shape.matrix().clone();
        let position = PiecePosition::spawn(columns, matrix.width());
        Self::new(matrix, color, position)
    }

    #[must_use]
    pub fn matrix(&self) -> &ShapeMatrix {
        &self.matrix
    }

    #[must_use]
    pub fn color(&self) -> ColorTag {
        self.color
    }

    #[must_use]
    pub fn position(&self) -> PiecePosition {
        self.position
    }

    /// Iterates over the absolute `(column, row)` grid positions of the
    /// occupied cells.
    pub fn occupied_positions(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.matrix.occupied_cells().map(move |(dx, dy)| {
            (
                self.position.column + offset(dx),
                self.position.row + offset(dy),
            )
        })
    }

    /// Moves the anchor by `(dx, dy)` without any bounds check.
    pub fn translate(&mut self, dx: i32, dy: i32) {
        self.position = self.position.translated(dx, dy);
    }

    /// Replaces the matrix with its clockwise rotation, keeping the anchor.
    ///
    /// The replaced matrix is kept so the rotation can be undone with
    /// [`Piece::undo_rotation`].
    pub fn rotate(&mut self) {
        let rotated = self.matrix.rotated_clockwise();
        self.previous_matrix = Some(std::mem::replace(&mut self.matrix, rotated));
    }

    /// Restores the matrix replaced by the last [`Piece::rotate`].
    ///
    /// Returns `false` when there is nothing to restore. Only one rotation
    /// can be undone.
    pub fn undo_rotation(&mut self) -> bool {
        match self.previous_matrix.take() {
            Some(matrix) => {
                self.matrix = matrix;
                true
            }
            None => false,
        }
    }
}

#[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn offset(value: usize) -> i32 {
    value as i32
}

/// Grid position of a piece's bounding-box top-left corner.
///
/// Coordinates are signed: a piece may be moved past a wall before the
/// move is checked and undone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct PiecePosition {
    column: i32,
    row: i32,
}

impl PiecePosition {
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Spawn anchor for a shape `width` cells wide on a board with
    /// `columns` columns.
    #[must_use]
    pub fn spawn(columns: usize, width: usize) -> Self {
        Self::new(offset(columns / 2) - offset(width / 2), 0)
    }

    #[must_use]
    pub const fn column(self) -> i32 {
        self.column
    }

    #[must_use]
    pub const fn row(self) -> i32 {
        self.row
    }

    #[must_use]
    pub const fn translated(self, dx: i32, dy: i32) -> Self {
        Self::new(self.column + dx, self.row + dy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CYAN: ColorTag = ColorTag::new(0, 255, 255);

    fn shape(name: &str) -> Shape {
        Shape::standard_catalog()
            .into_iter()
            .find(|shape| shape.name() == name)
            .unwrap()
    }

    #[test]
    fn test_spawn_is_centered_at_top() {
        let expected = [
            ("I", 3),
            ("O", 4),
            ("T", 4),
            ("J", 4),
            ("L", 4),
            ("Z", 4),
            ("S", 4),
        ];
        for (name, column) in expected {
            let piece = Piece::spawn(&shape(name), CYAN, 10);
            assert_eq!(piece.position(), PiecePosition::new(column, 0), "{name}");
            assert_eq!(piece.color(), CYAN);
        }

        let wide = Piece::spawn(&shape("I"), CYAN, 3);
        assert_eq!(wide.position(), PiecePosition::new(-1, 0));
    }

    #[test]
    fn test_translate_moves_anchor_only() {
        let mut piece = Piece::spawn(&shape("T"), CYAN, 10);
        let matrix = piece.matrix().clone();
        piece.translate(-5, 0);
        assert_eq!(piece.position(), PiecePosition::new(-1, 0));
        piece.translate(2, 3);
        assert_eq!(piece.position(), PiecePosition::new(1, 3));
        piece.translate(-2, -3);
        assert_eq!(piece.position(), PiecePosition::new(-1, 0));
        assert_eq!(piece.matrix(), &matrix);
    }

    #[test]
    fn test_occupied_positions_are_absolute() {
        let mut piece = Piece::spawn(&shape("T"), CYAN, 10);
        piece.translate(0, 5);
        let cells: Vec<_> = piece.occupied_positions().collect();
        assert_eq!(cells, vec![(5, 5), (4, 6), (5, 6), (6, 6)]);
    }

    #[test]
    fn test_rotate_keeps_anchor() {
        let mut piece = Piece::new(
            shape("I").matrix().clone(),
            CYAN,
            PiecePosition::new(3, 7),
        );
        piece.rotate();
        assert_eq!(piece.position(), PiecePosition::new(3, 7));
        let cells: Vec<_> = piece.occupied_positions().collect();
        assert_eq!(cells, vec![(3, 7), (3, 8), (3, 9), (3, 10)]);
    }

    #[test]
    fn test_undo_rotation_restores_previous_matrix() {
        for shape in Shape::standard_catalog() {
            let mut piece = Piece::spawn(&shape, CYAN, 10);
            piece.rotate();
            piece.rotate();
            let after_one = shape.matrix().rotated_clockwise();
            assert!(piece.undo_rotation());
            assert_eq!(piece.matrix(), &after_one, "{}", shape.name());
            assert!(!piece.undo_rotation());
            assert_eq!(piece.matrix(), &after_one, "{}", shape.name());
        }
    }

    #[test]
    fn test_undo_matches_three_more_rotations() {
        for shape in Shape::standard_catalog() {
            let mut undone = Piece::spawn(&shape, CYAN, 10);
            undone.rotate();
            undone.undo_rotation();

            let mut spun = Piece::spawn(&shape, CYAN, 10);
            for _ in 0..4 {
                spun.rotate();
            }
            assert_eq!(undone.matrix(), spun.matrix(), "{}", shape.name());
        }
    }
}
