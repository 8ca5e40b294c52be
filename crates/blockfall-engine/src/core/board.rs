use crate::core::{color::ColorTag, piece::Piece};

/// A single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    /// Nothing has been locked here.
    #[default]
    Empty,
    /// Occupied by a locked piece of the given color.
    Filled(ColorTag),
}

impl Cell {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    #[must_use]
    pub fn is_filled(self) -> bool {
        !self.is_empty()
    }

    #[must_use]
    pub fn color(self) -> Option<ColorTag> {
        match self {
            Cell::Empty => None,
            Cell::Filled(color) => Some(color),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct BoardRow {
    cells: Box<[Cell]>,
}

impl BoardRow {
    fn empty(columns: usize) -> Self {
        Self {
            cells: vec![Cell::Empty; columns].into_boxed_slice(),
        }
    }

    fn is_filled(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_filled())
    }
}

/// The fixed-size playfield.
///
/// Rows are numbered from the top (`0`) down to `num_rows() - 1`, columns
/// from the left (`0`) to `num_columns() - 1`. Dimensions never change after
/// construction, and the only ways to write cells are [`Board::fill_piece`]
/// and [`Board::clear_rows`].
///
/// Pieces may extend above row `0`: such cells are neither colliding nor
/// stored. Everything below the last row or beside the side walls collides.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Board, ColorTag, Piece, PiecePosition, ShapeMatrix};
///
/// let mut board = Board::new(20, 10);
/// let o = ShapeMatrix::from_rows(&[&[1, 1], &[1, 1]]).unwrap();
/// let piece = Piece::new(o, ColorTag::new(255, 255, 0), PiecePosition::new(4, 18));
///
/// assert!(!board.is_colliding(&piece));
/// board.fill_piece(&piece);
/// assert!(board.cell(19, 5).unwrap().is_filled());
/// assert!(board.is_colliding(&piece));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    columns: usize,
    rows: Vec<BoardRow>,
}

impl Board {
    /// Creates an empty board.
    ///
    /// Dimensions are expected to be non-zero; [`GameConfig::validate`]
    /// rejects zero sizes before a board is built for a game.
    ///
    /// [`GameConfig::validate`]: crate::GameConfig::validate
    #[must_use]
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            columns,
            rows: vec![BoardRow::empty(columns); rows],
        }
    }

    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn num_columns(&self) -> usize {
        self.columns
    }

    /// Returns the cell at `(row, column)`, or `None` outside the grid.
    #[must_use]
    pub fn cell(&self, row: usize, column: usize) -> Option<Cell> {
        self.rows.get(row)?.cells.get(column).copied()
    }

    /// Iterates over the rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows.iter().map(|row| &*row.cells)
    }

    /// Returns whether no cell is filled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows
            .iter()
            .all(|row| row.cells.iter().all(|cell| cell.is_empty()))
    }

    fn position_in_grid(&self, column: i32, row: i32) -> Option<(usize, usize)> {
        let column = usize::try_from(column).ok()?;
        let row = usize::try_from(row).ok()?;
        (column < self.columns && row < self.rows.len()).then_some((column, row))
    }

    /// Checks whether any occupied cell of the piece is below the floor,
    /// outside the side walls, or on a filled cell.
    ///
    /// Cells above the top edge are not considered colliding.
    #[must_use]
    pub fn is_colliding(&self, piece: &Piece) -> bool {
        piece.occupied_positions().any(|(column, row)| {
            if row < 0 {
                return !self.column_in_range(column);
            }
            match self.position_in_grid(column, row) {
                Some((column, row)) => self.rows[row].cells[column].is_filled(),
                None => true,
            }
        })
    }

    fn column_in_range(&self, column: i32) -> bool {
        usize::try_from(column).is_ok_and(|column| column < self.columns)
    }

    /// Locks a piece onto the board by writing its color into every cell it
    /// occupies.
    ///
    /// The caller must have checked that the piece does not collide at its
    /// current position; no validation happens here and filled cells are
    /// overwritten. Cells above the top edge are dropped.
    pub fn fill_piece(&mut self, piece: &Piece) {
        let color = piece.color();
        for (column, row) in piece.occupied_positions() {
            if let Some((column, row)) = self.position_in_grid(column, row) {
                self.rows[row].cells[column] = Cell::Filled(color);
            }
        }
    }

    /// Clears filled rows and returns the number of rows cleared.
    ///
    /// Rows are scanned once from top to bottom. Each filled row is removed
    /// and an empty row is inserted at the top, so the rows above it move
    /// down by one and the rows below it stay in place.
    pub fn clear_rows(&mut self) -> usize {
        let mut count = 0;
        for y in 0..self.rows.len() {
            if self.rows[y].is_filled() {
                self.rows.remove(y);
                self.rows.insert(0, BoardRow::empty(self.columns));
                count += 1;
            }
        }
        count
    }

    /// Creates a board from ASCII art, mainly for tests.
    ///
    /// `#` marks a cell filled with `color`, `.` an empty cell; other
    /// characters are ignored. Rows are listed from top to bottom and every
    /// row must have the same number of cells.
    #[must_use]
    pub fn from_ascii(art: &str, color: ColorTag) -> Self {
        let lines: Vec<&str> = art.lines().filter(|line| !line.trim().is_empty()).collect();
        let mut rows = Vec::with_capacity(lines.len());
        let mut columns = None;

        for (y, line) in lines.iter().enumerate() {
            let cells: Box<[Cell]> = line
                .chars()
                .filter_map(|ch| match ch {
                    '#' => Some(Cell::Filled(color)),
                    '.' => Some(Cell::Empty),
                    _ => None,
                })
                .collect();
            let width = *columns.get_or_insert(cells.len());
            assert_eq!(
                cells.len(),
                width,
                "Each row must have exactly {width} cells, got {} at row {y}",
                cells.len(),
            );
            rows.push(BoardRow { cells });
        }

        Self {
            columns: columns.unwrap_or(0),
            rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::core::{piece::PiecePosition, shape::ShapeMatrix};

    use super::*;

    const RED: ColorTag = ColorTag::new(255, 0, 0);
    const BLUE: ColorTag = ColorTag::new(0, 0, 255);

    fn single_cell(column: i32, row: i32) -> Piece {
        let dot = ShapeMatrix::from_rows(&[&[1]]).unwrap();
        Piece::new(dot, BLUE, PiecePosition::new(column, row))
    }

    fn fill_row(board: &mut Board, row: i32, color: ColorTag) {
        for column in 0..board.num_columns() {
            let dot = ShapeMatrix::from_rows(&[&[1]]).unwrap();
            let column = i32::try_from(column).unwrap();
            board.fill_piece(&Piece::new(dot, color, PiecePosition::new(column, row)));
        }
    }

    #[test]
    fn test_initial_board() {
        let board = Board::new(20, 10);
        assert_eq!(board.num_rows(), 20);
        assert_eq!(board.num_columns(), 10);
        assert!(board.is_empty());
        for row in board.rows() {
            assert_eq!(row.len(), 10);
            assert!(row.iter().all(|cell| cell.is_empty()));
        }
        assert_eq!(board.cell(20, 0), None);
        assert_eq!(board.cell(0, 10), None);
    }

    #[test]
    fn test_collision_with_single_filled_cell() {
        let mut board = Board::new(20, 10);
        board.fill_piece(&single_cell(4, 7));

        assert!(board.is_colliding(&single_cell(4, 7)));
        for (dx, dy) in [(-1, 0), (1, 0), (0, -1), (0, 1)] {
            assert!(
                !board.is_colliding(&single_cell(4 + dx, 7 + dy)),
                "({dx}, {dy}) should be free"
            );
        }
    }

    #[test]
    fn test_walls_and_floor_always_collide() {
        let empty = Board::new(20, 10);
        let full = Board::from_ascii(&"##########\n".repeat(20), RED);

        for board in [&empty, &full] {
            assert!(board.is_colliding(&single_cell(-1, 5)));
            assert!(board.is_colliding(&single_cell(10, 5)));
            assert!(board.is_colliding(&single_cell(3, 20)));
        }
        assert!(!empty.is_colliding(&single_cell(0, 0)));
        assert!(!empty.is_colliding(&single_cell(9, 19)));
    }

    #[test]
    fn test_cells_above_top_do_not_collide() {
        let board = Board::new(20, 10);
        assert!(!board.is_colliding(&single_cell(3, -1)));
        assert!(!board.is_colliding(&single_cell(3, -5)));
        assert!(board.is_colliding(&single_cell(-1, -1)));
        assert!(board.is_colliding(&single_cell(10, -1)));
    }

    #[test]
    fn test_only_occupied_cells_collide() {
        let board = Board::from_ascii(
            r"
            ..........
            #.........
            ",
            RED,
        );
        // Unoccupied corners of the bounding box may overlap walls and stacks.
        let hook = ShapeMatrix::from_rows(&[&[1, 1], &[0, 1]]).unwrap();
        let bar = ShapeMatrix::from_rows(&[&[0, 1], &[0, 1]]).unwrap();
        assert!(!board.is_colliding(&Piece::new(hook.clone(), BLUE, PiecePosition::new(0, 0))));
        assert!(board.is_colliding(&Piece::new(hook, BLUE, PiecePosition::new(-1, 0))));

        // The bar's empty left column hangs past the wall; its occupied
        // column decides.
        assert!(!board.is_colliding(&Piece::new(bar.clone(), BLUE, PiecePosition::new(0, 0))));
        assert!(board.is_colliding(&Piece::new(bar.clone(), BLUE, PiecePosition::new(-1, 0))));
        assert!(!Board::new(2, 10).is_colliding(&Piece::new(bar, BLUE, PiecePosition::new(-1, 0))));
    }

    #[test]
    fn test_fill_piece_writes_exactly_occupied_cells() {
        let mut board = Board::new(20, 10);
        let before = board.clone();
        let t = ShapeMatrix::from_rows(&[&[0, 1, 0], &[1, 1, 1]]).unwrap();
        let piece = Piece::new(t, RED, PiecePosition::new(3, 17));
        board.fill_piece(&piece);

        let occupied: Vec<(usize, usize)> = vec![(17, 4), (18, 3), (18, 4), (18, 5)];
        for (y, row) in board.rows().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                if occupied.contains(&(y, x)) {
                    assert_eq!(*cell, Cell::Filled(RED), "({y}, {x})");
                } else {
                    assert_eq!(Some(*cell), before.cell(y, x), "({y}, {x})");
                }
            }
        }
    }

    #[test]
    fn test_fill_piece_drops_cells_above_top() {
        let mut board = Board::new(4, 4);
        let i = ShapeMatrix::from_rows(&[&[1], &[1], &[1], &[1]]).unwrap();
        board.fill_piece(&Piece::new(i, RED, PiecePosition::new(1, -2)));

        let filled: Vec<_> = (0..4).map(|y| board.cell(y, 1).unwrap()).collect();
        assert_eq!(
            filled,
            [Cell::Filled(RED), Cell::Filled(RED), Cell::Empty, Cell::Empty]
        );
    }

    #[test]
    fn test_clear_single_row_shifts_rows_above() {
        let mut board = Board::from_ascii(
            r"
            ..........
            #.........
            .#........
            ##########
            ..#.......
            ",
            RED,
        );

        assert_eq!(board.clear_rows(), 1);
        let expected = Board::from_ascii(
            r"
            ..........
            ..........
            #.........
            .#........
            ..#.......
            ",
            RED,
        );
        assert_eq!(board, expected);
    }

    #[test]
    fn test_clear_row_moves_previous_row_into_its_place() {
        let mut board = Board::new(20, 10);
        let k = 12;
        fill_row(&mut board, k, RED);
        board.fill_piece(&single_cell(6, k - 1));
        board.fill_piece(&single_cell(2, k + 1));

        assert_eq!(board.clear_rows(), 1);

        let k = usize::try_from(k).unwrap();
        assert_eq!(board.cell(k, 6), Some(Cell::Filled(BLUE)));
        assert_eq!(board.cell(k - 1, 6), Some(Cell::Empty));
        assert_eq!(board.cell(k + 1, 2), Some(Cell::Filled(BLUE)));
        assert_eq!(board.rows().filter(|row| row.iter().any(|c| c.is_filled())).count(), 2);
    }

    #[test]
    fn test_clear_multiple_rows() {
        let mut board = Board::from_ascii(
            r"
            ....
            #...
            ####
            .#..
            ####
            ####
            ",
            RED,
        );

        assert_eq!(board.clear_rows(), 3);
        let expected = Board::from_ascii(
            r"
            ....
            ....
            ....
            ....
            #...
            .#..
            ",
            RED,
        );
        assert_eq!(board, expected);
    }

    #[test]
    fn test_clear_rows_with_partial_rows() {
        let art = r"
            ....
            ###.
            .###
            ";
        let mut board = Board::from_ascii(art, RED);
        assert_eq!(board.clear_rows(), 0);
        assert_eq!(board, Board::from_ascii(art, RED));
    }

    #[test]
    fn test_clear_all_rows() {
        let mut board = Board::from_ascii(&"###\n".repeat(5), RED);
        assert_eq!(board.clear_rows(), 5);
        assert!(board.is_empty());
        assert_eq!(board.num_rows(), 5);
        assert_eq!(board.num_columns(), 3);
    }

    #[test]
    fn test_clear_rows_keeps_colors() {
        let mut board = Board::new(3, 2);
        fill_row(&mut board, 2, RED);
        board.fill_piece(&single_cell(1, 1));
        board.clear_rows();
        assert_eq!(board.cell(2, 1), Some(Cell::Filled(BLUE)));
        assert_eq!(board.cell(2, 1).and_then(Cell::color), Some(BLUE));
    }
}
