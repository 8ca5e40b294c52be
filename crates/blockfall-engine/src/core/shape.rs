use serde::{Deserialize, Serialize};

use crate::ShapeError;

/// Rectangular occupancy matrix of a falling shape.
///
/// Cells are addressed as `(x, y)` where `x` is the column within the
/// bounding box and `y` is the row, both counted from the top-left corner.
/// A matrix always has at least one row, one column and one occupied cell.
///
/// Matrices are values: rotation produces a new matrix and never edits the
/// receiver, so catalog templates stay untouched while pieces rotate.
///
/// # Wire format
///
/// Serialized as nested rows of `0`/`1`, e.g. `[[0,1,0],[1,1,1]]`.
///
/// # Example
///
/// ```
/// use blockfall_engine::ShapeMatrix;
///
/// let t = ShapeMatrix::from_rows(&[&[0, 1, 0], &[1, 1, 1]]).unwrap();
/// let rotated = t.rotated_clockwise();
/// assert_eq!((rotated.width(), rotated.height()), (2, 3));
/// assert_eq!(rotated, ShapeMatrix::from_rows(&[&[1, 0], &[1, 1], &[1, 0]]).unwrap());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<u8>>", into = "Vec<Vec<u8>>")]
pub struct ShapeMatrix {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl ShapeMatrix {
    /// Builds a matrix from rows of `0`/`1` values.
    pub fn from_rows(rows: &[&[u8]]) -> Result<Self, ShapeError> {
        let width = rows.first().map_or(0, |row| row.len());
        if width == 0 {
            return Err(ShapeError::Empty);
        }

        let mut cells = Vec::with_capacity(width * rows.len());
        for (y, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(ShapeError::RaggedRow {
                    row: y,
                    expected: width,
                    found: row.len(),
                });
            }
            for (x, &value) in row.iter().enumerate() {
                match value {
                    0 => cells.push(false),
                    1 => cells.push(true),
                    _ => return Err(ShapeError::InvalidCell { x, y, value }),
                }
            }
        }
        if !cells.contains(&true) {
            return Err(ShapeError::NoOccupiedCell);
        }

        Ok(Self {
            width,
            height: rows.len(),
            cells,
        })
    }

    /// Number of columns in the bounding box.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows in the bounding box.
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns whether the cell at `(x, y)` is occupied.
    ///
    /// Positions outside the bounding box are reported as unoccupied.
    #[must_use]
    pub fn is_occupied(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.cells[y * self.width + x]
    }

    /// Iterates over the `(x, y)` positions of occupied cells in row-major order.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, occupied)| **occupied)
            .map(|(i, _)| (i % self.width, i / self.width))
    }

    /// Returns the matrix rotated 90° clockwise.
    ///
    /// For a source with `R` rows and `C` columns the result has `C` rows and
    /// `R` columns, where `rotated[i][j] = source[R - 1 - j][i]`.
    #[must_use]
    pub fn rotated_clockwise(&self) -> Self {
        let width = self.height;
        let height = self.width;
        let mut cells = Vec::with_capacity(self.cells.len());
        for i in 0..height {
            for j in 0..width {
                cells.push(self.cells[(self.height - 1 - j) * self.width + i]);
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    /// Returns the rows of the matrix as `0`/`1` values.
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.cells
            .chunks(self.width)
            .map(|row| row.iter().map(|&c| u8::from(c)).collect())
            .collect()
    }
}

impl TryFrom<Vec<Vec<u8>>> for ShapeMatrix {
    type Error = ShapeError;

    fn try_from(rows: Vec<Vec<u8>>) -> Result<Self, Self::Error> {
        let rows: Vec<&[u8]> = rows.iter().map(Vec::as_slice).collect();
        Self::from_rows(&rows)
    }
}

impl From<ShapeMatrix> for Vec<Vec<u8>> {
    fn from(matrix: ShapeMatrix) -> Self {
        matrix.to_rows()
    }
}

/// A named template in the shape catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shape {
    name: String,
    matrix: ShapeMatrix,
}

impl Shape {
    #[must_use]
    pub fn new(name: impl Into<String>, matrix: ShapeMatrix) -> Self {
        Self {
            name: name.into(),
            matrix,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn matrix(&self) -> &ShapeMatrix {
        &self.matrix
    }

    /// Returns the seven canonical tetrominoes in their spawn orientation.
    ///
    /// Order: I, O, T, J, L, Z, S.
    #[must_use]
    pub fn standard_catalog() -> Vec<Self> {
        STANDARD_SHAPES
            .iter()
            .map(|(name, rows)| {
                let matrix =
                    ShapeMatrix::from_rows(rows).expect("Standard shapes should be well-formed");
                Self::new(*name, matrix)
            })
            .collect()
    }
}

const STANDARD_SHAPES: [(&str, &[&[u8]]); 7] = [
    ("I", &[&[1, 1, 1, 1]]),
    ("O", &[&[1, 1], &[1, 1]]),
    ("T", &[&[0, 1, 0], &[1, 1, 1]]),
    ("J", &[&[1, 0, 0], &[1, 1, 1]]),
    ("L", &[&[0, 0, 1], &[1, 1, 1]]),
    ("Z", &[&[1, 1, 0], &[0, 1, 1]]),
    ("S", &[&[0, 1, 1], &[1, 1, 0]]),
];
