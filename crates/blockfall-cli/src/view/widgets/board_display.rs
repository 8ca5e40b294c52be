use blockfall_engine::{Board, Piece};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    widgets::{Block as BlockWidget, BlockExt, Widget},
};

use crate::view::widgets::CellDisplay;

/// Renders the board grid with the falling piece drawn over it.
///
/// The size follows the board's dimensions; cells that do not fit in the
/// render area are clipped.
#[derive(Debug)]
pub struct BoardDisplay<'a> {
    board: &'a Board,
    falling_piece: Option<&'a Piece>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(board: &'a Board) -> Self {
        Self {
            board,
            falling_piece: None,
            block: None,
        }
    }

    pub fn falling_piece(self, piece: &'a Piece) -> Self {
        Self {
            falling_piece: Some(piece),
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        grid_length(self.board.num_columns(), CellDisplay::width())
            .saturating_add(super::block_horizontal_margin(self.block.as_ref()))
    }

    pub fn height(&self) -> u16 {
        grid_length(self.board.num_rows(), CellDisplay::height())
            .saturating_add(super::block_vertical_margin(self.block.as_ref()))
    }
}

fn grid_length(cells: usize, cell_length: u16) -> u16 {
    u16::try_from(cells)
        .unwrap_or(u16::MAX)
        .saturating_mul(cell_length)
}

/// Screen rectangle of the cell at `(row, column)`, clipped to `area`.
fn cell_rect(area: Rect, row: usize, column: usize) -> Option<Rect> {
    let x = u16::try_from(column)
        .ok()?
        .checked_mul(CellDisplay::width())?
        .checked_add(area.x)?;
    let y = u16::try_from(row)
        .ok()?
        .checked_mul(CellDisplay::height())?
        .checked_add(area.y)?;
    let rect = Rect::new(x, y, CellDisplay::width(), CellDisplay::height()).intersection(area);
    (!rect.is_empty()).then_some(rect)
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        for (row, cells) in self.board.rows().enumerate() {
            for (column, cell) in cells.iter().enumerate() {
                if let Some(rect) = cell_rect(area, row, column) {
                    CellDisplay::from_cell(*cell).render(rect, buf);
                }
            }
        }

        if let Some(piece) = self.falling_piece {
            let display = CellDisplay::from_color(piece.color());
            for (column, row) in piece.occupied_positions() {
                let (Ok(column), Ok(row)) = (usize::try_from(column), usize::try_from(row)) else {
                    continue;
                };
                if let Some(rect) = cell_rect(area, row, column) {
                    Widget::render(&display, rect, buf);
                }
            }
        }
    }
}
