use blockfall_engine::{Cell, ColorTag};
use ratatui::{
    prelude::{Buffer, Rect},
    style::Style,
    widgets::{Clear, Paragraph, Widget},
};

use crate::view::widgets::style;

/// One board cell, two terminal columns wide.
#[derive(Debug)]
pub struct CellDisplay {
    style: Style,
    symbol: &'static str,
}

impl CellDisplay {
    pub const fn new(style: Style, symbol: &'static str) -> Self {
        Self { style, symbol }
    }

    pub const fn width() -> u16 {
        2
    }

    pub const fn height() -> u16 {
        1
    }

    pub const fn from_cell(cell: Cell) -> Self {
        match cell {
            Cell::Empty => Self::new(style::EMPTY_DOT, "."),
            Cell::Filled(tag) => Self::from_color(tag),
        }
    }

    pub const fn from_color(tag: ColorTag) -> Self {
        Self::new(style::filled(tag), "")
    }
}

impl Widget for CellDisplay {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &CellDisplay {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        // Drop whatever was drawn underneath, then fill the whole area with the style
        Clear.render(area, buf);
        Paragraph::new(self.symbol)
            .style(self.style)
            .centered()
            .render(area, buf);
    }
}
