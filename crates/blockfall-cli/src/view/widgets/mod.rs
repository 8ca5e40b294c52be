use ratatui::{layout::Rect, widgets::Block as BlockWidget};

pub use self::{board_display::*, cell_display::*};

mod board_display;
mod cell_display;

mod color {
    use ratatui::style::Color;

    pub const GRAY: Color = Color::Rgb(127, 127, 127);
    pub const DARK_GRAY: Color = Color::Rgb(64, 64, 64);
    pub const BLACK: Color = Color::Rgb(0, 0, 0);
    pub const WHITE: Color = Color::Rgb(255, 255, 255);
    pub const RED: Color = Color::Rgb(255, 0, 0);
}

pub mod style {
    use blockfall_engine::ColorTag;
    use ratatui::style::{Color, Modifier, Style};

    use crate::view::widgets::color;

    const fn fg_bg(fg: Color, bg: Color) -> Style {
        Style::new().fg(fg).bg(bg)
    }

    const fn bg_only(color: Color) -> Style {
        Style::new().fg(color).bg(color)
    }

    pub const EMPTY_DOT: Style = fg_bg(color::DARK_GRAY, color::BLACK);
    pub const BORDER: Style = fg_bg(color::GRAY, color::BLACK);
    pub const HELP: Style = Style::new().fg(color::GRAY);
    pub const GAME_OVER: Style = fg_bg(color::WHITE, color::RED).add_modifier(Modifier::BOLD);

    /// Solid block in the color carried by a cell or piece.
    #[must_use]
    pub const fn filled(tag: ColorTag) -> Style {
        let (r, g, b) = tag.rgb();
        bg_only(Color::Rgb(r, g, b))
    }
}

fn block_vertical_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.height - inner_rect.height
}

fn block_horizontal_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.width - inner_rect.width
}
