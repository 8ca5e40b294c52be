use std::time::Duration;

use blockfall_engine::{Game, Intent};
use crossterm::event::{Event, KeyCode, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout},
    text::{Line, Text},
    widgets::{Block, Clear},
};

use crate::{
    tui::{App, Runtime},
    view::widgets::{BoardDisplay, style},
};

const FPS: f64 = 60.0;

#[derive(Debug)]
pub struct PlayApp {
    game: Game,
    is_exiting: bool,
}

impl PlayApp {
    pub fn new(game: Game) -> Self {
        Self {
            game,
            is_exiting: false,
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    fn help_text(&self) -> &'static str {
        if self.game.is_game_over() {
            "Controls: R (Restart) | Q (Quit)"
        } else {
            "Controls: ← → (Move) | ↓ (Soft Drop) | ↑ (Rotate) | Q (Quit)"
        }
    }
}

impl App for PlayApp {
    fn init(&mut self, runtime: &mut Runtime) {
        runtime.set_tick_rate(FPS);
        runtime.set_frame_rate(FPS);
    }

    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, event: &Event) {
        let is_playing = !self.game.is_game_over();

        if let Some(event) = event.as_key_event() {
            match event.code {
                KeyCode::Left if is_playing => _ = self.game.apply_intent(Intent::MoveLeft),
                KeyCode::Right if is_playing => _ = self.game.apply_intent(Intent::MoveRight),
                KeyCode::Down if is_playing => _ = self.game.apply_intent(Intent::SoftDrop),
                KeyCode::Up if is_playing => _ = self.game.apply_intent(Intent::Rotate),
                KeyCode::Char('r') if !is_playing => self.game.reset(),
                KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => {
                    self.is_exiting = true;
                }
                KeyCode::Char('q') | KeyCode::Esc => self.is_exiting = true,
                _ => {}
            }
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let stats = self.game.stats();
        let block = Block::bordered()
            .border_style(style::BORDER)
            .title(" blockfall ")
            .title_bottom(format!(
                " pieces {} | rows {} ",
                stats.completed_pieces(),
                stats.cleared_rows()
            ));
        let board = BoardDisplay::new(self.game.board())
            .falling_piece(self.game.active_piece())
            .block(block);

        let [main_area, help_area] = Layout::vertical([
            Constraint::Length(board.height()),
            Constraint::Length(1),
        ])
        .flex(Flex::Center)
        .areas(frame.area());
        let [board_area] = Layout::horizontal([Constraint::Length(board.width())])
            .flex(Flex::Center)
            .areas(main_area);
        frame.render_widget(&board, board_area);

        if self.game.is_game_over() {
            let banner = Line::from(" GAME OVER ").style(style::GAME_OVER);
            let banner_width = u16::try_from(banner.width()).unwrap_or(u16::MAX);
            let [banner_row] = Layout::vertical([Constraint::Length(1)])
                .flex(Flex::Center)
                .areas(main_area);
            let [banner_area] = Layout::horizontal([Constraint::Length(banner_width)])
                .flex(Flex::Center)
                .areas(banner_row);
            frame.render_widget(Clear, banner_area);
            frame.render_widget(banner, banner_area);
        }

        let help_text = Text::from(self.help_text())
            .style(style::HELP)
            .centered();
        frame.render_widget(help_text, help_area);
    }

    fn update(&mut self, elapsed: Duration) {
        self.game.advance(elapsed);
    }
}

#[cfg(test)]
mod tests {
    use blockfall_engine::{GameConfig, PiecePosition, Shape, SpawnSeed};
    use crossterm::event::KeyEvent;
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;

    fn o_app(rows: usize) -> PlayApp {
        let o = Shape::standard_catalog()
            .into_iter()
            .find(|shape| shape.name() == "O")
            .unwrap();
        let config = GameConfig::default()
            .with_rows(rows)
            .with_shape_catalog(vec![o]);
        PlayApp::new(Game::with_seed(config, SpawnSeed::from_u128(1)).unwrap())
    }

    fn press(app: &mut PlayApp, code: KeyCode) {
        app.handle_event(&Event::Key(KeyEvent::new(code, KeyModifiers::NONE)));
    }

    fn render(app: &PlayApp) -> String {
        let mut terminal = Terminal::new(TestBackend::new(70, 30)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn top_out(app: &mut PlayApp) {
        while !app.game().is_game_over() {
            app.update(Duration::from_secs(1));
        }
    }

    #[test]
    fn test_arrow_keys_drive_the_piece() {
        let mut app = o_app(20);
        assert_eq!(app.game().active_piece().position(), PiecePosition::new(4, 0));

        press(&mut app, KeyCode::Left);
        assert_eq!(app.game().active_piece().position(), PiecePosition::new(3, 0));
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.game().active_piece().position(), PiecePosition::new(5, 0));
        press(&mut app, KeyCode::Down);
        assert_eq!(app.game().active_piece().position(), PiecePosition::new(5, 1));
        press(&mut app, KeyCode::Up);
        assert_eq!(app.game().active_piece().position(), PiecePosition::new(5, 1));
    }

    #[test]
    fn test_update_feeds_elapsed_time() {
        let mut app = o_app(20);
        app.update(Duration::from_millis(300));
        assert_eq!(app.game().fall_elapsed(), Duration::from_millis(300));
        app.update(Duration::from_millis(300));
        assert_eq!(app.game().active_piece().position().row(), 1);
    }

    #[test]
    fn test_restart_only_after_game_over() {
        let mut app = o_app(4);
        press(&mut app, KeyCode::Char('r'));
        assert!(!app.game().is_game_over());

        top_out(&mut app);
        assert!(render(&app).contains("GAME OVER"));
        assert!(render(&app).contains("R (Restart)"));

        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Char('r'));
        assert!(!app.game().is_game_over());
        assert!(app.game().board().is_empty());
        assert!(!render(&app).contains("GAME OVER"));
    }

    #[test]
    fn test_quit_keys() {
        for code in [KeyCode::Char('q'), KeyCode::Esc] {
            let mut app = o_app(20);
            assert!(!app.should_exit());
            press(&mut app, code);
            assert!(app.should_exit());
        }

        let mut app = o_app(20);
        app.handle_event(&Event::Key(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL,
        )));
        assert!(app.should_exit());
    }

    #[test]
    fn test_draw_shows_board_and_help() {
        let app = o_app(20);
        let screen = render(&app);
        assert!(screen.contains("blockfall"));
        assert!(screen.contains("pieces 0 | rows 0"));
        assert!(screen.contains("(Soft Drop)"));
        assert!(!screen.contains("GAME OVER"));
    }
}
