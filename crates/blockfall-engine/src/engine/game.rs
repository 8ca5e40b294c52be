use std::time::Duration;

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::{
    ConfigError,
    core::{board::Board, piece::Piece},
};

use super::{GameConfig, GameStats, PieceSpawner, SpawnSeed};

/// Lifecycle state of a [`Game`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum GameState {
    /// A piece is active and descending.
    Falling,
    /// A freshly spawned piece collided. Only [`Game::reset`] leaves this
    /// state.
    GameOver,
}

/// A discrete player command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    MoveLeft,
    MoveRight,
    SoftDrop,
    Rotate,
}

impl Intent {
    pub const ALL: [Self; 4] = [Self::MoveLeft, Self::MoveRight, Self::SoftDrop, Self::Rotate];
}

/// What a gravity step did to the active piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum GravityOutcome {
    /// The piece moved down one row.
    Fell,
    /// The piece locked and the next piece spawned.
    Locked { cleared_rows: usize },
    /// The piece locked and the next piece collided on spawn.
    ToppedOut { cleared_rows: usize },
}

/// A single game: the board, the falling piece and the gravity clock.
///
/// `Game` never measures time. The driver passes elapsed wall time to
/// [`Game::advance`] and discrete commands to [`Game::apply_intent`], all from
/// one thread, and reads the state back for rendering.
///
/// While the game is over, intents and time are ignored; [`Game::reset`]
/// starts over on an empty board with the same configuration.
#[derive(Debug, Clone)]
pub struct Game<R = Pcg32> {
    config: GameConfig,
    board: Board,
    spawner: PieceSpawner<R>,
    active_piece: Piece,
    state: GameState,
    stats: GameStats,
    fall_elapsed: Duration,
}

impl Game {
    /// Creates a game whose spawn sequence is seeded from the thread-local
    /// random generator.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        Self::with_seed(config, rand::rng().random())
    }

    /// Like [`Self::new`], but with a reproducible spawn sequence.
    pub fn with_seed(config: GameConfig, seed: SpawnSeed) -> Result<Self, ConfigError> {
        config.validate()?;
        let spawner = PieceSpawner::with_seed(&config, seed)?;
        Ok(Self::with_spawner(config, spawner))
    }
}

impl<R> Game<R>
where
    R: Rng,
{
    /// Creates a game drawing pieces from the given random source.
    pub fn with_rng(config: GameConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let spawner = PieceSpawner::with_rng(&config, rng)?;
        Ok(Self::with_spawner(config, spawner))
    }

    fn with_spawner(config: GameConfig, mut spawner: PieceSpawner<R>) -> Self {
        let active_piece = spawner.spawn();
        let mut game = Self {
            board: Board::new(config.rows(), config.columns()),
            config,
            spawner,
            active_piece,
            state: GameState::Falling,
            stats: GameStats::new(),
            fall_elapsed: Duration::ZERO,
        };
        game.check_spawn();
        game
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn active_piece(&self) -> &Piece {
        &self.active_piece
    }

    #[must_use]
    pub fn state(&self) -> GameState {
        self.state
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    /// Time accumulated towards the next gravity step.
    #[must_use]
    pub fn fall_elapsed(&self) -> Duration {
        self.fall_elapsed
    }

    /// Applies a player command to the active piece.
    ///
    /// The move is undone when the piece would collide. Returns whether the
    /// piece changed; always `false` once the game is over.
    pub fn apply_intent(&mut self, intent: Intent) -> bool {
        if self.is_game_over() {
            tracing::trace!(?intent, "intent ignored after game over");
            return false;
        }
        let applied = match intent {
            Intent::MoveLeft => self.try_translate(-1, 0),
            Intent::MoveRight => self.try_translate(1, 0),
            Intent::SoftDrop => self.try_translate(0, 1),
            Intent::Rotate => self.try_rotate(),
        };
        if !applied {
            tracing::trace!(?intent, "intent rejected by collision");
        }
        applied
    }

    /// Adds elapsed time to the gravity clock.
    ///
    /// When the accumulated time is strictly greater than the fall interval,
    /// performs one gravity step and returns its outcome. The clock restarts
    /// from zero after a step; any excess is dropped.
    pub fn advance(&mut self, elapsed: Duration) -> Option<GravityOutcome> {
        if self.is_game_over() {
            return None;
        }
        self.fall_elapsed = self.fall_elapsed.saturating_add(elapsed);
        if self.fall_elapsed > self.config.fall_interval() {
            return self.step_gravity();
        }
        None
    }

    /// Performs one gravity step regardless of the clock.
    ///
    /// The piece moves down one row, or when blocked it locks onto the board,
    /// full rows are cleared and the next piece spawns. Returns `None` once
    /// the game is over.
    pub fn step_gravity(&mut self) -> Option<GravityOutcome> {
        if self.is_game_over() {
            return None;
        }
        self.fall_elapsed = Duration::ZERO;

        if self.try_translate(0, 1) {
            return Some(GravityOutcome::Fell);
        }

        self.board.fill_piece(&self.active_piece);
        let cleared_rows = self.board.clear_rows();
        self.stats.complete_piece_drop(cleared_rows);
        tracing::debug!(
            cleared_rows,
            completed_pieces = self.stats.completed_pieces(),
            "piece locked"
        );

        self.active_piece = self.spawner.spawn();
        if self.check_spawn() {
            Some(GravityOutcome::Locked { cleared_rows })
        } else {
            Some(GravityOutcome::ToppedOut { cleared_rows })
        }
    }

    /// Starts over with an empty board, zeroed counters and a new piece.
    ///
    /// The spawn sequence continues from the current random state.
    pub fn reset(&mut self) {
        self.board = Board::new(self.config.rows(), self.config.columns());
        self.stats = GameStats::new();
        self.fall_elapsed = Duration::ZERO;
        self.state = GameState::Falling;
        self.active_piece = self.spawner.spawn();
        tracing::debug!("game reset");
        self.check_spawn();
    }

    /// Ends the game if the freshly spawned piece collides.
    ///
    /// Returns whether the spawn is valid.
    fn check_spawn(&mut self) -> bool {
        let position = self.active_piece.position();
        if self.board.is_colliding(&self.active_piece) {
            self.state = GameState::GameOver;
            tracing::info!(
                completed_pieces = self.stats.completed_pieces(),
                cleared_rows = self.stats.cleared_rows(),
                "game over"
            );
            return false;
        }
        tracing::debug!(
            column = position.column(),
            row = position.row(),
            color = %self.active_piece.color(),
            "piece spawned"
        );
        true
    }

    fn try_translate(&mut self, dx: i32, dy: i32) -> bool {
        self.active_piece.translate(dx, dy);
        if self.board.is_colliding(&self.active_piece) {
            self.active_piece.translate(-dx, -dy);
            return false;
        }
        true
    }

    fn try_rotate(&mut self) -> bool {
        self.active_piece.rotate();
        if self.board.is_colliding(&self.active_piece) {
            self.active_piece.undo_rotation();
            return false;
        }
        true
    }
}
