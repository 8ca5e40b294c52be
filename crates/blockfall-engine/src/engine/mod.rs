//! Game rules on top of the [`core`](crate::core) data structures.
//!
//! - [`GameConfig`] - Board size, fall interval, shape catalog and palette
//! - [`PieceSpawner`] - Random shape and color selection from an owned RNG
//! - [`SpawnSeed`] - Seed for a reproducible spawn sequence
//! - [`Game`] - The falling/game-over state machine driven by a front end
//! - [`GameStats`] - Locked piece and cleared row counters
//!
//! # Game Flow
//!
//! 1. Build a [`Game`] from a validated [`GameConfig`]; the first piece
//!    spawns centered on row `0`
//! 2. The driver forwards player input as [`Intent`]s and elapsed wall time
//!    through [`Game::advance`]
//! 3. Once the accumulated time exceeds the fall interval the piece drops one
//!    row, or locks, clears full rows and the next piece spawns
//! 4. A spawn that collides immediately ends the game until [`Game::reset`]
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use blockfall_engine::{Game, GameConfig, Intent, SpawnSeed};
//!
//! let mut game = Game::with_seed(GameConfig::default(), SpawnSeed::from_u128(42)).unwrap();
//! let row = game.active_piece().position().row();
//!
//! game.apply_intent(Intent::MoveLeft);
//! game.apply_intent(Intent::Rotate);
//!
//! game.advance(Duration::from_millis(300));
//! assert_eq!(game.active_piece().position().row(), row);
//! game.advance(Duration::from_millis(300));
//! assert_eq!(game.active_piece().position().row(), row + 1);
//! ```

pub use self::{config::*, game::*, game_stats::*, piece_spawner::*};

mod config;
mod game;
mod game_stats;
mod piece_spawner;
