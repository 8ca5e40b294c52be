//! Simulation core of a falling-block puzzle game.
//!
//! The crate is split in two layers:
//!
//! - [`core`] holds the data structures: shape matrices, color tags, the
//!   [`Board`] grid and the falling [`Piece`].
//! - [`engine`] drives them: [`GameConfig`], the random [`PieceSpawner`] and
//!   the [`Game`] state machine that a front end feeds with intents and
//!   elapsed time.
//!
//! Nothing here draws, sleeps or reads the clock. A driver owns a [`Game`],
//! calls [`Game::apply_intent`] and [`Game::advance`] from its own loop and
//! renders whatever [`Game::board`] and [`Game::active_piece`] report.

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// Error returned when a shape matrix is malformed.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ShapeError {
    #[display("shape matrix has no cells")]
    Empty,
    #[display("shape matrix row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[display("shape matrix cell ({x}, {y}) is {value}, expected 0 or 1")]
    InvalidCell { x: usize, y: usize, value: u8 },
    #[display("shape matrix has no occupied cell")]
    NoOccupiedCell,
}

/// Error returned when a [`GameConfig`] cannot describe a playable game.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("board must have at least one row")]
    ZeroRows,
    #[display("board must have at least one column")]
    ZeroColumns,
    #[display("fall interval must be greater than zero")]
    ZeroFallInterval,
    #[display("shape catalog is empty")]
    EmptyShapeCatalog,
    #[display("color palette is empty")]
    EmptyColorPalette,
    #[display("shape {name:?} is {width} cells wide but the board has {columns} columns")]
    ShapeTooWide {
        name: String,
        width: usize,
        columns: usize,
    },
    #[display("shape {name:?} is {height} cells tall but the board has {rows} rows")]
    ShapeTooTall {
        name: String,
        height: usize,
        rows: usize,
    },
}
