use serde::{Deserialize, Serialize};

/// Counters of a running game.
///
/// Only what happened is counted; there is no score and no level.
///
/// # Example
///
/// ```
/// use blockfall_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.complete_piece_drop(0);
/// stats.complete_piece_drop(2);
///
/// assert_eq!(stats.completed_pieces(), 2);
/// assert_eq!(stats.cleared_rows(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GameStats {
    completed_pieces: usize,
    cleared_rows: usize,
}

impl GameStats {
    /// Creates a tracker with all counters at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            completed_pieces: 0,
            cleared_rows: 0,
        }
    }

    /// Returns the number of pieces locked onto the board.
    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    /// Returns the number of rows cleared so far.
    #[must_use]
    pub const fn cleared_rows(&self) -> usize {
        self.cleared_rows
    }

    /// Records a locked piece and the rows its lock cleared.
    pub const fn complete_piece_drop(&mut self, cleared_rows: usize) {
        self.completed_pieces += 1;
        self.cleared_rows += cleared_rows;
    }
}
