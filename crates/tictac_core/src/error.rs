//! Error types for the tic-tac-toe engine.
//!
//! The engine is total under its preconditions. These errors are the
//! explicit failed-precondition signals callers get instead of a corrupted
//! board.

use crate::types::Position;
use derive_more::{Display, Error};

/// Error that can occur when validating or applying a move.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum MoveError {
    /// The game has already been won or drawn.
    #[display("Game is already over")]
    GameOver,

    /// The square at the position is already occupied.
    #[display("Square {} is already occupied", _0)]
    SquareOccupied(#[error(not(source))] Position),

    /// Row or column outside `0..=2`.
    #[display("Position ({}, {}) is outside the 3x3 board", row, column)]
    InvalidPosition {
        /// Requested row.
        row: usize,
        /// Requested column.
        column: usize,
    },

    /// A postcondition failed after a move was applied.
    #[display("Invariant violation: {}", _0)]
    ContractViolation(#[error(not(source))] String),

    /// The search could not pick a move for a computer player.
    #[display("Computer move failed: {}", _0)]
    Search(SearchError),
}

/// Error returned when the search is asked to move on a finished board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum SearchError {
    /// No empty cell is left to play.
    #[display("Board has no empty cell to play")]
    BoardFull,

    /// A line is already complete.
    #[display("Board already has a winner")]
    GameAlreadyWon,
}

/// Error returned when a textual board cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Cannot parse board: {}", reason)]
pub struct ParseBoardError {
    /// What was wrong with the input.
    pub reason: String,
}

impl ParseBoardError {
    pub(crate) fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Error returned when a position cannot be parsed from user input.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Cannot parse position from {:?}", input)]
pub struct ParsePositionError {
    /// The rejected input.
    pub input: String,
}
