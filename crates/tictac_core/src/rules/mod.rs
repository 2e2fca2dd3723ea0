//! Game rules for tic-tac-toe.
//!
//! Pure functions evaluating a board. Rules are kept apart from board
//! storage so the search can call them on scratch boards.

pub mod draw;
pub mod win;

pub use draw::is_full;
pub use win::{LINES, check_winner, line_winner};

use crate::board::Board;
use crate::types::Outcome;

/// Terminal verdict of the board.
///
/// Returns `Some(Outcome::Winner(mark))` if a line is complete,
/// `Some(Outcome::Draw)` if the board is full without one, and `None`
/// while the game is still open.
pub fn winner(board: &Board) -> Option<Outcome> {
    if let Some(mark) = check_winner(board) {
        return Some(Outcome::Winner(mark));
    }
    is_full(board).then_some(Outcome::Draw)
}
