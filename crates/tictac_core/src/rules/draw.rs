//! Full-board detection.

use crate::board::Board;

/// True when no empty cell is left.
///
/// Only a draw if [`check_winner`](super::check_winner) finds no line.
pub fn is_full(board: &Board) -> bool {
    board.cells().iter().all(|cell| cell.mark().is_some())
}
