//! Win detection logic for tic-tac-toe.

use crate::board::Board;
use crate::types::{Cell, Mark, Position};

/// The eight lines in evaluation order: rows, then columns, then diagonals.
pub const LINES: [[Position; 3]; 8] = {
    let [a, b, c, d, e, f, g, h, i] = Position::ALL;
    [
        // Rows
        [a, b, c],
        [d, e, f],
        [g, h, i],
        // Columns
        [a, d, g],
        [b, e, h],
        [c, f, i],
        // Diagonals
        [a, e, i],
        [c, e, g],
    ]
};

/// Returns the mark if all three cells hold it.
pub fn line_winner(cells: [Cell; 3]) -> Option<Mark> {
    match cells {
        [Cell::Occupied(a), Cell::Occupied(b), Cell::Occupied(c)] if a == b && b == c => Some(a),
        _ => None,
    }
}

/// Checks if there is a completed line on the board.
///
/// Returns `Some(mark)` for the first line (in [`LINES`] order) holding
/// three equal marks, `None` otherwise.
pub fn check_winner(board: &Board) -> Option<Mark> {
    LINES
        .iter()
        .find_map(|[a, b, c]| line_winner([board.get(*a), board.get(*b), board.get(*c)]))
}
