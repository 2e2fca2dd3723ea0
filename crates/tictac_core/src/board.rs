//! The 3x3 board value.

use crate::error::ParseBoardError;
use crate::types::{Cell, Mark, Position};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// 3x3 tic-tac-toe board.
///
/// Boards are values: placing a mark returns a new board and leaves the
/// original untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Board {
    /// Cells in row-major order (0-8).
    cells: [Cell; 9],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; 9],
        }
    }

    /// Gets the cell at the given position.
    pub fn get(&self, pos: Position) -> Cell {
        self.cells[pos.index()]
    }

    /// Checks if a cell is empty.
    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos) == Cell::Empty
    }

    /// Returns a copy of this board with `mark` placed at `pos`.
    ///
    /// The caller is responsible for `pos` being empty; game-level
    /// operations check this before calling.
    pub fn with_mark(&self, pos: Position, mark: Mark) -> Self {
        let mut next = *self;
        next.cells[pos.index()] = Cell::Occupied(mark);
        next
    }

    /// Returns all cells as a slice.
    pub fn cells(&self) -> &[Cell; 9] {
        &self.cells
    }

    /// Every empty cell, row-major.
    pub fn empty_positions(&self) -> Vec<Position> {
        Position::ALL
            .into_iter()
            .filter(|pos| self.is_empty(*pos))
            .collect()
    }

    /// Number of cells holding `mark`.
    pub fn count_marks(&self, mark: Mark) -> usize {
        self.cells
            .iter()
            .filter(|cell| **cell == Cell::Occupied(mark))
            .count()
    }

    /// Formats the board with cell numbers in the empty squares.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for row in 0..3 {
            for col in 0..3 {
                let index = row * 3 + col;
                let symbol = match self.cells[index] {
                    Cell::Empty => (index + 1).to_string(),
                    Cell::Occupied(mark) => mark.to_string(),
                };
                result.push_str(&symbol);
                if col < 2 {
                    result.push('|');
                }
            }
            if row < 2 {
                result.push_str("\n-+-+-\n");
            }
        }
        result
    }
}

impl FromStr for Board {
    type Err = ParseBoardError;

    /// Parses nine cells written as `X`, `O`/`0`, and `.`/`-`/`_` for empty.
    /// Whitespace and `|` separators are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut cells = [Cell::Empty; 9];
        let mut count = 0;
        for c in s.chars().filter(|c| !c.is_whitespace() && *c != '|') {
            let cell = match c {
                'X' | 'x' => Cell::Occupied(Mark::X),
                'O' | 'o' | '0' => Cell::Occupied(Mark::O),
                '.' | '-' | '_' => Cell::Empty,
                other => {
                    return Err(ParseBoardError::new(format!("unexpected character {:?}", other)));
                }
            };
            if count == 9 {
                return Err(ParseBoardError::new("more than nine cells"));
            }
            cells[count] = cell;
            count += 1;
        }
        if count != 9 {
            return Err(ParseBoardError::new(format!("expected nine cells, found {}", count)));
        }
        Ok(Self { cells })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new();
        assert_eq!(board.empty_positions(), Position::ALL.to_vec());
        assert_eq!(board.count_marks(Mark::X), 0);
    }

    #[test]
    fn test_with_mark_leaves_original() {
        let board = Board::new();
        let next = board.with_mark(Position::CENTER, Mark::X);
        assert!(board.is_empty(Position::CENTER));
        assert_eq!(next.get(Position::CENTER), Cell::Occupied(Mark::X));
    }

    #[test]
    fn test_empty_positions_row_major() {
        let board: Board = "X.O .X. O..".parse().unwrap();
        let indices: Vec<usize> = board.empty_positions().iter().map(|p| p.index()).collect();
        assert_eq!(indices, vec![1, 3, 5, 7, 8]);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!("XXX".parse::<Board>().is_err());
        assert!("XXXOOOXXXO".parse::<Board>().is_err());
        assert!("XXXOOOXX?".parse::<Board>().is_err());
    }

    #[test]
    fn test_display() {
        let board: Board = "X.. .O. ...".parse().unwrap();
        assert_eq!(board.display(), "X|2|3\n-+-+-\n4|O|6\n-+-+-\n7|8|9");
    }
}
