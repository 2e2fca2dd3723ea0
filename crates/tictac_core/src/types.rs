//! Core domain types for tic-tac-toe.

use crate::error::{MoveError, ParsePositionError};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::instrument;

/// Mark a player records moves with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum Mark {
    /// Mark X (moves first).
    X,
    /// Mark O (moves second).
    O,
}

impl Mark {
    /// Returns the opponent's mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

/// A cell on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    /// Nobody has played here.
    #[default]
    Empty,
    /// Cell claimed by a mark.
    Occupied(Mark),
}

impl Cell {
    /// Returns the mark in this cell, if any.
    pub fn mark(self) -> Option<Mark> {
        match self {
            Cell::Empty => None,
            Cell::Occupied(mark) => Some(mark),
        }
    }
}

/// Terminal verdict of a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// A mark completed a line.
    Winner(Mark),
    /// The board filled up without a line.
    Draw,
}

impl Outcome {
    /// Returns the winning mark if there is one.
    pub fn winner(&self) -> Option<Mark> {
        match self {
            Outcome::Winner(mark) => Some(*mark),
            Outcome::Draw => None,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Winner(mark) => write!(f, "{} wins", mark),
            Outcome::Draw => write!(f, "Draw"),
        }
    }
}

/// Strength of a computer-controlled player.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Difficulty {
    /// Wins or blocks when it can, otherwise random.
    #[default]
    Normal,
    /// Adds opening and fork play.
    Hard,
    /// Adds fork defence and forcing moves.
    Expert,
}

/// A cell coordinate on the 3x3 board.
///
/// Rows and columns are always in `0..=2`; the only way to build a
/// `Position` is through a checked constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawPosition")]
pub struct Position {
    row: u8,
    column: u8,
}

#[derive(Deserialize)]
struct RawPosition {
    row: usize,
    column: usize,
}

impl TryFrom<RawPosition> for Position {
    type Error = MoveError;

    fn try_from(raw: RawPosition) -> Result<Self, Self::Error> {
        Position::new(raw.row, raw.column)
    }
}

impl Position {
    /// The center cell.
    pub const CENTER: Position = Position::at(1, 1);

    /// The four corners, row-major.
    pub const CORNERS: [Position; 4] = [
        Position::at(0, 0),
        Position::at(0, 2),
        Position::at(2, 0),
        Position::at(2, 2),
    ];

    /// All nine cells in row-major order.
    pub const ALL: [Position; 9] = [
        Position::at(0, 0),
        Position::at(0, 1),
        Position::at(0, 2),
        Position::at(1, 0),
        Position::at(1, 1),
        Position::at(1, 2),
        Position::at(2, 0),
        Position::at(2, 1),
        Position::at(2, 2),
    ];

    const fn at(row: u8, column: u8) -> Self {
        Self { row, column }
    }

    /// Creates a position, rejecting coordinates outside the board.
    #[instrument]
    pub fn new(row: usize, column: usize) -> Result<Self, MoveError> {
        if row > 2 || column > 2 {
            return Err(MoveError::InvalidPosition { row, column });
        }
        Ok(Self::at(row as u8, column as u8))
    }

    /// Creates a position from a row-major board index (0-8).
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Row-major board index (0-8).
    pub fn index(self) -> usize {
        self.row as usize * 3 + self.column as usize
    }

    /// Row (0-2).
    pub fn row(self) -> usize {
        self.row as usize
    }

    /// Column (0-2).
    pub fn column(self) -> usize {
        self.column as usize
    }

    /// Human-readable name of the cell.
    pub fn label(self) -> &'static str {
        const LABELS: [&str; 9] = [
            "Top-left",
            "Top-center",
            "Top-right",
            "Middle-left",
            "Center",
            "Middle-right",
            "Bottom-left",
            "Bottom-center",
            "Bottom-right",
        ];
        LABELS[self.index()]
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{} {}]", self.row, self.column)
    }
}

impl FromStr for Position {
    type Err = ParsePositionError;

    /// Accepts a cell number `1`-`9`, a `row column` pair (`"1 2"`, `"1,2"`),
    /// or a label such as `"center"` or `"top-left"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParsePositionError {
            input: s.to_string(),
        };
        let trimmed = s.trim();

        let parts: Vec<&str> = trimmed
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|p| !p.is_empty())
            .collect();
        match parts.as_slice() {
            [number] if number.chars().all(|c| c.is_ascii_digit()) => {
                let number: usize = number.parse().map_err(|_| err())?;
                return number
                    .checked_sub(1)
                    .and_then(Position::from_index)
                    .ok_or_else(err);
            }
            [row, column] => {
                let row: usize = row.parse().map_err(|_| err())?;
                let column: usize = column.parse().map_err(|_| err())?;
                return Position::new(row, column).map_err(|_| err());
            }
            _ => {}
        }

        let wanted = trimmed.to_lowercase();
        Position::ALL
            .into_iter()
            .find(|pos| pos.label().to_lowercase() == wanted)
            .ok_or_else(err)
    }
}

/// One of the two participants and how its moves are produced.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_new::new,
)]
pub struct Player {
    mark: Mark,
    is_computer: bool,
    difficulty: Option<Difficulty>,
}

impl Player {
    /// A human player for `mark`.
    pub fn human(mark: Mark) -> Self {
        Self::new(mark, false, None)
    }

    /// A computer player for `mark` at the given difficulty.
    pub fn computer(mark: Mark, difficulty: Difficulty) -> Self {
        Self::new(mark, true, Some(difficulty))
    }

    /// The mark this player records moves with.
    pub fn mark(&self) -> Mark {
        self.mark
    }

    /// Whether moves are chosen by the search.
    pub fn is_computer(&self) -> bool {
        self.is_computer
    }

    /// Configured difficulty, if any.
    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }

    /// Difficulty the search plays at. Unset means Normal.
    pub fn effective_difficulty(&self) -> Difficulty {
        self.difficulty.unwrap_or_default()
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_computer {
            write!(f, "{} (computer, {})", self.mark, self.effective_difficulty())
        } else {
            write!(f, "{} (human)", self.mark)
        }
    }
}
