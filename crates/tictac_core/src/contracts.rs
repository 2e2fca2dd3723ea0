//! Contract-based validation for moves.
//!
//! Contracts formalize the Hoare-style reasoning around a move:
//! `{P(snapshot, position)} apply_move {Q(before, after)}`.
//! Preconditions are always checked; postconditions run in debug builds.

use crate::board::Board;
use crate::error::MoveError;
use crate::game::GameSnapshot;
use crate::rules;
use crate::types::{Cell, Mark, Outcome, Position};
use tracing::{instrument, warn};

/// A contract defines preconditions and postconditions for state transitions.
pub trait Contract<S, A> {
    /// Checks preconditions before applying the action.
    fn pre(state: &S, action: &A) -> Result<(), MoveError>;

    /// Checks postconditions after applying the action.
    fn post(before: &S, after: &S) -> Result<(), MoveError>;
}

// ─────────────────────────────────────────────────────────────
//  Move Preconditions
// ─────────────────────────────────────────────────────────────

/// Precondition: the game must still be open.
pub struct GameNotOver;

impl GameNotOver {
    /// Fails with [`MoveError::GameOver`] on a finished game.
    pub fn check(snapshot: &GameSnapshot) -> Result<(), MoveError> {
        if snapshot.is_over() {
            Err(MoveError::GameOver)
        } else {
            Ok(())
        }
    }
}

/// Precondition: the target cell must be empty.
pub struct SquareIsEmpty;

impl SquareIsEmpty {
    /// Fails with [`MoveError::SquareOccupied`] on a taken cell.
    pub fn check(position: Position, snapshot: &GameSnapshot) -> Result<(), MoveError> {
        if snapshot.board().is_empty(position) {
            Ok(())
        } else {
            Err(MoveError::SquareOccupied(position))
        }
    }
}

/// Composite precondition: the game is open and the cell is empty.
pub struct LegalMove;

impl LegalMove {
    /// Validates all preconditions for a move.
    #[instrument(skip(snapshot))]
    pub fn check(position: Position, snapshot: &GameSnapshot) -> Result<(), MoveError> {
        GameNotOver::check(snapshot)?;
        SquareIsEmpty::check(position, snapshot)?;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────
//  Move Contract (Pre + Post)
// ─────────────────────────────────────────────────────────────

/// Contract for [`GameSnapshot::apply_move`].
///
/// Postconditions:
/// - the board only gained exactly one mark, nothing was overwritten
/// - mark counts stay balanced (X never behind, never two ahead)
/// - the verdict fields agree with the board
/// - the turn passed to the other mark while the game is open
pub struct MoveContract;

impl Contract<GameSnapshot, Position> for MoveContract {
    fn pre(snapshot: &GameSnapshot, position: &Position) -> Result<(), MoveError> {
        LegalMove::check(*position, snapshot)
    }

    fn post(before: &GameSnapshot, after: &GameSnapshot) -> Result<(), MoveError> {
        let mut violations = Vec::new();

        if !BoardMonotonic::holds(before.board(), after.board()) {
            violations.push("board must gain exactly one mark and keep the others");
        }
        if !BoardConsistent::holds(after.board()) {
            violations.push("mark counts must stay balanced");
        }
        if !VerdictConsistent::holds(after) {
            violations.push("verdict must agree with the board");
        }
        if !after.is_over() {
            let alternated = match (before.current_player(), after.current_player()) {
                (Some(prev), Some(next)) => prev.mark() != next.mark(),
                _ => false,
            };
            if !alternated {
                violations.push("turn must pass to the other mark");
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            warn!(?violations, "Move postcondition failed");
            Err(MoveError::ContractViolation(violations.join("; ")))
        }
    }
}

// ─────────────────────────────────────────────────────────────
//  Invariants
// ─────────────────────────────────────────────────────────────

/// Invariant: cells only go from empty to marked, one per move.
pub struct BoardMonotonic;

impl BoardMonotonic {
    /// True when `after` equals `before` plus exactly one new mark.
    pub fn holds(before: &Board, after: &Board) -> bool {
        let mut added = 0;
        for (was, now) in before.cells().iter().zip(after.cells()) {
            match (was, now) {
                (Cell::Empty, Cell::Occupied(_)) => added += 1,
                (was, now) if was == now => {}
                _ => return false,
            }
        }
        added == 1
    }
}

/// Invariant: X moves first, so X has as many marks as O or one more.
pub struct BoardConsistent;

impl BoardConsistent {
    /// Checks the X/O balance of `board`.
    pub fn holds(board: &Board) -> bool {
        let x_count = board.count_marks(Mark::X);
        let o_count = board.count_marks(Mark::O);
        x_count == o_count || x_count == o_count + 1
    }
}

/// Invariant: `is_over`, `winner` and `current_player` agree with the board.
pub struct VerdictConsistent;

impl VerdictConsistent {
    /// Checks the snapshot's verdict fields against [`rules::winner`].
    pub fn holds(snapshot: &GameSnapshot) -> bool {
        let verdict = rules::winner(snapshot.board());
        let winner_mark = snapshot.winner().map(|p| p.mark());
        match verdict {
            None => !snapshot.is_over() && snapshot.current_player().is_some() && winner_mark.is_none(),
            Some(Outcome::Draw) => {
                snapshot.is_over() && snapshot.current_player().is_none() && winner_mark.is_none()
            }
            Some(Outcome::Winner(mark)) => {
                snapshot.is_over() && snapshot.current_player().is_none() && winner_mark == Some(mark)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precondition_empty_square() {
        let game = GameSnapshot::start_new_game(None);
        assert!(MoveContract::pre(&game, &Position::CENTER).is_ok());
    }

    #[test]
    fn test_precondition_occupied_square() {
        let game = GameSnapshot::start_new_game(None)
            .apply_move(Position::CENTER)
            .unwrap();
        assert_eq!(
            MoveContract::pre(&game, &Position::CENTER),
            Err(MoveError::SquareOccupied(Position::CENTER))
        );
    }

    #[test]
    fn test_precondition_game_over() {
        let mut game = GameSnapshot::start_new_game(None);
        for index in [0, 3, 1, 4, 2] {
            game = game.apply_move(Position::from_index(index).unwrap()).unwrap();
        }
        assert!(game.is_over());
        assert_eq!(
            MoveContract::pre(&game, &Position::from_index(8).unwrap()),
            Err(MoveError::GameOver)
        );
    }

    #[test]
    fn test_postcondition_holds_after_move() {
        let before = GameSnapshot::start_new_game(None);
        let after = before.apply_move(Position::CENTER).unwrap();
        assert!(MoveContract::post(&before, &after).is_ok());
    }

    #[test]
    fn test_postcondition_detects_no_move() {
        let before = GameSnapshot::start_new_game(None);
        assert!(matches!(
            MoveContract::post(&before, &before),
            Err(MoveError::ContractViolation(_))
        ));
    }

    #[test]
    fn test_monotonic_rejects_overwrite() {
        let before: Board = "X.. ... ...".parse().unwrap();
        let after: Board = "O.. .X. ...".parse().unwrap();
        assert!(!BoardMonotonic::holds(&before, &after));
        let after: Board = "X.. .O. ...".parse().unwrap();
        assert!(BoardMonotonic::holds(&before, &after));
    }

    #[test]
    fn test_board_consistency() {
        assert!(BoardConsistent::holds(&"X.. ... ...".parse().unwrap()));
        assert!(BoardConsistent::holds(&"XO. ... ...".parse().unwrap()));
        assert!(!BoardConsistent::holds(&"O.. ... ...".parse().unwrap()));
        assert!(!BoardConsistent::holds(&"XX. ... ...".parse().unwrap()));
    }
}
