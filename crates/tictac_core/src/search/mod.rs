//! Heuristic move search for computer players.
//!
//! Every tier first takes an immediate win, then blocks an immediate loss.
//! What follows depends on the difficulty:
//!
//! - **Normal** plays a random empty cell.
//! - **Hard** answers its first move with center-or-corner, then looks for
//!   forks.
//! - **Expert** opens center-or-corner, plays forks, defends against the
//!   opponent's forks (directly or with a forcing move), and only then
//!   falls back to the opening rule and random play.
//!
//! The search looks at most two plies ahead. It is fast and strong but not
//! a full game-tree search.

pub mod tactics;

use crate::board::Board;
use crate::error::SearchError;
use crate::rules;
use crate::types::{Difficulty, Mark, Outcome, Player, Position};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tactics::{
    center_or_corner, find_fork_move, find_forcing_move, find_immediate_block, find_immediate_win,
    random_empty,
};
use tracing::{debug, instrument};

/// Why the search picked a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Tactic {
    /// Completes a line.
    Win,
    /// Stops the opponent completing a line.
    Block,
    /// Center, or a corner when the center is taken.
    Opening,
    /// Creates two threats at once.
    Fork,
    /// Takes the cell the opponent would fork on.
    ForkBlock,
    /// Makes a threat whose forced answer gives the opponent no fork.
    Forcing,
    /// Uniform random empty cell.
    Random,
}

/// A chosen move and the tactic that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_new::new)]
pub struct Decision {
    /// Cell to play.
    pub position: Position,
    /// Rule of the ladder that fired.
    pub tactic: Tactic,
}

/// Chooses the next move for `player` on `board`.
///
/// # Errors
///
/// Returns [`SearchError::GameAlreadyWon`] if a line is already complete
/// and [`SearchError::BoardFull`] if no cell is left.
#[instrument(skip(board, rng), fields(mark = %player.mark(), difficulty = %player.effective_difficulty()))]
pub fn choose_move<R: Rng + ?Sized>(
    board: &Board,
    player: &Player,
    rng: &mut R,
) -> Result<Decision, SearchError> {
    match rules::winner(board) {
        Some(Outcome::Winner(_)) => return Err(SearchError::GameAlreadyWon),
        Some(Outcome::Draw) => return Err(SearchError::BoardFull),
        None => {}
    }

    let mark = player.mark();
    let decision = find_immediate_win(board, mark)
        .map(tagged(Tactic::Win))
        .or_else(|| find_immediate_block(board, mark).map(tagged(Tactic::Block)))
        .or_else(|| match player.effective_difficulty() {
            Difficulty::Normal => random_empty(board, rng).map(tagged(Tactic::Random)),
            Difficulty::Hard => hard_move(board, mark, rng),
            Difficulty::Expert => expert_move(board, mark, rng),
        })
        .ok_or(SearchError::BoardFull)?;

    debug!(
        row = decision.position.row(),
        column = decision.position.column(),
        tactic = %decision.tactic,
        "Search chose move"
    );
    Ok(decision)
}

fn hard_move<R: Rng + ?Sized>(board: &Board, mark: Mark, rng: &mut R) -> Option<Decision> {
    opening_move(board, mark, 1, rng)
        .or_else(|| find_fork_move(board, mark).map(tagged(Tactic::Fork)))
        .or_else(|| random_empty(board, rng).map(tagged(Tactic::Random)))
}

fn expert_move<R: Rng + ?Sized>(board: &Board, mark: Mark, rng: &mut R) -> Option<Decision> {
    opening_move(board, mark, 0, rng)
        .or_else(|| find_fork_move(board, mark).map(tagged(Tactic::Fork)))
        .or_else(|| defend_fork(board, mark))
        .or_else(|| opening_move(board, mark, 1, rng))
        .or_else(|| random_empty(board, rng).map(tagged(Tactic::Random)))
}

/// Center-or-corner, only when `mark` has played exactly `moves_played`
/// times.
fn opening_move<R: Rng + ?Sized>(
    board: &Board,
    mark: Mark,
    moves_played: usize,
    rng: &mut R,
) -> Option<Decision> {
    if board.count_marks(mark) != moves_played {
        return None;
    }
    center_or_corner(board, rng).map(tagged(Tactic::Opening))
}

/// Answers an opponent fork.
///
/// Taking the fork cell is enough when the opponent has no other fork
/// afterwards. Otherwise force the opponent to answer a threat instead,
/// provided that answer does not hand them a fork.
fn defend_fork(board: &Board, mark: Mark) -> Option<Decision> {
    let opponent = mark.opponent();
    let fork = find_fork_move(board, opponent)?;
    let taken = board.with_mark(fork, mark);
    if find_fork_move(&taken, opponent).is_some() {
        return find_forcing_move(board, mark).map(tagged(Tactic::Forcing));
    }
    Some(Decision::new(fork, Tactic::ForkBlock))
}

fn tagged(tactic: Tactic) -> impl Fn(Position) -> Decision {
    move |position| Decision::new(position, tactic)
}
