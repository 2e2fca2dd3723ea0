//! Tic-tac-toe move-decision engine.
//!
//! Pure, synchronous building blocks for a single-board game:
//!
//! - **Rules**: terminal verdict of any board (win, draw, or open)
//! - **Search**: heuristic computer opponents at three difficulties
//! - **Game**: immutable snapshots and the transitions between them
//! - **Contracts**: pre/postconditions checked around every move
//!
//! # Example
//!
//! ```
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use tictac_core::{Difficulty, GameSnapshot, Mark, Player, Position, play_out};
//!
//! let game = GameSnapshot::start_with_players(
//!     Player::human(Mark::X),
//!     Player::computer(Mark::O, Difficulty::Expert),
//! );
//! let mut rng = StdRng::seed_from_u64(7);
//! let after = play_out(&game, Position::CENTER, &mut rng, |_| {}).unwrap();
//! assert_eq!(after.board().count_marks(Mark::O), 1);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod board;
mod contracts;
mod error;
mod game;
pub mod rules;
pub mod search;
mod types;

pub use board::Board;
pub use contracts::{
    BoardConsistent, BoardMonotonic, Contract, GameNotOver, LegalMove, MoveContract,
    SquareIsEmpty, VerdictConsistent,
};
pub use error::{MoveError, ParseBoardError, ParsePositionError, SearchError};
pub use game::{GameSnapshot, play_out};
pub use search::{Decision, Tactic, choose_move};
pub use types::{Cell, Difficulty, Mark, Outcome, Player, Position};
