//! Game state machine.
//!
//! A [`GameSnapshot`] is an immutable description of the game at one point
//! in time. Every accepted move produces a new snapshot; the old one stays
//! valid. Once a snapshot is over, no transition leaves it.

use crate::board::Board;
use crate::contracts::{Contract, MoveContract};
use crate::error::MoveError;
use crate::rules;
use crate::search;
use crate::types::{Mark, Outcome, Player, Position};
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info, instrument};

/// Full description of the game at one moment.
///
/// `current_player` is `None` exactly when the game is over. A finished
/// game without a winner is a draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSnapshot {
    board: Board,
    player_x: Player,
    player_o: Player,
    current_player: Option<Player>,
    is_over: bool,
    winner: Option<Player>,
    last_move: Option<Position>,
}

impl GameSnapshot {
    /// Starts a fresh game.
    ///
    /// Player settings carry over from `previous` when given; otherwise
    /// both players are human. X always moves first.
    #[instrument(skip(previous), fields(keep_players = previous.is_some()))]
    pub fn start_new_game(previous: Option<&GameSnapshot>) -> Self {
        let (player_x, player_o) = match previous {
            Some(prev) => (prev.player_x, prev.player_o),
            None => (Player::human(Mark::X), Player::human(Mark::O)),
        };
        Self::start_with_players(player_x, player_o)
    }

    /// Starts a fresh game with explicit players.
    ///
    /// The players are re-tagged with X and O so a misconfigured mark can
    /// never produce two players sharing one.
    #[instrument]
    pub fn start_with_players(player_x: Player, player_o: Player) -> Self {
        let player_x = Player::new(Mark::X, player_x.is_computer(), player_x.difficulty());
        let player_o = Player::new(Mark::O, player_o.is_computer(), player_o.difficulty());
        info!(%player_x, %player_o, "New game");
        Self {
            board: Board::new(),
            player_x,
            player_o,
            current_player: Some(player_x),
            is_over: false,
            winner: None,
            last_move: None,
        }
    }

    /// The board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The player holding X.
    pub fn player_x(&self) -> Player {
        self.player_x
    }

    /// The player holding O.
    pub fn player_o(&self) -> Player {
        self.player_o
    }

    /// The player holding `mark`.
    pub fn player(&self, mark: Mark) -> Player {
        match mark {
            Mark::X => self.player_x,
            Mark::O => self.player_o,
        }
    }

    /// Player to move, `None` once the game is over.
    pub fn current_player(&self) -> Option<Player> {
        self.current_player
    }

    /// Whether the game has been won or drawn.
    pub fn is_over(&self) -> bool {
        self.is_over
    }

    /// Winning player, `None` while open or on a draw.
    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    /// Cell played by the move that produced this snapshot.
    pub fn last_move(&self) -> Option<Position> {
        self.last_move
    }

    /// Terminal verdict, `None` while the game is open.
    pub fn outcome(&self) -> Option<Outcome> {
        if !self.is_over {
            return None;
        }
        Some(match self.winner {
            Some(player) => Outcome::Winner(player.mark()),
            None => Outcome::Draw,
        })
    }

    /// True when a move at `position` would be accepted.
    pub fn is_playable(&self, position: Position) -> bool {
        !self.is_over && self.board.is_empty(position)
    }

    /// True when the search, not a person, picks the next move.
    pub fn is_computer_turn(&self) -> bool {
        self.current_player.is_some_and(|p| p.is_computer())
    }

    /// Plays the current player's mark at `position`.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::GameOver`] if the game is finished and
    /// [`MoveError::SquareOccupied`] if the cell is taken. In debug builds a
    /// broken postcondition is reported as [`MoveError::ContractViolation`].
    #[instrument(skip(self), fields(position = %position))]
    pub fn apply_move(&self, position: Position) -> Result<GameSnapshot, MoveError> {
        MoveContract::pre(self, &position)?;
        let mover = self.current_player.ok_or(MoveError::GameOver)?;

        info!(
            mark = %mover.mark(),
            row = position.row(),
            column = position.column(),
            computer = mover.is_computer(),
            difficulty = ?mover.is_computer().then(|| mover.effective_difficulty()),
            "Move played"
        );

        let board = self.board.with_mark(position, mover.mark());
        let next = match rules::winner(&board) {
            Some(Outcome::Winner(mark)) => Self {
                board,
                current_player: None,
                is_over: true,
                winner: Some(self.player(mark)),
                last_move: Some(position),
                ..*self
            },
            Some(Outcome::Draw) => Self {
                board,
                current_player: None,
                is_over: true,
                winner: None,
                last_move: Some(position),
                ..*self
            },
            None => Self {
                board,
                current_player: Some(self.player(mover.mark().opponent())),
                is_over: false,
                winner: None,
                last_move: Some(position),
                ..*self
            },
        };

        #[cfg(debug_assertions)]
        MoveContract::post(self, &next)?;

        if let Some(outcome) = next.outcome() {
            info!(%outcome, "Game over");
        }
        Ok(next)
    }

    /// Replaces the settings of the player holding `player.mark()`.
    ///
    /// Board and turn are unchanged; the player is updated everywhere it
    /// appears in the snapshot.
    #[instrument(skip(self))]
    pub fn with_player(&self, player: Player) -> GameSnapshot {
        let replace = |slot: Player| if slot.mark() == player.mark() { player } else { slot };
        debug!(%player, "Player settings changed");
        Self {
            player_x: replace(self.player_x),
            player_o: replace(self.player_o),
            current_player: self.current_player.map(replace),
            winner: self.winner.map(replace),
            ..*self
        }
    }

    /// Plays one computer move if a computer is to move.
    ///
    /// Returns `Ok(None)` when the game is over or a human is to move.
    #[instrument(skip(self, rng))]
    pub fn advance_computer<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<Option<GameSnapshot>, MoveError> {
        let Some(player) = self.current_player.filter(|p| p.is_computer()) else {
            return Ok(None);
        };
        let decision = search::choose_move(&self.board, &player, rng).map_err(MoveError::Search)?;
        debug!(tactic = %decision.tactic, "Computer move");
        self.apply_move(decision.position).map(Some)
    }

    /// Plays computer moves until the game ends or a human is to move.
    ///
    /// Each intermediate snapshot is handed to `observe` in the order it was
    /// computed. Terminates because every move removes an empty cell.
    pub fn run_computer_turns<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        mut observe: impl FnMut(&GameSnapshot),
    ) -> Result<GameSnapshot, MoveError> {
        let mut current = self.clone();
        while let Some(next) = current.advance_computer(rng)? {
            observe(&next);
            current = next;
        }
        Ok(current)
    }
}

/// Applies a move, then lets computer players answer until a human is to
/// move or the game is over.
///
/// Every snapshot produced along the way, including the one after the
/// initial move, is passed to `observe`.
#[instrument(skip(snapshot, rng, observe), fields(position = %position))]
pub fn play_out<R: Rng + ?Sized>(
    snapshot: &GameSnapshot,
    position: Position,
    rng: &mut R,
    mut observe: impl FnMut(&GameSnapshot),
) -> Result<GameSnapshot, MoveError> {
    let after = snapshot.apply_move(position)?;
    observe(&after);
    after.run_computer_turns(rng, observe)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Difficulty;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn at(row: usize, column: usize) -> Position {
        Position::new(row, column).unwrap()
    }

    #[test]
    fn test_new_game_defaults_to_humans() {
        let game = GameSnapshot::start_new_game(None);
        assert_eq!(game.player_x(), Player::human(Mark::X));
        assert_eq!(game.player_o(), Player::human(Mark::O));
        assert_eq!(game.current_player(), Some(Player::human(Mark::X)));
        assert!(!game.is_over());
        assert_eq!(game.winner(), None);
        assert_eq!(game.board(), &Board::new());
    }

    #[test]
    fn test_new_game_keeps_players() {
        let previous = GameSnapshot::start_with_players(
            Player::computer(Mark::X, Difficulty::Hard),
            Player::computer(Mark::O, Difficulty::Expert),
        )
        .apply_move(Position::CENTER)
        .unwrap();

        let game = GameSnapshot::start_new_game(Some(&previous));
        assert_eq!(game.player_x(), previous.player_x());
        assert_eq!(game.player_o(), previous.player_o());
        assert_eq!(game.current_player(), Some(previous.player_x()));
        assert_eq!(game.board(), &Board::new());
    }

    #[test]
    fn test_start_with_players_fixes_marks() {
        let game = GameSnapshot::start_with_players(Player::human(Mark::O), Player::human(Mark::O));
        assert_eq!(game.player_x().mark(), Mark::X);
        assert_eq!(game.player_o().mark(), Mark::O);
    }

    #[test]
    fn test_apply_move_alternates_and_keeps_old_snapshot() {
        let start = GameSnapshot::start_new_game(None);
        let next = start.apply_move(Position::CENTER).unwrap();
        assert!(start.board().is_empty(Position::CENTER));
        assert_eq!(next.current_player().map(|p| p.mark()), Some(Mark::O));
        assert_eq!(next.last_move(), Some(Position::CENTER));
    }

    #[test]
    fn test_occupied_cell_is_rejected() {
        let game = GameSnapshot::start_new_game(None)
            .apply_move(Position::CENTER)
            .unwrap();
        assert_eq!(
            game.apply_move(Position::CENTER),
            Err(MoveError::SquareOccupied(Position::CENTER))
        );
        assert!(!game.is_playable(Position::CENTER));
    }

    #[test]
    fn test_win_ends_game() {
        let mut game = GameSnapshot::start_new_game(None);
        for pos in [at(0, 0), at(1, 0), at(0, 1), at(1, 1), at(0, 2)] {
            game = game.apply_move(pos).unwrap();
        }
        assert!(game.is_over());
        assert_eq!(game.winner(), Some(Player::human(Mark::X)));
        assert_eq!(game.current_player(), None);
        assert_eq!(game.outcome(), Some(Outcome::Winner(Mark::X)));
        assert!(!game.is_playable(at(2, 2)));
        assert_eq!(game.apply_move(at(2, 2)), Err(MoveError::GameOver));
    }

    #[test]
    fn test_with_player_keeps_board_and_turn() {
        let game = GameSnapshot::start_new_game(None)
            .apply_move(Position::CENTER)
            .unwrap();
        let changed = game.with_player(Player::computer(Mark::O, Difficulty::Expert));
        assert_eq!(changed.board(), game.board());
        assert_eq!(changed.current_player(), Some(Player::computer(Mark::O, Difficulty::Expert)));
        assert_eq!(changed.player_x(), game.player_x());
        assert!(changed.is_computer_turn());
    }

    #[test]
    fn test_advance_computer_waits_for_human() {
        let game = GameSnapshot::start_new_game(None);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(game.advance_computer(&mut rng), Ok(None));
    }

    #[test]
    fn test_play_out_stops_at_human() {
        let game = GameSnapshot::start_with_players(
            Player::human(Mark::X),
            Player::computer(Mark::O, Difficulty::Expert),
        );
        let mut rng = StdRng::seed_from_u64(3);
        let mut seen = Vec::new();
        let after = play_out(&game, Position::CENTER, &mut rng, |s| seen.push(s.clone())).unwrap();

        assert_eq!(seen.len(), 2);
        assert_eq!(seen.last(), Some(&after));
        assert_eq!(after.current_player(), Some(Player::human(Mark::X)));
        assert_eq!(after.board().count_marks(Mark::O), 1);
    }

    #[test]
    fn test_computer_vs_computer_runs_to_the_end() {
        for seed in 0..20 {
            let game = GameSnapshot::start_with_players(
                Player::computer(Mark::X, Difficulty::Normal),
                Player::computer(Mark::O, Difficulty::Expert),
            );
            let mut rng = StdRng::seed_from_u64(seed);
            let mut count = 0;
            let end = game.run_computer_turns(&mut rng, |_| count += 1).unwrap();
            assert!(end.is_over());
            assert!((5..=9).contains(&count));
            assert_eq!(end.board().empty_positions().len(), 9 - count);
        }
    }
}
