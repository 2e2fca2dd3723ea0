//! Tests for the snapshot state machine driven through the public API.

use rand::SeedableRng;
use rand::rngs::StdRng;
use tictac_core::{
    Board, Difficulty, GameSnapshot, Mark, MoveError, Outcome, Player, Position, play_out, rules,
};

fn at(row: usize, column: usize) -> Position {
    Position::new(row, column).unwrap()
}

fn play_all(moves: &[(usize, usize)]) -> GameSnapshot {
    moves
        .iter()
        .fold(GameSnapshot::start_new_game(None), |game, &(row, column)| {
            game.apply_move(at(row, column)).unwrap()
        })
}

#[test]
fn test_open_sequence_has_no_winner() {
    let game = play_all(&[(1, 1), (0, 0), (0, 1), (2, 1), (2, 2)]);
    assert!(!game.is_over());
    assert_eq!(game.winner(), None);
    assert_eq!(game.current_player().map(|p| p.mark()), Some(Mark::O));

    let game = game.apply_move(at(2, 0)).unwrap();
    assert!(!game.is_over());
    assert_eq!(game.winner(), None);
    assert_eq!(rules::winner(game.board()), None);
    assert_eq!(game.current_player().map(|p| p.mark()), Some(Mark::X));
}

#[test]
fn test_top_row_wins_for_x() {
    let game = play_all(&[(0, 0), (1, 1), (0, 1), (2, 2), (0, 2)]);
    assert!(game.is_over());
    assert_eq!(game.winner().map(|p| p.mark()), Some(Mark::X));
    assert_eq!(game.outcome(), Some(Outcome::Winner(Mark::X)));
}

#[test]
fn test_full_board_without_line_is_draw() {
    let game = play_all(&[
        (0, 0),
        (0, 1),
        (0, 2),
        (1, 1),
        (1, 0),
        (1, 2),
        (2, 1),
        (2, 0),
        (2, 2),
    ]);
    assert!(game.is_over());
    assert_eq!(game.winner(), None);
    assert_eq!(game.current_player(), None);
    assert_eq!(game.outcome(), Some(Outcome::Draw));
    assert_eq!(game.board(), &"XOX XOO OXX".parse::<Board>().unwrap());
}

#[test]
fn test_equal_snapshots_give_equal_results() {
    let a = play_all(&[(1, 1), (0, 0)]);
    let b = play_all(&[(1, 1), (0, 0)]);
    assert_eq!(a, b);
    assert_eq!(a.apply_move(at(2, 2)), b.apply_move(at(2, 2)));
}

#[test]
fn test_turns_alternate_until_the_end() {
    let mut game = GameSnapshot::start_new_game(None);
    for pos in [at(0, 0), at(1, 1), at(2, 2), at(0, 2), at(2, 0), at(1, 0)] {
        let before = game.current_player().unwrap().mark();
        game = game.apply_move(pos).unwrap();
        if !game.is_over() {
            assert_ne!(game.current_player().unwrap().mark(), before);
        }
    }
}

#[test]
fn test_moves_after_game_over_are_rejected() {
    let game = play_all(&[(0, 0), (1, 1), (0, 1), (2, 2), (0, 2)]);
    for pos in game.board().empty_positions() {
        assert!(!game.is_playable(pos));
        assert_eq!(game.apply_move(pos), Err(MoveError::GameOver));
    }
}

#[test]
fn test_new_game_preserves_or_resets_players() {
    let x = Player::computer(Mark::X, Difficulty::Hard);
    let o = Player::new(Mark::O, true, None);
    let finished = GameSnapshot::start_with_players(x, o);

    let kept = GameSnapshot::start_new_game(Some(&finished));
    assert_eq!(kept.player_x(), x);
    assert_eq!(kept.player_o(), o);
    assert_eq!(kept.player_o().difficulty(), None);

    let reset = GameSnapshot::start_new_game(None);
    assert!(!reset.player_x().is_computer());
    assert!(!reset.player_o().is_computer());
}

#[test]
fn test_play_out_expert_answers_every_human_move() {
    for seed in 0..30 {
        let mut current = GameSnapshot::start_with_players(
            Player::human(Mark::X),
            Player::computer(Mark::O, Difficulty::Expert),
        );
        let mut rng = StdRng::seed_from_u64(seed);
        let mut seen = Vec::new();
        while !current.is_over() {
            let pos = current.board().empty_positions()[0];
            current = play_out(&current, pos, &mut rng, |s| seen.push(s.clone())).unwrap();
        }
        assert_eq!(seen.last(), Some(&current));
        assert_ne!(current.outcome(), Some(Outcome::Winner(Mark::X)));
    }
}

#[test]
fn test_snapshot_serializes_for_observers() {
    let game = play_all(&[(1, 1)]);
    let json = serde_json::to_value(&game).unwrap();
    assert_eq!(json["is_over"], false);
    assert_eq!(json["last_move"]["row"], 1);
    assert_eq!(json["current_player"]["mark"], "O");
}
