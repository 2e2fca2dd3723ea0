//! Tactical primitives shared by every difficulty tier.
//!
//! Each primitive simulates candidate moves on scratch copies of the board
//! and scans candidates in row-major order, so the first match is
//! deterministic.

use crate::board::Board;
use crate::rules;
use crate::types::{Mark, Outcome, Position};
use rand::Rng;

/// First empty cell where `mark` completes a line.
pub fn find_immediate_win(board: &Board, mark: Mark) -> Option<Position> {
    board
        .empty_positions()
        .into_iter()
        .find(|pos| wins_at(board, *pos, mark))
}

/// Cell `mark` must take to stop the opponent winning next ply.
pub fn find_immediate_block(board: &Board, mark: Mark) -> Option<Position> {
    find_immediate_win(board, mark.opponent())
}

/// Uniformly random empty cell, `None` on a full board.
pub fn random_empty<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Option<Position> {
    pick(&board.empty_positions(), rng)
}

/// Number of distinct empty cells that win immediately for `mark`.
///
/// Two or more is a double threat the opponent cannot fully block.
pub fn count_winning_continuations(board: &Board, mark: Mark) -> usize {
    board
        .empty_positions()
        .into_iter()
        .filter(|pos| wins_at(board, *pos, mark))
        .count()
}

/// First empty cell after which `mark` has two or more immediate wins.
pub fn find_fork_move(board: &Board, mark: Mark) -> Option<Position> {
    board
        .empty_positions()
        .into_iter()
        .find(|pos| count_winning_continuations(&board.with_mark(*pos, mark), mark) >= 2)
}

/// First empty cell that creates a threat the opponent must answer, where
/// the forced answer does not hand the opponent a fork.
pub fn find_forcing_move(board: &Board, mark: Mark) -> Option<Position> {
    let opponent = mark.opponent();
    board.empty_positions().into_iter().find(|pos| {
        let threatened = board.with_mark(*pos, mark);
        if count_winning_continuations(&threatened, mark) == 0 {
            return false;
        }
        match find_immediate_block(&threatened, opponent) {
            None => true,
            Some(block) => {
                let answered = threatened.with_mark(block, opponent);
                count_winning_continuations(&answered, opponent) < 2
            }
        }
    })
}

/// Center if free, otherwise a random free corner.
pub fn center_or_corner<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Option<Position> {
    if board.is_empty(Position::CENTER) {
        return Some(Position::CENTER);
    }
    let corners: Vec<Position> = Position::CORNERS
        .into_iter()
        .filter(|pos| board.is_empty(*pos))
        .collect();
    pick(&corners, rng)
}

fn wins_at(board: &Board, pos: Position, mark: Mark) -> bool {
    rules::winner(&board.with_mark(pos, mark)) == Some(Outcome::Winner(mark))
}

fn pick<R: Rng + ?Sized>(candidates: &[Position], rng: &mut R) -> Option<Position> {
    if candidates.is_empty() {
        return None;
    }
    Some(candidates[rng.random_range(0..candidates.len())])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn board(s: &str) -> Board {
        s.parse().unwrap()
    }

    #[test]
    fn test_immediate_win_and_block() {
        let b = board("XX. OO. ...");
        assert_eq!(find_immediate_win(&b, Mark::X).map(Position::index), Some(2));
        assert_eq!(find_immediate_win(&b, Mark::O).map(Position::index), Some(5));
        assert_eq!(find_immediate_block(&b, Mark::X).map(Position::index), Some(5));
        assert_eq!(find_immediate_block(&b, Mark::O).map(Position::index), Some(2));
    }

    #[test]
    fn test_immediate_win_is_row_major_first() {
        let b = board("XX. ... X..");
        assert_eq!(find_immediate_win(&b, Mark::X).map(Position::index), Some(2));
    }

    #[test]
    fn test_immediate_win_always_wins() {
        for s in ["XX. OO. ...", "X.. X.O .O.", "O.X .X. ..O", "OXO .X. ..."] {
            let b = board(s);
            for mark in [Mark::X, Mark::O] {
                if let Some(pos) = find_immediate_win(&b, mark) {
                    assert_eq!(
                        rules::winner(&b.with_mark(pos, mark)),
                        Some(Outcome::Winner(mark))
                    );
                }
            }
        }
    }

    #[test]
    fn test_no_immediate_win_on_empty_board() {
        assert_eq!(find_immediate_win(&Board::new(), Mark::X), None);
        assert_eq!(count_winning_continuations(&Board::new(), Mark::X), 0);
    }

    #[test]
    fn test_count_winning_continuations() {
        // Row 0 via cell 1, column 0 via cell 3, anti-diagonal via cell 4.
        let b = board("X.X ... X..");
        assert_eq!(count_winning_continuations(&b, Mark::X), 3);
        assert_eq!(count_winning_continuations(&b, Mark::O), 0);
    }

    #[test]
    fn test_fork_move_opposite_corners() {
        let b = board("X.. .O. ..X");
        assert_eq!(find_fork_move(&b, Mark::X).map(Position::index), Some(2));
        assert_eq!(find_fork_move(&b, Mark::O), None);
    }

    #[test]
    fn test_forcing_move_avoids_giving_fork() {
        // O must push on an edge: a corner threat would be answered by X
        // with a fork.
        let b = board("X.. .O. ..X");
        let forcing = find_forcing_move(&b, Mark::O).unwrap();
        assert_eq!(forcing.index(), 1);

        let threatened = b.with_mark(forcing, Mark::O);
        let block = find_immediate_block(&threatened, Mark::X).unwrap();
        let answered = threatened.with_mark(block, Mark::X);
        assert!(count_winning_continuations(&answered, Mark::X) < 2);
    }

    #[test]
    fn test_center_or_corner() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(center_or_corner(&Board::new(), &mut rng), Some(Position::CENTER));

        let b = board("X.. .O. ...");
        for _ in 0..20 {
            let pos = center_or_corner(&b, &mut rng).unwrap();
            assert!([2, 6, 8].contains(&pos.index()));
        }

        let taken = board("X.O .X. O.X");
        assert_eq!(center_or_corner(&taken, &mut rng), None);
    }

    #[test]
    fn test_random_empty_only_picks_empty() {
        let mut rng = StdRng::seed_from_u64(42);
        let b = board("XOX OX. ..O");
        for _ in 0..50 {
            let pos = random_empty(&b, &mut rng).unwrap();
            assert!(b.is_empty(pos));
        }
        assert_eq!(random_empty(&board("XOX XOO OXX"), &mut rng), None);
    }
}
