//! Computer-versus-computer simulation.

use crate::config::{EngineConfig, PlayerSettings};
use crate::error::ServiceError;
use crate::service::GameService;
use derive_getters::Getters;
use serde::Serialize;
use tictac_core::{Difficulty, GameSnapshot, Mark, Outcome};
use tracing::{info, instrument, warn};

/// Results of a batch of games.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Getters, Serialize, derive_more::Display)]
#[display("X wins: {}, O wins: {}, draws: {}", x_wins, o_wins, draws)]
pub struct Tally {
    /// Games won by X.
    x_wins: u32,
    /// Games won by O.
    o_wins: u32,
    /// Drawn games.
    draws: u32,
}

impl Tally {
    /// Counts one finished game.
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Winner(Mark::X) => self.x_wins += 1,
            Outcome::Winner(Mark::O) => self.o_wins += 1,
            Outcome::Draw => self.draws += 1,
        }
    }

    /// Total games counted.
    pub fn total(&self) -> u32 {
        self.x_wins + self.o_wins + self.draws
    }
}

/// Plays `games` games between two computer players.
///
/// Moves are chained immediately regardless of the configured delay. The
/// configured seed, if any, makes the whole batch reproducible. Each final
/// snapshot is handed to `on_finished`.
#[instrument(skip(config, on_finished))]
pub fn simulate(
    config: &EngineConfig,
    x: Difficulty,
    o: Difficulty,
    games: u32,
    mut on_finished: impl FnMut(&GameSnapshot),
) -> Result<Tally, ServiceError> {
    let config = config
        .clone()
        .with_computer_delay_ms(0)
        .with_player(Mark::X, PlayerSettings::computer_at(x))
        .with_player(Mark::O, PlayerSettings::computer_at(o));
    let service = GameService::new(&config)?;

    let mut tally = Tally::default();
    for game in 1..=games {
        let end = service.start_new_game(true)?;
        match end.outcome() {
            Some(outcome) => tally.record(outcome),
            None => warn!(game, "Game stopped before it was over"),
        }
        on_finished(&end);
    }
    info!(%tally, "Simulation finished");
    Ok(tally)
}
