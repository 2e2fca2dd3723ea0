//! Tictac - terminal front end
//!
//! Play tic-tac-toe against the computer, or watch computers play.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use std::io::Write;
use tictac::{EngineConfig, GameService, PlayerSettings, simulate};
use tictac_core::{Difficulty, GameSnapshot, Mark, Position};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::mpsc;
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };
    let config = match cli.seed {
        Some(seed) => config.with_seed(seed),
        None => config,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Play { x, o, delay_ms } => {
            let config = apply_overrides(config, x, o, delay_ms);
            run_play(config).await
        }
        Command::Simulate { x, o, games, json } => run_simulate(config, x, o, games, json),
    }
}

fn apply_overrides(
    config: EngineConfig,
    x: Option<PlayerSettings>,
    o: Option<PlayerSettings>,
    delay_ms: Option<u64>,
) -> EngineConfig {
    let config = match x {
        Some(settings) => config.with_player(Mark::X, settings),
        None => config,
    };
    let config = match o {
        Some(settings) => config.with_player(Mark::O, settings),
        None => config,
    };
    match delay_ms {
        Some(ms) => config.with_computer_delay_ms(ms),
        None => config,
    }
}

/// Run an interactive game on stdin/stdout
#[instrument(skip(config))]
async fn run_play(config: EngineConfig) -> Result<()> {
    let service = GameService::new(&config)?;
    let (tx, mut rx) = mpsc::unbounded_channel::<GameSnapshot>();

    service.start_new_game(true)?;
    service.subscribe(move |snapshot| {
        // Receiver gone means the front end is shutting down.
        let _ = tx.send(snapshot.clone());
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(snapshot) = rx.recv().await {
        print_snapshot(&snapshot);

        if let Some(outcome) = snapshot.outcome() {
            println!("Game over: {}\n", outcome);
            if !ask_play_again(&mut lines).await? {
                break;
            }
            service.start_new_game(true)?;
            continue;
        }

        // Skip snapshots already overtaken, and wait out computer turns.
        if snapshot.is_computer_turn() || snapshot != service.snapshot() {
            continue;
        }

        let Some(position) = read_position(&snapshot, &mut lines).await? else {
            info!("Player quit");
            break;
        };
        service.play(position)?;
    }
    Ok(())
}

fn print_snapshot(snapshot: &GameSnapshot) {
    if let Some(position) = snapshot.last_move() {
        if let Some(mark) = snapshot.board().get(position).mark() {
            println!(
                "{} plays {} ({})",
                snapshot.player(mark),
                position,
                position.label()
            );
        }
    }
    println!("{}\n", snapshot.board().display());
}

async fn read_position(
    snapshot: &GameSnapshot,
    lines: &mut Lines<BufReader<Stdin>>,
) -> Result<Option<Position>> {
    let Some(player) = snapshot.current_player() else {
        return Ok(None);
    };
    loop {
        print!("{} to move (1-9, \"row column\", or q): ", player.mark());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            return Ok(None);
        };
        let line = line.trim();
        if line.eq_ignore_ascii_case("q") {
            return Ok(None);
        }
        match line.parse::<Position>() {
            Ok(position) if snapshot.is_playable(position) => return Ok(Some(position)),
            Ok(position) => println!("{} is already taken", position.label()),
            Err(e) => println!("{}", e),
        }
    }
}

async fn ask_play_again(lines: &mut Lines<BufReader<Stdin>>) -> Result<bool> {
    print!("Play again? [y/N]: ");
    std::io::stdout().flush()?;
    let answer = lines.next_line().await?.unwrap_or_default();
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

/// Run a batch of computer-versus-computer games
#[instrument(skip(config))]
fn run_simulate(
    config: EngineConfig,
    x: Difficulty,
    o: Difficulty,
    games: u32,
    json: bool,
) -> Result<()> {
    let mut failed = None;
    let tally = simulate(&config, x, o, games, |snapshot| {
        if json && failed.is_none() {
            match serde_json::to_string(snapshot) {
                Ok(line) => println!("{}", line),
                Err(e) => failed = Some(e),
            }
        }
    })?;
    if let Some(e) = failed {
        return Err(e.into());
    }

    println!("X ({}) vs O ({}) over {} games", x, o, tally.total());
    println!("{}", tally);
    Ok(())
}
