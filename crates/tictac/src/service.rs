//! Live game service.
//!
//! [`GameService`] owns the latest [`GameSnapshot`] of one game and is the
//! only place it is replaced. Every replacement is published to observers
//! while the service lock is held, so observers see snapshots in order and
//! never a half-applied move.
//!
//! Computer players are driven after every change. With
//! [`Pacing::Immediate`] their moves are chained before the call returns;
//! with [`Pacing::Delayed`] each move is a tokio task that sleeps, then
//! applies exactly one move against whatever snapshot is current. A task
//! scheduled before a newer move or game is discarded.

use crate::config::EngineConfig;
use crate::error::{ServiceError, ServiceErrorKind};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tictac_core::{GameSnapshot, Player, Position};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

/// How computer moves are sequenced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pacing {
    /// Chain computer moves synchronously.
    Immediate,
    /// Publish each snapshot, wait, then play the next computer move.
    Delayed(Duration),
}

type Observer = Box<dyn FnMut(&GameSnapshot) + Send>;

struct ServiceState {
    snapshot: GameSnapshot,
    /// Bumped whenever the board changes or a new game starts.
    generation: u64,
    rng: StdRng,
    observers: Vec<Observer>,
    pending: Option<JoinHandle<()>>,
}

impl ServiceState {
    fn publish(&mut self, snapshot: GameSnapshot) {
        self.snapshot = snapshot;
        debug!(
            generation = self.generation,
            observers = self.observers.len(),
            "Publishing snapshot"
        );
        for observer in &mut self.observers {
            observer(&self.snapshot);
        }
    }

    fn advance(&mut self, snapshot: GameSnapshot) {
        self.generation += 1;
        self.publish(snapshot);
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            debug!(generation = self.generation, "Cancelling pending computer move");
            handle.abort();
        }
    }
}

/// Handle to one live game. Clones share the same game.
#[derive(Clone)]
pub struct GameService {
    state: Arc<Mutex<ServiceState>>,
    pacing: Pacing,
    runtime: Option<Handle>,
}

impl std::fmt::Debug for GameService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameService")
            .field("pacing", &self.pacing)
            .finish_non_exhaustive()
    }
}

impl GameService {
    /// Creates a service holding a fresh game with the configured players.
    ///
    /// No move is played until [`start_new_game`](Self::start_new_game) or
    /// [`play`](Self::play) is called. A computer X waits for
    /// `start_new_game`.
    ///
    /// # Errors
    ///
    /// Delayed pacing needs a tokio runtime; calling this outside one with a
    /// non-zero delay fails with [`ServiceErrorKind::NoRuntime`].
    #[instrument(skip(config), fields(delay_ms = *config.computer_delay_ms()))]
    pub fn new(config: &EngineConfig) -> Result<Self, ServiceError> {
        let pacing = config.pacing();
        let runtime = match pacing {
            Pacing::Immediate => None,
            Pacing::Delayed(_) => Some(
                Handle::try_current().map_err(|_| ServiceError::new(ServiceErrorKind::NoRuntime))?,
            ),
        };
        let rng = match config.seed() {
            Some(seed) => StdRng::seed_from_u64(*seed),
            None => StdRng::from_os_rng(),
        };
        let (player_x, player_o) = config.players();

        info!(?pacing, "Creating game service");
        Ok(Self {
            state: Arc::new(Mutex::new(ServiceState {
                snapshot: GameSnapshot::start_with_players(player_x, player_o),
                generation: 0,
                rng,
                observers: Vec::new(),
                pending: None,
            })),
            pacing,
            runtime,
        })
    }

    /// How computer moves are sequenced.
    pub fn pacing(&self) -> Pacing {
        self.pacing
    }

    /// The latest published snapshot.
    pub fn snapshot(&self) -> GameSnapshot {
        self.lock().snapshot.clone()
    }

    /// Whether a delayed computer move is waiting to fire.
    pub fn is_move_pending(&self) -> bool {
        self.lock().pending.is_some()
    }

    /// Registers an observer.
    ///
    /// The observer is called at once with the latest snapshot, then with
    /// every later one. It runs under the service lock and must not call
    /// back into the service.
    #[instrument(skip(self, observer))]
    pub fn subscribe<F>(&self, observer: F)
    where
        F: FnMut(&GameSnapshot) + Send + 'static,
    {
        let mut state = self.lock();
        let mut observer: Observer = Box::new(observer);
        observer(&state.snapshot);
        state.observers.push(observer);
        debug!(observers = state.observers.len(), "Observer registered");
    }

    /// Starts a new game, discarding any pending computer move.
    ///
    /// Player settings carry over when `keep_players` is set; otherwise both
    /// sides become human. Returns the snapshot current after any computer
    /// moves chained synchronously.
    #[instrument(skip(self))]
    pub fn start_new_game(&self, keep_players: bool) -> Result<GameSnapshot, ServiceError> {
        let mut state = self.lock();
        state.cancel_pending();
        let previous = keep_players.then(|| state.snapshot.clone());
        let fresh = GameSnapshot::start_new_game(previous.as_ref());
        state.advance(fresh);
        self.drive(&mut state)?;
        Ok(state.snapshot.clone())
    }

    /// Plays the current player's mark at `position`.
    ///
    /// A pending computer move is discarded when the move is accepted, so a
    /// caller may answer for a computer whose delayed move has not fired.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceErrorKind::Move`] when the game is over or the cell
    /// is taken, and [`ServiceErrorKind::ComputerTurn`] when a computer is to
    /// move with nothing pending. The published snapshot is unchanged.
    #[instrument(skip(self), fields(position = %position))]
    pub fn play(&self, position: Position) -> Result<GameSnapshot, ServiceError> {
        let mut state = self.lock();
        if state.snapshot.is_computer_turn() && state.pending.is_none() {
            if let Some(player) = state.snapshot.current_player() {
                warn!(mark = %player.mark(), "Move refused on an undriven computer turn");
                return Err(ServiceError::new(ServiceErrorKind::ComputerTurn(player.mark())));
            }
        }
        let next = state.snapshot.apply_move(position).map_err(|e| {
            warn!(error = %e, "Move rejected");
            ServiceError::from(e)
        })?;
        state.cancel_pending();
        state.advance(next);
        self.drive(&mut state)?;
        Ok(state.snapshot.clone())
    }

    /// Replaces the settings of the player holding `player.mark()`.
    ///
    /// Board and turn are unchanged. If the updated player is a computer
    /// and now to move, its move is driven.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceErrorKind::MovePending`] while that player's own
    /// computer move is scheduled.
    #[instrument(skip(self), fields(player = %player))]
    pub fn set_player(&self, player: Player) -> Result<GameSnapshot, ServiceError> {
        let mut state = self.lock();
        let to_move = state.snapshot.current_player().map(|p| p.mark());
        if state.pending.is_some() && to_move == Some(player.mark()) {
            warn!("Player change refused while its move is pending");
            return Err(ServiceError::new(ServiceErrorKind::MovePending(player.mark())));
        }
        let next = state.snapshot.with_player(player);
        state.publish(next);
        self.drive(&mut state)?;
        Ok(state.snapshot.clone())
    }

    fn lock(&self) -> MutexGuard<'_, ServiceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Plays or schedules computer moves until a human is to move.
    fn drive(&self, state: &mut ServiceState) -> Result<(), ServiceError> {
        if !state.snapshot.is_computer_turn() || state.pending.is_some() {
            return Ok(());
        }
        match self.pacing {
            Pacing::Immediate => {
                while let Some(next) = state.snapshot.advance_computer(&mut state.rng)? {
                    state.advance(next);
                }
            }
            Pacing::Delayed(delay) => self.schedule(state, delay),
        }
        Ok(())
    }

    fn schedule(&self, state: &mut ServiceState, delay: Duration) {
        let Some(runtime) = &self.runtime else {
            error!("Delayed pacing without a runtime");
            return;
        };
        let generation = state.generation;
        let service = self.clone();
        debug!(generation, ?delay, "Scheduling computer move");
        state.pending = Some(runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            service.play_scheduled(generation);
        }));
    }

    #[instrument(skip(self))]
    fn play_scheduled(&self, generation: u64) {
        let mut guard = self.lock();
        let state = &mut *guard;
        if state.generation != generation {
            warn!(current = state.generation, "Discarding stale computer move");
            return;
        }
        state.pending = None;
        match state.snapshot.advance_computer(&mut state.rng) {
            Ok(Some(next)) => {
                state.advance(next);
                if let Err(e) = self.drive(state) {
                    error!(error = %e, "Failed to continue computer turns");
                }
            }
            Ok(None) => debug!("No computer move due"),
            Err(e) => error!(error = %e, "Scheduled computer move failed"),
        }
    }
}
