//! Error types for the game service and its configuration.

use derive_more::{Display, Error};
use tictac_core::{Mark, MoveError};
use tracing::instrument;

/// What went wrong in a [`GameService`](crate::GameService) call.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ServiceErrorKind {
    /// The engine refused the move.
    #[display("Move rejected: {}", _0)]
    Move(MoveError),

    /// The player is a computer whose move is already scheduled.
    #[display("Cannot change player {} while its computer move is pending", _0)]
    MovePending(Mark),

    /// The side to move is a computer and nothing has scheduled its move.
    #[display("{} is played by the computer; start a new game to drive it", _0)]
    ComputerTurn(Mark),

    /// Delayed pacing was requested outside a tokio runtime.
    #[display("Delayed computer moves need a running tokio runtime")]
    NoRuntime,
}

/// Game service error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Service error: {} at {}:{}", kind, file, line)]
pub struct ServiceError {
    /// Error kind.
    pub kind: ServiceErrorKind,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ServiceError {
    /// Creates a new service error with caller location tracking.
    #[track_caller]
    #[instrument]
    pub fn new(kind: ServiceErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<MoveError> for ServiceError {
    #[track_caller]
    fn from(err: MoveError) -> Self {
        Self::new(ServiceErrorKind::Move(err))
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
