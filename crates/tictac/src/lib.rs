//! Tictac - a live tic-tac-toe game service.
//!
//! Wraps the pure [`tictac_core`] engine with the pieces a front end needs:
//!
//! - **Config**: TOML engine configuration with defaults
//! - **Service**: one live game, observers, and computer turn driving
//! - **Simulate**: computer-versus-computer batches
//!
//! # Example
//!
//! ```
//! use tictac::{EngineConfig, GameService, PlayerSettings};
//! use tictac_core::{Difficulty, Mark, Position};
//!
//! let config = EngineConfig::default()
//!     .with_computer_delay_ms(0)
//!     .with_seed(3)
//!     .with_player(Mark::O, PlayerSettings::computer_at(Difficulty::Expert));
//! let service = GameService::new(&config)?;
//! let snapshot = service.play(Position::CENTER)?;
//! assert_eq!(snapshot.board().count_marks(Mark::O), 1);
//! # Ok::<(), tictac::ServiceError>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod service;
mod simulate;

pub use config::{EngineConfig, PlayerSettings};
pub use error::{ConfigError, ServiceError, ServiceErrorKind};
pub use service::{GameService, Pacing};
pub use simulate::{Tally, simulate};
