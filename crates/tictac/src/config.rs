//! Engine configuration loaded from TOML.

use crate::error::ConfigError;
use crate::service::Pacing;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tictac_core::{Difficulty, Mark, Player};
use tracing::{debug, info, instrument};

/// How one side of the board is played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Getters, Serialize, Deserialize)]
pub struct PlayerSettings {
    /// Whether the search plays this side.
    #[serde(default)]
    computer: bool,

    /// Search strength; unset plays Normal.
    #[serde(default)]
    difficulty: Option<Difficulty>,
}

impl PlayerSettings {
    /// A human-controlled side.
    pub fn human() -> Self {
        Self::default()
    }

    /// A computer-controlled side at `difficulty`.
    pub fn computer_at(difficulty: Difficulty) -> Self {
        Self {
            computer: true,
            difficulty: Some(difficulty),
        }
    }

    /// Builds the engine player holding `mark`.
    pub fn to_player(self, mark: Mark) -> Player {
        Player::new(mark, self.computer, self.difficulty)
    }
}

impl FromStr for PlayerSettings {
    type Err = ConfigError;

    /// Accepts `human` or a difficulty name (`normal`, `hard`, `expert`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("human") {
            return Ok(Self::human());
        }
        s.trim()
            .parse::<Difficulty>()
            .map(Self::computer_at)
            .map_err(|_| {
                ConfigError::new(format!(
                    "Unknown player kind {:?} (expected human, normal, hard or expert)",
                    s
                ))
            })
    }
}

/// Configuration for a game engine instance.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Pause before each computer move, in milliseconds. Zero chains moves
    /// synchronously.
    #[serde(default = "default_computer_delay_ms")]
    computer_delay_ms: u64,

    /// Seed for the search's random source; unset draws from the OS.
    #[serde(default)]
    seed: Option<u64>,

    /// Settings for the X side.
    #[serde(default)]
    player_x: PlayerSettings,

    /// Settings for the O side.
    #[serde(default)]
    player_o: PlayerSettings,

    /// Fallback `tracing` filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    log_filter: String,
}

#[instrument]
fn default_computer_delay_ms() -> u64 {
    500
}

#[instrument]
fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            computer_delay_ms: default_computer_delay_ms(),
            seed: None,
            player_x: PlayerSettings::human(),
            player_o: PlayerSettings::human(),
            log_filter: default_log_filter(),
        }
    }
}

impl EngineConfig {
    /// Loads configuration from TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(
            delay_ms = config.computer_delay_ms,
            seed = ?config.seed,
            "Config loaded successfully"
        );
        Ok(config)
    }

    /// Replaces the delay between computer moves.
    pub fn with_computer_delay_ms(self, computer_delay_ms: u64) -> Self {
        Self {
            computer_delay_ms,
            ..self
        }
    }

    /// Fixes the random seed.
    pub fn with_seed(self, seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..self
        }
    }

    /// Replaces the settings for the side holding `mark`.
    pub fn with_player(self, mark: Mark, settings: PlayerSettings) -> Self {
        match mark {
            Mark::X => Self {
                player_x: settings,
                ..self
            },
            Mark::O => Self {
                player_o: settings,
                ..self
            },
        }
    }

    /// Computer move pacing derived from the delay.
    pub fn pacing(&self) -> Pacing {
        match self.computer_delay_ms {
            0 => Pacing::Immediate,
            ms => Pacing::Delayed(Duration::from_millis(ms)),
        }
    }

    /// Engine players for X and O.
    pub fn players(&self) -> (Player, Player) {
        (
            self.player_x.to_player(Mark::X),
            self.player_o.to_player(Mark::O),
        )
    }
}
