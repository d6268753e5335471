use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::spawner::{PieceSeed, SpawnPolicy};

/// What brings a new session into play.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, derive_more::Display)]
#[serde(rename_all = "lowercase")]
pub enum StartMode {
    /// Wait in the idle state for an explicit start command.
    #[default]
    #[display("manual")]
    Manual,
    /// Start as soon as the session is created.
    #[display("immediate")]
    Immediate,
}

/// Session tunables.
///
/// Every field has a default, so a configuration file only needs the keys it
/// changes:
///
/// ```
/// use tiltris_engine::{GameConfig, SpawnPolicy};
///
/// let config: GameConfig = serde_json::from_str(r#"{ "spawn_policy": "random" }"#).unwrap();
/// assert_eq!(config.spawn_policy, SpawnPolicy::Random);
/// assert_eq!(config.board_width, 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    pub board_width: usize,
    pub board_height: usize,
    /// Time between forced descents.
    pub drop_interval_ms: u64,
    /// Time the voice gate stays closed after an accepted command.
    pub voice_cooldown_ms: u64,
    pub spawn_policy: SpawnPolicy,
    pub start_mode: StartMode,
    /// Seed for [`SpawnPolicy::Random`]; drawn from the thread RNG when absent.
    pub seed: Option<PieceSeed>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_width: 10,
            board_height: 20,
            drop_interval_ms: 1000,
            voice_cooldown_ms: 500,
            spawn_policy: SpawnPolicy::default(),
            start_mode: StartMode::default(),
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("board must be at least 4x4, got {width}x{height}")]
    BoardTooSmall { width: usize, height: usize },
    #[display("drop interval must be greater than zero")]
    ZeroDropInterval,
}

impl GameConfig {
    pub const MIN_BOARD_SIZE: usize = 4;

    #[must_use]
    pub fn drop_interval(&self) -> Duration {
        Duration::from_millis(self.drop_interval_ms)
    }

    #[must_use]
    pub fn voice_cooldown(&self) -> Duration {
        Duration::from_millis(self.voice_cooldown_ms)
    }

    /// Checks that every catalogue shape fits on the board and the loop can advance.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board_width < Self::MIN_BOARD_SIZE || self.board_height < Self::MIN_BOARD_SIZE {
            return Err(ConfigError::BoardTooSmall {
                width: self.board_width,
                height: self.board_height,
            });
        }
        if self.drop_interval_ms == 0 {
            return Err(ConfigError::ZeroDropInterval);
        }
        Ok(())
    }
}
