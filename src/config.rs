use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::card::{DEFAULT_PLAYERS, HAND_SIZE, LOW_WATER_MARK};
use crate::deck::RefillPolicy;
use crate::error::ConfigError;
use crate::score::GameMode;
use crate::state::GameSettings;

const DEFAULT_SEED: u64 = 0x0A0B_5EED_0A0B_5EED;

/// Tunables of the built-in AI.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AiConfig {
    /// Chance that an AI holding one card announces UNO.
    pub uno_call_probability: f64,
    /// Chance of playing by priority when the legal set spans several colors.
    pub priority_play_probability: f64,
    /// Delay the host should wait before running an AI turn.
    pub turn_delay_ms: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            uno_call_probability: 0.87,
            priority_play_probability: 0.87,
            turn_delay_ms: 1000,
        }
    }
}

impl AiConfig {
    pub fn turn_delay(&self) -> Duration {
        Duration::from_millis(self.turn_delay_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let in_range = |p: f64| (0.0..=1.0).contains(&p);
        if !in_range(self.uno_call_probability) || !in_range(self.priority_play_probability) {
            return Err(ConfigError::Invalid("AI probabilities must lie in [0, 1]"));
        }
        Ok(())
    }
}

/// Configuration required to bootstrap a game instance.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub num_players: usize,
    pub seed: u64,
    pub mode: GameMode,
    pub hand_size: usize,
    pub low_water_mark: usize,
    pub refill: RefillPolicy,
    pub ai: AiConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            num_players: DEFAULT_PLAYERS,
            seed: DEFAULT_SEED,
            mode: GameMode::default(),
            hand_size: HAND_SIZE,
            low_water_mark: LOW_WATER_MARK,
            refill: RefillPolicy::default(),
            ai: AiConfig::default(),
        }
    }
}

impl GameConfig {
    pub fn new(num_players: usize, seed: u64) -> Result<Self, ConfigError> {
        let config = Self {
            num_players,
            seed,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        GameSettings::new(self.num_players)
            .map_err(|_| ConfigError::Invalid("players must be between 2 and 10"))?;
        if self.hand_size == 0 {
            return Err(ConfigError::Invalid("hand size must be positive"));
        }
        self.ai.validate()
    }

    pub fn settings(&self) -> GameSettings {
        GameSettings {
            num_players: self.num_players,
            hand_size: self.hand_size,
            low_water_mark: self.low_water_mark,
            refill: self.refill,
            mode: self.mode,
        }
    }
}
