use thiserror::Error;

use crate::action::PlayerId;
use crate::card::{Card, Color, Face};

/// Errors that can occur when manipulating the game state.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("player index {0} is out of range")]
    InvalidPlayer(PlayerId),
    #[error("not the specified player's turn")]
    NotPlayersTurn,
    #[error("player {0} is controlled by the engine")]
    NotHumanSeat(PlayerId),
    #[error("an AI turn is pending")]
    AiTurnPending,
    #[error("no AI turn is pending")]
    NoAiTurnPending,
    #[error("invalid action: {0}")]
    InvalidAction(#[from] InvalidAction),
    #[error("game is already over")]
    GameOver,
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),
}

/// Details of invalid user actions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidAction {
    #[error("hand index {0} is out of range")]
    HandIndex(usize),
    #[error("{card} does not match active color {color} / value {value:?}")]
    CardMismatch {
        card: Card,
        color: Color,
        value: Option<Face>,
    },
    #[error("UNO cannot be called right now")]
    UnoUnavailable,
    #[error("a prompt must be answered first")]
    PromptPending,
    #[error("no prompt is waiting for an answer")]
    NoPromptPending,
    #[error("player {0} cannot be targeted")]
    InvalidTarget(PlayerId),
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

impl From<ConfigError> for GameError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Invalid(reason) => GameError::InvalidConfiguration(reason),
            _ => GameError::InvalidConfiguration("configuration could not be loaded"),
        }
    }
}
