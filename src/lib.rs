//! UNO-style card engine with turtle cards, stacked draw penalties and
//! rank-based scoring, plus bots and tooling for simulations.

pub mod action;
pub mod ai;
pub mod bot;
pub mod bots;
pub mod card;
pub mod config;
pub mod deck;
pub mod error;
pub mod events;
pub mod game;
pub mod score;
pub mod state;
pub mod store;
pub mod visualize;

pub use crate::action::{Action, PlayerId, UnoCall};
pub use crate::bot::Bot;
pub use crate::bots::{HeuristicBot, HumanBot, RandomBot};
pub use crate::card::{ActionKind, Card, Color, Face, WildKind};
pub use crate::config::{AiConfig, GameConfig};
pub use crate::deck::RefillPolicy;
pub use crate::error::{ConfigError, GameError, InvalidAction};
pub use crate::events::{GameEvent, PenaltyReason, UiCallbacks};
pub use crate::game::{Game, GameBuilder};
pub use crate::score::{GameMode, GameResult, Ranking, ScoreUpdate};
pub use crate::state::{
    Direction, GameSettings, GameStateView, GameStatus, PendingDraw, PlayerPublicState, Seat,
    TurnPhase,
};
pub use crate::store::{FileScoreStore, MemoryScoreStore, ScoreRepository, StoreError};
pub use crate::visualize::{VisualOptions, describe_action, describe_event, render_state};
