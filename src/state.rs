use serde::{Deserialize, Serialize};

use crate::action::PlayerId;
use crate::card::{Card, Color, Face, HAND_SIZE, LOW_WATER_MARK, MAX_PLAYERS, MIN_PLAYERS};
use crate::deck::RefillPolicy;
use crate::error::GameError;
use crate::score::GameMode;

/// Global constants for a running game.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameSettings {
    pub num_players: usize,
    pub hand_size: usize,
    pub low_water_mark: usize,
    pub refill: RefillPolicy,
    pub mode: GameMode,
}

impl GameSettings {
    pub fn new(num_players: usize) -> Result<Self, GameError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&num_players) {
            return Err(GameError::InvalidConfiguration(
                "players must be between 2 and 10",
            ));
        }
        Ok(Self {
            num_players,
            hand_size: HAND_SIZE,
            low_water_mark: LOW_WATER_MARK,
            refill: RefillPolicy::default(),
            mode: GameMode::default(),
        })
    }
}

/// A seat at the table. Human seats are driven by the host, the others by
/// the engine's built-in AI.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Seat {
    pub name: String,
    pub is_human: bool,
}

impl Seat {
    pub fn human(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_human: true,
        }
    }

    pub fn ai(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_human: false,
        }
    }

    /// One human seat followed by AI seats named `player1`, `player2`, ...
    pub fn default_table(num_players: usize) -> Vec<Seat> {
        (0..num_players)
            .map(|idx| {
                if idx == 0 {
                    Seat::human("You")
                } else {
                    Seat::ai(format!("player{idx}"))
                }
            })
            .collect()
    }
}

/// Direction of play around the table.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Clockwise,
    CounterClockwise,
}

impl Direction {
    pub fn reversed(self) -> Self {
        match self {
            Direction::Clockwise => Direction::CounterClockwise,
            Direction::CounterClockwise => Direction::Clockwise,
        }
    }

    /// Index of the seat after `from`, wrapping around the table.
    pub fn step(self, from: PlayerId, num_players: usize) -> PlayerId {
        match self {
            Direction::Clockwise => (from + 1) % num_players,
            Direction::CounterClockwise => (from + num_players - 1) % num_players,
        }
    }

    pub fn sign(self) -> i8 {
        match self {
            Direction::Clockwise => 1,
            Direction::CounterClockwise => -1,
        }
    }
}

/// Accumulated forced draw waiting for its target's next turn.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PendingDraw {
    pub target: PlayerId,
    pub count: u32,
}

/// Status of the entire game.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum GameStatus {
    Ongoing,
    Finished { winner: PlayerId },
}

/// What the engine does once a prompt has been answered.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Continuation {
    /// The prompt came from a regular play: move on to the next player.
    AdvanceTurn,
    /// The prompt came from the opening card: the prompting player starts.
    BeginTurn,
}

/// Current phase of the active turn.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum TurnPhase {
    /// A human seat may play, draw or call UNO.
    AwaitingAction,
    /// An AI seat is up; the host must call `run_ai_turn` after the delay.
    AiTurnPending,
    /// A wild card waits for its player to pick a color.
    AwaitingColorChoice {
        player: PlayerId,
        then: Continuation,
    },
    /// A turtle card waits for its player to pick a target.
    AwaitingTurtleTarget {
        player: PlayerId,
        then: Continuation,
    },
    GameOver,
}

impl TurnPhase {
    pub fn is_prompt(&self) -> bool {
        matches!(
            self,
            TurnPhase::AwaitingColorChoice { .. } | TurnPhase::AwaitingTurtleTarget { .. }
        )
    }
}

/// Public portion of a player's state that all opponents may observe.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerPublicState {
    pub id: PlayerId,
    pub name: String,
    pub is_human: bool,
    pub hand_size: usize,
    pub uno_called: bool,
    pub is_current: bool,
}

/// Game state snapshot tailored for rendering and bots.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameStateView {
    pub settings: GameSettings,
    pub phase: TurnPhase,
    pub status: GameStatus,
    pub self_player: PlayerId,
    pub current_player: PlayerId,
    pub direction: Direction,
    pub active_color: Color,
    pub active_value: Option<Face>,
    pub discard_top: Option<Card>,
    pub deck_count: usize,
    pub discard_count: usize,
    pub pending_draw: Option<PendingDraw>,
    pub uno_armed: bool,
    pub players: Vec<PlayerPublicState>,
    pub hand: Vec<Card>,
}
