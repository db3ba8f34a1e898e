use serde::{Deserialize, Serialize};

use crate::card::Color;

/// Zero-based index of a player within the game.
pub type PlayerId = usize;

/// Action a human seat can submit to the engine.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Play the card at the given hand index.
    Play { hand_index: usize },
    /// Draw one card and pass the turn.
    Draw,
    /// Announce UNO while holding two cards.
    CallUno,
    /// Answer a pending color prompt after a wild card.
    ChooseColor(Color),
    /// Answer a pending turtle prompt with the player receiving +3.
    ChooseTarget(PlayerId),
}

impl Action {
    /// Returns the hand index if the action is a play.
    pub fn hand_index(&self) -> Option<usize> {
        match self {
            Action::Play { hand_index } => Some(*hand_index),
            _ => None,
        }
    }

    /// True for the actions that answer a prompt.
    pub fn is_prompt_answer(&self) -> bool {
        matches!(self, Action::ChooseColor(_) | Action::ChooseTarget(_))
    }
}

/// Outcome of an UNO call.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum UnoCall {
    Called,
    /// The hand did not hold exactly two cards; penalty cards were drawn.
    Penalized { drawn: usize },
}
