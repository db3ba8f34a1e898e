//! Notifications emitted by the engine for the host to display.
//!
//! The game buffers events as it resolves actions; the host drains them with
//! [`Game::drain_events`](crate::Game::drain_events) and either inspects them
//! directly or forwards them to a [`UiCallbacks`] implementation.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::action::PlayerId;
use crate::card::{Card, Color};
use crate::score::{GameResult, Ranking, ScoreUpdate};
use crate::state::Direction;
use crate::visualize::describe_event;

/// Why penalty cards were drawn.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum PenaltyReason {
    /// Played down to one card without calling UNO.
    MissedUno,
    /// Called UNO while not holding exactly two cards.
    FalseUno,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Started { first: PlayerId, card: Card },
    TurnStarted { player: PlayerId },
    AiTurnScheduled { player: PlayerId, delay: Duration },
    Played { player: PlayerId, card: Card },
    Drew { player: PlayerId, count: usize },
    Skipped { player: PlayerId },
    Reversed { direction: Direction },
    DrawStacked { target: PlayerId, total: u32 },
    DrawDischarged { player: PlayerId, count: usize },
    Penalty {
        player: PlayerId,
        reason: PenaltyReason,
        count: usize,
    },
    UnoCalled { player: PlayerId },
    ColorPrompt { player: PlayerId },
    TurtlePrompt {
        player: PlayerId,
        candidates: Vec<PlayerId>,
    },
    ColorChosen { player: PlayerId, color: Color },
    TurtleTargeted { player: PlayerId, target: PlayerId },
    DeckReplenished { added: usize },
    DiscardRecycled { cards: usize },
    GameOver(GameResult),
    ScoreUpdated(ScoreUpdate),
    Notice(String),
}

/// Host-side presentation hooks. Every method defaults to doing nothing.
pub trait UiCallbacks {
    fn show_message(&mut self, _text: &str) {}
    fn show_color_selection(&mut self, _player: PlayerId) {}
    fn show_turtle_target_selection(&mut self, _player: PlayerId, _candidates: &[PlayerId]) {}
    fn show_game_result(&mut self, _rankings: &[Ranking], _human: Option<&Ranking>) {}
    fn show_score_update(&mut self, _old_score: i64, _new_score: i64, _delta: i32) {}
}

impl GameEvent {
    /// Routes the event to the matching callback. `names` resolves player
    /// ids for the message text.
    pub fn deliver(&self, names: &[String], ui: &mut dyn UiCallbacks) {
        match self {
            GameEvent::ColorPrompt { player } => ui.show_color_selection(*player),
            GameEvent::TurtlePrompt { player, candidates } => {
                ui.show_turtle_target_selection(*player, candidates)
            }
            GameEvent::GameOver(result) => {
                ui.show_game_result(&result.rankings, result.human.as_ref())
            }
            GameEvent::ScoreUpdated(update) => {
                ui.show_score_update(update.old_score, update.new_score, update.delta)
            }
            other => ui.show_message(&describe_event(names, other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        messages: Vec<String>,
        color_prompts: usize,
        scores: Vec<(i64, i64, i32)>,
    }

    impl UiCallbacks for Recorder {
        fn show_message(&mut self, text: &str) {
            self.messages.push(text.to_string());
        }

        fn show_color_selection(&mut self, _player: PlayerId) {
            self.color_prompts += 1;
        }

        fn show_score_update(&mut self, old_score: i64, new_score: i64, delta: i32) {
            self.scores.push((old_score, new_score, delta));
        }
    }

    #[test]
    fn deliver_routes_prompts_and_messages() {
        let names = vec![String::from("You"), String::from("player1")];
        let mut ui = Recorder::default();
        GameEvent::ColorPrompt { player: 0 }.deliver(&names, &mut ui);
        GameEvent::UnoCalled { player: 1 }.deliver(&names, &mut ui);
        GameEvent::ScoreUpdated(ScoreUpdate {
            account: String::from("You"),
            mode: crate::score::GameMode::Rating,
            old_score: 3,
            new_score: 13,
            delta: 10,
        })
        .deliver(&names, &mut ui);
        assert_eq!(ui.color_prompts, 1);
        assert_eq!(ui.messages, vec![String::from("player1 called UNO!")]);
        assert_eq!(ui.scores, vec![(3, 13, 10)]);
    }
}
