use crate::action::{Action, PlayerId};
use crate::bot::Bot;
use crate::card::{Card, Color, Effect};
use crate::state::{GameStateView, TurnPhase};

/// Rule-based bot for a human seat.
///
/// In plain English:
/// - Call UNO whenever it is on offer.
/// - Play a colored card before a black one, favoring the color held most
///   and dumping high digits early.
/// - Hold black draw cards back until an opponent is close to going out.
/// - Pick the most-held color after a wild and aim turtles at the opponent
///   with the fewest cards.
/// - Draw only when nothing is playable.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeuristicBot;

impl HeuristicBot {
    pub fn new() -> Self {
        Self
    }

    fn color_count(hand: &[Card], color: Color) -> usize {
        hand.iter().filter(|card| card.color() == Some(color)).count()
    }

    fn favorite_color(hand: &[Card]) -> Color {
        Color::ALL
            .into_iter()
            .rev()
            .max_by_key(|&color| Self::color_count(hand, color))
            .unwrap_or(Color::Red)
    }

    fn opponent_threat(state: &GameStateView) -> bool {
        state
            .players
            .iter()
            .any(|player| player.id != state.self_player && player.hand_size <= 2)
    }

    fn weakest_target(state: &GameStateView, candidates: &[PlayerId]) -> Option<PlayerId> {
        candidates.iter().copied().min_by_key(|&target| {
            state
                .players
                .iter()
                .find(|player| player.id == target)
                .map_or(usize::MAX, |player| player.hand_size)
        })
    }

    /// Larger scores are better.
    fn score_play(state: &GameStateView, card: Card) -> i32 {
        let threat = Self::opponent_threat(state);
        match card.color() {
            Some(color) => {
                let held = Self::color_count(&state.hand, color) as i32;
                let effect_bonus = match card.effect() {
                    Effect::Draw(_) | Effect::Skip | Effect::Turtle if threat => 400,
                    Effect::None => 0,
                    _ => 15,
                };
                let digit = match card {
                    Card::Number { digit, .. } => i32::from(digit),
                    _ => 0,
                };
                1_000 + held * 20 + effect_bonus + digit
            }
            None => match card.effect() {
                Effect::Draw(count) if threat => 2_000 + count as i32,
                Effect::Draw(count) => 100 + count as i32,
                _ => 200,
            },
        }
    }
}

impl Bot for HeuristicBot {
    fn select_action(&mut self, state: &GameStateView, legal_actions: &[Action]) -> Action {
        match state.phase {
            TurnPhase::AwaitingColorChoice { .. } => {
                return Action::ChooseColor(Self::favorite_color(&state.hand));
            }
            TurnPhase::AwaitingTurtleTarget { .. } => {
                let candidates: Vec<PlayerId> = legal_actions
                    .iter()
                    .filter_map(|action| match action {
                        Action::ChooseTarget(target) => Some(*target),
                        _ => None,
                    })
                    .collect();
                if let Some(target) = Self::weakest_target(state, &candidates) {
                    return Action::ChooseTarget(target);
                }
            }
            _ => {}
        }

        if legal_actions.contains(&Action::CallUno) {
            return Action::CallUno;
        }
        legal_actions
            .iter()
            .filter_map(|action| {
                let hand_index = action.hand_index()?;
                let card = *state.hand.get(hand_index)?;
                Some((Self::score_play(state, card), action))
            })
            .max_by_key(|(score, _)| *score)
            .map(|(_, action)| action.clone())
            .unwrap_or(Action::Draw)
    }
}
