//! Decisions of the built-in AI seats.
//!
//! Card choice in plain English:
//! - If every playable card shares the active color, play the one ranked
//!   first by [`Face::priority`] (high digits first, wilds last).
//! - Otherwise usually do the same across all playable cards, but now and
//!   then switch color by playing a same-value card of another color.

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::trace;

use crate::action::PlayerId;
use crate::card::{Card, Color, Face};
use crate::config::AiConfig;

/// Whether an AI holding `hand_size` cards announces UNO this turn.
pub fn wants_uno<R: Rng + ?Sized>(hand_size: usize, config: &AiConfig, rng: &mut R) -> bool {
    hand_size == 1 && rng.gen_bool(config.uno_call_probability)
}

/// Index into `playable` of the first card by priority. Ties keep hand order.
pub fn top_priority(playable: &[(usize, Card)]) -> Option<usize> {
    playable
        .iter()
        .enumerate()
        .min_by_key(|(pos, (_, card))| (card.face().priority(), *pos))
        .map(|(pos, _)| pos)
}

/// Picks one of the playable `(hand_index, card)` pairs and returns its hand
/// index. `None` only when nothing is playable.
pub fn choose_card<R: Rng + ?Sized>(
    playable: &[(usize, Card)],
    active_color: Color,
    active_value: Option<Face>,
    config: &AiConfig,
    rng: &mut R,
) -> Option<usize> {
    if playable.is_empty() {
        return None;
    }
    let by_priority = |cards: &[(usize, Card)]| top_priority(cards).map(|pos| cards[pos].0);

    if playable
        .iter()
        .all(|(_, card)| card.color() == Some(active_color))
    {
        return by_priority(playable);
    }
    if rng.gen_bool(config.priority_play_probability) {
        return by_priority(playable);
    }
    let switches: Vec<(usize, Card)> = playable
        .iter()
        .filter(|(_, card)| {
            Some(card.face()) == active_value && card.color() != Some(active_color)
        })
        .copied()
        .collect();
    match switches.choose(rng) {
        Some((index, card)) => {
            trace!(%card, "AI switches color on matching value");
            Some(*index)
        }
        None => by_priority(playable),
    }
}

pub fn choose_color<R: Rng + ?Sized>(rng: &mut R) -> Color {
    Color::ALL[rng.gen_range(0..Color::ALL.len())]
}

/// Uniformly random player other than `actor`.
pub fn choose_target<R: Rng + ?Sized>(actor: PlayerId, num_players: usize, rng: &mut R) -> PlayerId {
    debug_assert!(num_players > 1);
    let pick = rng.gen_range(0..num_players - 1);
    if pick >= actor { pick + 1 } else { pick }
}
