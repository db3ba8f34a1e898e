//! Draw pile and discard pile.
//!
//! The draw pile is consumed from the end of its vector. Two replenishment
//! mechanisms exist: augmentation with a fresh full set when the pile runs
//! low (only under [`RefillPolicy::Augment`]), and recycling of the discard
//! pile beneath its top card once the pile is empty.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::card::{Card, full_deck};

/// How the draw pile is topped up.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefillPolicy {
    /// Append a freshly shuffled full set whenever the pile drops to the low-water mark.
    #[default]
    Augment,
    /// Never create cards; rely on recycling the discard pile.
    Conserve,
}

/// Result of a single draw, including any replenishment it triggered.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Draw {
    pub card: Option<Card>,
    pub augmented: usize,
    pub recycled: usize,
}

#[derive(Clone, Debug)]
pub struct Deck {
    cards: Vec<Card>,
    low_water_mark: usize,
    policy: RefillPolicy,
}

impl Deck {
    pub fn new(cards: Vec<Card>, low_water_mark: usize, policy: RefillPolicy) -> Self {
        Self {
            cards,
            low_water_mark,
            policy,
        }
    }

    /// A full shuffled deck.
    pub fn shuffled<R: Rng + ?Sized>(
        rng: &mut R,
        low_water_mark: usize,
        policy: RefillPolicy,
    ) -> Self {
        let mut deck = Self::new(full_deck(), low_water_mark, policy);
        deck.shuffle(rng);
        deck
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn policy(&self) -> RefillPolicy {
        self.policy
    }

    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    /// Returns a card to the bottom of the pile, i.e. the last one to be drawn.
    pub fn put_bottom(&mut self, card: Card) {
        self.cards.insert(0, card);
    }

    pub fn draw<R: Rng + ?Sized>(&mut self, discard: &mut DiscardPile, rng: &mut R) -> Draw {
        let mut outcome = Draw::default();
        if self.policy == RefillPolicy::Augment && self.cards.len() <= self.low_water_mark {
            let mut fresh = full_deck();
            fresh.shuffle(rng);
            outcome.augmented = fresh.len();
            self.cards.append(&mut fresh);
            debug!(added = outcome.augmented, total = self.cards.len(), "draw pile augmented");
        }
        if self.cards.is_empty() {
            let mut recycled = discard.take_under_top();
            recycled.shuffle(rng);
            outcome.recycled = recycled.len();
            self.cards = recycled;
            debug!(recycled = outcome.recycled, "discard pile recycled into draw pile");
        }
        outcome.card = self.cards.pop();
        if outcome.card.is_none() {
            debug!("draw pile and discard pile exhausted");
        }
        outcome
    }
}

/// Ordered discard pile. The last card defines the active context.
#[derive(Clone, Debug, Default)]
pub struct DiscardPile {
    cards: Vec<Card>,
}

impl DiscardPile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn top(&self) -> Option<Card> {
        self.cards.last().copied()
    }

    pub fn push(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Removes every card except the top one, which stays as the new pile seed.
    fn take_under_top(&mut self) -> Vec<Card> {
        let Some(top) = self.cards.pop() else {
            return Vec::new();
        };
        std::mem::replace(&mut self.cards, vec![top])
    }
}
