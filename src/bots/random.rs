use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::action::Action;
use crate::bot::Bot;
use crate::state::GameStateView;

/// Picks any legal action with equal odds, UNO calls and prompt answers
/// included.
pub struct RandomBot<R: Rng> {
    rng: R,
}

impl<R: Rng> RandomBot<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomBot<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Bot for RandomBot<R> {
    fn select_action(&mut self, _state: &GameStateView, legal_actions: &[Action]) -> Action {
        if legal_actions.is_empty() {
            return Action::Draw;
        }
        let pick = self.rng.gen_range(0..legal_actions.len());
        legal_actions[pick].clone()
    }
}
