use crate::action::Action;
use crate::state::GameStateView;

/// Interface for strategies that drive a human seat through the host API.
pub trait Bot {
    fn select_action(&mut self, state: &GameStateView, legal_actions: &[Action]) -> Action;
}
