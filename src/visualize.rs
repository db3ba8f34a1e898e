use std::fmt::Write;

use crate::action::{Action, PlayerId};
use crate::card::{Card, Face};
use crate::events::{GameEvent, PenaltyReason};
use crate::score::GameResult;
use crate::state::{Direction, GameStateView, GameStatus, TurnPhase};

/// Customize state rendering for CLI visualization.
#[derive(Clone, Copy, Debug)]
pub struct VisualOptions {
    pub show_opponent_flags: bool,
    pub show_pile_sizes: bool,
}

impl Default for VisualOptions {
    fn default() -> Self {
        Self {
            show_opponent_flags: true,
            show_pile_sizes: true,
        }
    }
}

pub fn render_state(state: &GameStateView) -> String {
    render_state_with_options(state, VisualOptions::default())
}

pub fn render_state_with_options(state: &GameStateView, options: VisualOptions) -> String {
    let mut out = String::new();
    let status = match state.status {
        GameStatus::Ongoing => String::from("Ongoing"),
        GameStatus::Finished { winner } => {
            format!("Finished (winner: {})", player_name(state, winner))
        }
    };
    let _ = writeln!(out, "Game status: {status}");
    let _ = writeln!(out, "Phase: {}", format_phase(state.phase));
    let _ = writeln!(
        out,
        "Active: {} {}  |  Direction: {}",
        state.active_color,
        format_value(state.active_value),
        format_direction(state.direction)
    );
    let top = state
        .discard_top
        .map(format_card)
        .unwrap_or_else(|| String::from("--"));
    if options.show_pile_sizes {
        let _ = writeln!(
            out,
            "Top card: {top}  |  Deck: {}  |  Discard: {}",
            state.deck_count, state.discard_count
        );
    } else {
        let _ = writeln!(out, "Top card: {top}");
    }
    if let Some(pending) = state.pending_draw {
        let _ = writeln!(
            out,
            "Pending draw: {} card(s) for {}",
            pending.count,
            player_name(state, pending.target)
        );
    }
    let _ = writeln!(out, "Players:");
    for player in &state.players {
        let label_you = if player.id == state.self_player {
            " (You)"
        } else {
            ""
        };
        let current_tag = if player.is_current { " <- current" } else { "" };
        let flags = if options.show_opponent_flags && player.uno_called {
            " [UNO]"
        } else {
            ""
        };
        let _ = writeln!(
            out,
            "  {} {}{} - {} card(s){}{}",
            player.id, player.name, label_you, player.hand_size, flags, current_tag
        );
    }
    if state.hand.is_empty() {
        let _ = writeln!(out, "Hand: (empty)");
    } else {
        let hand_display = state
            .hand
            .iter()
            .enumerate()
            .map(|(idx, card)| format!("{idx}:{}", format_card(*card)))
            .collect::<Vec<_>>()
            .join("  ");
        let _ = writeln!(out, "Hand: {hand_display}");
    }
    out
}

pub fn describe_action(state: &GameStateView, action: &Action) -> String {
    match action {
        Action::Play { hand_index } => {
            let card_desc = state
                .hand
                .get(*hand_index)
                .map(|card| format_card(*card))
                .unwrap_or_else(|| String::from("--"));
            format!("Play hand[{hand_index}] {card_desc}")
        }
        Action::Draw => String::from("Draw a card"),
        Action::CallUno => String::from("Call UNO"),
        Action::ChooseColor(color) => format!("Choose {color}"),
        Action::ChooseTarget(target) => {
            format!("Target {} with the turtle", player_name(state, *target))
        }
    }
}

/// One-line message for an event, as shown in a game log.
pub fn describe_event(names: &[String], event: &GameEvent) -> String {
    let name = |player: PlayerId| {
        names
            .get(player)
            .cloned()
            .unwrap_or_else(|| format!("player{player}"))
    };
    match event {
        GameEvent::Started { first, card } => {
            format!("Game started with {}; {} goes first", format_card(*card), name(*first))
        }
        GameEvent::TurnStarted { player } => format!("{}'s turn", name(*player)),
        GameEvent::AiTurnScheduled { player, delay } => {
            format!("{} is thinking ({} ms)", name(*player), delay.as_millis())
        }
        GameEvent::Played { player, card } => {
            format!("{} played {}", name(*player), format_card(*card))
        }
        GameEvent::Drew { player, count } => match count {
            0 => format!("{} could not draw, no cards left", name(*player)),
            1 => format!("{} drew a card", name(*player)),
            n => format!("{} drew {n} cards", name(*player)),
        },
        GameEvent::Skipped { player } => format!("{} was skipped", name(*player)),
        GameEvent::Reversed { direction } => {
            format!("Direction reversed to {}", format_direction(*direction))
        }
        GameEvent::DrawStacked { target, total } => {
            format!("{} must draw {total}", name(*target))
        }
        GameEvent::DrawDischarged { player, count } => {
            format!("{} drew {count} and loses the turn", name(*player))
        }
        GameEvent::Penalty {
            player,
            reason,
            count,
        } => {
            let why = match reason {
                PenaltyReason::MissedUno => "forgetting to call UNO",
                PenaltyReason::FalseUno => "a false UNO call",
            };
            format!("{} draws {count} for {why}", name(*player))
        }
        GameEvent::UnoCalled { player } => format!("{} called UNO!", name(*player)),
        GameEvent::ColorPrompt { player } => format!("{} chooses a color", name(*player)),
        GameEvent::TurtlePrompt { player, .. } => {
            format!("{} chooses a turtle target", name(*player))
        }
        GameEvent::ColorChosen { player, color } => {
            format!("{} chose {color}", name(*player))
        }
        GameEvent::TurtleTargeted { player, target } => {
            format!("{} sent the turtle to {}", name(*player), name(*target))
        }
        GameEvent::DeckReplenished { added } => format!("Deck replenished with {added} cards"),
        GameEvent::DiscardRecycled { cards } => {
            format!("Discard pile shuffled back into the deck ({cards} cards)")
        }
        GameEvent::GameOver(result) => format!("{} wins!", name(result.winner)),
        GameEvent::ScoreUpdated(update) => format!(
            "{} {}: {} -> {} ({:+})",
            update.account,
            update.mode.name(),
            update.old_score,
            update.new_score,
            update.delta
        ),
        GameEvent::Notice(text) => text.clone(),
    }
}

/// Multi-line final standings table.
pub fn render_result(result: &GameResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Final standings ({}):", result.mode.name());
    for ranking in &result.rankings {
        let you = if ranking.is_human { " (You)" } else { "" };
        let _ = writeln!(
            out,
            "  #{} {}{} - {} card(s) left, {:+}",
            ranking.rank, ranking.name, you, ranking.hand_size, ranking.delta
        );
    }
    out
}

pub fn format_card(card: Card) -> String {
    card.to_string()
}

fn format_value(value: Option<Face>) -> String {
    value.map(Face::label).unwrap_or_else(|| String::from("(any)"))
}

fn format_direction(direction: Direction) -> &'static str {
    match direction {
        Direction::Clockwise => "clockwise",
        Direction::CounterClockwise => "counter-clockwise",
    }
}

fn format_phase(phase: TurnPhase) -> String {
    match phase {
        TurnPhase::AwaitingAction => String::from("awaiting action"),
        TurnPhase::AiTurnPending => String::from("AI turn pending"),
        TurnPhase::AwaitingColorChoice { player, .. } => {
            format!("player {player} choosing a color")
        }
        TurnPhase::AwaitingTurtleTarget { player, .. } => {
            format!("player {player} choosing a turtle target")
        }
        TurnPhase::GameOver => String::from("game over"),
    }
}

fn player_name(state: &GameStateView, player: PlayerId) -> String {
    state
        .players
        .iter()
        .find(|entry| entry.id == player)
        .map(|entry| entry.name.clone())
        .unwrap_or_else(|| format!("player{player}"))
}
