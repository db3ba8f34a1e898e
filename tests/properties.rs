use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use unobot::card::{Card, full_deck};
use unobot::deck::{Deck, RefillPolicy};
use unobot::state::{Direction, Seat, TurnPhase};
use unobot::{AiConfig, GameBuilder};

fn count(cards: &[Card], card: &Card) -> usize {
    cards.iter().filter(|other| *other == card).count()
}

fn ai_table(num_players: usize) -> Vec<Seat> {
    (0..num_players)
        .map(|idx| Seat::ai(format!("bot{idx}")))
        .collect()
}

fn quick_ai() -> AiConfig {
    AiConfig {
        turn_delay_ms: 0,
        ..AiConfig::default()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn shuffled_deck_is_a_permutation_of_the_full_set(seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let deck = Deck::shuffled(&mut rng, 15, RefillPolicy::Augment);
        let full = full_deck();
        prop_assert_eq!(deck.len(), full.len());
        for card in &full {
            prop_assert_eq!(count(deck.cards(), card), count(&full, card));
        }
    }

    #[test]
    fn steps_cycle_through_every_seat(num_players in 2usize..=10, start in 0usize..10) {
        let start = start % num_players;
        for direction in [Direction::Clockwise, Direction::CounterClockwise] {
            let mut seat = start;
            let mut visited = Vec::new();
            for _ in 0..num_players {
                let next = direction.step(seat, num_players);
                let expected = (seat as i64 + i64::from(direction.sign()))
                    .rem_euclid(num_players as i64) as usize;
                prop_assert_eq!(next, expected);
                seat = next;
                visited.push(seat);
            }
            prop_assert_eq!(seat, start);
            visited.sort_unstable();
            prop_assert_eq!(visited, (0..num_players).collect::<Vec<_>>());
        }
    }

    #[test]
    fn conserve_keeps_every_card_in_play(seed in any::<u64>(), num_players in 2usize..=6) {
        let mut game = GameBuilder::new(num_players)
            .and_then(|builder| {
                builder
                    .with_seed(seed)
                    .with_refill_policy(RefillPolicy::Conserve)
                    .with_seats(ai_table(num_players))
                    .with_ai_config(quick_ai())
                    .build()
            })
            .map_err(|err| TestCaseError::fail(err.to_string()))?;
        for _ in 0..400 {
            if game.is_finished() {
                break;
            }
            prop_assert_eq!(game.phase(), TurnPhase::AiTurnPending);
            game.run_ai_turn().map_err(|err| TestCaseError::fail(err.to_string()))?;
            prop_assert_eq!(game.total_cards(), 120);
            prop_assert!(game.current_player() < num_players);
            if let Some(pending) = game.pending_draw() {
                prop_assert!(pending.target < num_players);
                prop_assert!(pending.count > 0);
            }
        }
    }

    #[test]
    fn augment_only_adds_whole_sets(seed in any::<u64>()) {
        let mut game = GameBuilder::new(4)
            .and_then(|builder| {
                builder
                    .with_seed(seed)
                    .with_seats(ai_table(4))
                    .with_ai_config(quick_ai())
                    .build()
            })
            .map_err(|err| TestCaseError::fail(err.to_string()))?;
        for _ in 0..400 {
            if game.is_finished() {
                break;
            }
            game.run_ai_turn().map_err(|err| TestCaseError::fail(err.to_string()))?;
            prop_assert_eq!(game.total_cards() % 120, 0);
        }
        if let Some(result) = game.result() {
            prop_assert_eq!(game.hand(result.winner).map(<[Card]>::len).ok(), Some(0));
            prop_assert_eq!(result.rankings[0].player, result.winner);
        }
    }
}
