use unobot::action::{Action, UnoCall};
use unobot::card::{ActionKind, Card, Color, Face, WildKind};
use unobot::events::{GameEvent, PenaltyReason};
use unobot::score::GameMode;
use unobot::state::{Continuation, Direction, PendingDraw, Seat, TurnPhase};
use unobot::store::{MemoryScoreStore, ScoreRepository, StoreError};
use unobot::{AiConfig, Game, GameBuilder, GameError, InvalidAction, RefillPolicy};

fn red(digit: u8) -> Card {
    Card::number(Color::Red, digit)
}

fn blue(digit: u8) -> Card {
    Card::number(Color::Blue, digit)
}

fn green(digit: u8) -> Card {
    Card::number(Color::Green, digit)
}

fn yellow(digit: u8) -> Card {
    Card::number(Color::Yellow, digit)
}

fn humans(n: usize) -> Vec<Seat> {
    (0..n).map(|idx| Seat::human(format!("p{idx}"))).collect()
}

/// Orders a deck so that the deal hands out `hands` (player 0 first), the
/// opening draw finds `start`, and later draws follow `draws`.
fn stacked_deck(hands: &[Vec<Card>], start: Card, draws: &[Card]) -> Vec<Card> {
    let mut order: Vec<Card> = hands.iter().flatten().copied().collect();
    order.push(start);
    order.extend_from_slice(draws);
    order.reverse();
    order
}

fn builder_for(
    hands: &[Vec<Card>],
    start: Card,
    draws: &[Card],
) -> Result<GameBuilder, GameError> {
    Ok(GameBuilder::new(hands.len())?
        .with_hand_size(hands[0].len())
        .with_refill_policy(RefillPolicy::Conserve)
        .with_seats(humans(hands.len()))
        .with_starting_player(0)
        .with_deck(stacked_deck(hands, start, draws)))
}

fn table(hands: &[Vec<Card>], start: Card, draws: &[Card]) -> Result<Game, GameError> {
    builder_for(hands, start, draws)?.build()
}

fn four_hands(first: [Card; 3]) -> Vec<Vec<Card>> {
    vec![
        first.to_vec(),
        vec![red(8), blue(3), green(4)],
        vec![red(9), blue(5), green(6)],
        vec![red(1), yellow(1), yellow(2)],
    ]
}

fn filler(count: usize) -> Vec<Card> {
    (0..count).map(|idx| yellow(3 + (idx % 6) as u8)).collect()
}

#[test]
fn deal_and_start_card() -> Result<(), GameError> {
    let hands = four_hands([red(7), blue(1), green(2)]);
    let mut game = table(&hands, red(5), &[yellow(3), yellow(4)])?;
    assert_eq!(game.hand(0)?, &[red(7), blue(1), green(2)]);
    assert_eq!(game.hand(3)?, &[red(1), yellow(1), yellow(2)]);
    assert_eq!(game.discard_top(), Some(red(5)));
    assert_eq!(game.active_color(), Color::Red);
    assert_eq!(game.active_value(), Some(Face::Number(5)));
    assert_eq!(game.current_player(), 0);
    assert_eq!(game.phase(), TurnPhase::AwaitingAction);
    assert_eq!(game.deck_count(), 2);
    assert_eq!(game.total_cards(), 15);
    assert!(game.uno_armed());
    let events = game.drain_events();
    assert_eq!(
        events,
        vec![
            GameEvent::Started {
                first: 0,
                card: red(5)
            },
            GameEvent::TurnStarted { player: 0 },
        ]
    );
    Ok(())
}

#[test]
fn black_opening_card_goes_to_the_bottom() -> Result<(), GameError> {
    let hands = vec![vec![red(1), blue(2)], vec![green(3), yellow(4)]];
    let game = table(&hands, Card::Wild(WildKind::Wild), &[blue(7)])?;
    assert_eq!(game.discard_top(), Some(blue(7)));
    assert_eq!(game.active_color(), Color::Blue);
    assert_eq!(game.deck_count(), 1);
    Ok(())
}

#[test]
fn deck_without_colored_cards_cannot_start() {
    let hands = vec![vec![red(1), blue(2)], vec![green(3), yellow(4)]];
    let result = table(
        &hands,
        Card::Wild(WildKind::Wild),
        &[Card::Wild(WildKind::DrawFour)],
    );
    assert!(matches!(result, Err(GameError::InvalidConfiguration(_))));
}

#[test]
fn builder_rejects_bad_tables() {
    assert!(GameBuilder::new(1).is_err());
    assert!(GameBuilder::new(11).is_err());
    let short = GameBuilder::new(4)
        .map(|builder| builder.with_deck(vec![red(1); 10]).build());
    assert!(matches!(short, Ok(Err(GameError::InvalidConfiguration(_)))));
    let seats = GameBuilder::new(4).map(|builder| builder.with_seats(humans(3)).build());
    assert!(matches!(seats, Ok(Err(GameError::InvalidConfiguration(_)))));
}

#[test]
fn play_moves_clockwise_and_reverse_flips() -> Result<(), GameError> {
    let mut hands = four_hands([red(7), blue(1), green(2)]);
    hands[1] = vec![Card::action(Color::Red, ActionKind::Reverse), blue(3), green(4)];
    let mut game = table(&hands, red(5), &[yellow(3), yellow(4)])?;

    game.play_card(0)?;
    assert_eq!(game.current_player(), 1);
    assert_eq!(game.active_value(), Some(Face::Number(7)));

    game.play_card(0)?;
    assert_eq!(game.direction(), Direction::CounterClockwise);
    assert_eq!(game.current_player(), 0);

    // Nothing in hand matches red/reverse.
    assert_eq!(game.legal_actions(0)?, vec![Action::Draw, Action::CallUno]);
    game.draw_card_for_current_player()?;
    assert_eq!(game.hand(0)?, &[blue(1), green(2), yellow(3)]);
    assert_eq!(game.current_player(), 3);
    Ok(())
}

#[test]
fn skip_jumps_over_the_next_player() -> Result<(), GameError> {
    let hands = four_hands([Card::action(Color::Red, ActionKind::Skip), blue(1), green(2)]);
    let mut game = table(&hands, red(5), &[])?;
    game.drain_events();
    game.play_card(0)?;
    assert_eq!(game.current_player(), 2);
    assert!(game.events().contains(&GameEvent::Skipped { player: 1 }));
    game.play_card(0)?;
    assert_eq!(game.current_player(), 3);
    Ok(())
}

#[test]
fn mismatched_or_missing_cards_are_rejected() -> Result<(), GameError> {
    let hands = four_hands([red(7), blue(1), green(2)]);
    let mut game = table(&hands, red(5), &[])?;
    assert!(matches!(
        game.play_card(1),
        Err(GameError::InvalidAction(InvalidAction::CardMismatch { .. }))
    ));
    assert!(matches!(
        game.play_card(7),
        Err(GameError::InvalidAction(InvalidAction::HandIndex(7)))
    ));
    assert_eq!(game.hand(0)?.len(), 3);
    assert_eq!(game.current_player(), 0);
    assert_eq!(game.legal_actions(0)?, vec![Action::Play { hand_index: 0 }, Action::Draw]);
    Ok(())
}

#[test]
fn only_the_current_human_seat_may_act() -> Result<(), GameError> {
    let hands = four_hands([red(7), blue(1), green(2)]);
    let mut game = table(&hands, red(5), &[])?;
    assert!(matches!(
        game.apply_action(1, Action::Draw),
        Err(GameError::NotPlayersTurn)
    ));
    assert!(matches!(
        game.apply_action(9, Action::Draw),
        Err(GameError::InvalidPlayer(9))
    ));
    assert!(matches!(game.legal_actions(2), Err(GameError::NotPlayersTurn)));
    assert!(matches!(game.run_ai_turn(), Err(GameError::NoAiTurnPending)));
    assert!(matches!(
        game.choose_color(Color::Blue),
        Err(GameError::InvalidAction(InvalidAction::NoPromptPending))
    ));
    Ok(())
}

#[test]
fn ai_seats_are_driven_by_the_engine() -> Result<(), GameError> {
    let hands = four_hands([red(7), blue(1), green(2)]);
    let mut seats = humans(4);
    seats[1] = Seat::ai("bot");
    let mut game = builder_for(&hands, red(5), &filler(6))?
        .with_seats(seats)
        .with_ai_config(AiConfig {
            turn_delay_ms: 0,
            ..AiConfig::default()
        })
        .build()?;
    game.play_card(0)?;
    assert_eq!(game.current_player(), 1);
    assert_eq!(game.phase(), TurnPhase::AiTurnPending);
    assert!(game.events().iter().any(|event| matches!(
        event,
        GameEvent::AiTurnScheduled { player: 1, .. }
    )));
    assert!(matches!(
        game.apply_action(1, Action::Draw),
        Err(GameError::NotHumanSeat(1))
    ));
    assert!(matches!(game.play_card(0), Err(GameError::NotHumanSeat(1))));

    // The AI holds red 8 on red 7: a same-color hand plays by priority.
    game.run_ai_turn()?;
    assert_eq!(game.discard_top(), Some(red(8)));
    assert_eq!(game.current_player(), 2);
    assert_eq!(game.phase(), TurnPhase::AwaitingAction);
    Ok(())
}

#[test]
fn wild_prompts_for_a_color() -> Result<(), GameError> {
    let hands = four_hands([Card::Wild(WildKind::Wild), blue(1), green(2)]);
    let mut game = table(&hands, red(5), &[])?;
    game.play_card(0)?;
    assert_eq!(
        game.phase(),
        TurnPhase::AwaitingColorChoice {
            player: 0,
            then: Continuation::AdvanceTurn
        }
    );
    assert_eq!(game.active_value(), None);
    assert_eq!(game.current_player(), 0);
    assert_eq!(game.legal_actions(0)?.len(), 4);
    assert!(matches!(
        game.draw_card_for_current_player(),
        Err(GameError::InvalidAction(InvalidAction::PromptPending))
    ));
    assert!(matches!(
        game.choose_turtle_target(2),
        Err(GameError::InvalidAction(InvalidAction::PromptPending))
    ));

    game.choose_color(Color::Blue)?;
    assert_eq!(game.active_color(), Color::Blue);
    assert_eq!(game.current_player(), 1);
    assert_eq!(game.phase(), TurnPhase::AwaitingAction);
    // Any blue card now matches.
    assert_eq!(
        game.legal_actions(1)?,
        vec![Action::Play { hand_index: 1 }, Action::Draw]
    );
    Ok(())
}

#[test]
fn turtle_and_draw_cards_stack_on_one_target() -> Result<(), GameError> {
    let mut hands = four_hands([Card::Turtle(Color::Red), blue(1), green(2)]);
    hands[1] = vec![Card::action(Color::Red, ActionKind::DrawTwo), blue(3), green(4)];
    let mut game = table(&hands, red(5), &filler(5))?;

    game.play_card(0)?;
    assert_eq!(
        game.legal_actions(0)?,
        vec![
            Action::ChooseTarget(1),
            Action::ChooseTarget(2),
            Action::ChooseTarget(3)
        ]
    );
    assert!(matches!(
        game.choose_turtle_target(0),
        Err(GameError::InvalidAction(InvalidAction::InvalidTarget(0)))
    ));
    game.choose_turtle_target(2)?;
    assert_eq!(game.pending_draw(), Some(PendingDraw { target: 2, count: 3 }));
    assert_eq!(game.current_player(), 1);

    game.drain_events();
    game.play_card(0)?;
    // Player 2 takes 3 + 2 cards and loses the turn.
    assert_eq!(game.pending_draw(), None);
    assert_eq!(game.hand(2)?.len(), 8);
    assert_eq!(game.current_player(), 3);
    let events = game.drain_events();
    assert!(events.contains(&GameEvent::DrawStacked { target: 2, total: 5 }));
    assert!(events.contains(&GameEvent::DrawDischarged {
        player: 2,
        count: 5
    }));
    assert!(!events.contains(&GameEvent::TurnStarted { player: 2 }));
    Ok(())
}

#[test]
fn skip_over_a_pending_target_discharges_once() -> Result<(), GameError> {
    let mut hands = four_hands([Card::Turtle(Color::Red), blue(1), green(2)]);
    hands[1] = vec![Card::action(Color::Red, ActionKind::Skip), blue(3), green(4)];
    let mut game = table(&hands, red(5), &filler(3))?;
    game.play_card(0)?;
    game.choose_turtle_target(2)?;
    game.drain_events();
    game.play_card(0)?;
    assert_eq!(game.hand(2)?.len(), 6);
    assert_eq!(game.current_player(), 3);
    let events = game.drain_events();
    assert!(events.contains(&GameEvent::DrawDischarged {
        player: 2,
        count: 3
    }));
    assert!(!events.contains(&GameEvent::Skipped { player: 2 }));
    Ok(())
}

#[test]
fn opening_action_cards_apply_to_the_starting_player() -> Result<(), GameError> {
    let hands = four_hands([red(7), blue(1), green(2)]);

    let game = table(&hands, Card::action(Color::Red, ActionKind::Skip), &[])?;
    assert_eq!(game.current_player(), 1);
    assert!(game.events().contains(&GameEvent::Skipped { player: 0 }));

    let game = table(&hands, Card::action(Color::Red, ActionKind::Reverse), &[])?;
    assert_eq!(game.current_player(), 0);
    assert_eq!(game.direction(), Direction::CounterClockwise);

    let mut game = table(&hands, Card::action(Color::Red, ActionKind::DrawTwo), &filler(2))?;
    assert_eq!(game.current_player(), 0);
    assert_eq!(game.pending_draw(), Some(PendingDraw { target: 1, count: 2 }));
    game.play_card(0)?;
    assert_eq!(game.hand(1)?.len(), 5);
    assert_eq!(game.current_player(), 2);
    Ok(())
}

#[test]
fn opening_turtle_prompts_the_starting_player() -> Result<(), GameError> {
    let hands = four_hands([red(7), blue(1), green(2)]);
    let mut game = table(&hands, Card::Turtle(Color::Green), &filler(3))?;
    assert_eq!(
        game.phase(),
        TurnPhase::AwaitingTurtleTarget {
            player: 0,
            then: Continuation::BeginTurn
        }
    );
    assert_eq!(game.turns(), 0);
    game.choose_turtle_target(2)?;
    assert_eq!(game.current_player(), 0);
    assert_eq!(game.phase(), TurnPhase::AwaitingAction);
    assert_eq!(game.pending_draw(), Some(PendingDraw { target: 2, count: 3 }));
    assert_eq!(game.turns(), 1);
    Ok(())
}

fn two_card_table() -> Result<Game, GameError> {
    let hands = vec![vec![red(7), blue(1)], vec![green(3), yellow(4)]];
    table(&hands, red(5), &[yellow(5), yellow(6), yellow(7), green(8)])
}

#[test]
fn calling_uno_with_two_cards_avoids_the_penalty() -> Result<(), GameError> {
    let mut game = two_card_table()?;
    assert_eq!(
        game.legal_actions(0)?,
        vec![Action::Play { hand_index: 0 }, Action::Draw, Action::CallUno]
    );
    assert_eq!(game.call_uno()?, UnoCall::Called);
    assert!(game.uno_called(0)?);
    assert!(!game.uno_armed());
    assert!(matches!(
        game.call_uno(),
        Err(GameError::InvalidAction(InvalidAction::UnoUnavailable))
    ));
    game.play_card(0)?;
    assert_eq!(game.hand(0)?, &[blue(1)]);
    assert!(game.uno_called(0)?);
    assert_eq!(game.current_player(), 1);
    Ok(())
}

#[test]
fn playing_down_to_one_card_without_uno_costs_two() -> Result<(), GameError> {
    let mut game = two_card_table()?;
    game.drain_events();
    game.play_card(0)?;
    assert_eq!(game.hand(0)?, &[blue(1), yellow(5), yellow(6)]);
    assert_eq!(game.discard_top(), Some(red(7)));
    assert!(game.events().contains(&GameEvent::Penalty {
        player: 0,
        reason: PenaltyReason::MissedUno,
        count: 2
    }));
    Ok(())
}

#[test]
fn false_uno_call_draws_two() -> Result<(), GameError> {
    let hands = four_hands([red(7), blue(1), green(2)]);
    let mut game = table(&hands, red(5), &filler(2))?;
    assert_eq!(game.call_uno()?, UnoCall::Penalized { drawn: 2 });
    assert_eq!(game.hand(0)?.len(), 5);
    assert!(!game.uno_called(0)?);
    assert!(game.uno_armed());
    assert_eq!(game.current_player(), 0);
    Ok(())
}

#[test]
fn drawing_a_card_clears_an_uno_call() -> Result<(), GameError> {
    let hands = vec![vec![blue(7), blue(1)], vec![green(3), yellow(4)]];
    let mut game = table(&hands, red(5), &filler(2))?;
    game.call_uno()?;
    assert!(game.uno_called(0)?);
    game.draw_card_for_current_player()?;
    assert!(!game.uno_called(0)?);
    Ok(())
}

fn single_card_hands() -> Vec<Vec<Card>> {
    vec![vec![red(7)], vec![blue(1)], vec![green(2)], vec![yellow(3)]]
}

#[test]
fn emptying_a_hand_wins_and_scores() -> Result<(), GameError> {
    let mut store = MemoryScoreStore::new();
    store
        .store("p0", GameMode::Rating, 5)
        .map_err(|_| GameError::InvalidConfiguration("memory store"))?;
    let mut game = builder_for(&single_card_hands(), red(5), &[])?
        .with_score_store(Box::new(store))
        .build()?;
    game.drain_events();
    game.play_card(0)?;

    assert!(game.is_finished());
    assert_eq!(game.winner(), Some(0));
    assert_eq!(game.phase(), TurnPhase::GameOver);
    let result = game.result().cloned().ok_or(GameError::GameOver)?;
    let deltas: Vec<_> = result
        .rankings
        .iter()
        .map(|ranking| (ranking.player, ranking.rank, ranking.delta))
        .collect();
    assert_eq!(deltas, vec![(0, 1, 10), (1, 2, 4), (2, 3, -3), (3, 4, -9)]);
    assert_eq!(result.human.as_ref().map(|human| human.player), Some(0));

    let events = game.drain_events();
    assert!(events.contains(&GameEvent::GameOver(result)));
    let update = events.iter().find_map(|event| match event {
        GameEvent::ScoreUpdated(update) => Some(update.clone()),
        _ => None,
    });
    let update = update.ok_or(GameError::GameOver)?;
    assert_eq!((update.old_score, update.new_score, update.delta), (5, 15, 10));

    assert!(matches!(
        game.apply_action(1, Action::Draw),
        Err(GameError::GameOver)
    ));
    assert_eq!(game.legal_actions(1)?, Vec::<Action>::new());
    Ok(())
}

#[test]
fn last_card_wild_ends_the_game_without_a_prompt() -> Result<(), GameError> {
    let mut hands = single_card_hands();
    hands[0] = vec![Card::Wild(WildKind::DrawSeven)];
    let mut game = table(&hands, red(5), &[])?;
    game.play_card(0)?;
    assert_eq!(game.winner(), Some(0));
    assert_eq!(game.phase(), TurnPhase::GameOver);
    assert_eq!(game.pending_draw(), None);
    Ok(())
}

#[test]
fn losing_human_score_is_clamped_at_zero() -> Result<(), GameError> {
    let mut store = MemoryScoreStore::new();
    store
        .store("me", GameMode::Evaluate, 3)
        .map_err(|_| GameError::InvalidConfiguration("memory store"))?;
    let seats = vec![
        Seat::ai("bot0"),
        Seat::ai("bot1"),
        Seat::ai("bot2"),
        Seat::human("me"),
    ];
    let mut game = builder_for(&single_card_hands(), red(5), &[])?
        .with_seats(seats)
        .with_mode(GameMode::Evaluate)
        .with_score_store(Box::new(store))
        .build()?;
    assert_eq!(game.phase(), TurnPhase::AiTurnPending);
    game.run_ai_turn()?;
    assert_eq!(game.winner(), Some(0));
    let update = game.drain_events().into_iter().find_map(|event| match event {
        GameEvent::ScoreUpdated(update) => Some(update),
        _ => None,
    });
    let update = update.ok_or(GameError::GameOver)?;
    assert_eq!(update.account, "me");
    assert_eq!((update.old_score, update.new_score, update.delta), (3, 0, -10));
    Ok(())
}

struct OfflineStore;

impl ScoreRepository for OfflineStore {
    fn fetch(&mut self, _account: &str, _mode: GameMode) -> Result<Option<i64>, StoreError> {
        Err(StoreError::Unavailable(String::from("offline")))
    }

    fn store(&mut self, _account: &str, _mode: GameMode, _score: i64) -> Result<(), StoreError> {
        Err(StoreError::Unavailable(String::from("offline")))
    }
}

#[test]
fn failing_score_store_does_not_break_the_game() -> Result<(), GameError> {
    let mut game = builder_for(&single_card_hands(), red(5), &[])?
        .with_score_store(Box::new(OfflineStore))
        .build()?;
    game.play_card(0)?;
    assert!(game.is_finished());
    let events = game.drain_events();
    assert!(events.iter().any(|event| matches!(event, GameEvent::Notice(_))));
    assert!(!events
        .iter()
        .any(|event| matches!(event, GameEvent::ScoreUpdated(_))));
    Ok(())
}

#[test]
fn empty_deck_recycles_the_discard_pile() -> Result<(), GameError> {
    let hands = vec![vec![red(7), blue(1), blue(2)], vec![red(8), green(3), green(4)]];
    let mut game = table(&hands, red(5), &[])?;
    assert_eq!(game.deck_count(), 0);
    game.play_card(0)?;
    game.play_card(0)?;
    assert_eq!(game.discard_count(), 3);

    // Two cards sit under red 8; one comes back to player 0.
    game.drain_events();
    game.draw_card_for_current_player()?;
    assert_eq!(game.hand(0)?.len(), 3);
    assert_eq!(game.discard_top(), Some(red(8)));
    assert_eq!(game.discard_count(), 1);
    assert_eq!(game.deck_count(), 1);
    assert!(game.events().contains(&GameEvent::DiscardRecycled { cards: 2 }));
    assert_eq!(game.total_cards(), 7);
    Ok(())
}

#[test]
fn exhausted_piles_draw_nothing() -> Result<(), GameError> {
    let hands = vec![vec![blue(1), blue(2)], vec![green(3), green(4)]];
    let mut game = table(&hands, red(5), &[])?;
    game.drain_events();
    game.draw_card_for_current_player()?;
    assert_eq!(game.hand(0)?.len(), 2);
    assert!(game.events().contains(&GameEvent::Drew {
        player: 0,
        count: 0
    }));
    assert_eq!(game.current_player(), 1);
    Ok(())
}

#[test]
fn low_deck_is_augmented_with_a_fresh_set() -> Result<(), GameError> {
    let hands = vec![vec![blue(1), blue(2)], vec![green(3), green(4)]];
    let mut game = builder_for(&hands, red(5), &filler(3))?
        .with_refill_policy(RefillPolicy::Augment)
        .with_low_water_mark(3)
        .build()?;
    let before = game.total_cards();
    game.drain_events();
    game.draw_card_for_current_player()?;
    assert_eq!(game.total_cards(), before + 120);
    assert!(game
        .events()
        .contains(&GameEvent::DeckReplenished { added: 120 }));
    Ok(())
}

#[test]
fn state_view_shows_only_own_hand() -> Result<(), GameError> {
    let hands = four_hands([red(7), blue(1), green(2)]);
    let game = table(&hands, red(5), &[])?;
    let view = game.state_view(2)?;
    assert_eq!(view.hand, vec![red(9), blue(5), green(6)]);
    assert_eq!(view.self_player, 2);
    assert!(!view.uno_armed);
    assert_eq!(view.players[0].hand_size, 3);
    assert!(view.players[0].is_current);
    assert!(matches!(game.state_view(4), Err(GameError::InvalidPlayer(4))));
    Ok(())
}

#[test]
fn ai_turns_run_until_a_human_must_act() -> Result<(), GameError> {
    let mut game = GameBuilder::new(4)?
        .with_seed(17)
        .with_starting_player(1)
        .build()?;
    game.run_ai_turns()?;
    assert!(game.is_finished() || game.current_player() == 0);
    assert_ne!(game.phase(), TurnPhase::AiTurnPending);
    Ok(())
}
