use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, trace, warn};

use crate::action::{Action, PlayerId, UnoCall};
use crate::ai;
use crate::card::{Card, Color, Effect, Face, TURTLE_DRAW, UNO_PENALTY};
use crate::config::{AiConfig, GameConfig};
use crate::deck::{Deck, DiscardPile, RefillPolicy};
use crate::error::{GameError, InvalidAction};
use crate::events::{GameEvent, PenaltyReason};
use crate::score::{GameMode, GameResult, Standing, apply_delta, rank_players};
use crate::state::{
    Continuation, Direction, GameSettings, GameStateView, GameStatus, PendingDraw,
    PlayerPublicState, Seat, TurnPhase,
};
use crate::store::ScoreRepository;

/// Builder that enables deterministic decks and seating for tests and hosts.
pub struct GameBuilder {
    config: GameConfig,
    seats: Option<Vec<Seat>>,
    deck: Option<Vec<Card>>,
    starting_player: Option<PlayerId>,
    score_store: Option<Box<dyn ScoreRepository>>,
}

impl GameBuilder {
    pub fn new(num_players: usize) -> Result<Self, GameError> {
        let config = GameConfig {
            num_players,
            ..GameConfig::default()
        };
        Self::from_config(config)
    }

    pub fn from_config(config: GameConfig) -> Result<Self, GameError> {
        config.validate()?;
        Ok(Self {
            config,
            seats: None,
            deck: None,
            starting_player: None,
            score_store: None,
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn with_mode(mut self, mode: GameMode) -> Self {
        self.config.mode = mode;
        self
    }

    /// Override the number of cards dealt to each player (7 by default).
    pub fn with_hand_size(mut self, hand_size: usize) -> Self {
        self.config.hand_size = hand_size;
        self
    }

    pub fn with_refill_policy(mut self, refill: RefillPolicy) -> Self {
        self.config.refill = refill;
        self
    }

    pub fn with_low_water_mark(mut self, low_water_mark: usize) -> Self {
        self.config.low_water_mark = low_water_mark;
        self
    }

    pub fn with_ai_config(mut self, ai: AiConfig) -> Self {
        self.config.ai = ai;
        self
    }

    pub fn with_seats(mut self, seats: Vec<Seat>) -> Self {
        self.seats = Some(seats);
        self
    }

    /// Use `deck` instead of a shuffled full deck. Cards are drawn from the
    /// end of the vector.
    pub fn with_deck(mut self, deck: Vec<Card>) -> Self {
        self.deck = Some(deck);
        self
    }

    /// Fix the starting player instead of picking one at random.
    pub fn with_starting_player(mut self, player: PlayerId) -> Self {
        self.starting_player = Some(player);
        self
    }

    /// Store that receives the human seat's score change when the game ends.
    pub fn with_score_store(mut self, store: Box<dyn ScoreRepository>) -> Self {
        self.score_store = Some(store);
        self
    }

    pub fn build(self) -> Result<Game, GameError> {
        Game::from_builder(self)
    }
}

/// How a resolved effect hands control back.
enum Resolution {
    Advance(usize),
    Prompt,
}

struct PlayerState {
    seat: Seat,
    hand: Vec<Card>,
    uno_called: bool,
}

impl PlayerState {
    fn new(seat: Seat, hand_size: usize) -> Self {
        Self {
            seat,
            hand: Vec::with_capacity(hand_size),
            uno_called: false,
        }
    }
}

/// Core game engine. Owns every card and all turn state of one match.
pub struct Game {
    settings: GameSettings,
    ai: AiConfig,
    status: GameStatus,
    phase: TurnPhase,
    players: Vec<PlayerState>,
    current_player: PlayerId,
    direction: Direction,
    active_color: Color,
    active_value: Option<Face>,
    pending_draw: Option<PendingDraw>,
    deck: Deck,
    discard: DiscardPile,
    uno_armed: bool,
    turns: usize,
    result: Option<GameResult>,
    score_store: Option<Box<dyn ScoreRepository>>,
    events: Vec<GameEvent>,
    rng: StdRng,
}

impl Game {
    pub fn builder(num_players: usize) -> Result<GameBuilder, GameError> {
        GameBuilder::new(num_players)
    }

    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        GameBuilder::from_config(config)?.build()
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn settings(&self) -> GameSettings {
        self.settings
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn current_player(&self) -> PlayerId {
        self.current_player
    }

    pub fn num_players(&self) -> usize {
        self.players.len()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn active_color(&self) -> Color {
        self.active_color
    }

    pub fn active_value(&self) -> Option<Face> {
        self.active_value
    }

    pub fn pending_draw(&self) -> Option<PendingDraw> {
        self.pending_draw
    }

    pub fn discard_top(&self) -> Option<Card> {
        self.discard.top()
    }

    pub fn deck_count(&self) -> usize {
        self.deck.len()
    }

    pub fn discard_count(&self) -> usize {
        self.discard.len()
    }

    pub fn uno_armed(&self) -> bool {
        self.uno_armed
    }

    /// Number of turns begun so far.
    pub fn turns(&self) -> usize {
        self.turns
    }

    /// How long the host should wait before calling [`Game::run_ai_turn`].
    pub fn ai_delay(&self) -> Duration {
        self.ai.turn_delay()
    }

    pub fn seat(&self, player: PlayerId) -> Result<&Seat, GameError> {
        self.players
            .get(player)
            .map(|state| &state.seat)
            .ok_or(GameError::InvalidPlayer(player))
    }

    pub fn hand(&self, player: PlayerId) -> Result<&[Card], GameError> {
        self.players
            .get(player)
            .map(|state| state.hand.as_slice())
            .ok_or(GameError::InvalidPlayer(player))
    }

    pub fn uno_called(&self, player: PlayerId) -> Result<bool, GameError> {
        self.players
            .get(player)
            .map(|state| state.uno_called)
            .ok_or(GameError::InvalidPlayer(player))
    }

    pub fn player_names(&self) -> Vec<String> {
        self.players
            .iter()
            .map(|state| state.seat.name.clone())
            .collect()
    }

    /// Cards in all hands, the draw pile and the discard pile.
    pub fn total_cards(&self) -> usize {
        self.players
            .iter()
            .map(|state| state.hand.len())
            .sum::<usize>()
            + self.deck.len()
            + self.discard.len()
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.status, GameStatus::Finished { .. })
    }

    pub fn winner(&self) -> Option<PlayerId> {
        match self.status {
            GameStatus::Finished { winner } => Some(winner),
            GameStatus::Ongoing => None,
        }
    }

    pub fn result(&self) -> Option<&GameResult> {
        self.result.as_ref()
    }

    /// Events emitted since the last drain.
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn state_view(&self, perspective: PlayerId) -> Result<GameStateView, GameError> {
        if perspective >= self.players.len() {
            return Err(GameError::InvalidPlayer(perspective));
        }
        let players = self
            .players
            .iter()
            .enumerate()
            .map(|(idx, state)| PlayerPublicState {
                id: idx,
                name: state.seat.name.clone(),
                is_human: state.seat.is_human,
                hand_size: state.hand.len(),
                uno_called: state.uno_called,
                is_current: idx == self.current_player,
            })
            .collect();

        Ok(GameStateView {
            settings: self.settings,
            phase: self.phase,
            status: self.status,
            self_player: perspective,
            current_player: self.current_player,
            direction: self.direction,
            active_color: self.active_color,
            active_value: self.active_value,
            discard_top: self.discard.top(),
            deck_count: self.deck.len(),
            discard_count: self.discard.len(),
            pending_draw: self.pending_draw,
            uno_armed: self.uno_armed && perspective == self.current_player,
            players,
            hand: self.players[perspective].hand.clone(),
        })
    }

    /// Actions the given human seat may submit right now. Empty while the
    /// game is over or an AI turn is pending.
    pub fn legal_actions(&self, player: PlayerId) -> Result<Vec<Action>, GameError> {
        if self.is_finished() {
            return Ok(Vec::new());
        }
        if player >= self.players.len() {
            return Err(GameError::InvalidPlayer(player));
        }
        if player != self.current_player {
            return Err(GameError::NotPlayersTurn);
        }
        let actions = match self.phase {
            TurnPhase::AwaitingColorChoice { .. } => {
                Color::ALL.into_iter().map(Action::ChooseColor).collect()
            }
            TurnPhase::AwaitingTurtleTarget { player, .. } => (0..self.players.len())
                .filter(|&target| target != player)
                .map(Action::ChooseTarget)
                .collect(),
            TurnPhase::AwaitingAction => {
                let mut actions: Vec<Action> = self
                    .playable_cards(player)
                    .into_iter()
                    .map(|(hand_index, _)| Action::Play { hand_index })
                    .collect();
                actions.push(Action::Draw);
                if self.uno_armed && self.players[player].hand.len() == 2 {
                    actions.push(Action::CallUno);
                }
                actions
            }
            TurnPhase::AiTurnPending | TurnPhase::GameOver => Vec::new(),
        };
        Ok(actions)
    }

    /// Entry point for human seats. AI seats are driven by [`Game::run_ai_turn`].
    pub fn apply_action(&mut self, player: PlayerId, action: Action) -> Result<(), GameError> {
        self.check_human_turn(player)?;
        match action {
            Action::ChooseColor(color) => self.answer_color(color),
            Action::ChooseTarget(target) => self.answer_target(target),
            _ if self.phase.is_prompt() => Err(InvalidAction::PromptPending.into()),
            Action::Play { hand_index } => self.play_card_at(hand_index),
            Action::Draw => {
                self.draw_for_current();
                Ok(())
            }
            Action::CallUno => self.call_uno_for_current().map(|_| ()),
        }
    }

    pub fn play_card(&mut self, hand_index: usize) -> Result<(), GameError> {
        self.apply_action(self.current_player, Action::Play { hand_index })
    }

    pub fn draw_card_for_current_player(&mut self) -> Result<(), GameError> {
        self.apply_action(self.current_player, Action::Draw)
    }

    pub fn call_uno(&mut self) -> Result<UnoCall, GameError> {
        self.check_human_turn(self.current_player)?;
        if self.phase.is_prompt() {
            return Err(InvalidAction::PromptPending.into());
        }
        self.call_uno_for_current()
    }

    pub fn choose_color(&mut self, color: Color) -> Result<(), GameError> {
        self.apply_action(self.current_player, Action::ChooseColor(color))
    }

    pub fn choose_turtle_target(&mut self, target: PlayerId) -> Result<(), GameError> {
        self.apply_action(self.current_player, Action::ChooseTarget(target))
    }

    /// Plays the pending AI turn: maybe call UNO, then play or draw.
    pub fn run_ai_turn(&mut self) -> Result<(), GameError> {
        if self.is_finished() {
            return Err(GameError::GameOver);
        }
        if self.phase != TurnPhase::AiTurnPending {
            return Err(GameError::NoAiTurnPending);
        }
        let player = self.current_player;
        let hand_size = self.players[player].hand.len();
        if ai::wants_uno(hand_size, &self.ai, &mut self.rng) {
            self.players[player].uno_called = true;
            self.events.push(GameEvent::UnoCalled { player });
        }
        let playable = self.playable_cards(player);
        let choice = ai::choose_card(
            &playable,
            self.active_color,
            self.active_value,
            &self.ai,
            &mut self.rng,
        );
        match choice {
            Some(hand_index) => {
                trace!(player, hand_index, "AI plays");
                self.play_card_at(hand_index)
            }
            None => {
                trace!(player, "AI has no playable card");
                self.draw_for_current();
                Ok(())
            }
        }
    }

    /// Runs AI turns back to back until a human seat must act or the game ends.
    pub fn run_ai_turns(&mut self) -> Result<(), GameError> {
        while self.phase == TurnPhase::AiTurnPending {
            self.run_ai_turn()?;
        }
        Ok(())
    }

    fn from_builder(builder: GameBuilder) -> Result<Self, GameError> {
        let GameBuilder {
            config,
            seats,
            deck,
            starting_player,
            score_store,
        } = builder;
        config.validate()?;
        let settings = config.settings();
        let seats = seats.unwrap_or_else(|| Seat::default_table(settings.num_players));
        if seats.len() != settings.num_players {
            return Err(GameError::InvalidConfiguration(
                "seat count must match the number of players",
            ));
        }
        if let Some(player) = starting_player {
            if player >= settings.num_players {
                return Err(GameError::InvalidPlayer(player));
            }
        }
        let mut rng = StdRng::seed_from_u64(config.seed);
        let deck = match deck {
            Some(cards) => {
                if cards.len() < settings.num_players * settings.hand_size + 1 {
                    return Err(GameError::InvalidConfiguration(
                        "deck does not contain enough cards to deal",
                    ));
                }
                Deck::new(cards, settings.low_water_mark, settings.refill)
            }
            None => Deck::shuffled(&mut rng, settings.low_water_mark, settings.refill),
        };
        let players = seats
            .into_iter()
            .map(|seat| PlayerState::new(seat, settings.hand_size))
            .collect();

        let mut game = Game {
            settings,
            ai: config.ai,
            status: GameStatus::Ongoing,
            phase: TurnPhase::AwaitingAction,
            players,
            current_player: 0,
            direction: Direction::default(),
            active_color: Color::Red,
            active_value: None,
            pending_draw: None,
            deck,
            discard: DiscardPile::new(),
            uno_armed: false,
            turns: 0,
            result: None,
            score_store,
            events: Vec::new(),
            rng,
        };

        game.deal();
        game.start(starting_player)?;
        Ok(game)
    }

    fn deal(&mut self) {
        for player in 0..self.players.len() {
            self.give_cards(player, self.settings.hand_size);
        }
    }

    fn start(&mut self, starting_player: Option<PlayerId>) -> Result<(), GameError> {
        let mut attempts = self.deck.len().max(1);
        let (card, color) = loop {
            let Some(card) = self.draw_one() else {
                return Err(GameError::InvalidConfiguration(
                    "deck ran out before a starting card was found",
                ));
            };
            if let Some(color) = card.color() {
                break (card, color);
            }
            self.deck.put_bottom(card);
            attempts -= 1;
            if attempts == 0 {
                return Err(GameError::InvalidConfiguration(
                    "deck holds no colored card to start with",
                ));
            }
        };
        self.discard.push(card);
        self.active_color = color;
        self.active_value = Some(card.face());
        self.current_player = match starting_player {
            Some(player) => player,
            None => self.rng.gen_range(0..self.players.len()),
        };
        info!(
            first = self.current_player,
            card = %card,
            players = self.players.len(),
            "game started"
        );
        self.events.push(GameEvent::Started {
            first: self.current_player,
            card,
        });

        // The opening card acts for the starting player; only a skip moves the turn.
        match self.resolve_effect(card, Continuation::BeginTurn) {
            Resolution::Advance(steps) if steps > 1 => {
                self.events.push(GameEvent::Skipped {
                    player: self.current_player,
                });
                self.advance(steps - 1);
            }
            Resolution::Advance(_) => self.begin_turn(),
            Resolution::Prompt => {}
        }
        Ok(())
    }

    fn check_human_turn(&self, player: PlayerId) -> Result<(), GameError> {
        if self.is_finished() {
            return Err(GameError::GameOver);
        }
        let Some(state) = self.players.get(player) else {
            return Err(GameError::InvalidPlayer(player));
        };
        if player != self.current_player {
            return Err(GameError::NotPlayersTurn);
        }
        if !state.seat.is_human {
            return Err(GameError::NotHumanSeat(player));
        }
        if self.phase == TurnPhase::AiTurnPending {
            return Err(GameError::AiTurnPending);
        }
        Ok(())
    }

    fn playable_cards(&self, player: PlayerId) -> Vec<(usize, Card)> {
        self.players[player]
            .hand
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, card)| card.is_playable_on(self.active_color, self.active_value))
            .collect()
    }

    fn play_card_at(&mut self, hand_index: usize) -> Result<(), GameError> {
        let player = self.current_player;
        let card = *self.players[player]
            .hand
            .get(hand_index)
            .ok_or(InvalidAction::HandIndex(hand_index))?;
        if !card.is_playable_on(self.active_color, self.active_value) {
            return Err(InvalidAction::CardMismatch {
                card,
                color: self.active_color,
                value: self.active_value,
            }
            .into());
        }

        let state = &self.players[player];
        if state.seat.is_human && state.hand.len() == 2 && !state.uno_called {
            let count = self.give_cards(player, UNO_PENALTY);
            debug!(player, count, "missed UNO penalty");
            self.events.push(GameEvent::Penalty {
                player,
                reason: PenaltyReason::MissedUno,
                count,
            });
        }

        // Penalty cards are appended, so `hand_index` still points at `card`.
        self.players[player].hand.remove(hand_index);
        self.uno_armed = false;
        self.discard.push(card);
        if let Some(color) = card.color() {
            self.active_color = color;
        }
        self.active_value = match card.effect() {
            Effect::ChooseColor => None,
            _ => Some(card.face()),
        };
        debug!(player, card = %card, "card played");
        self.events.push(GameEvent::Played { player, card });

        if self.players[player].hand.is_empty() {
            self.finish(player);
            return Ok(());
        }
        match self.resolve_effect(card, Continuation::AdvanceTurn) {
            Resolution::Advance(steps) => self.advance(steps),
            Resolution::Prompt => {}
        }
        Ok(())
    }

    fn resolve_effect(&mut self, card: Card, then: Continuation) -> Resolution {
        let actor = self.current_player;
        let is_human = self.players[actor].seat.is_human;
        match card.effect() {
            Effect::None => Resolution::Advance(1),
            Effect::Skip => Resolution::Advance(2),
            Effect::Reverse => {
                self.direction = self.direction.reversed();
                self.events.push(GameEvent::Reversed {
                    direction: self.direction,
                });
                Resolution::Advance(1)
            }
            Effect::Draw(count) => {
                let target = self.direction.step(actor, self.players.len());
                self.stack_draw(target, count);
                Resolution::Advance(1)
            }
            Effect::Turtle if is_human => {
                let candidates = (0..self.players.len())
                    .filter(|&idx| idx != actor)
                    .collect();
                self.phase = TurnPhase::AwaitingTurtleTarget {
                    player: actor,
                    then,
                };
                self.events.push(GameEvent::TurtlePrompt {
                    player: actor,
                    candidates,
                });
                Resolution::Prompt
            }
            Effect::Turtle => {
                let target = ai::choose_target(actor, self.players.len(), &mut self.rng);
                self.target_turtle(actor, target);
                Resolution::Advance(1)
            }
            Effect::ChooseColor if is_human => {
                self.phase = TurnPhase::AwaitingColorChoice {
                    player: actor,
                    then,
                };
                self.events.push(GameEvent::ColorPrompt { player: actor });
                Resolution::Prompt
            }
            Effect::ChooseColor => {
                let color = ai::choose_color(&mut self.rng);
                self.set_color(actor, color);
                Resolution::Advance(1)
            }
        }
    }

    fn answer_color(&mut self, color: Color) -> Result<(), GameError> {
        let TurnPhase::AwaitingColorChoice { player, then } = self.phase else {
            return Err(self.prompt_mismatch());
        };
        self.set_color(player, color);
        self.continue_with(then);
        Ok(())
    }

    fn answer_target(&mut self, target: PlayerId) -> Result<(), GameError> {
        let TurnPhase::AwaitingTurtleTarget { player, then } = self.phase else {
            return Err(self.prompt_mismatch());
        };
        if target == player || target >= self.players.len() {
            return Err(InvalidAction::InvalidTarget(target).into());
        }
        self.target_turtle(player, target);
        self.continue_with(then);
        Ok(())
    }

    fn prompt_mismatch(&self) -> GameError {
        if self.phase.is_prompt() {
            InvalidAction::PromptPending.into()
        } else {
            InvalidAction::NoPromptPending.into()
        }
    }

    fn continue_with(&mut self, then: Continuation) {
        match then {
            Continuation::AdvanceTurn => self.advance(1),
            Continuation::BeginTurn => self.begin_turn(),
        }
    }

    fn set_color(&mut self, player: PlayerId, color: Color) {
        self.active_color = color;
        debug!(player, %color, "color chosen");
        self.events.push(GameEvent::ColorChosen { player, color });
    }

    fn target_turtle(&mut self, player: PlayerId, target: PlayerId) {
        self.events.push(GameEvent::TurtleTargeted { player, target });
        self.stack_draw(target, TURTLE_DRAW);
    }

    fn stack_draw(&mut self, target: PlayerId, count: u32) {
        let total = self.pending_draw.map_or(0, |pending| pending.count) + count;
        self.pending_draw = Some(PendingDraw {
            target,
            count: total,
        });
        debug!(target, total, "draw stacked");
        self.events.push(GameEvent::DrawStacked { target, total });
    }

    fn draw_for_current(&mut self) {
        let player = self.current_player;
        let count = self.give_cards(player, 1);
        self.events.push(GameEvent::Drew { player, count });
        self.advance(1);
    }

    fn call_uno_for_current(&mut self) -> Result<UnoCall, GameError> {
        if !self.uno_armed {
            return Err(InvalidAction::UnoUnavailable.into());
        }
        let player = self.current_player;
        if self.players[player].hand.len() == 2 {
            self.players[player].uno_called = true;
            self.uno_armed = false;
            self.events.push(GameEvent::UnoCalled { player });
            return Ok(UnoCall::Called);
        }
        let drawn = self.give_cards(player, UNO_PENALTY);
        debug!(player, drawn, "false UNO penalty");
        self.events.push(GameEvent::Penalty {
            player,
            reason: PenaltyReason::FalseUno,
            count: drawn,
        });
        Ok(UnoCall::Penalized { drawn })
    }

    /// Moves the turn `steps` seats along. Every seat passed over is
    /// skipped; a seat owing a pending draw takes it and loses its turn.
    fn advance(&mut self, steps: usize) {
        let mut remaining = steps;
        while remaining > 0 {
            if self.is_finished() {
                return;
            }
            self.current_player = self.direction.step(self.current_player, self.players.len());
            remaining -= 1;
            if let Some(winner) = self.players.iter().position(|state| state.hand.is_empty()) {
                self.finish(winner);
                return;
            }
            let current = self.current_player;
            if let Some(pending) = self.pending_draw.filter(|pending| pending.target == current) {
                self.pending_draw = None;
                let count = self.give_cards(current, pending.count as usize);
                debug!(player = current, count, "pending draw discharged");
                self.events.push(GameEvent::DrawDischarged {
                    player: current,
                    count,
                });
                remaining = remaining.max(1);
                continue;
            }
            if remaining > 0 {
                self.events.push(GameEvent::Skipped { player: current });
            }
        }
        self.begin_turn();
    }

    fn begin_turn(&mut self) {
        if self.is_finished() {
            self.phase = TurnPhase::GameOver;
            return;
        }
        self.turns += 1;
        let player = self.current_player;
        let is_human = self.players[player].seat.is_human;
        self.uno_armed = is_human;
        self.events.push(GameEvent::TurnStarted { player });
        if is_human {
            self.phase = TurnPhase::AwaitingAction;
        } else {
            self.phase = TurnPhase::AiTurnPending;
            self.events.push(GameEvent::AiTurnScheduled {
                player,
                delay: self.ai.turn_delay(),
            });
        }
    }

    /// Draws up to `count` cards into a hand. Any new card clears the
    /// player's UNO call.
    fn give_cards(&mut self, player: PlayerId, count: usize) -> usize {
        let mut drawn = 0;
        for _ in 0..count {
            let Some(card) = self.draw_one() else {
                warn!(player, wanted = count, drawn, "no cards left to draw");
                break;
            };
            self.players[player].hand.push(card);
            drawn += 1;
        }
        if drawn > 0 {
            self.players[player].uno_called = false;
        }
        drawn
    }

    fn draw_one(&mut self) -> Option<Card> {
        let draw = self.deck.draw(&mut self.discard, &mut self.rng);
        if draw.augmented > 0 {
            self.events.push(GameEvent::DeckReplenished {
                added: draw.augmented,
            });
        }
        if draw.recycled > 0 {
            self.events.push(GameEvent::DiscardRecycled {
                cards: draw.recycled,
            });
        }
        draw.card
    }

    fn finish(&mut self, winner: PlayerId) {
        if self.result.is_some() {
            return;
        }
        self.status = GameStatus::Finished { winner };
        self.phase = TurnPhase::GameOver;
        self.uno_armed = false;
        self.pending_draw = None;
        let standings: Vec<Standing<'_>> = self
            .players
            .iter()
            .map(|state| Standing {
                name: &state.seat.name,
                is_human: state.seat.is_human,
                hand_size: state.hand.len(),
            })
            .collect();
        let rankings = rank_players(&standings, self.settings.mode);
        let human = rankings.iter().find(|ranking| ranking.is_human).cloned();
        let result = GameResult {
            winner,
            mode: self.settings.mode,
            rankings,
            human,
        };
        info!(winner, turns = self.turns, "game over");
        self.events.push(GameEvent::GameOver(result.clone()));
        self.settle_score(&result);
        self.result = Some(result);
    }

    fn settle_score(&mut self, result: &GameResult) {
        let Some(human) = result.human.as_ref() else {
            return;
        };
        let Some(store) = self.score_store.as_deref_mut() else {
            return;
        };
        match apply_delta(store, &human.name, result.mode, human.delta) {
            Ok(update) => {
                info!(
                    account = %update.account,
                    old = update.old_score,
                    new = update.new_score,
                    "score updated"
                );
                self.events.push(GameEvent::ScoreUpdated(update));
            }
            Err(err) => {
                warn!(account = %human.name, error = %err, "score update skipped");
                self.events
                    .push(GameEvent::Notice(format!("score update failed: {err}")));
            }
        }
    }
}
