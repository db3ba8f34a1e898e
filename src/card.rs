use std::fmt;

use serde::{Deserialize, Serialize};

/// Concrete card color. Black cards carry no color at all, so the active
/// color of a game can never be black.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    Red,
    Blue,
    Green,
    Yellow,
}

impl Color {
    pub const ALL: [Color; 4] = [Color::Red, Color::Blue, Color::Green, Color::Yellow];

    pub fn name(self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Blue => "blue",
            Color::Green => "green",
            Color::Yellow => "yellow",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Colored action cards.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    Skip,
    Reverse,
    DrawTwo,
}

/// Black cards. They are always playable.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum WildKind {
    Wild,
    DrawFour,
    DrawFive,
    DrawSix,
    DrawSeven,
}

/// Representation of a single card.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Card {
    /// Numbered card between 0 and 9.
    Number { color: Color, digit: u8 },
    Action { color: Color, kind: ActionKind },
    Wild(WildKind),
    /// Colored special card: its player hands a +3 draw to any other player.
    Turtle(Color),
}

/// Coarse card category, as shown to players.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum CardKind {
    Number,
    Action,
    Wild,
    Special,
}

/// The value tag of a card, independent of its color. Two cards of
/// different colors match when their faces are equal.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Face {
    Number(u8),
    Skip,
    Reverse,
    DrawTwo,
    DrawFour,
    DrawFive,
    DrawSix,
    DrawSeven,
    Turtle,
    Wild,
}

/// What happens after a card lands on the discard pile.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Effect {
    None,
    Skip,
    Reverse,
    Draw(u32),
    Turtle,
    ChooseColor,
}

pub const MAX_DIGIT: u8 = 9;
pub const FULL_DECK_SIZE: usize = 120;
pub const HAND_SIZE: usize = 7;
pub const LOW_WATER_MARK: usize = 15;
pub const UNO_PENALTY: usize = 2;
pub const TURTLE_DRAW: u32 = 3;
pub const DEFAULT_PLAYERS: usize = 4;
pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 10;

impl Card {
    #[inline]
    pub fn number(color: Color, digit: u8) -> Self {
        debug_assert!(digit <= MAX_DIGIT);
        Card::Number { color, digit }
    }

    #[inline]
    pub fn action(color: Color, kind: ActionKind) -> Self {
        Card::Action { color, kind }
    }

    /// Returns the card color, or `None` for black cards.
    #[inline]
    pub fn color(&self) -> Option<Color> {
        match self {
            Card::Number { color, .. } | Card::Action { color, .. } | Card::Turtle(color) => {
                Some(*color)
            }
            Card::Wild(_) => None,
        }
    }

    #[inline]
    pub fn is_black(&self) -> bool {
        matches!(self, Card::Wild(_))
    }

    pub fn face(&self) -> Face {
        match self {
            Card::Number { digit, .. } => Face::Number(*digit),
            Card::Action { kind, .. } => match kind {
                ActionKind::Skip => Face::Skip,
                ActionKind::Reverse => Face::Reverse,
                ActionKind::DrawTwo => Face::DrawTwo,
            },
            Card::Wild(kind) => match kind {
                WildKind::Wild => Face::Wild,
                WildKind::DrawFour => Face::DrawFour,
                WildKind::DrawFive => Face::DrawFive,
                WildKind::DrawSix => Face::DrawSix,
                WildKind::DrawSeven => Face::DrawSeven,
            },
            Card::Turtle(_) => Face::Turtle,
        }
    }

    pub fn kind(&self) -> CardKind {
        match self {
            Card::Number { .. } => CardKind::Number,
            Card::Action { .. } => CardKind::Action,
            Card::Wild(WildKind::Wild | WildKind::DrawFour) => CardKind::Wild,
            Card::Wild(_) | Card::Turtle(_) => CardKind::Special,
        }
    }

    pub fn effect(&self) -> Effect {
        match self.face() {
            Face::Number(_) => Effect::None,
            Face::Skip => Effect::Skip,
            Face::Reverse => Effect::Reverse,
            Face::DrawTwo => Effect::Draw(2),
            Face::DrawFour => Effect::Draw(4),
            Face::DrawFive => Effect::Draw(5),
            Face::DrawSix => Effect::Draw(6),
            Face::DrawSeven => Effect::Draw(7),
            Face::Turtle => Effect::Turtle,
            Face::Wild => Effect::ChooseColor,
        }
    }

    /// Checks whether the card can legally be played against the active
    /// color and value.
    #[inline]
    pub fn is_playable_on(&self, color: Color, value: Option<Face>) -> bool {
        self.is_black() || self.color() == Some(color) || value == Some(self.face())
    }
}

impl Face {
    /// Play preference of the built-in AI. Lower ranks are played first.
    pub fn priority(self) -> u8 {
        match self {
            Face::Number(digit) => MAX_DIGIT.saturating_sub(digit) + 1,
            Face::Reverse => 11,
            Face::Skip => 12,
            Face::DrawTwo => 13,
            Face::DrawFour => 14,
            Face::DrawFive => 15,
            Face::DrawSix => 16,
            Face::DrawSeven => 17,
            Face::Turtle => 18,
            Face::Wild => 19,
        }
    }

    pub fn label(self) -> String {
        match self {
            Face::Number(digit) => digit.to_string(),
            Face::Skip => String::from("skip"),
            Face::Reverse => String::from("reverse"),
            Face::DrawTwo => String::from("+2"),
            Face::DrawFour => String::from("+4"),
            Face::DrawFive => String::from("+5"),
            Face::DrawSix => String::from("+6"),
            Face::DrawSeven => String::from("+7"),
            Face::Turtle => String::from("turtle"),
            Face::Wild => String::from("wild"),
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.color() {
            Some(color) => write!(f, "{color} {}", self.face().label()),
            None => write!(f, "black {}", self.face().label()),
        }
    }
}

/// Builds a full 120-card deck in deterministic order (unshuffled).
pub fn full_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(FULL_DECK_SIZE);
    for color in Color::ALL {
        deck.push(Card::number(color, 0));
        for digit in 1..=MAX_DIGIT {
            deck.push(Card::number(color, digit));
            deck.push(Card::number(color, digit));
        }
        for kind in [ActionKind::Skip, ActionKind::Reverse, ActionKind::DrawTwo] {
            deck.push(Card::action(color, kind));
            deck.push(Card::action(color, kind));
        }
    }
    for _ in 0..4 {
        deck.push(Card::Wild(WildKind::Wild));
        deck.push(Card::Wild(WildKind::DrawFour));
    }
    deck.push(Card::Wild(WildKind::DrawFive));
    deck.push(Card::Wild(WildKind::DrawFive));
    deck.push(Card::Wild(WildKind::DrawSix));
    deck.push(Card::Wild(WildKind::DrawSeven));
    for color in Color::ALL {
        deck.push(Card::Turtle(color));
        deck.push(Card::Turtle(color));
    }
    deck
}
