//! Card value types: suit, rank, and the card itself.
//!
//! ## Identity vs Orientation
//!
//! Two cards are equal iff suit and rank match. The `face_up` flag is
//! presentation state and is excluded from `PartialEq`/`Hash` - a card does
//! not become a different card when it flips. Board-level comparisons that
//! care about orientation use [`Card::eq_with_orientation`].

use serde::{Deserialize, Serialize};

/// The color of a suit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Red,
    Black,
}

/// One of the four suits in a standard deck.
///
/// Serializes as its lowercase name (`"hearts"`, `"spades"`, ...), which is
/// also the tag used by the persistence codec.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Suit {
    Hearts,
    Diamonds,
    Clubs,
    Spades,
}

impl Suit {
    /// All suits in a fixed, reproducible order.
    pub const ALL: [Suit; 4] = [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades];

    /// The fixed color of this suit.
    #[must_use]
    pub fn color(self) -> Color {
        match self {
            Suit::Hearts | Suit::Diamonds => Color::Red,
            Suit::Clubs | Suit::Spades => Color::Black,
        }
    }

    /// The lowercase tag used in persisted records.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Suit::Hearts => "hearts",
            Suit::Diamonds => "diamonds",
            Suit::Clubs => "clubs",
            Suit::Spades => "spades",
        }
    }

    /// Parse a persisted tag back into a suit.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "hearts" => Some(Suit::Hearts),
            "diamonds" => Some(Suit::Diamonds),
            "clubs" => Some(Suit::Clubs),
            "spades" => Some(Suit::Spades),
            _ => None,
        }
    }

    /// Unicode symbol for display.
    #[must_use]
    pub fn symbol(self) -> char {
        match self {
            Suit::Hearts => '\u{2665}',
            Suit::Diamonds => '\u{2666}',
            Suit::Clubs => '\u{2663}',
            Suit::Spades => '\u{2660}',
        }
    }
}

impl std::fmt::Display for Suit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A card rank in 1..=13.
///
/// Ace is 1, Jack 11, Queen 12, King 13. Construction is checked; a `Rank`
/// in hand is always valid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Rank(u8);

impl Rank {
    pub const ACE: Rank = Rank(1);
    pub const JACK: Rank = Rank(11);
    pub const QUEEN: Rank = Rank(12);
    pub const KING: Rank = Rank(13);

    /// Lowest and highest valid rank values.
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 13;

    /// Create a rank, returning `None` unless `value` is in 1..=13.
    #[must_use]
    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Rank(value))
    }

    /// The numeric value in 1..=13.
    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    /// All ranks in ascending order (Ace..King).
    pub fn all() -> impl Iterator<Item = Rank> {
        (Self::MIN..=Self::MAX).map(Rank)
    }

    /// Display alias: `"A"`, `"2"`..`"10"`, `"J"`, `"Q"`, `"K"`.
    #[must_use]
    pub fn label(self) -> &'static str {
        const LABELS: [&str; 13] = [
            "A", "2", "3", "4", "5", "6", "7", "8", "9", "10", "J", "Q", "K",
        ];
        LABELS[(self.0 - 1) as usize]
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A playing card.
///
/// Equality and hashing cover suit and rank only; see the module docs.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Card {
    pub suit: Suit,
    pub rank: Rank,
    pub face_up: bool,
}

impl PartialEq for Card {
    fn eq(&self, other: &Self) -> bool {
        self.suit == other.suit && self.rank == other.rank
    }
}

impl Eq for Card {}

impl std::hash::Hash for Card {
    fn hash<H: std::hash::Hasher>(&self, hasher: &mut H) {
        self.suit.hash(hasher);
        self.rank.hash(hasher);
    }
}

impl Card {
    /// Create a face-down card.
    #[must_use]
    pub fn new(suit: Suit, rank: Rank) -> Self {
        Self {
            suit,
            rank,
            face_up: false,
        }
    }

    /// Create a face-up card.
    #[must_use]
    pub fn face_up(suit: Suit, rank: Rank) -> Self {
        Self {
            suit,
            rank,
            face_up: true,
        }
    }

    /// The color of this card's suit.
    #[must_use]
    pub fn color(self) -> Color {
        self.suit.color()
    }

    /// Compare identity and orientation both.
    ///
    /// Used for board equality, where a flipped card is an observable
    /// difference even though the card itself is "the same card".
    #[must_use]
    pub fn eq_with_orientation(self, other: Card) -> bool {
        self == other && self.face_up == other.face_up
    }

    /// Short label like `"Q♠"` or `"10♥"`, for logs and debugging.
    #[must_use]
    pub fn label(self) -> String {
        format!("{}{}", self.rank.label(), self.suit.symbol())
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}
