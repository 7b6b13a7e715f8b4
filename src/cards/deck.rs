//! Full-deck construction and shuffling.

use smallvec::SmallVec;

use super::card::{Card, Rank, Suit};
use crate::core::rng::GameRng;

/// Number of cards in a standard deck.
pub const DECK_SIZE: usize = 52;

/// A full deck, sized exactly for 52 cards.
pub type Deck = SmallVec<[Card; DECK_SIZE]>;

/// Build a fresh deck: the Cartesian product of the 4 suits and 13 ranks,
/// all face-down, in a fixed order.
#[must_use]
pub fn fresh_deck() -> Deck {
    let mut deck = Deck::new();
    for suit in Suit::ALL {
        for rank in Rank::all() {
            deck.push(Card::new(suit, rank));
        }
    }
    deck
}

/// Build a freshly shuffled deck using the engine RNG.
#[must_use]
pub fn shuffled_deck(rng: &mut GameRng) -> Deck {
    let mut deck = fresh_deck();
    rng.shuffle(&mut deck);
    deck
}
