//! Card system: value types and deck construction.
//!
//! ## Key Types
//!
//! - `Suit`, `Rank`, `Color`: immutable card attributes
//! - `Card`: value type `{suit, rank, face_up}`; equality excludes orientation
//! - `fresh_deck` / `shuffled_deck`: 52-card construction

pub mod card;
pub mod deck;

pub use card::{Card, Color, Rank, Suit};
pub use deck::{fresh_deck, shuffled_deck, Deck, DECK_SIZE};
