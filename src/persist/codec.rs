//! The flat save record and its tolerant codec.
//!
//! A game in progress serializes to a single flat record: the four pile
//! groups, the move count, the win and stalemate flags, and the start
//! timestamp. Decoding is lenient by design - a malformed card entry is
//! dropped, a missing scalar defaults, and a record that cannot be parsed at
//! all decodes to the default (empty) board. Loading never fails outright.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::board::{Board, FOUNDATION_PILES, TABLEAU_COLUMNS};
use crate::cards::{Card, Rank, Suit};

/// A card as persisted: suit tag, rank integer, face-up flag.
///
/// Fields are optional so that a partially corrupt entry deserializes rather
/// than poisoning the record; [`SavedCard::decode`] is where invalid entries
/// get dropped.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SavedCard {
    #[serde(default)]
    pub suit: Option<String>,
    #[serde(default)]
    pub rank: Option<i64>,
    #[serde(default)]
    pub face_up: bool,
}

impl SavedCard {
    fn of(card: Card) -> Self {
        Self {
            suit: Some(card.suit.tag().to_string()),
            rank: Some(i64::from(card.rank.value())),
            face_up: card.face_up,
        }
    }

    /// Decode back into a card, or `None` for a malformed entry
    /// (missing/unknown suit tag, out-of-range rank).
    #[must_use]
    pub fn decode(&self) -> Option<Card> {
        let suit = Suit::from_tag(self.suit.as_deref()?)?;
        let rank = Rank::new(u8::try_from(self.rank?).ok()?)?;
        Some(Card {
            suit,
            rank,
            face_up: self.face_up,
        })
    }
}

/// The flat persisted record.
///
/// Every field carries `#[serde(default)]`: a record missing any of them
/// still loads, with zero/false/absent in place.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SavedGame {
    #[serde(default)]
    pub stock: Vec<SavedCard>,
    #[serde(default)]
    pub waste: Vec<SavedCard>,
    #[serde(default)]
    pub tableau: Vec<Vec<SavedCard>>,
    #[serde(default)]
    pub foundations: Vec<Vec<SavedCard>>,
    #[serde(default)]
    pub move_count: u32,
    #[serde(default)]
    pub won: bool,
    /// Persisted for completeness; never trusted - recomputed on load.
    #[serde(default)]
    pub stalled: bool,
    /// Epoch seconds of the deal, or absent.
    #[serde(default)]
    pub started_at: Option<i64>,
}

/// Snapshot a board into the flat record.
#[must_use]
pub fn encode(board: &Board) -> SavedGame {
    let pile = |cards: &[Card]| cards.iter().copied().map(SavedCard::of).collect();

    SavedGame {
        stock: pile(board.stock()),
        waste: pile(board.waste()),
        tableau: board.columns().iter().map(|c| pile(c)).collect(),
        foundations: board.foundations().iter().map(|p| pile(p)).collect(),
        move_count: board.move_count(),
        won: board.is_won(),
        stalled: board.is_stalled(),
        started_at: board.started_at(),
    }
}

/// Rebuild a board from the flat record.
///
/// Malformed card entries are dropped; surplus tableau columns or foundation
/// piles beyond the fixed board layout are ignored; the stalemate flag is
/// recomputed from what actually loaded.
#[must_use]
pub fn decode(saved: &SavedGame) -> Board {
    let pile = |cards: &[SavedCard]| -> Vec<Card> {
        cards.iter().filter_map(SavedCard::decode).collect()
    };

    let mut tableau: [Vec<Card>; TABLEAU_COLUMNS] = Default::default();
    for (column, saved_column) in tableau.iter_mut().zip(&saved.tableau) {
        *column = pile(saved_column);
    }
    let mut foundations: [Vec<Card>; FOUNDATION_PILES] = Default::default();
    for (found, saved_pile) in foundations.iter_mut().zip(&saved.foundations) {
        *found = pile(saved_pile);
    }

    Board::restore(
        pile(&saved.stock),
        pile(&saved.waste),
        tableau,
        foundations,
        saved.move_count,
        saved.won,
        saved.started_at,
    )
}

/// Serialize a board to the JSON record text.
#[must_use]
pub fn to_json(board: &Board) -> String {
    // Serializing SavedGame cannot fail: no maps with non-string keys, no
    // custom Serialize impls.
    serde_json::to_string(&encode(board)).unwrap_or_default()
}

/// Deserialize a board from JSON record text.
///
/// Unparseable text yields the default (empty) board rather than an error.
#[must_use]
pub fn from_json(text: &str) -> Board {
    let saved: SavedGame = serde_json::from_str(text).unwrap_or_else(|err| {
        warn!(%err, "saved game record unparseable, starting from empty");
        SavedGame::default()
    });
    decode(&saved)
}
