//! Pure move-legality rules.
//!
//! Stateless predicates deciding where a card (or run of cards) may land.
//! The board consults these before every mutation; the solver uses the same
//! predicates when it enumerates remaining moves, so there is exactly one
//! definition of legality in the crate.

use smallvec::SmallVec;

use crate::cards::{Card, Rank};

/// A movable run buffer. 13 covers the longest possible descending chain.
pub type Run = SmallVec<[Card; 13]>;

/// Can `card` be placed on a tableau pile whose top card is `target`?
///
/// An empty column accepts only a King. Otherwise the card must be exactly
/// one rank below the target and the opposite color.
#[must_use]
pub fn can_place_on_tableau(card: Card, target: Option<Card>) -> bool {
    match target {
        None => card.rank == Rank::KING,
        Some(top) => {
            card.rank.value() + 1 == top.rank.value() && card.color() != top.color()
        }
    }
}

/// Can `card` be placed on a foundation whose top card is `top`?
///
/// An empty foundation accepts only an Ace. Otherwise the card must match the
/// suit and be exactly one rank above the top.
#[must_use]
pub fn can_place_on_foundation(card: Card, top: Option<Card>) -> bool {
    match top {
        None => card.rank == Rank::ACE,
        Some(top) => card.suit == top.suit && card.rank.value() == top.rank.value() + 1,
    }
}

/// Extract the movable run starting at `start` in `column`.
///
/// Returns the cards from `start` up to the point where the
/// descending-alternating-color chain breaks, or through the column end if it
/// never breaks. Out-of-bounds `start` yields an empty run.
///
/// Face-up state is NOT checked here: callers picking a run up must also
/// verify that the run covers the column's entire suffix and that every card
/// in it is face-up.
#[must_use]
pub fn movable_run(column: &[Card], start: usize) -> Run {
    let mut run = Run::new();
    let Some(&first) = column.get(start) else {
        return run;
    };
    run.push(first);

    for &card in &column[start + 1..] {
        let prev = *run.last().unwrap();
        if card.rank.value() + 1 == prev.rank.value() && card.color() != prev.color() {
            run.push(card);
        } else {
            break;
        }
    }
    run
}

/// Is the suffix `[start..]` of `column` a legal pickup?
///
/// True when the chain from `start` is unbroken through the column end and
/// every card in it is face-up.
#[must_use]
pub fn can_pick_up_run(column: &[Card], start: usize) -> bool {
    if start >= column.len() {
        return false;
    }
    column[start..].iter().all(|c| c.face_up)
        && movable_run(column, start).len() == column.len() - start
}
