//! Stalemate detection and the end-game auto-solver.
//!
//! ## Stalemate
//!
//! [`has_available_move`] is re-evaluated by the board after every committed
//! mutation and once at deal time. It short-circuits on the first remaining
//! move it finds. A non-empty stock (a draw is always available) or a
//! recyclable waste always counts as "moves remain".
//!
//! ## Auto-completion
//!
//! When every tableau card is face-up and the stock is empty, the board can
//! be drained into the foundations by a deterministic greedy loop: tableau
//! columns in index order first, then the waste top, foundations scanned in
//! index order, first match wins. The engine exposes the loop as a steppable
//! iterator - one relocation per step - so the caller owns any presentation
//! pacing; [`run_to_completion`] is the unpaced one-shot.

use serde::{Deserialize, Serialize};

use crate::board::{Board, FOUNDATION_PILES};
use crate::cards::Card;
use crate::rules;

/// Where an auto-completion relocation came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AutoSource {
    Tableau(usize),
    Waste,
}

/// One auto-completion relocation: a single card onto a foundation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoMove {
    pub card: Card,
    pub source: AutoSource,
    pub foundation: usize,
}

/// Does any legal move remain on the board?
///
/// Checked in order, returning at the first hit:
/// 1. stock non-empty (a draw is available)
/// 2. waste non-empty (at worst, recycling it is an available move)
/// 3. some column's face-up top placeable on a foundation
/// 4. some legal run placeable atop a different column
#[must_use]
pub fn has_available_move(board: &Board) -> bool {
    if !board.stock().is_empty() {
        return true;
    }
    if !board.waste().is_empty() {
        return true;
    }

    for column in board.columns() {
        if let Some(&top) = column.last() {
            if top.face_up && foundation_for(board, top).is_some() {
                return true;
            }
        }
    }

    for (src, column) in board.columns().iter().enumerate() {
        for start in 0..column.len() {
            if !column[start].face_up || !rules::can_pick_up_run(column, start) {
                continue;
            }
            for (dst, target) in board.columns().iter().enumerate() {
                if dst != src
                    && rules::can_place_on_tableau(column[start], target.last().copied())
                {
                    return true;
                }
            }
        }
    }

    false
}

/// Auto-completion precondition: every tableau card face-up and the stock
/// empty. The waste may still hold cards.
#[must_use]
pub fn can_auto_complete(board: &Board) -> bool {
    board.stock().is_empty()
        && board
            .columns()
            .iter()
            .all(|column| column.iter().all(|c| c.face_up))
}

/// The next relocation the greedy loop would make, without applying it.
///
/// Scan order: tableau columns by index (foundations by index, first match
/// wins), then the waste top. `None` when nothing is placeable.
#[must_use]
pub fn next_auto_move(board: &Board) -> Option<AutoMove> {
    for (i, column) in board.columns().iter().enumerate() {
        if let Some(&top) = column.last() {
            if let Some(foundation) = foundation_for(board, top) {
                return Some(AutoMove {
                    card: top,
                    source: AutoSource::Tableau(i),
                    foundation,
                });
            }
        }
    }

    if let Some(&top) = board.waste().last() {
        if let Some(foundation) = foundation_for(board, top) {
            return Some(AutoMove {
                card: top,
                source: AutoSource::Waste,
                foundation,
            });
        }
    }

    None
}

fn foundation_for(board: &Board, card: Card) -> Option<usize> {
    (0..FOUNDATION_PILES)
        .find(|&f| rules::can_place_on_foundation(card, board.foundation(f).last().copied()))
}

/// Steppable auto-completion driver.
///
/// Each `next()` computes and applies exactly one relocation, so a caller
/// that wants per-move animation pacing steps the iterator on its own clock.
/// The iterator ends when the game is won, the precondition no longer holds,
/// or no card is placeable.
pub struct AutoSolver<'a> {
    board: &'a mut Board,
}

impl<'a> AutoSolver<'a> {
    #[must_use]
    pub fn new(board: &'a mut Board) -> Self {
        Self { board }
    }
}

impl Iterator for AutoSolver<'_> {
    type Item = AutoMove;

    fn next(&mut self) -> Option<AutoMove> {
        if self.board.is_won() || !can_auto_complete(self.board) {
            return None;
        }
        let mv = next_auto_move(self.board)?;
        let applied = self
            .board
            .move_to_foundation(mv.card, mv.foundation)
            .unwrap_or(false);
        applied.then_some(mv)
    }
}

/// Drain the board into the foundations in one go.
///
/// Returns the relocations performed, in order. Win is re-checked after every
/// single relocation (by the board's own commit path), so the loop stops on
/// the winning move.
pub fn run_to_completion(board: &mut Board) -> Vec<AutoMove> {
    let moves: Vec<AutoMove> = AutoSolver::new(board).collect();
    if board.is_won() {
        tracing::info!(relocations = moves.len(), "auto-completion finished the game");
    }
    moves
}
