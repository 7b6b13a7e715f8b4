//! Engine error type for caller contract violations.
//!
//! Illegal-but-well-formed move requests are not errors: they come back as
//! `Ok(false)` from the board operations, with no state mutation. `EngineError`
//! covers the cases the integration layer must never produce - out-of-range
//! indices, moving a column onto itself, addressing an empty pile. Those are
//! programming errors, not game events.

use thiserror::Error;

/// Hard errors raised on caller contract violations.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A pile index outside the fixed board layout.
    #[error("{pile} index {index} out of range")]
    IndexOutOfRange { pile: &'static str, index: usize },

    /// A run move where source and destination are the same column.
    #[error("cannot move a run from column {0} onto itself")]
    SameColumn(usize),

    /// A card position that does not exist in the named column.
    #[error("column {column} has no card at position {index}")]
    NoCardAt { column: usize, index: usize },

    /// A move sourced from a pile with no cards in it.
    #[error("{0} pile is empty")]
    EmptyPile(&'static str),
}
