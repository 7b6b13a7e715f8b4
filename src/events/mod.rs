//! Engine events and change notifications.
//!
//! The engine holds no framework dependency: it fires plain event values and
//! lets subscribers interpret them. A reactive UI re-renders from the
//! [`ChangeSet`] carried by `Changed`; a stats collaborator listens for the
//! discrete `GameWon` / `GameAbandoned` events.

use serde::{Deserialize, Serialize};

/// Which parts of the board changed in a committed mutation.
///
/// Built with the builder-style methods and merged across the steps of a
/// compound mutation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    pub stock: bool,
    pub waste: bool,
    pub tableau: bool,
    pub foundations: bool,
    pub move_count: bool,
    pub win: bool,
    pub stalemate: bool,
}

impl ChangeSet {
    /// An empty change set.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// A change set covering every field (used after a deal or a load).
    #[must_use]
    pub fn all() -> Self {
        Self {
            stock: true,
            waste: true,
            tableau: true,
            foundations: true,
            move_count: true,
            win: true,
            stalemate: true,
        }
    }

    #[must_use]
    pub fn with_stock(mut self) -> Self {
        self.stock = true;
        self
    }

    #[must_use]
    pub fn with_waste(mut self) -> Self {
        self.waste = true;
        self
    }

    #[must_use]
    pub fn with_tableau(mut self) -> Self {
        self.tableau = true;
        self
    }

    #[must_use]
    pub fn with_foundations(mut self) -> Self {
        self.foundations = true;
        self
    }

    #[must_use]
    pub fn with_move_count(mut self) -> Self {
        self.move_count = true;
        self
    }

    #[must_use]
    pub fn with_win(mut self) -> Self {
        self.win = true;
        self
    }

    #[must_use]
    pub fn with_stalemate(mut self) -> Self {
        self.stalemate = true;
        self
    }

    /// Merge another change set into this one.
    pub fn merge(&mut self, other: ChangeSet) {
        self.stock |= other.stock;
        self.waste |= other.waste;
        self.tableau |= other.tableau;
        self.foundations |= other.foundations;
        self.move_count |= other.move_count;
        self.win |= other.win;
        self.stalemate |= other.stalemate;
    }

    /// True if nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A discrete event fired by the engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A fresh board was dealt (or restored from a save).
    Dealt,

    /// Parts of the board changed; sufficient for a reactive UI to re-render.
    Changed(ChangeSet),

    /// A move was committed (draw, foundation move, or run move).
    MoveApplied { move_count: u32 },

    /// No legal move remains. Edge-triggered: fired exactly once per
    /// transition into stalemate, never while the game is won.
    StalemateReached,

    /// All four foundations are complete.
    GameWon { moves: u32, elapsed_secs: i64 },

    /// The player walked away from an unfinished game.
    GameAbandoned { moves: u32 },
}

/// Subscriber seam for the integration layer.
///
/// The session dispatches every fired event to each subscribed sink, in
/// subscription order.
pub trait EventSink {
    fn on_event(&mut self, event: &GameEvent);
}

/// Shared sinks: lets a caller keep a handle on a sink after subscribing it.
impl<T: EventSink> EventSink for std::rc::Rc<std::cell::RefCell<T>> {
    fn on_event(&mut self, event: &GameEvent) {
        self.borrow_mut().on_event(event);
    }
}

/// An `EventSink` that records everything it sees. Useful in tests and as a
/// simple bridge to channel-based consumers.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<GameEvent>,
}

impl EventSink for RecordingSink {
    fn on_event(&mut self, event: &GameEvent) {
        self.events.push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_set_builder() {
        let changes = ChangeSet::none().with_stock().with_waste();
        assert!(changes.stock);
        assert!(changes.waste);
        assert!(!changes.tableau);
        assert!(!changes.is_empty());
    }

    #[test]
    fn test_change_set_merge() {
        let mut changes = ChangeSet::none().with_tableau();
        changes.merge(ChangeSet::none().with_foundations().with_move_count());

        assert!(changes.tableau);
        assert!(changes.foundations);
        assert!(changes.move_count);
        assert!(!changes.stock);
    }

    #[test]
    fn test_change_set_all_and_empty() {
        assert!(ChangeSet::none().is_empty());
        assert!(!ChangeSet::all().is_empty());
        assert!(ChangeSet::all().win);
    }

    #[test]
    fn test_recording_sink() {
        let mut sink = RecordingSink::default();
        sink.on_event(&GameEvent::Dealt);
        sink.on_event(&GameEvent::StalemateReached);

        assert_eq!(sink.events.len(), 2);
        assert_eq!(sink.events[0], GameEvent::Dealt);
    }
}
