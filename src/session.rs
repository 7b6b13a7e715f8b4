//! Game session: the integration facade the presentation layer talks to.
//!
//! A session owns the board, the RNG, a [`SaveStore`], and the subscribed
//! event sinks. Every inbound operation runs to completion - including the
//! board's own win/stalemate re-evaluation - before the next one is accepted;
//! exclusivity falls out of `&mut self`.
//!
//! Persistence is fire-and-forget: after each committed mutation the session
//! snapshots the board into the store, and a failed write is logged without
//! failing the gameplay operation that triggered it. A finished game (won or
//! abandoned) clears the record instead - it is not resumable.

use tracing::warn;

use crate::board::{Board, Destination, DrawOutcome, GamePhase};
use crate::cards::Card;
use crate::core::{EngineError, GameRng};
use crate::events::{EventSink, GameEvent};
use crate::persist::{self, SaveStore};
use crate::solver::{self, AutoMove};

/// A Klondike game session.
pub struct GameSession<S: SaveStore> {
    board: Board,
    rng: GameRng,
    store: S,
    sinks: Vec<Box<dyn EventSink>>,
}

impl<S: SaveStore> GameSession<S> {
    /// Create a session with an entropy-seeded RNG and deal a first game.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self::with_seed(store, GameRng::from_entropy().seed())
    }

    /// Create a session with a fixed seed, for reproducible deals.
    ///
    /// An existing saved record survives construction so the caller can still
    /// offer to resume it; the fresh deal is only persisted when no record
    /// exists.
    #[must_use]
    pub fn with_seed(store: S, seed: u64) -> Self {
        let mut rng = GameRng::new(seed);
        let board = Board::deal(&mut rng);
        let mut session = Self {
            board,
            rng,
            store,
            sinks: Vec::new(),
        };
        session.board.drain_events();
        if session.store.read().is_none() {
            session.persist();
        }
        session
    }

    /// Subscribe an event sink. Sinks see events in subscription order.
    pub fn subscribe(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }

    /// The current board.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The seed of the session RNG.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    // === Inbound operations ===

    /// Replace the board with a fresh deal.
    pub fn new_game(&mut self) {
        self.board = Board::deal(&mut self.rng);
        self.pump();
    }

    /// Draw from the stock (or recycle the waste).
    pub fn draw_from_stock(&mut self) -> DrawOutcome {
        let outcome = self.board.draw_from_stock();
        self.pump();
        outcome
    }

    /// Request a move of `card` to `destination`.
    ///
    /// `Ok(false)` means the move was rejected by the rules with no mutation;
    /// the caller gives feedback however it likes. `Err` is a caller contract
    /// violation.
    pub fn request_move(
        &mut self,
        card: Card,
        destination: Destination,
    ) -> Result<bool, EngineError> {
        let applied = self.board.request_move(card, destination);
        self.pump();
        applied
    }

    /// Drain the end game into the foundations in one go.
    ///
    /// Callers that want per-move pacing use [`step_auto`](Self::step_auto)
    /// instead.
    pub fn auto_complete(&mut self) -> Vec<AutoMove> {
        let moves = solver::run_to_completion(&mut self.board);
        self.pump();
        moves
    }

    /// Apply exactly one auto-completion relocation, if one is available.
    pub fn step_auto(&mut self) -> Option<AutoMove> {
        let mv = solver::AutoSolver::new(&mut self.board).next();
        self.pump();
        mv
    }

    /// Give up the current game.
    pub fn abandon(&mut self) {
        self.board.abandon();
        self.pump();
    }

    // === Persistence ===

    /// Resume the saved game, if one exists.
    ///
    /// Absence of a record is the normal "no saved game" outcome; corrupt
    /// records load as whatever valid state they still contain.
    pub fn load_saved_game(&mut self) -> Option<&Board> {
        let record = self.store.read()?;
        self.board = persist::from_json(&record);
        self.pump();
        Some(&self.board)
    }

    /// Snapshot the current board into the store now.
    pub fn save(&mut self) {
        self.persist();
    }

    /// Remove the saved record.
    pub fn clear_saved(&mut self) {
        self.store.clear();
    }

    // === Internals ===

    /// Dispatch pending board events and snapshot state. Called after every
    /// inbound operation.
    fn pump(&mut self) {
        let events = self.board.drain_events();
        for event in &events {
            for sink in &mut self.sinks {
                sink.on_event(event);
            }
        }

        if events.is_empty() {
            return;
        }
        match self.board.phase() {
            GamePhase::Won | GamePhase::Abandoned => self.store.clear(),
            _ => self.persist(),
        }
    }

    fn persist(&mut self) {
        let record = persist::to_json(&self.board);
        if let Err(err) = self.store.write(&record) {
            // Gameplay must not fail because the snapshot did.
            warn!(%err, "failed to persist saved game");
        }
    }
}
