//! # klondike-engine
//!
//! A single-player Klondike (draw-three) solitaire rule engine. The engine
//! owns the board state, enforces legal-move semantics, detects win and
//! stalemate conditions, drives the automatic end-game solver, and
//! serializes/restores a game in progress. Rendering, gestures, haptics, and
//! lifetime statistics are external collaborators: the engine only reports
//! discrete events they consume.
//!
//! ## Design Principles
//!
//! 1. **One definition of legality**: the board and the solver both consult
//!    the pure predicates in `rules`.
//!
//! 2. **Results over exceptions**: a rule-illegal request is `Ok(false)` with
//!    no mutation; only caller contract violations are hard errors.
//!
//! 3. **No framework in the core**: change notification is a plain event
//!    queue plus an `EventSink` observer seam; persistence is a narrow
//!    read/write/clear trait any durable medium satisfies.
//!
//! ## Modules
//!
//! - `cards`: suit/rank/card value types, deck construction
//! - `core`: deterministic RNG, engine errors
//! - `rules`: pure placement predicates and run extraction
//! - `board`: the board aggregate and its operations
//! - `solver`: stalemate detection and greedy auto-completion
//! - `events`: change notifications and discrete game events
//! - `persist`: flat save record codec and the storage seam
//! - `session`: the integration facade tying it all together
//!
//! ## Quick Start
//!
//! ```
//! use klondike_engine::persist::MemoryStore;
//! use klondike_engine::GameSession;
//!
//! let mut session = GameSession::with_seed(MemoryStore::new(), 42);
//! session.draw_from_stock();
//! assert_eq!(session.board().waste().len(), 3);
//! ```

pub mod board;
pub mod cards;
pub mod core;
pub mod events;
pub mod persist;
pub mod rules;
pub mod session;
pub mod solver;

// Re-export commonly used types
pub use crate::board::{
    Board, Destination, DrawOutcome, GamePhase, DRAW_COUNT, FOUNDATION_COMPLETE,
    FOUNDATION_PILES, TABLEAU_COLUMNS,
};
pub use crate::cards::{Card, Color, Rank, Suit, DECK_SIZE};
pub use crate::core::{EngineError, GameRng};
pub use crate::events::{ChangeSet, EventSink, GameEvent, RecordingSink};
pub use crate::persist::{FileStore, MemoryStore, SaveStore, SavedCard, SavedGame, SAVE_KEY};
pub use crate::session::GameSession;
pub use crate::solver::{AutoMove, AutoSolver, AutoSource};
