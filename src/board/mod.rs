//! The board aggregate: stock, waste, tableau, foundations.
//!
//! ## Ownership
//!
//! The board exclusively owns all 52 cards across its four pile groups. Every
//! card is in exactly one pile at all times; operations that relocate a card
//! are atomic - the card is never observably in two places.
//!
//! ## Pile orientation
//!
//! Ordered piles keep their top card at the end of the vec: `stock.last()`
//! is the next card drawn, `waste.last()` is the playable waste card,
//! `column.last()` is the bottom-most card of a tableau column as rendered.
//!
//! ## Results
//!
//! Operations return `Ok(true)` when applied, `Ok(false)` when the request is
//! legal to ask but illegal to play (no mutation), and `Err(EngineError)` on
//! caller contract violations (out-of-range indices, source = destination).

use chrono::Utc;
use smallvec::SmallVec;
use tracing::debug;

use crate::cards::{shuffled_deck, Card, Rank};
use crate::core::{EngineError, GameRng};
use crate::events::{ChangeSet, GameEvent};
use crate::rules;
use crate::solver;

/// Number of tableau columns.
pub const TABLEAU_COLUMNS: usize = 7;

/// Number of foundation piles.
pub const FOUNDATION_PILES: usize = 4;

/// Cards moved per draw (draw-three Klondike).
pub const DRAW_COUNT: usize = 3;

/// Cards a complete foundation holds.
pub const FOUNDATION_COMPLETE: usize = 13;

/// Per-game lifecycle.
///
/// `Dealing` exists only while a board is under construction; every board
/// handed to callers is `InProgress` or beyond. `Won` and `Abandoned` are
/// terminal - no further moves are accepted until a new deal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GamePhase {
    Dealing,
    InProgress,
    Won,
    Abandoned,
}

/// A move destination as named by the presentation layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Destination {
    Tableau(usize),
    Foundation(usize),
}

/// What a call to [`Board::draw_from_stock`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawOutcome {
    /// Moved this many cards from stock to waste.
    Drew(usize),
    /// Stock was empty; the waste was recycled back into the stock.
    /// Not counted as a move.
    Recycled(usize),
    /// Stock and waste were both empty (or the game is over). No-op.
    NothingToDraw,
}

/// The Klondike board.
pub struct Board {
    stock: Vec<Card>,
    waste: Vec<Card>,
    tableau: [Vec<Card>; TABLEAU_COLUMNS],
    foundations: [Vec<Card>; FOUNDATION_PILES],
    move_count: u32,
    phase: GamePhase,
    stalled: bool,
    /// Epoch seconds at deal time; `None` for boards restored without one.
    started_at: Option<i64>,
    /// Events fired since the last drain.
    events: Vec<GameEvent>,
}

impl Board {
    /// Deal a fresh game: shuffle a full deck, give column *i* exactly *i+1*
    /// cards with only the last face-up, and put the remainder in the stock.
    #[must_use]
    pub fn deal(rng: &mut GameRng) -> Self {
        let mut deck = shuffled_deck(rng);

        let mut board = Self {
            stock: Vec::new(),
            waste: Vec::new(),
            tableau: Default::default(),
            foundations: Default::default(),
            move_count: 0,
            phase: GamePhase::Dealing,
            stalled: false,
            started_at: Some(Utc::now().timestamp()),
            events: Vec::new(),
        };

        for (i, column) in board.tableau.iter_mut().enumerate() {
            for _ in 0..=i {
                let card = deck.pop().expect("52 cards cover the deal");
                column.push(card);
            }
            if let Some(last) = column.last_mut() {
                last.face_up = true;
            }
        }
        board.stock = deck.into_vec();

        board.phase = GamePhase::InProgress;
        board.events.push(GameEvent::Dealt);
        board.reevaluate(ChangeSet::all());
        debug!(seed = rng.seed(), "dealt new game");
        board
    }

    /// Reconstruct a board from persisted piles. The stalemate flag is always
    /// recomputed; the won flag is honored, and structurally complete
    /// foundations win regardless of it.
    pub(crate) fn restore(
        stock: Vec<Card>,
        waste: Vec<Card>,
        tableau: [Vec<Card>; TABLEAU_COLUMNS],
        foundations: [Vec<Card>; FOUNDATION_PILES],
        move_count: u32,
        won: bool,
        started_at: Option<i64>,
    ) -> Self {
        let mut board = Self {
            stock,
            waste,
            tableau,
            foundations,
            move_count,
            phase: GamePhase::InProgress,
            stalled: false,
            started_at,
            events: Vec::new(),
        };

        if won || board.foundations_complete() {
            board.phase = GamePhase::Won;
        }
        board.events.push(GameEvent::Dealt);
        board.reevaluate(ChangeSet::all());
        board
    }

    // === Accessors ===

    #[must_use]
    pub fn stock(&self) -> &[Card] {
        &self.stock
    }

    #[must_use]
    pub fn waste(&self) -> &[Card] {
        &self.waste
    }

    /// All seven tableau columns.
    #[must_use]
    pub fn columns(&self) -> &[Vec<Card>; TABLEAU_COLUMNS] {
        &self.tableau
    }

    /// A single tableau column. Panics if `index >= 7`.
    #[must_use]
    pub fn column(&self, index: usize) -> &[Card] {
        &self.tableau[index]
    }

    /// All four foundation piles.
    #[must_use]
    pub fn foundations(&self) -> &[Vec<Card>; FOUNDATION_PILES] {
        &self.foundations
    }

    /// A single foundation pile. Panics if `index >= 4`.
    #[must_use]
    pub fn foundation(&self, index: usize) -> &[Card] {
        &self.foundations[index]
    }

    #[must_use]
    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    #[must_use]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    #[must_use]
    pub fn is_won(&self) -> bool {
        self.phase == GamePhase::Won
    }

    /// True when no legal move remains. Recomputed after every committed
    /// mutation; never authoritative from a persisted record.
    #[must_use]
    pub fn is_stalled(&self) -> bool {
        self.stalled
    }

    #[must_use]
    pub fn started_at(&self) -> Option<i64> {
        self.started_at
    }

    /// Whole seconds since the deal. Zero for boards without an anchor.
    #[must_use]
    pub fn elapsed_secs(&self) -> i64 {
        self.started_at
            .map_or(0, |t| (Utc::now().timestamp() - t).max(0))
    }

    /// Every tableau card face-up and the stock empty - the auto-completion
    /// precondition.
    #[must_use]
    pub fn can_auto_complete(&self) -> bool {
        solver::can_auto_complete(self)
    }

    /// Take the events fired since the last drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // === Operations ===

    /// Draw up to three cards from the stock onto the waste, or recycle the
    /// waste back into the stock when the stock is empty.
    ///
    /// Drawn cards become face-up and keep their relative order: the card
    /// nearest the stock top becomes the new waste top. Recycling reverses
    /// the waste, face-down, and is not counted as a move.
    pub fn draw_from_stock(&mut self) -> DrawOutcome {
        if self.phase != GamePhase::InProgress {
            return DrawOutcome::NothingToDraw;
        }

        if !self.stock.is_empty() {
            let n = DRAW_COUNT.min(self.stock.len());
            let mut drawn: SmallVec<[Card; DRAW_COUNT]> = SmallVec::new();
            for _ in 0..n {
                let mut card = self.stock.pop().expect("stock checked non-empty");
                card.face_up = true;
                drawn.push(card);
            }
            // First popped was the stock top; pushing in reverse makes it
            // the waste top.
            self.waste.extend(drawn.into_iter().rev());

            self.move_count += 1;
            debug!(drew = n, stock = self.stock.len(), "draw from stock");
            self.commit(ChangeSet::none().with_stock().with_waste());
            DrawOutcome::Drew(n)
        } else if !self.waste.is_empty() {
            let recycled = self.waste.len();
            self.stock = self
                .waste
                .drain(..)
                .rev()
                .map(|mut card| {
                    card.face_up = false;
                    card
                })
                .collect();

            debug!(recycled, "recycled waste into stock");
            self.reevaluate(ChangeSet::none().with_stock().with_waste());
            DrawOutcome::Recycled(recycled)
        } else {
            DrawOutcome::NothingToDraw
        }
    }

    /// Move `card` onto the named foundation.
    ///
    /// The operation owns removal: it locates the card at a movable position
    /// (waste top or a face-up tableau column top), validates the placement,
    /// and excises+appends atomically. Returns `Ok(false)` when the placement
    /// is illegal or the card is not at a movable position.
    pub fn move_to_foundation(
        &mut self,
        card: Card,
        foundation: usize,
    ) -> Result<bool, EngineError> {
        if foundation >= FOUNDATION_PILES {
            return Err(EngineError::IndexOutOfRange {
                pile: "foundation",
                index: foundation,
            });
        }
        if self.phase != GamePhase::InProgress {
            return Ok(false);
        }
        if !rules::can_place_on_foundation(card, self.foundations[foundation].last().copied()) {
            return Ok(false);
        }

        let mut changes = ChangeSet::none().with_foundations();
        if self.waste.last() == Some(&card) {
            self.waste.pop();
            changes = changes.with_waste();
        } else if let Some(src) = self
            .tableau
            .iter()
            .position(|col| col.last().is_some_and(|top| *top == card && top.face_up))
        {
            self.tableau[src].pop();
            self.flip_exposed(src);
            changes = changes.with_tableau();
        } else {
            return Ok(false);
        }

        let mut placed = card;
        placed.face_up = true;
        self.foundations[foundation].push(placed);
        self.move_count += 1;
        debug!(card = %card, foundation, "moved card to foundation");
        self.commit(changes);
        Ok(true)
    }

    /// Move the contiguous suffix `[start..]` of `src` onto `dst`.
    ///
    /// Flips a newly exposed face-down source top (irreversible). `src == dst`
    /// and out-of-range indices are contract violations.
    pub fn move_run(
        &mut self,
        src: usize,
        start: usize,
        dst: usize,
    ) -> Result<bool, EngineError> {
        if src >= TABLEAU_COLUMNS {
            return Err(EngineError::IndexOutOfRange {
                pile: "tableau",
                index: src,
            });
        }
        if dst >= TABLEAU_COLUMNS {
            return Err(EngineError::IndexOutOfRange {
                pile: "tableau",
                index: dst,
            });
        }
        if src == dst {
            return Err(EngineError::SameColumn(src));
        }
        if start >= self.tableau[src].len() {
            return Err(EngineError::NoCardAt {
                column: src,
                index: start,
            });
        }
        if self.phase != GamePhase::InProgress {
            return Ok(false);
        }

        if !rules::can_pick_up_run(&self.tableau[src], start) {
            return Ok(false);
        }
        let lead = self.tableau[src][start];
        if !rules::can_place_on_tableau(lead, self.tableau[dst].last().copied()) {
            return Ok(false);
        }

        let run = self.tableau[src].split_off(start);
        self.tableau[dst].extend(run);
        self.flip_exposed(src);

        self.move_count += 1;
        debug!(card = %lead, src, dst, "moved run between columns");
        self.commit(ChangeSet::none().with_tableau());
        Ok(true)
    }

    /// Move the waste's top card onto a tableau column.
    ///
    /// Calling with an empty waste is a contract violation.
    pub fn move_waste_to_tableau(&mut self, dst: usize) -> Result<bool, EngineError> {
        if dst >= TABLEAU_COLUMNS {
            return Err(EngineError::IndexOutOfRange {
                pile: "tableau",
                index: dst,
            });
        }
        let Some(&card) = self.waste.last() else {
            return Err(EngineError::EmptyPile("waste"));
        };
        if self.phase != GamePhase::InProgress {
            return Ok(false);
        }
        if !rules::can_place_on_tableau(card, self.tableau[dst].last().copied()) {
            return Ok(false);
        }

        self.waste.pop();
        self.tableau[dst].push(card);
        self.move_count += 1;
        debug!(card = %card, dst, "moved waste card to tableau");
        self.commit(ChangeSet::none().with_waste().with_tableau());
        Ok(true)
    }

    /// For an Ace, the lowest-index empty foundation; `None` otherwise.
    ///
    /// Used to auto-route aces when the UI's preferred foundation is occupied.
    #[must_use]
    pub fn find_available_foundation_for_ace(&self, card: Card) -> Option<usize> {
        if card.rank != Rank::ACE {
            return None;
        }
        self.foundations.iter().position(|pile| pile.is_empty())
    }

    /// Inbound move request from the presentation layer.
    ///
    /// Locates `card` at a movable position, validates via the move rules,
    /// and applies. An Ace aimed at an occupied foundation is rerouted to any
    /// empty one. Requests the board cannot interpret (card not at a movable
    /// position, or a run aimed at its own column) are rejected with
    /// `Ok(false)` - only out-of-range destinations are hard errors.
    pub fn request_move(
        &mut self,
        card: Card,
        destination: Destination,
    ) -> Result<bool, EngineError> {
        match destination {
            Destination::Foundation(f) => {
                if f >= FOUNDATION_PILES {
                    return Err(EngineError::IndexOutOfRange {
                        pile: "foundation",
                        index: f,
                    });
                }
                let mut target = f;
                if !self.foundations[f].is_empty() {
                    if let Some(open) = self.find_available_foundation_for_ace(card) {
                        target = open;
                    }
                }
                self.move_to_foundation(card, target)
            }
            Destination::Tableau(d) => {
                if d >= TABLEAU_COLUMNS {
                    return Err(EngineError::IndexOutOfRange {
                        pile: "tableau",
                        index: d,
                    });
                }
                if self.waste.last() == Some(&card) {
                    return self.move_waste_to_tableau(d);
                }
                let Some((src, start)) = self.locate_in_tableau(card) else {
                    return Ok(false);
                };
                if src == d {
                    return Ok(false);
                }
                self.move_run(src, start, d)
            }
        }
    }

    /// Give up the current game. Terminal, like `Won`.
    pub fn abandon(&mut self) {
        if self.phase != GamePhase::InProgress {
            return;
        }
        self.phase = GamePhase::Abandoned;
        self.events.push(GameEvent::GameAbandoned {
            moves: self.move_count,
        });
    }

    // === Internals ===

    fn locate_in_tableau(&self, card: Card) -> Option<(usize, usize)> {
        self.tableau.iter().enumerate().find_map(|(i, col)| {
            col.iter()
                .position(|c| *c == card && c.face_up)
                .map(|start| (i, start))
        })
    }

    /// Flip a newly exposed face-down column top. Only the last card of a
    /// column ever transitions; earlier cards, once revealed, never re-hide.
    fn flip_exposed(&mut self, column: usize) {
        if let Some(top) = self.tableau[column].last_mut() {
            if !top.face_up {
                top.face_up = true;
            }
        }
    }

    fn foundations_complete(&self) -> bool {
        self.foundations
            .iter()
            .all(|pile| pile.len() == FOUNDATION_COMPLETE)
    }

    /// Commit a counted mutation: re-check win, fire `MoveApplied`, then
    /// re-evaluate stalemate.
    fn commit(&mut self, mut changes: ChangeSet) {
        changes = changes.with_move_count();

        if self.phase == GamePhase::InProgress && self.foundations_complete() {
            self.phase = GamePhase::Won;
            changes = changes.with_win();
        }

        let won_now = changes.win;
        self.reevaluate(changes);
        self.events.push(GameEvent::MoveApplied {
            move_count: self.move_count,
        });
        if won_now {
            tracing::info!(moves = self.move_count, "game won");
            self.events.push(GameEvent::GameWon {
                moves: self.move_count,
                elapsed_secs: self.elapsed_secs(),
            });
        }
    }

    /// Recompute the stalemate flag and fire `Changed`. The stalemate signal
    /// is edge-triggered: raised once on the transition in, never re-raised,
    /// and never raised on a won board.
    fn reevaluate(&mut self, mut changes: ChangeSet) {
        let stalled_now =
            self.phase == GamePhase::InProgress && !solver::has_available_move(self);

        if stalled_now != self.stalled {
            changes = changes.with_stalemate();
        }
        let entered_stalemate = stalled_now && !self.stalled;
        self.stalled = stalled_now;

        if !changes.is_empty() {
            self.events.push(GameEvent::Changed(changes));
        }
        if entered_stalemate {
            tracing::info!(moves = self.move_count, "no legal moves remain");
            self.events.push(GameEvent::StalemateReached);
        }
    }
}

impl PartialEq for Board {
    /// Board equality is positional and includes orientation; the pending
    /// event queue is excluded.
    fn eq(&self, other: &Self) -> bool {
        fn piles_eq(a: &[Card], b: &[Card]) -> bool {
            a.len() == b.len()
                && a.iter()
                    .zip(b.iter())
                    .all(|(x, y)| x.eq_with_orientation(*y))
        }

        piles_eq(&self.stock, &other.stock)
            && piles_eq(&self.waste, &other.waste)
            && self
                .tableau
                .iter()
                .zip(other.tableau.iter())
                .all(|(a, b)| piles_eq(a, b))
            && self
                .foundations
                .iter()
                .zip(other.foundations.iter())
                .all(|(a, b)| piles_eq(a, b))
            && self.move_count == other.move_count
            && self.phase == other.phase
            && self.started_at == other.started_at
    }
}

impl std::fmt::Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Board")
            .field("stock", &self.stock.len())
            .field("waste", &self.waste.len())
            .field(
                "tableau",
                &self.tableau.iter().map(Vec::len).collect::<Vec<_>>(),
            )
            .field(
                "foundations",
                &self.foundations.iter().map(Vec::len).collect::<Vec<_>>(),
            )
            .field("move_count", &self.move_count)
            .field("phase", &self.phase)
            .field("stalled", &self.stalled)
            .finish()
    }
}
