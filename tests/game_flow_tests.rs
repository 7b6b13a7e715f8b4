//! End-to-end game flow tests through the public session API.

use std::cell::RefCell;
use std::rc::Rc;

use klondike_engine::persist::MemoryStore;
use klondike_engine::{
    Card, Destination, DrawOutcome, GameEvent, GamePhase, GameSession, RecordingSink, DECK_SIZE,
};

fn shared_sink() -> Rc<RefCell<RecordingSink>> {
    Rc::new(RefCell::new(RecordingSink::default()))
}

fn all_cards(board: &klondike_engine::Board) -> Vec<Card> {
    let mut all: Vec<Card> = board.stock().to_vec();
    all.extend_from_slice(board.waste());
    for column in board.columns() {
        all.extend_from_slice(column);
    }
    for pile in board.foundations() {
        all.extend_from_slice(pile);
    }
    all
}

#[test]
fn test_deal_shape_through_session() {
    let session = GameSession::with_seed(MemoryStore::new(), 42);
    let board = session.board();

    assert_eq!(board.phase(), GamePhase::InProgress);
    assert_eq!(board.stock().len(), 24);
    for (i, column) in board.columns().iter().enumerate() {
        assert_eq!(column.len(), i + 1);
        assert!(column[..i].iter().all(|c| !c.face_up));
        assert!(column[i].face_up);
    }
}

#[test]
fn test_same_seed_same_deal() {
    let a = GameSession::with_seed(MemoryStore::new(), 7);
    let b = GameSession::with_seed(MemoryStore::new(), 7);

    assert_eq!(a.board().stock(), b.board().stock());
    assert_eq!(a.board().columns(), b.board().columns());
}

#[test]
fn test_full_stock_cycle_preserves_all_cards() {
    let mut session = GameSession::with_seed(MemoryStore::new(), 99);

    // Run the stock down, recycle, and run it down again.
    for _ in 0..8 {
        session.draw_from_stock();
    }
    assert!(matches!(session.draw_from_stock(), DrawOutcome::Recycled(24)));
    for _ in 0..4 {
        assert!(matches!(session.draw_from_stock(), DrawOutcome::Drew(3)));
    }

    let all = all_cards(session.board());
    assert_eq!(all.len(), DECK_SIZE);
    let unique: std::collections::HashSet<Card> = all.into_iter().collect();
    assert_eq!(unique.len(), DECK_SIZE);
}

#[test]
fn test_recycling_is_always_available_while_waste_is_nonempty() {
    let mut session = GameSession::with_seed(MemoryStore::new(), 5);

    // Cycle the whole stock through the waste several times over.
    for _ in 0..3 {
        let mut waste_before_recycle: Vec<Card> = Vec::new();
        while !session.board().stock().is_empty() {
            session.draw_from_stock();
        }
        waste_before_recycle.extend_from_slice(session.board().waste());

        assert_eq!(session.draw_from_stock(), DrawOutcome::Recycled(24));
        // Refilled in reversed order, face-down.
        let reversed: Vec<Card> = waste_before_recycle.into_iter().rev().collect();
        assert_eq!(session.board().stock(), &reversed[..]);
        assert!(session.board().stock().iter().all(|c| !c.face_up));
        assert!(session.board().waste().is_empty());
    }
}

#[test]
fn test_draw_counts_moves_but_recycle_does_not() {
    let mut session = GameSession::with_seed(MemoryStore::new(), 42);

    for _ in 0..8 {
        session.draw_from_stock();
    }
    assert_eq!(session.board().move_count(), 8);

    session.draw_from_stock(); // recycle only
    assert_eq!(session.board().move_count(), 8);

    session.draw_from_stock();
    assert_eq!(session.board().move_count(), 9);
}

#[test]
fn test_event_stream_for_a_draw() {
    let mut session = GameSession::with_seed(MemoryStore::new(), 42);
    let sink = shared_sink();
    session.subscribe(Box::new(Rc::clone(&sink)));

    session.draw_from_stock();

    let events = sink.borrow().events.clone();
    let changed = events
        .iter()
        .find_map(|e| match e {
            GameEvent::Changed(c) => Some(*c),
            _ => None,
        })
        .expect("draw must fire a change notification");
    assert!(changed.stock && changed.waste && changed.move_count);
    assert!(events
        .iter()
        .any(|e| matches!(e, GameEvent::MoveApplied { move_count: 1 })));
}

#[test]
fn test_rejected_request_mutates_nothing() {
    let mut session = GameSession::with_seed(MemoryStore::new(), 42);
    let before = all_cards(session.board());
    let moves_before = session.board().move_count();

    // A buried stock card can never be moved directly.
    let buried = session.board().stock()[0];
    assert_eq!(
        session.request_move(buried, Destination::Tableau(3)),
        Ok(false)
    );

    assert_eq!(all_cards(session.board()), before);
    assert_eq!(session.board().move_count(), moves_before);
}

#[test]
fn test_contract_violation_is_hard_error() {
    let mut session = GameSession::with_seed(MemoryStore::new(), 42);
    let card = session.board().column(0)[0];

    assert!(session.request_move(card, Destination::Tableau(7)).is_err());
    assert!(session
        .request_move(card, Destination::Foundation(4))
        .is_err());
}

#[test]
fn test_opportunistic_play_keeps_invariants() {
    // Play greedily for a while; whatever happens, the board must stay
    // structurally sound.
    let mut session = GameSession::with_seed(MemoryStore::new(), 1234);

    for _ in 0..60 {
        if let Some(&top) = session.board().waste().last() {
            let mut placed = false;
            for f in 0..4 {
                if session
                    .request_move(top, Destination::Foundation(f))
                    .unwrap()
                {
                    placed = true;
                    break;
                }
            }
            if !placed {
                for d in 0..7 {
                    if session.request_move(top, Destination::Tableau(d)).unwrap() {
                        break;
                    }
                }
            }
        }
        session.draw_from_stock();
    }

    let board = session.board();
    let all = all_cards(board);
    assert_eq!(all.len(), DECK_SIZE);
    let unique: std::collections::HashSet<Card> = all.into_iter().collect();
    assert_eq!(unique.len(), DECK_SIZE);

    // Foundations are same-suit ascending runs from the ace.
    for pile in board.foundations() {
        for (i, card) in pile.iter().enumerate() {
            assert_eq!(card.rank.value() as usize, i + 1);
            assert_eq!(card.suit, pile[0].suit);
        }
    }

    // Face-up cards in a column are never followed by face-down ones.
    for column in board.columns() {
        let first_up = column.iter().position(|c| c.face_up).unwrap_or(column.len());
        assert!(column[first_up..].iter().all(|c| c.face_up));
    }
}

#[test]
fn test_abandon_then_new_game() {
    let mut session = GameSession::with_seed(MemoryStore::new(), 42);
    let sink = shared_sink();
    session.subscribe(Box::new(Rc::clone(&sink)));

    session.draw_from_stock();
    session.abandon();
    assert_eq!(session.board().phase(), GamePhase::Abandoned);
    assert!(sink
        .borrow()
        .events
        .iter()
        .any(|e| matches!(e, GameEvent::GameAbandoned { moves: 1 })));

    session.new_game();
    assert_eq!(session.board().phase(), GamePhase::InProgress);
    assert_eq!(session.board().move_count(), 0);
}
