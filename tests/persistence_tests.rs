//! Save/load round-trip coverage, including property tests over random play.

use proptest::prelude::*;

use klondike_engine::persist::{from_json, to_json, FileStore, MemoryStore, SaveStore, SAVE_KEY};
use klondike_engine::{Card, Destination, GameSession, DECK_SIZE};

fn card_count(board: &klondike_engine::Board) -> usize {
    board.stock().len()
        + board.waste().len()
        + board.columns().iter().map(Vec::len).sum::<usize>()
        + board.foundations().iter().map(Vec::len).sum::<usize>()
}

/// Drive a session through a pseudo-random but legal sequence of operations.
fn churn(session: &mut GameSession<MemoryStore>, script: &[u8]) {
    for &op in script {
        match op % 3 {
            0 => {
                session.draw_from_stock();
            }
            1 => {
                if let Some(&top) = session.board().waste().last() {
                    let _ = session.request_move(top, Destination::Foundation(usize::from(op) % 4));
                    let _ = session.request_move(top, Destination::Tableau(usize::from(op) % 7));
                }
            }
            _ => {
                let col = usize::from(op) % 7;
                if let Some(&t) = session.board().column(col).last() {
                    if t.face_up {
                        let _ = session.request_move(t, Destination::Foundation(0));
                        let _ = session.request_move(t, Destination::Tableau((col + 1) % 7));
                    }
                }
            }
        }
    }
}

proptest! {
    #[test]
    fn prop_deal_distributes_52_unique_cards(seed in any::<u64>()) {
        let session = GameSession::with_seed(MemoryStore::new(), seed);
        let board = session.board();

        prop_assert_eq!(card_count(board), DECK_SIZE);
        let mut all: Vec<Card> = board.stock().to_vec();
        for column in board.columns() {
            all.extend_from_slice(column);
        }
        let unique: std::collections::HashSet<Card> = all.into_iter().collect();
        prop_assert_eq!(unique.len(), DECK_SIZE);

        for (i, column) in board.columns().iter().enumerate() {
            prop_assert_eq!(column.len(), i + 1);
        }
    }

    #[test]
    fn prop_round_trip_reproduces_reachable_states(
        seed in any::<u64>(),
        script in proptest::collection::vec(any::<u8>(), 0..80),
    ) {
        let mut session = GameSession::with_seed(MemoryStore::new(), seed);
        churn(&mut session, &script);

        let restored = from_json(&to_json(session.board()));
        prop_assert_eq!(&restored, session.board());
        prop_assert_eq!(card_count(&restored), DECK_SIZE);
    }
}

#[test]
fn test_file_store_end_to_end() {
    let dir = tempfile::tempdir().unwrap();

    {
        let mut session = GameSession::with_seed(FileStore::new(dir.path()), 42);
        session.draw_from_stock();
        session.draw_from_stock();
    }
    assert!(dir.path().join(SAVE_KEY).exists());

    let mut session = GameSession::with_seed(FileStore::new(dir.path()), 9);
    let board = session.load_saved_game().expect("record exists");
    assert_eq!(board.move_count(), 2);
    assert_eq!(board.waste().len(), 6);
}

#[test]
fn test_corrupt_record_still_loads() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileStore::new(dir.path());
    store
        .write(r#"{"waste":[{"suit":"fish","rank":99},{"suit":"hearts","rank":3,"face_up":true}],"move_count":2}"#)
        .unwrap();

    let mut session = GameSession::with_seed(store, 1);
    let board = session.load_saved_game().expect("record exists");
    assert_eq!(board.waste().len(), 1, "only the valid card survives");
    assert_eq!(board.move_count(), 2);
}

#[test]
fn test_clear_saved_removes_resumability() {
    let mut session = GameSession::with_seed(MemoryStore::new(), 42);
    session.draw_from_stock();

    session.clear_saved();
    assert!(session.load_saved_game().is_none());
}

#[test]
fn test_won_game_is_not_resumable() {
    use klondike_engine::persist::{SavedCard, SavedGame};
    use klondike_engine::Suit;

    // Save a one-move-from-won record, load it, finish, and check the store.
    let mut foundations: Vec<Vec<SavedCard>> = Suit::ALL
        .iter()
        .map(|&suit| {
            (1..=13)
                .map(|r| SavedCard {
                    suit: Some(suit.tag().to_string()),
                    rank: Some(r),
                    face_up: true,
                })
                .collect()
        })
        .collect();
    let king = foundations[0].pop().unwrap();
    let record = SavedGame {
        tableau: vec![vec![king]],
        foundations,
        move_count: 51,
        ..Default::default()
    };

    let mut store = MemoryStore::new();
    store.write(&serde_json::to_string(&record).unwrap()).unwrap();
    let mut session = GameSession::with_seed(store, 1);
    session.load_saved_game().unwrap();

    assert!(session.board().can_auto_complete());
    let moves = session.auto_complete();
    assert_eq!(moves.len(), 1);
    assert!(session.board().is_won());
    assert!(session.load_saved_game().is_none(), "won game clears the record");
}
