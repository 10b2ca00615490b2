//! SQLite store behavior: file lifecycle, migrations, upsert semantics,
//! and the dynamic-query paths.

use chrono::{Duration, Utc};
use tempfile::TempDir;

use lingodeck::domain::{CardContent, CardKind};
use lingodeck::errors::Error;
use lingodeck::store::{CardStore, ProgressStore, ScheduleFields, SqliteStore};

fn card(prompt: &str, answer: &str) -> CardContent {
  CardContent::new(CardKind::Basic, prompt, answer)
}

#[test]
fn test_open_creates_database_file() {
  let temp = TempDir::new().unwrap();
  let db_path = temp.path().join("data").join("review.db");

  let store = SqliteStore::open(&db_path).unwrap();
  assert!(db_path.exists());
  assert_eq!(store.card_count().unwrap(), 0);
}

#[test]
fn test_reopen_is_idempotent_and_backs_up() {
  let temp = TempDir::new().unwrap();
  let db_path = temp.path().join("review.db");

  {
    let store = SqliteStore::open(&db_path).unwrap();
    store.insert_card(&card("Dog", "Cachorro")).unwrap();
  }

  // Second open reruns migrations and snapshots the existing file first
  let store = SqliteStore::open(&db_path).unwrap();
  assert_eq!(store.card_count().unwrap(), 1);
  assert!(db_path.with_extension("db.backup").exists());
}

#[test]
fn test_upsert_progress_inserts_then_merges() {
  let store = SqliteStore::open_in_memory().unwrap();
  let card_id = store.insert_card(&card("Dog", "Cachorro")).unwrap();
  let now = Utc::now();

  store
    .upsert_progress(
      1,
      card_id,
      &ScheduleFields {
        repetitions: 1,
        ease_factor: 2.5,
        interval_days: 1,
        next_review: now + Duration::days(1),
      },
    )
    .unwrap();

  let updated = store
    .upsert_progress(
      1,
      card_id,
      &ScheduleFields {
        repetitions: 2,
        ease_factor: 2.6,
        interval_days: 6,
        next_review: now + Duration::days(6),
      },
    )
    .unwrap();

  assert_eq!(updated.repetitions, 2);

  // Still a single row for the pair
  let stored = store.find_progress(1, card_id).unwrap().unwrap();
  assert_eq!(stored.repetitions, 2);
  assert_eq!(stored.interval_days, 6);
  assert!((stored.ease_factor - 2.6).abs() < 1e-9);
  assert_eq!(stored.next_review, now + Duration::days(6));
}

#[test]
fn test_progress_is_per_user() {
  let store = SqliteStore::open_in_memory().unwrap();
  let card_id = store.insert_card(&card("Dog", "Cachorro")).unwrap();
  let now = Utc::now();

  store
    .upsert_progress(
      1,
      card_id,
      &ScheduleFields {
        repetitions: 3,
        ease_factor: 2.5,
        interval_days: 15,
        next_review: now,
      },
    )
    .unwrap();

  assert!(store.find_progress(2, card_id).unwrap().is_none());
}

#[test]
fn test_find_due_progress_orders_and_limits() {
  let store = SqliteStore::open_in_memory().unwrap();
  let now = Utc::now();
  let mut ids = Vec::new();
  for i in 0..5 {
    let id = store
      .insert_card(&card(&format!("W{}", i), &format!("P{}", i)))
      .unwrap();
    ids.push(id);
  }

  // ids[0] and ids[4] not yet due
  let offsets = [2, -3, -1, -2, 1];
  for (i, &id) in ids.iter().enumerate() {
    store
      .upsert_progress(
        1,
        id,
        &ScheduleFields {
          repetitions: 1,
          ease_factor: 2.5,
          interval_days: 1,
          next_review: now + Duration::days(offsets[i]),
        },
      )
      .unwrap();
  }

  let due = store.find_due_progress(1, now, 10).unwrap();
  let due_ids: Vec<i64> = due.iter().map(|p| p.card_id).collect();
  assert_eq!(due_ids, vec![ids[1], ids[3], ids[2]]);

  let limited = store.find_due_progress(1, now, 2).unwrap();
  assert_eq!(limited.len(), 2);
}

#[test]
fn test_find_learning_progress_excludes_mastered_and_listed() {
  let store = SqliteStore::open_in_memory().unwrap();
  let now = Utc::now();
  let mut ids = Vec::new();
  for i in 0..4 {
    let id = store
      .insert_card(&card(&format!("W{}", i), &format!("P{}", i)))
      .unwrap();
    ids.push(id);
  }

  let reps = [4, 1, 5, 2];
  for (i, &id) in ids.iter().enumerate() {
    store
      .upsert_progress(
        1,
        id,
        &ScheduleFields {
          repetitions: reps[i],
          ease_factor: 2.5,
          interval_days: 1,
          next_review: now + Duration::days(1),
        },
      )
      .unwrap();
  }

  let learning = store.find_learning_progress(1, &[ids[3]], 10).unwrap();
  let learning_ids: Vec<i64> = learning.iter().map(|p| p.card_id).collect();
  // Weakest first; mastered ids[2] and excluded ids[3] are gone
  assert_eq!(learning_ids, vec![ids[1], ids[0]]);
}

#[test]
fn test_find_reviewed_card_ids() {
  let store = SqliteStore::open_in_memory().unwrap();
  let now = Utc::now();
  let a = store.insert_card(&card("Dog", "Cachorro")).unwrap();
  let b = store.insert_card(&card("Cat", "Gato")).unwrap();

  store
    .upsert_progress(
      1,
      a,
      &ScheduleFields {
        repetitions: 1,
        ease_factor: 2.5,
        interval_days: 1,
        next_review: now,
      },
    )
    .unwrap();

  let reviewed = store.find_reviewed_card_ids(1).unwrap();
  assert_eq!(reviewed, vec![a]);
  assert!(!reviewed.contains(&b));
}

#[test]
fn test_find_cards_not_in() {
  let store = SqliteStore::open_in_memory().unwrap();
  let mut ids = Vec::new();
  for i in 0..4 {
    let id = store
      .insert_card(&card(&format!("W{}", i), &format!("P{}", i)))
      .unwrap();
    ids.push(id);
  }

  let found = store.find_cards_not_in(&ids, &[ids[0], ids[2]], 10).unwrap();
  let found_ids: Vec<i64> = found.iter().map(|c| c.id).collect();
  assert_eq!(found_ids, vec![ids[1], ids[3]]);

  let empty = store.find_cards_not_in(&[], &[], 10).unwrap();
  assert!(empty.is_empty());
}

#[test]
fn test_find_deck_for_card_prefers_lowest_deck_id() {
  let store = SqliteStore::open_in_memory().unwrap();
  let first = store.create_deck("First", None).unwrap();
  let second = store.create_deck("Second", None).unwrap();
  let card_id = store.insert_card(&card("Dog", "Cachorro")).unwrap();
  store.add_card_to_deck(second.id, card_id).unwrap();
  store.add_card_to_deck(first.id, card_id).unwrap();

  let deck = store.find_deck_for_card(card_id).unwrap().unwrap();
  assert_eq!(deck.id, first.id);

  assert!(store.find_deck_for_card(999).unwrap().is_none());
}

#[test]
fn test_enroll_requires_existing_deck() {
  let store = SqliteStore::open_in_memory().unwrap();
  let err = store.enroll_user(1, 999).unwrap_err();
  assert!(matches!(err, Error::DeckNotFound(999)));

  let deck = store.create_deck("Animals", None).unwrap();
  store.enroll_user(1, deck.id).unwrap();
  // Enrolling twice is a no-op, not an error
  store.enroll_user(1, deck.id).unwrap();

  let decks = store.get_user_engaged_decks(1).unwrap();
  assert_eq!(decks.len(), 1);
}
