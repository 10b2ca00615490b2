//! Storage collaborator contracts for the review core.
//!
//! The session builder and SRS engine only see these traits; the host
//! application decides what backs them. Both are synchronous: the SQLite
//! implementation runs short queries behind a mutex and is called from
//! async handlers the same way the rest of the service does I/O.

pub mod schema;
pub mod sqlite;

pub use sqlite::SqliteStore;

use chrono::{DateTime, Utc};

use crate::domain::{CardContent, Deck, UserCardProgress};
use crate::errors::Result;

/// Schedule fields written back after the SRS engine runs
#[derive(Debug, Clone, Copy)]
pub struct ScheduleFields {
  pub repetitions: i64,
  pub ease_factor: f64,
  pub interval_days: i64,
  pub next_review: DateTime<Utc>,
}

/// Per-(user, card) memory-state records.
pub trait ProgressStore: Send + Sync {
  fn find_progress(&self, user_id: i64, card_id: i64) -> Result<Option<UserCardProgress>>;

  /// Records due at or before `before`, earliest due time first
  fn find_due_progress(
    &self,
    user_id: i64,
    before: DateTime<Utc>,
    limit: usize,
  ) -> Result<Vec<UserCardProgress>>;

  /// Unmastered records outside `exclude_card_ids`, weakest first
  /// (repetitions ascending, then next review ascending)
  fn find_learning_progress(
    &self,
    user_id: i64,
    exclude_card_ids: &[i64],
    limit: usize,
  ) -> Result<Vec<UserCardProgress>>;

  /// Ids of every card the user has a progress record for. Used to keep
  /// already-reviewed cards out of the new-card pool.
  fn find_reviewed_card_ids(&self, user_id: i64) -> Result<Vec<i64>>;

  /// Atomic create-or-update keyed by (user, card). Implementations must
  /// not decompose this into a read followed by a separate write.
  fn upsert_progress(
    &self,
    user_id: i64,
    card_id: i64,
    fields: &ScheduleFields,
  ) -> Result<UserCardProgress>;
}

/// Read-only card and deck content.
pub trait CardStore: Send + Sync {
  fn get_card(&self, card_id: i64) -> Result<Option<CardContent>>;

  fn get_deck(&self, deck_id: i64) -> Result<Option<Deck>>;

  fn get_deck_cards(&self, deck_id: i64) -> Result<Vec<CardContent>>;

  /// A deck containing the card, if any. Cards can sit in several decks;
  /// the lowest-id one is returned so the choice is deterministic.
  fn find_deck_for_card(&self, card_id: i64) -> Result<Option<Deck>>;

  /// Decks the user has added
  fn get_user_engaged_decks(&self, user_id: i64) -> Result<Vec<Deck>>;

  /// Cards whose id is in `card_ids` but not in `exclude_ids`
  fn find_cards_not_in(
    &self,
    card_ids: &[i64],
    exclude_ids: &[i64],
    limit: usize,
  ) -> Result<Vec<CardContent>>;

  fn list_decks(&self) -> Result<Vec<Deck>>;
}
