//! SQLite-backed Progress Store and Card/Deck Store.

use chrono::{DateTime, Utc};
use rusqlite::{params, params_from_iter, Connection, Row};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::config;
use crate::domain::{CardContent, CardKind, Deck, UserCardProgress};
use crate::errors::{Error, Result};
use crate::store::{schema, CardStore, ProgressStore, ScheduleFields};

pub struct SqliteStore {
  conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
  pub fn open(path: &Path) -> Result<Self> {
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).ok();
    }

    // Create backup before migrations if the database exists
    if path.exists() {
      let backup_path = path.with_extension("db.backup");
      if let Err(e) = std::fs::copy(path, &backup_path) {
        tracing::warn!("Could not create database backup: {}", e);
      }
    }

    let conn = Connection::open(path)?;
    schema::run_migrations(&conn)?;
    Ok(Self {
      conn: Arc::new(Mutex::new(conn)),
    })
  }

  /// Fresh in-memory database, mainly for tests
  pub fn open_in_memory() -> Result<Self> {
    let conn = Connection::open_in_memory()?;
    schema::run_migrations(&conn)?;
    Ok(Self {
      conn: Arc::new(Mutex::new(conn)),
    })
  }

  fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
    self.conn.lock().map_err(|_: PoisonError<_>| {
      tracing::error!("database mutex poisoned - a thread panicked while holding the lock");
      Error::Storage("database lock poisoned".to_string())
    })
  }

  // ==================== Content management ====================
  // Deck/card CRUD belongs to the content side; the review core only
  // consumes it through the CardStore trait.

  pub fn create_deck(&self, name: &str, description: Option<&str>) -> Result<Deck> {
    let conn = self.lock()?;
    conn.execute(
      "INSERT INTO decks (name, description) VALUES (?1, ?2)",
      params![name, description],
    )?;
    Ok(Deck {
      id: conn.last_insert_rowid(),
      name: name.to_string(),
      description: description.map(|s| s.to_string()),
    })
  }

  pub fn insert_card(&self, card: &CardContent) -> Result<i64> {
    let conn = self.lock()?;
    conn.execute(
      r#"
      INSERT INTO cards (kind, level, prompt, answer, image_url, lang)
      VALUES (?1, ?2, ?3, ?4, ?5, ?6)
      "#,
      params![
        card.kind.as_str(),
        card.level,
        card.prompt,
        card.answer,
        card.image_url,
        card.lang,
      ],
    )?;
    Ok(conn.last_insert_rowid())
  }

  pub fn add_card_to_deck(&self, deck_id: i64, card_id: i64) -> Result<()> {
    let conn = self.lock()?;
    conn.execute(
      "INSERT OR IGNORE INTO deck_cards (deck_id, card_id) VALUES (?1, ?2)",
      params![deck_id, card_id],
    )?;
    Ok(())
  }

  pub fn enroll_user(&self, user_id: i64, deck_id: i64) -> Result<()> {
    let conn = self.lock()?;
    let deck_exists: bool = conn
      .query_row("SELECT 1 FROM decks WHERE id = ?1", params![deck_id], |_| Ok(true))
      .unwrap_or(false);
    if !deck_exists {
      return Err(Error::DeckNotFound(deck_id));
    }
    conn.execute(
      "INSERT OR IGNORE INTO user_decks (user_id, deck_id) VALUES (?1, ?2)",
      params![user_id, deck_id],
    )?;
    Ok(())
  }

  pub fn card_count(&self) -> Result<i64> {
    let conn = self.lock()?;
    let count = conn.query_row("SELECT COUNT(*) FROM cards", [], |row| row.get(0))?;
    Ok(count)
  }
}

impl ProgressStore for SqliteStore {
  fn find_progress(&self, user_id: i64, card_id: i64) -> Result<Option<UserCardProgress>> {
    let conn = self.lock()?;
    let mut stmt = conn.prepare(
      r#"
      SELECT user_id, card_id, repetitions, ease_factor, interval_days, next_review
      FROM user_card_progress
      WHERE user_id = ?1 AND card_id = ?2
      "#,
    )?;

    let mut rows = stmt.query(params![user_id, card_id])?;
    if let Some(row) = rows.next()? {
      Ok(Some(row_to_progress(row)?))
    } else {
      Ok(None)
    }
  }

  fn find_due_progress(
    &self,
    user_id: i64,
    before: DateTime<Utc>,
    limit: usize,
  ) -> Result<Vec<UserCardProgress>> {
    let conn = self.lock()?;
    let mut stmt = conn.prepare(
      r#"
      SELECT user_id, card_id, repetitions, ease_factor, interval_days, next_review
      FROM user_card_progress
      WHERE user_id = ?1 AND next_review <= ?2
      ORDER BY next_review ASC
      LIMIT ?3
      "#,
    )?;

    let records = stmt
      .query_map(
        params![user_id, before.to_rfc3339(), limit as i64],
        row_to_progress,
      )?
      .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(records)
  }

  fn find_learning_progress(
    &self,
    user_id: i64,
    exclude_card_ids: &[i64],
    limit: usize,
  ) -> Result<Vec<UserCardProgress>> {
    let conn = self.lock()?;

    let exclude_clause = if exclude_card_ids.is_empty() {
      String::new()
    } else {
      format!("AND card_id NOT IN ({})", placeholders(exclude_card_ids.len()))
    };
    let sql = format!(
      r#"
      SELECT user_id, card_id, repetitions, ease_factor, interval_days, next_review
      FROM user_card_progress
      WHERE user_id = ? AND repetitions < ? {}
      ORDER BY repetitions ASC, next_review ASC
      LIMIT ?
      "#,
      exclude_clause,
    );

    let mut values: Vec<i64> = vec![user_id, config::MASTERY_REPETITIONS];
    values.extend_from_slice(exclude_card_ids);
    values.push(limit as i64);

    let mut stmt = conn.prepare(&sql)?;
    let records = stmt
      .query_map(params_from_iter(values), row_to_progress)?
      .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(records)
  }

  fn find_reviewed_card_ids(&self, user_id: i64) -> Result<Vec<i64>> {
    let conn = self.lock()?;
    let mut stmt =
      conn.prepare("SELECT card_id FROM user_card_progress WHERE user_id = ?1")?;
    let ids = stmt
      .query_map(params![user_id], |row| row.get(0))?
      .collect::<rusqlite::Result<Vec<i64>>>()?;
    Ok(ids)
  }

  fn upsert_progress(
    &self,
    user_id: i64,
    card_id: i64,
    fields: &ScheduleFields,
  ) -> Result<UserCardProgress> {
    let conn = self.lock()?;
    // Single conflict-resolving write keyed by (user_id, card_id);
    // concurrent submissions for the same pair serialize here instead
    // of racing a read against a separate write.
    conn.execute(
      r#"
      INSERT INTO user_card_progress (user_id, card_id, repetitions, ease_factor, interval_days, next_review)
      VALUES (?1, ?2, ?3, ?4, ?5, ?6)
      ON CONFLICT(user_id, card_id) DO UPDATE SET
        repetitions = excluded.repetitions,
        ease_factor = excluded.ease_factor,
        interval_days = excluded.interval_days,
        next_review = excluded.next_review
      "#,
      params![
        user_id,
        card_id,
        fields.repetitions,
        fields.ease_factor,
        fields.interval_days,
        fields.next_review.to_rfc3339(),
      ],
    )?;

    Ok(UserCardProgress {
      user_id,
      card_id,
      repetitions: fields.repetitions,
      ease_factor: fields.ease_factor,
      interval_days: fields.interval_days,
      next_review: fields.next_review,
    })
  }
}

impl CardStore for SqliteStore {
  fn get_card(&self, card_id: i64) -> Result<Option<CardContent>> {
    let conn = self.lock()?;
    let mut stmt = conn.prepare(
      "SELECT id, kind, level, prompt, answer, image_url, lang FROM cards WHERE id = ?1",
    )?;

    let mut rows = stmt.query(params![card_id])?;
    if let Some(row) = rows.next()? {
      Ok(Some(row_to_card(row)?))
    } else {
      Ok(None)
    }
  }

  fn get_deck(&self, deck_id: i64) -> Result<Option<Deck>> {
    let conn = self.lock()?;
    let mut stmt = conn.prepare("SELECT id, name, description FROM decks WHERE id = ?1")?;

    let mut rows = stmt.query(params![deck_id])?;
    if let Some(row) = rows.next()? {
      Ok(Some(row_to_deck(row)?))
    } else {
      Ok(None)
    }
  }

  fn get_deck_cards(&self, deck_id: i64) -> Result<Vec<CardContent>> {
    let conn = self.lock()?;
    let mut stmt = conn.prepare(
      r#"
      SELECT c.id, c.kind, c.level, c.prompt, c.answer, c.image_url, c.lang
      FROM cards c
      JOIN deck_cards dc ON dc.card_id = c.id
      WHERE dc.deck_id = ?1
      ORDER BY c.id ASC
      "#,
    )?;

    let cards = stmt
      .query_map(params![deck_id], row_to_card)?
      .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(cards)
  }

  fn find_deck_for_card(&self, card_id: i64) -> Result<Option<Deck>> {
    let conn = self.lock()?;
    let mut stmt = conn.prepare(
      r#"
      SELECT d.id, d.name, d.description
      FROM decks d
      JOIN deck_cards dc ON dc.deck_id = d.id
      WHERE dc.card_id = ?1
      ORDER BY d.id ASC
      LIMIT 1
      "#,
    )?;

    let mut rows = stmt.query(params![card_id])?;
    if let Some(row) = rows.next()? {
      Ok(Some(row_to_deck(row)?))
    } else {
      Ok(None)
    }
  }

  fn get_user_engaged_decks(&self, user_id: i64) -> Result<Vec<Deck>> {
    let conn = self.lock()?;
    let mut stmt = conn.prepare(
      r#"
      SELECT d.id, d.name, d.description
      FROM decks d
      JOIN user_decks ud ON ud.deck_id = d.id
      WHERE ud.user_id = ?1
      ORDER BY d.id ASC
      "#,
    )?;

    let decks = stmt
      .query_map(params![user_id], row_to_deck)?
      .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(decks)
  }

  fn find_cards_not_in(
    &self,
    card_ids: &[i64],
    exclude_ids: &[i64],
    limit: usize,
  ) -> Result<Vec<CardContent>> {
    if card_ids.is_empty() {
      return Ok(Vec::new());
    }
    let conn = self.lock()?;

    let exclude_clause = if exclude_ids.is_empty() {
      String::new()
    } else {
      format!("AND id NOT IN ({})", placeholders(exclude_ids.len()))
    };
    let sql = format!(
      r#"
      SELECT id, kind, level, prompt, answer, image_url, lang
      FROM cards
      WHERE id IN ({}) {}
      ORDER BY id ASC
      LIMIT ?
      "#,
      placeholders(card_ids.len()),
      exclude_clause,
    );

    let mut values: Vec<i64> = card_ids.to_vec();
    values.extend_from_slice(exclude_ids);
    values.push(limit as i64);

    let mut stmt = conn.prepare(&sql)?;
    let cards = stmt
      .query_map(params_from_iter(values), row_to_card)?
      .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(cards)
  }

  fn list_decks(&self) -> Result<Vec<Deck>> {
    let conn = self.lock()?;
    let mut stmt = conn.prepare("SELECT id, name, description FROM decks ORDER BY id ASC")?;

    let decks = stmt
      .query_map([], row_to_deck)?
      .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(decks)
  }
}

/// "?, ?, ?" list for dynamic IN clauses
fn placeholders(count: usize) -> String {
  let mut s = "?,".repeat(count);
  s.pop();
  s
}

fn parse_timestamp(s: &str) -> rusqlite::Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| {
      rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn row_to_progress(row: &Row) -> rusqlite::Result<UserCardProgress> {
  let next_review_str: String = row.get(5)?;
  Ok(UserCardProgress {
    user_id: row.get(0)?,
    card_id: row.get(1)?,
    repetitions: row.get(2)?,
    ease_factor: row.get(3)?,
    interval_days: row.get(4)?,
    next_review: parse_timestamp(&next_review_str)?,
  })
}

fn row_to_card(row: &Row) -> rusqlite::Result<CardContent> {
  let kind_str: String = row.get(1)?;
  Ok(CardContent {
    id: row.get(0)?,
    kind: CardKind::from_str(&kind_str).unwrap_or(CardKind::Basic),
    level: row.get(2)?,
    prompt: row.get(3)?,
    answer: row.get(4)?,
    image_url: row.get(5)?,
    lang: row.get(6)?,
  })
}

fn row_to_deck(row: &Row) -> rusqlite::Result<Deck> {
  Ok(Deck {
    id: row.get(0)?,
    name: row.get(1)?,
    description: row.get(2)?,
  })
}
