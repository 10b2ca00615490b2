use rusqlite::{Connection, Result};

pub fn run_migrations(conn: &Connection) -> Result<()> {
  // Create tables with COMPLETE schema for new databases
  // Migrations below handle upgrades for existing databases
  conn.execute_batch(
    r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS cards (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      kind TEXT NOT NULL,
      level INTEGER NOT NULL DEFAULT 1,
      prompt TEXT NOT NULL,
      answer TEXT NOT NULL,
      image_url TEXT,
      lang TEXT
    );

    CREATE TABLE IF NOT EXISTS decks (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      name TEXT NOT NULL,
      description TEXT
    );

    CREATE TABLE IF NOT EXISTS deck_cards (
      deck_id INTEGER NOT NULL,
      card_id INTEGER NOT NULL,
      PRIMARY KEY (deck_id, card_id),
      FOREIGN KEY (deck_id) REFERENCES decks(id),
      FOREIGN KEY (card_id) REFERENCES cards(id)
    );

    CREATE TABLE IF NOT EXISTS user_decks (
      user_id INTEGER NOT NULL,
      deck_id INTEGER NOT NULL,
      PRIMARY KEY (user_id, deck_id),
      FOREIGN KEY (deck_id) REFERENCES decks(id)
    );

    -- One memory-state row per (user, card); the primary key carries
    -- the uniqueness invariant and backs the conflict-target of the
    -- progress upsert.
    CREATE TABLE IF NOT EXISTS user_card_progress (
      user_id INTEGER NOT NULL,
      card_id INTEGER NOT NULL,
      repetitions INTEGER NOT NULL DEFAULT 0,
      ease_factor REAL NOT NULL DEFAULT 2.5,
      interval_days INTEGER NOT NULL DEFAULT 0,
      next_review TEXT NOT NULL,
      PRIMARY KEY (user_id, card_id),
      FOREIGN KEY (card_id) REFERENCES cards(id)
    );

    -- Indexes
    CREATE INDEX IF NOT EXISTS idx_progress_user_due ON user_card_progress(user_id, next_review);
    CREATE INDEX IF NOT EXISTS idx_progress_user_reps ON user_card_progress(user_id, repetitions);
    CREATE INDEX IF NOT EXISTS idx_deck_cards_card ON deck_cards(card_id);
    "#,
  )?;

  // ============================================================
  // MIGRATIONS FOR EXISTING DATABASES
  // These are no-ops for new databases (columns already exist)
  // ============================================================

  // Migration: cards gained a source-language tag after launch
  add_column_if_missing(conn, "cards", "lang", "TEXT")?;

  Ok(())
}

/// Check if a column exists in a table
fn column_exists(conn: &Connection, table: &str, column: &str) -> bool {
  conn
    .prepare(&format!("SELECT {} FROM {} LIMIT 1", column, table))
    .is_ok()
}

/// Add a column if it doesn't already exist
fn add_column_if_missing(conn: &Connection, table: &str, column: &str, column_def: &str) -> Result<()> {
  if !column_exists(conn, table, column) {
    conn.execute(
      &format!("ALTER TABLE {} ADD COLUMN {} {}", table, column, column_def),
      [],
    )?;
  }
  Ok(())
}
