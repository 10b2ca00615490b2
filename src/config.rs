//! Application configuration constants.
//!
//! Centralizes the tunable values of the review core so they are not
//! scattered through the session and handler code.

use serde::Deserialize;
use std::path::PathBuf;

// ==================== Database Configuration ====================

/// Configuration file structure for config.toml
#[derive(Debug, Deserialize)]
struct AppConfig {
  database: Option<DatabaseConfig>,
}

#[derive(Debug, Deserialize)]
struct DatabaseConfig {
  path: Option<String>,
}

/// Load database path with priority: config.toml > .env > default
pub fn load_database_path() -> PathBuf {
  // Load .env file if present
  let _ = dotenvy::dotenv();

  // Priority 1: config.toml
  if let Ok(contents) = std::fs::read_to_string("config.toml") {
    if let Ok(config) = toml::from_str::<AppConfig>(&contents) {
      if let Some(db) = config.database {
        if let Some(path) = db.path {
          tracing::info!("Using database from config.toml: {}", path);
          return PathBuf::from(path);
        }
      }
    }
  }

  // Priority 2: .env DATABASE_PATH
  if let Ok(path) = std::env::var("DATABASE_PATH") {
    tracing::info!("Using database from DATABASE_PATH env: {}", path);
    return PathBuf::from(path);
  }

  // Default
  let default = PathBuf::from("data/lingodeck.db");
  tracing::info!("Using default database path: {}", default.display());
  default
}

// ==================== Server Configuration ====================

/// Server address to bind to
pub const SERVER_ADDR: &str = "0.0.0.0";

/// Server port
pub const SERVER_PORT: u16 = 3000;

/// Get the full server bind address
pub fn server_bind_addr() -> String {
  format!("{}:{}", SERVER_ADDR, SERVER_PORT)
}

// ==================== Review Configuration ====================

/// Number of cards assembled into one review session
pub const SESSION_SIZE: usize = 10;

/// Number of distractor choices in multiple choice questions
pub const DISTRACTOR_COUNT: usize = 3;

/// Consecutive successful recalls after which a card counts as mastered
pub const MASTERY_REPETITIONS: i64 = 5;

/// Ease factor assigned to a freshly created progress record
pub const INITIAL_EASE_FACTOR: f64 = 2.5;
