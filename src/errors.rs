//! Error kinds surfaced by the review core.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Rating string outside the five-value enumeration; rejected before
  /// any storage access.
  #[error("unknown rating: {0}")]
  InvalidRating(String),

  #[error("card {0} not found")]
  CardNotFound(i64),

  #[error("deck {0} not found")]
  DeckNotFound(i64),

  /// A card with no owning deck cannot produce distractors; this is a
  /// data-integrity fault, not an empty option list.
  #[error("card {0} does not belong to any deck")]
  OrphanCard(i64),

  /// Transient storage failure; the caller may retry. Never reported as
  /// "no cards due".
  #[error("storage unavailable: {0}")]
  Storage(String),
}

impl From<rusqlite::Error> for Error {
  fn from(e: rusqlite::Error) -> Self {
    Error::Storage(e.to_string())
  }
}

pub type Result<T> = std::result::Result<T, Error>;
