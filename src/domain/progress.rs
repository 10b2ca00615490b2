use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config;

/// Learner's self-rated recall difficulty for one review.
///
/// Each rating maps to an SM-2 quality score; anything below quality 3
/// counts as a lapse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
  VeryHard,
  Hard,
  Medium,
  Easy,
  VeryEasy,
}

impl Rating {
  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "very_hard" => Some(Self::VeryHard),
      "hard" => Some(Self::Hard),
      "medium" => Some(Self::Medium),
      "easy" => Some(Self::Easy),
      "very_easy" => Some(Self::VeryEasy),
      _ => None,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::VeryHard => "very_hard",
      Self::Hard => "hard",
      Self::Medium => "medium",
      Self::Easy => "easy",
      Self::VeryEasy => "very_easy",
    }
  }

  /// Numeric SM-2 quality score (0-5)
  pub fn quality(&self) -> u8 {
    match self {
      Self::VeryHard => 0,
      Self::Hard => 1,
      Self::Medium => 3,
      Self::Easy => 4,
      Self::VeryEasy => 5,
    }
  }

  /// Ratings at or above quality 3 count as a successful recall
  pub fn is_pass(&self) -> bool {
    self.quality() >= 3
  }
}

/// Mutable memory-state record, one per (user, card) pair.
///
/// Created with these defaults the first time a learner is exposed to a
/// card; mutated exclusively by the SRS engine after each rating.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCardProgress {
  pub user_id: i64,
  pub card_id: i64,
  /// Consecutive successful recalls since the last lapse
  pub repetitions: i64,
  /// Interval growth multiplier; never drops below 1.3
  pub ease_factor: f64,
  /// Days until the next review
  pub interval_days: i64,
  pub next_review: DateTime<Utc>,
}

impl UserCardProgress {
  /// Fresh record for a card the learner has not reviewed yet.
  /// This is a documented initialization, not an error fallback.
  pub fn new(user_id: i64, card_id: i64, now: DateTime<Utc>) -> Self {
    Self {
      user_id,
      card_id,
      repetitions: 0,
      ease_factor: config::INITIAL_EASE_FACTOR,
      interval_days: 0,
      next_review: now,
    }
  }

  pub fn is_due(&self, now: DateTime<Utc>) -> bool {
    self.next_review <= now
  }

  pub fn is_mastered(&self) -> bool {
    self.repetitions >= config::MASTERY_REPETITIONS
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_rating_quality_mapping() {
    assert_eq!(Rating::VeryHard.quality(), 0);
    assert_eq!(Rating::Hard.quality(), 1);
    assert_eq!(Rating::Medium.quality(), 3);
    assert_eq!(Rating::Easy.quality(), 4);
    assert_eq!(Rating::VeryEasy.quality(), 5);
  }

  #[test]
  fn test_rating_pass_threshold() {
    assert!(!Rating::VeryHard.is_pass());
    assert!(!Rating::Hard.is_pass());
    assert!(Rating::Medium.is_pass());
    assert!(Rating::Easy.is_pass());
    assert!(Rating::VeryEasy.is_pass());
  }

  #[test]
  fn test_rating_from_str_roundtrip() {
    for rating in [
      Rating::VeryHard,
      Rating::Hard,
      Rating::Medium,
      Rating::Easy,
      Rating::VeryEasy,
    ] {
      assert_eq!(Rating::from_str(rating.as_str()), Some(rating));
    }
  }

  #[test]
  fn test_rating_from_str_invalid() {
    assert_eq!(Rating::from_str("impossible"), None);
    assert_eq!(Rating::from_str(""), None);
    assert_eq!(Rating::from_str("VERY_HARD"), None);
  }

  #[test]
  fn test_rating_serde_wire_names() {
    let r: Rating = serde_json::from_str("\"very_easy\"").unwrap();
    assert_eq!(r, Rating::VeryEasy);
    assert_eq!(serde_json::to_string(&Rating::VeryHard).unwrap(), "\"very_hard\"");
  }

  #[test]
  fn test_fresh_progress_defaults() {
    let now = Utc::now();
    let progress = UserCardProgress::new(1, 42, now);
    assert_eq!(progress.repetitions, 0);
    assert!((progress.ease_factor - 2.5).abs() < f64::EPSILON);
    assert_eq!(progress.interval_days, 0);
    assert_eq!(progress.next_review, now);
    assert!(progress.is_due(now));
    assert!(!progress.is_mastered());
  }

  #[test]
  fn test_mastery_threshold() {
    let now = Utc::now();
    let mut progress = UserCardProgress::new(1, 42, now);
    progress.repetitions = 4;
    assert!(!progress.is_mastered());
    progress.repetitions = 5;
    assert!(progress.is_mastered());
  }
}
