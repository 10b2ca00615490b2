use chrono::{DateTime, Duration, Utc};

use crate::domain::Rating;

const MIN_EASE_FACTOR: f64 = 1.3;

/// New schedule for a card after one rating
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Schedule {
  pub repetitions: i64,
  pub ease_factor: f64,
  pub interval_days: i64,
  pub next_review: DateTime<Utc>,
}

/// SM-2 update for a single card.
///
/// Lapses (quality < 3) reset repetitions and schedule a one-day retry
/// without touching the ease factor. Successful recalls grow the ease
/// factor by `0.1 - (5 - q) * (0.08 + (5 - q) * 0.02)`, floored at 1.3,
/// and the interval follows the 1 / 6 / ceil(interval * EF) ladder.
///
/// Pure arithmetic; `now` is passed in so callers and tests control the
/// clock.
pub fn update_schedule(
  rating: Rating,
  ease_factor: f64,
  interval_days: i64,
  repetitions: i64,
  now: DateTime<Utc>,
) -> Schedule {
  let (new_repetitions, new_ease_factor, new_interval) = if !rating.is_pass() {
    // Lapse: reset the streak, retry tomorrow
    (0, ease_factor, 1)
  } else {
    let q = rating.quality() as f64;
    let ease_delta = 0.1 - (5.0 - q) * (0.08 + (5.0 - q) * 0.02);
    let ef = (ease_factor + ease_delta).max(MIN_EASE_FACTOR);

    let reps = repetitions + 1;
    let interval = match reps {
      1 => 1,
      2 => 6,
      _ => ((interval_days as f64) * ef).ceil() as i64,
    };
    (reps, ef, interval)
  };

  Schedule {
    repetitions: new_repetitions,
    ease_factor: new_ease_factor,
    interval_days: new_interval,
    next_review: now + Duration::days(new_interval),
  }
}
