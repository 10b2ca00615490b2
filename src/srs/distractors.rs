//! Distractor selection for multiple-choice questions.
//!
//! The random source is injected so tests can seed it; shuffling uses
//! `SliceRandom::shuffle` (Fisher-Yates), not a sort by random key.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::{AnswerOption, CardContent, QuestionType};

/// Pick up to `count` wrong options from the card's deck pool.
///
/// Excludes the target card itself and any card whose answer equals the
/// correct answer. Fewer than `count` survivors is fine; a question may
/// legitimately offer fewer than four options.
pub fn select_distractors(
  pool: &[CardContent],
  exclude_card_id: i64,
  correct_answer: &str,
  count: usize,
  rng: &mut impl Rng,
) -> Vec<CardContent> {
  let mut candidates: Vec<CardContent> = pool
    .iter()
    .filter(|c| c.id != exclude_card_id && c.answer != correct_answer)
    .cloned()
    .collect();

  candidates.shuffle(rng);
  candidates.truncate(count);
  candidates
}

/// Merge the correct card into the distractor set and shuffle again so
/// the correct answer's position is not predictable.
pub fn build_options(
  card: &CardContent,
  distractors: Vec<CardContent>,
  question_type: QuestionType,
  rng: &mut impl Rng,
) -> Vec<AnswerOption> {
  let mut pool = distractors;
  pool.push(card.clone());
  pool.shuffle(rng);

  pool
    .iter()
    .map(|c| match question_type {
      // Options are native translations
      QuestionType::ImageAndWordToTranslation | QuestionType::WordToTranslation => AnswerOption {
        text: c.prompt.clone(),
        image_url: None,
      },
      // Options are images; text kept for answer checking
      QuestionType::WordToImage => AnswerOption {
        text: c.answer.clone(),
        image_url: c.image_url.clone(),
      },
      // Options are target words
      _ => AnswerOption {
        text: c.answer.clone(),
        image_url: None,
      },
    })
    .collect()
}
