//! Review-session assembly and answer submission.
//!
//! The `Reviewer` selects which cards a learner sees next, derives a
//! question presentation per card from its repetition count, and applies
//! the SM-2 update when a rating comes back. Storage handles are injected
//! at construction; the host application owns their lifecycle.

use chrono::{DateTime, Utc};
use rand::Rng;
use std::collections::HashSet;
use std::sync::Arc;

use crate::config;
use crate::domain::{CardContent, Feedback, Question, QuestionType, Rating, UserCardProgress};
use crate::errors::{Error, Result};
use crate::srs::distractors::{build_options, select_distractors};
use crate::srs::sm2;
use crate::store::{CardStore, ProgressStore, ScheduleFields};

pub struct Reviewer {
  progress: Arc<dyn ProgressStore>,
  cards: Arc<dyn CardStore>,
}

impl Reviewer {
  pub fn new(progress: Arc<dyn ProgressStore>, cards: Arc<dyn CardStore>) -> Self {
    Self { progress, cards }
  }

  /// Cross-deck session: due cards first (earliest due time first), then
  /// cards still being learned (weakest first), then brand-new cards from
  /// decks the user has added. A seen-id set keeps a card from entering
  /// twice even when it qualifies for more than one tier.
  pub fn build_general_session(
    &self,
    user_id: i64,
    session_size: usize,
    now: DateTime<Utc>,
    rng: &mut impl Rng,
  ) -> Result<Vec<Question>> {
    // Tier 1: due for review
    let due = self.progress.find_due_progress(user_id, now, session_size)?;
    let mut seen: HashSet<i64> = due.iter().map(|p| p.card_id).collect();
    let mut selected: Vec<(i64, i64)> = due.iter().map(|p| (p.card_id, p.repetitions)).collect();

    // Tier 2: not yet due, not yet mastered
    if selected.len() < session_size {
      let exclude: Vec<i64> = seen.iter().copied().collect();
      let learning = self.progress.find_learning_progress(
        user_id,
        &exclude,
        session_size - selected.len(),
      )?;
      for p in learning {
        if seen.insert(p.card_id) {
          selected.push((p.card_id, p.repetitions));
        }
      }
    }

    // Tier 3: never-seen cards from engaged decks. Their progress record
    // is implied at repetitions 0 and only persisted on first answer.
    if selected.len() < session_size {
      let mut pool_ids = Vec::new();
      for deck in self.cards.get_user_engaged_decks(user_id)? {
        for card in self.cards.get_deck_cards(deck.id)? {
          pool_ids.push(card.id);
        }
      }
      // "New" means no progress record at all, not merely unselected;
      // a mastered card must not re-enter here.
      let mut exclude: Vec<i64> = seen.iter().copied().collect();
      exclude.extend(self.progress.find_reviewed_card_ids(user_id)?);
      let fresh =
        self
          .cards
          .find_cards_not_in(&pool_ids, &exclude, session_size - selected.len())?;
      for card in fresh {
        if seen.insert(card.id) {
          selected.push((card.id, 0));
        }
      }
    }

    tracing::debug!(
      user_id,
      cards = selected.len(),
      "assembled general review session"
    );

    selected
      .into_iter()
      .map(|(card_id, repetitions)| {
        let card = self
          .cards
          .get_card(card_id)?
          .ok_or(Error::CardNotFound(card_id))?;
        self.create_question(&card, repetitions, rng)
      })
      .collect()
  }

  /// Deck-scoped session: every deck card is classified as due, learning
  /// (no progress yet, or unmastered and not due) or mastered. Mastered
  /// cards leave the rotation; due cards come first, most overdue first.
  pub fn build_deck_session(
    &self,
    user_id: i64,
    deck_id: i64,
    session_size: usize,
    now: DateTime<Utc>,
    rng: &mut impl Rng,
  ) -> Result<Vec<Question>> {
    self
      .cards
      .get_deck(deck_id)?
      .ok_or(Error::DeckNotFound(deck_id))?;

    let mut due: Vec<(CardContent, i64, DateTime<Utc>)> = Vec::new();
    let mut learning: Vec<(CardContent, i64)> = Vec::new();

    for card in self.cards.get_deck_cards(deck_id)? {
      match self.progress.find_progress(user_id, card.id)? {
        None => learning.push((card, 0)),
        Some(p) if p.is_due(now) => due.push((card, p.repetitions, p.next_review)),
        Some(p) if !p.is_mastered() => learning.push((card, p.repetitions)),
        Some(_) => {}
      }
    }

    due.sort_by_key(|&(_, _, next_review)| next_review);

    due
      .into_iter()
      .map(|(card, repetitions, _)| (card, repetitions))
      .chain(learning)
      .take(session_size)
      .map(|(card, repetitions)| self.create_question(&card, repetitions, rng))
      .collect()
  }

  /// Apply a rating to one card: load or default the progress record,
  /// run the SM-2 update, persist through the atomic upsert.
  pub fn submit_answer(
    &self,
    user_id: i64,
    card_id: i64,
    rating: Rating,
    now: DateTime<Utc>,
  ) -> Result<UserCardProgress> {
    self
      .cards
      .get_card(card_id)?
      .ok_or(Error::CardNotFound(card_id))?;

    let current = self
      .progress
      .find_progress(user_id, card_id)?
      .unwrap_or_else(|| UserCardProgress::new(user_id, card_id, now));

    let schedule = sm2::update_schedule(
      rating,
      current.ease_factor,
      current.interval_days,
      current.repetitions,
      now,
    );

    tracing::debug!(
      user_id,
      card_id,
      rating = rating.as_str(),
      repetitions = schedule.repetitions,
      interval_days = schedule.interval_days,
      "recorded review"
    );

    self.progress.upsert_progress(
      user_id,
      card_id,
      &ScheduleFields {
        repetitions: schedule.repetitions,
        ease_factor: schedule.ease_factor,
        interval_days: schedule.interval_days,
        next_review: schedule.next_review,
      },
    )
  }

  /// Build the presentation payload for one selected card.
  fn create_question(
    &self,
    card: &CardContent,
    repetitions: i64,
    rng: &mut impl Rng,
  ) -> Result<Question> {
    let question_type = QuestionType::for_repetitions(repetitions);

    let options = if question_type.is_multiple_choice() {
      let deck = self
        .cards
        .find_deck_for_card(card.id)?
        .ok_or(Error::OrphanCard(card.id))?;
      let pool = self.cards.get_deck_cards(deck.id)?;
      let distractors =
        select_distractors(&pool, card.id, &card.answer, config::DISTRACTOR_COUNT, rng);
      build_options(card, distractors, question_type, rng)
    } else {
      Vec::new()
    };

    let (prompt, word, image_url, correct_answer) = match question_type {
      QuestionType::ImageAndWordToTranslation => (
        card.prompt.clone(),
        Some(card.answer.clone()),
        card.image_url.clone(),
        card.prompt.clone(),
      ),
      QuestionType::ImageToWord => (
        "What is this?".to_string(),
        None,
        card.image_url.clone(),
        card.answer.clone(),
      ),
      QuestionType::WordToTranslation => (
        "Translate this word:".to_string(),
        Some(card.answer.clone()),
        None,
        card.prompt.clone(),
      ),
      QuestionType::WordToImage => (
        "Which image represents this word?".to_string(),
        Some(card.answer.clone()),
        None,
        card.answer.clone(),
      ),
      QuestionType::ImageToTypedWord => (
        "What is this in English?".to_string(),
        None,
        card.image_url.clone(),
        card.answer.clone(),
      ),
      QuestionType::TranslationToTypedWord => (
        format!("How do you say \"{}\" in English?", card.prompt),
        None,
        None,
        card.answer.clone(),
      ),
    };

    Ok(Question {
      card_id: card.id,
      question_type,
      prompt,
      word,
      image_url,
      options,
      correct_answer,
      feedback: Feedback {
        word: card.answer.clone(),
        translation: card.prompt.clone(),
        image_url: card.image_url.clone(),
      },
    })
  }
}
