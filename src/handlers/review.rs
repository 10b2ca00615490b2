//! Review session and answer-submission handlers.
//!
//! `user_id` arrives already resolved; identity management sits in front
//! of this service.

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config;
use crate::domain::{Question, Rating};
use crate::errors::Error;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SessionQuery {
  pub user_id: i64,
}

#[derive(Serialize)]
pub struct SessionResponse {
  pub cards: Vec<Question>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckSessionResponse {
  pub deck_id: i64,
  pub cards: Vec<Question>,
}

#[derive(Deserialize)]
pub struct AnswerBody {
  pub user_id: i64,
  pub card_id: i64,
  pub rating: String,
}

#[derive(Serialize)]
pub struct MessageResponse {
  pub message: String,
}

/// GET /review/session - general session across everything the user studies
pub async fn general_session(
  State(state): State<AppState>,
  Query(query): Query<SessionQuery>,
) -> Result<Json<SessionResponse>, Error> {
  let mut rng = rand::rng();
  let cards = state.reviewer.build_general_session(
    query.user_id,
    config::SESSION_SIZE,
    Utc::now(),
    &mut rng,
  )?;
  Ok(Json(SessionResponse { cards }))
}

/// GET /review/deck/{deck_id} - session restricted to one deck
pub async fn deck_session(
  State(state): State<AppState>,
  Path(deck_id): Path<i64>,
  Query(query): Query<SessionQuery>,
) -> Result<Json<DeckSessionResponse>, Error> {
  let mut rng = rand::rng();
  let cards = state.reviewer.build_deck_session(
    query.user_id,
    deck_id,
    config::SESSION_SIZE,
    Utc::now(),
    &mut rng,
  )?;
  Ok(Json(DeckSessionResponse { deck_id, cards }))
}

/// POST /review - submit a rating for one card
pub async fn submit_answer(
  State(state): State<AppState>,
  Json(body): Json<AnswerBody>,
) -> Result<Json<MessageResponse>, Error> {
  // Reject bad ratings before any storage access
  let rating =
    Rating::from_str(&body.rating).ok_or_else(|| Error::InvalidRating(body.rating.clone()))?;

  state
    .reviewer
    .submit_answer(body.user_id, body.card_id, rating, Utc::now())?;

  Ok(Json(MessageResponse {
    message: "Progress updated successfully".to_string(),
  }))
}
