//! Deck browsing and enrollment handlers.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::domain::{CardContent, Deck};
use crate::errors::Error;
use crate::state::AppState;
use crate::store::CardStore;

use super::review::MessageResponse;

#[derive(Serialize)]
pub struct DeckListResponse {
  pub decks: Vec<Deck>,
}

#[derive(Serialize)]
pub struct DeckDetailResponse {
  pub deck: Deck,
  pub cards: Vec<CardContent>,
}

#[derive(Deserialize)]
pub struct EnrollBody {
  pub user_id: i64,
}

/// GET /decks
pub async fn list_decks(State(state): State<AppState>) -> Result<Json<DeckListResponse>, Error> {
  let decks = state.store.list_decks()?;
  Ok(Json(DeckListResponse { decks }))
}

/// GET /decks/{deck_id}
pub async fn deck_detail(
  State(state): State<AppState>,
  Path(deck_id): Path<i64>,
) -> Result<Json<DeckDetailResponse>, Error> {
  let deck = state
    .store
    .get_deck(deck_id)?
    .ok_or(Error::DeckNotFound(deck_id))?;
  let cards = state.store.get_deck_cards(deck_id)?;
  Ok(Json(DeckDetailResponse { deck, cards }))
}

/// POST /decks/{deck_id}/enroll
pub async fn enroll(
  State(state): State<AppState>,
  Path(deck_id): Path<i64>,
  Json(body): Json<EnrollBody>,
) -> Result<Json<MessageResponse>, Error> {
  state.store.enroll_user(body.user_id, deck_id)?;
  Ok(Json(MessageResponse {
    message: "Enrolled in deck".to_string(),
  }))
}
