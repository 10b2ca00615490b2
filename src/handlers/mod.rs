//! JSON handlers for the review and deck surfaces.

mod decks;
mod review;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::trace::TraceLayer;

pub use decks::{deck_detail, enroll, list_decks};
pub use review::{deck_session, general_session, submit_answer};

use crate::errors::Error;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
  Router::new()
    .route("/review/session", get(review::general_session))
    .route("/review/deck/{deck_id}", get(review::deck_session))
    .route("/review", post(review::submit_answer))
    .route("/decks", get(decks::list_decks))
    .route("/decks/{deck_id}", get(decks::deck_detail))
    .route("/decks/{deck_id}/enroll", post(decks::enroll))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

#[derive(Serialize)]
struct ErrorBody {
  error: String,
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let status = match &self {
      Error::InvalidRating(_) => StatusCode::BAD_REQUEST,
      Error::CardNotFound(_) | Error::DeckNotFound(_) => StatusCode::NOT_FOUND,
      Error::OrphanCard(_) => StatusCode::INTERNAL_SERVER_ERROR,
      Error::Storage(_) => StatusCode::SERVICE_UNAVAILABLE,
    };

    if status.is_server_error() {
      tracing::error!("request failed: {}", self);
    }

    (status, Json(ErrorBody { error: self.to_string() })).into_response()
  }
}
