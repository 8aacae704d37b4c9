//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! `From<symlog_core::Error>` is the single place where domain failures are
//! translated into HTTP status codes.

use axum::{
  Json,
  extract::rejection::{JsonRejection, PathRejection, QueryRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

pub const DUPLICATE_EPISODE_MESSAGE: &str = "You've already logged an episode for this date.";
pub const UNEXPECTED_MESSAGE: &str = "Something went wrong. Please try again.";
pub const LOGIN_FAILED_MESSAGE: &str = "Login Failed!";
pub const INVALID_BODY_MESSAGE: &str = "Request body is not valid JSON for this endpoint.";
pub const INVALID_PATH_MESSAGE: &str = "Invalid path parameter.";
pub const INVALID_QUERY_MESSAGE: &str = "Invalid query parameters.";

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("invalid request: {0}")]
  Validation(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("not found: {0}")]
  NotFound(String),

  #[error("unauthorized")]
  Unauthorized,

  #[error("duplicate episode: {0}")]
  DuplicateEpisode(String),

  #[error("unexpected error: {0}")]
  Unexpected(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<symlog_core::Error> for ApiError {
  fn from(e: symlog_core::Error) -> Self {
    use symlog_core::Error as E;
    match e {
      E::UserNotFound(username) => ApiError::NotFound(format!("user {username} not found")),
      E::DuplicateUser(_) => ApiError::Conflict("User already exists".to_string()),
      e @ E::DuplicateEpisode { .. } => ApiError::DuplicateEpisode(e.to_string()),
      e @ (E::InvalidMonth { .. } | E::InvalidRange { .. }) => {
        ApiError::BadRequest(e.to_string())
      }
      E::Store(source) => ApiError::Unexpected(source),
    }
  }
}

// Rejection text names parser internals; it is logged, not returned.

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    tracing::debug!(detail = %rejection.body_text(), "rejected request body");
    ApiError::BadRequest(INVALID_BODY_MESSAGE.to_string())
  }
}

impl From<PathRejection> for ApiError {
  fn from(rejection: PathRejection) -> Self {
    tracing::debug!(detail = %rejection.body_text(), "rejected path");
    ApiError::BadRequest(INVALID_PATH_MESSAGE.to_string())
  }
}

impl From<QueryRejection> for ApiError {
  fn from(rejection: QueryRejection) -> Self {
    tracing::debug!(detail = %rejection.body_text(), "rejected query string");
    ApiError::BadRequest(INVALID_QUERY_MESSAGE.to_string())
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::Validation(m) | ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::Unauthorized => {
        return (StatusCode::UNAUTHORIZED, LOGIN_FAILED_MESSAGE).into_response();
      }
      ApiError::DuplicateEpisode(detail) => {
        tracing::info!(%detail, "duplicate episode");
        (StatusCode::BAD_REQUEST, DUPLICATE_EPISODE_MESSAGE.to_string())
      }
      ApiError::Unexpected(e) => {
        tracing::error!(error = %e, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, UNEXPECTED_MESSAGE.to_string())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
