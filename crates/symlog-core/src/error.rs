//! Error types for `symlog-core`.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("user not found: {0}")]
  UserNotFound(String),

  #[error("user already exists: {0}")]
  DuplicateUser(String),

  #[error("an episode is already logged for {username} on {date}")]
  DuplicateEpisode { username: String, date: NaiveDate },

  #[error("invalid month: {year}-{month}")]
  InvalidMonth { year: i32, month: u32 },

  #[error("invalid date range: {start} is after {end}")]
  InvalidRange { start: NaiveDate, end: NaiveDate },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
