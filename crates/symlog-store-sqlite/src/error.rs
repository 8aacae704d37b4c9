//! Error type for `symlog-store-sqlite`.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("user already exists: {0}")]
  DuplicateUser(String),

  #[error("an episode is already logged for {username} on {date}")]
  DuplicateEpisode { username: String, date: NaiveDate },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<Error> for symlog_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::DuplicateUser(username) => Self::DuplicateUser(username),
      Error::DuplicateEpisode { username, date } => {
        Self::DuplicateEpisode { username, date }
      }
      other => Self::Store(Box::new(other)),
    }
  }
}

/// `true` if `err` is a SQLite UNIQUE or PRIMARY KEY constraint failure.
pub(crate) fn is_unique_violation(err: &tokio_rusqlite::Error) -> bool {
  match err {
    tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(e, _)) => {
      e.code == rusqlite::ErrorCode::ConstraintViolation
        && matches!(
          e.extended_code,
          rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
            | rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
        )
    }
    _ => false,
  }
}
