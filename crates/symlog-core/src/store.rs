//! The `UserStore` and `EpisodeStore` traits.
//!
//! The traits are implemented by storage backends (e.g. `symlog-store-sqlite`).
//! The services in [`crate::service`] depend on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use chrono::{NaiveDate, NaiveDateTime};

use crate::{
  episode::{Episode, PendingEpisode, PendingMedicineLog},
  user::{NewUser, User},
};

// ─── Users ───────────────────────────────────────────────────────────────────

/// Persistence for user accounts.
///
/// A backend's error type must convert into [`crate::Error`], mapping its own
/// uniqueness failures onto [`crate::Error::DuplicateUser`].
pub trait UserStore: Send + Sync {
  type Error: std::error::Error + Into<crate::Error> + Send + Sync + 'static;

  /// Insert a new user created at `created_at`. Fails if the username is
  /// taken.
  fn insert_user(
    &self,
    user: NewUser,
    created_at: NaiveDateTime,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Retrieve a user by username. Returns `None` if not found.
  fn get_user<'a>(
    &'a self,
    username: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  /// All usernames, in storage order.
  fn list_usernames(
    &self,
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + '_;

  /// Record a successful login.
  fn touch_last_login<'a>(
    &'a self,
    username: &'a str,
    at: NaiveDateTime,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}

// ─── Episodes ────────────────────────────────────────────────────────────────

/// Persistence for episodes and the medicine logs they own.
///
/// Every read returns episodes with `medicine_logs` fully populated.
pub trait EpisodeStore: Send + Sync {
  type Error: std::error::Error + Into<crate::Error> + Send + Sync + 'static;

  /// Insert an episode and all of its logs as one atomic unit.
  ///
  /// Either everything is committed or nothing is. A second episode for the
  /// same `(username, episode_date)` must fail with an error that converts to
  /// [`crate::Error::DuplicateEpisode`].
  fn insert_episode(
    &self,
    episode: PendingEpisode,
    logs: Vec<PendingMedicineLog>,
  ) -> impl Future<Output = Result<Episode, Self::Error>> + Send + '_;

  /// All episodes for a user, ascending by date.
  fn episodes_for_user<'a>(
    &'a self,
    username: &'a str,
  ) -> impl Future<Output = Result<Vec<Episode>, Self::Error>> + Send + 'a;

  /// The episode for a user on `date`, if any.
  fn episode_on_date<'a>(
    &'a self,
    username: &'a str,
    date: NaiveDate,
  ) -> impl Future<Output = Result<Option<Episode>, Self::Error>> + Send + 'a;

  /// Episodes with `start <= episode_date <= end`, ascending by date.
  fn episodes_between<'a>(
    &'a self,
    username: &'a str,
    start: NaiveDate,
    end: NaiveDate,
  ) -> impl Future<Output = Result<Vec<Episode>, Self::Error>> + Send + 'a;

  /// Episodes in a calendar month, ascending by date.
  ///
  /// The default implementation delegates to [`Self::episodes_between`].
  /// Returns an empty list for a month that does not exist.
  fn episodes_in_month<'a>(
    &'a self,
    username: &'a str,
    year: i32,
    month: u32,
  ) -> impl Future<Output = Result<Vec<Episode>, Self::Error>> + Send + 'a {
    async move {
      match month_bounds(year, month) {
        Some((start, end)) => self.episodes_between(username, start, end).await,
        None => Ok(Vec::new()),
      }
    }
  }
}

/// First and last day of a calendar month, or `None` if it does not exist.
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
  let start = NaiveDate::from_ymd_opt(year, month, 1)?;
  let next = if month == 12 {
    NaiveDate::from_ymd_opt(year.checked_add(1)?, 1, 1)?
  } else {
    NaiveDate::from_ymd_opt(year, month + 1, 1)?
  };
  Some((start, next.pred_opt()?))
}
