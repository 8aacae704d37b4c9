//! Services that sit between the HTTP layer and the stores.
//!
//! Services are constructed explicitly with the store they use and the clock
//! they take defaults from.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

use crate::{
  Error, Result,
  clock::{Clock, SystemClock},
  episode::{Episode, NewEpisode, PendingEpisode, PendingMedicineLog},
  store::{EpisodeStore, UserStore, month_bounds},
  user::{NewUser, User},
};

/// Format of [`MedicineLog::time_taken`](crate::episode::MedicineLog::time_taken).
pub const TIME_TAKEN_FORMAT: &str = "%H:%M:%S";

// ─── Users ───────────────────────────────────────────────────────────────────

pub struct UserService<S> {
  store: Arc<S>,
  clock: Arc<dyn Clock>,
}

impl<S> Clone for UserService<S> {
  fn clone(&self) -> Self {
    Self { store: self.store.clone(), clock: self.clock.clone() }
  }
}

impl<S: UserStore> UserService<S> {
  pub fn new(store: Arc<S>) -> Self { Self::with_clock(store, Arc::new(SystemClock)) }

  pub fn with_clock(store: Arc<S>, clock: Arc<dyn Clock>) -> Self { Self { store, clock } }

  /// Insert `candidate` unconditionally.
  ///
  /// Checking for an existing user first is the caller's job; a duplicate
  /// that slips through surfaces as [`Error::DuplicateUser`].
  pub async fn register(&self, candidate: NewUser) -> Result<User> {
    let user = self
      .store
      .insert_user(candidate, self.clock.now())
      .await
      .map_err(Into::<Error>::into)?;
    tracing::info!(username = %user.username, "registered user");
    Ok(user)
  }

  /// `true` iff the user exists and `password` equals the stored password.
  ///
  /// NOTE: passwords are stored and compared as plaintext, with no hashing
  /// and no constant-time comparison. This is a known defect.
  pub async fn authenticate(&self, username: &str, password: &str) -> Result<bool> {
    let Some(user) = self.store.get_user(username).await.map_err(Into::<Error>::into)? else {
      tracing::debug!(username, "login for unknown user");
      return Ok(false);
    };

    if user.password != password {
      tracing::debug!(username, "login with wrong password");
      return Ok(false);
    }

    self
      .store
      .touch_last_login(username, self.clock.now())
      .await
      .map_err(Into::<Error>::into)?;
    Ok(true)
  }

  pub async fn get_user(&self, username: &str) -> Result<Option<User>> {
    self.store.get_user(username).await.map_err(Into::into)
  }

  pub async fn list_usernames(&self) -> Result<Vec<String>> {
    self.store.list_usernames().await.map_err(Into::into)
  }
}

// ─── Episodes ────────────────────────────────────────────────────────────────

pub struct EpisodeService<S> {
  store: Arc<S>,
  clock: Arc<dyn Clock>,
}

impl<S> Clone for EpisodeService<S> {
  fn clone(&self) -> Self {
    Self { store: self.store.clone(), clock: self.clock.clone() }
  }
}

impl<S: UserStore + EpisodeStore> EpisodeService<S> {
  pub fn new(store: Arc<S>) -> Self { Self::with_clock(store, Arc::new(SystemClock)) }

  pub fn with_clock(store: Arc<S>, clock: Arc<dyn Clock>) -> Self { Self { store, clock } }

  /// Validate, default and persist an episode with its medicine logs.
  ///
  /// Fails with [`Error::UserNotFound`] before anything is written if the
  /// owning user does not exist, and with [`Error::DuplicateEpisode`] if the
  /// user already has an episode on that date.
  pub async fn save_episode(&self, episode: NewEpisode) -> Result<Episode> {
    let user = UserStore::get_user(&*self.store, &episode.username)
      .await
      .map_err(Into::<Error>::into)?
      .ok_or_else(|| Error::UserNotFound(episode.username.clone()))?;

    let (pending, logs) = prepare_episode(episode, &user, self.clock.now());
    tracing::debug!(
      username = %pending.username,
      date = %pending.episode_date,
      logs = logs.len(),
      "saving episode",
    );

    let saved = self
      .store
      .insert_episode(pending, logs)
      .await
      .map_err(Into::<Error>::into)?;
    tracing::info!(
      username = %saved.username,
      episode_id = saved.episode_id,
      date = %saved.episode_date,
      "episode logged",
    );
    Ok(saved)
  }

  pub async fn episodes_for_user(&self, username: &str) -> Result<Vec<Episode>> {
    self.store.episodes_for_user(username).await.map_err(Into::into)
  }

  /// Episodes in `year`-`month`, ascending by date.
  pub async fn episodes_in_month(
    &self,
    username: &str,
    year: i32,
    month: u32,
  ) -> Result<Vec<Episode>> {
    if month_bounds(year, month).is_none() {
      return Err(Error::InvalidMonth { year, month });
    }
    self
      .store
      .episodes_in_month(username, year, month)
      .await
      .map_err(Into::into)
  }

  pub async fn episode_on_date(
    &self,
    username: &str,
    date: NaiveDate,
  ) -> Result<Option<Episode>> {
    self.store.episode_on_date(username, date).await.map_err(Into::into)
  }

  /// Episodes with `start <= episode_date <= end`, ascending by date.
  pub async fn episodes_between(
    &self,
    username: &str,
    start: NaiveDate,
    end: NaiveDate,
  ) -> Result<Vec<Episode>> {
    if start > end {
      return Err(Error::InvalidRange { start, end });
    }
    self
      .store
      .episodes_between(username, start, end)
      .await
      .map_err(Into::into)
  }
}

/// Apply every server-side default to an incoming episode.
///
/// `now` is captured once for the whole batch: all logs share the same
/// `created_at`/`updated_at`. A missing or blank `time_taken` becomes the
/// time of day of `now` plus the log's index in minutes, so defaulted logs
/// in one request never share a value (wrapping at midnight).
pub fn prepare_episode(
  episode: NewEpisode,
  user: &User,
  now: NaiveDateTime,
) -> (PendingEpisode, Vec<PendingMedicineLog>) {
  let pending = PendingEpisode {
    username:           user.username.clone(),
    episode_date:       episode.episode_date.unwrap_or_else(|| now.date()),
    trigger_ids:        episode.trigger_ids,
    menstrual_period:   episode.menstrual_period,
    morning_severity:   episode.morning_severity,
    afternoon_severity: episode.afternoon_severity,
    evening_severity:   episode.evening_severity,
    notes:              episode.notes,
  };

  let logs = episode
    .medicine_logs
    .unwrap_or_default()
    .into_iter()
    .enumerate()
    .map(|(i, log)| {
      let time_taken = match log.time_taken {
        Some(t) if !t.trim().is_empty() => t,
        _ => {
          let offset = TimeDelta::minutes(i as i64);
          (now.time() + offset).format(TIME_TAKEN_FORMAT).to_string()
        }
      };
      PendingMedicineLog {
        username: user.username.clone(),
        medicine_log_date: log.medicine_log_date.unwrap_or(now),
        medicine_name: log.medicine_name,
        dose: log.dose,
        relief: log.relief,
        time_taken,
        notes: log.notes,
        created_at: now,
        updated_at: now,
      }
    })
    .collect();

  (pending, logs)
}
