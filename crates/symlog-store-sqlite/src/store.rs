//! [`SqliteStore`] — the SQLite implementation of [`UserStore`] and
//! [`EpisodeStore`].

use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::OptionalExtension as _;
use symlog_core::{
  episode::{Episode, PendingEpisode, PendingMedicineLog},
  store::{EpisodeStore, UserStore},
  user::{NewUser, User},
};

use crate::{
  Error, Result,
  encode::{
    RawEpisode, RawMedicineLog, RawUser, encode_date, encode_dt, encode_trigger_ids,
  },
  error::is_unique_violation,
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A symlog store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a filtered episode query and decode the results, logs included.
  async fn select_episodes(
    &self,
    where_clause: &'static str,
    params: Vec<String>,
  ) -> Result<Vec<Episode>> {
    let rows = self
      .conn
      .call(move |conn| {
        Ok(query_episodes(
          conn,
          where_clause,
          rusqlite::params_from_iter(params),
        )?)
      })
      .await?;

    rows
      .into_iter()
      .map(|(ep, logs)| ep.into_episode(logs))
      .collect()
  }
}

// ─── Connection-level helpers ────────────────────────────────────────────────

/// Episodes matching `where_clause`, ascending by date, each paired with its
/// medicine logs in insertion order.
fn query_episodes<P: rusqlite::Params>(
  conn: &rusqlite::Connection,
  where_clause: &str,
  params: P,
) -> rusqlite::Result<Vec<(RawEpisode, Vec<RawMedicineLog>)>> {
  let sql = format!(
    "SELECT {} FROM episodes WHERE {where_clause} ORDER BY episode_date, episode_id",
    RawEpisode::COLUMNS,
  );
  let episodes = conn
    .prepare(&sql)?
    .query_map(params, RawEpisode::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  let mut logs_stmt = conn.prepare(&format!(
    "SELECT {} FROM medicine_logs WHERE episode_id = ?1 ORDER BY medicine_log_id",
    RawMedicineLog::COLUMNS,
  ))?;

  episodes
    .into_iter()
    .map(|ep| -> rusqlite::Result<_> {
      let logs = logs_stmt
        .query_map(rusqlite::params![ep.episode_id], RawMedicineLog::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
      Ok((ep, logs))
    })
    .collect()
}

/// Column values of one `medicine_logs` row, encoded ahead of the insert.
struct LogRow {
  username:          String,
  medicine_log_date: String,
  medicine_name:     Option<String>,
  dose:              Option<String>,
  relief:            Option<i32>,
  time_taken:        String,
  notes:             Option<String>,
  created_at:        String,
  updated_at:        String,
}

impl From<PendingMedicineLog> for LogRow {
  fn from(log: PendingMedicineLog) -> Self {
    Self {
      username:          log.username,
      medicine_log_date: encode_dt(log.medicine_log_date),
      medicine_name:     log.medicine_name,
      dose:              log.dose,
      relief:            log.relief,
      time_taken:        log.time_taken,
      notes:             log.notes,
      created_at:        encode_dt(log.created_at),
      updated_at:        encode_dt(log.updated_at),
    }
  }
}

// ─── UserStore impl ──────────────────────────────────────────────────────────

impl UserStore for SqliteStore {
  type Error = Error;

  async fn insert_user(&self, input: NewUser, created_at: NaiveDateTime) -> Result<User> {
    let user = User {
      username:   input.username,
      password:   input.password,
      email:      input.email,
      is_admin:   input.is_admin,
      created_at,
      last_login: None,
    };

    let username = user.username.clone();
    let password = user.password.clone();
    let email    = user.email.clone();
    let is_admin = user.is_admin;
    let at_str   = encode_dt(user.created_at);

    let inserted = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (username, password, email, is_admin, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![username, password, email, is_admin, at_str],
        )?;
        Ok(())
      })
      .await;

    match inserted {
      Ok(()) => Ok(user),
      Err(e) if is_unique_violation(&e) => Err(Error::DuplicateUser(user.username)),
      Err(e) => Err(e.into()),
    }
  }

  async fn get_user(&self, username: &str) -> Result<Option<User>> {
    let username = username.to_owned();

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {} FROM users WHERE username = ?1", RawUser::COLUMNS),
              rusqlite::params![username],
              RawUser::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn list_usernames(&self) -> Result<Vec<String>> {
    let names = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare("SELECT username FROM users")?;
        let rows = stmt
          .query_map([], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(names)
  }

  async fn touch_last_login(&self, username: &str, at: NaiveDateTime) -> Result<()> {
    let username = username.to_owned();
    let at_str   = encode_dt(at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE users SET last_login = ?2 WHERE username = ?1",
          rusqlite::params![username, at_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── EpisodeStore impl ───────────────────────────────────────────────────────

impl EpisodeStore for SqliteStore {
  type Error = Error;

  async fn insert_episode(
    &self,
    episode: PendingEpisode,
    logs: Vec<PendingMedicineLog>,
  ) -> Result<Episode> {
    let username     = episode.username.clone();
    let date         = episode.episode_date;
    let date_str     = encode_date(episode.episode_date);
    let triggers_str = encode_trigger_ids(&episode.trigger_ids)?;
    let rows: Vec<LogRow> = logs.into_iter().map(LogRow::from).collect();

    let inserted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        tx.execute(
          "INSERT INTO episodes (
             username, episode_date, trigger_ids, menstrual_period,
             morning_severity, afternoon_severity, evening_severity, notes
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            episode.username,
            date_str,
            triggers_str,
            episode.menstrual_period,
            episode.morning_severity,
            episode.afternoon_severity,
            episode.evening_severity,
            episode.notes,
          ],
        )?;
        let episode_id = tx.last_insert_rowid();

        {
          let mut stmt = tx.prepare(
            "INSERT INTO medicine_logs (
               episode_id, username, medicine_log_date, medicine_name, dose,
               relief, time_taken, notes, created_at, updated_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
          )?;
          for row in &rows {
            stmt.execute(rusqlite::params![
              episode_id,
              row.username,
              row.medicine_log_date,
              row.medicine_name,
              row.dose,
              row.relief,
              row.time_taken,
              row.notes,
              row.created_at,
              row.updated_at,
            ])?;
          }
        }

        let saved = query_episodes(&tx, "episode_id = ?1", rusqlite::params![episode_id])?
          .pop()
          .ok_or(rusqlite::Error::QueryReturnedNoRows)?;
        tx.commit()?;
        Ok(saved)
      })
      .await;

    match inserted {
      Ok((ep, logs)) => ep.into_episode(logs),
      Err(e) if is_unique_violation(&e) => {
        tracing::warn!(%username, %date, "duplicate episode rejected");
        Err(Error::DuplicateEpisode { username, date })
      }
      Err(e) => Err(e.into()),
    }
  }

  async fn episodes_for_user(&self, username: &str) -> Result<Vec<Episode>> {
    self
      .select_episodes("username = ?1", vec![username.to_owned()])
      .await
  }

  async fn episode_on_date(&self, username: &str, date: NaiveDate) -> Result<Option<Episode>> {
    let mut found = self
      .select_episodes(
        "username = ?1 AND episode_date = ?2",
        vec![username.to_owned(), encode_date(date)],
      )
      .await?;
    Ok(found.pop())
  }

  async fn episodes_between(
    &self,
    username: &str,
    start: NaiveDate,
    end: NaiveDate,
  ) -> Result<Vec<Episode>> {
    self
      .select_episodes(
        "username = ?1 AND episode_date BETWEEN ?2 AND ?3",
        vec![username.to_owned(), encode_date(start), encode_date(end)],
      )
      .await
  }
}
