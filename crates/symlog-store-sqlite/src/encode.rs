//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Dates are stored as `YYYY-MM-DD` so that lexical order is chronological and
//! range queries work on the raw column. Timestamps are local wall-clock time
//! in ISO 8601 without an offset. Trigger ids are a compact JSON array.

use chrono::{NaiveDate, NaiveDateTime};
use symlog_core::{
  episode::{Episode, MedicineLog},
  user::User,
};

use crate::{Error, Result};

// ─── NaiveDate ───────────────────────────────────────────────────────────────

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDateTime ───────────────────────────────────────────────────────────

const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

pub fn encode_dt(dt: NaiveDateTime) -> String { dt.format(DATETIME_FORMAT).to_string() }

pub fn decode_dt(s: &str) -> Result<NaiveDateTime> {
  NaiveDateTime::parse_from_str(s, DATETIME_FORMAT)
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Trigger ids ─────────────────────────────────────────────────────────────

pub fn encode_trigger_ids(ids: &[i32]) -> Result<String> { Ok(serde_json::to_string(ids)?) }

pub fn decode_trigger_ids(s: &str) -> Result<Vec<i32>> { Ok(serde_json::from_str(s)?) }

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `users` row.
pub struct RawUser {
  pub username:   String,
  pub password:   String,
  pub email:      String,
  pub is_admin:   Option<bool>,
  pub created_at: String,
  pub last_login: Option<String>,
}

impl RawUser {
  pub const COLUMNS: &'static str =
    "username, password, email, is_admin, created_at, last_login";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      username:   row.get(0)?,
      password:   row.get(1)?,
      email:      row.get(2)?,
      is_admin:   row.get(3)?,
      created_at: row.get(4)?,
      last_login: row.get(5)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      username:   self.username,
      password:   self.password,
      email:      self.email,
      is_admin:   self.is_admin,
      created_at: decode_dt(&self.created_at)?,
      last_login: self.last_login.as_deref().map(decode_dt).transpose()?,
    })
  }
}

/// Raw values read directly from an `episodes` row.
pub struct RawEpisode {
  pub episode_id:         i64,
  pub username:           String,
  pub episode_date:       String,
  pub trigger_ids:        String,
  pub menstrual_period:   bool,
  pub morning_severity:   i32,
  pub afternoon_severity: i32,
  pub evening_severity:   i32,
  pub notes:              Option<String>,
}

impl RawEpisode {
  pub const COLUMNS: &'static str = "episode_id, username, episode_date, trigger_ids, \
     menstrual_period, morning_severity, afternoon_severity, evening_severity, notes";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      episode_id:         row.get(0)?,
      username:           row.get(1)?,
      episode_date:       row.get(2)?,
      trigger_ids:        row.get(3)?,
      menstrual_period:   row.get(4)?,
      morning_severity:   row.get(5)?,
      afternoon_severity: row.get(6)?,
      evening_severity:   row.get(7)?,
      notes:              row.get(8)?,
    })
  }

  pub fn into_episode(self, logs: Vec<RawMedicineLog>) -> Result<Episode> {
    Ok(Episode {
      episode_id:         self.episode_id,
      username:           self.username,
      episode_date:       decode_date(&self.episode_date)?,
      trigger_ids:        decode_trigger_ids(&self.trigger_ids)?,
      menstrual_period:   self.menstrual_period,
      morning_severity:   self.morning_severity,
      afternoon_severity: self.afternoon_severity,
      evening_severity:   self.evening_severity,
      notes:              self.notes,
      medicine_logs:      logs
        .into_iter()
        .map(RawMedicineLog::into_log)
        .collect::<Result<_>>()?,
    })
  }
}

/// Raw values read directly from a `medicine_logs` row.
pub struct RawMedicineLog {
  pub id:                i64,
  pub episode_id:        i64,
  pub username:          String,
  pub medicine_log_date: String,
  pub medicine_name:     Option<String>,
  pub dose:              Option<String>,
  pub relief:            Option<i32>,
  pub time_taken:        String,
  pub notes:             Option<String>,
  pub created_at:        String,
  pub updated_at:        String,
}

impl RawMedicineLog {
  pub const COLUMNS: &'static str = "medicine_log_id, episode_id, username, \
     medicine_log_date, medicine_name, dose, relief, time_taken, notes, \
     created_at, updated_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                row.get(0)?,
      episode_id:        row.get(1)?,
      username:          row.get(2)?,
      medicine_log_date: row.get(3)?,
      medicine_name:     row.get(4)?,
      dose:              row.get(5)?,
      relief:            row.get(6)?,
      time_taken:        row.get(7)?,
      notes:             row.get(8)?,
      created_at:        row.get(9)?,
      updated_at:        row.get(10)?,
    })
  }

  pub fn into_log(self) -> Result<MedicineLog> {
    Ok(MedicineLog {
      id:                self.id,
      episode_id:        self.episode_id,
      username:          self.username,
      medicine_log_date: decode_dt(&self.medicine_log_date)?,
      medicine_name:     self.medicine_name,
      dose:              self.dose,
      relief:            self.relief,
      time_taken:        self.time_taken,
      notes:             self.notes,
      created_at:        decode_dt(&self.created_at)?,
      updated_at:        decode_dt(&self.updated_at)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn date_text_sorts_chronologically() {
    let a = encode_date(NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
    let b = encode_date(NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
    assert_eq!(a, "2024-03-09");
    assert!(a < b);
  }

  #[test]
  fn datetime_keeps_fractional_seconds() {
    let dt = NaiveDate::from_ymd_opt(2024, 3, 5)
      .unwrap()
      .and_hms_micro_opt(9, 30, 15, 123_456)
      .unwrap();
    assert_eq!(decode_dt(&encode_dt(dt)).unwrap(), dt);
  }

  #[test]
  fn bad_date_is_a_parse_error() {
    assert!(matches!(decode_date("2024-13-01"), Err(Error::DateParse(_))));
  }
}
