//! Episodes and the medicine logs they own.
//!
//! An episode is one day's symptom record for a user. It is uniquely keyed by
//! `(username, episode_date)` and exclusively owns its medicine logs: logs are
//! written together with the episode and removed with it.
//!
//! Three shapes exist for each record:
//!
//! - `New*`: what a client sends. Every defaultable field is optional.
//! - `Pending*`: fully defaulted by [`EpisodeService`](crate::service::EpisodeService)
//!   and ready to insert, but without store-assigned ids.
//! - [`Episode`] / [`MedicineLog`]: persisted rows as returned by the store.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ─── Persisted ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
  /// Store-assigned; strictly increasing in insertion order.
  pub episode_id:         i64,
  pub username:           String,
  pub episode_date:       NaiveDate,
  pub trigger_ids:        Vec<i32>,
  pub menstrual_period:   bool,
  pub morning_severity:   i32,
  pub afternoon_severity: i32,
  pub evening_severity:   i32,
  pub notes:              Option<String>,
  /// Always fully loaded; never a lazy reference.
  pub medicine_logs:      Vec<MedicineLog>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicineLog {
  pub id:                i64,
  pub episode_id:        i64,
  pub username:          String,
  pub medicine_log_date: NaiveDateTime,
  pub medicine_name:     Option<String>,
  pub dose:              Option<String>,
  pub relief:            Option<i32>,
  /// Time of day, `HH:MM:SS`.
  pub time_taken:        String,
  pub notes:             Option<String>,
  pub created_at:        NaiveDateTime,
  pub updated_at:        NaiveDateTime,
}

// ─── Client input ────────────────────────────────────────────────────────────

/// Body of `POST /episodes/log`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEpisode {
  pub username:           String,
  /// Defaults to the server's current local date.
  pub episode_date:       Option<NaiveDate>,
  #[serde(default)]
  pub trigger_ids:        Vec<i32>,
  #[serde(default)]
  pub menstrual_period:   bool,
  #[serde(default)]
  pub morning_severity:   i32,
  #[serde(default)]
  pub afternoon_severity: i32,
  #[serde(default)]
  pub evening_severity:   i32,
  pub notes:              Option<String>,
  /// `null` and absent are both treated as "no logs".
  pub medicine_logs:      Option<Vec<NewMedicineLog>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMedicineLog {
  pub medicine_log_date: Option<NaiveDateTime>,
  pub medicine_name:     Option<String>,
  pub dose:              Option<String>,
  pub relief:            Option<i32>,
  pub time_taken:        Option<String>,
  pub notes:             Option<String>,
}

// ─── Ready to insert ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingEpisode {
  pub username:           String,
  pub episode_date:       NaiveDate,
  pub trigger_ids:        Vec<i32>,
  pub menstrual_period:   bool,
  pub morning_severity:   i32,
  pub afternoon_severity: i32,
  pub evening_severity:   i32,
  pub notes:              Option<String>,
}

/// A medicine log with every default applied. The owning episode id is
/// attached by the store inside the insert transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMedicineLog {
  pub username:          String,
  pub medicine_log_date: NaiveDateTime,
  pub medicine_name:     Option<String>,
  pub dose:              Option<String>,
  pub relief:            Option<i32>,
  pub time_taken:        String,
  pub notes:             Option<String>,
  pub created_at:        NaiveDateTime,
  pub updated_at:        NaiveDateTime,
}
