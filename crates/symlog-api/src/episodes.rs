//! Handlers for `/episodes` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/episodes/log` | Body: [`NewEpisode`] with nested `medicineLogs` |
//! | `GET`  | `/episodes/user/{username}` | Every episode, ascending by date |
//! | `GET`  | `/episodes/user/{username}/month/{year}/{month}` | One calendar month |
//! | `GET`  | `/episodes/user/{username}/date/{date}` | ISO date; 404 if none |
//! | `GET`  | `/episodes/user/{username}/range?start=..&end=..` | Inclusive range |

use axum::{Json, extract::State};
use chrono::NaiveDate;
use serde::Deserialize;
use symlog_core::{
  episode::{Episode, NewEpisode},
  store::{EpisodeStore, UserStore},
};

use crate::{
  AppState,
  error::ApiError,
  extract::{JsonBody, PathParams, QueryParams},
};

/// `POST /episodes/log`
pub async fn log<S>(
  State(state): State<AppState<S>>,
  JsonBody(body): JsonBody<NewEpisode>,
) -> Result<Json<Episode>, ApiError>
where
  S: UserStore + EpisodeStore + 'static,
{
  tracing::info!(
    username = %body.username,
    date = ?body.episode_date,
    "received episode log request",
  );
  let saved = state.episodes.save_episode(body).await?;
  Ok(Json(saved))
}

/// `GET /episodes/user/{username}`
pub async fn list_for_user<S>(
  State(state): State<AppState<S>>,
  PathParams(username): PathParams<String>,
) -> Result<Json<Vec<Episode>>, ApiError>
where
  S: UserStore + EpisodeStore + 'static,
{
  Ok(Json(state.episodes.episodes_for_user(&username).await?))
}

/// `GET /episodes/user/{username}/month/{year}/{month}`
pub async fn list_for_month<S>(
  State(state): State<AppState<S>>,
  PathParams((username, year, month)): PathParams<(String, i32, u32)>,
) -> Result<Json<Vec<Episode>>, ApiError>
where
  S: UserStore + EpisodeStore + 'static,
{
  Ok(Json(
    state.episodes.episodes_in_month(&username, year, month).await?,
  ))
}

/// `GET /episodes/user/{username}/date/{date}`
pub async fn get_by_date<S>(
  State(state): State<AppState<S>>,
  PathParams((username, date)): PathParams<(String, NaiveDate)>,
) -> Result<Json<Episode>, ApiError>
where
  S: UserStore + EpisodeStore + 'static,
{
  let episode = state
    .episodes
    .episode_on_date(&username, date)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("no episode for {username} on {date}")))?;
  Ok(Json(episode))
}

#[derive(Debug, Deserialize)]
pub struct RangeParams {
  pub start: NaiveDate,
  pub end:   NaiveDate,
}

/// `GET /episodes/user/{username}/range?start=YYYY-MM-DD&end=YYYY-MM-DD`
pub async fn list_for_range<S>(
  State(state): State<AppState<S>>,
  PathParams(username): PathParams<String>,
  QueryParams(params): QueryParams<RangeParams>,
) -> Result<Json<Vec<Episode>>, ApiError>
where
  S: UserStore + EpisodeStore + 'static,
{
  Ok(Json(
    state
      .episodes
      .episodes_between(&username, params.start, params.end)
      .await?,
  ))
}
