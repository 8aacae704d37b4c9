//! Handlers for `/user` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/user/register` | Body: `{username, password, email}`; 201, 400, or 409 |
//! | `POST` | `/user/login` | Body: `{username, password}`; 200 or 401, plain text |
//! | `GET`  | `/user/users` | All usernames |
//! | `GET`  | `/user/{username}` | 404 if not found |

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use symlog_core::{
  store::UserStore,
  user::{NewUser, User},
};

use crate::{
  AppState,
  error::ApiError,
  extract::{JsonBody, PathParams},
};

// ─── Register ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
  pub username: Option<String>,
  pub password: Option<String>,
  pub email:    Option<String>,
}

/// `POST /user/register`
pub async fn register<S>(
  State(state): State<AppState<S>>,
  JsonBody(body): JsonBody<RegisterBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: UserStore + 'static,
{
  let (Some(username), Some(password), Some(email)) = (body.username, body.password, body.email)
  else {
    return Err(ApiError::Validation("All fields are required".to_string()));
  };

  if state.users.get_user(&username).await?.is_some() {
    return Err(ApiError::Conflict("User already exists".to_string()));
  }

  state
    .users
    .register(NewUser::new(username, password, email))
    .await?;

  Ok((
    StatusCode::CREATED,
    Json(json!({ "message": "User created successfully" })),
  ))
}

// ─── Login ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  #[serde(default)]
  pub username: String,
  #[serde(default)]
  pub password: String,
}

/// `POST /user/login`
pub async fn login<S>(
  State(state): State<AppState<S>>,
  JsonBody(body): JsonBody<LoginBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: UserStore + 'static,
{
  if state.users.authenticate(&body.username, &body.password).await? {
    tracing::info!(username = %body.username, "login succeeded");
    Ok((StatusCode::OK, "Login Successful!"))
  } else {
    tracing::info!(username = %body.username, "login failed");
    Err(ApiError::Unauthorized)
  }
}

// ─── Reads ───────────────────────────────────────────────────────────────────

/// `GET /user/{username}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  PathParams(username): PathParams<String>,
) -> Result<Json<User>, ApiError>
where
  S: UserStore + 'static,
{
  let user = state
    .users
    .get_user(&username)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("user {username} not found")))?;
  Ok(Json(user))
}

/// `GET /user/users`
pub async fn list_usernames<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<String>>, ApiError>
where
  S: UserStore + 'static,
{
  Ok(Json(state.users.list_usernames().await?))
}
