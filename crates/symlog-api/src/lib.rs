//! JSON REST API for symlog.
//!
//! Exposes an axum [`Router`] backed by any store implementing
//! [`UserStore`] and [`EpisodeStore`]. TLS and transport concerns are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! axum::serve(listener, symlog_api::api_router(AppState::new(store)))
//! ```

pub mod episodes;
pub mod error;
pub mod extract;
pub mod users;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use symlog_core::{
  service::{EpisodeService, UserService},
  store::{EpisodeStore, UserStore},
};

pub use error::ApiError;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S> {
  pub users:    UserService<S>,
  pub episodes: EpisodeService<S>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self { users: self.users.clone(), episodes: self.episodes.clone() }
  }
}

impl<S: UserStore + EpisodeStore> AppState<S> {
  /// Build both services over one shared store, using the system clock.
  pub fn new(store: Arc<S>) -> Self {
    Self {
      users:    UserService::new(store.clone()),
      episodes: EpisodeService::new(store),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: UserStore + EpisodeStore + 'static,
{
  Router::new()
    // Users
    .route("/user/register", post(users::register::<S>))
    .route("/user/login", post(users::login::<S>))
    .route("/user/users", get(users::list_usernames::<S>))
    .route("/user/{username}", get(users::get_one::<S>))
    // Episodes
    .route("/episodes/log", post(episodes::log::<S>))
    .route("/episodes/user/{username}", get(episodes::list_for_user::<S>))
    .route(
      "/episodes/user/{username}/month/{year}/{month}",
      get(episodes::list_for_month::<S>),
    )
    .route(
      "/episodes/user/{username}/date/{date}",
      get(episodes::get_by_date::<S>),
    )
    .route(
      "/episodes/user/{username}/range",
      get(episodes::list_for_range::<S>),
    )
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
  };
  use chrono::{Local, NaiveDate};
  use serde_json::{Value, json};
  use symlog_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  async fn make_state() -> AppState<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    AppState::new(Arc::new(store))
  }

  async fn send(
    state:  AppState<SqliteStore>,
    method: &str,
    uri:    &str,
    body:   Option<Value>,
  ) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
      Some(v) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(v.to_string())
      }
      None => Body::empty(),
    };
    api_router(state)
      .oneshot(builder.body(body).unwrap())
      .await
      .unwrap()
  }

  async fn body_text(resp: Response) -> String {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
  }

  async fn body_json(resp: Response) -> Value {
    serde_json::from_str(&body_text(resp).await).unwrap()
  }

  async fn register(state: &AppState<SqliteStore>, username: &str) -> Response {
    send(
      state.clone(),
      "POST",
      "/user/register",
      Some(json!({
        "username": username,
        "password": "hunter2",
        "email": format!("{username}@example.com"),
      })),
    )
    .await
  }

  async fn log_episode(state: &AppState<SqliteStore>, body: Value) -> Response {
    send(state.clone(), "POST", "/episodes/log", Some(body)).await
  }

  // ── Users ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn register_returns_201() {
    let state = make_state().await;
    let resp = register(&state, "alice").await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(body_json(resp).await["message"], "User created successfully");
  }

  #[tokio::test]
  async fn register_missing_field_returns_400() {
    let state = make_state().await;
    let resp = send(
      state,
      "POST",
      "/user/register",
      Some(json!({ "username": "alice", "password": "x" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn register_existing_returns_409_and_keeps_original() {
    let state = make_state().await;
    register(&state, "alice").await;

    let resp = send(
      state.clone(),
      "POST",
      "/user/register",
      Some(json!({ "username": "alice", "password": "other", "email": "evil@example.com" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let user = body_json(send(state, "GET", "/user/alice", None).await).await;
    assert_eq!(user["email"], "alice@example.com");
  }

  #[tokio::test]
  async fn login_success_and_failure() {
    let state = make_state().await;
    register(&state, "alice").await;

    let ok = send(
      state.clone(),
      "POST",
      "/user/login",
      Some(json!({ "username": "alice", "password": "hunter2" })),
    )
    .await;
    assert_eq!(ok.status(), StatusCode::OK);
    assert_eq!(body_text(ok).await, "Login Successful!");

    let bad = send(
      state.clone(),
      "POST",
      "/user/login",
      Some(json!({ "username": "alice", "password": "nope" })),
    )
    .await;
    assert_eq!(bad.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_text(bad).await, "Login Failed!");

    let unknown = send(
      state,
      "POST",
      "/user/login",
      Some(json!({ "username": "ghost", "password": "hunter2" })),
    )
    .await;
    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn get_user_hides_password() {
    let state = make_state().await;
    register(&state, "alice").await;

    let resp = send(state, "GET", "/user/alice", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let user = body_json(resp).await;
    assert_eq!(user["username"], "alice");
    assert!(user.get("password").is_none());
  }

  #[tokio::test]
  async fn get_unknown_user_returns_404() {
    let state = make_state().await;
    let resp = send(state, "GET", "/user/nobody", None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn list_usernames() {
    let state = make_state().await;
    register(&state, "alice").await;
    register(&state, "bob").await;

    let resp = send(state, "GET", "/user/users", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let mut names: Vec<String> = serde_json::from_value(body_json(resp).await).unwrap();
    names.sort();
    assert_eq!(names, ["alice", "bob"]);
  }

  // ── Episodes ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn log_episode_and_fetch_by_date() {
    let state = make_state().await;
    register(&state, "alice").await;

    let resp = log_episode(
      &state,
      json!({
        "username": "alice",
        "episodeDate": "2024-03-05",
        "triggerIds": [1, 4],
        "menstrualPeriod": true,
        "morningSeverity": 6,
        "afternoonSeverity": 3,
        "eveningSeverity": 0,
        "notes": "bright lights",
        "medicineLogs": [
          { "medicineName": "ibuprofen", "dose": "400mg", "relief": 3 },
          { "medicineName": "water", "timeTaken": "14:00:00" }
        ]
      }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let saved = body_json(resp).await;

    let resp = send(state, "GET", "/episodes/user/alice/date/2024-03-05", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched = body_json(resp).await;
    assert_eq!(fetched, saved);
    assert_eq!(fetched["triggerIds"], json!([1, 4]));
    assert_eq!(fetched["medicineLogs"].as_array().unwrap().len(), 2);
    assert_eq!(fetched["medicineLogs"][1]["timeTaken"], "14:00:00");
  }

  #[tokio::test]
  async fn log_episode_without_date_uses_today() {
    let state = make_state().await;
    register(&state, "alice").await;

    let saved = body_json(log_episode(&state, json!({ "username": "alice" })).await).await;
    let today = Local::now().date_naive();
    let date: NaiveDate = serde_json::from_value(saved["episodeDate"].clone()).unwrap();
    // Tolerate the test straddling midnight.
    assert!(date == today || date.succ_opt() == Some(today));
  }

  #[tokio::test]
  async fn log_episode_unknown_user_returns_404() {
    let state = make_state().await;
    let resp = log_episode(&state, json!({ "username": "ghost" })).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let list = body_json(send(state, "GET", "/episodes/user/ghost", None).await).await;
    assert_eq!(list, json!([]));
  }

  #[tokio::test]
  async fn duplicate_date_returns_400_with_message() {
    let state = make_state().await;
    register(&state, "alice").await;
    let body = json!({ "username": "alice", "episodeDate": "2024-03-05" });

    assert_eq!(log_episode(&state, body.clone()).await.status(), StatusCode::OK);
    let resp = log_episode(&state, body).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
      body_json(resp).await["error"],
      "You've already logged an episode for this date."
    );
  }

  #[tokio::test]
  async fn missing_date_returns_404() {
    let state = make_state().await;
    register(&state, "alice").await;
    let resp = send(state, "GET", "/episodes/user/alice/date/2024-01-01", None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn month_listing_is_filtered_and_sorted() {
    let state = make_state().await;
    register(&state, "alice").await;
    for d in ["2024-03-20", "2024-04-01", "2024-03-02", "2024-02-29"] {
      log_episode(&state, json!({ "username": "alice", "episodeDate": d })).await;
    }

    let resp = send(state, "GET", "/episodes/user/alice/month/2024/3", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let dates: Vec<String> = body_json(resp)
      .await
      .as_array()
      .unwrap()
      .iter()
      .map(|e| e["episodeDate"].as_str().unwrap().to_owned())
      .collect();
    assert_eq!(dates, ["2024-03-02", "2024-03-20"]);
  }

  #[tokio::test]
  async fn invalid_month_returns_400() {
    let state = make_state().await;
    let resp = send(state, "GET", "/episodes/user/alice/month/2024/13", None).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn list_for_user_includes_logs() {
    let state = make_state().await;
    register(&state, "alice").await;
    log_episode(
      &state,
      json!({
        "username": "alice",
        "episodeDate": "2024-03-05",
        "medicineLogs": [{ "medicineName": "a" }, { "medicineName": "b" }]
      }),
    )
    .await;

    let list = body_json(send(state, "GET", "/episodes/user/alice", None).await).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["medicineLogs"].as_array().unwrap().len(), 2);
  }

  #[tokio::test]
  async fn range_listing_and_inverted_range() {
    let state = make_state().await;
    register(&state, "alice").await;
    for d in ["2024-05-01", "2024-05-03", "2024-05-07"] {
      log_episode(&state, json!({ "username": "alice", "episodeDate": d })).await;
    }

    let resp = send(
      state.clone(),
      "GET",
      "/episodes/user/alice/range?start=2024-05-01&end=2024-05-03",
      None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await.as_array().unwrap().len(), 2);

    let resp = send(
      state,
      "GET",
      "/episodes/user/alice/range?start=2024-05-07&end=2024-05-01",
      None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  // ── Malformed input ─────────────────────────────────────────────────────────

  async fn send_raw(state: AppState<SqliteStore>, uri: &str, body: &str) -> Response {
    let req = Request::builder()
      .method("POST")
      .uri(uri)
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(body.to_owned()))
      .unwrap();
    api_router(state).oneshot(req).await.unwrap()
  }

  async fn assert_json_400(resp: Response, message: &str) {
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await, json!({ "error": message }));
  }

  #[tokio::test]
  async fn unparseable_date_in_path_is_json_400() {
    let state = make_state().await;
    register(&state, "alice").await;
    let resp = send(state, "GET", "/episodes/user/alice/date/not-a-date", None).await;
    assert_json_400(resp, error::INVALID_PATH_MESSAGE).await;
  }

  #[tokio::test]
  async fn non_numeric_month_is_json_400() {
    let state = make_state().await;
    let resp = send(state, "GET", "/episodes/user/alice/month/2024/may", None).await;
    assert_json_400(resp, error::INVALID_PATH_MESSAGE).await;
  }

  #[tokio::test]
  async fn syntactically_broken_body_is_json_400() {
    let state = make_state().await;
    let resp = send_raw(state, "/user/register", "{not json").await;
    assert_json_400(resp, error::INVALID_BODY_MESSAGE).await;
  }

  #[tokio::test]
  async fn ill_typed_episode_date_is_json_400_and_nothing_saved() {
    let state = make_state().await;
    register(&state, "alice").await;
    let resp = log_episode(
      &state,
      json!({ "username": "alice", "episodeDate": "garbage" }),
    )
    .await;
    assert_json_400(resp, error::INVALID_BODY_MESSAGE).await;

    let list = body_json(send(state, "GET", "/episodes/user/alice", None).await).await;
    assert_eq!(list, json!([]));
  }

  #[tokio::test]
  async fn missing_range_bound_is_json_400() {
    let state = make_state().await;
    let resp = send(
      state,
      "GET",
      "/episodes/user/alice/range?start=2024-05-01",
      None,
    )
    .await;
    assert_json_400(resp, error::INVALID_QUERY_MESSAGE).await;
  }
}
