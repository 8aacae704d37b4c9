//! User accounts.

use chrono::NaiveDateTime;
use serde::Serialize;

/// A registered user, keyed by `username`.
///
/// `password` is stored and compared verbatim; it is never serialized.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
  pub username:   String,
  #[serde(skip_serializing)]
  pub password:   String,
  pub email:      String,
  pub is_admin:   Option<bool>,
  pub created_at: NaiveDateTime,
  pub last_login: Option<NaiveDateTime>,
}

/// Input to [`UserStore::insert_user`](crate::store::UserStore::insert_user).
#[derive(Debug, Clone)]
pub struct NewUser {
  pub username: String,
  pub password: String,
  pub email:    String,
  pub is_admin: Option<bool>,
}

impl NewUser {
  pub fn new(
    username: impl Into<String>,
    password: impl Into<String>,
    email: impl Into<String>,
  ) -> Self {
    Self {
      username: username.into(),
      password: password.into(),
      email:    email.into(),
      is_admin: None,
    }
  }
}
