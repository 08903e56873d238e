//! HTTP Basic-auth viewer extraction.
//!
//! A request with no `Authorization` header is an anonymous viewer. A request
//! with a header must carry valid credentials for a configured user, or it is
//! rejected with 401 regardless of route.

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, request::Parts};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use quill_core::{
  identity::{Identity, Viewer},
  store::PostStore,
};
use serde::Deserialize;

use crate::{AppState, error::ApiError};

/// One account allowed to sign in.
#[derive(Debug, Clone, Deserialize)]
pub struct UserCredential {
  /// Display name; also the ownership key for posts.
  pub name:          String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
}

/// Credentials accepted as valid for this server instance.
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
  pub users: Vec<UserCredential>,
}

/// An authenticated caller. Rejects anonymous requests with 401.
pub struct Authenticated(pub Identity);

/// Whoever is calling, anonymous or not.
pub struct CurrentViewer(pub Viewer);

/// Resolve the caller from request headers.
///
/// `Ok(None)` means no credentials were presented.
pub fn identify(headers: &HeaderMap, config: &AuthConfig) -> Result<Option<Identity>, ApiError> {
  let Some(header_val) = headers.get(axum::http::header::AUTHORIZATION) else {
    return Ok(None);
  };

  let encoded = header_val
    .to_str()
    .ok()
    .and_then(|v| v.strip_prefix("Basic "))
    .ok_or(ApiError::Unauthorized)?;

  let decoded = B64.decode(encoded).map_err(|_| ApiError::Unauthorized)?;
  let creds   = std::str::from_utf8(&decoded).map_err(|_| ApiError::Unauthorized)?;

  let (username, password) = creds.split_once(':').ok_or(ApiError::Unauthorized)?;

  let user = config
    .users
    .iter()
    .find(|u| u.name == username)
    .ok_or(ApiError::Unauthorized)?;

  let parsed_hash = PasswordHash::new(&user.password_hash)
    .map_err(|_| ApiError::Unauthorized)?;

  Argon2::default()
    .verify_password(password.as_bytes(), &parsed_hash)
    .map_err(|_| {
      tracing::info!(user = %username, "rejected credentials");
      ApiError::Unauthorized
    })?;

  Ok(Some(Identity::new(user.name.clone())))
}

impl<S> FromRequestParts<AppState<S>> for Authenticated
where
  S: PostStore + Clone + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    identify(&parts.headers, &state.auth)?
      .map(Authenticated)
      .ok_or(ApiError::Unauthorized)
  }
}

impl<S> FromRequestParts<AppState<S>> for CurrentViewer
where
  S: PostStore + Clone + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    Ok(CurrentViewer(Viewer::from(identify(&parts.headers, &state.auth)?)))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use axum::http::{HeaderValue, header};

  fn hash(password: &str) -> String {
    use argon2::{PasswordHasher, password_hash::SaltString};
    use rand_core::OsRng;
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .unwrap()
      .to_string()
  }

  fn config() -> AuthConfig {
    AuthConfig {
      users: vec![UserCredential { name: "alice".into(), password_hash: hash("secret") }],
    }
  }

  fn basic(user: &str, pass: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    let value = format!("Basic {}", B64.encode(format!("{user}:{pass}")));
    headers.insert(header::AUTHORIZATION, HeaderValue::from_str(&value).unwrap());
    headers
  }

  #[test]
  fn correct_credentials() {
    let identity = identify(&basic("alice", "secret"), &config()).unwrap();
    assert_eq!(identity, Some(Identity::new("alice")));
  }

  #[test]
  fn missing_header_is_anonymous() {
    assert_eq!(identify(&HeaderMap::new(), &config()).unwrap(), None);
  }

  #[test]
  fn wrong_password() {
    assert!(matches!(
      identify(&basic("alice", "wrong"), &config()),
      Err(ApiError::Unauthorized)
    ));
  }

  #[test]
  fn unknown_user() {
    assert!(matches!(
      identify(&basic("mallory", "secret"), &config()),
      Err(ApiError::Unauthorized)
    ));
  }

  #[test]
  fn invalid_base64() {
    let mut headers = HeaderMap::new();
    headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic !!!not-base64!!!"));
    assert!(matches!(identify(&headers, &config()), Err(ApiError::Unauthorized)));
  }

  #[test]
  fn non_basic_scheme() {
    let mut headers = HeaderMap::new();
    headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
    assert!(matches!(identify(&headers, &config()), Err(ApiError::Unauthorized)));
  }
}
