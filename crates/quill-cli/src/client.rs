//! Async HTTP client wrapping the Quill JSON API.

use anyhow::{Context, Result, anyhow};
use quill_core::{
  access::PostLookup,
  identity::{Identity, Viewer},
  post::Post,
  visibility::SharingOutcome,
};
use reqwest::{Client, StatusCode};
use serde_json::json;
use std::time::Duration;
use uuid::Uuid;

/// Connection settings for the Quill API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  pub username: String,
  pub password: String,
}

/// Async HTTP client for the Quill JSON REST API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!(
      "{}/api{}",
      self.config.base_url.trim_end_matches('/'),
      path
    )
  }

  fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    if self.config.username.is_empty() {
      req
    } else {
      req.basic_auth(&self.config.username, Some(&self.config.password))
    }
  }

  // ── Identity ──────────────────────────────────────────────────────────────

  /// Work out who we are. No configured username means anonymous; a
  /// configured one is checked against `GET /api/me`.
  pub async fn viewer(&self) -> Result<Viewer> {
    if self.config.username.is_empty() {
      return Ok(Viewer::Anonymous);
    }
    let resp = self
      .auth(self.client.get(self.url("/me")))
      .send()
      .await
      .context("GET /me failed")?;

    if resp.status() == StatusCode::UNAUTHORIZED {
      return Err(anyhow!("invalid credentials for {:?}", self.config.username));
    }
    if !resp.status().is_success() {
      return Err(anyhow!("GET /me → {}", resp.status()));
    }
    let identity: Identity = resp.json().await.context("deserialising identity")?;
    Ok(Viewer::Authenticated(identity))
  }

  // ── Posts ─────────────────────────────────────────────────────────────────

  /// `GET /api/posts`: the caller's full list.
  pub async fn list_posts(&self) -> Result<Vec<Post>> {
    let resp = self
      .auth(self.client.get(self.url("/posts")))
      .send()
      .await
      .context("GET /posts failed")?;

    if !resp.status().is_success() {
      return Err(anyhow!("GET /posts → {}", resp.status()));
    }
    resp.json().await.context("deserialising posts")
  }

  /// `POST /api/posts`
  pub async fn create_post(&self, title: &str, content: &str) -> Result<Post> {
    let resp = self
      .auth(self.client.post(self.url("/posts")))
      .json(&json!({ "title": title, "content": content }))
      .send()
      .await
      .context("POST /posts failed")?;

    if !resp.status().is_success() {
      return Err(anyhow!("POST /posts → {}", resp.status()));
    }
    resp.json().await.context("deserialising created post")
  }

  /// `PUT /api/posts/{id}`: `Ok(None)` when the server refuses the edit.
  pub async fn update_post(&self, id: Uuid, title: &str, content: &str) -> Result<Option<Post>> {
    let resp = self
      .auth(self.client.put(self.url(&format!("/posts/{id}"))))
      .json(&json!({ "title": title, "content": content }))
      .send()
      .await
      .with_context(|| format!("PUT /posts/{id} failed"))?;

    match classify(resp.status(), MUTATION_REFUSALS) {
      Reply::Body => {}
      Reply::Refused => return Ok(None),
      Reply::Failed(status) => return Err(anyhow!("PUT /posts/{id} → {status}")),
    }
    resp.json().await.map(Some).context("deserialising updated post")
  }

  /// `DELETE /api/posts/{id}`: `false` when the server refuses.
  pub async fn delete_post(&self, id: Uuid) -> Result<bool> {
    let resp = self
      .auth(self.client.delete(self.url(&format!("/posts/{id}"))))
      .send()
      .await
      .with_context(|| format!("DELETE /posts/{id} failed"))?;

    match classify(resp.status(), MUTATION_REFUSALS) {
      Reply::Body => {}
      Reply::Refused => return Ok(false),
      Reply::Failed(status) => return Err(anyhow!("DELETE /posts/{id} → {status}")),
    }
    Ok(true)
  }

  /// `PUT /api/posts/{id}/sharing`: `Ok(None)` when the server refuses.
  pub async fn set_sharing(&self, id: Uuid, shared: bool) -> Result<Option<SharingOutcome>> {
    let resp = self
      .auth(self.client.put(self.url(&format!("/posts/{id}/sharing"))))
      .json(&json!({ "shared": shared }))
      .send()
      .await
      .with_context(|| format!("PUT /posts/{id}/sharing failed"))?;

    match classify(resp.status(), MUTATION_REFUSALS) {
      Reply::Body => {}
      Reply::Refused => return Ok(None),
      Reply::Failed(status) => return Err(anyhow!("PUT /posts/{id}/sharing → {status}")),
    }
    resp.json().await.map(Some).context("deserialising sharing outcome")
  }

  /// A lookup request; only the authenticated channel carries credentials.
  fn lookup_request(&self, path: &str, authenticated: bool) -> reqwest::RequestBuilder {
    let req = self.client.get(self.url(path));
    if authenticated { self.auth(req) } else { req }
  }

  /// GET a single post; 404 maps to `None`, other failures to an error.
  async fn fetch_optional(&self, path: &str, authenticated: bool) -> reqwest::Result<Option<Post>> {
    let resp = self.lookup_request(path, authenticated).send().await?;
    match classify(resp.status(), LOOKUP_REFUSALS) {
      Reply::Body => resp.json().await.map(Some),
      Reply::Refused => Ok(None),
      Reply::Failed(_) => resp.error_for_status().map(|_| None),
    }
  }
}

/// Statuses a lookup channel reports as "no post".
const LOOKUP_REFUSALS: &[StatusCode] = &[StatusCode::NOT_FOUND];

/// Statuses a mutation reports as "not allowed" rather than as a failure.
const MUTATION_REFUSALS: &[StatusCode] = &[StatusCode::FORBIDDEN, StatusCode::NOT_FOUND];

/// How a response status should be handled.
#[derive(Debug, PartialEq, Eq)]
enum Reply {
  Body,
  Refused,
  Failed(StatusCode),
}

fn classify(status: StatusCode, refusals: &[StatusCode]) -> Reply {
  if status.is_success() {
    Reply::Body
  } else if refusals.contains(&status) {
    Reply::Refused
  } else {
    Reply::Failed(status)
  }
}

/// The two lookup channels, served over HTTP.
///
/// The public channel is always called without credentials; the
/// authenticated channel uses the configured ones.
impl PostLookup for ApiClient {
  type Error = reqwest::Error;

  async fn public_lookup(&self, id: &str) -> reqwest::Result<Option<Post>> {
    self.fetch_optional(&format!("/public/posts/{id}"), false).await
  }

  async fn authenticated_lookup(&self, id: &str, _identity: &Identity) -> reqwest::Result<Option<Post>> {
    self.fetch_optional(&format!("/posts/{id}"), true).await
  }
}
