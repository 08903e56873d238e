//! JSON REST API for Quill.
//!
//! Exposes an axum [`Router`] backed by any [`PostStore`]. Every route lives
//! under `/api`:
//!
//! | Method | Path | Auth |
//! |--------|------|------|
//! | `GET`  | `/me`, `/me/stats` | required |
//! | `GET`, `POST` | `/posts` | required |
//! | `GET`, `PUT`, `DELETE` | `/posts/{id}` | required (owner) |
//! | `PUT`  | `/posts/{id}/sharing` | required (owner) |
//! | `GET`  | `/posts/{id}/view` | optional |
//! | `GET`  | `/public/posts/{id}` | none |

pub mod auth;
pub mod coalesce;
pub mod error;
pub mod handlers;

pub use error::ApiError;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, put},
};
use quill_core::{access::Resolution, identity::Viewer, store::PostStore};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use auth::{AuthConfig, UserCredential};
use coalesce::Coalescer;
use handlers::{me, posts, public};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `QUILL_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:            String,
  pub port:            u16,
  pub store_path:      PathBuf,
  /// Origin readers use to open shared posts; share links are built on it.
  pub public_base_url: String,
  #[serde(default)]
  pub users:           Vec<UserCredential>,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Post views currently being resolved, keyed by `(post id, viewer)`.
pub type ViewCoalescer = Coalescer<(String, Viewer), Resolution>;

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: PostStore> {
  pub store:  Arc<S>,
  pub config: Arc<ServerConfig>,
  pub auth:   Arc<AuthConfig>,
  pub views:  Arc<ViewCoalescer>,
}

impl<S: PostStore> AppState<S> {
  pub fn new(store: S, config: ServerConfig) -> Self {
    let auth = AuthConfig { users: config.users.clone() };
    Self {
      store:  Arc::new(store),
      config: Arc::new(config),
      auth:   Arc::new(auth),
      views:  Arc::new(Coalescer::default()),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router, API nested under `/api`.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: PostStore + Clone + 'static,
{
  let api = Router::new()
    // Caller
    .route("/me", get(me::whoami))
    .route("/me/stats", get(me::stats::<S>))
    // Own posts
    .route("/posts", get(posts::list::<S>).post(posts::create::<S>))
    .route(
      "/posts/{id}",
      get(posts::get_one::<S>)
        .put(posts::update::<S>)
        .delete(posts::delete::<S>),
    )
    .route("/posts/{id}/sharing", put(posts::set_sharing::<S>))
    // Readers
    .route("/posts/{id}/view", get(public::view::<S>))
    .route("/public/posts/{id}", get(public::get_shared::<S>));

  Router::new()
    .nest("/api", api)
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
