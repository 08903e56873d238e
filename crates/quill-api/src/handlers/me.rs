//! Handlers describing the authenticated caller.

use axum::{Json, extract::State};
use chrono::Utc;
use quill_core::{identity::Identity, stats::AuthorStats, store::PostStore};

use crate::{AppState, auth::Authenticated, error::ApiError};

/// `GET /me`
pub async fn whoami(Authenticated(me): Authenticated) -> Json<Identity> { Json(me) }

/// `GET /me/stats`: figures over every post the caller owns.
pub async fn stats<S>(
  State(state): State<AppState<S>>,
  Authenticated(me): Authenticated,
) -> Result<Json<AuthorStats>, ApiError>
where
  S: PostStore + Clone + 'static,
{
  let posts = state
    .store
    .list_posts_by_author(&me)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(AuthorStats::compute(&posts, Utc::now())))
}
