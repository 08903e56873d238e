//! Handlers for the caller's own posts.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/posts` | Full list, newest first |
//! | `POST`   | `/posts` | Body: [`PostBody`]; returns 201 + stored post |
//! | `GET`    | `/posts/{id}` | 404 unless the caller owns it |
//! | `PUT`    | `/posts/{id}` | Body: [`PostBody`]; 403 unless owner |
//! | `DELETE` | `/posts/{id}` | 204; 403 unless owner |
//! | `PUT`    | `/posts/{id}/sharing` | Body: `{"shared":true}`; 403 unless owner |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use quill_core::{
  post::{NewPost, Post, PostUpdate},
  store::{PostStore, permitted},
  visibility::{SharingOutcome, Visibility},
};
use serde::Deserialize;

use crate::{AppState, auth::Authenticated, error::ApiError, handlers::parse_post_id};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /posts`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Authenticated(me): Authenticated,
) -> Result<Json<Vec<Post>>, ApiError>
where
  S: PostStore + Clone + 'static,
{
  let posts = state
    .store
    .list_posts_by_author(&me)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(posts))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /posts` and `PUT /posts/{id}`.
#[derive(Debug, Deserialize)]
pub struct PostBody {
  pub title:   String,
  pub content: String,
}

/// `POST /posts`: returns 201 + the stored [`Post`].
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Authenticated(me): Authenticated,
  Json(body): Json<PostBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PostStore + Clone + 'static,
{
  let input = NewPost::new(&body.title, &body.content)?;
  let post = state
    .store
    .create_post(&me, input)
    .await
    .map_err(ApiError::store)?;
  tracing::info!(id = %post.id, author = %me.display_name, "post created");
  Ok((StatusCode::CREATED, Json(post)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /posts/{id}`: the authenticated lookup channel.
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Authenticated(me): Authenticated,
  Path(id): Path<String>,
) -> Result<Json<Post>, ApiError>
where
  S: PostStore + Clone + 'static,
{
  let id = parse_post_id(&id).ok_or(ApiError::NotFound)?;
  let post = state
    .store
    .get_owned_post(id, &me)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::NotFound)?;
  Ok(Json(post))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /posts/{id}`: returns the updated post.
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Authenticated(me): Authenticated,
  Path(id): Path<String>,
  Json(body): Json<PostBody>,
) -> Result<Json<Post>, ApiError>
where
  S: PostStore + Clone + 'static,
{
  let id = parse_post_id(&id).ok_or(ApiError::ActionDenied)?;
  let update = PostUpdate::new(&body.title, &body.content)?;

  let updated = state
    .store
    .update_post(id, &me, update)
    .await
    .map_err(ApiError::store)?;
  permitted(updated).inspect_err(|_| {
    tracing::info!(%id, user = %me.display_name, "edit denied");
  })?;

  // The row may be deleted between the two calls; treat that as gone.
  let post = state
    .store
    .get_owned_post(id, &me)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::NotFound)?;
  Ok(Json(post))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /posts/{id}`
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  Authenticated(me): Authenticated,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError>
where
  S: PostStore + Clone + 'static,
{
  let id = parse_post_id(&id).ok_or(ApiError::ActionDenied)?;
  let deleted = state
    .store
    .delete_post(id, &me)
    .await
    .map_err(ApiError::store)?;
  permitted(deleted).inspect_err(|_| {
    tracing::info!(%id, user = %me.display_name, "delete denied");
  })?;

  tracing::info!(%id, user = %me.display_name, "post deleted");
  Ok(StatusCode::NO_CONTENT)
}

// ─── Sharing ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SharingBody {
  pub shared: bool,
}

/// `PUT /posts/{id}/sharing`: body: `{"shared":true}`.
///
/// Making a post public returns the link readers can use.
pub async fn set_sharing<S>(
  State(state): State<AppState<S>>,
  Authenticated(me): Authenticated,
  Path(id): Path<String>,
  Json(body): Json<SharingBody>,
) -> Result<Json<SharingOutcome>, ApiError>
where
  S: PostStore + Clone + 'static,
{
  let id = parse_post_id(&id).ok_or(ApiError::ActionDenied)?;
  let changed = state
    .store
    .set_shared(id, &me, body.shared)
    .await
    .map_err(ApiError::store)?;
  permitted(changed).inspect_err(|_| {
    tracing::info!(%id, user = %me.display_name, "sharing change denied");
  })?;

  let visibility = Visibility::from(body.shared);
  tracing::info!(%id, ?visibility, "post visibility changed");
  Ok(Json(SharingOutcome::new(id, visibility, &state.config.public_base_url)))
}
