//! Reader-facing handlers: the public lookup channel and resolved views.

use axum::{
  Json,
  extract::{Path, State},
};
use quill_core::{
  access::{Controls, ResolvedPost, resolve},
  post::Post,
  store::{PostStore, StoreChannels},
};
use serde::{Deserialize, Serialize};

use crate::{AppState, auth::CurrentViewer, error::ApiError, handlers::parse_post_id};

/// `GET /public/posts/{id}`: 404 unless the post is shared.
pub async fn get_shared<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<String>,
) -> Result<Json<Post>, ApiError>
where
  S: PostStore + Clone + 'static,
{
  let id = parse_post_id(&id).ok_or(ApiError::NotFound)?;
  let post = state
    .store
    .get_shared_post(id)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::NotFound)?;
  Ok(Json(post))
}

/// What a viewer gets back from `GET /posts/{id}/view`.
#[derive(Debug, Serialize, Deserialize)]
pub struct PostView {
  pub post:      Post,
  pub is_owner:  bool,
  pub is_shared: bool,
  pub controls:  Controls,
}

impl From<ResolvedPost> for PostView {
  fn from(resolved: ResolvedPost) -> Self {
    let controls = resolved.controls();
    Self {
      post: resolved.post,
      is_owner: resolved.is_owner,
      is_shared: resolved.is_shared,
      controls,
    }
  }
}

/// `GET /posts/{id}/view`: resolve the post for whoever is asking.
///
/// Anonymous callers are allowed. Identical concurrent requests share one
/// resolution.
pub async fn view<S>(
  State(state): State<AppState<S>>,
  CurrentViewer(viewer): CurrentViewer,
  Path(id): Path<String>,
) -> Result<Json<PostView>, ApiError>
where
  S: PostStore + Clone + 'static,
{
  let key = (id.clone(), viewer.clone());
  let store = state.store.clone();

  let resolution = state
    .views
    .run(key, || async move {
      resolve(&StoreChannels::new(store.as_ref()), &id, &viewer).await
    })
    .await;

  Ok(Json(PostView::from(resolution.found()?)))
}
