//! The `PostStore` trait and its adapter onto the resolver's lookup channels.
//!
//! The trait is implemented by storage backends (e.g. `quill-store-sqlite`).
//! Higher layers (`quill-api`) depend on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  Error, Result,
  access::PostLookup,
  identity::Identity,
  post::{NewPost, Post, PostUpdate},
};

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Quill post store backend.
///
/// Every mutation is scoped to an owner: the backend only touches a row whose
/// stored author matches `owner`, and reports `false` otherwise. A missing
/// post and a post owned by someone else produce the same `false`.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait PostStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Persist a new, private post owned by `author`. The id and `created_at`
  /// are assigned by the store.
  fn create_post<'a>(
    &'a self,
    author: &'a Identity,
    input: NewPost,
  ) -> impl Future<Output = Result<Post, Self::Error>> + Send + 'a;

  /// Replace title and content. Returns `false` if the post is missing or
  /// not owned by `owner`.
  fn update_post<'a>(
    &'a self,
    id: Uuid,
    owner: &'a Identity,
    update: PostUpdate,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// Set the `shared` flag. Setting the current value again succeeds.
  fn set_shared<'a>(
    &'a self,
    id: Uuid,
    owner: &'a Identity,
    shared: bool,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// Permanently remove the post.
  fn delete_post<'a>(
    &'a self,
    id: Uuid,
    owner: &'a Identity,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// The public lookup: `Some` only when the post exists and is shared.
  fn get_shared_post(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Post>, Self::Error>> + Send + '_;

  /// The authenticated lookup: `Some` only when `owner` wrote the post.
  fn get_owned_post<'a>(
    &'a self,
    id: Uuid,
    owner: &'a Identity,
  ) -> impl Future<Output = Result<Option<Post>, Self::Error>> + Send + 'a;

  /// Every post written by `author`, newest first.
  fn list_posts_by_author<'a>(
    &'a self,
    author: &'a Identity,
  ) -> impl Future<Output = Result<Vec<Post>, Self::Error>> + Send + 'a;
}

/// Turn a store's boolean mutation result into [`Error::ActionDenied`].
pub fn permitted(success: bool) -> Result<()> {
  if success { Ok(()) } else { Err(Error::ActionDenied) }
}

// ─── Lookup adapter ──────────────────────────────────────────────────────────

/// Exposes a [`PostStore`] as the two lookup channels consumed by
/// [`resolve`](crate::access::resolve).
///
/// Ids that are not valid UUIDs yield `None` on both channels.
pub struct StoreChannels<'s, S> {
  store: &'s S,
}

impl<'s, S: PostStore> StoreChannels<'s, S> {
  pub fn new(store: &'s S) -> Self { Self { store } }
}

impl<S: PostStore> PostLookup for StoreChannels<'_, S> {
  type Error = S::Error;

  async fn public_lookup(&self, id: &str) -> Result<Option<Post>, S::Error> {
    match Uuid::parse_str(id) {
      Ok(id) => self.store.get_shared_post(id).await,
      Err(_) => Ok(None),
    }
  }

  async fn authenticated_lookup(
    &self,
    id: &str,
    identity: &Identity,
  ) -> Result<Option<Post>, S::Error> {
    match Uuid::parse_str(id) {
      Ok(id) => self.store.get_owned_post(id, identity).await,
      Err(_) => Ok(None),
    }
  }
}
