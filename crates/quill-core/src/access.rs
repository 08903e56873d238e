//! Visibility and ownership resolution for a single post.
//!
//! A post is fetched through two channels, in a fixed order: the public
//! channel first, then (for authenticated viewers only) the owner channel.
//! Whatever comes back is classified into a [`Resolution`] that says whether
//! the viewer may see the post and which controls they get.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::{Error, Result, identity::{Identity, Viewer}, post::Post};

// ─── Lookup channels ─────────────────────────────────────────────────────────

/// The two ways a post can be fetched by id.
///
/// Implementations own the authorization policy of each channel; the
/// resolver only decides the order in which they are consulted.
pub trait PostLookup: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Returns the post only if it exists and is shared, regardless of viewer.
  fn public_lookup<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<Option<Post>, Self::Error>> + Send + 'a;

  /// Returns the post only if `identity` is its owner.
  fn authenticated_lookup<'a>(
    &'a self,
    id: &'a str,
    identity: &'a Identity,
  ) -> impl Future<Output = Result<Option<Post>, Self::Error>> + Send + 'a;
}

// ─── Outcome ─────────────────────────────────────────────────────────────────

/// A post the viewer is allowed to see, plus what they may do with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedPost {
  pub post:      Post,
  pub is_owner:  bool,
  pub is_shared: bool,
}

impl ResolvedPost {
  pub fn controls(&self) -> Controls {
    Controls {
      can_edit:         self.is_owner,
      can_delete:       self.is_owner,
      can_toggle_share: self.is_owner,
      can_copy_link:    self.is_shared,
    }
  }
}

/// Result of [`resolve`]. "Does not exist" and "exists but is private to
/// someone else" both map to [`Resolution::NotFound`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
  Found(ResolvedPost),
  NotFound,
}

impl Resolution {
  pub fn is_found(&self) -> bool { matches!(self, Self::Found(_)) }

  pub fn controls(&self) -> Controls {
    match self {
      Self::Found(resolved) => resolved.controls(),
      Self::NotFound => Controls::default(),
    }
  }

  /// Convert into a [`Result`], mapping `NotFound` to
  /// [`Error::NotFoundOrForbidden`].
  pub fn found(self) -> Result<ResolvedPost> {
    match self {
      Self::Found(resolved) => Ok(resolved),
      Self::NotFound => Err(Error::NotFoundOrForbidden),
    }
  }
}

/// Which actions the viewer is offered for a resolved post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Controls {
  pub can_edit:         bool,
  pub can_delete:       bool,
  pub can_toggle_share: bool,
  pub can_copy_link:    bool,
}

// ─── Resolver ────────────────────────────────────────────────────────────────

/// Decide what `viewer` may see of post `id`.
///
/// A channel that fails is treated exactly like a channel that returned
/// nothing. No mutation happens here.
pub async fn resolve<L: PostLookup>(
  lookup: &L,
  id: &str,
  viewer: &Viewer,
) -> Resolution {
  let mut post = absorb(lookup.public_lookup(id).await, "public", id);

  if post.is_none()
    && let Some(identity) = viewer.identity()
  {
    post = absorb(
      lookup.authenticated_lookup(id, identity).await,
      "authenticated",
      id,
    );
  }

  match post {
    Some(post) => Resolution::Found(ResolvedPost {
      is_owner:  viewer.owns(&post),
      is_shared: post.shared,
      post,
    }),
    None => Resolution::NotFound,
  }
}

fn absorb<E: std::error::Error>(
  result: Result<Option<Post>, E>,
  channel: &str,
  id: &str,
) -> Option<Post> {
  result.unwrap_or_else(|e| {
    tracing::debug!(%id, channel, error = %e, "post lookup failed; treating as absent");
    None
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::testing::MemoryStore;
  use crate::store::{PostStore, StoreChannels};
  use crate::post::NewPost;

  fn alice() -> Identity { Identity::new("alice") }
  fn bob() -> Identity { Identity::new("bob") }

  async fn seeded(shared: bool) -> (MemoryStore, String) {
    let store = MemoryStore::default();
    let post = store
      .create_post(&alice(), NewPost::new("Hello", "first words").unwrap())
      .await
      .unwrap();
    if shared {
      assert!(store.set_shared(post.id, &alice(), true).await.unwrap());
    }
    (store, post.id.to_string())
  }

  async fn view(store: &MemoryStore, id: &str, viewer: Viewer) -> Resolution {
    resolve(&StoreChannels::new(store), id, &viewer).await
  }

  // ── Shared posts ──────────────────────────────────────────────────────────

  #[tokio::test]
  async fn shared_post_is_visible_to_everyone() {
    let (store, id) = seeded(true).await;

    let anon = view(&store, &id, Viewer::Anonymous).await.found().unwrap();
    assert!(!anon.is_owner);
    assert!(anon.is_shared);

    let other = view(&store, &id, Viewer::Authenticated(bob())).await.found().unwrap();
    assert!(!other.is_owner);

    let owner = view(&store, &id, Viewer::Authenticated(alice())).await.found().unwrap();
    assert!(owner.is_owner);
  }

  #[tokio::test]
  async fn anonymous_viewer_of_shared_post_gets_no_mutation_controls() {
    let (store, id) = seeded(true).await;
    let resolution = view(&store, &id, Viewer::Anonymous).await;
    assert_eq!(resolution.controls(), Controls {
      can_edit:         false,
      can_delete:       false,
      can_toggle_share: false,
      can_copy_link:    true,
    });
  }

  // ── Private posts ─────────────────────────────────────────────────────────

  #[tokio::test]
  async fn private_post_is_hidden_from_non_owners() {
    let (store, id) = seeded(false).await;
    assert_eq!(view(&store, &id, Viewer::Anonymous).await, Resolution::NotFound);
    assert_eq!(view(&store, &id, Viewer::Authenticated(bob())).await, Resolution::NotFound);
  }

  #[tokio::test]
  async fn private_post_is_visible_to_owner() {
    let (store, id) = seeded(false).await;
    let resolved = view(&store, &id, Viewer::Authenticated(alice())).await.found().unwrap();
    assert!(resolved.is_owner);
    assert!(!resolved.is_shared);
    assert!(resolved.controls().can_toggle_share);
    assert!(!resolved.controls().can_copy_link);
  }

  #[tokio::test]
  async fn unknown_and_malformed_ids_are_not_found() {
    let (store, _) = seeded(true).await;
    let missing = uuid::Uuid::new_v4().to_string();
    assert_eq!(view(&store, &missing, Viewer::Authenticated(alice())).await, Resolution::NotFound);
    assert_eq!(view(&store, "not-a-uuid", Viewer::Authenticated(alice())).await, Resolution::NotFound);
    assert!(matches!(
      Resolution::NotFound.found(),
      Err(Error::NotFoundOrForbidden)
    ));
  }

  // ── Channel ordering and failures ─────────────────────────────────────────

  #[tokio::test]
  async fn anonymous_viewer_never_hits_authenticated_channel() {
    let (store, id) = seeded(false).await;
    store.reset_calls();
    view(&store, &id, Viewer::Anonymous).await;
    assert_eq!(store.calls(), vec!["public"]);
  }

  #[tokio::test]
  async fn shared_post_resolves_without_authenticated_channel() {
    let (store, id) = seeded(true).await;
    store.reset_calls();
    view(&store, &id, Viewer::Authenticated(alice())).await;
    assert_eq!(store.calls(), vec!["public"]);
  }

  #[tokio::test]
  async fn failing_channels_collapse_to_not_found() {
    let (store, id) = seeded(false).await;
    store.fail_reads(true);
    assert_eq!(view(&store, &id, Viewer::Authenticated(alice())).await, Resolution::NotFound);
  }

  #[tokio::test]
  async fn public_failure_still_falls_through_to_owner_channel() {
    let (store, id) = seeded(true).await;
    store.fail_public(true);
    let resolved = view(&store, &id, Viewer::Authenticated(alice())).await.found().unwrap();
    assert!(resolved.is_owner);
  }

  // ── Scenario ──────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn owner_shares_then_other_viewer_can_read() {
    let (store, id) = seeded(false).await;
    let post_id = uuid::Uuid::parse_str(&id).unwrap();

    assert_eq!(view(&store, &id, Viewer::Authenticated(bob())).await, Resolution::NotFound);
    assert!(view(&store, &id, Viewer::Authenticated(alice())).await.found().unwrap().is_owner);

    assert!(store.set_shared(post_id, &alice(), true).await.unwrap());

    let seen_by_bob = view(&store, &id, Viewer::Authenticated(bob())).await.found().unwrap();
    assert!(!seen_by_bob.is_owner);
    assert!(seen_by_bob.is_shared);
  }

  #[test]
  fn controls_serialize_as_flat_flags() {
    let json = serde_json::to_value(Controls::default()).unwrap();
    assert_eq!(json["can_edit"], false);
    assert_eq!(json["can_copy_link"], false);
  }
}
