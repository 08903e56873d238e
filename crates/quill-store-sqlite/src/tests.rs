//! Integration tests for `SqliteStore` against an in-memory database.

use quill_core::{
  access::{Resolution, resolve},
  identity::{Identity, Viewer},
  post::{NewPost, PostUpdate},
  store::{PostStore, StoreChannels},
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn alice() -> Identity { Identity::new("alice") }
fn bob() -> Identity { Identity::new("bob") }

fn draft(title: &str) -> NewPost {
  NewPost::new(title, "Some words worth keeping.").unwrap()
}

// ─── Create / read ───────────────────────────────────────────────────────────

#[tokio::test]
async fn create_starts_private_and_owned() {
  let s = store().await;
  let post = s.create_post(&alice(), draft("First")).await.unwrap();

  assert_eq!(post.author, "alice");
  assert!(!post.shared);

  let fetched = s.get_owned_post(post.id, &alice()).await.unwrap();
  assert_eq!(fetched, Some(post.clone()));

  assert!(s.get_shared_post(post.id).await.unwrap().is_none());
  assert!(s.get_owned_post(post.id, &bob()).await.unwrap().is_none());
}

#[tokio::test]
async fn missing_post_reads_as_none() {
  let s = store().await;
  assert!(s.get_shared_post(Uuid::new_v4()).await.unwrap().is_none());
  assert!(s.get_owned_post(Uuid::new_v4(), &alice()).await.unwrap().is_none());
}

#[tokio::test]
async fn list_returns_only_own_posts_newest_first() {
  let s = store().await;
  let first = s.create_post(&alice(), draft("one")).await.unwrap();
  s.create_post(&bob(), draft("not mine")).await.unwrap();
  let second = s.create_post(&alice(), draft("two")).await.unwrap();

  let posts = s.list_posts_by_author(&alice()).await.unwrap();
  let ids: Vec<_> = posts.iter().map(|p| p.id).collect();
  assert_eq!(ids.len(), 2);
  assert!(ids.contains(&first.id) && ids.contains(&second.id));
  assert!(posts[0].created_at >= posts[1].created_at);
}

// ─── Owner-scoped writes ─────────────────────────────────────────────────────

#[tokio::test]
async fn update_by_owner_replaces_fields() {
  let s = store().await;
  let post = s.create_post(&alice(), draft("Before")).await.unwrap();

  let update = PostUpdate::new("After", "New body").unwrap();
  assert!(s.update_post(post.id, &alice(), update).await.unwrap());

  let fetched = s.get_owned_post(post.id, &alice()).await.unwrap().unwrap();
  assert_eq!(fetched.title, "After");
  assert_eq!(fetched.content, "New body");
  assert_eq!(fetched.created_at, post.created_at);
  assert_eq!(fetched.author, "alice");
}

#[tokio::test]
async fn non_owner_writes_fail_and_change_nothing() {
  let s = store().await;
  let post = s.create_post(&alice(), draft("Mine")).await.unwrap();

  let update = PostUpdate::new("Hijacked", "!").unwrap();
  assert!(!s.update_post(post.id, &bob(), update).await.unwrap());
  assert!(!s.set_shared(post.id, &bob(), true).await.unwrap());
  assert!(!s.set_shared(post.id, &bob(), false).await.unwrap());
  assert!(!s.delete_post(post.id, &bob()).await.unwrap());

  let fetched = s.get_owned_post(post.id, &alice()).await.unwrap().unwrap();
  assert_eq!(fetched, post);
}

#[tokio::test]
async fn set_shared_is_idempotent() {
  let s = store().await;
  let post = s.create_post(&alice(), draft("Share me")).await.unwrap();

  assert!(s.set_shared(post.id, &alice(), true).await.unwrap());
  assert!(s.set_shared(post.id, &alice(), true).await.unwrap());
  assert!(s.get_shared_post(post.id).await.unwrap().unwrap().shared);

  assert!(s.set_shared(post.id, &alice(), false).await.unwrap());
  assert!(s.get_shared_post(post.id).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_is_permanent_on_both_channels() {
  let s = store().await;
  let post = s.create_post(&alice(), draft("Doomed")).await.unwrap();
  s.set_shared(post.id, &alice(), true).await.unwrap();

  assert!(s.delete_post(post.id, &alice()).await.unwrap());
  assert!(s.get_shared_post(post.id).await.unwrap().is_none());
  assert!(s.get_owned_post(post.id, &alice()).await.unwrap().is_none());
  assert!(!s.delete_post(post.id, &alice()).await.unwrap());
  assert!(!s.set_shared(post.id, &alice(), false).await.unwrap());
}

// ─── Resolution over the real store ──────────────────────────────────────────

#[tokio::test]
async fn alice_and_bob_scenario() {
  let s = store().await;
  let post = s.create_post(&alice(), draft("p1")).await.unwrap();
  let id = post.id.to_string();
  let as_bob = Viewer::Authenticated(bob());
  let as_alice = Viewer::Authenticated(alice());

  assert_eq!(resolve(&StoreChannels::new(&s), &id, &as_bob).await, Resolution::NotFound);

  let owner_view = resolve(&StoreChannels::new(&s), &id, &as_alice).await.found().unwrap();
  assert!(owner_view.is_owner);
  assert!(!owner_view.is_shared);

  assert!(s.set_shared(post.id, &alice(), true).await.unwrap());

  let bob_view = resolve(&StoreChannels::new(&s), &id, &as_bob).await.found().unwrap();
  assert!(!bob_view.is_owner);
  assert!(bob_view.is_shared);
  assert!(!bob_view.controls().can_delete);
}

#[tokio::test]
async fn anonymous_reads_shared_post_without_controls() {
  let s = store().await;
  let post = s.create_post(&alice(), draft("open")).await.unwrap();
  s.set_shared(post.id, &alice(), true).await.unwrap();

  let resolved = resolve(&StoreChannels::new(&s), &post.id.to_string(), &Viewer::Anonymous)
    .await
    .found()
    .unwrap();
  assert!(!resolved.is_owner);
  let controls = resolved.controls();
  assert!(!controls.can_edit && !controls.can_delete && !controls.can_toggle_share);
}
