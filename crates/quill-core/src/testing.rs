//! In-memory [`PostStore`] used by this crate's tests.

use std::sync::Mutex;

use chrono::Utc;
use uuid::Uuid;

use crate::{
  identity::Identity,
  post::{NewPost, Post, PostUpdate},
  store::PostStore,
};

#[derive(Debug, thiserror::Error)]
#[error("injected failure")]
pub struct Injected;

#[derive(Default)]
pub struct MemoryStore {
  posts:       Mutex<Vec<Post>>,
  calls:       Mutex<Vec<&'static str>>,
  fail_public: Mutex<bool>,
  fail_reads:  Mutex<bool>,
}

impl MemoryStore {
  pub fn calls(&self) -> Vec<&'static str> { self.calls.lock().unwrap().clone() }

  pub fn reset_calls(&self) { self.calls.lock().unwrap().clear(); }

  pub fn fail_public(&self, fail: bool) { *self.fail_public.lock().unwrap() = fail; }

  pub fn fail_reads(&self, fail: bool) { *self.fail_reads.lock().unwrap() = fail; }

  fn with_owned<T>(
    &self,
    id: Uuid,
    owner: &Identity,
    f: impl FnOnce(&mut Vec<Post>, usize) -> T,
  ) -> Option<T> {
    let mut posts = self.posts.lock().unwrap();
    let idx = posts.iter().position(|p| p.id == id && owner.owns(p))?;
    Some(f(&mut posts, idx))
  }
}

impl PostStore for MemoryStore {
  type Error = Injected;

  async fn create_post(&self, author: &Identity, input: NewPost) -> Result<Post, Injected> {
    let (title, content) = input.into_parts();
    let post = Post {
      id: Uuid::new_v4(),
      title,
      content,
      author:     author.display_name.clone(),
      created_at: Utc::now(),
      shared:     false,
    };
    self.posts.lock().unwrap().push(post.clone());
    Ok(post)
  }

  async fn update_post(&self, id: Uuid, owner: &Identity, update: PostUpdate) -> Result<bool, Injected> {
    Ok(
      self
        .with_owned(id, owner, |posts, i| {
          (posts[i].title, posts[i].content) = update.into_parts();
        })
        .is_some(),
    )
  }

  async fn set_shared(&self, id: Uuid, owner: &Identity, shared: bool) -> Result<bool, Injected> {
    Ok(self.with_owned(id, owner, |posts, i| posts[i].shared = shared).is_some())
  }

  async fn delete_post(&self, id: Uuid, owner: &Identity) -> Result<bool, Injected> {
    Ok(self.with_owned(id, owner, |posts, i| { posts.remove(i); }).is_some())
  }

  async fn get_shared_post(&self, id: Uuid) -> Result<Option<Post>, Injected> {
    self.calls.lock().unwrap().push("public");
    if *self.fail_public.lock().unwrap() || *self.fail_reads.lock().unwrap() {
      return Err(Injected);
    }
    Ok(self.posts.lock().unwrap().iter().find(|p| p.id == id && p.shared).cloned())
  }

  async fn get_owned_post(&self, id: Uuid, owner: &Identity) -> Result<Option<Post>, Injected> {
    self.calls.lock().unwrap().push("authenticated");
    if *self.fail_reads.lock().unwrap() {
      return Err(Injected);
    }
    Ok(self.posts.lock().unwrap().iter().find(|p| p.id == id && owner.owns(p)).cloned())
  }

  async fn list_posts_by_author(&self, author: &Identity) -> Result<Vec<Post>, Injected> {
    let mut posts: Vec<Post> = self
      .posts
      .lock()
      .unwrap()
      .iter()
      .filter(|p| author.owns(p))
      .cloned()
      .collect();
    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(posts)
  }
}
