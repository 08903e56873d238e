//! [`SqliteStore`]: the SQLite implementation of [`PostStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use quill_core::{
  identity::Identity,
  post::{NewPost, Post, PostUpdate},
  store::PostStore,
};

use crate::{
  Result,
  encode::{POST_COLUMNS, RawPost, encode_dt, encode_uuid, now},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Quill post store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run an owner-scoped write and report whether a row matched.
  ///
  /// `sql` must bind the post id as `?1` and the owner as `?2`; `extra` is
  /// bound from `?3` onwards.
  async fn owned_write(
    &self,
    sql: &'static str,
    id: Uuid,
    owner: &Identity,
    extra: Vec<rusqlite::types::Value>,
  ) -> Result<bool> {
    let id_str = encode_uuid(id);
    let owner_str = owner.display_name.clone();

    let changed = self
      .conn
      .call(move |conn| {
        let mut params: Vec<rusqlite::types::Value> =
          vec![id_str.into(), owner_str.into()];
        params.extend(extra);
        Ok(conn.execute(sql, rusqlite::params_from_iter(params))?)
      })
      .await?;

    if changed == 0 {
      tracing::debug!(%id, owner = %owner.display_name, "owner-scoped write matched no post");
    }
    Ok(changed > 0)
  }

  /// Fetch at most one post matching `filter` (a `WHERE` clause).
  async fn query_one(
    &self,
    filter: &'static str,
    params: Vec<String>,
  ) -> Result<Option<Post>> {
    let raw: Option<RawPost> = self
      .conn
      .call(move |conn| {
        let sql = format!("SELECT {POST_COLUMNS} FROM posts {filter}");
        Ok(
          conn
            .query_row(&sql, rusqlite::params_from_iter(params), RawPost::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPost::into_post).transpose()
  }
}

// ─── PostStore impl ──────────────────────────────────────────────────────────

impl PostStore for SqliteStore {
  type Error = crate::Error;

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn create_post(&self, author: &Identity, input: NewPost) -> Result<Post> {
    let (title, content) = input.into_parts();
    let post = Post {
      id: Uuid::new_v4(),
      title,
      content,
      author:     author.display_name.clone(),
      created_at: now(),
      shared:     false,
    };

    let id_str  = encode_uuid(post.id);
    let title   = post.title.clone();
    let content = post.content.clone();
    let author  = post.author.clone();
    let at_str  = encode_dt(post.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO posts (post_id, title, content, author, created_at, shared)
           VALUES (?1, ?2, ?3, ?4, ?5, 0)",
          rusqlite::params![id_str, title, content, author, at_str],
        )?;
        Ok(())
      })
      .await?;

    tracing::debug!(id = %post.id, author = %post.author, "created post");
    Ok(post)
  }

  async fn update_post(
    &self,
    id:     Uuid,
    owner:  &Identity,
    update: PostUpdate,
  ) -> Result<bool> {
    let (title, content) = update.into_parts();
    self
      .owned_write(
        "UPDATE posts SET title = ?3, content = ?4 WHERE post_id = ?1 AND author = ?2",
        id,
        owner,
        vec![title.into(), content.into()],
      )
      .await
  }

  async fn set_shared(&self, id: Uuid, owner: &Identity, shared: bool) -> Result<bool> {
    // SQLite counts matched rows, so re-setting the current value still
    // reports success.
    self
      .owned_write(
        "UPDATE posts SET shared = ?3 WHERE post_id = ?1 AND author = ?2",
        id,
        owner,
        vec![i64::from(shared).into()],
      )
      .await
  }

  async fn delete_post(&self, id: Uuid, owner: &Identity) -> Result<bool> {
    self
      .owned_write(
        "DELETE FROM posts WHERE post_id = ?1 AND author = ?2",
        id,
        owner,
        Vec::new(),
      )
      .await
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn get_shared_post(&self, id: Uuid) -> Result<Option<Post>> {
    self
      .query_one(
        "WHERE post_id = ?1 AND shared = 1",
        vec![encode_uuid(id)],
      )
      .await
  }

  async fn get_owned_post(&self, id: Uuid, owner: &Identity) -> Result<Option<Post>> {
    self
      .query_one(
        "WHERE post_id = ?1 AND author = ?2",
        vec![encode_uuid(id), owner.display_name.clone()],
      )
      .await
  }

  async fn list_posts_by_author(&self, author: &Identity) -> Result<Vec<Post>> {
    let author_str = author.display_name.clone();

    let raws: Vec<RawPost> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {POST_COLUMNS} FROM posts WHERE author = ?1 ORDER BY created_at DESC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![author_str], RawPost::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPost::into_post).collect()
  }
}
