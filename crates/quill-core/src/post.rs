//! Post types, the single stored entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// A stored blog post.
///
/// `author` is fixed at creation. `shared` controls whether the post is
/// readable through the public lookup channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
  pub id:         Uuid,
  pub title:      String,
  pub content:    String,
  pub author:     String,
  pub created_at: DateTime<Utc>,
  pub shared:     bool,
}

/// Input for [`PostStore::create_post`](crate::store::PostStore::create_post).
///
/// Construct through [`NewPost::new`], which trims both fields and rejects
/// empty ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
  title:   String,
  content: String,
}

impl NewPost {
  pub fn new(title: &str, content: &str) -> Result<Self> {
    let (title, content) = validate(title, content)?;
    Ok(Self { title, content })
  }

  pub fn title(&self) -> &str { &self.title }

  pub fn content(&self) -> &str { &self.content }

  /// Consume into `(title, content)`.
  pub fn into_parts(self) -> (String, String) { (self.title, self.content) }
}

/// A full replacement of a post's title and content. Last writer wins.
///
/// Like [`NewPost`], only obtainable through the validating constructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostUpdate {
  title:   String,
  content: String,
}

impl PostUpdate {
  pub fn new(title: &str, content: &str) -> Result<Self> {
    let (title, content) = validate(title, content)?;
    Ok(Self { title, content })
  }

  pub fn title(&self) -> &str { &self.title }

  pub fn content(&self) -> &str { &self.content }

  /// Consume into `(title, content)`.
  pub fn into_parts(self) -> (String, String) { (self.title, self.content) }
}

fn validate(title: &str, content: &str) -> Result<(String, String)> {
  let title = title.trim();
  let content = content.trim();
  if title.is_empty() || content.is_empty() {
    return Err(Error::Validation(
      "both title and content are required".to_string(),
    ));
  }
  Ok((title.to_owned(), content.to_owned()))
}
