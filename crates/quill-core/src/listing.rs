//! Client-side filtering and ordering of an already-fetched post list.

use std::{cmp::Ordering, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, post::Post};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
  #[default]
  Newest,
  Oldest,
  /// Case-insensitive alphabetical by title.
  Title,
}

impl FromStr for SortOrder {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "newest" => Ok(Self::Newest),
      "oldest" => Ok(Self::Oldest),
      "title" => Ok(Self::Title),
      other => Err(Error::Validation(format!("unknown sort order: {other:?}"))),
    }
  }
}

/// Search text plus sort order, applied over a full post list.
#[derive(Debug, Clone, Default)]
pub struct PostQuery {
  /// Case-insensitive substring matched against title or content.
  pub search: Option<String>,
  pub sort:   SortOrder,
}

impl PostQuery {
  pub fn matches(&self, post: &Post) -> bool {
    let Some(needle) = self.search.as_deref().map(str::to_lowercase) else {
      return true;
    };
    post.title.to_lowercase().contains(&needle)
      || post.content.to_lowercase().contains(&needle)
  }

  pub fn apply(&self, posts: &[Post]) -> Vec<Post> {
    let mut out: Vec<Post> =
      posts.iter().filter(|p| self.matches(p)).cloned().collect();
    out.sort_by(|a, b| self.compare(a, b));
    out
  }

  fn compare(&self, a: &Post, b: &Post) -> Ordering {
    match self.sort {
      SortOrder::Newest => b.created_at.cmp(&a.created_at),
      SortOrder::Oldest => a.created_at.cmp(&b.created_at),
      SortOrder::Title => a
        .title
        .to_lowercase()
        .cmp(&b.title.to_lowercase())
        .then_with(|| a.title.cmp(&b.title)),
    }
  }
}
