//! Who is looking at a post.

use serde::{Deserialize, Serialize};

use crate::post::Post;

/// An authenticated user, identified by display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
  pub display_name: String,
}

impl Identity {
  pub fn new(display_name: impl Into<String>) -> Self {
    Self { display_name: display_name.into() }
  }

  /// Ownership is a display-name match against `post.author`. Two accounts
  /// sharing a display name are indistinguishable here.
  pub fn owns(&self, post: &Post) -> bool { post.author == self.display_name }
}

/// The party requesting a post: either anonymous or an authenticated user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Viewer {
  #[default]
  Anonymous,
  Authenticated(Identity),
}

impl Viewer {
  pub fn is_authenticated(&self) -> bool { matches!(self, Self::Authenticated(_)) }

  pub fn identity(&self) -> Option<&Identity> {
    match self {
      Self::Anonymous => None,
      Self::Authenticated(identity) => Some(identity),
    }
  }

  /// `true` only for an authenticated viewer whose display name matches the
  /// post's author.
  pub fn owns(&self, post: &Post) -> bool {
    self.identity().is_some_and(|identity| identity.owns(post))
  }
}

impl From<Option<Identity>> for Viewer {
  fn from(identity: Option<Identity>) -> Self {
    identity.map_or(Self::Anonymous, Self::Authenticated)
  }
}
