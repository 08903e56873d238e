//! The per-post visibility state machine.
//!
//! `Private ⇄ Public`, driven only by the owner. Deletion is terminal and is
//! modelled by the post disappearing from the store, not by a state here.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
  Private,
  Public,
}

impl Visibility {
  pub fn is_shared(self) -> bool { matches!(self, Self::Public) }

  pub fn toggled(self) -> Self {
    match self {
      Self::Private => Self::Public,
      Self::Public => Self::Private,
    }
  }
}

impl From<bool> for Visibility {
  fn from(shared: bool) -> Self {
    if shared { Self::Public } else { Self::Private }
  }
}

/// What a successful share toggle reports back to the owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharingOutcome {
  pub id:         Uuid,
  pub visibility: Visibility,
  /// Present only when the post just became public.
  pub share_url:  Option<String>,
}

impl SharingOutcome {
  pub fn new(id: Uuid, visibility: Visibility, public_base_url: &str) -> Self {
    let share_url = visibility
      .is_shared()
      .then(|| share_url(public_base_url, id));
    Self { id, visibility, share_url }
  }
}

/// The reader-facing link for a post: `{base}/blog/{id}`.
pub fn share_url(public_base_url: &str, id: Uuid) -> String {
  format!("{}/blog/{id}", public_base_url.trim_end_matches('/'))
}
