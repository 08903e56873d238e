//! Error types for `quill-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The post does not exist, or it exists but the viewer may not read it.
  /// The two cases are deliberately indistinguishable.
  #[error("post not found")]
  NotFoundOrForbidden,

  /// A mutation was attempted by someone other than the owner, or against a
  /// post that no longer exists.
  #[error("action denied")]
  ActionDenied,

  #[error("invalid input: {0}")]
  Validation(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
