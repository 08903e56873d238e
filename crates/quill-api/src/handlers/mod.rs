//! Route handlers, grouped by resource.

pub mod me;
pub mod posts;
pub mod public;

use uuid::Uuid;

/// Post ids arrive as opaque path segments; anything that is not a UUID
/// simply matches no post.
pub(crate) fn parse_post_id(raw: &str) -> Option<Uuid> { Uuid::parse_str(raw).ok() }
