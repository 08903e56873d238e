//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings so that lexical
//! order equals chronological order. UUIDs are stored as hyphenated
//! lowercase strings.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use quill_core::post::Post;
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

/// Truncate to the precision we persist, so a freshly created post compares
/// equal to the same post read back.
pub fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(6) }

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const POST_COLUMNS: &str = "post_id, title, content, author, created_at, shared";

/// Raw values read directly from a `posts` row, in [`POST_COLUMNS`] order.
pub struct RawPost {
  pub post_id:    String,
  pub title:      String,
  pub content:    String,
  pub author:     String,
  pub created_at: String,
  pub shared:     bool,
}

impl RawPost {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      post_id:    row.get(0)?,
      title:      row.get(1)?,
      content:    row.get(2)?,
      author:     row.get(3)?,
      created_at: row.get(4)?,
      shared:     row.get(5)?,
    })
  }

  pub fn into_post(self) -> Result<Post> {
    Ok(Post {
      id:         decode_uuid(&self.post_id)?,
      title:      self.title,
      content:    self.content,
      author:     self.author,
      created_at: decode_dt(&self.created_at)?,
      shared:     self.shared,
    })
  }
}
