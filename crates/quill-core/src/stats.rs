//! Reading-time and per-author statistics.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::post::Post;

pub const WORDS_PER_MINUTE: usize = 200;

pub fn word_count(content: &str) -> usize { content.split_whitespace().count() }

/// Estimated minutes to read `content`; never less than one.
pub fn read_time_minutes(content: &str) -> usize {
  word_count(content).div_ceil(WORDS_PER_MINUTE).max(1)
}

/// Aggregate figures over one author's posts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorStats {
  pub total_posts:     usize,
  pub total_words:     usize,
  /// Sum of each post's rounded-up read time.
  pub total_read_time: usize,
  /// Posts created in the same calendar month as `now`.
  pub this_month:      usize,
  pub shared:          usize,
}

impl AuthorStats {
  pub fn compute(posts: &[Post], now: DateTime<Utc>) -> Self {
    posts.iter().fold(Self::default(), |mut acc, post| {
      acc.total_posts += 1;
      acc.total_words += word_count(&post.content);
      acc.total_read_time += read_time_minutes(&post.content);
      if post.created_at.year() == now.year() && post.created_at.month() == now.month() {
        acc.this_month += 1;
      }
      if post.shared {
        acc.shared += 1;
      }
      acc
    })
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;
  use uuid::Uuid;

  use super::*;

  #[test]
  fn words_split_on_any_whitespace() {
    assert_eq!(word_count("  one\ttwo\n\nthree  "), 3);
    assert_eq!(word_count("   "), 0);
  }

  #[test]
  fn read_time_rounds_up_with_a_floor_of_one() {
    assert_eq!(read_time_minutes(""), 1);
    assert_eq!(read_time_minutes(&"w ".repeat(200)), 1);
    assert_eq!(read_time_minutes(&"w ".repeat(201)), 2);
  }

  #[test]
  fn stats_count_this_month_and_shared() {
    let at = |y, m| Utc.with_ymd_and_hms(y, m, 10, 0, 0, 0).unwrap();
    let post = |created_at, shared, content: &str| Post {
      id: Uuid::new_v4(),
      title: "t".into(),
      content: content.into(),
      author: "alice".into(),
      created_at,
      shared,
    };
    let posts = vec![
      post(at(2026, 10), true, "a b c"),
      post(at(2026, 9), false, "d e"),
      post(at(2025, 10), false, &"x ".repeat(450)),
    ];

    let stats = AuthorStats::compute(&posts, at(2026, 10));
    assert_eq!(stats, AuthorStats {
      total_posts:     3,
      total_words:     455,
      total_read_time: 1 + 1 + 3,
      this_month:      1,
      shared:          1,
    });
  }
}
