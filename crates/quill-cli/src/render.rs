//! Plain-text rendering of posts for the terminal.

use chrono::{DateTime, Utc};
use quill_core::{
  access::ResolvedPost,
  post::Post,
  stats::{AuthorStats, read_time_minutes},
};

/// `January 5, 2026`
pub fn long_date(dt: DateTime<Utc>) -> String { dt.format("%B %-d, %Y").to_string() }

/// `Jan 5, 2026`
pub fn short_date(dt: DateTime<Utc>) -> String { dt.format("%b %-d, %Y").to_string() }

fn visibility_label(shared: bool) -> &'static str {
  if shared { "public" } else { "private" }
}

/// One line per post, for `quill list`.
pub fn post_row(post: &Post) -> String {
  format!(
    "{}  {:<12}  {:>3} min  {:<7}  {}",
    post.id,
    short_date(post.created_at),
    read_time_minutes(&post.content),
    visibility_label(post.shared),
    post.title,
  )
}

/// Full post with header and the actions available to the viewer.
pub fn post_detail(resolved: &ResolvedPost) -> String {
  let post = &resolved.post;
  let controls = resolved.controls();

  let mut actions = Vec::new();
  if controls.can_edit {
    actions.push("edit");
  }
  if controls.can_delete {
    actions.push("delete");
  }
  if controls.can_toggle_share {
    actions.push(if resolved.is_shared { "make private" } else { "make public" });
  }
  if controls.can_copy_link {
    actions.push("copy link");
  }

  let mut out = format!(
    "{}\nby {} · {} · {} min read · {}\n\n{}\n",
    post.title,
    post.author,
    long_date(post.created_at),
    read_time_minutes(&post.content),
    visibility_label(resolved.is_shared),
    post.content,
  );
  if !actions.is_empty() {
    out.push_str(&format!("\nactions: {}\n", actions.join(", ")));
  }
  out
}

pub fn stats_table(stats: &AuthorStats) -> String {
  format!(
    "total stories   {}\nthis month      {}\npublic          {}\ntotal words     {}\nreading time    {} min\n",
    stats.total_posts, stats.this_month, stats.shared, stats.total_words, stats.total_read_time,
  )
}
