//! `quill`: command-line client for the Quill blogging API.
//!
//! # Usage
//!
//! ```
//! quill --url http://localhost:8080 --user alice --password secret list --sort title
//! quill --config ~/.config/quill/config.toml show <id>
//! ```

mod client;
mod render;

use std::io::{BufRead, Read as _, Write};

use anyhow::{Context, Result, anyhow, bail};
use chrono::Utc;
use clap::{Parser, Subcommand};
use client::{ApiClient, ApiConfig};
use quill_core::{
  access::{ResolvedPost, resolve},
  identity::Viewer,
  listing::{PostQuery, SortOrder},
  stats::AuthorStats,
  visibility::Visibility,
};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "quill", about = "Command-line client for the Quill blogging API")]
struct Args {
  /// Path to a TOML config file (url, username, password).
  #[arg(short, long, value_name = "FILE")]
  config: Option<std::path::PathBuf>,

  /// Base URL of the quill server (default: http://localhost:8080).
  #[arg(long, env = "QUILL_URL")]
  url: Option<String>,

  /// API username. Leave unset to browse shared posts anonymously.
  #[arg(long, env = "QUILL_USER")]
  user: Option<String>,

  /// API password (plaintext).
  #[arg(long, env = "QUILL_PASSWORD")]
  password: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Show the identity the server sees.
  Whoami,
  /// List your posts, optionally filtered and sorted.
  List {
    /// Case-insensitive text to look for in titles and content.
    #[arg(short, long)]
    search: Option<String>,
    /// newest, oldest or title.
    #[arg(long, default_value = "newest")]
    sort:   SortOrder,
  },
  /// Show a post, if you are allowed to see it.
  Show { id: String },
  /// Write a new post. Use `-` as content to read it from stdin.
  New {
    #[arg(short, long)]
    title:   String,
    #[arg(short, long)]
    content: String,
  },
  /// Edit one of your posts. Omitted fields keep their current value.
  Edit {
    id:      String,
    #[arg(short, long)]
    title:   Option<String>,
    #[arg(short, long)]
    content: Option<String>,
  },
  /// Delete one of your posts. There is no undo.
  Delete {
    id:  String,
    /// Skip the confirmation prompt.
    #[arg(short, long)]
    yes: bool,
  },
  /// Flip one of your posts between private and public.
  ToggleShare { id: String },
  /// Totals over your posts.
  Stats,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:      String,
  #[serde(default)]
  username: String,
  #[serde(default)]
  password: String,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  // Load config file if provided.
  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let api_config = ApiConfig {
    base_url: args
      .url
      .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
      .unwrap_or_else(|| "http://localhost:8080".to_string()),
    username: args
      .user
      .or_else(|| (!file_cfg.username.is_empty()).then(|| file_cfg.username.clone()))
      .unwrap_or_default(),
    password: args
      .password
      .or_else(|| (!file_cfg.password.is_empty()).then(|| file_cfg.password.clone()))
      .unwrap_or_default(),
  };

  let client = ApiClient::new(api_config)?;
  run(&client, args.command).await
}

// ─── Commands ─────────────────────────────────────────────────────────────────

async fn run(client: &ApiClient, command: Command) -> Result<()> {
  match command {
    Command::Whoami => match client.viewer().await? {
      Viewer::Anonymous => println!("anonymous"),
      Viewer::Authenticated(identity) => println!("{}", identity.display_name),
    },

    Command::List { search, sort } => {
      let posts = client.list_posts().await?;
      let query = PostQuery { search, sort };
      let shown = query.apply(&posts);
      for post in &shown {
        println!("{}", render::post_row(post));
      }
      println!("\n{} of {} stories", shown.len(), posts.len());
    }

    Command::Show { id } => {
      let resolved = open(client, &id).await?;
      print!("{}", render::post_detail(&resolved));
    }

    Command::New { title, content } => {
      let content = if content == "-" { read_stdin()? } else { content };
      let post = client.create_post(&title, &content).await?;
      println!("created {} (private)", post.id);
    }

    Command::Edit { id, title, content } => {
      let resolved = open(client, &id).await?;
      if !resolved.controls().can_edit {
        bail!("only the author can edit this story");
      }
      let title = title.unwrap_or_else(|| resolved.post.title.clone());
      let content = match content.as_deref() {
        Some("-") => read_stdin()?,
        Some(c) => c.to_string(),
        None => resolved.post.content.clone(),
      };
      client
        .update_post(resolved.post.id, &title, &content)
        .await?
        .ok_or_else(|| anyhow!("failed to update story"))?;
      println!("updated {}", resolved.post.id);
    }

    Command::Delete { id, yes } => {
      let resolved = open(client, &id).await?;
      if !resolved.controls().can_delete {
        bail!("only the author can delete this story");
      }
      if !yes
        && !confirm(
          &format!("delete \"{}\"? this cannot be undone", resolved.post.title),
          std::io::stdin().lock(),
          std::io::stderr(),
        )?
      {
        println!("kept {}", resolved.post.id);
        return Ok(());
      }
      if !client.delete_post(resolved.post.id).await? {
        bail!("failed to delete story");
      }
      println!("deleted {}", resolved.post.id);
    }

    Command::ToggleShare { id } => {
      let resolved = open(client, &id).await?;
      if !resolved.controls().can_toggle_share {
        bail!("only the author can change who sees this story");
      }
      let next = Visibility::from(resolved.is_shared).toggled();
      let outcome = client
        .set_sharing(resolved.post.id, next.is_shared())
        .await?
        .ok_or_else(|| anyhow!("failed to update share status"))?;
      match outcome.share_url {
        Some(url) => println!("story is now public: {url}"),
        None => println!("story is now private"),
      }
    }

    Command::Stats => {
      let posts = client.list_posts().await?;
      print!("{}", render::stats_table(&AuthorStats::compute(&posts, Utc::now())));
    }
  }
  Ok(())
}

/// Resolve `id` for the current viewer, failing with a generic not-found
/// message when it is hidden or missing.
async fn open(client: &ApiClient, id: &str) -> Result<ResolvedPost> {
  // Validate locally so a typo does not cost two round trips.
  if Uuid::parse_str(id).is_err() {
    bail!("story not found");
  }
  let viewer = client.viewer().await?;
  resolve(client, id, &viewer)
    .await
    .found()
    .map_err(|_| anyhow!("story not found"))
}

/// Ask a yes/no question on `output`; anything but an explicit yes is a no.
fn confirm(question: &str, mut input: impl BufRead, mut output: impl Write) -> Result<bool> {
  write!(output, "{question} [y/N] ")?;
  output.flush()?;
  let mut answer = String::new();
  input.read_line(&mut answer).context("reading confirmation")?;
  Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
  matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn read_stdin() -> Result<String> {
  let mut buf = String::new();
  std::io::stdin()
    .read_to_string(&mut buf)
    .context("reading stdin")?;
  Ok(buf)
}
