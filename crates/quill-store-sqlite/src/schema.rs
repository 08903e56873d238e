//! SQL schema for the Quill SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS posts (
    post_id     TEXT PRIMARY KEY,
    title       TEXT NOT NULL,
    content     TEXT NOT NULL,
    author      TEXT NOT NULL,   -- owner display name; never updated
    created_at  TEXT NOT NULL,   -- RFC 3339 UTC, fixed-width microseconds
    shared      INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS posts_author_idx ON posts(author, created_at);

PRAGMA user_version = 1;
";
