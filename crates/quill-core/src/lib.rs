//! Core types and trait definitions for the Quill blogging service.
//!
//! This crate has no HTTP or database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod access;
pub mod error;
pub mod identity;
pub mod listing;
pub mod post;
pub mod stats;
pub mod store;
pub mod visibility;

#[cfg(test)]
mod testing;

pub use error::{Error, Result};
