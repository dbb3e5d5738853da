//! # bookrec common library
//!
//! Shared code for the bookrec service crates:
//! - Error types
//! - Bootstrap configuration loading
//! - Read-only recommendation artifacts (popularity, pivot, metadata, similarity)

pub mod artifacts;
pub mod config;
pub mod error;

pub use artifacts::ArtifactStore;
pub use error::{Error, Result};
