//! Common error types for bookrec

use thiserror::Error;

/// Common result type for bookrec operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across bookrec crates
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Artifact file missing or unreadable
    #[error("Artifact error: {0}")]
    Artifact(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),
}
