//! Error types for draftrun
//!
//! This module defines the error taxonomy shared by the core and its
//! collaborators. We use `thiserror` for automatic `Display` and `Error`
//! trait implementations.
//!
//! | Variant | Meaning | Caller action |
//! |---------|---------|---------------|
//! | `InvalidCriteria` | insufficient or contradictory selection input | fail, never retry |
//! | `NotFound` | expected absence | treat as "nothing yet" |
//! | `Unavailable` | external store/service failure | retry with backoff |
//! | `Conflict` | optimistic-concurrency mismatch | re-fetch and re-merge |
//! | `InvalidInput` | malformed handler input | fail |
//! | `InvalidPayload` | payload lacks a field an operation needs | fail |
//! | `Serialization` | JSON/TOML encode or decode failure | fail |

use thiserror::Error;

/// Result type alias for draftrun operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for draftrun
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Selection criteria cannot identify any run
    #[error("Invalid criteria: {0}")]
    InvalidCriteria(String),

    /// Entity does not exist (yet)
    #[error("Not found: {0}")]
    NotFound(String),

    /// External store or service failed
    #[error("Unavailable: {0}")]
    Unavailable(String),

    /// Concurrent write detected
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Handler input is malformed
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Payload is missing data required by the operation
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Whether the caller may retry the same request later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Unavailable(_) | Error::Conflict(_))
    }

    /// Whether this error represents an expected absence.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
