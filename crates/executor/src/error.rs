//! Error types for command execution.
//!
//! All errors from command execution are represented by the [`Error`] enum.
//! These errors are:
//! - **Structured**: Each variant has typed fields for error details
//! - **Serializable**: Can be converted to/from JSON
//! - **Lossless**: Every core error maps onto exactly one variant

use serde::{Deserialize, Serialize};

/// Command execution errors.
///
/// # Categories
///
/// | Category | Variants | Caller action |
/// |----------|----------|---------------|
/// | Criteria | `InvalidCriteria` | fix the request |
/// | Absence | `NotFound` | treat as "nothing yet" |
/// | Transient | `Unavailable`, `Conflict` | retry (re-fetch first on conflict) |
/// | Validation | `InvalidInput`, `InvalidPayload` | fix the request or data |
/// | System | `Serialization`, `Unsupported` | fail |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
pub enum Error {
    /// Criteria cannot identify a run
    #[error("invalid criteria: {reason}")]
    InvalidCriteria { reason: String },

    /// Entity absent
    #[error("not found: {entity}")]
    NotFound { entity: String },

    /// External store or service failed
    #[error("unavailable: {reason}")]
    Unavailable { reason: String },

    /// Optimistic-concurrency mismatch
    #[error("conflict: {reason}")]
    Conflict { reason: String },

    /// Malformed request
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    /// Payload lacks data the operation needs
    #[error("invalid payload: {reason}")]
    InvalidPayload { reason: String },

    /// Encode/decode failure
    #[error("serialization error: {reason}")]
    Serialization { reason: String },

    /// The configured collaborators cannot perform the operation
    #[error("unsupported: {reason}")]
    Unsupported { reason: String },
}

impl Error {
    /// Whether the same command may succeed if retried later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Unavailable { .. } | Error::Conflict { .. })
    }
}
