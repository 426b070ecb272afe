//! Error types for the gathering-core crate.
//!
//! Every error here is recoverable. Validation failures and missing ids
//! leave the store untouched; a failed persistence write leaves the
//! in-memory mutation in place and is reported so the caller can warn that
//! durability is at risk.

use gathering_types::{EventId, FieldErrors};

/// Errors returned by event store operations.
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    /// The submitted fields broke one or more rules. Nothing was changed.
    #[error("validation failed: {0}")]
    ValidationFailed(FieldErrors),

    /// No event with the given id exists.
    #[error("event not found: {0}")]
    NotFound(EventId),

    /// A freshly generated id already exists in the store. Retrying the
    /// operation generates a new id.
    #[error("generated id collides with an existing event: {0}")]
    IdCollision(EventId),

    /// The mutation was applied in memory but the snapshot write failed.
    #[error("persistence write failed: {0}")]
    PersistenceWriteFailed(#[source] StorageError),
}

impl EventError {
    /// The per-field report, when this is a validation failure.
    pub const fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::ValidationFailed(errors) => Some(errors),
            _ => None,
        }
    }
}

/// Errors raised by a snapshot storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A filesystem operation failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The snapshot could not be encoded or decoded.
    #[error("snapshot serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backend refused the operation (unavailable, quota exceeded).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}
