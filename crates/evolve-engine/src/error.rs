//! Evolution engine error types.

use thiserror::Error;

/// Errors that can occur during engine operations.
///
/// The pure paths (extraction, normalization, merge) never produce these;
/// they cover the external seams: storage and the LLM responder.
#[derive(Debug, Error)]
pub enum EvolveError {
    /// Storage error
    #[error("Storage error: {0}")]
    Storage(#[from] evolve_storage::StorageError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The LLM responder failed
    #[error("Responder error: {0}")]
    Responder(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
