use thiserror::Error;

/// Errors surfaced by a [`crate::PoolStore`] implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The referenced document does not exist.
    #[error("document not found: {0}")]
    NotFound(String),

    /// A precondition (expected status) no longer holds — another actor
    /// already updated the document.
    #[error("precondition failed on {0}: document was already updated")]
    Conflict(String),

    /// Conditional credits decrement found an insufficient balance.
    #[error("insufficient credits: have {available}, need {requested}")]
    InsufficientCredits { available: i64, requested: i64 },

    /// Transient infrastructure failure. Callers may retry.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
