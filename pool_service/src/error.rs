use pool_store::StoreError;
use thiserror::Error;

use crate::state::TransitionError;

/// Failure taxonomy for every core operation. Each variant maps to a
/// distinct HTTP status and a human-readable message at the API boundary;
/// none of them leaves partial state behind.
#[derive(Debug, Error)]
pub enum PoolError {
    /// User-correctable input problem. Never retried automatically.
    #[error("{0}")]
    Validation(String),

    /// A referenced document is absent.
    #[error("{0}")]
    NotFound(String),

    /// Another actor already transitioned the request.
    #[error("{0} — the request was already updated, please refresh")]
    ConcurrencyConflict(String),

    /// The acting party is not allowed to perform this transition.
    #[error("{0}")]
    Unauthorized(String),

    /// Transient infrastructure failure; the caller may retry.
    #[error("a dependency failed: {0}")]
    Dependency(String),
}

impl From<StoreError> for PoolError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(doc) => PoolError::NotFound(format!("{doc} not found")),
            StoreError::Conflict(doc) => PoolError::ConcurrencyConflict(format!("{doc} changed")),
            StoreError::InsufficientCredits {
                available,
                requested,
            } => PoolError::Validation(format!(
                "insufficient credits: have {available}, need {requested}"
            )),
            StoreError::Unavailable(detail) => PoolError::Dependency(detail),
        }
    }
}

impl From<TransitionError> for PoolError {
    fn from(err: TransitionError) -> Self {
        match err {
            TransitionError::WrongParty { .. } => PoolError::Unauthorized(err.to_string()),
            TransitionError::Illegal { .. } => PoolError::ConcurrencyConflict(err.to_string()),
        }
    }
}
