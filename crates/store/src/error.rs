//! Storage-layer error model.

use thiserror::Error;

use autoparts_core::DomainError;

/// Result type used across the storage layer.
pub type StoreResult<T> = Result<T, StoreError>;

/// Storage-layer error.
///
/// Domain failures pass through unchanged (the triggering mutation is rolled
/// back as a unit); storage failures are reported as retryable.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A deterministic domain failure; the transaction was rolled back.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The backing store is unavailable (connectivity loss, poisoned lock).
    /// Retryable.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// The store's statement/transaction timeout elapsed; the mutation was
    /// rolled back in full. Retryable.
    #[error("lock timed out: {0}")]
    LockTimeout(String),
}

impl StoreError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Whether the caller may retry the mutation verbatim.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::LockTimeout(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_failures_are_not_retryable() {
        let err = StoreError::from(DomainError::not_found());
        assert!(!err.is_retryable());
    }

    #[test]
    fn storage_failures_are_retryable() {
        assert!(StoreError::unavailable("connection reset").is_retryable());
        assert!(StoreError::LockTimeout("order row".into()).is_retryable());
    }
}
