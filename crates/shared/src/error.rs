//! Application-wide error types.
//!
//! Domain crates define their own error enums; this module provides the
//! structured form surfaced to callers (stable code, HTTP status, message)
//! and the correlation wrapper that ties retries of the same causal chain
//! to one identifier.

use uuid::Uuid;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// A structured application error with a stable code and correlation id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppError {
    /// Correlation identifier shared by every error in one causal chain.
    pub correlation_id: Uuid,
    /// Stable machine-readable error code.
    pub code: &'static str,
    /// HTTP status the transport layer should map this to.
    pub status: u16,
    /// Human-readable message.
    pub message: String,
}

impl AppError {
    /// Creates an error with a fresh correlation id.
    #[must_use]
    pub fn new(code: &'static str, status: u16, message: impl Into<String>) -> Self {
        Self {
            correlation_id: Uuid::new_v4(),
            code,
            status,
            message: message.into(),
        }
    }

    /// Creates a validation error (400).
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", 400, message)
    }

    /// Creates a not-found error (404).
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", 404, message)
    }

    /// Creates a conflict error (409). Conflicts are retryable by the caller.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new("CONFLICT", 409, message)
    }

    /// Creates an internal error (500).
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", 500, message)
    }

    /// Rebinds this error to the correlation id of an earlier error in the
    /// same causal chain (e.g. a retry of a failed update).
    #[must_use]
    pub fn correlated_with(mut self, correlation_id: Uuid) -> Self {
        self.correlation_id = correlation_id;
        self
    }

    /// Returns true if the caller may re-fetch and reapply the operation.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.status == 409
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}][{}]: {}",
            self.correlation_id, self.code, self.message
        )
    }
}

impl std::error::Error for AppError {}
