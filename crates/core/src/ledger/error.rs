//! Ledger error types for validation, lookup, and concurrency failures.

use rust_decimal::Decimal;
use thiserror::Error;

use finledger_shared::error::AppError;
use finledger_shared::types::{Currency, EntryId, MoneyError};

/// Errors that can occur during ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Updating an entry to ACCEPTED status requires a modification cause.
    #[error("Modification cause must be provided when updating the ACCEPTED ledger entry")]
    MissingModificationCause,

    /// A required text field was empty or blank.
    #[error("Field '{0}' must not be blank")]
    BlankField(&'static str),

    /// Money construction or arithmetic failed.
    #[error(transparent)]
    Money(#[from] MoneyError),

    // ========== Lookup Errors ==========
    /// Ledger entry not found.
    #[error("Ledger entry not found: {0}")]
    EntryNotFound(EntryId),

    /// No exchange rate configured for the currency pair. This is a
    /// configuration defect, not a user input error.
    #[error("No exchange rate configured for {from} to {to}")]
    MissingExchangeRate {
        /// Source currency code.
        from: Currency,
        /// Target currency code.
        to: Currency,
    },

    /// Exchange rates must be positive.
    #[error("Exchange rate for {from} to {to} must be positive, got {rate}")]
    InvalidExchangeRate {
        /// Source currency code.
        from: Currency,
        /// Target currency code.
        to: Currency,
        /// The offending rate.
        rate: Decimal,
    },

    // ========== Concurrency Errors ==========
    /// A concurrent writer changed the entry since it was read.
    #[error("Version conflict on entry {id}: expected {expected}, found {actual}")]
    VersionConflict {
        /// The contested entry.
        id: EntryId,
        /// The version the writer targeted.
        expected: i64,
        /// The version currently stored.
        actual: i64,
    },

    // ========== Internal Errors ==========
    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LedgerError {
    /// Returns the stable error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::MissingModificationCause => "MISSING_MODIFICATION_CAUSE",
            Self::BlankField(_) => "BLANK_FIELD",
            Self::Money(MoneyError::CurrencyMismatch { .. }) => "CURRENCY_MISMATCH",
            Self::Money(MoneyError::UnknownCurrency(_)) => "UNKNOWN_CURRENCY",
            Self::Money(_) => "INVALID_AMOUNT",
            Self::EntryNotFound(_) => "ENTRY_NOT_FOUND",
            Self::MissingExchangeRate { .. } => "MISSING_EXCHANGE_RATE",
            Self::InvalidExchangeRate { .. } => "INVALID_EXCHANGE_RATE",
            Self::VersionConflict { .. } => "VERSION_CONFLICT",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - validation errors
            Self::MissingModificationCause | Self::BlankField(_) | Self::Money(_) => 400,

            // 404 Not Found
            Self::EntryNotFound(_) => 404,

            // 409 Conflict - concurrency errors
            Self::VersionConflict { .. } => 409,

            // 500 Internal Server Error - configuration defects included
            Self::MissingExchangeRate { .. }
            | Self::InvalidExchangeRate { .. }
            | Self::Internal(_) => 500,
        }
    }

    /// Returns true if the caller should re-fetch and reapply.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::VersionConflict { .. })
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        Self::new(err.error_code(), err.http_status_code(), err.to_string())
    }
}
