//! Domain service orchestrating entry creation and update.
//!
//! This service contains pure transformation logic over in-memory
//! aggregates: it converts money into the reporting currency and enforces
//! cross-cutting invariants. Persisting the result and emitting the
//! pre-mutation history snapshot is the caller's responsibility.

use finledger_shared::types::Currency;

use super::entry::{EntryPatch, EntrySource, EntryStatus, LedgerEntry, NewEntry};
use super::error::LedgerError;
use super::history::HistorySnapshot;
use crate::currency::CurrencyConverter;

/// The sole writer of ledger entry state.
#[derive(Debug, Clone)]
pub struct LedgerDomainService {
    converter: CurrencyConverter,
    base_currency: Currency,
}

impl LedgerDomainService {
    /// Creates a domain service converting into the given base currency.
    #[must_use]
    pub const fn new(converter: CurrencyConverter, base_currency: Currency) -> Self {
        Self {
            converter,
            base_currency,
        }
    }

    /// The currency every entry is normalized into.
    #[must_use]
    pub const fn base_currency(&self) -> Currency {
        self.base_currency
    }

    /// Builds a new entry with its canonical amount set from conversion.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank name, or a lookup error when
    /// the rate table has no pair for the entry's currency.
    pub fn create(&self, new: NewEntry, source: EntrySource) -> Result<LedgerEntry, LedgerError> {
        if new.name.trim().is_empty() {
            return Err(LedgerError::BlankField("name"));
        }

        let canonical = self.converter.convert(&new.money, self.base_currency)?;
        Ok(LedgerEntry::create(new, source, canonical.amount()))
    }

    /// Applies a partial update to an existing entry.
    ///
    /// When the patch requests `ACCEPTED` status, a non-blank modification
    /// cause is required. The patched money (if any) is converted before the
    /// entry applies its status-gated mutation rules.
    ///
    /// # Errors
    ///
    /// Returns `MissingModificationCause` when the gate fails, or a lookup
    /// error when conversion fails. The entry is untouched on error.
    pub fn update(
        &self,
        patch: &EntryPatch,
        entry: &mut LedgerEntry,
        modification_cause: Option<&str>,
    ) -> Result<(), LedgerError> {
        Self::ensure_modification_cause_is_given(patch.status, modification_cause)?;

        let canonical = match patch.money {
            Some(money) => Some(self.converter.convert(&money, self.base_currency)?.amount()),
            None => None,
        };
        entry.update(patch, canonical);
        Ok(())
    }

    /// Captures the pre-mutation state of an entry as a history snapshot,
    /// tagged with the reporting currency.
    #[must_use]
    pub fn history_of(
        &self,
        entry: &LedgerEntry,
        created_by: &str,
        action: &str,
    ) -> HistorySnapshot {
        HistorySnapshot::from_entry(entry, created_by, action, self.base_currency)
    }

    fn ensure_modification_cause_is_given(
        requested_status: Option<EntryStatus>,
        modification_cause: Option<&str>,
    ) -> Result<(), LedgerError> {
        let cause_is_blank = modification_cause.is_none_or(|c| c.trim().is_empty());
        if requested_status == Some(EntryStatus::Accepted) && cause_is_blank {
            return Err(LedgerError::MissingModificationCause);
        }
        Ok(())
    }
}
