//! Append-only audit history of ledger entry mutations.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use finledger_shared::types::{Currency, EntryId, HistoryId, Money};

use super::entry::{Category, EntryStatus, LedgerEntry, Reference};

/// Well-known audit actions with their human-readable descriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryAction {
    /// A new entry was created.
    Created,
    /// A draft entry was accepted.
    DraftAccepted,
}

impl HistoryAction {
    /// The description stored in the history record.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "The new ledger entry was created",
            Self::DraftAccepted => "The draft ledger entry was accepted",
        }
    }
}

impl std::fmt::Display for HistoryAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable record of an entry's state *before* a mutation.
///
/// One snapshot is appended per mutated entry per mutation event. Snapshots
/// are cascade-deleted with the entry they describe and never modified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySnapshot {
    /// Snapshot identity.
    pub id: HistoryId,
    /// The entry this snapshot describes.
    pub entry_id: EntryId,
    /// When the snapshot was recorded.
    pub created_at: DateTime<Utc>,
    /// The actor who caused the mutation.
    pub created_by: String,
    /// Entry name at snapshot time.
    pub entry_name: String,
    /// Settlement date at snapshot time.
    pub settle_date: NaiveDate,
    /// Original-currency value at snapshot time.
    pub original_money: Money,
    /// Reporting-currency value at snapshot time.
    pub canonical_money: Money,
    /// What happened: an action description or a free-text cause.
    pub action: String,
    /// Status at snapshot time.
    pub status: EntryStatus,
    /// Tags at snapshot time.
    pub tags: HashSet<String>,
    /// Notes at snapshot time.
    pub notes: Option<String>,
    /// Category at snapshot time.
    pub category: Category,
    /// Reference at snapshot time.
    pub reference: Option<Reference>,
}

impl HistorySnapshot {
    /// Captures the current state of an entry, typically taken just before
    /// a mutation is applied.
    #[must_use]
    pub fn from_entry(
        entry: &LedgerEntry,
        created_by: impl Into<String>,
        action: impl Into<String>,
        base_currency: Currency,
    ) -> Self {
        Self {
            id: HistoryId::new(),
            entry_id: entry.id,
            created_at: Utc::now(),
            created_by: created_by.into(),
            entry_name: entry.name.clone(),
            settle_date: entry.settle_date,
            original_money: entry.money,
            canonical_money: Money::new(entry.canonical_amount, base_currency),
            action: action.into(),
            status: entry.status,
            tags: entry.tags.clone(),
            notes: entry.notes.clone(),
            category: entry.category,
            reference: entry.reference.clone(),
        }
    }
}
