//! Ledger entry aggregate and its two-state lifecycle.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use finledger_shared::types::{EntryId, Money};

/// Lifecycle status of a ledger entry.
///
/// There are exactly two states; accepting a draft is a status write, not a
/// distinct type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryStatus {
    /// Entry is still being composed and may be freely reshaped.
    Draft,
    /// Entry is finalized; destructive edits are disallowed to preserve
    /// audit integrity.
    Accepted,
}

impl EntryStatus {
    /// Returns true if the entry is still a draft.
    #[must_use]
    pub fn is_draft(self) -> bool {
        matches!(self, Self::Draft)
    }

    /// Returns true if the entry has been accepted.
    #[must_use]
    pub fn is_accepted(self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// Business category of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    /// Payroll and staff costs.
    Employees,
    /// Holiday home rentals.
    HolidayHomes,
    /// Tours and travel packages.
    ToursAndTravel,
    /// General operations.
    Operations,
}

/// How the entry was created. Set once at creation, never changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntrySource {
    /// Entered by a user.
    Manual,
    /// Created by an upstream system batch.
    System,
}

/// Link from a ledger entry to the business transaction it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reference {
    /// External identifier of the referenced transaction.
    pub id: String,
    /// Kind of the referenced transaction (e.g. ATTRACTION, STAY).
    #[serde(rename = "type")]
    pub kind: String,
    /// Optional business-level identifier.
    pub business_id: Option<String>,
}

/// Input for creating a new ledger entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEntry {
    /// Initial lifecycle status.
    pub status: EntryStatus,
    /// Entry name.
    pub name: String,
    /// Business category.
    pub category: Category,
    /// Settlement date.
    pub settle_date: chrono::NaiveDate,
    /// Monetary value in its original currency.
    pub money: Money,
    /// Optional free-text notes.
    pub notes: Option<String>,
    /// Optional reference to a business transaction.
    pub reference: Option<Reference>,
    /// Tags; defaults to empty when absent.
    pub tags: Option<HashSet<String>>,
}

/// A partial update of a ledger entry.
///
/// Any field left unset is unchanged (patch semantics, not replace).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntryPatch {
    /// Requested status; used only to gate the modification cause, the
    /// DRAFT to ACCEPTED transition itself goes through the bulk accept.
    pub status: Option<EntryStatus>,
    /// New name.
    pub name: Option<String>,
    /// New category.
    pub category: Option<Category>,
    /// New settlement date.
    pub settle_date: Option<chrono::NaiveDate>,
    /// New monetary value; only applied together with its converted
    /// canonical amount.
    pub money: Option<Money>,
    /// New notes.
    pub notes: Option<String>,
    /// New reference; applied only to drafts.
    pub reference: Option<Reference>,
    /// New tags; union for accepted entries, replacement for drafts.
    pub tags: Option<HashSet<String>>,
}

/// A financial ledger entry: the aggregate root of this domain.
///
/// Mutation goes through [`crate::ledger::service::LedgerDomainService`],
/// which keeps `canonical_amount` in lockstep with `money`. The store owns
/// `sequence_number` and `version`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Stable identity, assigned at creation.
    pub id: EntryId,
    /// Monotonic number assigned by the store on first save; read-only to
    /// the domain.
    pub sequence_number: Option<i64>,
    /// Optimistic concurrency counter, incremented by the store on every
    /// successful save.
    pub version: i64,
    /// Lifecycle status.
    pub status: EntryStatus,
    /// Entry name.
    pub name: String,
    /// Business category.
    pub category: Category,
    /// Origin of the entry; immutable.
    pub source: EntrySource,
    /// Settlement date.
    pub settle_date: chrono::NaiveDate,
    /// Monetary value in its original currency.
    pub money: Money,
    /// The value converted into the ledger's reporting currency.
    /// Recomputed whenever `money` changes; never stale.
    pub canonical_amount: Decimal,
    /// Optional free-text notes.
    pub notes: Option<String>,
    /// Optional reference to a business transaction.
    pub reference: Option<Reference>,
    /// Unordered tag set.
    pub tags: HashSet<String>,
    /// Creation timestamp; set once.
    pub created_at: DateTime<Utc>,
}

impl LedgerEntry {
    /// Builds a new entry. The canonical amount is supplied by the domain
    /// service, which has already converted `money`.
    #[must_use]
    pub fn create(new: NewEntry, source: EntrySource, canonical_amount: Decimal) -> Self {
        Self {
            id: EntryId::new(),
            sequence_number: None,
            version: 0,
            status: new.status,
            name: new.name,
            category: new.category,
            source,
            settle_date: new.settle_date,
            money: new.money,
            canonical_amount,
            notes: new.notes,
            reference: new.reference,
            tags: new.tags.unwrap_or_default(),
            created_at: Utc::now(),
        }
    }

    /// Applies a partial update, branching on the current status.
    ///
    /// Common fields move whenever present in the patch. Money and the
    /// canonical amount only move as a pair; if either is absent, neither
    /// changes. Tags and reference follow the status rules:
    ///
    /// - `ACCEPTED`: tags are only ever added to (union), reference is
    ///   immutable.
    /// - `DRAFT`: tags are replaced wholesale when present, reference is
    ///   replaced wholesale when present.
    pub fn update(&mut self, patch: &EntryPatch, canonical_amount: Option<Decimal>) {
        self.apply_common(patch, canonical_amount);

        match self.status {
            EntryStatus::Accepted => {
                if let Some(tags) = &patch.tags {
                    self.tags.extend(tags.iter().cloned());
                }
            }
            EntryStatus::Draft => {
                if let Some(tags) = &patch.tags {
                    self.tags = tags.clone();
                }
                if let Some(reference) = &patch.reference {
                    self.reference = Some(reference.clone());
                }
            }
        }
    }

    fn apply_common(&mut self, patch: &EntryPatch, canonical_amount: Option<Decimal>) {
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let (Some(money), Some(canonical)) = (patch.money, canonical_amount) {
            self.money = money;
            self.canonical_amount = canonical;
        }
        if let Some(settle_date) = patch.settle_date {
            self.settle_date = settle_date;
        }
        if let Some(notes) = &patch.notes {
            self.notes = Some(notes.clone());
        }
    }

    /// Marks the entry accepted. Used by the bulk draft acceptance path.
    pub fn accept(&mut self) {
        self.status = EntryStatus::Accepted;
    }
}
