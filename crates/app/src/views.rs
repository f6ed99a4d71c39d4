//! Request and view types at the application boundary.
//!
//! Requests carry raw caller input and are turned into domain inputs here;
//! views are flat read models assembled from domain state.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use finledger_core::ledger::{
    Category, EntryPatch, EntrySource, EntryStatus, HistorySnapshot, LedgerEntry, NewEntry,
    Reference,
};
use finledger_core::query::LedgerTotals;
use finledger_shared::error::AppError;
use finledger_shared::types::{Currency, EntryId, HistoryId, Money, PageResponse};

/// Input for creating one ledger entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEntryRequest {
    /// Initial status.
    pub status: EntryStatus,
    /// Entry name.
    pub name: String,
    /// Business category.
    pub category: Category,
    /// Settlement date.
    pub settle_date: NaiveDate,
    /// Monetary amount in its original currency.
    pub amount: Decimal,
    /// Original currency.
    pub currency: Currency,
    /// Optional notes.
    pub notes: Option<String>,
    /// Optional business-transaction reference.
    pub reference: Option<Reference>,
    /// Optional tags.
    pub tags: Option<HashSet<String>>,
}

impl CreateEntryRequest {
    pub(crate) fn into_new_entry(self) -> NewEntry {
        NewEntry {
            status: self.status,
            name: self.name,
            category: self.category,
            settle_date: self.settle_date,
            money: Money::new(self.amount, self.currency),
            notes: self.notes,
            reference: self.reference,
            tags: self.tags,
        }
    }
}

/// Partial update of one ledger entry. Absent fields stay unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateEntryRequest {
    /// Requested status.
    pub status: Option<EntryStatus>,
    /// New name.
    pub name: Option<String>,
    /// New category.
    pub category: Option<Category>,
    /// New settlement date.
    pub settle_date: Option<NaiveDate>,
    /// New amount; must come together with `currency`.
    pub amount: Option<Decimal>,
    /// New currency; must come together with `amount`.
    pub currency: Option<Currency>,
    /// New notes.
    pub notes: Option<String>,
    /// New reference.
    pub reference: Option<Reference>,
    /// New tags.
    pub tags: Option<HashSet<String>>,
    /// Why the change is being made. Required when `status` is `ACCEPTED`.
    pub modification_cause: Option<String>,
}

impl UpdateEntryRequest {
    pub(crate) fn into_patch(self) -> Result<EntryPatch, AppError> {
        let money = match (self.amount, self.currency) {
            (Some(amount), Some(currency)) => Some(Money::new(amount, currency)),
            (None, None) => None,
            _ => {
                return Err(AppError::validation(
                    "amount and currency must be provided together",
                ));
            }
        };

        Ok(EntryPatch {
            status: self.status,
            name: self.name,
            category: self.category,
            settle_date: self.settle_date,
            money,
            notes: self.notes,
            reference: self.reference,
            tags: self.tags,
        })
    }
}

/// Flat read model of one ledger entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryView {
    /// Entry identity.
    pub id: EntryId,
    /// Store-assigned sequence number; absent until first save.
    pub sequence_number: Option<i64>,
    /// Optimistic concurrency version.
    pub version: i64,
    /// Lifecycle status.
    pub status: EntryStatus,
    /// Entry name.
    pub name: String,
    /// Business category.
    pub category: Category,
    /// Origin of the entry.
    pub source: EntrySource,
    /// Settlement date.
    pub settle_date: NaiveDate,
    /// Value in its original currency.
    pub money: Money,
    /// Value in the reporting currency.
    pub canonical_money: Money,
    /// Notes.
    pub notes: Option<String>,
    /// Business-transaction reference.
    pub reference: Option<Reference>,
    /// Tags.
    pub tags: HashSet<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl EntryView {
    pub(crate) fn from_entry(entry: LedgerEntry, base_currency: Currency) -> Self {
        Self {
            id: entry.id,
            sequence_number: entry.sequence_number,
            version: entry.version,
            status: entry.status,
            name: entry.name,
            category: entry.category,
            source: entry.source,
            settle_date: entry.settle_date,
            money: entry.money,
            canonical_money: Money::new(entry.canonical_amount, base_currency),
            notes: entry.notes,
            reference: entry.reference,
            tags: entry.tags,
            created_at: entry.created_at,
        }
    }
}

/// One audit history record of an entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryView {
    /// History record identity.
    pub id: HistoryId,
    /// When the record was taken.
    pub created_at: DateTime<Utc>,
    /// Who caused the mutation.
    pub created_by: String,
    /// What happened.
    pub action: String,
    /// Entry name at that time.
    pub entry_name: String,
    /// Settlement date at that time.
    pub settle_date: NaiveDate,
    /// Original-currency value at that time.
    pub original_money: Money,
    /// Reporting-currency value at that time.
    pub canonical_money: Money,
    /// Status at that time.
    pub status: EntryStatus,
    /// Tags at that time.
    pub tags: HashSet<String>,
    /// Notes at that time.
    pub notes: Option<String>,
    /// Category at that time.
    pub category: Category,
    /// Reference at that time.
    pub reference: Option<Reference>,
}

impl From<HistorySnapshot> for HistoryView {
    fn from(snapshot: HistorySnapshot) -> Self {
        Self {
            id: snapshot.id,
            created_at: snapshot.created_at,
            created_by: snapshot.created_by,
            action: snapshot.action,
            entry_name: snapshot.entry_name,
            settle_date: snapshot.settle_date,
            original_money: snapshot.original_money,
            canonical_money: snapshot.canonical_money,
            status: snapshot.status,
            tags: snapshot.tags,
            notes: snapshot.notes,
            category: snapshot.category,
            reference: snapshot.reference,
        }
    }
}

/// An entry together with its full audit history, newest first.
#[derive(Debug, Clone, Serialize)]
pub struct EntryDetailView {
    /// The entry.
    pub entry: EntryView,
    /// Its history, newest first.
    pub history: Vec<HistoryView>,
}

/// Income, cost, and profit over a filtered entry set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TotalsView {
    /// Sum of non-negative canonical amounts.
    pub income: Decimal,
    /// Sum of negative canonical amounts.
    pub cost: Decimal,
    /// Income plus cost.
    pub profit: Decimal,
}

impl From<LedgerTotals> for TotalsView {
    fn from(totals: LedgerTotals) -> Self {
        Self {
            income: totals.income,
            cost: totals.cost,
            profit: totals.profit(),
        }
    }
}

/// Income, cost, and profit over a filtered set, together with one page of
/// the entries behind the numbers.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryView {
    /// Totals across every matching entry.
    pub totals: TotalsView,
    /// The requested page of entries.
    pub page: PageResponse<EntryView>,
}
