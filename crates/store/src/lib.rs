//! Persistence layer for finledger.
//!
//! This crate provides:
//! - The [`LedgerStore`] trait, hiding the storage backend from the rest of
//!   the application
//! - An in-memory backend used for tests and single-process deployments
//!
//! The store owns two pieces of entry state the domain never writes: the
//! monotonic sequence number assigned on first save and the optimistic
//! concurrency version bumped on every successful save.

pub mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use serde::Serialize;

use finledger_core::ledger::{HistorySnapshot, LedgerEntry, LedgerError};
use finledger_core::query::{FilterCriteria, LedgerTotals};
use finledger_shared::types::{EntryId, PageResponse};

/// One page of entries together with the totals over the whole filtered
/// set, so a listing can show aggregates without a second query.
#[derive(Debug, Clone, Serialize)]
pub struct PageWithTotals {
    /// The requested page of the filtered, sorted result set.
    pub page: PageResponse<LedgerEntry>,
    /// Income and cost totals across every matching entry, not just the
    /// returned page.
    pub totals: LedgerTotals,
}

/// Storage backend for ledger entries and their audit history.
///
/// Multi-record operations (`save_with_history`, `accept_drafts`) are
/// atomic: either every write lands or none does.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Persists an entry.
    ///
    /// A first save assigns the next sequence number. A re-save succeeds
    /// only when the incoming version matches the stored one, and bumps
    /// the version by one.
    ///
    /// # Errors
    ///
    /// Returns `VersionConflict` on a stale re-save.
    async fn save(&self, entry: LedgerEntry) -> Result<LedgerEntry, LedgerError>;

    /// Persists an entry and appends a history snapshot in one atomic step.
    ///
    /// # Errors
    ///
    /// Returns `VersionConflict` on a stale re-save; the snapshot is not
    /// recorded in that case.
    async fn save_with_history(
        &self,
        entry: LedgerEntry,
        history: HistorySnapshot,
    ) -> Result<LedgerEntry, LedgerError>;

    /// Looks up a single entry.
    async fn find_by_id(&self, id: EntryId) -> Result<Option<LedgerEntry>, LedgerError>;

    /// Looks up many entries at once. Unknown ids are silently skipped.
    async fn find_all_by_ids(&self, ids: &[EntryId]) -> Result<Vec<LedgerEntry>, LedgerError>;

    /// Runs a filtered, sorted, paginated listing.
    async fn query(
        &self,
        criteria: &FilterCriteria,
    ) -> Result<PageResponse<LedgerEntry>, LedgerError>;

    /// Like [`LedgerStore::query`], but also returns income and cost totals
    /// computed over the entire filtered set.
    async fn find_page_with_totals(
        &self,
        criteria: &FilterCriteria,
    ) -> Result<PageWithTotals, LedgerError>;

    /// Every entry matching the criteria, sorted, without pagination.
    async fn find_all_matching(
        &self,
        criteria: &FilterCriteria,
    ) -> Result<Vec<LedgerEntry>, LedgerError>;

    /// Appends a history snapshot outside of an entry save.
    async fn save_history(&self, history: HistorySnapshot) -> Result<(), LedgerError>;

    /// All history snapshots of an entry, newest first.
    async fn find_history(&self, entry_id: EntryId) -> Result<Vec<HistorySnapshot>, LedgerError>;

    /// Deletes an entry and all of its history.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` when no such entry exists.
    async fn delete(&self, id: EntryId) -> Result<(), LedgerError>;

    /// Entries whose reference id is in the given set.
    async fn find_by_references(
        &self,
        reference_ids: &[String],
    ) -> Result<Vec<LedgerEntry>, LedgerError>;

    /// Atomically accepts a batch of draft entries and records one history
    /// snapshot per entry.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` when any id is unknown; no entry is mutated
    /// in that case.
    async fn accept_drafts(
        &self,
        ids: &[EntryId],
        histories: Vec<HistorySnapshot>,
    ) -> Result<Vec<LedgerEntry>, LedgerError>;
}
