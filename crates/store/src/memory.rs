//! In-memory ledger store.
//!
//! Backs tests and single-process deployments. A single `RwLock` over the
//! whole state doubles as the transaction boundary: multi-record writes
//! hold the write lock for their full duration and are therefore atomic.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use finledger_core::ledger::{HistorySnapshot, LedgerEntry, LedgerError};
use finledger_core::query::{FilterCriteria, FilterSpecification, LedgerTotals};
use finledger_shared::types::{EntryId, PageResponse};

use crate::{LedgerStore, PageWithTotals};

#[derive(Debug, Default)]
struct StoreState {
    entries: HashMap<EntryId, LedgerEntry>,
    history: HashMap<EntryId, Vec<HistorySnapshot>>,
    next_sequence: i64,
}

/// Thread-safe in-memory [`LedgerStore`].
#[derive(Debug)]
pub struct MemoryStore {
    state: RwLock<StoreState>,
}

impl MemoryStore {
    /// Creates an empty store. Sequence numbers start at 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: RwLock::new(StoreState {
                entries: HashMap::new(),
                history: HashMap::new(),
                next_sequence: 1,
            }),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, StoreState>, LedgerError> {
        self.state
            .read()
            .map_err(|_| LedgerError::Internal("ledger store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, StoreState>, LedgerError> {
        self.state
            .write()
            .map_err(|_| LedgerError::Internal("ledger store lock poisoned".to_string()))
    }

    /// Inserts or re-saves an entry under an already held write lock.
    fn persist(state: &mut StoreState, mut entry: LedgerEntry) -> Result<LedgerEntry, LedgerError> {
        match state.entries.get(&entry.id) {
            Some(stored) => {
                if stored.version != entry.version {
                    return Err(LedgerError::VersionConflict {
                        id: entry.id,
                        expected: entry.version,
                        actual: stored.version,
                    });
                }
                entry.version += 1;
            }
            None => {
                entry.sequence_number = Some(state.next_sequence);
                state.next_sequence += 1;
            }
        }

        tracing::debug!(entry_id = %entry.id, version = entry.version, "persisting ledger entry");
        state.entries.insert(entry.id, entry.clone());
        Ok(entry)
    }

    fn filtered_sorted(state: &StoreState, criteria: &FilterCriteria) -> Vec<LedgerEntry> {
        let spec = FilterSpecification::from_criteria(criteria);
        let mut matches: Vec<LedgerEntry> = state
            .entries
            .values()
            .filter(|entry| spec.matches(entry))
            .cloned()
            .collect();
        matches.sort_by(|a, b| criteria.ordering(a, b));
        matches
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerStore for MemoryStore {
    async fn save(&self, entry: LedgerEntry) -> Result<LedgerEntry, LedgerError> {
        let mut state = self.write()?;
        Self::persist(&mut state, entry)
    }

    async fn save_with_history(
        &self,
        entry: LedgerEntry,
        history: HistorySnapshot,
    ) -> Result<LedgerEntry, LedgerError> {
        let mut state = self.write()?;
        let saved = Self::persist(&mut state, entry)?;
        state.history.entry(saved.id).or_default().push(history);
        Ok(saved)
    }

    async fn find_by_id(&self, id: EntryId) -> Result<Option<LedgerEntry>, LedgerError> {
        Ok(self.read()?.entries.get(&id).cloned())
    }

    async fn find_all_by_ids(&self, ids: &[EntryId]) -> Result<Vec<LedgerEntry>, LedgerError> {
        let state = self.read()?;
        Ok(ids
            .iter()
            .filter_map(|id| state.entries.get(id).cloned())
            .collect())
    }

    async fn query(
        &self,
        criteria: &FilterCriteria,
    ) -> Result<PageResponse<LedgerEntry>, LedgerError> {
        let state = self.read()?;
        let matches = Self::filtered_sorted(&state, criteria);
        let total = matches.len() as u64;
        Ok(PageResponse::new(
            criteria.page.slice_of(&matches),
            &criteria.page,
            total,
        ))
    }

    async fn find_page_with_totals(
        &self,
        criteria: &FilterCriteria,
    ) -> Result<PageWithTotals, LedgerError> {
        let state = self.read()?;
        let matches = Self::filtered_sorted(&state, criteria);

        let mut totals = LedgerTotals::default();
        for entry in &matches {
            totals.accumulate(entry.canonical_amount);
        }

        let total = matches.len() as u64;
        Ok(PageWithTotals {
            page: PageResponse::new(criteria.page.slice_of(&matches), &criteria.page, total),
            totals,
        })
    }

    async fn find_all_matching(
        &self,
        criteria: &FilterCriteria,
    ) -> Result<Vec<LedgerEntry>, LedgerError> {
        let state = self.read()?;
        Ok(Self::filtered_sorted(&state, criteria))
    }

    async fn save_history(&self, history: HistorySnapshot) -> Result<(), LedgerError> {
        let mut state = self.write()?;
        state
            .history
            .entry(history.entry_id)
            .or_default()
            .push(history);
        Ok(())
    }

    async fn find_history(&self, entry_id: EntryId) -> Result<Vec<HistorySnapshot>, LedgerError> {
        let state = self.read()?;
        let mut snapshots = state.history.get(&entry_id).cloned().unwrap_or_default();
        snapshots.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(snapshots)
    }

    async fn delete(&self, id: EntryId) -> Result<(), LedgerError> {
        let mut state = self.write()?;
        if state.entries.remove(&id).is_none() {
            return Err(LedgerError::EntryNotFound(id));
        }
        state.history.remove(&id);
        tracing::debug!(entry_id = %id, "deleted ledger entry and its history");
        Ok(())
    }

    async fn find_by_references(
        &self,
        reference_ids: &[String],
    ) -> Result<Vec<LedgerEntry>, LedgerError> {
        let state = self.read()?;
        Ok(state
            .entries
            .values()
            .filter(|entry| {
                entry
                    .reference
                    .as_ref()
                    .is_some_and(|reference| reference_ids.contains(&reference.id))
            })
            .cloned()
            .collect())
    }

    async fn accept_drafts(
        &self,
        ids: &[EntryId],
        histories: Vec<HistorySnapshot>,
    ) -> Result<Vec<LedgerEntry>, LedgerError> {
        let mut state = self.write()?;

        // Validate the whole batch before mutating anything.
        for id in ids {
            if !state.entries.contains_key(id) {
                return Err(LedgerError::EntryNotFound(*id));
            }
        }

        let mut accepted = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(entry) = state.entries.get_mut(id) {
                entry.accept();
                entry.version += 1;
                accepted.push(entry.clone());
            }
        }
        for history in histories {
            state
                .history
                .entry(history.entry_id)
                .or_default()
                .push(history);
        }

        tracing::debug!(count = accepted.len(), "accepted draft entries");
        Ok(accepted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use finledger_core::ledger::{Category, EntrySource, EntryStatus, NewEntry, Reference};
    use finledger_shared::types::{Currency, Money};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn entry(name: &str, canonical: Decimal) -> LedgerEntry {
        LedgerEntry::create(
            NewEntry {
                status: EntryStatus::Draft,
                name: name.to_string(),
                category: Category::Operations,
                settle_date: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
                money: Money::new(canonical, Currency::Aed),
                notes: None,
                reference: None,
                tags: None,
            },
            EntrySource::Manual,
            canonical,
        )
    }

    fn snapshot(entry: &LedgerEntry, action: &str) -> HistorySnapshot {
        HistorySnapshot::from_entry(entry, "tester@example.com", action, Currency::Aed)
    }

    #[tokio::test]
    async fn test_first_save_assigns_sequence_numbers_in_order() {
        let store = MemoryStore::new();
        let first = store.save(entry("a", dec!(1))).await.unwrap();
        let second = store.save(entry("b", dec!(2))).await.unwrap();

        assert_eq!(first.sequence_number, Some(1));
        assert_eq!(second.sequence_number, Some(2));
        assert_eq!(first.version, 0);
    }

    #[tokio::test]
    async fn test_resave_bumps_version() {
        let store = MemoryStore::new();
        let saved = store.save(entry("a", dec!(1))).await.unwrap();

        let mut updated = saved.clone();
        updated.name = "renamed".to_string();
        let resaved = store.save(updated).await.unwrap();

        assert_eq!(resaved.version, 1);
        assert_eq!(resaved.sequence_number, saved.sequence_number);
        let found = store.find_by_id(saved.id).await.unwrap().unwrap();
        assert_eq!(found.name, "renamed");
    }

    #[tokio::test]
    async fn test_stale_save_is_a_version_conflict() {
        let store = MemoryStore::new();
        let saved = store.save(entry("a", dec!(1))).await.unwrap();

        // Two readers pick up version 0; the second write must fail.
        let mut writer_one = saved.clone();
        writer_one.name = "one".to_string();
        let mut writer_two = saved.clone();
        writer_two.name = "two".to_string();

        store.save(writer_one).await.unwrap();
        let err = store.save(writer_two).await.unwrap_err();
        assert!(matches!(
            err,
            LedgerError::VersionConflict {
                expected: 0,
                actual: 1,
                ..
            }
        ));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_save_with_history_records_nothing_on_conflict() {
        let store = MemoryStore::new();
        let saved = store.save(entry("a", dec!(1))).await.unwrap();

        let mut stale = saved.clone();
        stale.version = 99;
        let history = snapshot(&saved, "updated");
        assert!(store.save_with_history(stale, history).await.is_err());

        assert!(store.find_history(saved.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_history_is_returned_newest_first() {
        let store = MemoryStore::new();
        let saved = store.save(entry("a", dec!(1))).await.unwrap();

        let mut older = snapshot(&saved, "first");
        older.created_at -= Duration::seconds(60);
        store.save_history(older).await.unwrap();
        store.save_history(snapshot(&saved, "second")).await.unwrap();

        let history = store.find_history(saved.id).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].action, "second");
        assert_eq!(history[1].action, "first");
    }

    #[tokio::test]
    async fn test_query_filters_sorts_and_pages() {
        let store = MemoryStore::new();
        for i in 1..=5 {
            let mut e = entry(&format!("entry {i}"), Decimal::from(i));
            e.settle_date = NaiveDate::from_ymd_opt(2026, 8, i as u32).unwrap();
            store.save(e).await.unwrap();
        }

        let criteria = FilterCriteria {
            page: finledger_shared::types::PageRequest {
                page: 1,
                per_page: 2,
            },
            ..FilterCriteria::default()
        };
        let page = store.query(&criteria).await.unwrap();

        // Default sort: settle date descending.
        assert_eq!(page.data.len(), 2);
        assert_eq!(page.data[0].name, "entry 5");
        assert_eq!(page.data[1].name, "entry 4");
        assert_eq!(page.meta.total, 5);
        assert_eq!(page.meta.total_pages, 3);
    }

    #[tokio::test]
    async fn test_page_totals_cover_all_matches_not_just_the_page() {
        let store = MemoryStore::new();
        store.save(entry("a", dec!(100))).await.unwrap();
        store.save(entry("b", dec!(-40))).await.unwrap();
        store.save(entry("c", dec!(25))).await.unwrap();

        let criteria = FilterCriteria {
            page: finledger_shared::types::PageRequest {
                page: 1,
                per_page: 1,
            },
            ..FilterCriteria::default()
        };
        let result = store.find_page_with_totals(&criteria).await.unwrap();

        assert_eq!(result.page.data.len(), 1);
        assert_eq!(result.totals.income, dec!(125));
        assert_eq!(result.totals.cost, dec!(-40));
    }

    #[tokio::test]
    async fn test_delete_cascades_to_history() {
        let store = MemoryStore::new();
        let saved = store.save(entry("a", dec!(1))).await.unwrap();
        store.save_history(snapshot(&saved, "created")).await.unwrap();

        store.delete(saved.id).await.unwrap();

        assert!(store.find_by_id(saved.id).await.unwrap().is_none());
        assert!(store.find_history(saved.id).await.unwrap().is_empty());
        assert_eq!(
            store.delete(saved.id).await.unwrap_err(),
            LedgerError::EntryNotFound(saved.id)
        );
    }

    #[tokio::test]
    async fn test_find_by_references_matches_reference_ids() {
        let store = MemoryStore::new();
        let mut with_reference = entry("a", dec!(1));
        with_reference.reference = Some(Reference {
            id: "ord-1".to_string(),
            kind: "STAY".to_string(),
            business_id: None,
        });
        store.save(with_reference).await.unwrap();
        store.save(entry("b", dec!(2))).await.unwrap();

        let found = store
            .find_by_references(&["ord-1".to_string(), "ord-9".to_string()])
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "a");
    }

    #[tokio::test]
    async fn test_accept_drafts_is_all_or_nothing() {
        let store = MemoryStore::new();
        let first = store.save(entry("a", dec!(1))).await.unwrap();
        let second = store.save(entry("b", dec!(2))).await.unwrap();
        let unknown = EntryId::new();

        let err = store
            .accept_drafts(&[first.id, unknown], vec![])
            .await
            .unwrap_err();
        assert_eq!(err, LedgerError::EntryNotFound(unknown));
        // Nothing was mutated.
        let untouched = store.find_by_id(first.id).await.unwrap().unwrap();
        assert!(untouched.status.is_draft());
        assert_eq!(untouched.version, 0);

        let histories = vec![
            snapshot(&first, "The draft ledger entry was accepted"),
            snapshot(&second, "The draft ledger entry was accepted"),
        ];
        let accepted = store
            .accept_drafts(&[first.id, second.id], histories)
            .await
            .unwrap();
        assert_eq!(accepted.len(), 2);
        assert!(accepted.iter().all(|e| e.status.is_accepted()));
        assert!(accepted.iter().all(|e| e.version == 1));
        assert_eq!(store.find_history(first.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_find_all_by_ids_skips_unknown_ids() {
        let store = MemoryStore::new();
        let saved = store.save(entry("a", dec!(1))).await.unwrap();

        let found = store
            .find_all_by_ids(&[saved.id, EntryId::new()])
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
    }
}
