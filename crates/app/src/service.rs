//! Application service tying the domain, the store, and the event feed
//! together.
//!
//! Every mutation follows the same shape: load, snapshot the pre-mutation
//! state, apply the domain rules, persist entry and snapshot atomically,
//! then publish the snapshot to the event feed.

use std::sync::Arc;

use tracing::info;

use finledger_core::currency::{CurrencyConverter, ExchangeRateTable};
use finledger_core::ledger::{
    EntrySource, HistoryAction, LedgerDomainService, LedgerError,
};
use finledger_core::query::{AggregationEngine, FilterCriteria, FinancialSummary};
use finledger_shared::config::AppConfig;
use finledger_shared::error::{AppError, AppResult};
use finledger_shared::types::EntryId;
use finledger_store::LedgerStore;

use crate::events::{HistoryEventPublisher, HistoryRecorded};
use crate::views::{
    CreateEntryRequest, EntryDetailView, EntryView, HistoryView, SummaryView, UpdateEntryRequest,
};

/// Action description recorded for plain updates without an explicit cause.
const UPDATED_ACTION: &str = "The ledger entry was updated";

/// Entry lifecycle orchestration.
pub struct LedgerAppService {
    store: Arc<dyn LedgerStore>,
    domain: LedgerDomainService,
    publisher: Arc<dyn HistoryEventPublisher>,
}

impl LedgerAppService {
    /// Creates a service from its parts.
    #[must_use]
    pub fn new(
        store: Arc<dyn LedgerStore>,
        domain: LedgerDomainService,
        publisher: Arc<dyn HistoryEventPublisher>,
    ) -> Self {
        Self {
            store,
            domain,
            publisher,
        }
    }

    /// Creates a service from loaded configuration. An empty rate list in
    /// the configuration selects the builtin rate table.
    ///
    /// # Errors
    ///
    /// Returns an error when a configured exchange rate is invalid.
    pub fn from_config(
        config: &AppConfig,
        store: Arc<dyn LedgerStore>,
        publisher: Arc<dyn HistoryEventPublisher>,
    ) -> AppResult<Self> {
        let table = if config.ledger.rates.is_empty() {
            ExchangeRateTable::builtin()
        } else {
            ExchangeRateTable::from_config(&config.ledger.rates)?
        };
        let domain = LedgerDomainService::new(
            CurrencyConverter::new(table),
            config.ledger.base_currency,
        );
        Ok(Self::new(store, domain, publisher))
    }

    /// Creates one user-entered entry and records its creation snapshot.
    ///
    /// # Errors
    ///
    /// Fails on validation errors or a missing exchange rate.
    pub async fn create_manual(
        &self,
        request: CreateEntryRequest,
        actor: &str,
    ) -> AppResult<EntryView> {
        self.create(request, EntrySource::Manual, actor).await
    }

    /// Creates a batch of system-originated entries. Entries are created
    /// one by one; a failure stops the batch at that point.
    ///
    /// # Errors
    ///
    /// Fails on the first entry that does not validate or persist.
    pub async fn create_system_batch(
        &self,
        requests: Vec<CreateEntryRequest>,
        actor: &str,
    ) -> AppResult<Vec<EntryView>> {
        let mut views = Vec::with_capacity(requests.len());
        for request in requests {
            views.push(self.create(request, EntrySource::System, actor).await?);
        }
        info!(count = views.len(), "created system entry batch");
        Ok(views)
    }

    async fn create(
        &self,
        request: CreateEntryRequest,
        source: EntrySource,
        actor: &str,
    ) -> AppResult<EntryView> {
        let entry = self.domain.create(request.into_new_entry(), source)?;
        let snapshot = self
            .domain
            .history_of(&entry, actor, HistoryAction::Created.as_str());

        let saved = self
            .store
            .save_with_history(entry, snapshot.clone())
            .await?;
        info!(entry_id = %saved.id, sequence = ?saved.sequence_number, "created ledger entry");

        self.publisher.publish(HistoryRecorded {
            entry_id: saved.id,
            snapshot,
        });
        Ok(EntryView::from_entry(saved, self.domain.base_currency()))
    }

    /// Applies a partial update to an entry, recording the pre-mutation
    /// state in its history.
    ///
    /// # Errors
    ///
    /// Fails when the entry does not exist, when the update violates a
    /// domain rule, or with a retryable conflict when a concurrent writer
    /// saved first.
    pub async fn update(
        &self,
        id: EntryId,
        request: UpdateEntryRequest,
        actor: &str,
    ) -> AppResult<EntryView> {
        let mut entry = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::from(LedgerError::EntryNotFound(id)))?;

        let action = request
            .modification_cause
            .clone()
            .unwrap_or_else(|| UPDATED_ACTION.to_string());
        let snapshot = self.domain.history_of(&entry, actor, &action);

        let cause = request.modification_cause.clone();
        let patch = request.into_patch()?;
        self.domain.update(&patch, &mut entry, cause.as_deref())?;

        let saved = self.store.save_with_history(entry, snapshot.clone()).await?;
        info!(entry_id = %saved.id, version = saved.version, "updated ledger entry");

        self.publisher.publish(HistoryRecorded {
            entry_id: saved.id,
            snapshot,
        });
        Ok(EntryView::from_entry(saved, self.domain.base_currency()))
    }

    /// Accepts a batch of draft entries atomically, recording one snapshot
    /// per entry.
    ///
    /// # Errors
    ///
    /// Fails without mutating anything when any id is unknown.
    pub async fn accept_drafts(&self, ids: &[EntryId], actor: &str) -> AppResult<Vec<EntryView>> {
        let entries = self.store.find_all_by_ids(ids).await?;
        if entries.len() != ids.len() {
            let found: Vec<EntryId> = entries.iter().map(|e| e.id).collect();
            let missing = ids.iter().find(|id| !found.contains(id));
            if let Some(missing) = missing {
                return Err(LedgerError::EntryNotFound(*missing).into());
            }
        }

        let snapshots: Vec<_> = entries
            .iter()
            .map(|entry| {
                self.domain
                    .history_of(entry, actor, HistoryAction::DraftAccepted.as_str())
            })
            .collect();

        let accepted = self.store.accept_drafts(ids, snapshots.clone()).await?;
        info!(count = accepted.len(), "accepted draft entries");

        for snapshot in snapshots {
            self.publisher.publish(HistoryRecorded {
                entry_id: snapshot.entry_id,
                snapshot,
            });
        }

        let base = self.domain.base_currency();
        Ok(accepted
            .into_iter()
            .map(|entry| EntryView::from_entry(entry, base))
            .collect())
    }

    /// One entry together with its full history, newest record first.
    ///
    /// # Errors
    ///
    /// Fails when the entry does not exist.
    pub async fn get_detailed(&self, id: EntryId) -> AppResult<EntryDetailView> {
        let entry = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::from(LedgerError::EntryNotFound(id)))?;
        let history = self.store.find_history(id).await?;

        Ok(EntryDetailView {
            entry: EntryView::from_entry(entry, self.domain.base_currency()),
            history: history.into_iter().map(HistoryView::from).collect(),
        })
    }

    /// Income, cost, and profit over the whole filtered set, plus the
    /// requested page of the entries behind those totals.
    ///
    /// # Errors
    ///
    /// Fails only on storage errors.
    pub async fn get_summary(&self, criteria: &FilterCriteria) -> AppResult<SummaryView> {
        let result = self.store.find_page_with_totals(criteria).await?;
        let base = self.domain.base_currency();

        Ok(SummaryView {
            totals: result.totals.into(),
            page: result
                .page
                .map(|entry| EntryView::from_entry(entry, base)),
        })
    }

    /// Revenue, profit, and distinct order count over the filtered set,
    /// typically scoped to one day by the caller's criteria.
    ///
    /// # Errors
    ///
    /// Fails only on storage errors.
    pub async fn get_daily_summary(
        &self,
        criteria: &FilterCriteria,
    ) -> AppResult<FinancialSummary> {
        let entries = self.store.find_all_matching(criteria).await?;
        Ok(AggregationEngine::summarize(
            &entries,
            self.domain.base_currency(),
        ))
    }

    /// Deletes an entry and its history.
    ///
    /// # Errors
    ///
    /// Fails when the entry does not exist.
    pub async fn delete(&self, id: EntryId) -> AppResult<()> {
        self.store.delete(id).await?;
        info!(entry_id = %id, "deleted ledger entry");
        Ok(())
    }

    /// Entries linked to any of the given business-transaction reference
    /// ids.
    ///
    /// # Errors
    ///
    /// Fails only on storage errors.
    pub async fn find_by_references(&self, reference_ids: &[String]) -> AppResult<Vec<EntryView>> {
        let entries = self.store.find_by_references(reference_ids).await?;
        let base = self.domain.base_currency();
        Ok(entries
            .into_iter()
            .map(|entry| EntryView::from_entry(entry, base))
            .collect())
    }
}
