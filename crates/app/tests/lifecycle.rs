//! End-to-end entry lifecycle through the application service.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use tokio::sync::mpsc::UnboundedReceiver;

use finledger_app::{
    ChannelPublisher, CreateEntryRequest, HistoryRecorded, LedgerAppService, UpdateEntryRequest,
};
use finledger_core::currency::{CurrencyConverter, ExchangeRateTable};
use finledger_core::ledger::{Category, EntryStatus, LedgerDomainService, Reference};
use finledger_core::query::FilterCriteria;
use finledger_shared::config::AppConfig;
use finledger_shared::types::{Currency, EntryId, Money};
use finledger_store::{LedgerStore, MemoryStore};

fn service() -> (LedgerAppService, UnboundedReceiver<HistoryRecorded>) {
    let (publisher, receiver) = ChannelPublisher::channel();
    let store: Arc<dyn LedgerStore> = Arc::new(MemoryStore::new());
    let domain = LedgerDomainService::new(
        CurrencyConverter::new(ExchangeRateTable::builtin()),
        Currency::Aed,
    );
    (
        LedgerAppService::new(store, domain, Arc::new(publisher)),
        receiver,
    )
}

fn create_request(name: &str, amount: rust_decimal::Decimal) -> CreateEntryRequest {
    CreateEntryRequest {
        status: EntryStatus::Draft,
        name: name.to_string(),
        category: Category::ToursAndTravel,
        settle_date: NaiveDate::from_ymd_opt(2026, 8, 20).unwrap(),
        amount,
        currency: Currency::Usd,
        notes: None,
        reference: None,
        tags: None,
    }
}

#[tokio::test]
async fn test_create_converts_and_emits_creation_event() {
    let (service, mut events) = service();

    let view = service
        .create_manual(create_request("Desert safari", dec!(100.00)), "ops@example.com")
        .await
        .unwrap();

    assert_eq!(view.sequence_number, Some(1));
    assert_eq!(view.money, Money::new(dec!(100.00), Currency::Usd));
    // 100.00 USD * 3.6725 = 367.25 AED
    assert_eq!(view.canonical_money, Money::new(dec!(367.25), Currency::Aed));

    let event = events.recv().await.unwrap();
    assert_eq!(event.entry_id, view.id);
    assert_eq!(event.snapshot.action, "The new ledger entry was created");
    assert_eq!(event.snapshot.created_by, "ops@example.com");
}

#[tokio::test]
async fn test_create_rejects_blank_name() {
    let (service, _events) = service();

    let err = service
        .create_manual(create_request("   ", dec!(1)), "u")
        .await
        .unwrap_err();
    assert_eq!(err.code, "BLANK_FIELD");
    assert_eq!(err.status, 400);
}

#[tokio::test]
async fn test_update_records_pre_mutation_history() {
    let (service, _events) = service();
    let created = service
        .create_manual(create_request("Original name", dec!(10)), "u")
        .await
        .unwrap();

    let updated = service
        .update(
            created.id,
            UpdateEntryRequest {
                name: Some("New name".to_string()),
                ..UpdateEntryRequest::default()
            },
            "u",
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "New name");
    assert_eq!(updated.version, 1);

    let detail = service.get_detailed(created.id).await.unwrap();
    assert_eq!(detail.history.len(), 2);
    // The update snapshot captured the state before the rename.
    assert!(detail
        .history
        .iter()
        .any(|h| h.entry_name == "Original name" && h.action == "The ledger entry was updated"));
}

#[tokio::test]
async fn test_update_to_accepted_requires_modification_cause() {
    let (service, _events) = service();
    let created = service
        .create_manual(create_request("Entry", dec!(10)), "u")
        .await
        .unwrap();

    let err = service
        .update(
            created.id,
            UpdateEntryRequest {
                status: Some(EntryStatus::Accepted),
                ..UpdateEntryRequest::default()
            },
            "u",
        )
        .await
        .unwrap_err();
    assert_eq!(err.code, "MISSING_MODIFICATION_CAUSE");

    // With a cause the update passes, and the cause becomes the action.
    service
        .update(
            created.id,
            UpdateEntryRequest {
                status: Some(EntryStatus::Accepted),
                modification_cause: Some("price correction".to_string()),
                ..UpdateEntryRequest::default()
            },
            "u",
        )
        .await
        .unwrap();
    let detail = service.get_detailed(created.id).await.unwrap();
    assert!(detail.history.iter().any(|h| h.action == "price correction"));
}

#[tokio::test]
async fn test_amount_and_currency_must_come_together() {
    let (service, _events) = service();
    let created = service
        .create_manual(create_request("Entry", dec!(10)), "u")
        .await
        .unwrap();

    let err = service
        .update(
            created.id,
            UpdateEntryRequest {
                amount: Some(dec!(50)),
                ..UpdateEntryRequest::default()
            },
            "u",
        )
        .await
        .unwrap_err();
    assert_eq!(err.code, "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_accept_drafts_flips_status_and_snapshots_each_entry() {
    let (service, mut events) = service();
    let first = service
        .create_manual(create_request("a", dec!(1)), "u")
        .await
        .unwrap();
    let second = service
        .create_manual(create_request("b", dec!(2)), "u")
        .await
        .unwrap();

    let accepted = service
        .accept_drafts(&[first.id, second.id], "reviewer")
        .await
        .unwrap();
    assert_eq!(accepted.len(), 2);
    assert!(accepted.iter().all(|v| v.status == EntryStatus::Accepted));
    assert!(accepted.iter().all(|v| v.version == 1));

    // Two creation events plus two acceptance events.
    let mut actions = Vec::new();
    for _ in 0..4 {
        actions.push(events.recv().await.unwrap().snapshot.action);
    }
    assert_eq!(
        actions
            .iter()
            .filter(|a| *a == "The draft ledger entry was accepted")
            .count(),
        2
    );
}

#[tokio::test]
async fn test_accept_drafts_with_unknown_id_mutates_nothing() {
    let (service, _events) = service();
    let created = service
        .create_manual(create_request("a", dec!(1)), "u")
        .await
        .unwrap();

    let err = service
        .accept_drafts(&[created.id, EntryId::new()], "reviewer")
        .await
        .unwrap_err();
    assert_eq!(err.code, "ENTRY_NOT_FOUND");
    assert_eq!(err.status, 404);

    let detail = service.get_detailed(created.id).await.unwrap();
    assert_eq!(detail.entry.status, EntryStatus::Draft);
}

#[tokio::test]
async fn test_summary_returns_page_and_totals_over_all_matches() {
    let (service, _events) = service();
    for (name, amount) in [("income a", dec!(100)), ("income b", dec!(25))] {
        let mut request = create_request(name, amount);
        request.currency = Currency::Aed;
        service.create_manual(request, "u").await.unwrap();
    }
    let mut cost = create_request("cost", dec!(-40));
    cost.currency = Currency::Aed;
    service.create_manual(cost, "u").await.unwrap();

    let criteria = FilterCriteria {
        page: finledger_shared::types::PageRequest {
            page: 1,
            per_page: 2,
        },
        ..FilterCriteria::default()
    };
    let listing = service.get_summary(&criteria).await.unwrap();

    assert_eq!(listing.page.data.len(), 2);
    assert_eq!(listing.page.meta.total, 3);
    assert_eq!(listing.totals.income, dec!(125));
    assert_eq!(listing.totals.cost, dec!(-40));
    assert_eq!(listing.totals.profit, dec!(85));
}

#[tokio::test]
async fn test_daily_summary_counts_distinct_orders() {
    let (service, _events) = service();
    for (id, kind) in [("ord-1", "ATTRACTION"), ("ord-1", "ATTRACTION"), ("ord-2", "STAY")] {
        let mut request = create_request(&format!("entry {id}"), dec!(10));
        request.currency = Currency::Aed;
        request.reference = Some(Reference {
            id: id.to_string(),
            kind: kind.to_string(),
            business_id: None,
        });
        service.create_manual(request, "u").await.unwrap();
    }

    let summary = service
        .get_daily_summary(&FilterCriteria::default())
        .await
        .unwrap();
    assert_eq!(summary.revenue, Money::new(dec!(30), Currency::Aed));
    assert_eq!(summary.orders, 2);
}

#[tokio::test]
async fn test_delete_removes_entry_and_history() {
    let (service, _events) = service();
    let created = service
        .create_manual(create_request("doomed", dec!(1)), "u")
        .await
        .unwrap();

    service.delete(created.id).await.unwrap();

    let err = service.get_detailed(created.id).await.unwrap_err();
    assert_eq!(err.code, "ENTRY_NOT_FOUND");
}

#[tokio::test]
async fn test_find_by_references() {
    let (service, _events) = service();
    let mut linked = create_request("linked", dec!(1));
    linked.reference = Some(Reference {
        id: "ord-7".to_string(),
        kind: "PACKAGE_HOLIDAY".to_string(),
        business_id: None,
    });
    service.create_manual(linked, "u").await.unwrap();
    service
        .create_manual(create_request("unlinked", dec!(2)), "u")
        .await
        .unwrap();

    let found = service
        .find_by_references(&["ord-7".to_string()])
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "linked");
}

#[tokio::test]
async fn test_draft_tags_replaced_accepted_tags_unioned() {
    let (service, _events) = service();
    let mut request = create_request("tagged", dec!(1));
    request.tags = Some(
        ["a".to_string(), "b".to_string()]
            .into_iter()
            .collect::<HashSet<_>>(),
    );
    let created = service.create_manual(request, "u").await.unwrap();

    // Draft: wholesale replacement.
    let updated = service
        .update(
            created.id,
            UpdateEntryRequest {
                tags: Some(["c".to_string()].into_iter().collect()),
                ..UpdateEntryRequest::default()
            },
            "u",
        )
        .await
        .unwrap();
    assert_eq!(updated.tags, ["c".to_string()].into_iter().collect());

    // Accepted: union only.
    service.accept_drafts(&[created.id], "u").await.unwrap();
    let updated = service
        .update(
            created.id,
            UpdateEntryRequest {
                tags: Some(["d".to_string()].into_iter().collect()),
                ..UpdateEntryRequest::default()
            },
            "u",
        )
        .await
        .unwrap();
    assert_eq!(
        updated.tags,
        ["c".to_string(), "d".to_string()].into_iter().collect()
    );
}

#[tokio::test]
async fn test_from_config_defaults_to_builtin_rates() {
    let (publisher, _receiver) = ChannelPublisher::channel();
    let service = LedgerAppService::from_config(
        &AppConfig::default(),
        Arc::new(MemoryStore::new()),
        Arc::new(publisher),
    )
    .unwrap();

    let view = service
        .create_manual(create_request("configured", dec!(100.00)), "u")
        .await
        .unwrap();
    assert_eq!(view.canonical_money, Money::new(dec!(367.25), Currency::Aed));
}
