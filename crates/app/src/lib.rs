//! Application layer for finledger.
//!
//! This crate provides:
//! - [`LedgerAppService`], the entry lifecycle orchestrator
//! - Request and view types at the application boundary
//! - The history event feed and tracing setup

pub mod events;
pub mod service;
pub mod telemetry;
pub mod views;

pub use events::{ChannelPublisher, HistoryEventPublisher, HistoryRecorded, NoopPublisher};
pub use service::LedgerAppService;
pub use views::{
    CreateEntryRequest, EntryDetailView, EntryView, HistoryView, SummaryView, TotalsView,
    UpdateEntryRequest,
};
