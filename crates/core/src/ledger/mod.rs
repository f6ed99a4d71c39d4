//! Ledger entry lifecycle: the aggregate, its audit history, the domain
//! service that is the sole writer of entry state, and the error taxonomy.

pub mod entry;
pub mod error;
pub mod history;
pub mod service;

pub use entry::{
    Category, EntryPatch, EntrySource, EntryStatus, LedgerEntry, NewEntry, Reference,
};
pub use error::LedgerError;
pub use history::{HistoryAction, HistorySnapshot};
pub use service::LedgerDomainService;
