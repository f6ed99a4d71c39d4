//! Filtered reporting queries: predicate composition and aggregation.

pub mod aggregate;
pub mod filter;


pub use aggregate::{AggregationEngine, FinancialSummary, LedgerTotals};
pub use filter::{FilterCriteria, FilterSpecification, SortBy, SortDirection};
