//! Single-pass financial aggregation over a filtered set of entries.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use finledger_shared::types::{Currency, Money};

use crate::ledger::entry::LedgerEntry;

/// Reference kinds that count toward the distinct order total.
pub const ORDER_REFERENCE_KINDS: [&str; 3] = ["ATTRACTION", "PACKAGE_HOLIDAY", "STAY"];

/// Signed totals in the reporting currency.
///
/// Income collects the non-negative canonical amounts, cost the negative
/// ones, so `cost` is zero or negative and `income + cost` is the profit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerTotals {
    /// Sum of canonical amounts that are zero or positive.
    pub income: Decimal,
    /// Sum of canonical amounts that are negative.
    pub cost: Decimal,
}

impl LedgerTotals {
    /// Folds one canonical amount into the matching bucket.
    pub fn accumulate(&mut self, canonical_amount: Decimal) {
        if canonical_amount >= Decimal::ZERO {
            self.income += canonical_amount;
        } else {
            self.cost += canonical_amount;
        }
    }

    /// Net result over both buckets.
    #[must_use]
    pub fn profit(&self) -> Decimal {
        self.income + self.cost
    }
}

/// Financial summary over a filtered entry set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialSummary {
    /// Total income in the reporting currency.
    pub revenue: Money,
    /// Income plus (negative) cost in the reporting currency.
    pub profit: Money,
    /// Distinct referenced orders among the order-like reference kinds.
    pub orders: u64,
}

/// Computes summaries without touching entry state.
pub struct AggregationEngine;

impl AggregationEngine {
    /// Walks the entries once, splitting canonical amounts into income and
    /// cost by sign and counting distinct order references.
    ///
    /// Only references whose kind is in [`ORDER_REFERENCE_KINDS`] count as
    /// orders; the same reference id is counted once no matter how many
    /// entries point at it.
    pub fn summarize<'a, I>(entries: I, base_currency: Currency) -> FinancialSummary
    where
        I: IntoIterator<Item = &'a LedgerEntry>,
    {
        let mut totals = LedgerTotals::default();
        let mut order_ids: HashSet<&str> = HashSet::new();

        for entry in entries {
            totals.accumulate(entry.canonical_amount);
            if let Some(reference) = &entry.reference {
                if ORDER_REFERENCE_KINDS.contains(&reference.kind.as_str()) {
                    order_ids.insert(reference.id.as_str());
                }
            }
        }

        FinancialSummary {
            revenue: Money::new(totals.income, base_currency),
            profit: Money::new(totals.profit(), base_currency),
            orders: order_ids.len() as u64,
        }
    }

}
