//! Pairwise exchange-rate table with derived inverse rates.

use std::collections::HashMap;

use rust_decimal::{Decimal, RoundingStrategy};

use finledger_shared::config::RatePairConfig;
use finledger_shared::types::Currency;

use crate::ledger::error::LedgerError;

/// Scale of derived inverse rates.
const INVERSE_RATE_SCALE: u32 = 5;

/// Mapping from an ordered currency pair to its exchange rate.
///
/// Only one direction per pair needs to be supplied; the inverse rate is
/// derived as `1/rate` truncated to 5 fractional digits and inserted for the
/// reverse pair when the table is built. A rate supplied explicitly always
/// wins over a derived inverse.
#[derive(Debug, Clone)]
pub struct ExchangeRateTable {
    rates: HashMap<(Currency, Currency), Decimal>,
}

impl ExchangeRateTable {
    /// Builds a table from one-directional pairs, deriving inverses.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidExchangeRate` for a non-positive rate.
    pub fn from_pairs(
        pairs: impl IntoIterator<Item = (Currency, Currency, Decimal)>,
    ) -> Result<Self, LedgerError> {
        let mut rates = HashMap::new();
        for (from, to, rate) in pairs {
            if rate <= Decimal::ZERO {
                return Err(LedgerError::InvalidExchangeRate { from, to, rate });
            }
            rates.insert((from, to), rate);
        }

        let derived: Vec<((Currency, Currency), Decimal)> = rates
            .iter()
            .map(|(&(from, to), &rate)| {
                let inverse = (Decimal::ONE / rate)
                    .round_dp_with_strategy(INVERSE_RATE_SCALE, RoundingStrategy::ToZero);
                ((to, from), inverse)
            })
            .collect();
        for (pair, inverse) in derived {
            rates.entry(pair).or_insert(inverse);
        }

        Ok(Self { rates })
    }

    /// Builds a table from configured rate pairs.
    pub fn from_config(pairs: &[RatePairConfig]) -> Result<Self, LedgerError> {
        Self::from_pairs(pairs.iter().map(|p| (p.from, p.to, p.rate)))
    }

    /// The static rate fixture used by local profiles. Covers every pair of
    /// the supported currency set in at least one direction.
    #[must_use]
    pub fn builtin() -> Self {
        use Currency::{Aed, Eur, Gbp, Pln, Ron, Usd};

        let dec = |mantissa: i64| Decimal::new(mantissa, 4);
        let pairs = [
            (Pln, Eur, dec(2_222)),
            (Pln, Usd, dec(2_677)),
            (Pln, Gbp, dec(2_117)),
            (Pln, Aed, dec(9_830)),
            (Pln, Ron, dec(10_860)),
            (Eur, Usd, dec(12_043)),
            (Eur, Gbp, dec(9_520)),
            (Eur, Aed, dec(44_221)),
            (Eur, Ron, dec(48_720)),
            (Usd, Gbp, dec(7_910)),
            (Usd, Aed, dec(36_725)),
            (Usd, Ron, dec(40_400)),
            (Gbp, Aed, dec(46_440)),
            (Gbp, Ron, dec(51_100)),
            (Aed, Ron, dec(11_000)),
        ];

        // All rates in the fixture are positive, from_pairs cannot fail.
        match Self::from_pairs(pairs) {
            Ok(table) => table,
            Err(_) => unreachable!("builtin rate fixture contains only positive rates"),
        }
    }

    /// Looks up the rate for an ordered pair.
    #[must_use]
    pub fn lookup(&self, from: Currency, to: Currency) -> Option<Decimal> {
        self.rates.get(&(from, to)).copied()
    }

    /// Number of directed pairs in the table, derived inverses included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// Returns true if the table holds no rates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}
