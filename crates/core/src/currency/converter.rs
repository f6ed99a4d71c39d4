//! Currency conversion into the ledger's reporting currency.
//!
//! CRITICAL: Conversion truncates toward zero at 2 decimal places, matching
//! the Money scale. A missing rate pair is a configuration defect, not user
//! input error.

use rust_decimal::Decimal;

use finledger_shared::types::{money, Currency, Money};

use super::rate_table::ExchangeRateTable;
use crate::ledger::error::LedgerError;

/// Converts amounts between currencies using an injected rate table.
#[derive(Debug, Clone)]
pub struct CurrencyConverter {
    table: ExchangeRateTable,
}

impl CurrencyConverter {
    /// Creates a converter over the given rate table.
    #[must_use]
    pub const fn new(table: ExchangeRateTable) -> Self {
        Self { table }
    }

    /// Converts a scalar amount from one currency to another.
    ///
    /// Identity when `from == to`; otherwise `amount * rate` truncated to
    /// 2 decimal places.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::MissingExchangeRate` if the pair is not in the
    /// table.
    pub fn convert_amount(
        &self,
        from: Currency,
        to: Currency,
        amount: Decimal,
    ) -> Result<Decimal, LedgerError> {
        if from == to {
            return Ok(amount);
        }

        let rate = self
            .table
            .lookup(from, to)
            .ok_or(LedgerError::MissingExchangeRate { from, to })?;
        Ok(money::truncate(amount * rate))
    }

    /// Converts a money value into the target currency.
    pub fn convert(&self, value: &Money, target: Currency) -> Result<Money, LedgerError> {
        let amount = self.convert_amount(value.currency(), target, value.amount())?;
        Ok(Money::new(amount, target))
    }
}
