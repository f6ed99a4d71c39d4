//! Exchange rates and currency conversion.

pub mod converter;
pub mod rate_table;

#[cfg(test)]
mod props;

pub use converter::CurrencyConverter;
pub use rate_table::ExchangeRateTable;
