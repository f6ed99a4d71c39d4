//! Property-based tests for money truncation and currency conversion.

use proptest::prelude::*;
use rust_decimal::Decimal;

use finledger_shared::types::{Currency, Money};

use super::converter::CurrencyConverter;
use super::rate_table::ExchangeRateTable;

/// Strategy to generate amounts between -1,000,000.00 and 1,000,000.00
/// with up to 4 fractional digits.
fn any_amount() -> impl Strategy<Value = Decimal> {
    (-10_000_000_000i64..10_000_000_000i64).prop_map(|v| Decimal::new(v, 4))
}

/// Strategy to generate positive rates (0.0001 to 10000.0000).
fn positive_rate() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|v| Decimal::new(v, 4))
}

/// Strategy to pick a currency.
fn any_currency() -> impl Strategy<Value = Currency> {
    prop::sample::select(Currency::ALL.to_vec())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Every constructed Money value carries at most 2 fractional digits
    /// and its magnitude never grows (truncation, not rounding).
    #[test]
    fn prop_money_truncation_invariant(amount in any_amount(), currency in any_currency()) {
        let money = Money::new(amount, currency);
        prop_assert!(money.amount().scale() <= 2);
        prop_assert!(money.amount().abs() <= amount.abs());
        // At most one cent below the raw value.
        prop_assert!((amount.abs() - money.amount().abs()) < Decimal::new(1, 2));
    }

    /// Converting A->A returns the amount unchanged.
    #[test]
    fn prop_identity_conversion(amount in any_amount(), currency in any_currency()) {
        let converter = CurrencyConverter::new(ExchangeRateTable::builtin());
        let result = converter.convert_amount(currency, currency, amount).unwrap();
        prop_assert_eq!(result, amount);
    }

    /// A round trip through a derived inverse rate lands within the
    /// tolerance of two successive 2-decimal truncations.
    #[test]
    fn prop_rate_inversion_round_trip(
        cents in 1i64..100_000_000i64,
        rate in positive_rate(),
    ) {
        let amount = Decimal::new(cents, 2);
        let table = ExchangeRateTable::from_pairs([
            (Currency::Pln, Currency::Usd, rate),
        ]).unwrap();
        let converter = CurrencyConverter::new(table);

        let there = converter.convert_amount(Currency::Pln, Currency::Usd, amount).unwrap();
        let back = converter.convert_amount(Currency::Usd, Currency::Pln, there).unwrap();

        // Truncation loses up to one cent per hop; the derived inverse rate
        // is itself truncated at 5 decimals, which scales with the amount.
        let inverse_loss = amount * Decimal::new(1, 5) * rate;
        let tolerance = Decimal::new(2, 2) + (Decimal::new(1, 2) / rate) + inverse_loss;
        prop_assert!(
            (back - amount).abs() <= tolerance,
            "amount={amount} rate={rate} there={there} back={back} tolerance={tolerance}"
        );
    }

    /// Conversion never manufactures precision beyond 2 decimals.
    #[test]
    fn prop_converted_scale_is_two(amount in any_amount(), rate in positive_rate()) {
        let table = ExchangeRateTable::from_pairs([
            (Currency::Eur, Currency::Aed, rate),
        ]).unwrap();
        let converter = CurrencyConverter::new(table);
        let result = converter.convert_amount(Currency::Eur, Currency::Aed, amount).unwrap();
        prop_assert!(result.scale() <= 2);
    }
}
