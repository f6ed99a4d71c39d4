//! Money type with decimal precision and currency.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts are kept at exactly 2 fractional digits and every construction
//! and arithmetic result is truncated toward zero, never rounded up.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use thiserror::Error;

/// Scale every amount is stored at.
const MONEY_SCALE: u32 = 2;

/// Errors raised by money construction and arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    /// Binary operations require both operands to share a currency.
    #[error("Cannot combine {left} with {right}: currencies differ")]
    CurrencyMismatch {
        /// Currency of the left operand.
        left: Currency,
        /// Currency of the right operand.
        right: Currency,
    },

    /// The amount string could not be parsed as a decimal.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// The currency code is not part of the supported set.
    #[error("Invalid currency {0}")]
    UnknownCurrency(String),

    /// Division by zero.
    #[error("Cannot divide money by zero")]
    DivisionByZero,
}

/// Currency codes supported by the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Polish Zloty
    Pln,
    /// US Dollar
    Usd,
    /// UAE Dirham
    Aed,
    /// Euro
    Eur,
    /// British Pound
    Gbp,
    /// Romanian Leu
    Ron,
}

impl Currency {
    /// All supported currencies.
    pub const ALL: [Self; 6] = [
        Self::Pln,
        Self::Usd,
        Self::Aed,
        Self::Eur,
        Self::Gbp,
        Self::Ron,
    ];
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pln => write!(f, "PLN"),
            Self::Usd => write!(f, "USD"),
            Self::Aed => write!(f, "AED"),
            Self::Eur => write!(f, "EUR"),
            Self::Gbp => write!(f, "GBP"),
            Self::Ron => write!(f, "RON"),
        }
    }
}

impl std::str::FromStr for Currency {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PLN" => Ok(Self::Pln),
            "USD" => Ok(Self::Usd),
            "AED" => Ok(Self::Aed),
            "EUR" => Ok(Self::Eur),
            "GBP" => Ok(Self::Gbp),
            "RON" => Ok(Self::Ron),
            other => Err(MoneyError::UnknownCurrency(other.to_string())),
        }
    }
}

/// An immutable monetary amount tagged with its currency.
///
/// The amount always carries exactly 2 fractional digits; excess digits are
/// dropped toward zero (0.019 stores as 0.01, -0.019 as -0.01).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    amount: Decimal,
    currency: Currency,
}

impl Money {
    /// Creates a new amount, truncating to the canonical 2-decimal scale.
    #[must_use]
    pub fn new(amount: Decimal, currency: Currency) -> Self {
        Self {
            amount: truncate(amount),
            currency,
        }
    }

    /// Parses an amount string in the given currency.
    pub fn of(amount: &str, currency: Currency) -> Result<Self, MoneyError> {
        let parsed: Decimal = amount
            .parse()
            .map_err(|_| MoneyError::InvalidAmount(amount.to_string()))?;
        Ok(Self::new(parsed, currency))
    }

    /// Zero in the given currency.
    #[must_use]
    pub fn zero(currency: Currency) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency,
        }
    }

    /// The amount at 2-decimal scale.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.amount
    }

    /// The currency tag.
    #[must_use]
    pub const fn currency(&self) -> Currency {
        self.currency
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Returns true if the amount is negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    /// Adds another amount of the same currency.
    pub fn add(&self, other: &Self) -> Result<Self, MoneyError> {
        self.require_same_currency(other)?;
        Ok(Self::new(self.amount + other.amount, self.currency))
    }

    /// Subtracts another amount of the same currency.
    pub fn subtract(&self, other: &Self) -> Result<Self, MoneyError> {
        self.require_same_currency(other)?;
        Ok(Self::new(self.amount - other.amount, self.currency))
    }

    /// Multiplies the amount by a scalar, truncating the result.
    #[must_use]
    pub fn multiply(&self, multiplier: Decimal) -> Self {
        Self::new(self.amount * multiplier, self.currency)
    }

    /// Divides the amount by a scalar, truncating the result.
    pub fn divide(&self, divisor: Decimal) -> Result<Self, MoneyError> {
        if divisor.is_zero() {
            return Err(MoneyError::DivisionByZero);
        }
        Ok(Self::new(self.amount / divisor, self.currency))
    }

    /// Flips the sign of the amount.
    #[must_use]
    pub fn negate(&self) -> Self {
        Self::new(-self.amount, self.currency)
    }

    /// Orders two amounts of the same currency.
    pub fn compare(&self, other: &Self) -> Result<Ordering, MoneyError> {
        self.require_same_currency(other)?;
        Ok(self.amount.cmp(&other.amount))
    }

    fn require_same_currency(&self, other: &Self) -> Result<(), MoneyError> {
        if self.currency == other.currency {
            Ok(())
        } else {
            Err(MoneyError::CurrencyMismatch {
                left: self.currency,
                right: other.currency,
            })
        }
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

/// Truncates a decimal toward zero at the canonical money scale.
#[must_use]
pub fn truncate(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::ToZero)
}
