//! Type-safe price representation using decimal arithmetic.

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A non-negative price, rounded to whole cents.
///
/// ```
/// use curbside_core::Price;
///
/// let price = Price::from_dollars(375);
/// assert_eq!(price.to_cents(), 37_500);
/// assert_eq!(price.display(), "$375.00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (dollars, not cents).
    amount: Decimal,
    /// ISO 4217 currency code.
    currency_code: CurrencyCode,
}

impl Price {
    /// Zero dollars.
    pub const ZERO: Self = Self {
        amount: Decimal::ZERO,
        currency_code: CurrencyCode::USD,
    };

    /// Create a USD price from an arbitrary decimal amount.
    ///
    /// Negative amounts clamp to zero and the amount is rounded half away
    /// from zero to two decimal places.
    #[must_use]
    pub fn new(amount: Decimal) -> Self {
        let amount = amount
            .max(Decimal::ZERO)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        Self {
            amount,
            currency_code: CurrencyCode::USD,
        }
    }

    /// Create a USD price from whole dollars.
    #[must_use]
    pub fn from_dollars(dollars: u32) -> Self {
        Self::new(Decimal::from(dollars))
    }

    /// The amount in dollars.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.amount
    }

    /// The currency of this price.
    #[must_use]
    pub const fn currency_code(&self) -> CurrencyCode {
        self.currency_code
    }

    /// The amount in cents, as payment processors expect it.
    #[must_use]
    pub fn to_cents(&self) -> i64 {
        let cents = self.amount * Decimal::ONE_HUNDRED;
        i64::try_from(cents.trunc()).unwrap_or(i64::MAX)
    }

    /// Format for display, e.g. `$375.00`.
    #[must_use]
    pub fn display(&self) -> String {
        format!("{}{:.2}", self.currency_code.symbol(), self.amount)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
}

impl CurrencyCode {
    /// Lowercase code, as the payment API expects it.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::USD => "usd",
        }
    }

    /// Display symbol.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::USD => "$",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rounds_to_cents() {
        let price = Price::new(Decimal::new(1_234_565, 4)); // 123.4565
        assert_eq!(price.amount(), Decimal::new(12_346, 2));
        assert_eq!(price.to_cents(), 12_346);
    }

    #[test]
    fn test_negative_clamps_to_zero() {
        let price = Price::new(Decimal::new(-500, 2));
        assert_eq!(price, Price::ZERO);
        assert_eq!(price.to_cents(), 0);
    }

    #[test]
    fn test_display() {
        assert_eq!(Price::from_dollars(244).display(), "$244.00");
        assert_eq!(Price::new(Decimal::new(995, 2)).to_string(), "$9.95");
        assert_eq!(CurrencyCode::USD.code(), "usd");
    }
}
