//! Dumpster sizes and rental-duration pricing.
//!
//! # Rules
//!
//! Prices are in whole dollars and depend on the size's base price and the
//! number of rental days:
//!
//! | days        | price                                   |
//! |-------------|-----------------------------------------|
//! | 1           | `round(base * 0.7)`                     |
//! | 2..=7       | `base`                                  |
//! | 30          | 30-day table, `600` if size not listed  |
//! | 8..=29, 31+ | `base + (days - 7) * ceil(base / 7)`    |
//!
//! An unknown size key is priced as the smallest standard size.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Price;

/// Price for a 30-day rental when the size has no 30-day rate.
pub const THIRTY_DAY_FALLBACK: u32 = 600;

/// Size used when a size key is not recognized.
pub const FALLBACK_SIZE: DumpsterSize = DumpsterSize::Ten;

/// Days included in the flat base price.
const BASE_PERIOD_DAYS: u32 = 7;

/// Roll-off dumpster SKUs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum DumpsterSize {
    /// 10 cubic yards.
    Ten,
    /// 15 cubic yards.
    Fifteen,
    /// 20 cubic yards.
    Twenty,
    /// 30 cubic yards.
    Thirty,
    /// 10 cubic yards, clean fill dirt only.
    TenDirt,
}

impl DumpsterSize {
    /// Every SKU, in display order.
    pub const ALL: [Self; 5] = [
        Self::Ten,
        Self::Fifteen,
        Self::Twenty,
        Self::Thirty,
        Self::TenDirt,
    ];

    /// The key used in forms, URLs and payment metadata.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Ten => "10",
            Self::Fifteen => "15",
            Self::Twenty => "20",
            Self::Thirty => "30",
            Self::TenDirt => "10-dirt",
        }
    }

    /// Customer-facing name.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Ten => "10 Yard Dumpster",
            Self::Fifteen => "15 Yard Dumpster",
            Self::Twenty => "20 Yard Dumpster",
            Self::Thirty => "30 Yard Dumpster",
            Self::TenDirt => "10 Yard Dirt Dumpster",
        }
    }

    /// Base price covering up to a week, in dollars.
    #[must_use]
    pub const fn base_price(&self) -> u32 {
        match self {
            Self::Ten | Self::TenDirt => 299,
            Self::Fifteen => 349,
            Self::Twenty => 375,
            Self::Thirty => 449,
        }
    }

    /// Monthly rate, only offered on the three standard roll-offs.
    #[must_use]
    pub const fn thirty_day_price(&self) -> Option<u32> {
        match self {
            Self::Ten => Some(525),
            Self::Fifteen => Some(575),
            Self::Twenty => Some(625),
            Self::Thirty | Self::TenDirt => None,
        }
    }

    /// Look up a size by its key. Surrounding whitespace and case are ignored.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim();
        Self::ALL
            .into_iter()
            .find(|size| size.key().eq_ignore_ascii_case(key))
    }

    /// Price this size for a rental period.
    #[must_use]
    pub fn price(&self, days: RentalDays) -> Price {
        tiered_price(self.base_price(), self.thirty_day_price(), days)
    }
}

impl fmt::Display for DumpsterSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Error for a size key that names no SKU.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown dumpster size: {0}")]
pub struct UnknownSize(pub String);

impl FromStr for DumpsterSize {
    type Err = UnknownSize;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s).ok_or_else(|| UnknownSize(s.to_owned()))
    }
}

impl TryFrom<String> for DumpsterSize {
    type Error = UnknownSize;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DumpsterSize> for &'static str {
    fn from(size: DumpsterSize) -> Self {
        size.key()
    }
}

/// A row of the static pricing table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingEntry {
    pub size: DumpsterSize,
    pub base_price: Price,
}

/// The static pricing table, one entry per SKU.
pub fn pricing_table() -> impl Iterator<Item = PricingEntry> {
    DumpsterSize::ALL.into_iter().map(|size| PricingEntry {
        size,
        base_price: Price::from_dollars(size.base_price()),
    })
}

/// Errors for a rental length outside the bookable range.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RentalDaysError {
    #[error("rental days must be a whole number")]
    NotANumber,
    #[error("rental must be at least {min} day")]
    TooShort { min: u32 },
    #[error("rental can be at most {max} days")]
    TooLong { max: u32 },
}

/// Number of rental days, bounded to what can be booked online.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct RentalDays(u32);

impl RentalDays {
    /// Shortest rental.
    pub const MIN: u32 = 1;
    /// Longest rental that can be booked online.
    pub const MAX: u32 = 365;
    /// The standard one-week rental.
    pub const WEEK: Self = Self(BASE_PERIOD_DAYS);

    /// Create a rental length.
    ///
    /// # Errors
    ///
    /// Returns an error if `days` is outside `1..=365`.
    pub const fn new(days: u32) -> Result<Self, RentalDaysError> {
        if days < Self::MIN {
            return Err(RentalDaysError::TooShort { min: Self::MIN });
        }
        if days > Self::MAX {
            return Err(RentalDaysError::TooLong { max: Self::MAX });
        }
        Ok(Self(days))
    }

    /// Parse a rental length from form input.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not an integer in `1..=365`.
    pub fn parse(s: &str) -> Result<Self, RentalDaysError> {
        let trimmed = s.trim();
        if trimmed.starts_with('-') {
            return Err(RentalDaysError::TooShort { min: Self::MIN });
        }
        let days: u32 = trimmed
            .parse()
            .map_err(|_| RentalDaysError::NotANumber)?;
        Self::new(days)
    }

    /// The number of days.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for RentalDays {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for RentalDays {
    type Error = RentalDaysError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RentalDays> for u32 {
    fn from(days: RentalDays) -> Self {
        days.0
    }
}

/// Price a known size for a rental period.
#[must_use]
pub fn price_for(size: DumpsterSize, days: RentalDays) -> Price {
    size.price(days)
}

/// Price a size key for a rental period.
///
/// Unknown keys are priced as [`FALLBACK_SIZE`] except on the 30-day tier,
/// where they get [`THIRTY_DAY_FALLBACK`].
#[must_use]
pub fn price_for_key(key: &str, days: RentalDays) -> Price {
    match DumpsterSize::from_key(key) {
        Some(size) => size.price(days),
        None => tiered_price(FALLBACK_SIZE.base_price(), None, days),
    }
}

/// Apply the duration tiers to a base price.
fn tiered_price(base: u32, thirty_day: Option<u32>, days: RentalDays) -> Price {
    let base = u64::from(base);
    let days = u64::from(days.get());
    let period = u64::from(BASE_PERIOD_DAYS);

    let dollars = match days {
        // 70% of base, rounded half up
        1 => (base * 7 + 5) / 10,
        d if d <= period => base,
        30 => u64::from(thirty_day.unwrap_or(THIRTY_DAY_FALLBACK)),
        d => base + (d - period) * base.div_ceil(period),
    };

    Price::new(dollars.into())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn days(n: u32) -> RentalDays {
        RentalDays::new(n).unwrap()
    }

    fn dollars(n: u32) -> Price {
        Price::from_dollars(n)
    }

    const STANDARD: [DumpsterSize; 3] = [
        DumpsterSize::Ten,
        DumpsterSize::Fifteen,
        DumpsterSize::Twenty,
    ];

    #[test]
    fn test_first_week_is_flat() {
        for size in DumpsterSize::ALL {
            for n in 2..=7 {
                assert_eq!(size.price(days(n)), dollars(size.base_price()), "{size} x {n}");
            }
        }
    }

    #[test]
    fn test_single_day_discount() {
        assert_eq!(DumpsterSize::Ten.price(days(1)), dollars(209)); // 209.3
        assert_eq!(DumpsterSize::Fifteen.price(days(1)), dollars(244)); // 244.3
        assert_eq!(DumpsterSize::Twenty.price(days(1)), dollars(263)); // 262.5
        assert_eq!(DumpsterSize::Thirty.price(days(1)), dollars(314)); // 314.3
        assert_eq!(DumpsterSize::TenDirt.price(days(1)), dollars(209));
    }

    #[test]
    fn test_thirty_day_table() {
        for size in STANDARD {
            assert_eq!(
                size.price(days(30)),
                dollars(size.thirty_day_price().unwrap())
            );
        }
        assert_eq!(DumpsterSize::Thirty.price(days(30)), dollars(600));
        assert_eq!(DumpsterSize::TenDirt.price(days(30)), dollars(600));
        assert_eq!(price_for_key("40", days(30)), dollars(600));
    }

    #[test]
    fn test_extension_beyond_a_week() {
        // ceil(375 / 7) = 54, ceil(349 / 7) = 50, ceil(299 / 7) = 43
        let cases = [
            (DumpsterSize::Twenty, 8, 375 + 54),
            (DumpsterSize::Twenty, 14, 375 + 7 * 54),
            (DumpsterSize::Twenty, 29, 375 + 22 * 54),
            (DumpsterSize::Fifteen, 8, 349 + 50),
            (DumpsterSize::Fifteen, 14, 349 + 7 * 50),
            (DumpsterSize::Fifteen, 29, 349 + 22 * 50),
            (DumpsterSize::Ten, 31, 299 + 24 * 43),
        ];
        for (size, n, expected) in cases {
            assert_eq!(size.price(days(n)), dollars(expected), "{size} x {n}");
        }
    }

    #[test]
    fn test_documented_scenarios() {
        assert_eq!(price_for_key("20", days(7)), dollars(375));
        assert_eq!(price_for_key("15", days(1)), dollars(244));
        assert_eq!(price_for_key("30", days(30)), dollars(600));
        assert_eq!(price_for_key("10-dirt", days(14)), dollars(600));
    }

    #[test]
    fn test_unknown_key_uses_smallest_size() {
        assert_eq!(price_for_key("mystery", days(5)), dollars(299));
        assert_eq!(price_for_key("", days(1)), dollars(209));
        assert_eq!(price_for_key("40", days(10)), dollars(299 + 3 * 43));
    }

    #[test]
    fn test_size_keys() {
        assert_eq!(DumpsterSize::from_key(" 10-DIRT "), Some(DumpsterSize::TenDirt));
        assert_eq!("20".parse::<DumpsterSize>(), Ok(DumpsterSize::Twenty));
        assert!("25".parse::<DumpsterSize>().is_err());
        let json = serde_json::to_string(&DumpsterSize::TenDirt).unwrap();
        assert_eq!(json, "\"10-dirt\"");
    }

    #[test]
    fn test_rental_days_bounds() {
        assert_eq!(RentalDays::parse("7"), Ok(RentalDays::WEEK));
        assert_eq!(
            RentalDays::parse("0"),
            Err(RentalDaysError::TooShort { min: 1 })
        );
        assert_eq!(
            RentalDays::parse("-3"),
            Err(RentalDaysError::TooShort { min: 1 })
        );
        assert_eq!(
            RentalDays::parse("10000"),
            Err(RentalDaysError::TooLong { max: 365 })
        );
        assert_eq!(RentalDays::parse("two"), Err(RentalDaysError::NotANumber));
        assert_eq!(RentalDays::parse("365").unwrap().get(), 365);
    }

    #[test]
    fn test_pricing_table_covers_every_size() {
        let table: Vec<_> = pricing_table().collect();
        assert_eq!(table.len(), DumpsterSize::ALL.len());
        assert!(table.iter().all(|entry| entry.base_price > Price::ZERO));
    }
}
