//! Price lookups against the pricing table.

#![allow(clippy::print_stdout)]

use curbside_core::pricing::{FALLBACK_SIZE, price_for_key};
use curbside_core::{DumpsterSize, Price, RentalDays, RentalDaysError};
use tracing::warn;

/// Rental lengths shown by `price --table`.
const TABLE_DAYS: [u32; 5] = [1, 7, 14, 21, 30];

/// One priced line, e.g. `20 Yard Dumpster, 14 days: $675.00`.
fn describe(label: &str, days: RentalDays, price: Price) -> String {
    let n = days.get();
    let unit = if n == 1 { "day" } else { "days" };
    format!("{label}, {n} {unit}: {price}")
}

/// Price one size for one rental length.
///
/// # Errors
///
/// Returns an error if `days` is outside the bookable range.
pub fn quote(size: &str, days: u32) -> Result<(), RentalDaysError> {
    let days = RentalDays::new(days)?;
    let label = match DumpsterSize::from_key(size) {
        Some(known) => known.label(),
        None => {
            warn!(size, fallback = FALLBACK_SIZE.key(), "Unknown size, using fallback pricing");
            FALLBACK_SIZE.label()
        }
    };

    println!("{}", describe(label, days, price_for_key(size, days)));
    Ok(())
}

/// Print every size at the common rental lengths.
pub fn table() {
    let header: Vec<String> = TABLE_DAYS.iter().map(|d| format!("{d:>10}d")).collect();
    println!("{:<24}{}", "Size", header.join(""));

    for size in DumpsterSize::ALL {
        let cells: Vec<String> = TABLE_DAYS
            .iter()
            .filter_map(|&d| RentalDays::new(d).ok())
            .map(|days| format!("{:>11}", size.price(days).display()))
            .collect();
        println!("{:<24}{}", size.label(), cells.join(""));
    }
}
