//! Display formatting for prices and percentages

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

const THOUSAND: f64 = 1_000.0;
const MILLION: f64 = 1_000_000.0;
const BILLION: f64 = 1_000_000_000.0;

const SCALE: u32 = 2;

fn half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Two decimals, rounding the shortest decimal form of `value` half-up
fn two_decimals(value: f64) -> String {
    match Decimal::from_str(&value.to_string()) {
        Ok(decimal) => format!("{:.2}", half_up(decimal)),
        Err(_) => format!("{:.2}", value),
    }
}

/// Formats a USD amount with a K/M/B suffix, e.g. `$1.23B`
pub fn format_price(value: f64) -> String {
    if value >= BILLION {
        format!("${}B", two_decimals(value / BILLION))
    } else if value >= MILLION {
        format!("${}M", two_decimals(value / MILLION))
    } else if value >= THOUSAND {
        format!("${}K", two_decimals(value / THOUSAND))
    } else {
        format!("${}", two_decimals(value))
    }
}

/// Rounds the exact binary value half-up to two decimals and appends `%`
pub fn round_percentage(value: f64) -> String {
    match Decimal::from_f64_retain(value).or_else(|| Decimal::from_f64(value)) {
        Some(decimal) => format!("{:.2}%", half_up(decimal)),
        None => format!("{:.2}%", value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price_suffixes() {
        assert_eq!(format_price(0.5), "$0.50");
        assert_eq!(format_price(999.994), "$999.99");
        assert_eq!(format_price(1_000.0), "$1.00K");
        assert_eq!(format_price(30_000.0), "$30.00K");
        assert_eq!(format_price(2_500_000.0), "$2.50M");
        assert_eq!(format_price(600_000_000_000.0), "$600.00B");
    }

    #[test]
    fn test_format_price_rounds_half_up() {
        assert_eq!(format_price(1.005), "$1.01");
        assert_eq!(format_price(12_345.0), "$12.35K");
    }

    #[test]
    fn test_round_percentage() {
        assert_eq!(round_percentage(2.0), "2.00%");
        assert_eq!(round_percentage(-1.256), "-1.26%");
        assert_eq!(round_percentage(0.125), "0.13%");
        // 1.005 is stored as 1.00499999... so it rounds down
        assert_eq!(round_percentage(1.005), "1.00%");
    }
}
