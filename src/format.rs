//! Display formatting for prices, magnitudes and percentages
//!
//! Every function here is pure and total over finite input. Negative prices
//! and magnitudes keep their sign in front of the currency symbol (`-$1.50`);
//! NaN and infinities render as `-`.

use crate::constants::CURRENCY_SYMBOL;
use chrono::NaiveDate;

const PLACEHOLDER: &str = "-";

/// Magnitude bands for market cap and volume, largest first
const MAGNITUDE_SCALES: [(f64, &str); 4] = [(1e12, "T"), (1e9, "B"), (1e6, "M"), (1e3, "K")];

/// Formats a price with precision that depends on its size
///
/// | value             | output           |
/// |-------------------|------------------|
/// | `>= 1000`         | `$43,521`        |
/// | `1 ..< 1000`      | `$145.00`        |
/// | `0.01 ..< 1`      | `$0.4500`        |
/// | `< 0.01`          | `$0.00001800`    |
pub fn format_price(value: f64) -> String {
    if !value.is_finite() {
        return PLACEHOLDER.to_string();
    }
    if value < 0.0 {
        return format!("-{}", format_price(-value));
    }

    if value >= 1000.0 {
        format!("{}{}", CURRENCY_SYMBOL, group_thousands(value))
    } else if value >= 1.0 {
        format!("{}{:.2}", CURRENCY_SYMBOL, value)
    } else if value >= 0.01 {
        format!("{}{:.4}", CURRENCY_SYMBOL, value)
    } else {
        format!("{}{:.8}", CURRENCY_SYMBOL, value)
    }
}

/// Formats a market cap or volume with a T/B/M/K suffix
///
/// Uses the first scale the value meets or exceeds; below 1e3 the value is
/// shown as a grouped integer with no suffix. The band is picked from the raw
/// value before rounding, so `999.6` renders as `$1,000` rather than `$1.00K`.
pub fn format_magnitude(value: f64) -> String {
    if !value.is_finite() {
        return PLACEHOLDER.to_string();
    }
    if value < 0.0 {
        return format!("-{}", format_magnitude(-value));
    }

    for (scale, suffix) in MAGNITUDE_SCALES {
        if value >= scale {
            return format!("{}{:.2}{}", CURRENCY_SYMBOL, value / scale, suffix);
        }
    }

    format!("{}{}", CURRENCY_SYMBOL, group_thousands(value))
}

/// Formats the absolute value of a percentage change
///
/// The sign is deliberately dropped; callers convey direction with
/// `view::row::ChangeIndicator`.
pub fn format_percent(value: f64) -> String {
    if !value.is_finite() {
        return PLACEHOLDER.to_string();
    }
    format!("{:.2}%", value.abs())
}

/// Formats a market dominance share, one fractional digit
pub fn format_dominance(value: f64) -> String {
    if !value.is_finite() {
        return PLACEHOLDER.to_string();
    }
    format!("{:.1}%", value)
}

/// Chart x-axis label, e.g. `16 Oct`
pub fn format_axis_date(date: NaiveDate) -> String {
    date.format("%-d %b").to_string()
}

/// Rounds to an integer and inserts thousands separators
pub fn group_thousands(value: f64) -> String {
    let rounded = format!("{:.0}", value.abs());
    let mut grouped = String::with_capacity(rounded.len() + rounded.len() / 3);

    for (i, ch) in rounded.chars().enumerate() {
        if i > 0 && (rounded.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if value < 0.0 && rounded != "0" {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fractional_digits(s: &str) -> usize {
        s.split_once('.').map(|(_, frac)| frac.len()).unwrap_or(0)
    }

    #[test]
    fn test_price_examples() {
        assert_eq!(format_price(43521.0), "$43,521");
        assert_eq!(format_price(1.0), "$1.00");
        assert_eq!(format_price(0.000018), "$0.00001800");
        assert_eq!(format_price(0.45), "$0.4500");
        assert_eq!(format_price(145.0), "$145.00");
    }

    #[test]
    fn test_price_band_boundaries() {
        assert_eq!(format_price(1000.0), "$1,000");
        assert_eq!(fractional_digits(&format_price(1000.0)), 0);
        assert_eq!(fractional_digits(&format_price(999.5)), 2);
        assert_eq!(format_price(0.01), "$0.0100");
        assert_eq!(fractional_digits(&format_price(0.0099)), 8);
        assert_eq!(format_price(0.0), "$0.00000000");
    }

    #[test]
    fn test_price_band_precision() {
        for (value, digits) in [
            (1_234_567.89, 0),
            (12.3456, 2),
            (0.5, 4),
            (0.000_000_034_2, 8),
        ] {
            assert_eq!(fractional_digits(&format_price(value)), digits, "{}", value);
        }
    }

    #[test]
    fn test_magnitude_examples() {
        assert_eq!(format_magnitude(1.24e12), "$1.24T");
        assert_eq!(format_magnitude(48.8e9), "$48.80B");
        assert_eq!(format_magnitude(500.0), "$500");
    }

    #[test]
    fn test_magnitude_boundaries() {
        assert_eq!(format_magnitude(1e12), "$1.00T");
        assert_eq!(format_magnitude(1e9), "$1.00B");
        assert_eq!(format_magnitude(1e6), "$1.00M");
        assert_eq!(format_magnitude(1e3), "$1.00K");
        assert_eq!(format_magnitude(999.0), "$999");
        assert_eq!(format_magnitude(0.0), "$0");
    }

    #[test]
    fn test_magnitude_band_chosen_before_rounding() {
        assert_eq!(format_magnitude(999.6), "$1,000");
        assert_eq!(format_magnitude(999_999.0), "$1000.00K");
        assert_eq!(format_magnitude(-999.6), "-$1,000");
    }

    #[test]
    fn test_percent_drops_sign() {
        assert_eq!(format_percent(2.5), "2.50%");
        assert_eq!(format_percent(-3.8), "3.80%");
        assert_eq!(format_percent(0.0), "0.00%");
    }

    #[test]
    fn test_negative_and_non_finite() {
        assert_eq!(format_price(-1.5), "-$1.50");
        assert_eq!(format_magnitude(-2e9), "-$2.00B");
        assert_eq!(format_price(f64::NAN), "-");
        assert_eq!(format_magnitude(f64::INFINITY), "-");
        assert_eq!(format_percent(f64::NAN), "-");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0.0), "0");
        assert_eq!(group_thousands(999.0), "999");
        assert_eq!(group_thousands(1_000_000.0), "1,000,000");
        assert_eq!(group_thousands(852_975_942_335.0), "852,975,942,335");
    }

    #[test]
    fn test_dominance_and_axis_date() {
        assert_eq!(format_dominance(52.3), "52.3%");
        let date = NaiveDate::from_ymd_opt(2026, 10, 6).unwrap();
        assert_eq!(format_axis_date(date), "6 Oct");
    }
}
