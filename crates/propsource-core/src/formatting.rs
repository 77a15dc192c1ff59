use rust_decimal::{Decimal, RoundingStrategy};

use crate::types::{Currency, Money};

/// Render an amount as whole pounds sterling, e.g. `£1,234,567`.
pub fn format_currency(amount: Money) -> String {
    format_currency_in(amount, &Currency::GBP)
}

/// Render an amount in the given currency with no decimal places.
///
/// Rounds half away from zero, groups thousands with commas and prefixes the
/// currency symbol. Negative amounts carry a leading minus sign before the
/// symbol (`-£1,235`); an amount that rounds to zero is always unsigned.
pub fn format_currency_in(amount: Money, currency: &Currency) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded < Decimal::ZERO;
    let digits = rounded.abs().trunc().to_string();

    let mut out = String::with_capacity(digits.len() + 8);
    if negative {
        out.push('-');
    }
    out.push_str(&currency.symbol());
    out.push_str(&group_thousands(&digits));
    out
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_rounds_half_away_from_zero() {
        assert_eq!(format_currency(dec!(937.5)), "£938");
        assert_eq!(format_currency(dec!(937.49)), "£937");
        assert_eq!(format_currency(dec!(-1234.5)), "-£1,235");
    }

    #[test]
    fn test_thousands_grouping() {
        assert_eq!(format_currency(dec!(0)), "£0");
        assert_eq!(format_currency(dec!(999)), "£999");
        assert_eq!(format_currency(dec!(1000)), "£1,000");
        assert_eq!(format_currency(dec!(75000)), "£75,000");
        assert_eq!(format_currency(dec!(225000)), "£225,000");
        assert_eq!(format_currency(dec!(1234567.49)), "£1,234,567");
    }

    #[test]
    fn test_tiny_negative_is_unsigned_zero() {
        assert_eq!(format_currency(dec!(-0.4)), "£0");
    }

    #[test]
    fn test_full_precision_payment() {
        // 100000 * 10% / 12 = 833.333...
        let payment = dec!(100000) * dec!(10) / dec!(100) / dec!(12);
        assert_eq!(format_currency(payment), "£833");
    }

    #[test]
    fn test_other_currencies() {
        assert_eq!(format_currency_in(dec!(1500), &Currency::USD), "$1,500");
        assert_eq!(format_currency_in(dec!(1500), &Currency::EUR), "€1,500");
        assert_eq!(format_currency_in(dec!(1500), &Currency::CHF), "CHF 1,500");
        assert_eq!(
            format_currency_in(dec!(-2500000), &Currency::Other("NOK".into())),
            "-NOK 2,500,000"
        );
    }
}
