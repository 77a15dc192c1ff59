use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use propsource_core::formatting;
use propsource_core::Currency;

/// Arguments for currency formatting
#[derive(Args)]
pub struct FormatCurrencyArgs {
    /// Amount to format
    #[arg(long, allow_hyphen_values = true)]
    pub amount: Decimal,

    /// Currency (ISO code, default GBP)
    #[arg(long, default_value = "GBP")]
    pub currency: Currency,
}

#[derive(Debug, Serialize)]
struct FormattedAmount {
    amount: Decimal,
    currency: Currency,
    formatted: String,
}

pub fn run_format_currency(args: FormatCurrencyArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let formatted = formatting::format_currency_in(args.amount, &args.currency);
    let out = FormattedAmount {
        amount: args.amount,
        currency: args.currency,
        formatted,
    };
    let mut envelope = serde_json::Map::new();
    envelope.insert("result".into(), serde_json::to_value(out)?);
    Ok(Value::Object(envelope))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_negative_sterling() {
        let value = run_format_currency(FormatCurrencyArgs {
            amount: dec!(-1234.5),
            currency: Currency::GBP,
        })
        .unwrap();
        assert_eq!(value["result"]["formatted"], "-£1,235");
    }
}
