use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;

use propsource_core::Currency;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Returns calculator
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_returns(input_json: String) -> NapiResult<String> {
    let input: propsource_core::calculator::CalculatorRequest =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = propsource_core::calculator::calculate(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn payment_sensitivity(input_json: String) -> NapiResult<String> {
    let input: propsource_core::sensitivity::PaymentSensitivityInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        propsource_core::sensitivity::payment_sensitivity(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// Amounts cross the boundary as strings so no precision is lost to JS numbers.
#[napi]
pub fn format_currency(amount: String, currency: Option<String>) -> NapiResult<String> {
    let amount: Decimal = amount.trim().parse().map_err(to_napi_error)?;
    let currency: Currency = match currency {
        Some(code) => code.parse().map_err(to_napi_error)?,
        None => Currency::GBP,
    };
    Ok(propsource_core::formatting::format_currency_in(
        amount, &currency,
    ))
}
