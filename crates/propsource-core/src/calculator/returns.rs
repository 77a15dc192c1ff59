use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::config::{CalculatorConfig, MAX_INTEREST_RATE, MAX_PURCHASE_PRICE};
use crate::error::PropSourceError;
use crate::formatting::format_currency_in;
use crate::types::{with_metadata, ComputationOutput, Currency, Money, Percentage};
use crate::PropSourceResult;

const HUNDRED: Decimal = dec!(100);
const MONTHS_PER_YEAR: Decimal = dec!(12);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// The three user-adjustable inputs of the calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatorInput {
    /// Property purchase price
    pub purchase_price: Money,
    /// Annual nominal interest rate in percentage points (5.0 = 5%)
    pub interest_rate_percent: Percentage,
    /// Financed share of the purchase price, 0 to 100
    pub loan_to_value_percent: Percentage,
}

/// Interest-only mortgage economics derived from a `CalculatorInput`.
///
/// Values are kept at full decimal precision. Round only for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatorResult {
    /// Equity put down: price * (100 - LTV) / 100
    pub deposit: Money,
    /// Amount borrowed: price - deposit
    pub loan_amount: Money,
    /// Interest due each month; constant because principal never amortises
    pub monthly_interest_only_payment: Money,
    /// Interest due each year on the loan
    pub annual_interest_payment: Money,
}

/// Display copy of a `CalculatorResult`, whole currency units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormattedResult {
    pub deposit: String,
    pub loan_amount: String,
    pub monthly_interest_only_payment: String,
    pub annual_interest_payment: String,
}

/// Immutable calculator snapshot. Setters return a new snapshot and leave
/// the receiver untouched, so a rejected update cannot corrupt valid state.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculatorState {
    config: CalculatorConfig,
    input: CalculatorInput,
}

/// One-shot request used by the CLI and bindings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculatorRequest {
    /// Listed property price from the hosting application
    pub purchase_price: Money,
    /// Interest rate to apply after creation (config default if absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_rate_percent: Option<Percentage>,
    /// Loan-to-value to apply after creation (config default if absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loan_to_value_percent: Option<Percentage>,
    #[serde(default)]
    pub config: CalculatorConfig,
}

/// Result of a one-shot calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculatorOutput {
    /// Inputs actually used, after clamping
    pub input: CalculatorInput,
    pub result: CalculatorResult,
    pub formatted: FormattedResult,
    pub currency: Currency,
}

// ---------------------------------------------------------------------------
// Derivation
// ---------------------------------------------------------------------------

impl CalculatorInput {
    /// Check `0 < purchase_price <= MAX_PURCHASE_PRICE`,
    /// `0 <= interest_rate_percent <= MAX_INTEREST_RATE` and
    /// `0 <= loan_to_value_percent <= 100`.
    pub fn validate(&self) -> PropSourceResult<()> {
        if self.purchase_price <= Decimal::ZERO {
            return Err(PropSourceError::InvalidInput {
                field: "purchase_price".into(),
                reason: "Purchase price must be positive".into(),
            });
        }
        if self.purchase_price > MAX_PURCHASE_PRICE {
            return Err(PropSourceError::InvalidInput {
                field: "purchase_price".into(),
                reason: format!("Purchase price cannot exceed {MAX_PURCHASE_PRICE}"),
            });
        }
        if self.interest_rate_percent < Decimal::ZERO {
            return Err(PropSourceError::InvalidInput {
                field: "interest_rate_percent".into(),
                reason: "Interest rate cannot be negative".into(),
            });
        }
        if self.interest_rate_percent > MAX_INTEREST_RATE {
            return Err(PropSourceError::InvalidInput {
                field: "interest_rate_percent".into(),
                reason: format!("Interest rate cannot exceed {MAX_INTEREST_RATE}"),
            });
        }
        if self.loan_to_value_percent < Decimal::ZERO || self.loan_to_value_percent > HUNDRED {
            return Err(PropSourceError::InvalidInput {
                field: "loan_to_value_percent".into(),
                reason: "Loan-to-value must be between 0 and 100".into(),
            });
        }
        Ok(())
    }
}

/// Validate the inputs, then derive deposit, loan and interest-only payments.
///
/// The loan is taken as `price - deposit` so the two always sum to the price
/// exactly. Nothing is rounded here.
pub fn compute_result(input: &CalculatorInput) -> PropSourceResult<CalculatorResult> {
    input.validate()?;
    Ok(derive(input))
}

// Callers must pass validated input; the bounds keep every product in range.
fn derive(input: &CalculatorInput) -> CalculatorResult {
    let deposit = input.purchase_price * (HUNDRED - input.loan_to_value_percent) / HUNDRED;
    let loan_amount = input.purchase_price - deposit;
    let annual_interest_payment = loan_amount * input.interest_rate_percent / HUNDRED;
    let monthly_interest_only_payment = annual_interest_payment / MONTHS_PER_YEAR;

    log::trace!(
        "recomputed: price={} rate={} ltv={} -> monthly={}",
        input.purchase_price,
        input.interest_rate_percent,
        input.loan_to_value_percent,
        monthly_interest_only_payment
    );

    CalculatorResult {
        deposit,
        loan_amount,
        monthly_interest_only_payment,
        annual_interest_payment,
    }
}

impl FormattedResult {
    pub fn from_result(result: &CalculatorResult, currency: &Currency) -> Self {
        Self {
            deposit: format_currency_in(result.deposit, currency),
            loan_amount: format_currency_in(result.loan_amount, currency),
            monthly_interest_only_payment: format_currency_in(
                result.monthly_interest_only_payment,
                currency,
            ),
            annual_interest_payment: format_currency_in(result.annual_interest_payment, currency),
        }
    }
}

// ---------------------------------------------------------------------------
// CalculatorState
// ---------------------------------------------------------------------------

impl CalculatorState {
    /// Start a calculator for a property at `initial_purchase_price` with the
    /// default configuration (5.0% interest, 75% LTV).
    pub fn create(initial_purchase_price: Money) -> PropSourceResult<Self> {
        Self::with_config(initial_purchase_price, CalculatorConfig::default())
    }

    /// Start a calculator with an explicit configuration.
    ///
    /// The initial price is taken as given, not clamped to the slider range.
    pub fn with_config(
        initial_purchase_price: Money,
        config: CalculatorConfig,
    ) -> PropSourceResult<Self> {
        config.validate()?;
        let input = CalculatorInput {
            purchase_price: initial_purchase_price,
            interest_rate_percent: config.default_interest_rate,
            loan_to_value_percent: config.default_loan_to_value,
        };
        input.validate()?;
        Ok(Self { config, input })
    }

    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    pub fn input(&self) -> &CalculatorInput {
        &self.input
    }

    pub fn set_purchase_price(&self, value: Money) -> PropSourceResult<Self> {
        let purchase_price =
            self.config
                .purchase_price
                .apply("purchase_price", value, self.config.range_policy)?;
        Ok(self.with_input(CalculatorInput {
            purchase_price,
            ..self.input.clone()
        }))
    }

    pub fn set_interest_rate(&self, value: Percentage) -> PropSourceResult<Self> {
        let interest_rate_percent = self.config.interest_rate.apply(
            "interest_rate_percent",
            value,
            self.config.range_policy,
        )?;
        Ok(self.with_input(CalculatorInput {
            interest_rate_percent,
            ..self.input.clone()
        }))
    }

    pub fn set_loan_to_value(&self, value: Percentage) -> PropSourceResult<Self> {
        let loan_to_value_percent = self.config.loan_to_value.apply(
            "loan_to_value_percent",
            value,
            self.config.range_policy,
        )?;
        Ok(self.with_input(CalculatorInput {
            loan_to_value_percent,
            ..self.input.clone()
        }))
    }

    /// Restore the price and the configured rate and LTV defaults.
    pub fn reset(&self, original_purchase_price: Money) -> PropSourceResult<Self> {
        Self::with_config(original_purchase_price, self.config.clone())
    }

    /// Derived result for the current inputs. Pure; safe to call repeatedly.
    pub fn result(&self) -> CalculatorResult {
        derive(&self.input)
    }

    pub fn formatted_result(&self) -> FormattedResult {
        FormattedResult::from_result(&self.result(), &self.config.currency)
    }

    fn with_input(&self, input: CalculatorInput) -> Self {
        Self {
            config: self.config.clone(),
            input,
        }
    }
}

// ---------------------------------------------------------------------------
// One-shot calculation
// ---------------------------------------------------------------------------

/// Create a calculator from a request, apply any supplied rate and LTV, and
/// return the result wrapped in the standard output envelope.
pub fn calculate(
    request: &CalculatorRequest,
) -> PropSourceResult<ComputationOutput<CalculatorOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let mut state = CalculatorState::with_config(request.purchase_price, request.config.clone())?;

    if !state.config.price_in_range(request.purchase_price) {
        warnings.push(format!(
            "Purchase price {} lies outside the supported range {} to {}",
            request.purchase_price,
            state.config.purchase_price.min,
            state.config.purchase_price.max
        ));
    }

    if let Some(rate) = request.interest_rate_percent {
        state = state.set_interest_rate(rate)?;
        note_adjustment(
            &mut warnings,
            "Interest rate",
            rate,
            state.input.interest_rate_percent,
        );
    }

    if let Some(ltv) = request.loan_to_value_percent {
        state = state.set_loan_to_value(ltv)?;
        note_adjustment(
            &mut warnings,
            "Loan-to-value",
            ltv,
            state.input.loan_to_value_percent,
        );
    }

    if state.input.loan_to_value_percent == HUNDRED {
        warnings.push("Loan-to-value is 100%: the purchase is fully financed with no deposit".into());
    } else if state.input.loan_to_value_percent.is_zero() {
        warnings.push("Loan-to-value is 0%: cash purchase, no mortgage payment".into());
    }

    let result = state.result();
    let formatted = FormattedResult::from_result(&result, &state.config.currency);

    let output = CalculatorOutput {
        input: state.input.clone(),
        result,
        formatted,
        currency: state.config.currency.clone(),
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Interest-Only Mortgage Returns",
        request,
        warnings,
        elapsed,
        output,
    ))
}

fn note_adjustment(warnings: &mut Vec<String>, label: &str, requested: Decimal, used: Decimal) {
    if requested != used {
        warnings.push(format!("{label} {requested} adjusted to {used} to fit the supported range and step"));
    }
}
