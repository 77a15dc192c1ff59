use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::PropSourceError;
use crate::types::{Currency, Money, Percentage};
use crate::PropSourceResult;

/// Default annual interest rate applied when a calculator is created.
pub const DEFAULT_INTEREST_RATE: Percentage = dec!(5.0);

/// Default loan-to-value applied when a calculator is created.
pub const DEFAULT_LOAN_TO_VALUE: Percentage = dec!(75);

/// Largest purchase price the calculator accepts.
pub const MAX_PURCHASE_PRICE: Money = dec!(1000000000000000);

/// Largest interest rate the calculator accepts, in percentage points.
pub const MAX_INTEREST_RATE: Percentage = dec!(1000);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A bounded, stepped input range, mirroring a slider control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliderBounds {
    pub min: Decimal,
    pub max: Decimal,
    pub step: Decimal,
}

/// What a setter does with a value outside its slider bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangePolicy {
    /// Clamp to the bounds and snap to the nearest step
    #[default]
    Clamp,
    /// Return an error and leave the state unchanged
    Reject,
}

/// Calculator configuration. Every field has a default, so partial JSON or
/// YAML documents are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    /// Purchase price slider (currency units)
    pub purchase_price: SliderBounds,
    /// Interest rate slider (percentage points)
    pub interest_rate: SliderBounds,
    /// Loan-to-value slider (percentage points)
    pub loan_to_value: SliderBounds,
    /// Interest rate used on create and reset
    pub default_interest_rate: Percentage,
    /// Loan-to-value used on create and reset
    pub default_loan_to_value: Percentage,
    /// Out-of-range handling for setters
    pub range_policy: RangePolicy,
    /// Currency used for formatted output
    pub currency: Currency,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            purchase_price: SliderBounds {
                min: dec!(50000),
                max: dec!(1000000),
                step: dec!(1000),
            },
            interest_rate: SliderBounds {
                min: dec!(0.5),
                max: dec!(10.0),
                step: dec!(0.1),
            },
            loan_to_value: SliderBounds {
                min: dec!(0),
                max: dec!(100),
                step: dec!(5),
            },
            default_interest_rate: DEFAULT_INTEREST_RATE,
            default_loan_to_value: DEFAULT_LOAN_TO_VALUE,
            range_policy: RangePolicy::Clamp,
            currency: Currency::GBP,
        }
    }
}

// ---------------------------------------------------------------------------
// SliderBounds
// ---------------------------------------------------------------------------

impl SliderBounds {
    pub fn contains(&self, value: Decimal) -> bool {
        value >= self.min && value <= self.max
    }

    /// True when `value` sits on the step grid anchored at `min`.
    pub fn is_on_step(&self, value: Decimal) -> bool {
        if self.step <= Decimal::ZERO {
            return true;
        }
        value
            .checked_sub(self.min)
            .and_then(|offset| offset.checked_rem(self.step))
            .is_some_and(|rem| rem.is_zero())
    }

    /// Clamp into `[min, max]` and snap to the nearest step.
    ///
    /// A grid too fine to count in a `Decimal` leaves the clamped value as is.
    pub fn snap(&self, value: Decimal) -> Decimal {
        let clamped = value.max(self.min).min(self.max);
        if self.step <= Decimal::ZERO {
            return clamped;
        }
        let snapped = clamped
            .checked_sub(self.min)
            .and_then(|offset| offset.checked_div(self.step))
            .map(|steps| steps.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
            .and_then(|steps| steps.checked_mul(self.step))
            .and_then(|offset| self.min.checked_add(offset));
        let Some(snapped) = snapped else {
            return clamped;
        };
        // A grid point past max can only come from rounding up
        if snapped > self.max {
            (snapped - self.step).max(self.min)
        } else {
            snapped
        }
    }

    /// Resolve a setter value under the given policy.
    ///
    /// Returns the value the setter should store, or an error when the policy
    /// is `Reject` and the value is outside the bounds or off the step grid.
    pub fn apply(
        &self,
        field: &str,
        value: Decimal,
        policy: RangePolicy,
    ) -> PropSourceResult<Decimal> {
        match policy {
            RangePolicy::Clamp => {
                let snapped = self.snap(value);
                if snapped != value {
                    log::debug!("{field}: adjusted {value} to {snapped}");
                }
                Ok(snapped)
            }
            RangePolicy::Reject => {
                if !self.contains(value) {
                    log::debug!("{field}: rejected {value}, outside {}..={}", self.min, self.max);
                    return Err(PropSourceError::OutOfRange {
                        field: field.into(),
                        value,
                        min: self.min,
                        max: self.max,
                    });
                }
                if !self.is_on_step(value) {
                    return Err(PropSourceError::InvalidInput {
                        field: field.into(),
                        reason: format!(
                            "Value {value} is not on the {} step grid starting at {}",
                            self.step, self.min
                        ),
                    });
                }
                Ok(value)
            }
        }
    }

    fn validate(&self, field: &str) -> PropSourceResult<()> {
        if self.step <= Decimal::ZERO {
            return Err(PropSourceError::InvalidInput {
                field: format!("{field}.step"),
                reason: "Step must be positive".into(),
            });
        }
        if self.min > self.max {
            return Err(PropSourceError::InvalidInput {
                field: field.into(),
                reason: "Min must be <= max".into(),
            });
        }
        let steps = self
            .max
            .checked_sub(self.min)
            .and_then(|span| span.checked_div(self.step));
        if steps.is_none() {
            return Err(PropSourceError::InvalidInput {
                field: format!("{field}.step"),
                reason: "Step is too small for the range".into(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

impl CalculatorConfig {
    /// Check that the bounds are well formed and cannot produce an input that
    /// breaks the calculator invariants.
    pub fn validate(&self) -> PropSourceResult<()> {
        self.purchase_price.validate("purchase_price")?;
        self.interest_rate.validate("interest_rate")?;
        self.loan_to_value.validate("loan_to_value")?;

        if self.purchase_price.min <= Decimal::ZERO {
            return Err(PropSourceError::InvalidInput {
                field: "purchase_price.min".into(),
                reason: "Purchase price bounds must be positive".into(),
            });
        }
        if self.purchase_price.max > MAX_PURCHASE_PRICE {
            return Err(PropSourceError::InvalidInput {
                field: "purchase_price.max".into(),
                reason: format!("Purchase price bounds cannot exceed {MAX_PURCHASE_PRICE}"),
            });
        }
        if self.interest_rate.min < Decimal::ZERO {
            return Err(PropSourceError::InvalidInput {
                field: "interest_rate.min".into(),
                reason: "Interest rate bounds cannot be negative".into(),
            });
        }
        if self.interest_rate.max > MAX_INTEREST_RATE {
            return Err(PropSourceError::InvalidInput {
                field: "interest_rate.max".into(),
                reason: format!("Interest rate bounds cannot exceed {MAX_INTEREST_RATE}"),
            });
        }
        if self.loan_to_value.min < Decimal::ZERO || self.loan_to_value.max > dec!(100) {
            return Err(PropSourceError::InvalidInput {
                field: "loan_to_value".into(),
                reason: "Loan-to-value bounds must lie within 0 to 100".into(),
            });
        }
        if self.default_interest_rate < Decimal::ZERO
            || self.default_interest_rate > MAX_INTEREST_RATE
        {
            return Err(PropSourceError::InvalidInput {
                field: "default_interest_rate".into(),
                reason: format!("Default interest rate must be between 0 and {MAX_INTEREST_RATE}"),
            });
        }
        if self.default_loan_to_value < Decimal::ZERO || self.default_loan_to_value > dec!(100) {
            return Err(PropSourceError::InvalidInput {
                field: "default_loan_to_value".into(),
                reason: "Default loan-to-value must be between 0 and 100".into(),
            });
        }
        Ok(())
    }

    /// Whether `price` lies inside the purchase price slider range.
    pub fn price_in_range(&self, price: Money) -> bool {
        self.purchase_price.contains(price)
    }
}
