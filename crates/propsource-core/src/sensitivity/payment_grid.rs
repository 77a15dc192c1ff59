use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::calculator::config::{
    DEFAULT_INTEREST_RATE, DEFAULT_LOAN_TO_VALUE, MAX_INTEREST_RATE, MAX_PURCHASE_PRICE,
};
use crate::calculator::returns::{compute_result, CalculatorInput, CalculatorResult};
use crate::error::PropSourceError;
use crate::types::*;
use crate::PropSourceResult;

/// Upper bound on points per swept variable
const MAX_SWEEP_POINTS: usize = 1_000;

/// Upper bound on cells in the evaluated matrix
const MAX_GRID_CELLS: usize = 10_000;

/// Which calculator output fills the matrix
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMetric {
    #[default]
    MonthlyPayment,
    AnnualInterest,
    Deposit,
    LoanAmount,
}

impl PaymentMetric {
    fn pick(self, result: &CalculatorResult) -> Money {
        match self {
            PaymentMetric::MonthlyPayment => result.monthly_interest_only_payment,
            PaymentMetric::AnnualInterest => result.annual_interest_payment,
            PaymentMetric::Deposit => result.deposit,
            PaymentMetric::LoanAmount => result.loan_amount,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PaymentMetric::MonthlyPayment => "monthly_interest_only_payment",
            PaymentMetric::AnnualInterest => "annual_interest_payment",
            PaymentMetric::Deposit => "deposit",
            PaymentMetric::LoanAmount => "loan_amount",
        }
    }
}

/// Input for an interest rate x loan-to-value sweep at a fixed price
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentSensitivityInput {
    /// Property price held constant across the grid
    pub purchase_price: Money,
    /// Rows: interest rate in percentage points
    pub interest_rate: SensitivityVariable,
    /// Columns: loan-to-value in percentage points
    pub loan_to_value: SensitivityVariable,
    #[serde(default)]
    pub output_metric: PaymentMetric,
}

/// Output of the payment sweep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentSensitivityOutput {
    pub interest_rate_name: String,
    pub loan_to_value_name: String,
    pub interest_rate_values: Vec<Decimal>,
    pub loan_to_value_values: Vec<Decimal>,
    pub output_metric: String,
    /// matrix[i][j] = metric at interest_rate_values[i], loan_to_value_values[j]
    pub matrix: Vec<Vec<Money>>,
    /// Metric at the default 5.0% / 75% inputs
    pub base_case_value: Money,
    /// Cell closest to the default inputs (row, col)
    pub base_case_position: (usize, usize),
}

fn generate_sweep_values(var: &SensitivityVariable) -> PropSourceResult<Vec<Decimal>> {
    if var.step <= Decimal::ZERO {
        return Err(PropSourceError::InvalidInput {
            field: format!("variable:{}", var.name),
            reason: "Step must be positive".into(),
        });
    }
    if var.min > var.max {
        return Err(PropSourceError::InvalidInput {
            field: format!("variable:{}", var.name),
            reason: "Min must be <= max".into(),
        });
    }
    let points = var
        .max
        .checked_sub(var.min)
        .and_then(|span| span.checked_div(var.step))
        .map(|n| n.floor());
    if !points.is_some_and(|n| n < Decimal::from(MAX_SWEEP_POINTS)) {
        return Err(PropSourceError::InvalidInput {
            field: format!("variable:{}", var.name),
            reason: format!("Sweep exceeds {MAX_SWEEP_POINTS} points; use a larger step"),
        });
    }

    let mut values = Vec::new();
    let mut current = var.min;
    while current <= var.max {
        values.push(current);
        current += var.step;
    }
    // Ensure max is included if step doesn't land exactly on it
    if let Some(&last) = values.last() {
        if last < var.max {
            values.push(var.max);
        }
    }

    Ok(values)
}

fn closest_index(values: &[Decimal], target: Decimal) -> usize {
    values
        .iter()
        .enumerate()
        .min_by_key(|(_, v)| (**v - target).abs())
        .map(|(i, _)| i)
        .unwrap_or(0)
}

fn validate_input(input: &PaymentSensitivityInput) -> PropSourceResult<()> {
    if input.purchase_price <= Decimal::ZERO {
        return Err(PropSourceError::InvalidInput {
            field: "purchase_price".into(),
            reason: "Purchase price must be positive".into(),
        });
    }
    if input.purchase_price > MAX_PURCHASE_PRICE {
        return Err(PropSourceError::InvalidInput {
            field: "purchase_price".into(),
            reason: format!("Purchase price cannot exceed {MAX_PURCHASE_PRICE}"),
        });
    }
    if input.interest_rate.min < Decimal::ZERO || input.interest_rate.max > MAX_INTEREST_RATE {
        return Err(PropSourceError::InvalidInput {
            field: format!("variable:{}", input.interest_rate.name),
            reason: format!("Interest rate sweep must stay within 0 to {MAX_INTEREST_RATE}"),
        });
    }
    if input.loan_to_value.min < Decimal::ZERO || input.loan_to_value.max > dec!(100) {
        return Err(PropSourceError::InvalidInput {
            field: format!("variable:{}", input.loan_to_value.name),
            reason: "Loan-to-value sweep must stay within 0 to 100".into(),
        });
    }
    Ok(())
}

/// Sweep interest rate against loan-to-value and tabulate one calculator
/// output for every pair.
pub fn payment_sensitivity(
    input: &PaymentSensitivityInput,
) -> PropSourceResult<ComputationOutput<PaymentSensitivityOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;

    let rate_values = generate_sweep_values(&input.interest_rate)?;
    let ltv_values = generate_sweep_values(&input.loan_to_value)?;

    let cells = rate_values.len() * ltv_values.len();
    if cells > MAX_GRID_CELLS {
        return Err(PropSourceError::InvalidInput {
            field: "grid".into(),
            reason: format!("Grid has {cells} cells, limit is {MAX_GRID_CELLS}"),
        });
    }

    let evaluate = |rate: Decimal, ltv: Decimal| -> PropSourceResult<Money> {
        let cell = CalculatorInput {
            purchase_price: input.purchase_price,
            interest_rate_percent: rate,
            loan_to_value_percent: ltv,
        };
        Ok(input.output_metric.pick(&compute_result(&cell)?))
    };

    let matrix = rate_values
        .iter()
        .map(|rate| {
            ltv_values
                .iter()
                .map(|ltv| evaluate(*rate, *ltv))
                .collect::<PropSourceResult<Vec<Money>>>()
        })
        .collect::<PropSourceResult<Vec<Vec<Money>>>>()?;

    let base_row = closest_index(&rate_values, DEFAULT_INTEREST_RATE);
    let base_col = closest_index(&ltv_values, DEFAULT_LOAN_TO_VALUE);
    let base_case_value = evaluate(DEFAULT_INTEREST_RATE, DEFAULT_LOAN_TO_VALUE)?;

    if rate_values[base_row] != DEFAULT_INTEREST_RATE
        || ltv_values[base_col] != DEFAULT_LOAN_TO_VALUE
    {
        warnings.push(format!(
            "Base case {DEFAULT_INTEREST_RATE}% / {DEFAULT_LOAN_TO_VALUE}% is not on the grid; \
             nearest cell is {}% / {}%",
            rate_values[base_row], ltv_values[base_col]
        ));
    }

    let output = PaymentSensitivityOutput {
        interest_rate_name: input.interest_rate.name.clone(),
        loan_to_value_name: input.loan_to_value.name.clone(),
        interest_rate_values: rate_values,
        loan_to_value_values: ltv_values,
        output_metric: input.output_metric.label().to_string(),
        matrix,
        base_case_value,
        base_case_position: (base_row, base_col),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Interest-Only Payment Sensitivity (Rate x LTV)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_input() -> PaymentSensitivityInput {
        PaymentSensitivityInput {
            purchase_price: dec!(300000),
            interest_rate: SensitivityVariable {
                name: "Interest Rate".into(),
                min: dec!(3.0),
                max: dec!(7.0),
                step: dec!(1.0),
            },
            loan_to_value: SensitivityVariable {
                name: "LTV".into(),
                min: dec!(60),
                max: dec!(80),
                step: dec!(5),
            },
            output_metric: PaymentMetric::MonthlyPayment,
        }
    }

    #[test]
    fn test_grid_dimensions() {
        let out = payment_sensitivity(&sample_input()).unwrap().result;
        assert_eq!(out.interest_rate_values.len(), 5);
        assert_eq!(out.loan_to_value_values.len(), 5);
        assert_eq!(out.matrix.len(), 5);
        assert!(out.matrix.iter().all(|row| row.len() == 5));
        assert_eq!(out.output_metric, "monthly_interest_only_payment");
    }

    #[test]
    fn test_base_case_matches_calculator() {
        let result = payment_sensitivity(&sample_input()).unwrap();
        let out = &result.result;
        // rate 5.0 => index 2, ltv 75 => index 3
        assert_eq!(out.base_case_position, (2, 3));
        assert_eq!(out.base_case_value, dec!(937.5));
        assert_eq!(out.matrix[2][3], dec!(937.5));
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_payment_rises_with_rate_and_ltv() {
        let out = payment_sensitivity(&sample_input()).unwrap().result;
        for i in 0..out.matrix.len() - 1 {
            assert!(out.matrix[i][0] < out.matrix[i + 1][0]);
        }
        for j in 0..out.matrix[0].len() - 1 {
            assert!(out.matrix[0][j] < out.matrix[0][j + 1]);
        }
    }

    #[test]
    fn test_deposit_ignores_rate() {
        let mut input = sample_input();
        input.output_metric = PaymentMetric::Deposit;
        let out = payment_sensitivity(&input).unwrap().result;
        for row in &out.matrix {
            assert_eq!(row, &out.matrix[0]);
        }
        assert_eq!(out.matrix[0][0], dec!(120000));
    }

    #[test]
    fn test_off_grid_base_case_warns() {
        let mut input = sample_input();
        input.loan_to_value.min = dec!(0);
        input.loan_to_value.max = dec!(50);
        input.loan_to_value.step = dec!(10);
        let result = payment_sensitivity(&input).unwrap();
        assert_eq!(result.result.base_case_position.1, 5);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_sweep_with_non_exact_step() {
        let var = SensitivityVariable {
            name: "test".into(),
            min: dec!(0),
            max: dec!(1),
            step: dec!(0.3),
        };
        let vals = generate_sweep_values(&var).unwrap();
        // 0, 0.3, 0.6, 0.9, 1.0 (max appended)
        assert_eq!(vals.len(), 5);
        assert_eq!(*vals.last().unwrap(), dec!(1));
    }

    #[test]
    fn test_invalid_step() {
        let mut input = sample_input();
        input.interest_rate.step = dec!(0);
        assert!(payment_sensitivity(&input).is_err());
    }

    #[test]
    fn test_ltv_sweep_above_hundred_rejected() {
        let mut input = sample_input();
        input.loan_to_value.max = dec!(110);
        assert!(payment_sensitivity(&input).is_err());
    }

    #[test]
    fn test_oversized_sweep_rejected() {
        let mut input = sample_input();
        input.loan_to_value.min = dec!(0);
        input.loan_to_value.max = dec!(100);
        input.loan_to_value.step = dec!(0.01);
        assert!(payment_sensitivity(&input).is_err());
    }

    #[test]
    fn test_uncountable_sweep_rejected() {
        let var = SensitivityVariable {
            name: "rate".into(),
            min: dec!(0),
            max: Decimal::MAX,
            step: dec!(0.1),
        };
        assert!(matches!(
            generate_sweep_values(&var),
            Err(PropSourceError::InvalidInput { .. })
        ));

        let var = SensitivityVariable {
            name: "rate".into(),
            min: Decimal::MIN,
            max: Decimal::MAX,
            step: dec!(1),
        };
        assert!(generate_sweep_values(&var).is_err());
    }

    #[test]
    fn test_unbounded_rate_sweep_rejected() {
        let mut input = sample_input();
        input.interest_rate.min = dec!(0);
        input.interest_rate.max = Decimal::MAX;
        input.interest_rate.step = dec!(0.1);
        assert!(payment_sensitivity(&input).is_err());
    }

    #[test]
    fn test_unbounded_price_rejected() {
        let mut input = sample_input();
        input.purchase_price = Decimal::MAX;
        let err = payment_sensitivity(&input).unwrap_err();
        match err {
            PropSourceError::InvalidInput { field, .. } => assert_eq!(field, "purchase_price"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }
}
