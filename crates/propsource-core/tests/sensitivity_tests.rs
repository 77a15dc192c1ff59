#![cfg(feature = "sensitivity")]

use propsource_core::calculator::CalculatorState;
use propsource_core::sensitivity::{payment_sensitivity, PaymentMetric, PaymentSensitivityInput};
use propsource_core::SensitivityVariable;
use rust_decimal_macros::dec;

fn slider_sweep(metric: PaymentMetric) -> PaymentSensitivityInput {
    PaymentSensitivityInput {
        purchase_price: dec!(300000),
        interest_rate: SensitivityVariable {
            name: "interest_rate_percent".into(),
            min: dec!(0.5),
            max: dec!(10.0),
            step: dec!(0.5),
        },
        loan_to_value: SensitivityVariable {
            name: "loan_to_value_percent".into(),
            min: dec!(0),
            max: dec!(100),
            step: dec!(5),
        },
        output_metric: metric,
    }
}

#[test]
fn test_every_cell_matches_calculator() {
    let out = payment_sensitivity(&slider_sweep(PaymentMetric::MonthlyPayment))
        .unwrap()
        .result;
    let base = CalculatorState::create(dec!(300000)).unwrap();

    for (i, rate) in out.interest_rate_values.iter().enumerate() {
        for (j, ltv) in out.loan_to_value_values.iter().enumerate() {
            let expected = base
                .set_interest_rate(*rate)
                .unwrap()
                .set_loan_to_value(*ltv)
                .unwrap()
                .result()
                .monthly_interest_only_payment;
            assert_eq!(out.matrix[i][j], expected, "rate={rate} ltv={ltv}");
        }
    }
}

#[test]
fn test_zero_ltv_column_is_zero() {
    let out = payment_sensitivity(&slider_sweep(PaymentMetric::LoanAmount))
        .unwrap()
        .result;
    assert_eq!(out.loan_to_value_values[0], dec!(0));
    assert!(out.matrix.iter().all(|row| row[0].is_zero()));
}

#[test]
fn test_metric_parses_from_json() {
    let json = r#"{
        "purchase_price": 250000,
        "interest_rate": { "name": "rate", "min": 4, "max": 6, "step": 1 },
        "loan_to_value": { "name": "ltv", "min": 70, "max": 80, "step": 5 },
        "output_metric": "annual_interest"
    }"#;
    let input: PaymentSensitivityInput = serde_json::from_str(json).unwrap();
    let out = payment_sensitivity(&input).unwrap().result;
    assert_eq!(out.output_metric, "annual_interest_payment");
    // 250000 * 75% * 5%
    assert_eq!(out.base_case_value, dec!(9375));
    assert_eq!(out.matrix[1][1], dec!(9375));
}
