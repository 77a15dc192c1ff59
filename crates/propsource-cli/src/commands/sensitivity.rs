use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use propsource_core::sensitivity::{self, PaymentMetric, PaymentSensitivityInput};
use propsource_core::SensitivityVariable;

use crate::input;

/// Metric tabulated in each grid cell
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MetricArg {
    MonthlyPayment,
    AnnualInterest,
    Deposit,
    LoanAmount,
}

impl From<MetricArg> for PaymentMetric {
    fn from(m: MetricArg) -> Self {
        match m {
            MetricArg::MonthlyPayment => PaymentMetric::MonthlyPayment,
            MetricArg::AnnualInterest => PaymentMetric::AnnualInterest,
            MetricArg::Deposit => PaymentMetric::Deposit,
            MetricArg::LoanAmount => PaymentMetric::LoanAmount,
        }
    }
}

/// Arguments for the rate x LTV payment sweep
#[derive(Args)]
pub struct SensitivityArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Property purchase price held constant across the grid
    #[arg(long)]
    pub price: Option<Decimal>,

    /// Interest rate sweep as min:max:step in percent
    #[arg(long, default_value = "3:7:0.5")]
    pub rate_range: String,

    /// Loan-to-value sweep as min:max:step in percent
    #[arg(long, default_value = "50:85:5")]
    pub ltv_range: String,

    /// Metric to tabulate
    #[arg(long, value_enum, default_value = "monthly-payment")]
    pub metric: MetricArg,
}

fn parse_range(name: &str, range: &str) -> Result<SensitivityVariable, Box<dyn std::error::Error>> {
    let parts: Vec<&str> = range.split(':').collect();
    if parts.len() != 3 {
        return Err(format!("Range for {name} must be min:max:step, got '{range}'").into());
    }
    Ok(SensitivityVariable {
        name: name.to_string(),
        min: parts[0].trim().parse()?,
        max: parts[1].trim().parse()?,
        step: parts[2].trim().parse()?,
    })
}

pub fn run_sensitivity(args: SensitivityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let sens_input: PaymentSensitivityInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(price) = args.price {
        PaymentSensitivityInput {
            purchase_price: price,
            interest_rate: parse_range("interest_rate_percent", &args.rate_range)?,
            loan_to_value: parse_range("loan_to_value_percent", &args.ltv_range)?,
            output_metric: args.metric.into(),
        }
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        return Err("--price is required (or provide --input / stdin)".into());
    };

    let result = sensitivity::payment_sensitivity(&sens_input)?;
    Ok(serde_json::to_value(result)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_range() {
        let var = parse_range("rate", "3:7:0.5").unwrap();
        assert_eq!(var.min, dec!(3));
        assert_eq!(var.max, dec!(7));
        assert_eq!(var.step, dec!(0.5));
    }

    #[test]
    fn test_parse_range_wrong_arity() {
        assert!(parse_range("rate", "3:7").is_err());
        assert!(parse_range("rate", "a:b:c").is_err());
    }

    #[test]
    fn test_run_from_flags() {
        let args = SensitivityArgs {
            input: None,
            price: Some(dec!(300000)),
            rate_range: "3:7:0.5".into(),
            ltv_range: "50:85:5".into(),
            metric: MetricArg::MonthlyPayment,
        };
        let value = run_sensitivity(args).unwrap();
        assert_eq!(value["result"]["matrix"].as_array().unwrap().len(), 9);
        assert_eq!(value["result"]["base_case_position"][0], 4);
        assert_eq!(value["result"]["base_case_position"][1], 5);
    }
}
