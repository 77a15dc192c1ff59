use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use propsource_core::calculator::{self, CalculatorConfig, CalculatorRequest};
use propsource_core::Currency;

use crate::input;

/// Arguments for the returns calculator
#[derive(Args)]
pub struct CalculateArgs {
    /// Path to JSON request file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Property purchase price
    #[arg(long)]
    pub price: Option<Decimal>,

    /// Annual interest rate in percent (e.g. 5.0)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Loan-to-value in percent (e.g. 75)
    #[arg(long)]
    pub ltv: Option<Decimal>,

    /// Calculator config file (.json, .yaml or .yml)
    #[arg(long)]
    pub config: Option<String>,

    /// Currency for formatted amounts (ISO code, e.g. GBP)
    #[arg(long)]
    pub currency: Option<Currency>,
}

pub fn run_calculate(args: CalculateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut request = build_request(&args)?;

    if let Some(ref path) = args.config {
        request.config = input::file::read_config(path)?;
    }
    if let Some(currency) = args.currency {
        request.config.currency = currency;
    }

    let result = calculator::calculate(&request)?;
    Ok(serde_json::to_value(result)?)
}

fn build_request(args: &CalculateArgs) -> Result<CalculatorRequest, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        return input::file::read_json(path);
    }
    if let Some(price) = args.price {
        return Ok(CalculatorRequest {
            purchase_price: price,
            interest_rate_percent: args.rate,
            loan_to_value_percent: args.ltv,
            config: CalculatorConfig::default(),
        });
    }
    if let Some(request) = input::stdin::read_stdin()? {
        return Ok(request);
    }
    Err("--price is required (or provide --input / stdin)".into())
}
