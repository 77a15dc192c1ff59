pub mod config;
pub mod returns;

pub use config::{
    CalculatorConfig, RangePolicy, SliderBounds, MAX_INTEREST_RATE, MAX_PURCHASE_PRICE,
};
pub use returns::{
    calculate, compute_result, CalculatorInput, CalculatorOutput, CalculatorRequest,
    CalculatorResult, CalculatorState, FormattedResult,
};
