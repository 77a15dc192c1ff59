pub mod payment_grid;

pub use payment_grid::{
    payment_sensitivity, PaymentMetric, PaymentSensitivityInput, PaymentSensitivityOutput,
};
