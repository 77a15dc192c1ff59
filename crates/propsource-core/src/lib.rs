pub mod error;
pub mod formatting;
pub mod types;

#[cfg(feature = "calculator")]
pub mod calculator;

#[cfg(feature = "sensitivity")]
pub mod sensitivity;

pub use error::PropSourceError;
pub use types::*;

/// Standard result type for all propsource operations
pub type PropSourceResult<T> = Result<T, PropSourceError>;
