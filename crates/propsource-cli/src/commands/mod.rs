pub mod calculate;
pub mod format;
pub mod sensitivity;
