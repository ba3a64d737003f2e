pub mod error;
pub mod loan;
pub mod math;
pub mod optimizer;
pub mod strategy;
pub mod tax;
pub mod types;

pub use error::DebtFreeError;
pub use types::*;

/// Standard result type for all debtfree operations
pub type DebtFreeResult<T> = Result<T, DebtFreeError>;
