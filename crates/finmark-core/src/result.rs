//! Result type aliases for the Finmark catalog.

use crate::FinmarkError;

/// A specialized `Result` type for Finmark operations.
pub type FinmarkResult<T> = Result<T, FinmarkError>;
