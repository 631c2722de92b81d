//! Convenience result type alias for Tokensmith.

use crate::error::AppError;

/// A specialized `Result` type for Tokensmith operations.
pub type AppResult<T> = Result<T, AppError>;
