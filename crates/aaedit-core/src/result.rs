//! Result type alias for profile editing operations

use crate::error::AaError;

/// Standard Result type for profile editing operations
pub type Result<T> = std::result::Result<T, AaError>;
