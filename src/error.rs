//! Error types for the cache engine
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for cache operations.
///
/// Every variant leaves the cache table untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Key argument was the empty string
    #[error("Key is empty")]
    KeyEmpty,

    /// Key not found in cache
    #[error("Key not found: {0}")]
    KeyNotFound(String),

    /// Increment produced or was given something that is not a number (NaN)
    #[error("Value is not numeric: {0}")]
    NotNumeric(String),

    /// Increment would leave the numeric range of the value type
    #[error("Increment would overflow: {0}")]
    Overflow(String),

    /// Unexpected internal failure
    #[error("Internal failure: {0}")]
    Failure(String),
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_include_key() {
        assert_eq!(
            CacheError::KeyNotFound("a".to_string()).to_string(),
            "Key not found: a"
        );
        assert_eq!(CacheError::KeyEmpty.to_string(), "Key is empty");
        assert!(CacheError::Overflow("hits".to_string())
            .to_string()
            .contains("hits"));
    }
}
