//! Error types for the codec crate.

use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while converting between values and field types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// A value had a different kind than the target field expects.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// Kind the conversion expected.
        expected: &'static str,
        /// Kind that was actually present.
        found: &'static str,
    },

    /// An integer did not fit the target field type.
    #[error("integer {value} out of range for {target}")]
    IntegerOverflow {
        /// The value that overflowed.
        value: i64,
        /// Name of the target type.
        target: &'static str,
    },
}

impl CodecError {
    /// Create a type mismatch error.
    pub fn type_mismatch(expected: &'static str, found: &'static str) -> Self {
        Self::TypeMismatch { expected, found }
    }
}
