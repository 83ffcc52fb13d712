//! Error types
//!
//! Conversion functions report failure with [`ConversionError`], which the
//! registries hand back to their caller untouched. A missing conversion is
//! never an error: lookups that find nothing pass the value through.
//!
//! [`DecimalError`] is specific to the helpers in [`crate::decimal`] and
//! converts into `ConversionError` so that it can be returned with `?` from
//! inside a conversion function.

use std::error::Error;
use std::fmt::Display;

/// Enumerated error type for failures reported by conversion functions
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConversionError {
    /// Wrapped error from the conversion function's own domain
    #[error(transparent)]
    Custom(Box<dyn Error + Send + Sync + 'static>),
    /// Free-form failure message
    #[error("{0}")]
    Message(String),
    /// The value handed to a conversion function was not of the type it expected
    #[error("expected value of type `{expected}`, found `{found}`")]
    UnexpectedType {
        expected: &'static str,
        found: &'static str,
    },
}

impl ConversionError {
    /// Constructs a [`ConversionError`] from a message.
    pub fn msg<M: Display>(msg: M) -> Self {
        Self::Message(msg.to_string())
    }

    /// Constructs a [`ConversionError`] from an arbitrary error value.
    pub fn custom<E: Error + Send + Sync + 'static>(err: E) -> Self {
        Self::Custom(Box::new(err))
    }
}

impl From<std::convert::Infallible> for ConversionError {
    fn from(_void: std::convert::Infallible) -> Self {
        match _void {}
    }
}

impl From<std::num::TryFromIntError> for ConversionError {
    fn from(err: std::num::TryFromIntError) -> Self {
        Self::custom(err)
    }
}

impl From<DecimalError> for ConversionError {
    fn from(err: DecimalError) -> Self {
        Self::custom(err)
    }
}

/// Type alias for Result with an error type of [`ConversionError`]
pub type ConversionResult<T> = std::result::Result<T, ConversionError>;

/// Failures in parsing or laying out decimal values
#[derive(Clone, PartialEq, Eq, Debug, thiserror::Error)]
pub enum DecimalError {
    /// The string is not a plain decimal literal
    #[error("invalid decimal literal `{0}`")]
    Invalid(String),
    /// The unscaled value needs more bytes than the fixed width allows
    #[error("decimal requires {actual} bytes, exceeding fixed size of {limit} bytes")]
    Overflow { limit: usize, actual: usize },
    /// The requested scale is larger than [`MAX_SCALE`](crate::decimal::MAX_SCALE)
    #[error("decimal scale {scale} exceeds maximum of {limit}")]
    Scale { scale: u32, limit: u32 },
}
