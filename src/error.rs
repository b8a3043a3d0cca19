//! Error handling for the jacobson library
//!
//! One crate-wide error enum covering the failure kinds the library can
//! surface: out-of-range indices, invalid arguments, corrupt persisted
//! data, I/O failures, and broken internal invariants.

use thiserror::Error;

/// Main error type for the jacobson library
#[derive(Error, Debug)]
pub enum JacobsonError {
    /// Index beyond the addressable range of a structure
    #[error("out of range: index {index}, size {size}")]
    OutOfRange {
        /// The invalid index
        index: usize,
        /// The valid size/length
        size: usize,
    },

    /// Argument rejected by an operation's contract
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// What the caller got wrong
        message: String,
    },

    /// Persisted data failed validation (magic, sizes, encoding)
    #[error("corrupt data: {message}")]
    Corrupt {
        /// What failed to validate
        message: String,
    },

    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An invariant failed despite validated inputs; indicates a bug
    #[error("internal invariant violated: {message}")]
    Internal {
        /// Which invariant broke
        message: String,
    },
}

impl JacobsonError {
    /// Create an out of range error
    pub fn out_of_range(index: usize, size: usize) -> Self {
        Self::OutOfRange { index, size }
    }

    /// Create an invalid argument error
    pub fn invalid_argument<S: Into<String>>(message: S) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a corrupt data error
    pub fn corrupt<S: Into<String>>(message: S) -> Self {
        Self::Corrupt {
            message: message.into(),
        }
    }

    /// Create an internal invariant error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get the error category for logging/metrics
    pub fn category(&self) -> &'static str {
        match self {
            Self::OutOfRange { .. } => "range",
            Self::InvalidArgument { .. } => "argument",
            Self::Corrupt { .. } => "corrupt",
            Self::Io(_) => "io",
            Self::Internal { .. } => "internal",
        }
    }

    /// Check if this is a recoverable error
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Io(_) => true,
            Self::OutOfRange { .. } => false,
            Self::InvalidArgument { .. } => false,
            Self::Corrupt { .. } => false,
            Self::Internal { .. } => false,
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, JacobsonError>;

/// Assert that an index is within bounds.
///
/// Compiles to a no-op without the `bounds-checks` feature; the caller
/// then owns the contract and invalid indices produce unspecified results.
#[inline(always)]
pub fn check_bounds(index: usize, size: usize) -> Result<()> {
    #[cfg(feature = "bounds-checks")]
    if index >= size {
        return Err(JacobsonError::out_of_range(index, size));
    }
    #[cfg(not(feature = "bounds-checks"))]
    let _ = (index, size);
    Ok(())
}
