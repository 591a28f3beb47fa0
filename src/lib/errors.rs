//! Custom error types for CRAM write operations.

use fgcram_codec::BlockError;
use thiserror::Error;

/// Result type alias for CRAM write operations
pub type Result<T> = std::result::Result<T, CramError>;

/// Error type for CRAM write operations
#[derive(Error, Debug)]
pub enum CramError {
    /// Malformed or impossible on-wire structure
    #[error("invalid CRAM structure: {reason}")]
    Structural {
        /// Explanation of the structural problem
        reason: String,
    },

    /// Input that violates a write-time policy
    #[error("CRAM write policy violation: {reason}")]
    Policy {
        /// Explanation of the violated policy
        reason: String,
    },

    /// Pipeline driven through an impossible state transition
    #[error("invalid writer state: {reason}")]
    State {
        /// Explanation of the state violation
        reason: String,
    },

    /// Failure in the underlying byte stream
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CramError {
    /// Creates a structural error from any displayable reason.
    pub fn structural(reason: impl Into<String>) -> Self {
        CramError::Structural { reason: reason.into() }
    }

    /// Creates a policy error from any displayable reason.
    pub fn policy(reason: impl Into<String>) -> Self {
        CramError::Policy { reason: reason.into() }
    }

    /// Creates a state error from any displayable reason.
    pub fn state(reason: impl Into<String>) -> Self {
        CramError::State { reason: reason.into() }
    }
}

impl From<BlockError> for CramError {
    fn from(err: BlockError) -> Self {
        match err {
            BlockError::Io(e) => CramError::Io(e),
            other => CramError::Structural { reason: other.to_string() },
        }
    }
}
