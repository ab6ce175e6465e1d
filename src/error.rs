//! Error types for the perceptron engine
//!
//! Every fallible operation in the crate returns [`Result`], whose error side is
//! [`NetworkError`]. Shape problems are reported eagerly by the operation that
//! first observes them and are never silently corrected.

use thiserror::Error;

/// Errors raised while building, running, training or persisting a network.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// A vector or matrix disagrees with the width expected by a layer or network.
    #[error("dimension mismatch in {context}: expected {expected}, got {actual}")]
    DimensionMismatch {
        context: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Persisted bytes do not decode into a consistent sequence of layers.
    #[error("malformed persisted state: {0}")]
    MalformedPersistedState(String),

    /// Topology or training parameters that cannot describe a valid run.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, NetworkError>;

/// Fails with [`NetworkError::DimensionMismatch`] unless `actual == expected`.
pub(crate) fn ensure_len(context: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(NetworkError::DimensionMismatch {
            context,
            expected,
            actual,
        })
    }
}
