//! Error types for Ripple operations.
//!
//! Errors fall into three groups:
//!
//! - **Input problems**: the change set or dependency snapshot cannot be
//!   analyzed (`InvalidInput`). Callers can tell "no impact found" (an
//!   empty but successful report) from "could not analyze".
//! - **Contract violations**: internal helpers were called with data that
//!   could not have come from the same graph (`PathContract`).
//! - **Infrastructure**: configuration, I/O and deserialization failures
//!   while loading inputs from disk.
//!
//! The engine itself performs no retries; every failure is deterministic.

use thiserror::Error;

/// Result type for Ripple operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for Ripple operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The change set or dependency snapshot cannot be analyzed
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A path references an edge that does not exist in the graph
    #[error("no dependency edge from {from} to {to} in the analyzed graph")]
    PathContract {
        /// Source module of the missing edge
        from: String,
        /// Target module of the missing edge
        to: String,
    },

    /// Invalid configuration or arguments
    #[error("configuration error: {0}")]
    Config(String),

    /// File system operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON input could not be decoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns `true` if the caller supplied inputs that cannot be analyzed.
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_) | Self::Config(_))
    }

    /// Returns `true` if this error signals a programming mistake.
    #[must_use]
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Self::PathContract { .. })
    }
}
