//! Error types for the B-tree.

use thiserror::Error;

/// Result type alias for B-tree operations
pub type Result<T> = std::result::Result<T, BTreeError>;

/// Errors that can occur when building or inspecting a B-tree
#[derive(Error, Debug)]
pub enum BTreeError {
    /// Minimum degree below the smallest workable value
    #[error("Invalid minimum degree {degree} (must be between {min} and {max})")]
    InvalidDegree { degree: usize, min: usize, max: usize },

    /// Node already holds `2t - 1` keys
    #[error("Node is full (capacity: {capacity} keys)")]
    NodeFull { capacity: usize },

    /// Positional access outside the node's key range
    #[error("Key index {index} out of bounds (count: {len})")]
    IndexOutOfBounds { index: usize, len: usize },

    /// A structural invariant does not hold
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// Configuration could not be understood
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// JSON encoding or decoding failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BTreeError {
    /// Create an invariant violation error with a message
    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    /// Create a configuration error with a message
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
