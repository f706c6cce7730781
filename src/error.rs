//! Error type of the crate.
//!
//! All failures are input or programming errors, the computation being pure and deterministic
//! there is nothing to retry.

/// Crate-level error type
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GeowlError {
    /// malformed edge list, empty or malformed coordinate table
    #[error("invalid graph: {0}")]
    InvalidGraph(String),

    /// a value with no canonical textual form was submitted to the canonical hash
    #[error("serialization error: {0}")]
    Serialization(String),

    /// refinement parameters not usable
    #[error("invalid parameters: {0}")]
    InvalidParams(String),
}

impl GeowlError {
    pub(crate) fn graph(msg: impl Into<String>) -> Self {
        GeowlError::InvalidGraph(msg.into())
    }

    pub(crate) fn serialization(msg: impl Into<String>) -> Self {
        GeowlError::Serialization(msg.into())
    }
}
