use crate::scene::id::NodeId;

/// Convenience result type used across the crate.
pub type SceneResult<T> = Result<T, SceneError>;

/// Top-level error taxonomy used by scene and group APIs.
///
/// Membership and layout operations never fail; rejected inputs are skipped
/// and logged. Errors are reserved for stale handles and malformed input.
#[derive(thiserror::Error, Debug)]
pub enum SceneError {
    /// The handle does not resolve to a live node.
    #[error("unknown node: {0}")]
    UnknownNode(NodeId),

    /// The operation requires a group node.
    #[error("node {0} is not a group")]
    NotAGroup(NodeId),

    /// Invalid user-provided data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing records.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SceneError {
    /// Build a [`SceneError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SceneError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
