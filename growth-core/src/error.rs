//! Error types for mesh construction and topology edits.

/// Errors produced by `growth-core`.
///
/// Constraint passes never fail; only building a mesh from caller data and
/// explicit topology edits can.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GrowthError {
    /// The starting mesh handed to the engine is empty, malformed or not
    /// manifold.
    #[error("invalid input mesh: {reason}")]
    InvalidInput { reason: String },

    /// A topology edit was asked to do something the mesh cannot represent.
    #[error("invalid topology operation: {reason}")]
    InvalidTopology { reason: String },
}

impl GrowthError {
    pub(crate) fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_topology(reason: impl Into<String>) -> Self {
        Self::InvalidTopology {
            reason: reason.into(),
        }
    }
}
