//! Error types for descriptor loading and shape graph construction.

/// Errors raised while building a [`ShapeGraph`](crate::ShapeGraph).
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// The descriptor document could not be parsed.
    #[error("malformed API descriptor: {0}")]
    Parse(#[from] serde_json::Error),

    /// A map shape declares a key that is not string-typed.
    #[error("map shape '{shape}' has non-string key shape '{key}'")]
    NonStringMapKey {
        /// The offending map shape.
        shape: String,
        /// The declared key shape.
        key: String,
    },

    /// A structure lists a required member it does not declare.
    #[error("structure '{shape}' requires undeclared member '{member}'")]
    UnknownRequiredMember {
        /// The structure shape.
        shape: String,
        /// The member listed as required.
        member: String,
    },
}

/// Convenience result type for shape graph operations.
pub type ModelResult<T> = Result<T, ModelError>;
