//! Error types for resource derivation and code synthesis.

use std::path::PathBuf;

use ackgen_model::ModelError;

/// Errors raised while loading or validating generator configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        /// Path of the file.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// YAML document could not be parsed.
    #[error("invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// TOML document could not be parsed.
    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON document could not be parsed.
    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    /// The file extension maps to no known format.
    #[error("unsupported config format: {}", path.display())]
    UnsupportedFormat {
        /// Path of the file.
        path: PathBuf,
    },

    /// The document parsed but violates a configuration rule.
    #[error("invalid config: {reason}")]
    Invalid {
        /// What is wrong.
        reason: String,
    },
}

/// Errors raised while deriving resources or synthesizing code.
///
/// Every variant aborts the generation run.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// A shape reference points at no shape in the graph.
    #[error("nil shape reference to '{shape}' ({context})")]
    NilShapeReference {
        /// The referenced shape name.
        shape: String,
        /// Where the reference was followed from.
        context: String,
    },

    /// A structure references itself along the active synthesis path.
    #[error("shape cycle through '{shape}' at {path}")]
    ShapeCycle {
        /// The structure that closes the cycle.
        shape: String,
        /// Chain of structures along the active path, closing on `shape`.
        path: String,
    },

    /// A shape has a different kind than its position requires.
    #[error("shape '{shape}' is not a {expected}")]
    UnexpectedShape {
        /// The offending shape.
        shape: String,
        /// Required kind.
        expected: &'static str,
    },

    /// A required input member maps to no Spec or Status field.
    #[error("required member {shape}.{member} has no corresponding resource field")]
    UnmappedRequiredMember {
        /// Input structure name.
        shape: String,
        /// Member name.
        member: String,
    },

    /// Synthesis was requested for an operation the resource does not have.
    #[error("resource '{resource}' has no {op_type} operation")]
    MissingOperation {
        /// Resource name.
        resource: String,
        /// Requested operation kind.
        op_type: String,
    },

    /// A List operation is the resource's only read but its output holds no
    /// list of structures to scan.
    #[error("list operation '{op}' cannot serve as the only read of '{resource}': {reason}")]
    UnscannableList {
        /// Resource name.
        resource: String,
        /// List operation name.
        op: String,
        /// What the output lacks.
        reason: &'static str,
    },

    /// The requested output target is not recognized.
    #[error("unknown generation target: {target}")]
    UnknownTarget {
        /// The requested target.
        target: String,
    },

    /// The shape graph is malformed.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// The configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Writing emitted text failed.
    #[error("failed to format generated code: {0}")]
    Fmt(#[from] std::fmt::Error),
}

impl GenerateError {
    pub(crate) fn nil_ref(shape: &str, context: impl Into<String>) -> Self {
        Self::NilShapeReference {
            shape: shape.to_owned(),
            context: context.into(),
        }
    }
}

/// Convenience result type for generation operations.
pub type GenerateResult<T> = Result<T, GenerateError>;
