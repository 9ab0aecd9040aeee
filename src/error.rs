//! Error types for the fields crate

use thiserror::Error;

/// Result type for fields operations
pub type Result<T> = std::result::Result<T, FieldsError>;

/// Fields crate errors
///
/// Validation outcomes are not errors: `validate` always returns a
/// structured [`ValidationOutcome`](crate::validate::ValidationOutcome).
/// These variants cover real failures - I/O, malformed store documents,
/// envelope mismatches.
#[derive(Error, Debug)]
pub enum FieldsError {
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    #[error("Store document is malformed: {0}")]
    MalformedStore(String),

    #[error("Envelope was produced by plugin '{found}', expected '{expected}'")]
    EnvelopePlugin { expected: String, found: String },

    #[error("Envelope payload type '{found}' does not match requested '{expected}'")]
    EnvelopeKind { expected: String, found: String },

    #[error("Envelope version {found} is incompatible with {supported}")]
    EnvelopeVersion { supported: String, found: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Semver error: {0}")]
    Semver(#[from] semver::Error),
}
