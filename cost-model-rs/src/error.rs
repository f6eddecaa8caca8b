//! Error types for the cost model
//!
//! Every fallible operation in this crate returns [`ModelError`]. Callers
//! that need to tell conditions apart (the feature encoder's fail-open
//! department lookup, the inference server's status mapping) match on the
//! variant rather than on the message.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for cost model operations
pub type Result<T> = std::result::Result<T, ModelError>;

/// Main error type for the cost model
#[derive(Error, Debug)]
pub enum ModelError {
    /// A required artifact file does not exist
    #[error("Artifact not found: {}", path.display())]
    ArtifactNotFound { path: PathBuf },

    /// An artifact file exists but could not be decoded
    #[error("Corrupt artifact {}: {reason}", path.display())]
    CorruptArtifact { path: PathBuf, reason: String },

    /// Filesystem errors while reading or writing artifacts
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Department value not seen while fitting the encoder
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    /// Feature vector width does not match the trained schema
    #[error("Feature count mismatch: model expects {expected}, got {actual}")]
    FeatureCountMismatch { expected: usize, actual: usize },

    /// Request body content type other than JSON
    #[error("Unsupported content type: {0}")]
    UnsupportedContentType(String),

    /// Accept type other than JSON
    #[error("Unsupported accept type: {0}")]
    UnsupportedAccept(String),

    /// Malformed request payload
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// JSON encode/decode failures outside of artifact loading
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Attempted to fit on zero rows
    #[error("Cannot fit on an empty training set")]
    EmptyTrainingSet,

    /// XGBoost rejected a parameter, matrix or booster call
    #[error("Booster error: {0}")]
    Booster(String),
}

impl From<xgboost::XGBError> for ModelError {
    fn from(err: xgboost::XGBError) -> Self {
        ModelError::Booster(err.to_string())
    }
}

impl ModelError {
    /// Create an invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        ModelError::InvalidInput(message.into())
    }

    /// Create a booster error
    pub fn booster(message: impl std::fmt::Display) -> Self {
        ModelError::Booster(message.to_string())
    }

    /// Whether the error was caused by the caller's request rather than the model
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ModelError::UnsupportedContentType(_)
                | ModelError::UnsupportedAccept(_)
                | ModelError::InvalidInput(_)
        )
    }
}
