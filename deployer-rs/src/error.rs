//! Error types for endpoint deployment

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DeployError>;

#[derive(Error, Debug)]
pub enum DeployError {
    #[error("Model artifact path must start with s3://, got {0}")]
    InvalidModelPath(String),

    #[error("Invalid {field}: {reason}")]
    InvalidArgument { field: String, reason: String },

    /// A provisioning call was rejected or could not be sent
    #[error("{operation} failed: {message}")]
    Provisioning { operation: String, message: String },

    #[error("Endpoint {endpoint} failed: {reason}")]
    EndpointFailed { endpoint: String, reason: String },

    #[error("Endpoint {endpoint} not in service after {attempts} status checks")]
    Timeout { endpoint: String, attempts: u32 },
}

impl DeployError {
    pub fn provisioning(operation: impl Into<String>, message: impl Into<String>) -> Self {
        DeployError::Provisioning {
            operation: operation.into(),
            message: message.into(),
        }
    }
}
