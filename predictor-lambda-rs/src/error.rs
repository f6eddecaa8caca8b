//! Error types for the request handler
//!
//! Only request-shape problems get a caller-actionable status. Everything
//! else becomes a 500 with a generic message; the detail goes to the log.

use thiserror::Error;

/// Body returned for every 5xx response
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Failure talking to the hosted prediction endpoint
#[derive(Error, Debug)]
pub enum EndpointError {
    /// Transport or SDK failure before a response was received
    #[error("Endpoint invocation failed: {0}")]
    Invocation(String),

    /// The endpoint answered with a non-success status
    #[error("Endpoint returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body did not match `{"prediction": <number>}`
    #[error("Unexpected endpoint response: {0}")]
    Decode(String),
}

/// Failure writing a prediction record
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Record write failed: {0}")]
    Write(String),

    #[error("Record serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Handler environment is incomplete
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("No prediction endpoint configured: set {0}")]
    MissingEndpoint(String),

    #[error("No record store configured: set {0}")]
    MissingStore(String),
}

/// Everything that can end a request early
#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),

    /// Event or body could not be decoded
    #[error("Request decode failed: {0}")]
    Decode(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for field: {field}")]
    InvalidField { field: String, reason: String },

    #[error(transparent)]
    Endpoint(#[from] EndpointError),

    #[error(transparent)]
    Persistence(#[from] StoreError),

    /// Success body could not be encoded as JSON
    #[error("Response encode failed: {0}")]
    Encode(String),
}

impl HandlerError {
    /// HTTP status for the response
    pub fn status_code(&self) -> u16 {
        match self {
            HandlerError::MethodNotAllowed(_) => 405,
            HandlerError::MissingField(_) | HandlerError::InvalidField { .. } => 400,
            HandlerError::Decode(_)
            | HandlerError::Endpoint(_)
            | HandlerError::Persistence(_)
            | HandlerError::Encode(_) => 500,
        }
    }

    /// Message safe to return to the caller
    pub fn public_message(&self) -> String {
        match self {
            HandlerError::MethodNotAllowed(_) => "Method not allowed".to_string(),
            HandlerError::MissingField(_) | HandlerError::InvalidField { .. } => self.to_string(),
            _ => INTERNAL_ERROR_MESSAGE.to_string(),
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}
