//! Server errors and their HTTP mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use cost_model::ModelError;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Invalid bind address: {0}")]
    InvalidAddress(String),

    #[error(transparent)]
    Model(#[from] ModelError),
}

impl ServerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::Model(ModelError::UnsupportedContentType(_)) => {
                StatusCode::UNSUPPORTED_MEDIA_TYPE
            }
            ServerError::Model(ModelError::UnsupportedAccept(_)) => StatusCode::NOT_ACCEPTABLE,
            ServerError::Model(ModelError::InvalidInput(_))
            | ServerError::Model(ModelError::Serialization(_)) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if status.is_server_error() {
            error!(error = %self, "Invocation failed");
            "Internal server error".to_string()
        } else {
            warn!(status = status.as_u16(), error = %self, "Invocation rejected");
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let status = |e: ModelError| ServerError::from(e).status_code();
        assert_eq!(
            status(ModelError::UnsupportedContentType("text/csv".into())),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
        assert_eq!(
            status(ModelError::UnsupportedAccept("text/html".into())),
            StatusCode::NOT_ACCEPTABLE
        );
        assert_eq!(status(ModelError::invalid_input("eof")), StatusCode::BAD_REQUEST);
        assert_eq!(
            status(ModelError::FeatureCountMismatch { expected: 5, actual: 4 }),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
