//! Hosted endpoint entry point
//!
//! The four stages a model-hosting container runs per invocation: load the
//! artifacts once, decode the body, predict, encode the response. The
//! response shape `{"prediction": <number>}` is the contract the serverless
//! handler decodes.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ModelError, Result};
use crate::prediction::PredictionService;
use crate::request::PredictionRequest;

/// The only media type the endpoint speaks
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Endpoint response body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InferenceResponse {
    pub prediction: f64,
}

/// Entry point bundled with the artifacts
#[derive(Debug)]
pub struct InferenceHandler {
    service: PredictionService,
}

impl InferenceHandler {
    pub fn new(service: PredictionService) -> Self {
        Self { service }
    }

    /// Load model and encoder from the model directory
    pub fn load(model_dir: impl AsRef<Path>) -> Result<Self> {
        PredictionService::load(model_dir).map(Self::new)
    }

    /// Parse a request body of the given content type
    pub fn decode_input(&self, body: &[u8], content_type: &str) -> Result<PredictionRequest> {
        if !is_json(content_type) {
            return Err(ModelError::UnsupportedContentType(content_type.to_string()));
        }

        serde_json::from_slice(body).map_err(|e| ModelError::invalid_input(e.to_string()))
    }

    /// Run the model on a decoded request
    pub fn predict(&self, request: &PredictionRequest) -> Result<InferenceResponse> {
        let prediction = self.service.predict_raw(request)?;
        debug!(prediction, "Inference complete");
        Ok(InferenceResponse { prediction })
    }

    /// Serialize a response for the given accept type
    pub fn encode_output(
        &self,
        response: &InferenceResponse,
        accept: Option<&str>,
    ) -> Result<(Vec<u8>, &'static str)> {
        match accept {
            None => {}
            Some(accept) if accepts_json(accept) => {}
            Some(accept) => return Err(ModelError::UnsupportedAccept(accept.to_string())),
        }

        Ok((serde_json::to_vec(response)?, JSON_CONTENT_TYPE))
    }

    /// Decode, predict and encode in one call
    pub fn invoke(
        &self,
        body: &[u8],
        content_type: &str,
        accept: Option<&str>,
    ) -> Result<(Vec<u8>, &'static str)> {
        let request = self.decode_input(body, content_type)?;
        let response = self.predict(&request)?;
        self.encode_output(&response, accept)
    }

    pub fn service(&self) -> &PredictionService {
        &self.service
    }
}

fn media_type(value: &str) -> &str {
    value.split(';').next().unwrap_or("").trim()
}

fn is_json(content_type: &str) -> bool {
    media_type(content_type).eq_ignore_ascii_case(JSON_CONTENT_TYPE)
}

fn accepts_json(accept: &str) -> bool {
    accept.split(',').map(media_type).any(|media| {
        media.eq_ignore_ascii_case(JSON_CONTENT_TYPE)
            || media == "*/*"
            || media.eq_ignore_ascii_case("application/*")
    })
}
