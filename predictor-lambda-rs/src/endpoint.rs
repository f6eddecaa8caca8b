//! Clients for the hosted prediction endpoint
//!
//! Both implementations send the request record as JSON and decode the
//! pinned response shape `{"prediction": <number>}` through
//! [`decode_response`]. Nothing is retried.

use async_trait::async_trait;
use aws_sdk_sagemakerruntime::error::DisplayErrorContext;
use aws_sdk_sagemakerruntime::primitives::Blob;
use tracing::debug;

use cost_model::{InferenceResponse, PredictionRequest, JSON_CONTENT_TYPE};

use crate::error::EndpointError;

/// Remote prediction service
#[async_trait]
pub trait PredictionEndpoint: Send + Sync {
    /// Endpoint identifier for logs
    fn name(&self) -> &str;

    /// Invoke once and return the raw scalar prediction
    async fn invoke(&self, request: &PredictionRequest) -> Result<f64, EndpointError>;
}

/// Decode an endpoint response body
pub fn decode_response(body: &[u8]) -> Result<f64, EndpointError> {
    let response: InferenceResponse = serde_json::from_slice(body).map_err(|e| {
        EndpointError::Decode(format!(
            "{} (body: {})",
            e,
            String::from_utf8_lossy(&body[..body.len().min(256)])
        ))
    })?;

    if !response.prediction.is_finite() {
        return Err(EndpointError::Decode(format!(
            "non-finite prediction {}",
            response.prediction
        )));
    }
    Ok(response.prediction)
}

/// Managed SageMaker endpoint
#[derive(Debug, Clone)]
pub struct SageMakerEndpoint {
    client: aws_sdk_sagemakerruntime::Client,
    endpoint_name: String,
}

impl SageMakerEndpoint {
    pub fn new(client: aws_sdk_sagemakerruntime::Client, endpoint_name: impl Into<String>) -> Self {
        Self {
            client,
            endpoint_name: endpoint_name.into(),
        }
    }

    pub fn from_conf(sdk_config: &aws_config::SdkConfig, endpoint_name: impl Into<String>) -> Self {
        Self::new(aws_sdk_sagemakerruntime::Client::new(sdk_config), endpoint_name)
    }
}

#[async_trait]
impl PredictionEndpoint for SageMakerEndpoint {
    fn name(&self) -> &str {
        &self.endpoint_name
    }

    async fn invoke(&self, request: &PredictionRequest) -> Result<f64, EndpointError> {
        let payload = serde_json::to_vec(request)
            .map_err(|e| EndpointError::Invocation(format!("request encoding failed: {}", e)))?;

        let output = self
            .client
            .invoke_endpoint()
            .endpoint_name(&self.endpoint_name)
            .content_type(JSON_CONTENT_TYPE)
            .accept(JSON_CONTENT_TYPE)
            .body(Blob::new(payload))
            .send()
            .await
            .map_err(|e| EndpointError::Invocation(DisplayErrorContext(&e).to_string()))?;

        let body = output.body().map(|blob| blob.as_ref()).unwrap_or_default();
        debug!(endpoint = %self.endpoint_name, bytes = body.len(), "Endpoint responded");
        decode_response(body)
    }
}

/// Inference server reached over plain HTTP
#[derive(Debug, Clone)]
pub struct HttpEndpoint {
    client: reqwest::Client,
    url: String,
}

impl HttpEndpoint {
    /// `base_url` is the server root; requests go to `<base_url>/invocations`
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            url: format!("{}/invocations", base_url.trim_end_matches('/')),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl PredictionEndpoint for HttpEndpoint {
    fn name(&self) -> &str {
        &self.url
    }

    async fn invoke(&self, request: &PredictionRequest) -> Result<f64, EndpointError> {
        let response = self
            .client
            .post(&self.url)
            .header(reqwest::header::ACCEPT, JSON_CONTENT_TYPE)
            .json(request)
            .send()
            .await
            .map_err(|e| EndpointError::Invocation(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| EndpointError::Invocation(e.to_string()))?;

        if !status.is_success() {
            return Err(EndpointError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        debug!(url = %self.url, bytes = body.len(), "Endpoint responded");
        decode_response(&body)
    }
}
