//! Request handler
//!
//! One pass per event: method, parse, validate, predict, persist, respond.
//! Nothing is retried and nothing is persisted on a failure path.

use std::sync::Arc;

use serde_json::Value;
use tracing::{error, info, warn};

use cost_model::Prediction;

use crate::endpoint::PredictionEndpoint;
use crate::error::HandlerError;
use crate::event::GatewayEvent;
use crate::record::{new_prediction_id, unix_timestamp, PredictionRecord};
use crate::response::{HttpResponse, PredictionResponse};
use crate::store::RecordStore;
use crate::validation::validate_payload;

/// Client handles built once per process and shared by every invocation
#[derive(Clone)]
pub struct HandlerContext {
    pub endpoint: Arc<dyn PredictionEndpoint>,
    pub store: Arc<dyn RecordStore>,
}

impl HandlerContext {
    pub fn new(endpoint: Arc<dyn PredictionEndpoint>, store: Arc<dyn RecordStore>) -> Self {
        Self { endpoint, store }
    }
}

#[derive(Clone)]
pub struct RequestHandler {
    context: HandlerContext,
}

impl RequestHandler {
    pub fn new(context: HandlerContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &HandlerContext {
        &self.context
    }

    /// Handle one gateway event. Always produces a response.
    pub async fn handle(&self, event: Value) -> HttpResponse {
        match self.process(event).await {
            Ok(response) => response,
            Err(err) => {
                if err.is_client_error() {
                    warn!(status = err.status_code(), error = %err, "Rejected request");
                } else {
                    error!(status = err.status_code(), error = %err, "Request failed");
                }
                HttpResponse::error(err.status_code(), &err.public_message())
            }
        }
    }

    async fn process(&self, event: Value) -> Result<HttpResponse, HandlerError> {
        let event = GatewayEvent::from_value(event)?;
        if let Some(method) = event.http_method.as_deref() {
            if !method.eq_ignore_ascii_case("POST") {
                return Err(HandlerError::MethodNotAllowed(method.to_string()));
            }
        }

        let payload = event.payload()?;
        let request = validate_payload(&payload)?.with_defaults();

        let raw = self.context.endpoint.invoke(&request).await?;
        let prediction = Prediction::from_raw(raw);

        let prediction_id = new_prediction_id();
        let timestamp = unix_timestamp();
        let record = PredictionRecord::new(prediction_id.clone(), timestamp, &request, &prediction);
        let response = HttpResponse::try_from(&PredictionResponse {
            prediction_id: prediction_id.clone(),
            predicted_annual_cost: prediction.predicted_cost,
            confidence_interval: prediction.confidence_interval,
            timestamp,
            input_parameters: payload,
        })?;
        self.context.store.put(&record).await?;

        info!(
            prediction_id = %prediction_id,
            endpoint = %self.context.endpoint.name(),
            predicted_cost = prediction.predicted_cost,
            "Prediction served"
        );

        Ok(response)
    }
}
