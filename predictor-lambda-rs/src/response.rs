//! Gateway proxy response

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use cost_model::{ConfidenceInterval, JSON_CONTENT_TYPE};

use crate::error::HandlerError;
use crate::event::Payload;

/// Response in the shape the gateway expects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpResponse {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    /// JSON document encoded as a string
    pub body: String,
}

impl HttpResponse {
    pub fn json(status_code: u16, body: &Value) -> Self {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), JSON_CONTENT_TYPE.to_string());

        Self {
            status_code,
            headers,
            body: body.to_string(),
        }
    }

    pub fn error(status_code: u16, message: &str) -> Self {
        Self::json(status_code, &json!({ "error": message }))
    }

    /// Decode the body back to JSON
    pub fn body_json(&self) -> serde_json::Result<Value> {
        serde_json::from_str(&self.body)
    }
}

/// Success body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub prediction_id: String,
    pub predicted_annual_cost: f64,
    pub confidence_interval: ConfidenceInterval,
    pub timestamp: i64,
    /// Caller's mapping as received, without defaults applied
    pub input_parameters: Payload,
}

impl TryFrom<&PredictionResponse> for HttpResponse {
    type Error = HandlerError;

    /// 200 response; fails rather than emit a body that lost a number
    fn try_from(response: &PredictionResponse) -> Result<Self, Self::Error> {
        let numbers = [
            response.predicted_annual_cost,
            response.confidence_interval.low,
            response.confidence_interval.high,
        ];
        if let Some(value) = numbers.iter().find(|v| !v.is_finite()) {
            // serde_json writes these as null instead of failing
            return Err(HandlerError::Encode(format!(
                "non-finite number {} in prediction",
                value
            )));
        }

        let body = serde_json::to_value(response).map_err(|e| HandlerError::Encode(e.to_string()))?;
        Ok(HttpResponse::json(200, &body))
    }
}
