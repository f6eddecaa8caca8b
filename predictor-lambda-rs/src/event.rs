//! Incoming gateway event
//!
//! The gateway may hand over the body as a JSON-encoded string or as an
//! already-decoded object; [`RequestBody`] names both shapes.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::HandlerError;

/// Decoded request payload
pub type Payload = Map<String, Value>;

/// The two accepted body shapes
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RequestBody {
    /// JSON text still to be decoded
    Encoded(String),
    /// Body already decoded to an object
    Structured(Payload),
}

impl RequestBody {
    pub fn into_payload(self) -> Result<Payload, HandlerError> {
        match self {
            RequestBody::Structured(payload) => Ok(payload),
            RequestBody::Encoded(text) => match serde_json::from_str::<Value>(&text) {
                Ok(Value::Object(payload)) => Ok(payload),
                Ok(other) => Err(HandlerError::Decode(format!(
                    "expected a JSON object body, got {}",
                    json_kind(&other)
                ))),
                Err(e) => Err(HandlerError::Decode(e.to_string())),
            },
        }
    }
}

/// Gateway proxy event, reduced to the fields the handler reads
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayEvent {
    #[serde(default)]
    pub http_method: Option<String>,
    #[serde(default)]
    pub headers: Option<HashMap<String, String>>,
    #[serde(default)]
    pub body: Option<RequestBody>,
}

impl GatewayEvent {
    pub fn from_value(event: Value) -> Result<Self, HandlerError> {
        serde_json::from_value(event).map_err(|e| HandlerError::Decode(e.to_string()))
    }

    /// Body as a mapping; a missing body is an empty mapping
    pub fn payload(self) -> Result<Payload, HandlerError> {
        match self.body {
            Some(body) => body.into_payload(),
            None => Ok(Payload::new()),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
