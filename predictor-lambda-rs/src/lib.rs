//! Serverless handler for workforce cost predictions
//!
//! Validates a gateway event, calls the hosted prediction endpoint, stores
//! a prediction record and answers with the cost and its ±5% band.

pub mod config;
pub mod endpoint;
pub mod error;
pub mod event;
pub mod handler;
pub mod record;
pub mod response;
pub mod store;
pub mod validation;

pub use config::{EndpointTarget, PredictorConfig, StoreTarget};
pub use endpoint::{decode_response, HttpEndpoint, PredictionEndpoint, SageMakerEndpoint};
pub use error::{ConfigError, EndpointError, HandlerError, StoreError, INTERNAL_ERROR_MESSAGE};
pub use event::{GatewayEvent, Payload, RequestBody};
pub use handler::{HandlerContext, RequestHandler};
pub use record::{new_prediction_id, PredictionRecord};
pub use response::{HttpResponse, PredictionResponse};
pub use store::{DynamoRecordStore, FileRecordStore, RecordStore};
