//! # Cost Model
//!
//! Shared model code for the workforce cost predictor:
//!
//! - `PredictionRequest`: the input record and its defaults
//! - `CategoricalEncoder` / `FeatureEncoder`: request → schema-ordered features
//! - `RegressionModel`: XGBoost regression with its feature schema
//! - `ArtifactStore`: booster, schema sidecar and `label_encoder.json` in one directory
//! - `PredictionService`: encode, predict, round, band
//! - `InferenceHandler`: the hosted endpoint entry point

pub mod artifacts;
pub mod encoder;
pub mod error;
pub mod features;
pub mod inference;
pub mod logging;
pub mod metrics;
pub mod model;
pub mod prediction;
pub mod request;

pub use artifacts::{ArtifactStore, ENCODER_FILE, MODEL_FILE, SCHEMA_FILE};
pub use encoder::{CategoricalEncoder, UNKNOWN_CATEGORY_CODE};
pub use error::{ModelError, Result};
pub use features::{FeatureEncoder, FeatureSchema, FeatureVector};
pub use inference::{InferenceHandler, InferenceResponse, JSON_CONTENT_TYPE};
pub use logging::{init_logging, LoggingConfig};
pub use model::{BoosterParams, RegressionModel};
pub use prediction::{round2, ConfidenceInterval, Prediction, PredictionService};
pub use request::{
    PredictionRequest, DEFAULT_BENEFITS_MULTIPLIER, DEFAULT_DEPARTMENT, REQUIRED_FIELDS,
};
