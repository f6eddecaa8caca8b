//! Persisted prediction record

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cost_model::{Prediction, PredictionRequest};

/// Identifier prefix for prediction records
pub const PREDICTION_ID_PREFIX: &str = "pred_";

/// `pred_` followed by 8 lowercase hex characters of a fresh v4 UUID
pub fn new_prediction_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("{}{}", PREDICTION_ID_PREFIX, &hex[..8])
}

/// Current Unix time in whole seconds
pub fn unix_timestamp() -> i64 {
    Utc::now().timestamp()
}

/// One row per successful request; written once, never updated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub prediction_id: String,
    pub timestamp: i64,
    pub headcount: u64,
    pub avg_salary: f64,
    pub turnover_rate: f64,
    pub department: String,
    pub benefits_multiplier: f64,
    pub predicted_cost: f64,
    pub confidence_interval_low: f64,
    pub confidence_interval_high: f64,
}

impl PredictionRecord {
    pub fn new(
        prediction_id: String,
        timestamp: i64,
        request: &PredictionRequest,
        prediction: &Prediction,
    ) -> Self {
        Self {
            prediction_id,
            timestamp,
            headcount: request.headcount,
            avg_salary: request.avg_salary,
            turnover_rate: request.turnover_rate,
            department: request.department_or_default().to_string(),
            benefits_multiplier: request.benefits_multiplier,
            predicted_cost: prediction.predicted_cost,
            confidence_interval_low: prediction.confidence_interval.low,
            confidence_interval_high: prediction.confidence_interval.high,
        }
    }
}
