//! In-process prediction service and the cost band
//!
//! [`ConfidenceInterval::around`] is the only place the ±5% band is
//! computed; the serverless handler uses it on the remote scalar as well.
//! The band is a fixed heuristic, not a statistical interval.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::artifacts::ArtifactStore;
use crate::encoder::CategoricalEncoder;
use crate::error::Result;
use crate::features::{FeatureEncoder, FeatureVector};
use crate::model::RegressionModel;
use crate::request::PredictionRequest;

const BAND_LOW: f64 = 0.95;
const BAND_HIGH: f64 = 1.05;

/// Round to two decimal places, half away from zero
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// ±5% band around a point prediction, serialized as `[low, high]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct ConfidenceInterval {
    pub low: f64,
    pub high: f64,
}

impl ConfidenceInterval {
    /// Band around `prediction`, taken after rounding it to two decimals
    pub fn around(prediction: f64) -> Self {
        let center = round2(prediction);
        Self {
            low: round2(center * BAND_LOW),
            high: round2(center * BAND_HIGH),
        }
    }
}

impl From<[f64; 2]> for ConfidenceInterval {
    fn from([low, high]: [f64; 2]) -> Self {
        Self { low, high }
    }
}

impl From<ConfidenceInterval> for [f64; 2] {
    fn from(interval: ConfidenceInterval) -> Self {
        [interval.low, interval.high]
    }
}

/// Rounded prediction with its band
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub predicted_cost: f64,
    pub confidence_interval: ConfidenceInterval,
}

impl Prediction {
    pub fn from_raw(raw: f64) -> Self {
        Self {
            predicted_cost: round2(raw),
            confidence_interval: ConfidenceInterval::around(raw),
        }
    }
}

/// Loaded model and encoder behind a request/response contract.
///
/// Immutable after construction; share it behind an `Arc`.
#[derive(Debug)]
pub struct PredictionService {
    model: RegressionModel,
    encoder: CategoricalEncoder,
}

impl PredictionService {
    pub fn new(model: RegressionModel, encoder: CategoricalEncoder) -> Self {
        Self { model, encoder }
    }

    /// Load both artifacts from `dir`
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let (model, encoder) = ArtifactStore::new(dir.as_ref()).load()?;
        Ok(Self::new(model, encoder))
    }

    pub fn encode(&self, request: &PredictionRequest) -> Result<FeatureVector> {
        FeatureEncoder::new(self.model.schema(), &self.encoder).encode(request)
    }

    /// Unrounded model output
    pub fn predict_raw(&self, request: &PredictionRequest) -> Result<f64> {
        let features = self.encode(request)?;
        self.model.predict(&features)
    }

    /// Rounded prediction with the band
    pub fn predict(&self, request: &PredictionRequest) -> Result<Prediction> {
        self.predict_raw(request).map(Prediction::from_raw)
    }

    pub fn model(&self) -> &RegressionModel {
        &self.model
    }

    pub fn encoder(&self) -> &CategoricalEncoder {
        &self.encoder
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_round2() {
        assert_eq!(round2(125000.504), 125000.5);
        assert_eq!(round2(1.005_1), 1.01);
        assert_eq!(round2(-2.346), -2.35);
    }

    #[test]
    fn test_band_brackets_prediction() {
        for raw in [0.0, 1.0, 999.999, 125000.5, 3.3e6] {
            let prediction = Prediction::from_raw(raw);
            let band = prediction.confidence_interval;
            assert_eq!(band.low, round2(prediction.predicted_cost * 0.95));
            assert_eq!(band.high, round2(prediction.predicted_cost * 1.05));
            assert!(band.low <= prediction.predicted_cost);
            assert!(prediction.predicted_cost <= band.high);
        }
    }

    #[test]
    fn test_band_serializes_as_pair() {
        let band = ConfidenceInterval::around(100.0);
        assert_eq!(serde_json::to_value(band).unwrap(), json!([95.0, 105.0]));
    }
}
