//! Feature schema and request featurization
//!
//! The schema is fixed at training time and stored next to the booster as a
//! JSON sidecar. Every vector produced here has exactly the schema's width, so a
//! request without a department still fills the department slot (with
//! [`UNKNOWN_CATEGORY_CODE`]) when the model was trained with one.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::encoder::{CategoricalEncoder, UNKNOWN_CATEGORY_CODE};
use crate::error::{ModelError, Result};
use crate::request::PredictionRequest;

/// Numeric columns shared by every schema, in order
pub const BASE_FEATURES: [&str; 4] = [
    "headcount",
    "avg_salary",
    "turnover_rate",
    "benefits_multiplier",
];

/// Name of the optional encoded department column
pub const DEPARTMENT_FEATURE: &str = "department_encoded";

/// Ordered feature names the model was trained on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    feature_names: Vec<String>,
}

impl FeatureSchema {
    /// Schema for datasets without a department column
    pub fn base() -> Self {
        Self {
            feature_names: BASE_FEATURES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Schema with the encoded department appended
    pub fn with_department() -> Self {
        let mut schema = Self::base();
        schema.feature_names.push(DEPARTMENT_FEATURE.to_string());
        schema
    }

    pub fn has_department(&self) -> bool {
        self.feature_names.iter().any(|name| name == DEPARTMENT_FEATURE)
    }

    pub fn width(&self) -> usize {
        self.feature_names.len()
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Whether this is one of the two layouts the encoder can produce
    pub fn is_known_layout(&self) -> bool {
        *self == Self::base() || *self == Self::with_department()
    }
}

/// Model input in schema order
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }
}

/// Turns requests into schema-ordered feature vectors
#[derive(Debug, Clone, Copy)]
pub struct FeatureEncoder<'a> {
    schema: &'a FeatureSchema,
    categories: &'a CategoricalEncoder,
}

impl<'a> FeatureEncoder<'a> {
    pub fn new(schema: &'a FeatureSchema, categories: &'a CategoricalEncoder) -> Self {
        Self { schema, categories }
    }

    /// Encode a validated request
    pub fn encode(&self, request: &PredictionRequest) -> Result<FeatureVector> {
        self.encode_values(
            request.headcount as f64,
            request.avg_salary,
            request.turnover_rate,
            request.benefits_multiplier,
            request.department.as_deref(),
        )
    }

    /// Encode raw column values, shared by inference and training
    pub fn encode_values(
        &self,
        headcount: f64,
        avg_salary: f64,
        turnover_rate: f64,
        benefits_multiplier: f64,
        department: Option<&str>,
    ) -> Result<FeatureVector> {
        let mut values = Vec::with_capacity(self.schema.width());
        values.extend_from_slice(&[headcount, avg_salary, turnover_rate, benefits_multiplier]);

        if self.schema.has_department() {
            values.push(self.department_code(department)? as f64);
        }

        Ok(FeatureVector(values))
    }

    fn department_code(&self, department: Option<&str>) -> Result<u32> {
        let Some(department) = department else {
            return Ok(UNKNOWN_CATEGORY_CODE);
        };

        match self.categories.transform(department) {
            Ok(code) => Ok(code),
            Err(ModelError::UnknownCategory(value)) => {
                warn!(department = %value, "Unseen department, using default code");
                Ok(UNKNOWN_CATEGORY_CODE)
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn departments() -> CategoricalEncoder {
        CategoricalEncoder::fit(["Engineering", "Finance", "Sales"])
    }

    #[test]
    fn test_department_schema_has_five_features() {
        let schema = FeatureSchema::with_department();
        let categories = departments();
        let encoder = FeatureEncoder::new(&schema, &categories);

        let request = PredictionRequest::new(1500, 85000.0, 0.15)
            .with_benefits_multiplier(1.4)
            .with_department("Sales");
        let vector = encoder.encode(&request).unwrap();

        assert_eq!(vector.len(), 5);
        assert_eq!(vector.as_slice(), &[1500.0, 85000.0, 0.15, 1.4, 2.0]);
    }

    #[test]
    fn test_missing_department_fills_sentinel_slot() {
        let schema = FeatureSchema::with_department();
        let categories = departments();
        let encoder = FeatureEncoder::new(&schema, &categories);

        let vector = encoder.encode(&PredictionRequest::new(10, 40000.0, 0.2)).unwrap();

        assert_eq!(vector.len(), 5);
        assert_eq!(vector.as_slice()[4], UNKNOWN_CATEGORY_CODE as f64);
        assert_eq!(vector.as_slice()[3], 1.35);
    }

    #[test]
    fn test_base_schema_has_four_features() {
        let schema = FeatureSchema::base();
        let categories = CategoricalEncoder::default();
        let encoder = FeatureEncoder::new(&schema, &categories);

        let with_department = PredictionRequest::new(10, 40000.0, 0.2).with_department("Sales");
        assert_eq!(encoder.encode(&with_department).unwrap().len(), 4);
        assert_eq!(encoder.encode(&PredictionRequest::new(10, 40000.0, 0.2)).unwrap().len(), 4);
    }

    #[test]
    fn test_unseen_department_uses_default_code() {
        let schema = FeatureSchema::with_department();
        let categories = departments();
        let encoder = FeatureEncoder::new(&schema, &categories);

        let request = PredictionRequest::new(10, 40000.0, 0.2).with_department("Legal");
        let vector = encoder.encode(&request).unwrap();

        assert_eq!(vector.as_slice()[4], 0.0);
    }

    #[test]
    fn test_schema_names() {
        assert!(!FeatureSchema::base().has_department());
        assert_eq!(FeatureSchema::with_department().width(), 5);
        assert_eq!(
            FeatureSchema::with_department().feature_names().last().map(String::as_str),
            Some(DEPARTMENT_FEATURE)
        );
    }

    #[test]
    fn test_only_encoder_layouts_are_known() {
        assert!(FeatureSchema::base().is_known_layout());
        assert!(FeatureSchema::with_department().is_known_layout());

        let reordered: FeatureSchema = serde_json::from_value(serde_json::json!({
            "feature_names": ["avg_salary", "headcount", "turnover_rate", "benefits_multiplier"]
        }))
        .unwrap();
        assert!(!reordered.is_known_layout());

        let widened: FeatureSchema = serde_json::from_value(serde_json::json!({
            "feature_names": ["headcount", "avg_salary", "turnover_rate", "benefits_multiplier", "department_encoded", "region"]
        }))
        .unwrap();
        assert!(!widened.is_known_layout());
    }
}
