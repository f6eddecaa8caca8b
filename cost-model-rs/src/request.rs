//! Prediction request record
//!
//! This is also the wire shape of the hosted endpoint's request body.

use serde::{Deserialize, Serialize};

/// Benefits multiplier applied when the caller omits one
pub const DEFAULT_BENEFITS_MULTIPLIER: f64 = 1.35;

/// Department name sent to the endpoint when the caller omits one
pub const DEFAULT_DEPARTMENT: &str = "General";

/// Fields that must be present before any model call
pub const REQUIRED_FIELDS: [&str; 3] = ["headcount", "avg_salary", "turnover_rate"];

fn default_benefits_multiplier() -> f64 {
    DEFAULT_BENEFITS_MULTIPLIER
}

/// Workforce cost prediction input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub headcount: u64,
    pub avg_salary: f64,
    /// Fraction of staff leaving per year; expected within 0..=1 but not checked
    pub turnover_rate: f64,
    #[serde(default = "default_benefits_multiplier")]
    pub benefits_multiplier: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

impl PredictionRequest {
    pub fn new(headcount: u64, avg_salary: f64, turnover_rate: f64) -> Self {
        Self {
            headcount,
            avg_salary,
            turnover_rate,
            benefits_multiplier: DEFAULT_BENEFITS_MULTIPLIER,
            department: None,
        }
    }

    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    pub fn with_benefits_multiplier(mut self, multiplier: f64) -> Self {
        self.benefits_multiplier = multiplier;
        self
    }

    /// Fill the department with [`DEFAULT_DEPARTMENT`] if it is missing
    pub fn with_defaults(mut self) -> Self {
        if self.department.is_none() {
            self.department = Some(DEFAULT_DEPARTMENT.to_string());
        }
        self
    }

    /// Department after defaults, as persisted
    pub fn department_or_default(&self) -> &str {
        self.department.as_deref().unwrap_or(DEFAULT_DEPARTMENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_benefits_multiplier_defaults_on_deserialize() {
        let request: PredictionRequest = serde_json::from_value(json!({
            "headcount": 120,
            "avg_salary": 65000.0,
            "turnover_rate": 0.12
        }))
        .unwrap();

        assert_eq!(request.benefits_multiplier, DEFAULT_BENEFITS_MULTIPLIER);
        assert_eq!(request.department, None);
        assert_eq!(request.department_or_default(), "General");
    }

    #[test]
    fn test_with_defaults_keeps_explicit_department() {
        let request = PredictionRequest::new(10, 50000.0, 0.1)
            .with_department("Engineering")
            .with_defaults();
        assert_eq!(request.department.as_deref(), Some("Engineering"));

        let request = PredictionRequest::new(10, 50000.0, 0.1).with_defaults();
        assert_eq!(request.department.as_deref(), Some("General"));
    }
}
