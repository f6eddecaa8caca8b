//! Request validation
//!
//! Presence is checked first, field by field in a fixed order, so the
//! response names the first missing field only. Types and ranges are checked
//! second.

use cost_model::{PredictionRequest, REQUIRED_FIELDS};
use serde_json::Value;

use crate::error::HandlerError;
use crate::event::Payload;

/// Turn a decoded payload into a typed request
pub fn validate_payload(payload: &Payload) -> Result<PredictionRequest, HandlerError> {
    if let Some(field) = REQUIRED_FIELDS.iter().find(|f| !payload.contains_key(**f)) {
        return Err(HandlerError::MissingField(field.to_string()));
    }

    for field in REQUIRED_FIELDS
        .iter()
        .copied()
        .chain(["benefits_multiplier", "department"])
    {
        if let Some(value) = payload.get(field) {
            check_field(field, value)?;
        }
    }

    let mut normalized = payload.clone();
    if let Some(headcount) = payload.get("headcount").and_then(whole_number) {
        normalized.insert("headcount".to_string(), Value::from(headcount));
    }

    serde_json::from_value(Value::Object(normalized)).map_err(|e| HandlerError::InvalidField {
        field: "request".to_string(),
        reason: e.to_string(),
    })
}

fn check_field(field: &str, value: &Value) -> Result<(), HandlerError> {
    let ok = match field {
        "headcount" => matches!(whole_number(value), Some(n) if n >= 1),
        "avg_salary" => matches!(value.as_f64(), Some(v) if v > 0.0),
        "department" => value.is_string() || value.is_null(),
        _ => value.is_number(),
    };

    if ok {
        Ok(())
    } else {
        Err(HandlerError::InvalidField {
            field: field.to_string(),
            reason: format!("unexpected value {}", value),
        })
    }
}

/// Integer value of a JSON number with no fractional part (`1500` or `1500.0`)
fn whole_number(value: &Value) -> Option<u64> {
    if let Some(n) = value.as_u64() {
        return Some(n);
    }

    let n = value.as_f64()?;
    if n.is_finite() && n.fract() == 0.0 && n >= 0.0 && n <= u64::MAX as f64 {
        Some(n as u64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> Payload {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_first_missing_field_is_reported() {
        let err = validate_payload(&payload(json!({ "turnover_rate": 0.1 }))).unwrap_err();
        assert_eq!(err.to_string(), "Missing required field: headcount");

        let err = validate_payload(&payload(json!({ "headcount": 5 }))).unwrap_err();
        assert_eq!(err.to_string(), "Missing required field: avg_salary");
    }

    #[test]
    fn test_valid_payload_gets_defaults() {
        let request = validate_payload(&payload(json!({
            "headcount": 1500,
            "avg_salary": 85000,
            "turnover_rate": 0.15
        })))
        .unwrap();

        assert_eq!(request.headcount, 1500);
        assert_eq!(request.avg_salary, 85000.0);
        assert_eq!(request.benefits_multiplier, 1.35);
        assert_eq!(request.department, None);
    }

    #[test]
    fn test_wrong_type_names_field() {
        let err = validate_payload(&payload(json!({
            "headcount": 10,
            "avg_salary": "lots",
            "turnover_rate": 0.1
        })))
        .unwrap_err();

        match err {
            HandlerError::InvalidField { field, .. } => assert_eq!(field, "avg_salary"),
            other => panic!("expected InvalidField, got {:?}", other),
        }
    }

    #[test]
    fn test_fractional_headcount_is_invalid() {
        let err = validate_payload(&payload(json!({
            "headcount": 10.5,
            "avg_salary": 1.0,
            "turnover_rate": 0.1
        })))
        .unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_whole_float_headcount_is_accepted() {
        let request = validate_payload(&payload(json!({
            "headcount": 1500.0,
            "avg_salary": 85000,
            "turnover_rate": 0.15
        })))
        .unwrap();
        assert_eq!(request.headcount, 1500);
    }

    #[test]
    fn test_headcount_must_be_positive() {
        for headcount in [json!(0), json!(-3), json!(0.0)] {
            let err = validate_payload(&payload(json!({
                "headcount": headcount,
                "avg_salary": 85000,
                "turnover_rate": 0.15
            })))
            .unwrap_err();
            assert_eq!(err.status_code(), 400);
            assert_eq!(err.public_message(), "Invalid value for field: headcount");
        }
    }

    #[test]
    fn test_avg_salary_must_be_positive() {
        for salary in [json!(0), json!(0.0), json!(-42000.5)] {
            let err = validate_payload(&payload(json!({
                "headcount": 10,
                "avg_salary": salary,
                "turnover_rate": 0.15
            })))
            .unwrap_err();
            assert_eq!(err.status_code(), 400);
            assert_eq!(err.public_message(), "Invalid value for field: avg_salary");
        }
    }
}
