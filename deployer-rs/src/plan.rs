//! Deployment plan: every name and setting decided before any call is made

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{DeployError, Result};

pub const DEFAULT_ENDPOINT_NAME: &str = "workforce-cost-predictor-endpoint";
pub const DEFAULT_INSTANCE_TYPE: &str = "ml.t2.medium";
pub const VARIANT_NAME: &str = "AllTraffic";
pub const INSTANCE_COUNT: i32 = 1;

/// Upper bound on SageMaker resource names
pub const MAX_NAME_LEN: usize = 63;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H-%M-%S";

/// Caller-supplied deployment settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentRequest {
    pub model_s3_path: String,
    pub endpoint_name: String,
    pub role_arn: String,
    pub image_uri: String,
    pub instance_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeploymentPlan {
    pub model_name: String,
    pub endpoint_config_name: String,
    pub endpoint_name: String,
    pub model_s3_path: String,
    pub role_arn: String,
    pub image_uri: String,
    pub instance_type: String,
    pub variant_name: String,
    pub instance_count: i32,
}

impl DeploymentPlan {
    /// Validate the request and derive resource names from `now`
    pub fn new(request: DeploymentRequest, now: DateTime<Utc>) -> Result<Self> {
        if !request.model_s3_path.starts_with("s3://") || request.model_s3_path.len() <= 5 {
            return Err(DeployError::InvalidModelPath(request.model_s3_path));
        }
        require("endpoint name", &request.endpoint_name)?;
        require("role ARN", &request.role_arn)?;
        require("image URI", &request.image_uri)?;
        require("instance type", &request.instance_type)?;

        if request.endpoint_name.len() > MAX_NAME_LEN
            || !request
                .endpoint_name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Err(DeployError::InvalidArgument {
                field: "endpoint name".to_string(),
                reason: format!(
                    "{:?} must be at most {} ASCII letters, digits or hyphens",
                    request.endpoint_name, MAX_NAME_LEN
                ),
            });
        }

        let stamp = now.format(TIMESTAMP_FORMAT).to_string();
        Ok(Self {
            model_name: derived_name(&request.endpoint_name, "model", &stamp),
            endpoint_config_name: derived_name(&request.endpoint_name, "config", &stamp),
            endpoint_name: request.endpoint_name,
            model_s3_path: request.model_s3_path,
            role_arn: request.role_arn,
            image_uri: request.image_uri,
            instance_type: request.instance_type,
            variant_name: VARIANT_NAME.to_string(),
            instance_count: INSTANCE_COUNT,
        })
    }
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(DeployError::InvalidArgument {
            field: field.to_string(),
            reason: "must not be empty".to_string(),
        });
    }
    Ok(())
}

/// `<endpoint>-<kind>-<stamp>`, shortening the endpoint part to fit
fn derived_name(endpoint_name: &str, kind: &str, stamp: &str) -> String {
    let suffix = format!("-{}-{}", kind, stamp);
    let keep = MAX_NAME_LEN.saturating_sub(suffix.len()).min(endpoint_name.len());
    let prefix = endpoint_name[..keep].trim_end_matches('-');
    format!("{}{}", prefix, suffix)
}
