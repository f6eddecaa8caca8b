//! Handler configuration from the environment

use std::env;
use std::path::PathBuf;

use crate::error::ConfigError;

pub const SAGEMAKER_ENDPOINT_VAR: &str = "SAGEMAKER_ENDPOINT";
pub const ENDPOINT_URL_VAR: &str = "PREDICTION_ENDPOINT_URL";
pub const DYNAMODB_TABLE_VAR: &str = "DYNAMODB_TABLE";
pub const RECORDS_PATH_VAR: &str = "PREDICTION_RECORDS_PATH";

/// Where predictions are computed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndpointTarget {
    SageMaker(String),
    Http(String),
}

/// Where prediction records go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreTarget {
    DynamoDb(String),
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictorConfig {
    pub endpoint: EndpointTarget,
    pub store: StoreTarget,
}

impl PredictorConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Managed services win when both a managed and a local target are set
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let endpoint = match (non_empty(SAGEMAKER_ENDPOINT_VAR), non_empty(ENDPOINT_URL_VAR)) {
            (Some(name), _) => EndpointTarget::SageMaker(name),
            (None, Some(url)) => EndpointTarget::Http(url),
            (None, None) => {
                return Err(ConfigError::MissingEndpoint(format!(
                    "{} or {}",
                    SAGEMAKER_ENDPOINT_VAR, ENDPOINT_URL_VAR
                )))
            }
        };

        let store = match (non_empty(DYNAMODB_TABLE_VAR), non_empty(RECORDS_PATH_VAR)) {
            (Some(table), _) => StoreTarget::DynamoDb(table),
            (None, Some(path)) => StoreTarget::File(PathBuf::from(path)),
            (None, None) => {
                return Err(ConfigError::MissingStore(format!(
                    "{} or {}",
                    DYNAMODB_TABLE_VAR, RECORDS_PATH_VAR
                )))
            }
        };

        Ok(Self { endpoint, store })
    }

    /// Whether any AWS client is needed
    pub fn uses_aws(&self) -> bool {
        matches!(self.endpoint, EndpointTarget::SageMaker(_))
            || matches!(self.store, StoreTarget::DynamoDb(_))
    }
}
