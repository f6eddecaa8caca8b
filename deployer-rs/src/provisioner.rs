//! Hosting provisioner and the deployment sequence
//!
//! Resources are created in dependency order: model, endpoint config,
//! endpoint. A failure stops the sequence; nothing already created is
//! rolled back.

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_sagemaker::error::DisplayErrorContext;
use aws_sdk_sagemaker::types::{
    ContainerDefinition, EndpointStatus, ProductionVariant, ProductionVariantInstanceType,
};
use tracing::{info, warn};

use crate::error::{DeployError, Result};
use crate::plan::DeploymentPlan;

/// Endpoint lifecycle as far as deployment cares
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndpointState {
    InService,
    Failed(String),
    /// Still transitioning; carries the provider's status text
    Pending(String),
}

/// Seam over the managed hosting service
#[async_trait]
pub trait HostingProvisioner: Send + Sync {
    async fn create_model(&self, plan: &DeploymentPlan) -> Result<()>;
    async fn create_endpoint_config(&self, plan: &DeploymentPlan) -> Result<()>;
    async fn create_endpoint(&self, plan: &DeploymentPlan) -> Result<()>;
    async fn endpoint_state(&self, endpoint_name: &str) -> Result<EndpointState>;
}

/// How long to wait for the endpoint to come into service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    pub poll_interval: Duration,
    pub max_attempts: u32,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        // Endpoint creation usually takes 5 to 10 minutes
        Self {
            poll_interval: Duration::from_secs(30),
            max_attempts: 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeploymentOutcome {
    InService,
    /// Creation requested, status not awaited
    Requested,
}

/// Create every resource in the plan, then optionally wait for service
pub async fn deploy(
    provisioner: &dyn HostingProvisioner,
    plan: &DeploymentPlan,
    wait: Option<WaitPolicy>,
) -> Result<DeploymentOutcome> {
    info!(model = %plan.model_name, image = %plan.image_uri, "Creating model");
    provisioner.create_model(plan).await?;

    info!(config = %plan.endpoint_config_name, instance_type = %plan.instance_type, "Creating endpoint config");
    provisioner.create_endpoint_config(plan).await?;

    info!(endpoint = %plan.endpoint_name, "Creating endpoint");
    provisioner.create_endpoint(plan).await?;

    match wait {
        Some(policy) => wait_for_endpoint(provisioner, &plan.endpoint_name, policy).await,
        None => Ok(DeploymentOutcome::Requested),
    }
}

/// Poll until the endpoint is in service or has failed
pub async fn wait_for_endpoint(
    provisioner: &dyn HostingProvisioner,
    endpoint_name: &str,
    policy: WaitPolicy,
) -> Result<DeploymentOutcome> {
    for attempt in 1..=policy.max_attempts {
        match provisioner.endpoint_state(endpoint_name).await? {
            EndpointState::InService => {
                info!(endpoint = %endpoint_name, attempt, "Endpoint in service");
                return Ok(DeploymentOutcome::InService);
            }
            EndpointState::Failed(reason) => {
                warn!(endpoint = %endpoint_name, reason = %reason, "Endpoint creation failed");
                return Err(DeployError::EndpointFailed {
                    endpoint: endpoint_name.to_string(),
                    reason,
                });
            }
            EndpointState::Pending(status) => {
                info!(endpoint = %endpoint_name, status = %status, attempt, "Waiting for endpoint");
            }
        }

        if attempt < policy.max_attempts {
            tokio::time::sleep(policy.poll_interval).await;
        }
    }

    Err(DeployError::Timeout {
        endpoint: endpoint_name.to_string(),
        attempts: policy.max_attempts,
    })
}

/// SageMaker control-plane client
#[derive(Debug, Clone)]
pub struct SageMakerProvisioner {
    client: aws_sdk_sagemaker::Client,
}

impl SageMakerProvisioner {
    pub fn new(client: aws_sdk_sagemaker::Client) -> Self {
        Self { client }
    }

    pub fn from_conf(sdk_config: &aws_config::SdkConfig) -> Self {
        Self::new(aws_sdk_sagemaker::Client::new(sdk_config))
    }
}

#[async_trait]
impl HostingProvisioner for SageMakerProvisioner {
    async fn create_model(&self, plan: &DeploymentPlan) -> Result<()> {
        let container = ContainerDefinition::builder()
            .image(&plan.image_uri)
            .model_data_url(&plan.model_s3_path)
            .build();

        self.client
            .create_model()
            .model_name(&plan.model_name)
            .execution_role_arn(&plan.role_arn)
            .primary_container(container)
            .send()
            .await
            .map_err(|e| DeployError::provisioning("CreateModel", DisplayErrorContext(&e).to_string()))?;
        Ok(())
    }

    async fn create_endpoint_config(&self, plan: &DeploymentPlan) -> Result<()> {
        let variant = ProductionVariant::builder()
            .variant_name(&plan.variant_name)
            .model_name(&plan.model_name)
            .initial_instance_count(plan.instance_count)
            .instance_type(ProductionVariantInstanceType::from(plan.instance_type.as_str()))
            .build();

        self.client
            .create_endpoint_config()
            .endpoint_config_name(&plan.endpoint_config_name)
            .production_variants(variant)
            .send()
            .await
            .map_err(|e| {
                DeployError::provisioning("CreateEndpointConfig", DisplayErrorContext(&e).to_string())
            })?;
        Ok(())
    }

    async fn create_endpoint(&self, plan: &DeploymentPlan) -> Result<()> {
        self.client
            .create_endpoint()
            .endpoint_name(&plan.endpoint_name)
            .endpoint_config_name(&plan.endpoint_config_name)
            .send()
            .await
            .map_err(|e| DeployError::provisioning("CreateEndpoint", DisplayErrorContext(&e).to_string()))?;
        Ok(())
    }

    async fn endpoint_state(&self, endpoint_name: &str) -> Result<EndpointState> {
        let output = self
            .client
            .describe_endpoint()
            .endpoint_name(endpoint_name)
            .send()
            .await
            .map_err(|e| DeployError::provisioning("DescribeEndpoint", DisplayErrorContext(&e).to_string()))?;

        Ok(match output.endpoint_status() {
            Some(EndpointStatus::InService) => EndpointState::InService,
            Some(EndpointStatus::Failed) => EndpointState::Failed(
                output
                    .failure_reason()
                    .unwrap_or("no failure reason reported")
                    .to_string(),
            ),
            Some(status) => EndpointState::Pending(status.as_str().to_string()),
            None => EndpointState::Pending("Unknown".to_string()),
        })
    }
}
