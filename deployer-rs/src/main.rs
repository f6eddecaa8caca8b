// deployer-rs/src/main.rs
// Command line entry point: plan, provision and (optionally) wait

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use dotenv::dotenv;
use tracing::info;

use cost_model::{init_logging, LoggingConfig};
use deployer::plan::{DEFAULT_ENDPOINT_NAME, DEFAULT_INSTANCE_TYPE};
use deployer::{
    deploy, DeploymentOutcome, DeploymentPlan, DeploymentRequest, SageMakerProvisioner, WaitPolicy,
};

/// Deploy trained model artifacts to a SageMaker endpoint
#[derive(Debug, Parser)]
#[command(name = "deploy-endpoint", version)]
struct Args {
    /// S3 path to the packaged artifacts (s3://bucket/path/model.tar.gz)
    #[arg(long)]
    model_s3_path: String,

    #[arg(long, default_value = DEFAULT_ENDPOINT_NAME)]
    endpoint_name: String,

    /// SageMaker execution role ARN
    #[arg(long)]
    role_arn: String,

    /// Inference server container image
    #[arg(long, env = "INFERENCE_IMAGE_URI")]
    image_uri: String,

    #[arg(long, default_value = DEFAULT_INSTANCE_TYPE)]
    instance_type: String,

    /// Return once creation is requested instead of waiting for InService
    #[arg(long)]
    no_wait: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging(&LoggingConfig::from_env("deploy-endpoint", false));

    let args = Args::parse();
    let plan = DeploymentPlan::new(
        DeploymentRequest {
            model_s3_path: args.model_s3_path,
            endpoint_name: args.endpoint_name,
            role_arn: args.role_arn,
            image_uri: args.image_uri,
            instance_type: args.instance_type,
        },
        Utc::now(),
    )?;
    info!(plan = %serde_json::to_string(&plan)?, "Deployment plan");

    let sdk_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let provisioner = SageMakerProvisioner::from_conf(&sdk_config);
    let wait = (!args.no_wait).then(WaitPolicy::default);

    let outcome = deploy(&provisioner, &plan, wait)
        .await
        .with_context(|| format!("deployment of {} failed", plan.endpoint_name))?;

    match outcome {
        DeploymentOutcome::InService => {
            println!("Model deployed successfully to endpoint: {}", plan.endpoint_name)
        }
        DeploymentOutcome::Requested => {
            println!("Endpoint creation started: {}", plan.endpoint_name)
        }
    }
    Ok(())
}
