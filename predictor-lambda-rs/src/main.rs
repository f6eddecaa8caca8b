// predictor-lambda-rs/src/main.rs
// Serverless entry point: builds the handler context once, then serves events

use std::sync::Arc;

use anyhow::Context;
use dotenv::dotenv;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde_json::Value;
use tracing::info;

use cost_model::{init_logging, LoggingConfig};
use predictor_lambda::{
    DynamoRecordStore, EndpointTarget, FileRecordStore, HandlerContext, HttpEndpoint,
    PredictionEndpoint, PredictorConfig, RecordStore, RequestHandler, SageMakerEndpoint,
    StoreTarget,
};

async fn build_context(config: &PredictorConfig) -> anyhow::Result<HandlerContext> {
    let sdk_config = if config.uses_aws() {
        Some(aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await)
    } else {
        None
    };

    let endpoint: Arc<dyn PredictionEndpoint> = match (&config.endpoint, &sdk_config) {
        (EndpointTarget::SageMaker(name), Some(sdk)) => {
            Arc::new(SageMakerEndpoint::from_conf(sdk, name.as_str()))
        }
        (EndpointTarget::Http(url), _) => Arc::new(HttpEndpoint::new(url)),
        (EndpointTarget::SageMaker(_), None) => anyhow::bail!("AWS configuration was not loaded"),
    };

    let store: Arc<dyn RecordStore> = match (&config.store, &sdk_config) {
        (StoreTarget::DynamoDb(table), Some(sdk)) => {
            Arc::new(DynamoRecordStore::from_conf(sdk, table.as_str()))
        }
        (StoreTarget::File(path), _) => Arc::new(FileRecordStore::new(path.clone())),
        (StoreTarget::DynamoDb(_), None) => anyhow::bail!("AWS configuration was not loaded"),
    };

    info!(endpoint = %endpoint.name(), store = ?config.store, "Handler context ready");
    Ok(HandlerContext::new(endpoint, store))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenv().ok();
    init_logging(&LoggingConfig::from_env("predictor-lambda", true));

    let config = PredictorConfig::from_env().context("invalid handler configuration")?;
    let handler = RequestHandler::new(build_context(&config).await?);

    run(service_fn(move |event: LambdaEvent<Value>| {
        let handler = handler.clone();
        async move { Ok::<_, Error>(handler.handle(event.payload).await) }
    }))
    .await
}
