// trainer-rs/src/main.rs
// Command line entry point for the training job

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use dotenv::dotenv;

use cost_model::{init_logging, LoggingConfig};
use trainer::pipeline::{DEFAULT_DATA_PATH, DEFAULT_OUTPUT_PATH};
use trainer::TrainingConfig;

/// Train the workforce cost model
#[derive(Debug, Parser)]
#[command(name = "train-model", version)]
struct Args {
    /// Labelled training data (CSV)
    #[arg(long, default_value = DEFAULT_DATA_PATH)]
    data_path: PathBuf,

    /// Directory that receives the booster, its schema and the label encoder
    #[arg(long, default_value = DEFAULT_OUTPUT_PATH)]
    output_path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging(&LoggingConfig::from_env("train-model", false));

    let args = Args::parse();
    let config = TrainingConfig {
        data_path: args.data_path,
        output_path: args.output_path,
        ..TrainingConfig::default()
    };

    let report = trainer::run(&config)
        .with_context(|| format!("training on {} failed", config.data_path.display()))?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
