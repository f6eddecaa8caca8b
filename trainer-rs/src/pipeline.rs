//! Training pipeline: encode, split, fit, evaluate, save

use std::path::PathBuf;

use serde::Serialize;
use tracing::info;

use cost_model::metrics::{r2_score, rmse};
use cost_model::{
    ArtifactStore, BoosterParams, CategoricalEncoder, FeatureEncoder, FeatureSchema,
    FeatureVector, RegressionModel,
};

use crate::dataset::Dataset;
use crate::error::Result;
use crate::split::{train_test_split, DEFAULT_SEED, DEFAULT_TEST_FRACTION};

pub const DEFAULT_DATA_PATH: &str = "../data/training_data.csv";
pub const DEFAULT_OUTPUT_PATH: &str = "./model_artifacts";

#[derive(Debug, Clone)]
pub struct TrainingConfig {
    pub data_path: PathBuf,
    pub output_path: PathBuf,
    pub test_fraction: f64,
    pub seed: u64,
    pub params: BoosterParams,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            test_fraction: DEFAULT_TEST_FRACTION,
            seed: DEFAULT_SEED,
            params: BoosterParams::default(),
        }
    }
}

/// Evaluation on both sides of the split
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingReport {
    pub train_rows: usize,
    pub test_rows: usize,
    pub feature_names: Vec<String>,
    pub train_rmse: f64,
    pub test_rmse: f64,
    pub train_r2: f64,
    pub test_r2: f64,
}

/// Fitted artifacts plus their evaluation
#[derive(Debug)]
pub struct TrainedModel {
    pub model: RegressionModel,
    pub encoder: CategoricalEncoder,
    pub report: TrainingReport,
}

/// Fit on an in-memory dataset without touching the filesystem
pub fn train(dataset: &Dataset, config: &TrainingConfig) -> Result<TrainedModel> {
    let (schema, encoder) = if dataset.has_department() {
        (
            FeatureSchema::with_department(),
            CategoricalEncoder::fit(dataset.departments()),
        )
    } else {
        (FeatureSchema::base(), CategoricalEncoder::default())
    };

    let features = FeatureEncoder::new(&schema, &encoder);
    let rows = dataset
        .rows()
        .iter()
        .map(|row| {
            features.encode_values(
                row.headcount,
                row.avg_salary,
                row.turnover_rate,
                row.benefits_multiplier,
                row.department.as_deref(),
            )
        })
        .collect::<cost_model::Result<Vec<FeatureVector>>>()?;
    let targets = dataset.targets();

    let split = train_test_split(rows.len(), config.test_fraction, config.seed)?;
    let pick_rows = |idx: &[usize]| idx.iter().map(|&i| rows[i].clone()).collect::<Vec<_>>();
    let pick_targets = |idx: &[usize]| idx.iter().map(|&i| targets[i]).collect::<Vec<_>>();
    let (train_x, test_x) = (pick_rows(&split.train), pick_rows(&split.test));
    let (train_y, test_y) = (pick_targets(&split.train), pick_targets(&split.test));

    info!(
        train_rows = train_x.len(),
        test_rows = test_x.len(),
        departments = encoder.classes().len(),
        "Split training data"
    );

    let model = RegressionModel::fit(schema.clone(), &train_x, &train_y, config.params.clone())?;
    let train_pred = model.predict_batch(&train_x)?;
    let test_pred = model.predict_batch(&test_x)?;

    let report = TrainingReport {
        train_rows: train_x.len(),
        test_rows: test_x.len(),
        feature_names: schema.feature_names().to_vec(),
        train_rmse: rmse(&train_y, &train_pred),
        test_rmse: rmse(&test_y, &test_pred),
        train_r2: r2_score(&train_y, &train_pred),
        test_r2: r2_score(&test_y, &test_pred),
    };

    info!(
        train_rmse = report.train_rmse,
        test_rmse = report.test_rmse,
        train_r2 = report.train_r2,
        test_r2 = report.test_r2,
        "Model evaluated"
    );

    Ok(TrainedModel {
        model,
        encoder,
        report,
    })
}

/// Load the CSV, train, and write both artifacts to the output directory
pub fn run(config: &TrainingConfig) -> Result<TrainingReport> {
    let dataset = Dataset::from_path(&config.data_path)?;
    let trained = train(&dataset, config)?;

    ArtifactStore::new(&config.output_path).save(&trained.model, &trained.encoder)?;
    info!(output = %config.output_path.display(), "Training complete");

    Ok(trained.report)
}
