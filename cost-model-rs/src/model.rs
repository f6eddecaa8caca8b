//! Gradient-boosted regression model backed by XGBoost
//!
//! Trees use the exact split finder with no row or column subsampling, so
//! fitting the same data twice produces the same booster.

use std::fmt;
use std::path::Path;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::info;
use xgboost::parameters::learning::{LearningTaskParametersBuilder, Objective};
use xgboost::parameters::tree::{TreeBoosterParametersBuilder, TreeMethod};
use xgboost::parameters::{BoosterParametersBuilder, BoosterType, TrainingParametersBuilder};
use xgboost::{Booster, DMatrix};

use crate::error::{ModelError, Result};
use crate::features::{FeatureSchema, FeatureVector};

/// Boosting hyperparameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoosterParams {
    pub n_estimators: u32,
    pub max_depth: u32,
    pub learning_rate: f32,
    /// L2 regularization on leaf weights
    pub reg_lambda: f32,
    /// Minimum hessian sum on each side of a split
    pub min_child_weight: f32,
}

impl Default for BoosterParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_depth: 6,
            learning_rate: 0.1,
            reg_lambda: 1.0,
            min_child_weight: 1.0,
        }
    }
}

/// Owned booster handle.
struct BoosterHandle(Booster);

// SAFETY: the native handle is not bound to the thread that created it, and
// every access goes through the model's mutex.
unsafe impl Send for BoosterHandle {}

/// Trained regression model: the booster plus the schema it was fit on
pub struct RegressionModel {
    schema: FeatureSchema,
    booster: Mutex<BoosterHandle>,
}

impl fmt::Debug for RegressionModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegressionModel")
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

impl RegressionModel {
    /// Fit a squared-error booster on schema-ordered rows
    pub fn fit(
        schema: FeatureSchema,
        rows: &[FeatureVector],
        targets: &[f64],
        params: BoosterParams,
    ) -> Result<Self> {
        if rows.is_empty() {
            return Err(ModelError::EmptyTrainingSet);
        }
        if rows.len() != targets.len() {
            return Err(ModelError::invalid_input(format!(
                "{} rows but {} targets",
                rows.len(),
                targets.len()
            )));
        }
        if let Some(row) = rows.iter().find(|row| row.len() != schema.width()) {
            return Err(ModelError::FeatureCountMismatch {
                expected: schema.width(),
                actual: row.len(),
            });
        }

        info!(
            rows = rows.len(),
            features = schema.width(),
            n_estimators = params.n_estimators,
            max_depth = params.max_depth,
            learning_rate = params.learning_rate,
            "Fitting boosted regression trees"
        );

        let mut dtrain = dense_matrix(rows)?;
        let labels: Vec<f32> = targets.iter().map(|&t| t as f32).collect();
        dtrain.set_labels(&labels)?;
        let base_score = targets.iter().sum::<f64>() / targets.len() as f64;

        let learning_params = LearningTaskParametersBuilder::default()
            .objective(Objective::RegLinear)
            .base_score(base_score as f32)
            .build()
            .map_err(ModelError::booster)?;
        let tree_params = TreeBoosterParametersBuilder::default()
            .max_depth(params.max_depth)
            .eta(params.learning_rate)
            .lambda(params.reg_lambda)
            .min_child_weight(params.min_child_weight)
            .tree_method(TreeMethod::Exact)
            .build()
            .map_err(ModelError::booster)?;
        let booster_params = BoosterParametersBuilder::default()
            .booster_type(BoosterType::Tree(tree_params))
            .learning_params(learning_params)
            .verbose(false)
            .build()
            .map_err(ModelError::booster)?;
        let training_params = TrainingParametersBuilder::default()
            .dtrain(&dtrain)
            .boost_rounds(params.n_estimators)
            .booster_params(booster_params)
            .evaluation_sets(None)
            .build()
            .map_err(ModelError::booster)?;

        let booster = Booster::train(&training_params)?;
        Ok(Self::from_booster(schema, booster))
    }

    fn from_booster(schema: FeatureSchema, booster: Booster) -> Self {
        Self {
            schema,
            booster: Mutex::new(BoosterHandle(booster)),
        }
    }

    /// Load a saved booster and check it scores a row of the schema's width
    pub fn load(schema: FeatureSchema, booster_path: &Path) -> Result<Self> {
        let corrupt = |reason: String| ModelError::CorruptArtifact {
            path: booster_path.to_path_buf(),
            reason,
        };

        let booster = Booster::load(booster_path).map_err(|e| corrupt(e.to_string()))?;
        let model = Self::from_booster(schema, booster);

        let zeros = FeatureVector::new(vec![0.0; model.schema.width()]);
        match model.predict(&zeros) {
            Ok(value) if value.is_finite() => Ok(model),
            Ok(value) => Err(corrupt(format!("non-finite prediction {}", value))),
            Err(e) => Err(corrupt(e.to_string())),
        }
    }

    /// Write the booster in XGBoost's binary format
    pub fn save(&self, booster_path: &Path) -> Result<()> {
        let booster = self.lock()?;
        booster.0.save(booster_path)?;
        Ok(())
    }

    /// Predict a single row
    pub fn predict(&self, features: &FeatureVector) -> Result<f64> {
        let mut predictions = self.predict_batch(std::slice::from_ref(features))?;
        predictions
            .pop()
            .ok_or_else(|| ModelError::booster("booster returned no prediction"))
    }

    /// Predict many rows
    pub fn predict_batch(&self, rows: &[FeatureVector]) -> Result<Vec<f64>> {
        if let Some(row) = rows.iter().find(|row| row.len() != self.schema.width()) {
            return Err(ModelError::FeatureCountMismatch {
                expected: self.schema.width(),
                actual: row.len(),
            });
        }
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let matrix = dense_matrix(rows)?;
        let predictions = self.lock()?.0.predict(&matrix)?;
        Ok(predictions.into_iter().map(f64::from).collect())
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BoosterHandle>> {
        self.booster
            .lock()
            .map_err(|_| ModelError::booster("booster lock poisoned"))
    }
}

fn dense_matrix(rows: &[FeatureVector]) -> Result<DMatrix> {
    let values: Vec<f32> = rows
        .iter()
        .flat_map(|row| row.as_slice().iter().map(|&v| v as f32))
        .collect();
    Ok(DMatrix::from_dense(&values, rows.len())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear_dataset() -> (Vec<FeatureVector>, Vec<f64>) {
        let rows: Vec<FeatureVector> = (0..40)
            .map(|i| {
                let headcount = 10.0 + i as f64;
                FeatureVector::new(vec![headcount, 50000.0, 0.1, 1.35])
            })
            .collect();
        let targets = rows.iter().map(|r| r.as_slice()[0] * 1000.0).collect();
        (rows, targets)
    }

    fn fit_default() -> RegressionModel {
        let (rows, targets) = linear_dataset();
        RegressionModel::fit(FeatureSchema::base(), &rows, &targets, BoosterParams::default())
            .unwrap()
    }

    #[test]
    fn test_fit_reduces_error() {
        let (rows, targets) = linear_dataset();
        let model = fit_default();

        let mean = targets.iter().sum::<f64>() / targets.len() as f64;
        let predictions = model.predict_batch(&rows).unwrap();
        let baseline: f64 = targets.iter().map(|t| (t - mean).abs()).sum();
        let fitted: f64 = predictions.iter().zip(&targets).map(|(p, t)| (p - t).abs()).sum();
        assert!(fitted < baseline * 0.1);
    }

    #[test]
    fn test_fit_is_deterministic() {
        let (rows, _) = linear_dataset();
        let first = fit_default().predict_batch(&rows).unwrap();
        let second = fit_default().predict_batch(&rows).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_rejects_wrong_width() {
        let err = fit_default()
            .predict(&FeatureVector::new(vec![1.0, 2.0, 3.0, 4.0, 5.0]))
            .unwrap_err();
        assert!(matches!(
            err,
            ModelError::FeatureCountMismatch { expected: 4, actual: 5 }
        ));
    }

    #[test]
    fn test_empty_training_set() {
        let err = RegressionModel::fit(FeatureSchema::base(), &[], &[], BoosterParams::default())
            .unwrap_err();
        assert!(matches!(err, ModelError::EmptyTrainingSet));
    }

    #[test]
    fn test_save_then_load_predicts_identically() {
        let (rows, _) = linear_dataset();
        let model = fit_default();
        let tmp_dir = tempfile::tempdir().expect("tempdir");
        let path = tmp_dir.path().join("model.bin");

        model.save(&path).unwrap();
        let loaded = RegressionModel::load(FeatureSchema::base(), &path).unwrap();

        assert_eq!(
            loaded.predict_batch(&rows).unwrap(),
            model.predict_batch(&rows).unwrap()
        );
    }

    #[test]
    fn test_garbage_booster_is_corrupt() {
        let tmp_dir = tempfile::tempdir().expect("tempdir");
        let path = tmp_dir.path().join("model.bin");
        std::fs::write(&path, b"\x00\x01not a booster").unwrap();

        match RegressionModel::load(FeatureSchema::base(), &path) {
            Err(ModelError::CorruptArtifact { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected CorruptArtifact, got {:?}", other),
        }
    }
}
