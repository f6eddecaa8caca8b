//! Model artifact directory
//!
//! Training writes the booster, its feature schema and the department
//! encoder into one directory; inference reads them back once at cold start.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;

use crate::encoder::CategoricalEncoder;
use crate::error::{ModelError, Result};
use crate::features::FeatureSchema;
use crate::model::RegressionModel;

/// File name of the XGBoost booster
pub const MODEL_FILE: &str = "model.bin";

/// File name of the feature schema sidecar
pub const SCHEMA_FILE: &str = "feature_schema.json";

/// File name of the serialized department encoder
pub const ENCODER_FILE: &str = "label_encoder.json";

/// Reads and writes the artifact set in a directory
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn model_path(&self) -> PathBuf {
        self.dir.join(MODEL_FILE)
    }

    pub fn schema_path(&self) -> PathBuf {
        self.dir.join(SCHEMA_FILE)
    }

    pub fn encoder_path(&self) -> PathBuf {
        self.dir.join(ENCODER_FILE)
    }

    /// Load the model and encoder
    pub fn load(&self) -> Result<(RegressionModel, CategoricalEncoder)> {
        let schema = self.load_schema()?;

        let model_path = self.model_path();
        if !model_path.is_file() {
            return Err(ModelError::ArtifactNotFound { path: model_path });
        }
        let model = RegressionModel::load(schema, &model_path)?;
        let encoder: CategoricalEncoder = read_json(&self.encoder_path())?;

        info!(
            dir = %self.dir.display(),
            features = model.schema().width(),
            departments = encoder.classes().len(),
            "Loaded model artifacts"
        );
        Ok((model, encoder))
    }

    fn load_schema(&self) -> Result<FeatureSchema> {
        let path = self.schema_path();
        let schema: FeatureSchema = read_json(&path)?;
        if !schema.is_known_layout() {
            return Err(ModelError::CorruptArtifact {
                path,
                reason: format!("unexpected feature layout {:?}", schema.feature_names()),
            });
        }
        Ok(schema)
    }

    /// Write the model and encoder, creating the directory if needed
    pub fn save(&self, model: &RegressionModel, encoder: &CategoricalEncoder) -> Result<()> {
        fs::create_dir_all(&self.dir)?;

        let model_path = self.model_path();
        model.save(&model_path)?;
        write_json(&self.schema_path(), model.schema())?;
        info!(path = %model_path.display(), "Model saved");

        let encoder_path = self.encoder_path();
        write_json(&encoder_path, encoder)?;
        info!(path = %encoder_path.display(), "Label encoder saved");

        Ok(())
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ModelError::ArtifactNotFound {
            path: path.to_path_buf(),
        },
        _ => ModelError::Io(e),
    })?;

    serde_json::from_slice(&bytes).map_err(|e| ModelError::CorruptArtifact {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_vec(value)?;
    fs::write(path, json)?;
    Ok(())
}
