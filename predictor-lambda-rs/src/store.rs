//! Prediction record stores
//!
//! Stores only ever append; records are never updated or deleted here.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::info;

use crate::error::StoreError;
use crate::record::PredictionRecord;

/// Destination for prediction records
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn put(&self, record: &PredictionRecord) -> Result<(), StoreError>;
}

/// DynamoDB item for a record. Numbers use DynamoDB's decimal string form.
pub fn record_to_item(record: &PredictionRecord) -> HashMap<String, AttributeValue> {
    let mut item = HashMap::new();
    item.insert(
        "prediction_id".to_string(),
        AttributeValue::S(record.prediction_id.clone()),
    );
    item.insert(
        "timestamp".to_string(),
        AttributeValue::N(record.timestamp.to_string()),
    );
    item.insert(
        "headcount".to_string(),
        AttributeValue::N(record.headcount.to_string()),
    );
    item.insert(
        "avg_salary".to_string(),
        AttributeValue::N(record.avg_salary.to_string()),
    );
    item.insert(
        "turnover_rate".to_string(),
        AttributeValue::N(record.turnover_rate.to_string()),
    );
    item.insert(
        "department".to_string(),
        AttributeValue::S(record.department.clone()),
    );
    item.insert(
        "benefits_multiplier".to_string(),
        AttributeValue::N(record.benefits_multiplier.to_string()),
    );
    item.insert(
        "predicted_cost".to_string(),
        AttributeValue::N(record.predicted_cost.to_string()),
    );
    item.insert(
        "confidence_interval_low".to_string(),
        AttributeValue::N(record.confidence_interval_low.to_string()),
    );
    item.insert(
        "confidence_interval_high".to_string(),
        AttributeValue::N(record.confidence_interval_high.to_string()),
    );
    item
}

/// DynamoDB table, one `PutItem` per record
#[derive(Debug, Clone)]
pub struct DynamoRecordStore {
    client: aws_sdk_dynamodb::Client,
    table_name: String,
}

impl DynamoRecordStore {
    pub fn new(client: aws_sdk_dynamodb::Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    pub fn from_conf(sdk_config: &aws_config::SdkConfig, table_name: impl Into<String>) -> Self {
        Self::new(aws_sdk_dynamodb::Client::new(sdk_config), table_name)
    }
}

#[async_trait]
impl RecordStore for DynamoRecordStore {
    async fn put(&self, record: &PredictionRecord) -> Result<(), StoreError> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(record_to_item(record)))
            .send()
            .await
            .map_err(|e| StoreError::Write(DisplayErrorContext(&e).to_string()))?;

        info!(prediction_id = %record.prediction_id, table = %self.table_name, "Stored prediction");
        Ok(())
    }
}

/// Append-only JSON-lines file, for local runs
#[derive(Debug)]
pub struct FileRecordStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileRecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every record back, oldest first
    pub async fn read_all(&self) -> Result<Vec<PredictionRecord>, StoreError> {
        let contents = match fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::Write(e.to_string())),
        };

        contents
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).map_err(StoreError::from))
            .collect()
    }
}

#[async_trait]
impl RecordStore for FileRecordStore {
    async fn put(&self, record: &PredictionRecord) -> Result<(), StoreError> {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');

        let _guard = self.write_lock.lock().await;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::Write(format!("failed to create {}: {}", parent.display(), e)))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| StoreError::Write(format!("failed to open {}: {}", self.path.display(), e)))?;
        file.write_all(&line)
            .await
            .map_err(|e| StoreError::Write(e.to_string()))?;
        file.flush().await.map_err(|e| StoreError::Write(e.to_string()))?;

        info!(prediction_id = %record.prediction_id, path = %self.path.display(), "Stored prediction");
        Ok(())
    }
}
