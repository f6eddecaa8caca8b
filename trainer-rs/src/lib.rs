//! Offline training for the workforce cost model
//!
//! Reads a labelled CSV, fits the department encoder and the XGBoost
//! regressor, reports RMSE and R² on a seeded 80/20 split and writes the
//! artifact directory.

pub mod dataset;
pub mod error;
pub mod pipeline;
pub mod split;

pub use dataset::{Dataset, TrainingRow};
pub use error::{Result, TrainingError};
pub use pipeline::{run, train, TrainedModel, TrainingConfig, TrainingReport};
pub use split::{train_test_split, Split};
