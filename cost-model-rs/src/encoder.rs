//! Categorical encoder for the department column

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Code used for department values the encoder has never seen
pub const UNKNOWN_CATEGORY_CODE: u32 = 0;

/// Maps department names to integer codes.
///
/// Codes are positions in the sorted list of distinct values observed at fit
/// time, so the first department alphabetically shares code 0 with the
/// unknown-category fallback.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoricalEncoder {
    classes: Vec<String>,
}

impl CategoricalEncoder {
    /// Fit on the observed values
    pub fn fit<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let classes: BTreeSet<String> = values
            .into_iter()
            .map(|v| v.as_ref().to_string())
            .collect();

        Self {
            classes: classes.into_iter().collect(),
        }
    }

    /// Encode a single value; unseen values are an error
    pub fn transform(&self, value: &str) -> Result<u32> {
        self.classes
            .binary_search_by(|class| class.as_str().cmp(value))
            .map(|idx| idx as u32)
            .map_err(|_| ModelError::UnknownCategory(value.to_string()))
    }

    /// Fit and encode in one pass
    pub fn fit_transform<S: AsRef<str>>(values: &[S]) -> (Self, Vec<u32>) {
        let encoder = Self::fit(values.iter().map(|v| v.as_ref()));
        let codes = values
            .iter()
            .map(|v| encoder.transform(v.as_ref()).unwrap_or(UNKNOWN_CATEGORY_CODE))
            .collect();
        (encoder, codes)
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
