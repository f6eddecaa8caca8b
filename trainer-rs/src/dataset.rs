//! Training data loading
//!
//! Columns are located by header name, so their order in the file does not
//! matter. `department` is optional; every other column is required.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use tracing::info;

use crate::error::{Result, TrainingError};

pub const NUMERIC_COLUMNS: [&str; 4] = [
    "headcount",
    "avg_salary",
    "turnover_rate",
    "benefits_multiplier",
];
pub const TARGET_COLUMN: &str = "annual_cost";
pub const DEPARTMENT_COLUMN: &str = "department";

/// One labelled example
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingRow {
    pub headcount: f64,
    pub avg_salary: f64,
    pub turnover_rate: f64,
    pub benefits_multiplier: f64,
    /// `None` when the file has no department column or the cell is blank
    pub department: Option<String>,
    pub annual_cost: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    rows: Vec<TrainingRow>,
    has_department: bool,
}

struct ColumnIndex {
    numeric: [usize; 4],
    target: usize,
    department: Option<usize>,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let require =
            |name: &str| find(name).ok_or_else(|| TrainingError::MissingColumn(name.to_string()));

        Ok(Self {
            numeric: [
                require(NUMERIC_COLUMNS[0])?,
                require(NUMERIC_COLUMNS[1])?,
                require(NUMERIC_COLUMNS[2])?,
                require(NUMERIC_COLUMNS[3])?,
            ],
            target: require(TARGET_COLUMN)?,
            department: find(DEPARTMENT_COLUMN),
        })
    }
}

impl Dataset {
    pub fn new(rows: Vec<TrainingRow>, has_department: bool) -> Self {
        Self {
            rows,
            has_department,
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| TrainingError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let dataset = Self::from_reader(file)?;
        info!(
            path = %path.display(),
            rows = dataset.len(),
            has_department = dataset.has_department,
            "Loaded training data"
        );
        Ok(dataset)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let headers = reader.headers()?;
        if headers.iter().all(str::is_empty) {
            return Err(TrainingError::EmptyDataset);
        }
        let columns = ColumnIndex::from_headers(headers)?;

        let mut rows = Vec::new();
        for (idx, record) in reader.records().enumerate() {
            let record = record?;
            rows.push(parse_row(&record, &columns, idx + 1)?);
        }

        if rows.is_empty() {
            return Err(TrainingError::EmptyDataset);
        }

        Ok(Self::new(rows, columns.department.is_some()))
    }

    pub fn rows(&self) -> &[TrainingRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_department(&self) -> bool {
        self.has_department
    }

    pub fn departments(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().filter_map(|row| row.department.as_deref())
    }

    pub fn targets(&self) -> Vec<f64> {
        self.rows.iter().map(|row| row.annual_cost).collect()
    }
}

fn parse_row(record: &StringRecord, columns: &ColumnIndex, row: usize) -> Result<TrainingRow> {
    let number = |idx: usize, column: &str| -> Result<f64> {
        let value = record.get(idx).unwrap_or("");
        value
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| TrainingError::NonNumeric {
                row,
                column: column.to_string(),
                value: value.to_string(),
            })
    };

    let department = columns
        .department
        .and_then(|idx| record.get(idx))
        .filter(|value| !value.is_empty())
        .map(str::to_string);

    Ok(TrainingRow {
        headcount: number(columns.numeric[0], NUMERIC_COLUMNS[0])?,
        avg_salary: number(columns.numeric[1], NUMERIC_COLUMNS[1])?,
        turnover_rate: number(columns.numeric[2], NUMERIC_COLUMNS[2])?,
        benefits_multiplier: number(columns.numeric[3], NUMERIC_COLUMNS[3])?,
        department,
        annual_cost: number(columns.target, TARGET_COLUMN)?,
    })
}
