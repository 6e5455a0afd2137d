//! Error type shared by the loading, selection and configuration paths.
//!
//! Drawing code keeps using `anyhow` (Plotters errors are backend-generic);
//! everything a caller may want to match on lives here.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScatterError {
    /// The dataset could not be read at all (missing file, broken CSV framing).
    #[error("failed to load dataset from {}: {source}", path.display())]
    DataLoad {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A required header is absent from the CSV.
    #[error("dataset is missing required column `{0}`")]
    MissingColumn(&'static str),

    /// A row whose `time` field cannot serve as a year key.
    #[error("malformed record on line {line}: {reason}")]
    MalformedRecord { line: u64, reason: String },

    #[error("dataset contains no records")]
    EmptyDataset,

    #[error("column `{column}` has no finite values")]
    NoFiniteValues { column: &'static str },

    /// Selector input that is not an integer year.
    #[error("invalid year `{0}`")]
    InvalidYear(String),

    #[error("year {year} is outside the available range {min}..={max}")]
    YearOutOfRange { year: i32, min: i32, max: i32 },

    /// The `time` column spans more years than can be offered for selection.
    #[error("years {min}..={max} span more than {limit} years; check the `time` column")]
    YearSpanTooWide { min: i32, max: i32, limit: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type Result<T, E = ScatterError> = std::result::Result<T, E>;
