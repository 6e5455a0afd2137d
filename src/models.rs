use crate::error::{Result, ScatterError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One row of the yearly cross-country table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Record {
    #[serde(deserialize_with = "de_year")]
    pub time: i32,
    #[serde(deserialize_with = "de_f64_or_nan")]
    pub fertility_rate: f64,
    #[serde(deserialize_with = "de_f64_or_nan")]
    pub life_expectancy: f64,
    /// Population in millions.
    #[serde(deserialize_with = "de_f64_or_nan")]
    pub pop_mlns: f64,
    pub location: String,
}

impl Record {
    /// True when any of the three plotted measures failed to parse.
    pub fn has_missing_measure(&self) -> bool {
        self.fertility_rate.is_nan() || self.life_expectancy.is_nan() || self.pop_mlns.is_nan()
    }
}

/// Serde helper: parse a measure leniently. Blank, non-numeric or non-finite text
/// (`inf`, `-infinity`, `nan`) becomes `NaN` so the row still loads and renders
/// degenerately.
fn de_f64_or_nan<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Ok(s
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(f64::NAN))
}

/// Serde helper: parse the year key from `"1960"` or an integral float like `"1960.0"`.
fn de_year<'de, D>(deserializer: D) -> std::result::Result<i32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    let s = String::deserialize(deserializer)?;
    let s = s.trim();
    if let Ok(y) = s.parse::<i32>() {
        return Ok(y);
    }
    match s.parse::<f64>() {
        Ok(f) if f.is_finite() && f.fract() == 0.0 && f.abs() <= i32::MAX as f64 => Ok(f as i32),
        _ => Err(D::Error::custom(format!("`{s}` is not an integer year"))),
    }
}

/// The full multi-year dataset. Loaded once and never mutated; rows are shared
/// by reference with every derived view.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<Arc<Record>>,
}

impl Dataset {
    pub fn from_records(records: Vec<Record>) -> Result<Self> {
        if records.is_empty() {
            return Err(ScatterError::EmptyDataset);
        }
        Ok(Self {
            records: records.into_iter().map(Arc::new).collect(),
        })
    }

    pub fn records(&self) -> &[Arc<Record>] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Inclusive (first, last) year present in the data.
    pub fn year_span(&self) -> (i32, i32) {
        let mut it = self.records.iter().map(|r| r.time);
        // Non-empty by construction.
        let first = it.next().unwrap_or_default();
        it.fold((first, first), |(lo, hi), y| (lo.min(y), hi.max(y)))
    }

    /// Rows whose `time` equals `year` exactly, in dataset order.
    pub fn filter_year(&self, year: i32) -> FilteredView {
        FilteredView {
            year,
            records: self
                .records
                .iter()
                .filter(|r| r.time == year)
                .cloned()
                .collect(),
        }
    }
}

/// The subset of the full dataset for one selected year.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredView {
    pub year: i32,
    pub records: Vec<Arc<Record>>,
}

impl FilteredView {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Year to print in the title: the first row's `time`, or `None` for an empty view.
    pub fn displayed_year(&self) -> Option<i32> {
        self.records.first().map(|r| r.time)
    }
}
