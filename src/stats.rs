use crate::error::{Result, ScatterError};
use crate::models::Dataset;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `(min, max)` of a numeric column.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Extent {
    pub min: f64,
    pub max: f64,
}

/// Linear scan for the extent of `values`. Non-finite values are skipped; `None` when nothing is left.
pub fn extent<I>(values: I) -> Option<Extent>
where
    I: IntoIterator<Item = f64>,
{
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some(Extent { min: v, max: v }),
            Some(e) => Some(Extent {
                min: if v < e.min { v } else { e.min },
                max: if v > e.max { v } else { e.max },
            }),
        })
}

/// Extents of the three plotted measures over the *full* dataset.
/// Computed once so the axes stay fixed across years.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Limits {
    pub fertility: Extent,
    pub life_expectancy: Extent,
    pub population: Extent,
}

impl Limits {
    pub fn from_dataset(ds: &Dataset) -> Result<Self> {
        let rows = ds.records();
        let col = |column: &'static str, f: fn(&crate::models::Record) -> f64| {
            extent(rows.iter().map(|r| f(r))).ok_or(ScatterError::NoFiniteValues { column })
        };
        Ok(Self {
            fertility: col("fertility_rate", |r| r.fertility_rate)?,
            life_expectancy: col("life_expectancy", |r| r.life_expectancy)?,
            population: col("pop_mlns", |r| r.pop_mlns)?,
        })
    }
}

/// Summary of one year's rows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct YearSummary {
    pub year: i32,
    pub count: usize,
    /// Rows with at least one non-numeric measure.
    pub missing: usize,
    pub mean_fertility: Option<f64>,
    pub mean_life_expectancy: Option<f64>,
    /// Sum of `pop_mlns` over rows where it parsed.
    pub total_pop_mlns: f64,
}

/// Per-year statistics in ascending year order.
pub fn year_summaries(ds: &Dataset) -> Vec<YearSummary> {
    let mut groups: BTreeMap<i32, Vec<&crate::models::Record>> = BTreeMap::new();
    for r in ds.records() {
        groups.entry(r.time).or_default().push(r);
    }

    let mean = |vals: Vec<f64>| {
        if vals.is_empty() {
            None
        } else {
            Some(vals.iter().sum::<f64>() / vals.len() as f64)
        }
    };

    groups
        .into_iter()
        .map(|(year, rows)| {
            let fert: Vec<f64> = rows.iter().map(|r| r.fertility_rate).filter(|v| !v.is_nan()).collect();
            let life: Vec<f64> = rows.iter().map(|r| r.life_expectancy).filter(|v| !v.is_nan()).collect();
            YearSummary {
                year,
                count: rows.len(),
                missing: rows.iter().filter(|r| r.has_missing_measure()).count(),
                mean_fertility: mean(fert),
                mean_life_expectancy: mean(life),
                total_pop_mlns: rows.iter().map(|r| r.pop_mlns).filter(|v| !v.is_nan()).sum(),
            }
        })
        .collect()
}
