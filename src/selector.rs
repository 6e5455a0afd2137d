//! The year selector: an inclusive year range and the typed parse of a selected value.

use crate::error::{Result, ScatterError};
use crate::models::Dataset;
use std::ops::RangeInclusive;

/// One selectable entry. Label and value are the same integer year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearOption {
    pub label: String,
    pub value: i32,
}

/// Widest year range a dataset may span. A stray `time` value far from the
/// rest would otherwise turn into millions of selectable years.
pub const MAX_YEAR_SPAN: usize = 1000;

/// The inclusive range of selectable years. Only the endpoints are stored;
/// the options are produced on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearSelector {
    first: i32,
    last: i32,
    selected: i32,
}

impl YearSelector {
    /// Every year from the first to the last in the data, including years
    /// without rows. The first year starts selected.
    pub fn from_dataset(ds: &Dataset) -> Result<Self> {
        let (lo, hi) = ds.year_span();
        let span = (hi as i64 - lo as i64 + 1) as u64;
        if span > MAX_YEAR_SPAN as u64 {
            return Err(ScatterError::YearSpanTooWide {
                min: lo,
                max: hi,
                limit: MAX_YEAR_SPAN,
            });
        }
        Ok(Self {
            first: lo,
            last: hi,
            selected: lo,
        })
    }

    pub fn years(&self) -> RangeInclusive<i32> {
        self.first..=self.last
    }

    pub fn first(&self) -> i32 {
        self.first
    }

    pub fn last(&self) -> i32 {
        self.last
    }

    /// Number of selectable years.
    pub fn len(&self) -> usize {
        (self.last as i64 - self.first as i64 + 1) as usize
    }

    /// A dataset always has at least one year.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn options(&self) -> impl Iterator<Item = YearOption> + '_ {
        self.years().map(|y| YearOption {
            label: y.to_string(),
            value: y,
        })
    }

    pub fn contains(&self, year: i32) -> bool {
        self.years().contains(&year)
    }

    pub fn selected(&self) -> i32 {
        self.selected
    }

    pub fn select(&mut self, year: i32) -> Result<i32> {
        if !self.contains(year) {
            return Err(ScatterError::YearOutOfRange {
                year,
                min: self.first,
                max: self.last,
            });
        }
        self.selected = year;
        Ok(year)
    }
}

/// Parse a selected option value back into a year.
pub fn parse_year(raw: &str) -> Result<i32> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| ScatterError::InvalidYear(raw.to_string()))
}
