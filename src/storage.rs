use crate::error::{Result, ScatterError};
use crate::marks::Mark;
use crate::models::{Dataset, Record};
use csv::{ReaderBuilder, WriterBuilder};
use serde::Serialize;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Columns the plot reads; any other columns are ignored.
pub const REQUIRED_COLUMNS: [&str; 5] = [
    "time",
    "fertility_rate",
    "life_expectancy",
    "pop_mlns",
    "location",
];

/// Load the full dataset from a CSV file with a header row.
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Dataset> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| ScatterError::DataLoad {
        path: path.to_path_buf(),
        source: csv::Error::from(e),
    })?;
    let ds = load_reader(file, path)?;
    log::info!("loaded {} records from {}", ds.len(), path.display());
    Ok(ds)
}

/// Same as [`load_csv`] for any reader; `origin` is only used in error messages.
pub fn load_reader<R: Read>(reader: R, origin: &Path) -> Result<Dataset> {
    let mut rdr = ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers().map_err(|e| ScatterError::DataLoad {
        path: origin.to_path_buf(),
        source: e,
    })?;
    for col in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == col) {
            return Err(ScatterError::MissingColumn(col));
        }
    }

    let mut records = Vec::new();
    for row in rdr.deserialize::<Record>() {
        let rec = row.map_err(|e| classify(e, origin))?;
        if rec.has_missing_measure() {
            log::warn!(
                "{} ({}): non-numeric measure, row will render degenerately",
                rec.location,
                rec.time
            );
        }
        records.push(rec);
    }
    Dataset::from_records(records)
}

fn classify(e: csv::Error, origin: &Path) -> ScatterError {
    let malformed = match e.kind() {
        csv::ErrorKind::Deserialize { pos, err } => {
            Some((pos.as_ref().map(|p| p.line()).unwrap_or(0), err.to_string()))
        }
        _ => None,
    };
    match malformed {
        Some((line, reason)) => ScatterError::MalformedRecord { line, reason },
        None => ScatterError::DataLoad {
            path: origin.to_path_buf(),
            source: e,
        },
    }
}

/// Save rows (typically one year's filtered view) as CSV with header.
pub fn save_csv<P: AsRef<Path>>(records: &[impl AsRef<Record>], path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.write_record(REQUIRED_COLUMNS)?;
    for r in records {
        let r = r.as_ref();
        wtr.serialize((
            r.time,
            r.fertility_rate,
            r.life_expectancy,
            r.pop_mlns,
            &r.location,
        ))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Flat JSON shape of a projected mark.
#[derive(Serialize)]
struct MarkRow<'a> {
    location: &'a str,
    ordinal: u32,
    time: i32,
    fertility_rate: f64,
    life_expectancy: f64,
    pop_mlns: f64,
    cx: f64,
    cy: f64,
    r: f64,
}

impl<'a> From<&'a Mark> for MarkRow<'a> {
    fn from(m: &'a Mark) -> Self {
        Self {
            location: &m.key.location,
            ordinal: m.key.ordinal,
            time: m.record.time,
            fertility_rate: m.record.fertility_rate,
            life_expectancy: m.record.life_expectancy,
            pop_mlns: m.record.pop_mlns,
            cx: m.cx,
            cy: m.cy,
            r: m.r,
        }
    }
}

/// Save projected marks as a pretty JSON array. Missing measures serialize as `null`.
pub fn save_json<P: AsRef<Path>>(marks: &[Mark], path: P) -> Result<()> {
    let rows: Vec<MarkRow<'_>> = marks.iter().map(MarkRow::from).collect();
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(&rows)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::tempdir;

    const CSV: &str = "time,location,fertility_rate,life_expectancy,pop_mlns,extra\n\
                       1960,A,6.0,50.0,10,x\n\
                       1960,B,2.0,75.0,100,y\n";

    #[test]
    fn reads_rows_in_order_and_ignores_extra_columns() {
        let ds = load_reader(CSV.as_bytes(), Path::new("mem.csv")).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records()[0].location, "A");
        assert_eq!(ds.records()[1].pop_mlns, 100.0);
    }

    #[test]
    fn non_numeric_measure_becomes_nan() {
        let txt = "time,fertility_rate,life_expectancy,pop_mlns,location\n1960,,n/a,3,A\n";
        let ds = load_reader(txt.as_bytes(), Path::new("mem.csv")).unwrap();
        let r = &ds.records()[0];
        assert!(r.fertility_rate.is_nan());
        assert!(r.life_expectancy.is_nan());
        assert_eq!(r.pop_mlns, 3.0);
    }

    #[test]
    fn infinite_and_nan_text_count_as_missing() {
        let txt = "time,fertility_rate,life_expectancy,pop_mlns,location\n\
                   1960,inf,-Infinity,NaN,A\n\
                   1960,2.0,70.0,1e400,B\n";
        let ds = load_reader(txt.as_bytes(), Path::new("mem.csv")).unwrap();
        let (a, b) = (&ds.records()[0], &ds.records()[1]);
        assert!(a.fertility_rate.is_nan());
        assert!(a.life_expectancy.is_nan());
        assert!(a.pop_mlns.is_nan());
        assert!(a.has_missing_measure());
        // Overflowing literals parse to infinity and are dropped the same way.
        assert!(b.pop_mlns.is_nan());
        assert!(b.has_missing_measure());
    }

    #[test]
    fn integral_float_years_are_accepted() {
        let txt = "time,fertility_rate,life_expectancy,pop_mlns,location\n1960.0,1,2,3,A\n";
        let ds = load_reader(txt.as_bytes(), Path::new("mem.csv")).unwrap();
        assert_eq!(ds.records()[0].time, 1960);
    }

    #[test]
    fn bad_year_is_malformed_record() {
        let txt = "time,fertility_rate,life_expectancy,pop_mlns,location\n1960,1,2,3,A\nsoon,1,2,3,B\n";
        let err = load_reader(txt.as_bytes(), Path::new("mem.csv")).unwrap_err();
        match err {
            ScatterError::MalformedRecord { line, reason } => {
                assert_eq!(line, 3);
                assert!(reason.contains("soon"), "{reason}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_column_is_reported() {
        let txt = "time,fertility_rate,life_expectancy,location\n1960,1,2,A\n";
        let err = load_reader(txt.as_bytes(), Path::new("mem.csv")).unwrap_err();
        assert!(matches!(err, ScatterError::MissingColumn("pop_mlns")));
    }

    #[test]
    fn header_only_file_is_empty_dataset() {
        let txt = "time,fertility_rate,life_expectancy,pop_mlns,location\n";
        let err = load_reader(txt.as_bytes(), Path::new("mem.csv")).unwrap_err();
        assert!(matches!(err, ScatterError::EmptyDataset));
    }

    #[test]
    fn missing_file_is_data_load_error() {
        let dir = tempdir().unwrap();
        let err = load_csv(dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, ScatterError::DataLoad { .. }));
    }

    #[test]
    fn write_csv_round_trips_through_loader() {
        let dir = tempdir().unwrap();
        let p = dir.path().join("year.csv");
        let ds = load_reader(CSV.as_bytes(), Path::new("mem.csv")).unwrap();
        let rows: Vec<Arc<Record>> = ds.records().to_vec();
        save_csv(&rows, &p).unwrap();
        let again = load_csv(&p).unwrap();
        assert_eq!(again.len(), 2);
        assert_eq!(*again.records()[1], *ds.records()[1]);
    }
}
