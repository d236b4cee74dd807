//! Delimited-text sample loader.
//!
//! The expected layout is a header row followed by one sample per row, with the
//! target in the last column and the inputs in all preceding columns:
//!
//! ```text
//! x1,x2,x3,y
//! 1.0,2.0,3.0,14.0
//! ```
//!
//! Rows with fewer than two fields are skipped. Any field that is not a finite
//! number aborts the whole load, so the engine never sees a partial table.
//! Differing row widths are left for [`SampleSet::new`](weightfit_engine::SampleSet::new)
//! to reject.

use std::{
    fs::File,
    io::{self, BufReader},
    path::{Path, PathBuf},
};

use weightfit_engine::Sample;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum DataLoadError {
    #[display("failed to open {}: {source}", path.display())]
    Open { path: PathBuf, source: io::Error },
    #[display("malformed delimited data: {source}")]
    Csv { source: csv::Error },
    #[display("line {line}, column {column}: '{value}' is not a finite number")]
    InvalidNumber {
        line: u64,
        column: usize,
        value: String,
    },
}

/// Loads samples from the file at `path`.
pub fn load_samples<P>(path: P) -> Result<Vec<Sample>, DataLoadError>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| DataLoadError::Open {
        path: path.to_owned(),
        source,
    })?;
    log::info!("loading samples from {}", path.display());
    read_samples(BufReader::new(file))
}

/// Parses samples from comma-separated text, skipping the header row.
pub fn read_samples<R>(reader: R) -> Result<Vec<Sample>, DataLoadError>
where
    R: io::Read,
{
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut samples = vec![];
    let mut skipped = 0;
    for record in reader.records() {
        let record = record.map_err(|source| DataLoadError::Csv { source })?;
        let line = record.position().map_or(0, csv::Position::line);
        if record.len() < 2 {
            log::debug!("skipping line {line}: {} field(s)", record.len());
            skipped += 1;
            continue;
        }

        let mut values = record
            .iter()
            .enumerate()
            .map(|(i, field)| parse_field(field, line, i + 1))
            .collect::<Result<Vec<_>, _>>()?;
        if let Some(target) = values.pop() {
            samples.push(Sample::new(values, target));
        }
    }

    if skipped > 0 {
        log::warn!("skipped {skipped} row(s) with fewer than 2 fields");
    }
    log::info!("loaded {} samples", samples.len());
    Ok(samples)
}

fn parse_field(field: &str, line: u64, column: usize) -> Result<f64, DataLoadError> {
    field
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| DataLoadError::InvalidNumber {
            line,
            column,
            value: field.to_owned(),
        })
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use super::*;

    #[test]
    fn test_reads_last_column_as_target() {
        let data = "a,b,target\n1,2,3\n4.5, 5.5 ,10\n";
        let samples = read_samples(data.as_bytes()).unwrap();
        assert_eq!(
            samples,
            vec![
                Sample::new(vec![1.0, 2.0], 3.0),
                Sample::new(vec![4.5, 5.5], 10.0),
            ]
        );
    }

    #[test]
    fn test_skips_short_rows() {
        let data = "x,y\n1,2\n7\n\n3,4\n";
        let samples = read_samples(data.as_bytes()).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[1], Sample::new(vec![3.0], 4.0));
    }

    #[test]
    fn test_header_only_is_empty() {
        let samples = read_samples("x,y\n".as_bytes()).unwrap();
        assert!(samples.is_empty());
    }

    #[test]
    fn test_non_numeric_field_aborts() {
        let data = "x,y\n1,2\n3,abc\n5,6\n";
        let err = read_samples(data.as_bytes()).unwrap_err();
        match err {
            DataLoadError::InvalidNumber {
                line,
                column,
                value,
            } => {
                assert_eq!(line, 3);
                assert_eq!(column, 2);
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_field_aborts() {
        let err = read_samples("x,y,z\n1,,3\n".as_bytes()).unwrap_err();
        assert!(matches!(err, DataLoadError::InvalidNumber { column: 2, .. }));
    }

    #[test]
    fn test_non_finite_aborts() {
        let err = read_samples("x,y\nNaN,1\n".as_bytes()).unwrap_err();
        assert!(matches!(err, DataLoadError::InvalidNumber { column: 1, .. }));
    }

    #[test]
    fn test_inconsistent_widths_are_loaded() {
        // width checks belong to SampleSet::new
        let samples = read_samples("h\n1,2,3\n1,2\n".as_bytes()).unwrap();
        assert_eq!(samples[0].inputs().len(), 2);
        assert_eq!(samples[1].inputs().len(), 1);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "x1,x2,y").unwrap();
        writeln!(file, "1.0,1.0,2.0").unwrap();
        file.flush().unwrap();

        let samples = load_samples(file.path()).unwrap();
        assert_eq!(samples, vec![Sample::new(vec![1.0, 1.0], 2.0)]);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_samples(dir.path().join("missing.csv")).unwrap_err();
        assert!(matches!(err, DataLoadError::Open { .. }));
        assert!(err.to_string().starts_with("failed to open"));
    }
}
