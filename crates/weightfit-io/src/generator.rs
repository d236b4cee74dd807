//! Synthetic regression tables with a known solution.
//!
//! Every value is drawn uniformly from `[min_value, max_value]` and rounded to
//! two decimals. The target is the sum of the first `calc_columns` values, so
//! the ideal weights are `1.0` for those columns and `0.0` for the
//! `extra_columns` that follow.

use std::io;

use rand::Rng;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum GenerateError {
    #[display("value range [{min}, {max}] is empty or its width is not finite")]
    InvalidRange { min: f64, max: f64 },
    #[display("failed to write synthetic data: {source}")]
    Csv { source: csv::Error },
}

/// Shape of a synthetic table.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticSpec {
    pub rows: usize,
    /// Columns that sum up to the target
    pub calc_columns: usize,
    /// Noise columns not contributing to the target
    pub extra_columns: usize,
    pub min_value: f64,
    pub max_value: f64,
}

impl Default for SyntheticSpec {
    fn default() -> Self {
        Self {
            rows: 100,
            calc_columns: 5,
            extra_columns: 10,
            min_value: 1.0,
            max_value: 100.0,
        }
    }
}

impl SyntheticSpec {
    pub fn validate(&self) -> Result<(), GenerateError> {
        // a finite width also rules out infinite and NaN bounds
        if self.min_value <= self.max_value && (self.max_value - self.min_value).is_finite() {
            Ok(())
        } else {
            Err(GenerateError::InvalidRange {
                min: self.min_value,
                max: self.max_value,
            })
        }
    }

    /// Column names: `Calc_Column_*`, `Extra_Column_*`, then `Calculation`.
    #[must_use]
    pub fn header(&self) -> Vec<String> {
        (1..=self.calc_columns)
            .map(|i| format!("Calc_Column_{i}"))
            .chain((1..=self.extra_columns).map(|i| format!("Extra_Column_{i}")))
            .chain(["Calculation".to_owned()])
            .collect()
    }

    /// Generates the rows, each ending with its target value.
    pub fn generate_rows<R>(&self, rng: &mut R) -> Result<Vec<Vec<f64>>, GenerateError>
    where
        R: Rng + ?Sized,
    {
        self.validate()?;
        let rows = (0..self.rows)
            .map(|_| {
                let mut row = (0..self.calc_columns + self.extra_columns)
                    .map(|_| round2(rng.random_range(self.min_value..=self.max_value)))
                    .collect::<Vec<_>>();
                let target = round2(row[..self.calc_columns].iter().sum());
                row.push(target);
                row
            })
            .collect();
        Ok(rows)
    }

    /// Writes the header and generated rows as comma-separated text.
    pub fn write<W, R>(&self, writer: W, rng: &mut R) -> Result<(), GenerateError>
    where
        W: io::Write,
        R: Rng + ?Sized,
    {
        let rows = self.generate_rows(rng)?;
        let map_err = |source: csv::Error| GenerateError::Csv { source };

        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record(self.header()).map_err(map_err)?;
        for row in rows {
            writer
                .write_record(row.iter().map(f64::to_string))
                .map_err(map_err)?;
        }
        writer.flush().map_err(|e| map_err(e.into()))?;
        log::info!(
            "generated {} rows with {} calculation and {} extra columns",
            self.rows,
            self.calc_columns,
            self.extra_columns
        );
        Ok(())
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
