//! Textual summary of a fitted weight vector.
//!
//! The report is two comma-separated tables separated by a blank line:
//!
//! ```text
//! Metric,Value
//! Best Fitness,0.999995
//! Gene Count,3
//!
//! Gene/Weight,W1,W2,W3
//! Value,0.5,0.25,1
//! ```
//!
//! Values are printed with the shortest representation that parses back to the
//! same `f64`.

use std::{
    fs::File,
    io::{self, BufWriter, Write as _},
    path::Path,
};

use weightfit_engine::Candidate;

/// Writes the report for `best` to `writer`.
pub fn write_report<W>(mut writer: W, best: &Candidate) -> Result<(), csv::Error>
where
    W: io::Write,
{
    {
        let mut metrics = csv::WriterBuilder::new().from_writer(&mut writer);
        metrics.write_record(["Metric", "Value"])?;
        metrics.write_record(["Best Fitness", best.fitness().to_string().as_str()])?;
        metrics.write_record(["Gene Count", best.genes().len().to_string().as_str()])?;
        metrics.flush()?;
    }
    writeln!(writer)?;

    let mut weights = csv::WriterBuilder::new().from_writer(&mut writer);
    weights.write_record(
        std::iter::once("Gene/Weight".to_owned())
            .chain((1..=best.genes().len()).map(|i| format!("W{i}"))),
    )?;
    weights.write_record(
        std::iter::once("Value".to_owned()).chain(best.genes().iter().map(f64::to_string)),
    )?;
    weights.flush()?;
    Ok(())
}

/// Writes the report for `best` to a new file at `path`.
pub fn save_report<P>(path: P, best: &Candidate) -> Result<(), csv::Error>
where
    P: AsRef<Path>,
{
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    write_report(&mut writer, best)?;
    writer.flush()?;
    Ok(())
}

/// Formats genes for console output, e.g. `0.5000 | 1.2500`.
///
/// ```
/// assert_eq!(weightfit_io::format_weights(&[0.5, 1.25]), "0.5000 | 1.2500");
/// ```
#[must_use]
pub fn format_weights(genes: &[f64]) -> String {
    genes
        .iter()
        .map(|g| format!("{g:.4}"))
        .collect::<Vec<_>>()
        .join(" | ")
}
