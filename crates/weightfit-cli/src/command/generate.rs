use std::{io::Write as _, path::PathBuf};

use anyhow::Context;
use rand::{SeedableRng as _, rngs::StdRng};
use weightfit_io::SyntheticSpec;

use crate::util::Output;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct GenerateArg {
    /// Output file path (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,
    /// Number of data rows
    #[arg(long, default_value_t = 100)]
    rows: usize,
    /// Columns that contribute to the target
    #[arg(long, default_value_t = 5)]
    calc_columns: usize,
    /// Noise columns that do not contribute to the target
    #[arg(long, default_value_t = 10)]
    extra_columns: usize,
    /// Lower bound for input values
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    min: f64,
    /// Upper bound for input values
    #[arg(long, default_value_t = 100.0, allow_negative_numbers = true)]
    max: f64,
    /// Random seed (drawn from the OS if omitted)
    #[arg(long)]
    seed: Option<u64>,
}

pub(crate) fn run(arg: &GenerateArg) -> anyhow::Result<()> {
    let spec = SyntheticSpec {
        rows: arg.rows,
        calc_columns: arg.calc_columns,
        extra_columns: arg.extra_columns,
        min_value: arg.min,
        max_value: arg.max,
    };
    let mut rng = match arg.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let mut output = Output::from_output_path(arg.output.clone())?;
    spec.write(&mut output, &mut rng)
        .with_context(|| format!("Failed to write data to {}", output.display_path()))?;
    output
        .flush()
        .with_context(|| format!("Failed to flush data to {}", output.display_path()))?;

    if let Some(path) = &arg.output {
        eprintln!("Synthetic data saved to: {}", path.display());
    }
    Ok(())
}
