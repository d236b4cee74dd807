use clap::{Parser, Subcommand};

use self::{fit::FitArg, generate::GenerateArg};

mod fit;
mod generate;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Fit linear weights to a data file using a genetic algorithm
    Fit(#[clap(flatten)] FitArg),
    /// Generate a synthetic data file with a known solution
    Generate(#[clap(flatten)] GenerateArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    let _logger = flexi_logger::Logger::try_with_env_or_str("info")?.start()?;
    match args.mode {
        Mode::Fit(arg) => fit::run(&arg)?,
        Mode::Generate(arg) => generate::run(&arg)?,
    }
    Ok(())
}
