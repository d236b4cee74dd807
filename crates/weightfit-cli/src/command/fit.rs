use std::{io::Write as _, path::PathBuf};

use anyhow::Context;
use chrono::Utc;
use weightfit_engine::{
    EngineConfig, EvolutionEngine, MutationClamp, SampleSet, WeightTransform,
};

use crate::{
    model::fitted_model::FittedModel,
    util::{self, Output},
};

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub enum Preset {
    /// Weights start in [0, 1], predict as max(0, w) and mutate within [0, 1]
    #[default]
    NonNegative,
    /// Weights start in [-10, 10] and are used unchanged
    Unconstrained,
}

impl Preset {
    fn config(self) -> EngineConfig {
        match self {
            Self::NonNegative => EngineConfig::non_negative(),
            Self::Unconstrained => EngineConfig::unconstrained(),
        }
    }
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct FitArg {
    /// Input data file (header row, target in the last column)
    #[arg(long)]
    input: PathBuf,
    /// Report output path (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,
    /// Save the fitted model as JSON
    #[arg(long)]
    model: Option<PathBuf>,
    /// Engine configuration JSON file, applied on top of the preset
    #[arg(long)]
    config: Option<PathBuf>,
    /// Base configuration (nonnegative, unconstrained)
    #[arg(long, default_value = "nonnegative")]
    preset: Preset,
    #[arg(long)]
    population_size: Option<usize>,
    #[arg(long)]
    mutation_rate: Option<f64>,
    #[arg(long)]
    max_generations: Option<usize>,
    /// Lower bound for initial genes
    #[arg(long, allow_negative_numbers = true)]
    gene_min: Option<f64>,
    /// Upper bound for initial genes
    #[arg(long, allow_negative_numbers = true)]
    gene_max: Option<f64>,
    /// identity or nonnegative
    #[arg(long)]
    weight_transform: Option<WeightTransform>,
    /// unbounded or unitinterval
    #[arg(long)]
    mutation_clamp: Option<MutationClamp>,
    #[arg(long)]
    tournament_size: Option<usize>,
    /// Half-width of the uniform mutation perturbation
    #[arg(long)]
    mutation_step: Option<f64>,
    /// Best-ever fitness above this value stops the run
    #[arg(long)]
    convergence_threshold: Option<f64>,
    /// Random seed (drawn from the OS if omitted)
    #[arg(long)]
    seed: Option<u64>,
}

impl FitArg {
    /// Layers the preset, the config file and the individual flags.
    fn engine_config(&self) -> anyhow::Result<EngineConfig> {
        let mut config = self.preset.config();
        if let Some(path) = &self.config {
            let overrides: serde_json::Value = util::read_json_file("engine config", path)?;
            let mut merged = serde_json::to_value(&config)?;
            util::merge_json(&mut merged, overrides);
            config = serde_json::from_value(merged)
                .with_context(|| format!("Invalid engine config file: {}", path.display()))?;
        }

        if let Some(v) = self.population_size {
            config.population_size = v;
        }
        if let Some(v) = self.mutation_rate {
            config.mutation_rate = v;
        }
        if let Some(v) = self.max_generations {
            config.max_generations = v;
        }
        if let Some(v) = self.gene_min {
            config.gene_range.min = v;
        }
        if let Some(v) = self.gene_max {
            config.gene_range.max = v;
        }
        if let Some(v) = self.weight_transform {
            config.weight_transform = v;
        }
        if let Some(v) = self.mutation_clamp {
            config.mutation_clamp = v;
        }
        if let Some(v) = self.tournament_size {
            config.tournament_size = v;
        }
        if let Some(v) = self.mutation_step {
            config.mutation_step = v;
        }
        if let Some(v) = self.convergence_threshold {
            config.convergence_threshold = v;
        }
        Ok(config)
    }
}

pub(crate) fn run(arg: &FitArg) -> anyhow::Result<()> {
    let config = arg.engine_config()?;

    let samples = weightfit_io::load_samples(&arg.input)
        .with_context(|| format!("Failed to load samples: {}", arg.input.display()))?;
    let samples = SampleSet::new(samples)
        .with_context(|| format!("Unusable sample data: {}", arg.input.display()))?;

    let seed = arg.seed.unwrap_or_else(rand::random);
    log::info!("random seed: {seed}");
    eprintln!(
        "Starting GA to find {} weights from {} samples...",
        samples.gene_count(),
        samples.len()
    );

    let mut engine = EvolutionEngine::with_seed(samples, config.clone(), seed)
        .context("Invalid engine configuration")?;
    let outcome = engine.run_with(|summary| {
        log::info!(
            "Generation {}: best fitness = {:.8}",
            summary.generation + 1,
            summary.best_fitness
        );
        log::debug!(
            "  fitness min {:.8} / mean {:.8} / max {:.8}",
            summary.fitness_stats.min,
            summary.fitness_stats.mean,
            summary.fitness_stats.max
        );
    });

    let gene_stats = engine.population().compute_gene_stats();
    log::debug!(
        "final gene spread (normalized std dev): {:.3?}",
        gene_stats
            .iter()
            .map(|s| s.normalized_std_dev)
            .collect::<Vec<_>>()
    );

    eprintln!();
    if outcome.converged() {
        eprintln!("--- Optimal Solution Found ---");
    } else {
        eprintln!("--- Generation Cap Reached ---");
    }
    eprintln!("Generations: {}", outcome.generations);
    eprintln!("Best Fitness Score: {:.8}", outcome.best.fitness());
    eprintln!(
        "Chromosome Weights (W1 | W2 | ...): {}",
        weightfit_io::format_weights(outcome.best.genes())
    );

    let mut output = Output::from_output_path(arg.output.clone())?;
    weightfit_io::write_report(&mut output, &outcome.best)
        .with_context(|| format!("Failed to write report to {}", output.display_path()))?;
    output
        .flush()
        .with_context(|| format!("Failed to flush report to {}", output.display_path()))?;
    if let Some(path) = &arg.output {
        eprintln!("Optimal weights saved to: {}", path.display());
    }

    if let Some(path) = &arg.model {
        let model = FittedModel {
            fitted_at: Utc::now(),
            seed,
            final_fitness: outcome.best.fitness(),
            generations: outcome.generations,
            converged: outcome.converged(),
            config,
            weights: outcome.best.genes().to_vec(),
        };
        Output::save_json(&model, Some(path.clone()))?;
        eprintln!("Model saved to: {}", path.display());
    }

    Ok(())
}
