//! Engine configuration.
//!
//! All parameters of a run live in [`EngineConfig`]. The two behaviours of the
//! fitting program (non-negative weights in `[0, 1]`, or unconstrained weights
//! starting in `[-10, 10]`) are available as presets instead of separate
//! engines.

use serde::{Deserialize, Serialize};

use crate::{
    ConfigurationError,
    fitness::WeightTransform,
    operators::{MutationClamp, Mutator},
};

/// Closed interval from which initial genes are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneRange {
    pub min: f64,
    pub max: f64,
}

impl GeneRange {
    pub const UNIT: Self = Self::new(0.0, 1.0);

    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        // a finite width also rules out infinite and NaN bounds
        if self.min <= self.max && (self.max - self.min).is_finite() {
            Ok(())
        } else {
            Err(ConfigurationError::InvalidGeneRange {
                min: self.min,
                max: self.max,
            })
        }
    }
}

/// Parameters controlling one evolution run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Number of candidates per generation (at least 2)
    pub population_size: usize,
    /// Probability of perturbing each gene of an offspring
    pub mutation_rate: f64,
    /// Generation cap
    pub max_generations: usize,
    /// Range for random initial genes
    pub gene_range: GeneRange,
    /// How genes become prediction weights
    pub weight_transform: WeightTransform,
    /// Bound applied to mutated genes
    pub mutation_clamp: MutationClamp,
    /// Contestants drawn (with replacement) per tournament
    pub tournament_size: usize,
    /// Half-width of the uniform mutation perturbation
    pub mutation_step: f64,
    /// Best-ever fitness strictly above this value stops the run
    pub convergence_threshold: f64,
}

impl EngineConfig {
    pub const DEFAULT_POPULATION_SIZE: usize = 100;
    pub const DEFAULT_MUTATION_RATE: f64 = 0.05;
    pub const DEFAULT_MAX_GENERATIONS: usize = 1000;
    pub const DEFAULT_TOURNAMENT_SIZE: usize = 5;
    pub const DEFAULT_MUTATION_STEP: f64 = 0.5;
    pub const DEFAULT_CONVERGENCE_THRESHOLD: f64 = 0.99999;

    /// Non-negative weights: genes start in `[0, 1]`, negative genes predict as
    /// zero and mutation keeps genes within `[0, 1]`.
    #[must_use]
    pub fn non_negative() -> Self {
        Self {
            population_size: Self::DEFAULT_POPULATION_SIZE,
            mutation_rate: Self::DEFAULT_MUTATION_RATE,
            max_generations: Self::DEFAULT_MAX_GENERATIONS,
            gene_range: GeneRange::UNIT,
            weight_transform: WeightTransform::NonNegative,
            mutation_clamp: MutationClamp::UnitInterval,
            tournament_size: Self::DEFAULT_TOURNAMENT_SIZE,
            mutation_step: Self::DEFAULT_MUTATION_STEP,
            convergence_threshold: Self::DEFAULT_CONVERGENCE_THRESHOLD,
        }
    }

    /// Unconstrained weights: genes start in `[-10, 10]` and are used as-is.
    #[must_use]
    pub fn unconstrained() -> Self {
        Self {
            gene_range: GeneRange::new(-10.0, 10.0),
            weight_transform: WeightTransform::Identity,
            mutation_clamp: MutationClamp::Unbounded,
            ..Self::non_negative()
        }
    }

    /// Checks every parameter, reporting the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.mutator().map(|_| ())
    }

    /// Validates the configuration and builds the mutation operator from it.
    ///
    /// Mutation rate and step are checked by [`Mutator::new`].
    pub(crate) fn mutator(&self) -> Result<Mutator, ConfigurationError> {
        if self.population_size < 2 {
            return Err(ConfigurationError::PopulationTooSmall {
                size: self.population_size,
            });
        }
        if self.max_generations == 0 {
            return Err(ConfigurationError::ZeroGenerations);
        }
        if self.tournament_size == 0 {
            return Err(ConfigurationError::ZeroTournamentSize);
        }
        self.gene_range.validate()?;
        if !self.convergence_threshold.is_finite() {
            return Err(ConfigurationError::InvalidConvergenceThreshold {
                threshold: self.convergence_threshold,
            });
        }
        Mutator::new(self.mutation_rate, self.mutation_step, self.mutation_clamp)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::non_negative()
    }
}
