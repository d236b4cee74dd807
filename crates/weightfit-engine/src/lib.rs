//! Genetic-algorithm engine for fitting linear weights.
//!
//! Given a table of input vectors paired with target scalars, this crate searches
//! for a weight vector minimizing the sum of squared prediction errors. Instead of
//! solving the least-squares problem in closed form, it evolves a population of
//! candidate weight vectors.
//!
//! # How Fitting Works
//!
//! 1. **Population** - Create a population of candidates with random weights
//! 2. **Evaluation** - Each candidate predicts every sample; squared errors are summed
//! 3. **Fitness** - The error is mapped to `1 / (1 + error)`, so fitness lies in `(0, 1]`
//! 4. **Ranking** - Candidates are sorted by fitness, the best-ever candidate is recorded
//! 5. **Reproduction** - The best candidate is carried over; the rest of the next
//!    generation comes from tournament selection, single-point crossover and mutation
//! 6. **Repeat** - Until the best-ever fitness exceeds the convergence threshold or
//!    the generation cap is reached
//!
//! # Architecture
//!
//! ```text
//! SampleSet (immutable problem instance)
//!     ↓ borrowed by
//! FitnessEvaluator (weight transform + sum of squared errors)
//!     ↓ scores
//! Population of Candidates
//!     ↓ evolved by
//! EvolutionEngine (selection, crossover, mutation, elitism)
//!     ↓ reports
//! best-ever Candidate
//! ```
//!
//! # Variants
//!
//! Two behaviours are selected through [`EngineConfig`] rather than separate
//! engines:
//!
//! - [`WeightTransform::NonNegative`] clamps each weight at zero *for prediction only*;
//!   the stored gene may still be negative.
//! - [`MutationClamp::UnitInterval`] keeps mutated genes within `[0, 1]`, whereas
//!   [`MutationClamp::Unbounded`] lets them drift without limit.
//!
//! # Example
//!
//! ```
//! use weightfit_engine::{EngineConfig, EvolutionEngine, GeneRange, MutationClamp, Sample, SampleSet, WeightTransform};
//!
//! let samples = SampleSet::new(
//!     (1..=5)
//!         .map(|x| Sample::new(vec![f64::from(x)], 2.0 * f64::from(x)))
//!         .collect(),
//! )
//! .unwrap();
//! let config = EngineConfig {
//!     gene_range: GeneRange::new(0.0, 10.0),
//!     weight_transform: WeightTransform::Identity,
//!     mutation_clamp: MutationClamp::Unbounded,
//!     mutation_rate: 1.0,
//!     max_generations: 300,
//!     ..EngineConfig::default()
//! };
//!
//! let mut engine = EvolutionEngine::with_seed(samples, config, 42).unwrap();
//! let outcome = engine.run();
//! assert!(outcome.best.fitness() > 0.0);
//! ```

pub use self::{
    candidate::Candidate,
    config::{EngineConfig, GeneRange},
    engine::{EngineState, EvolutionEngine, GenerationSummary, RunOutcome},
    fitness::{FitnessEvaluator, WeightTransform},
    operators::{MutationClamp, Mutator},
    population::Population,
    sample::{Sample, SampleSet},
};

pub mod candidate;
pub mod config;
pub mod engine;
pub mod fitness;
pub mod operators;
pub mod population;
pub mod sample;

/// A problem instance or engine configuration that cannot be run.
///
/// Every variant is detected before the first generation starts; the engine
/// itself has no failure paths once it is constructed.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ConfigurationError {
    #[display("sample set is empty")]
    EmptySampleSet,
    #[display("samples have no input columns")]
    ZeroGeneCount,
    #[display("sample #{index} has {found} inputs, expected {expected}")]
    InconsistentGeneCount {
        index: usize,
        expected: usize,
        found: usize,
    },
    #[display("population size must be at least 2, got {size}")]
    PopulationTooSmall { size: usize },
    #[display("mutation rate must be within [0, 1], got {rate}")]
    InvalidMutationRate { rate: f64 },
    #[display("mutation step must be positive and finite, got {step}")]
    InvalidMutationStep { step: f64 },
    #[display("max generations must be positive")]
    ZeroGenerations,
    #[display("tournament size must be positive")]
    ZeroTournamentSize,
    #[display("gene range [{min}, {max}] is empty or not finite")]
    InvalidGeneRange { min: f64, max: f64 },
    #[display("convergence threshold must be finite, got {threshold}")]
    InvalidConvergenceThreshold { threshold: f64 },
}
