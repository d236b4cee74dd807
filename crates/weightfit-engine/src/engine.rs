//! The generational loop.
//!
//! [`EvolutionEngine`] owns the sample set, the current [`Population`], the
//! random number generator and the best candidate seen so far. Each call to
//! [`EvolutionEngine::step`] runs one generation:
//!
//! 1. **Evaluate** every candidate that has no cached fitness
//! 2. **Rank** the population by fitness (stable, best first)
//! 3. **Record** the top candidate as best-ever if it beats the previous best
//!    (unconditionally on the first generation)
//! 4. **Check convergence**: best-ever fitness strictly above the threshold stops
//!    the run
//! 5. **Reproduce**: clone the top candidate into slot 0, then fill the rest with
//!    mutated offspring of two tournament-selected parents
//! 6. **Replace** the population and advance the generation counter
//!
//! ```text
//! Initialized ─step→ Running(1) ─step→ … ─step→ Converged(g)
//!                                       └─step→ ExhaustedGenerations
//! ```
//!
//! The engine draws every random number from the generator it owns, so two
//! engines seeded alike produce bit-identical results.

use rand::{Rng, SeedableRng as _};
use rand_pcg::Pcg64;
use weightfit_stats::descriptive::DescriptiveStats;

use crate::{
    ConfigurationError,
    candidate::Candidate,
    config::EngineConfig,
    fitness::FitnessEvaluator,
    operators::{self, Mutator},
    population::Population,
    sample::SampleSet,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum EngineState {
    /// No generation has run yet.
    Initialized,
    /// `generation` generations have run; the next one has that index.
    Running { generation: usize },
    /// The best-ever fitness exceeded the threshold during `generation`.
    Converged { generation: usize },
    /// The generation cap was reached without convergence.
    ExhaustedGenerations,
}

impl EngineState {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Converged { .. } | Self::ExhaustedGenerations)
    }
}

/// What happened during one generation.
#[derive(Debug, Clone)]
pub struct GenerationSummary {
    /// Zero-based generation index
    pub generation: usize,
    /// Fitness of the top-ranked candidate of this generation
    pub best_fitness: f64,
    /// Best fitness seen up to and including this generation
    pub best_ever_fitness: f64,
    /// Whether this generation produced a new best-ever candidate
    pub improved: bool,
    /// Fitness distribution of the evaluated population
    pub fitness_stats: DescriptiveStats,
}

/// Final result of a run.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub best: Candidate,
    pub state: EngineState,
    pub generations: usize,
}

impl RunOutcome {
    #[must_use]
    pub fn converged(&self) -> bool {
        self.state.is_converged()
    }
}

/// Genetic-algorithm engine fitting linear weights to a [`SampleSet`].
#[derive(Debug)]
pub struct EvolutionEngine<R = Pcg64> {
    config: EngineConfig,
    samples: SampleSet,
    mutator: Mutator,
    population: Population,
    best: Option<Candidate>,
    generation: usize,
    state: EngineState,
    rng: R,
}

impl EvolutionEngine<Pcg64> {
    /// Creates an engine driven by a PCG generator seeded with `seed`.
    pub fn with_seed(
        samples: SampleSet,
        config: EngineConfig,
        seed: u64,
    ) -> Result<Self, ConfigurationError> {
        Self::new(samples, config, Pcg64::seed_from_u64(seed))
    }
}

impl<R> EvolutionEngine<R>
where
    R: Rng,
{
    /// Validates the configuration and creates the random initial population.
    pub fn new(
        samples: SampleSet,
        config: EngineConfig,
        mut rng: R,
    ) -> Result<Self, ConfigurationError> {
        let mutator = config.mutator()?;
        let population = Population::random(
            config.population_size,
            samples.gene_count(),
            config.gene_range,
            &mut rng,
        );
        log::debug!(
            "initialized population of {} candidates with {} genes",
            population.len(),
            samples.gene_count()
        );
        Ok(Self {
            config,
            samples,
            mutator,
            population,
            best: None,
            generation: 0,
            state: EngineState::Initialized,
            rng,
        })
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn samples(&self) -> &SampleSet {
        &self.samples
    }

    #[must_use]
    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Best candidate seen so far, `None` before the first generation.
    #[must_use]
    pub fn best(&self) -> Option<&Candidate> {
        self.best.as_ref()
    }

    #[must_use]
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Number of generations run so far.
    #[must_use]
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Runs one generation.
    ///
    /// Returns `None` without doing anything once the engine has converged or
    /// exhausted its generations.
    pub fn step(&mut self) -> Option<GenerationSummary> {
        if self.state.is_terminal() {
            return None;
        }
        let generation = self.generation;

        let evaluator = FitnessEvaluator::new(&self.samples, self.config.weight_transform);
        self.population.evaluate_fitness(&evaluator);
        self.population.rank();

        let leader = self.population.best()?;
        let best_fitness = leader.fitness();
        let improved = self
            .best
            .as_ref()
            .is_none_or(|best| best_fitness > best.fitness());
        if improved {
            self.best = Some(leader.clone());
        }
        let best_ever_fitness = self.best.as_ref().map_or(best_fitness, Candidate::fitness);
        let fitness_stats = self.population.compute_fitness_stats()?;
        log::debug!(
            "generation {generation}: best {best_fitness:.8}, mean {:.8}, min {:.8}",
            fitness_stats.mean,
            fitness_stats.min
        );

        self.generation += 1;
        if best_ever_fitness > self.config.convergence_threshold {
            self.state = EngineState::Converged { generation };
            log::info!("converged after {} generations", self.generation);
        } else {
            self.population = self.reproduce();
            if self.generation >= self.config.max_generations {
                self.state = EngineState::ExhaustedGenerations;
                log::info!(
                    "generation cap of {} reached without convergence",
                    self.config.max_generations
                );
            } else {
                self.state = EngineState::Running {
                    generation: self.generation,
                };
            }
        }

        Some(GenerationSummary {
            generation,
            best_fitness,
            best_ever_fitness,
            improved,
            fitness_stats,
        })
    }

    /// Runs generations until the engine converges or exhausts its generations.
    pub fn run(&mut self) -> RunOutcome {
        self.run_with(|_| {})
    }

    /// Like [`run`](Self::run), passing every generation's summary to `observer`.
    pub fn run_with<F>(&mut self, mut observer: F) -> RunOutcome
    where
        F: FnMut(&GenerationSummary),
    {
        while let Some(summary) = self.step() {
            observer(&summary);
        }
        RunOutcome {
            best: self
                .best
                .clone()
                .expect("at least one generation has run"),
            state: self.state,
            generations: self.generation,
        }
    }

    /// Builds the next generation from the ranked current population.
    fn reproduce(&mut self) -> Population {
        let current = self.population.candidates();
        let mut next = Vec::with_capacity(self.config.population_size);

        // elitism
        next.push(current[0].clone());

        while next.len() < self.config.population_size {
            let p1 =
                operators::tournament_select(current, self.config.tournament_size, &mut self.rng);
            let p2 =
                operators::tournament_select(current, self.config.tournament_size, &mut self.rng);
            let mut child =
                operators::single_point_crossover(p1.genes(), p2.genes(), &mut self.rng);
            self.mutator.mutate(&mut child, &mut self.rng);
            next.push(Candidate::new(child));
        }

        Population::from_candidates(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::GeneRange,
        fitness::WeightTransform,
        operators::MutationClamp,
        sample::Sample,
    };

    fn linear_samples() -> SampleSet {
        SampleSet::new(
            (1..=6)
                .map(|x| {
                    let x = f64::from(x);
                    Sample::new(vec![x, 1.0, x * x], 0.5 * x + 0.25 + 0.1 * x * x)
                })
                .collect(),
        )
        .unwrap()
    }

    /// Two samples with identical inputs and different targets: never converges.
    fn unfittable_samples() -> SampleSet {
        SampleSet::new(vec![
            Sample::new(vec![1.0, 1.0, 1.0], 0.0),
            Sample::new(vec![1.0, 1.0, 1.0], 10.0),
        ])
        .unwrap()
    }

    fn small_config() -> EngineConfig {
        EngineConfig {
            population_size: 20,
            max_generations: 30,
            ..EngineConfig::default()
        }
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = EngineConfig {
            population_size: 1,
            ..EngineConfig::default()
        };
        let err = EvolutionEngine::with_seed(linear_samples(), config, 0).unwrap_err();
        assert_eq!(err, ConfigurationError::PopulationTooSmall { size: 1 });

        let config = EngineConfig {
            mutation_step: -0.5,
            ..EngineConfig::default()
        };
        let err = EvolutionEngine::with_seed(linear_samples(), config, 0).unwrap_err();
        assert_eq!(err, ConfigurationError::InvalidMutationStep { step: -0.5 });
    }

    #[test]
    fn test_rejects_overflowing_gene_range() {
        let config = EngineConfig {
            gene_range: GeneRange::new(-f64::MAX, f64::MAX),
            ..EngineConfig::unconstrained()
        };
        let err = EvolutionEngine::with_seed(linear_samples(), config, 0).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::InvalidGeneRange {
                min: -f64::MAX,
                max: f64::MAX,
            }
        );
    }

    #[test]
    fn test_same_seed_same_result() {
        let run = |seed| {
            let mut engine =
                EvolutionEngine::with_seed(linear_samples(), small_config(), seed).unwrap();
            engine.run()
        };
        let a = run(1234);
        let b = run(1234);
        assert_eq!(a.best, b.best);
        assert_eq!(a.best.fitness().to_bits(), b.best.fitness().to_bits());
        assert_eq!(a.generations, b.generations);
    }

    #[test]
    fn test_best_ever_never_regresses() {
        let config = EngineConfig {
            mutation_rate: 0.3,
            max_generations: 60,
            ..EngineConfig::unconstrained()
        };
        let mut engine = EvolutionEngine::with_seed(linear_samples(), config, 99).unwrap();
        let mut history = vec![];
        engine.run_with(|s| history.push((s.best_fitness, s.best_ever_fitness)));

        assert!(!history.is_empty());
        for pair in history.windows(2) {
            assert!(pair[1].1 >= pair[0].1);
            // the elite is carried over, so each generation's best does not regress either
            assert!(pair[1].0 >= pair[0].0);
        }
        for (best, best_ever) in &history {
            assert!(best_ever >= best);
        }
    }

    #[test]
    fn test_population_size_is_constant() {
        let mut engine =
            EvolutionEngine::with_seed(unfittable_samples(), small_config(), 5).unwrap();
        assert_eq!(engine.population().len(), 20);
        while engine.step().is_some() {
            assert_eq!(engine.population().len(), 20);
        }
    }

    #[test]
    fn test_state_transitions_to_exhausted() {
        let config = EngineConfig {
            max_generations: 3,
            ..small_config()
        };
        let mut engine = EvolutionEngine::with_seed(unfittable_samples(), config, 8).unwrap();
        assert_eq!(engine.state(), EngineState::Initialized);
        assert!(engine.best().is_none());

        let first = engine.step().unwrap();
        assert_eq!(first.generation, 0);
        assert!(first.improved);
        assert_eq!(engine.state(), EngineState::Running { generation: 1 });

        engine.step().unwrap();
        engine.step().unwrap();
        assert_eq!(engine.state(), EngineState::ExhaustedGenerations);
        assert_eq!(engine.generation(), 3);
        assert!(engine.step().is_none());
        assert_eq!(engine.generation(), 3);

        let outcome = engine.run();
        assert!(!outcome.converged());
        assert_eq!(outcome.generations, 3);
        // at best the prediction sits halfway between 0 and 10
        assert!(outcome.best.fitness() <= 1.0 / 51.0);
    }

    #[test]
    fn test_threshold_is_strict() {
        // zero inputs with zero target: every candidate has fitness exactly 1.0
        let samples = SampleSet::new(vec![Sample::new(vec![0.0, 0.0, 0.0], 0.0)]).unwrap();

        let at_threshold = EngineConfig {
            convergence_threshold: 1.0,
            max_generations: 4,
            ..small_config()
        };
        let mut engine = EvolutionEngine::with_seed(samples.clone(), at_threshold, 3).unwrap();
        let outcome = engine.run();
        assert_eq!(outcome.state, EngineState::ExhaustedGenerations);
        assert_eq!(outcome.best.fitness(), 1.0);

        let mut engine = EvolutionEngine::with_seed(samples, small_config(), 3).unwrap();
        let outcome = engine.run();
        assert_eq!(outcome.state, EngineState::Converged { generation: 0 });
        assert_eq!(outcome.generations, 1);
    }

    #[test]
    fn test_converged_population_is_not_replaced() {
        let samples = SampleSet::new(vec![Sample::new(vec![0.0], 0.0)]).unwrap();
        let mut engine = EvolutionEngine::with_seed(samples, small_config(), 21).unwrap();
        engine.step().unwrap();
        assert!(engine.state().is_converged());
        assert!(engine.population().candidates().iter().all(Candidate::is_evaluated));
    }

    #[test]
    fn test_elite_carried_into_slot_zero() {
        let mut engine =
            EvolutionEngine::with_seed(unfittable_samples(), small_config(), 13).unwrap();
        engine.step().unwrap();
        let best = engine.best().unwrap().clone();

        let next = engine.population().candidates();
        assert_eq!(next[0], best);
        assert!(next[0].is_evaluated());
        assert!(next[1..].iter().all(|c| !c.is_evaluated()));
    }

    #[test]
    fn test_negative_genes_survive_non_negative_transform() {
        let config = EngineConfig {
            gene_range: GeneRange::new(-1.0, 1.0),
            weight_transform: WeightTransform::NonNegative,
            mutation_clamp: MutationClamp::Unbounded,
            ..small_config()
        };
        let mut engine = EvolutionEngine::with_seed(linear_samples(), config, 17).unwrap();
        engine.step().unwrap();

        let evaluator = FitnessEvaluator::new(engine.samples(), WeightTransform::NonNegative);
        let best = engine.best().unwrap();
        assert_eq!(best.fitness(), evaluator.evaluate(best.genes()));

        let has_negative = engine
            .population()
            .candidates()
            .iter()
            .any(|c| c.genes().iter().any(|g| *g < 0.0));
        assert!(has_negative);
    }
}
