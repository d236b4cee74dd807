use rand::Rng;
use weightfit_stats::descriptive::DescriptiveStats;

use crate::{candidate::Candidate, config::GeneRange, fitness::FitnessEvaluator};

/// A fixed-size generation of candidates.
///
/// The population is never resized in place; the engine builds a new one for
/// every generation.
#[derive(Debug, Clone)]
pub struct Population {
    candidates: Vec<Candidate>,
}

impl Population {
    /// Creates `count` candidates with genes drawn uniformly from `range`.
    #[must_use]
    pub fn random<R>(count: usize, gene_count: usize, range: GeneRange, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let candidates = (0..count)
            .map(|_| Candidate::random(rng, range, gene_count))
            .collect();
        Self { candidates }
    }

    #[must_use]
    pub fn from_candidates(candidates: Vec<Candidate>) -> Self {
        Self { candidates }
    }

    #[must_use]
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Evaluates every candidate that has no cached fitness yet.
    pub fn evaluate_fitness(&mut self, evaluator: &FitnessEvaluator<'_>) {
        for candidate in &mut self.candidates {
            candidate.evaluate(evaluator);
        }
    }

    /// Sorts candidates by fitness, best first.
    ///
    /// The sort is stable: candidates with equal fitness keep their relative
    /// order. NaN fitness ranks last.
    pub fn rank(&mut self) {
        self.candidates
            .sort_by(|a, b| rank_key(b).total_cmp(&rank_key(a)));
    }

    /// Returns the fittest candidate, the earliest one on ties.
    #[must_use]
    pub fn best(&self) -> Option<&Candidate> {
        self.candidates.iter().fold(None, |best, candidate| match best {
            Some(b) if rank_key(b) >= rank_key(candidate) => Some(b),
            _ => Some(candidate),
        })
    }

    /// Computes statistics for the fitness of all candidates.
    #[must_use]
    pub fn compute_fitness_stats(&self) -> Option<DescriptiveStats> {
        DescriptiveStats::new(self.candidates.iter().map(Candidate::fitness))
    }

    /// Computes statistics for each gene position across all candidates.
    ///
    /// Useful to see how far the population has converged on each weight.
    #[must_use]
    pub fn compute_gene_stats(&self) -> Vec<DescriptiveStats> {
        let gene_count = self.candidates.first().map_or(0, |c| c.genes().len());
        (0..gene_count)
            .filter_map(|i| DescriptiveStats::new(self.candidates.iter().map(|c| c.genes()[i])))
            .collect()
    }
}

fn rank_key(candidate: &Candidate) -> f64 {
    let fitness = candidate.fitness();
    if fitness.is_nan() {
        f64::NEG_INFINITY
    } else {
        fitness
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg64;

    use super::*;
    use crate::{
        fitness::WeightTransform,
        sample::{Sample, SampleSet},
    };

    fn tagged(fitness: &[f64]) -> Population {
        Population::from_candidates(
            fitness
                .iter()
                .enumerate()
                .map(|(i, f)| Candidate::evaluated(vec![f64::from(u8::try_from(i).unwrap())], *f))
                .collect(),
        )
    }

    fn tags(population: &Population) -> Vec<f64> {
        population.candidates().iter().map(|c| c.genes()[0]).collect()
    }

    #[test]
    fn test_random_population_shape() {
        let mut rng = Pcg64::seed_from_u64(11);
        let population = Population::random(30, 4, GeneRange::UNIT, &mut rng);
        assert_eq!(population.len(), 30);
        assert!(population.candidates().iter().all(|c| c.genes().len() == 4));
    }

    #[test]
    fn test_rank_is_stable_on_ties() {
        let mut population = tagged(&[0.5, 0.9, 0.5, 0.9, 0.1]);
        population.rank();
        assert_eq!(tags(&population), vec![1.0, 3.0, 0.0, 2.0, 4.0]);
    }

    #[test]
    fn test_rank_puts_nan_last() {
        let mut population = tagged(&[f64::NAN, 0.2, 0.0]);
        population.rank();
        assert_eq!(tags(&population), vec![1.0, 2.0, 0.0]);
    }

    #[test]
    fn test_best_prefers_earliest_on_ties() {
        let population = tagged(&[0.3, 0.7, 0.7]);
        assert_eq!(population.best().unwrap().genes(), &[1.0]);
        assert!(Population::from_candidates(vec![]).best().is_none());
    }

    #[test]
    fn test_evaluate_skips_cached() {
        let samples = SampleSet::new(vec![Sample::new(vec![1.0], 0.0)]).unwrap();
        let evaluator = FitnessEvaluator::new(&samples, WeightTransform::Identity);
        let mut population = Population::from_candidates(vec![
            Candidate::evaluated(vec![1.0], 0.123),
            Candidate::new(vec![1.0]),
        ]);
        population.evaluate_fitness(&evaluator);
        assert_eq!(population.candidates()[0].fitness(), 0.123);
        assert_eq!(population.candidates()[1].fitness(), 0.5);
    }

    #[test]
    fn test_stats() {
        let population = Population::from_candidates(vec![
            Candidate::evaluated(vec![0.0, 1.0], 0.25),
            Candidate::evaluated(vec![1.0, 1.0], 0.75),
        ]);
        let fitness = population.compute_fitness_stats().unwrap();
        assert_eq!(fitness.mean, 0.5);
        let genes = population.compute_gene_stats();
        assert_eq!(genes.len(), 2);
        assert_eq!(genes[0].mean, 0.5);
        assert_eq!(genes[1].normalized_std_dev, 0.0);
    }
}
