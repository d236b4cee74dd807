use rand::Rng;

use crate::{config::GeneRange, fitness::FitnessEvaluator, operators};

/// A single candidate solution: a weight vector and its cached fitness.
///
/// A candidate exclusively owns its genes. Constructors copy the given gene
/// values and `clone` deep-copies them, so no two candidates ever alias.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    genes: Vec<f64>,
    fitness: Option<f64>,
}

impl Candidate {
    /// Creates a candidate whose genes are drawn uniformly from `range`.
    pub fn random<R>(rng: &mut R, range: GeneRange, gene_count: usize) -> Self
    where
        R: Rng + ?Sized,
    {
        Self::new(operators::random_genes(rng, range, gene_count))
    }

    /// Creates an unevaluated candidate that takes ownership of `genes`.
    #[must_use]
    pub fn new(genes: Vec<f64>) -> Self {
        Self {
            genes,
            fitness: None,
        }
    }

    /// Creates an unevaluated candidate from a copy of `genes`.
    #[must_use]
    pub fn from_genes(genes: &[f64]) -> Self {
        Self::new(genes.to_vec())
    }

    #[cfg(test)]
    pub(crate) fn evaluated(genes: Vec<f64>, fitness: f64) -> Self {
        Self {
            genes,
            fitness: Some(fitness),
        }
    }

    #[must_use]
    pub fn genes(&self) -> &[f64] {
        &self.genes
    }

    /// Returns the fitness score, or `0.0` if the candidate was never evaluated.
    #[must_use]
    pub fn fitness(&self) -> f64 {
        self.fitness.unwrap_or(0.0)
    }

    #[must_use]
    pub fn is_evaluated(&self) -> bool {
        self.fitness.is_some()
    }

    /// Computes the fitness unless it is already cached, and returns it.
    pub fn evaluate(&mut self, evaluator: &FitnessEvaluator<'_>) -> f64 {
        if let Some(fitness) = self.fitness {
            return fitness;
        }
        let fitness = evaluator.evaluate(&self.genes);
        self.fitness = Some(fitness);
        fitness
    }
}
