//! Genetic operators over gene vectors.
//!
//! This module provides the building blocks the [`EvolutionEngine`](crate::EvolutionEngine)
//! uses to produce a new generation:
//!
//! - **Initialization**: [`random_genes`] draws genes uniformly from a [`GeneRange`]
//! - **Selection**: [`tournament_select`] picks a parent by tournament
//! - **Crossover**: [`single_point_crossover`] splices two parents at one cut point
//! - **Mutation**: [`Mutator`] perturbs genes with uniform noise
//!
//! # Tournament Selection
//!
//! `k` contestants are drawn uniformly *with replacement* and the fittest one wins.
//! Only comparisons are involved, so zero or negative fitness values need no
//! special treatment. Among contestants with equal fitness the one drawn first wins.
//!
//! # Single-Point Crossover
//!
//! The cut point is drawn from `[1, len - 2]`, so neither the first nor the last
//! position is ever the cut and the offspring always draws from both parents.
//! That interval is empty for fewer than three genes:
//!
//! | genes | cut | offspring                |
//! |-------|-----|--------------------------|
//! | 1     | 1   | copy of parent 1         |
//! | 2     | 1   | `[p1[0], p2[1]]`         |
//! | ≥ 3   | random in `[1, len - 2]` | `p1[..cut] ++ p2[cut..]` |
//!
//! No random number is consumed for fewer than three genes.
//!
//! # Mutation
//!
//! Each gene is independently perturbed with probability `rate` by a value drawn
//! uniformly from `[-step, +step]`. With [`MutationClamp::UnitInterval`] the
//! result is clamped into `[0, 1]`; with [`MutationClamp::Unbounded`] genes may
//! drift arbitrarily far from their initial range over many generations.

use rand::Rng;
use rand_distr::{Distribution as _, Uniform};
use serde::{Deserialize, Serialize};

use crate::{ConfigurationError, candidate::Candidate, config::GeneRange};

/// Creates a gene vector by applying a function to each index.
///
/// ```
/// use weightfit_engine::operators;
///
/// let genes = operators::from_fn(|i| i as f64 * 0.5, 3);
/// assert_eq!(genes, vec![0.0, 0.5, 1.0]);
/// ```
pub fn from_fn<F>(mut f: F, len: usize) -> Vec<f64>
where
    F: FnMut(usize) -> f64,
{
    let mut values = Vec::with_capacity(len);
    for i in 0..len {
        values.push(f(i));
    }
    values
}

/// Generates `len` genes, each drawn uniformly from `range`.
///
/// # Panics
///
/// Panics if `range` is inverted or its width is not finite (see
/// [`GeneRange::validate`]).
pub fn random_genes<R>(rng: &mut R, range: GeneRange, len: usize) -> Vec<f64>
where
    R: Rng + ?Sized,
{
    from_fn(|_| rng.random_range(range.min..=range.max), len)
}

/// Chooses the crossover cut point for a gene vector of length `len`.
pub fn crossover_point<R>(rng: &mut R, len: usize) -> usize
where
    R: Rng + ?Sized,
{
    if len < 3 {
        1
    } else {
        rng.random_range(1..=len - 2)
    }
}

/// Combines two parents at a single cut point.
///
/// The offspring takes `p1`'s genes before the cut and `p2`'s genes from the
/// cut onward.
///
/// # Panics
///
/// Panics if the parents have different lengths.
pub fn single_point_crossover<R>(p1: &[f64], p2: &[f64], rng: &mut R) -> Vec<f64>
where
    R: Rng + ?Sized,
{
    assert_eq!(p1.len(), p2.len());
    let point = crossover_point(rng, p1.len()).min(p1.len());
    let mut child = Vec::with_capacity(p1.len());
    child.extend_from_slice(&p1[..point]);
    child.extend_from_slice(&p2[point..]);
    child
}

/// Selects a candidate using tournament selection.
///
/// Draws `tournament_size` candidates uniformly with replacement and returns the
/// one with the highest fitness.
///
/// # Panics
///
/// Panics if `candidates` is empty or `tournament_size` is zero.
pub fn tournament_select<'a, R>(
    candidates: &'a [Candidate],
    tournament_size: usize,
    rng: &mut R,
) -> &'a Candidate
where
    R: Rng + ?Sized,
{
    assert!(tournament_size > 0);
    assert!(!candidates.is_empty());
    let mut best = &candidates[rng.random_range(0..candidates.len())];
    for _ in 1..tournament_size {
        let contestant = &candidates[rng.random_range(0..candidates.len())];
        if contestant.fitness() > best.fitness() {
            best = contestant;
        }
    }
    best
}

/// Bound applied to a gene after mutation.
#[derive(
    Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::FromStr,
)]
#[serde(rename_all = "lowercase")]
pub enum MutationClamp {
    /// Leave mutated genes unbounded.
    Unbounded,
    /// Clamp mutated genes into `[0, 1]`.
    #[default]
    UnitInterval,
}

impl MutationClamp {
    #[must_use]
    pub fn apply(self, gene: f64) -> f64 {
        match self {
            Self::Unbounded => gene,
            Self::UnitInterval => gene.clamp(0.0, 1.0),
        }
    }
}

/// Per-gene uniform mutation.
#[derive(Debug, Clone)]
pub struct Mutator {
    rate: f64,
    perturbation: Uniform<f64>,
    clamp: MutationClamp,
}

impl Mutator {
    /// Creates a mutator perturbing each gene with probability `rate` by a value
    /// in `[-step, +step]`.
    pub fn new(rate: f64, step: f64, clamp: MutationClamp) -> Result<Self, ConfigurationError> {
        if !(0.0..=1.0).contains(&rate) {
            return Err(ConfigurationError::InvalidMutationRate { rate });
        }
        if !(step.is_finite() && step > 0.0) {
            return Err(ConfigurationError::InvalidMutationStep { step });
        }
        let perturbation = Uniform::new_inclusive(-step, step)
            .map_err(|_| ConfigurationError::InvalidMutationStep { step })?;
        Ok(Self {
            rate,
            perturbation,
            clamp,
        })
    }

    /// Mutates `genes` in place.
    ///
    /// Only call this on a freshly produced offspring that nothing else refers to.
    pub fn mutate<R>(&self, genes: &mut [f64], rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        for gene in genes {
            if rng.random_bool(self.rate) {
                *gene = self.clamp.apply(*gene + self.perturbation.sample(rng));
            }
        }
    }
}
