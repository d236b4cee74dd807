//! Sum-of-squared-error fitness.
//!
//! A candidate's genes are the weights of a linear model without intercept. For
//! each sample the prediction is
//!
//! ```text
//! predicted = Σ_i inputs[i] * transform(genes[i])
//! ```
//!
//! and the squared differences to the targets are summed. The error is mapped to
//! fitness with `1 / (1 + error)`: fitness is strictly decreasing in the error,
//! lies in `(0, 1]`, and reaches `1` only for a perfect fit. The bounded range is
//! what makes a fixed convergence threshold meaningful.

use std::iter;

use serde::{Deserialize, Serialize};

use crate::sample::SampleSet;

/// How a gene is turned into the weight used for prediction.
///
/// The transform only affects prediction. Genes keep their raw value, so a
/// negative gene under [`WeightTransform::NonNegative`] is valid state that
/// simply contributes nothing.
#[derive(
    Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::FromStr,
)]
#[serde(rename_all = "lowercase")]
pub enum WeightTransform {
    /// Use the gene as-is.
    Identity,
    /// Use `max(0, gene)`.
    #[default]
    NonNegative,
}

impl WeightTransform {
    #[must_use]
    pub fn apply(self, gene: f64) -> f64 {
        match self {
            Self::Identity => gene,
            Self::NonNegative => gene.max(0.0),
        }
    }
}

/// Maps a sum of squared errors to a fitness score in `(0, 1]`.
///
/// ```
/// use weightfit_engine::fitness::fitness_from_error;
///
/// assert_eq!(fitness_from_error(0.0), 1.0);
/// assert_eq!(fitness_from_error(1.0), 0.5);
/// assert_eq!(fitness_from_error(f64::INFINITY), 0.0);
/// ```
#[must_use]
pub fn fitness_from_error(total_squared_error: f64) -> f64 {
    1.0 / (1.0 + total_squared_error)
}

/// Scores gene vectors against a fixed sample set.
///
/// Evaluation is a pure function of the genes, so the evaluator can be shared
/// freely and a candidate's fitness never has to be recomputed while its genes
/// stay the same.
#[derive(Debug, Clone, Copy)]
pub struct FitnessEvaluator<'a> {
    samples: &'a SampleSet,
    transform: WeightTransform,
}

impl<'a> FitnessEvaluator<'a> {
    #[must_use]
    pub fn new(samples: &'a SampleSet, transform: WeightTransform) -> Self {
        Self { samples, transform }
    }

    /// Predicts the target for one input vector.
    #[must_use]
    pub fn predict(&self, genes: &[f64], inputs: &[f64]) -> f64 {
        iter::zip(inputs, genes)
            .map(|(x, w)| x * self.transform.apply(*w))
            .sum()
    }

    /// Sums `(target - predicted)^2` over all samples.
    ///
    /// # Panics
    ///
    /// Panics if `genes` does not have one value per input column.
    #[must_use]
    pub fn sum_squared_error(&self, genes: &[f64]) -> f64 {
        assert_eq!(
            genes.len(),
            self.samples.gene_count(),
            "gene count must match sample width"
        );
        self.samples
            .iter()
            .map(|sample| {
                let error = sample.target() - self.predict(genes, sample.inputs());
                error * error
            })
            .sum()
    }

    #[must_use]
    pub fn evaluate(&self, genes: &[f64]) -> f64 {
        fitness_from_error(self.sum_squared_error(genes))
    }
}
