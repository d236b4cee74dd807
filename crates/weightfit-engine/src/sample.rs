//! The regression problem instance.

use crate::ConfigurationError;

/// One row of the regression problem: an input vector and its target.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    inputs: Vec<f64>,
    target: f64,
}

impl Sample {
    #[must_use]
    pub fn new(inputs: Vec<f64>, target: f64) -> Self {
        Self { inputs, target }
    }

    #[must_use]
    pub fn inputs(&self) -> &[f64] {
        &self.inputs
    }

    #[must_use]
    pub fn target(&self) -> f64 {
        self.target
    }
}

/// An immutable, non-empty collection of samples sharing one input width.
///
/// The input width is the gene count of every candidate evolved against this
/// set.
#[derive(Debug, Clone)]
pub struct SampleSet {
    samples: Vec<Sample>,
    gene_count: usize,
}

impl SampleSet {
    /// Validates and wraps the given samples.
    ///
    /// Fails if `samples` is empty, if the first sample has no inputs, or if any
    /// sample's input width differs from the first one.
    pub fn new(samples: Vec<Sample>) -> Result<Self, ConfigurationError> {
        let first = samples.first().ok_or(ConfigurationError::EmptySampleSet)?;
        let gene_count = first.inputs.len();
        if gene_count == 0 {
            return Err(ConfigurationError::ZeroGeneCount);
        }
        if let Some((index, sample)) = samples
            .iter()
            .enumerate()
            .find(|(_, s)| s.inputs.len() != gene_count)
        {
            return Err(ConfigurationError::InconsistentGeneCount {
                index,
                expected: gene_count,
                found: sample.inputs.len(),
            });
        }
        Ok(Self {
            samples,
            gene_count,
        })
    }

    /// Number of inputs per sample, which is also the number of genes per candidate.
    #[must_use]
    pub fn gene_count(&self) -> usize {
        self.gene_count
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[must_use]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sample> + '_ {
        self.samples.iter()
    }
}
