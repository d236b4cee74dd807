use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use weightfit_engine::EngineConfig;

/// Result of a `fit` run, saved alongside the CSV report.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FittedModel {
    pub fitted_at: DateTime<Utc>,
    pub seed: u64,
    pub final_fitness: f64,
    pub generations: usize,
    pub converged: bool,
    pub config: EngineConfig,
    pub weights: Vec<f64>,
}
