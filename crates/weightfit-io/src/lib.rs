//! Reading and writing weightfit data.
//!
//! The engine works on an in-memory [`SampleSet`](weightfit_engine::SampleSet).
//! This crate connects it to delimited text:
//!
//! - [`loader`] parses a table whose last column is the target into samples
//! - [`report`] writes the best candidate as a `Metric,Value` summary
//! - [`generator`] produces synthetic tables with a known linear solution

pub use self::{
    generator::{GenerateError, SyntheticSpec},
    loader::{DataLoadError, load_samples, read_samples},
    report::{format_weights, save_report, write_report},
};

pub mod generator;
pub mod loader;
pub mod report;
