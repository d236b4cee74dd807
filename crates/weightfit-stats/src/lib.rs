//! Summary statistics for weightfit populations.
//!
//! The evolution engine reports, for every generation, how the fitness values
//! and each gene are distributed across the population. This crate holds the
//! small amount of statistics needed for that.
//!
//! # Examples
//!
//! ```
//! use weightfit_stats::descriptive::DescriptiveStats;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let stats = DescriptiveStats::new(values).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! ```

pub mod descriptive;
