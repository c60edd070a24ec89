//! Statistical utilities for the sondage dashboard.
//!
//! This crate provides the formulas behind the dashboard components:
//!
//! - **Descriptive statistics**: count, mean, sample standard deviation, min and max
//! - **Percentiles**: linearly interpolated quantiles
//! - **Frequency counting**: value counts ordered by descending count
//! - **Sample size**: Cochran's formula with optional finite-population correction
//!
//! # Modules
//!
//! - [`descriptive`]: Descriptive statistics for summarizing numeric columns
//! - [`percentiles`]: Percentile computation and storage
//! - [`frequency`]: Frequency tables for categorical columns
//! - [`cochran`]: Sample-size calculation
//!
//! # Examples
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use sondage_stats::descriptive::DescriptiveStats;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let stats = DescriptiveStats::new(values).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! assert_eq!(stats.count, 5);
//! ```
//!
//! ## Counting categories
//!
//! ```
//! use sondage_stats::frequency::FrequencyTable;
//!
//! let table = FrequencyTable::from_values(["A", "A", "B", "C", "C", "C"]);
//! assert_eq!(table.entries(), &[("C", 3), ("A", 2), ("B", 1)]);
//! ```
//!
//! ## Computing a sample size
//!
//! ```
//! use sondage_stats::cochran::SampleSizeParams;
//!
//! let params = SampleSizeParams::default();
//! assert_eq!(params.compute().size, 384);
//! ```

pub mod cochran;
pub mod descriptive;
pub mod frequency;
pub mod percentiles;
