//! Dashboard components for exploring a loaded table.
//!
//! Every component is a pure function of the loaded [`Table`](sondage_table::Table)
//! and its own inputs; none of them mutate the table.
//!
//! # Overview
//!
//! - **Descriptive report** ([`describe`]): head preview and `describe`-style summary
//! - **Distributions** ([`distribution`]): value counts of categorical columns
//! - **Unique combinations** ([`unique`]): distinct rows over a column subset
//! - **Sampling** ([`sampling`]): simple and proportionally stratified random samples
//! - **Mini-poll** ([`poll`]): name and satisfaction answer, echoed back
//! - **Session** ([`session`]): the dashboard state and the `render` function that
//!   applies one user event and produces the visible outputs
//!
//! # Examples
//!
//! ```
//! use sondage_analysis::{distribution::Distribution, sampling};
//! use sondage_table::loader;
//!
//! let table = loader::load("poll.csv", b"city,age\nLyon,30\nParis,41\nLyon,25\n").unwrap();
//!
//! let distribution = Distribution::of(&table, "city").unwrap();
//! assert_eq!(distribution.frequencies().max_count(), 2);
//!
//! let sample = sampling::simple_random(&table, 2, sampling::DEFAULT_SEED).unwrap();
//! assert_eq!(sample.len(), 2);
//! ```

pub mod describe;
pub mod distribution;
pub mod poll;
pub mod sampling;
pub mod session;
pub mod unique;
