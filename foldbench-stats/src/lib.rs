#![warn(missing_docs)]
//! FoldBench Statistics
//!
//! Deliberately small: per-configuration count/mean/min/max over successful
//! trials, and a guarded relative-improvement percentage between a baseline
//! and a candidate configuration.

mod comparison;
mod summary;

pub use comparison::{ComparisonError, ComparisonResult, compare, relative_improvement};
pub use summary::{AggregateStat, StatsAggregator, aggregate, throughput};
