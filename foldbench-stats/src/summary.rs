//! Per-Configuration Aggregation
//!
//! Reduces successful measurements to count/mean/min/max per configuration.
//! Failed trials never contribute, and a configuration with no successful
//! trial gets no entry at all rather than a zero-valued stat.

use foldbench_core::Measurement;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reduced timings of one configuration (milliseconds)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AggregateStat {
    /// Number of successful trials
    pub count: usize,
    /// Arithmetic mean
    pub mean: f64,
    /// Fastest trial
    pub min: f64,
    /// Slowest trial
    pub max: f64,
}

impl AggregateStat {
    /// Reduce a set of timings; `None` for an empty set
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        let (&first, rest) = samples.split_first()?;

        let (sum, min, max) = rest
            .iter()
            .fold((first, first, first), |(sum, min, max), &t| {
                (sum + t, min.min(t), max.max(t))
            });

        Some(Self {
            count: samples.len(),
            mean: sum / samples.len() as f64,
            min,
            max,
        })
    }
}

/// Append-only collection of successful timings keyed by configuration name
#[derive(Debug, Clone, Default)]
pub struct StatsAggregator {
    samples: BTreeMap<String, Vec<f64>>,
}

impl StatsAggregator {
    /// Empty aggregator
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one measurement; failed trials are ignored
    pub fn record(&mut self, measurement: &Measurement) {
        if !measurement.succeeded {
            return;
        }
        self.samples
            .entry(measurement.config_name.clone())
            .or_default()
            .push(measurement.elapsed_millis);
    }

    /// Record every measurement of a run
    pub fn extend<'a>(&mut self, measurements: impl IntoIterator<Item = &'a Measurement>) {
        for measurement in measurements {
            self.record(measurement);
        }
    }

    /// Successful timings recorded for `config_name`
    pub fn samples(&self, config_name: &str) -> &[f64] {
        self.samples
            .get(config_name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Reduce to one stat per configuration with at least one success
    pub fn summarize(&self) -> BTreeMap<String, AggregateStat> {
        self.samples
            .iter()
            .filter_map(|(name, samples)| {
                AggregateStat::from_samples(samples).map(|stat| (name.clone(), stat))
            })
            .collect()
    }
}

/// Group measurements by configuration and reduce the successful ones
pub fn aggregate(measurements: &[Measurement]) -> BTreeMap<String, AggregateStat> {
    let mut aggregator = StatsAggregator::new();
    aggregator.extend(measurements);
    aggregator.summarize()
}

/// Symbols processed per second, `None` when the time is not positive
pub fn throughput(size: usize, elapsed_millis: f64) -> Option<f64> {
    (elapsed_millis > 0.0).then(|| size as f64 * 1000.0 / elapsed_millis)
}
