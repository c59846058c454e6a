//! Baseline / Candidate Comparison
//!
//! improvement = (baseline_mean - candidate_mean) / baseline_mean * 100
//!
//! Positive means the candidate is faster. A slower candidate yields a
//! negative improvement, which is reported as-is. When either side has no
//! successful trial, or the baseline mean is not positive, the comparison is
//! not computable and an error is returned instead of a misleading number.

use crate::summary::AggregateStat;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Relative improvement of a candidate over a baseline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// Baseline configuration name
    pub baseline_name: String,
    /// Candidate configuration name
    pub candidate_name: String,
    /// Baseline mean (ms)
    pub baseline_mean: f64,
    /// Candidate mean (ms)
    pub candidate_mean: f64,
    /// Signed improvement percentage
    pub improvement_percent: f64,
}

impl ComparisonResult {
    /// Baseline time divided by candidate time, `None` for a zero candidate
    pub fn speedup(&self) -> Option<f64> {
        (self.candidate_mean > 0.0).then(|| self.baseline_mean / self.candidate_mean)
    }
}

/// Reasons a comparison is not computable
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ComparisonError {
    /// Baseline configuration has no successful trials
    #[error("baseline '{0}' has no successful trials")]
    MissingBaseline(String),
    /// Candidate configuration has no successful trials
    #[error("candidate '{0}' has no successful trials")]
    MissingCandidate(String),
    /// Baseline mean is zero, negative or not finite
    #[error("baseline mean {0} is not a positive finite number")]
    NonPositiveBaseline(f64),
    /// Candidate mean is NaN or infinite
    #[error("candidate mean {0} is not finite")]
    NonFiniteCandidate(f64),
}

/// Compare two configurations of an aggregated run
pub fn compare(
    stats: &BTreeMap<String, AggregateStat>,
    baseline: &str,
    candidate: &str,
) -> Result<ComparisonResult, ComparisonError> {
    let baseline_stat = stats
        .get(baseline)
        .ok_or_else(|| ComparisonError::MissingBaseline(baseline.to_string()))?;
    let candidate_stat = stats
        .get(candidate)
        .ok_or_else(|| ComparisonError::MissingCandidate(candidate.to_string()))?;

    let improvement_percent = relative_improvement(baseline_stat.mean, candidate_stat.mean)?;

    Ok(ComparisonResult {
        baseline_name: baseline.to_string(),
        candidate_name: candidate.to_string(),
        baseline_mean: baseline_stat.mean,
        candidate_mean: candidate_stat.mean,
        improvement_percent,
    })
}

/// Signed improvement percentage of `candidate` over `baseline`
pub fn relative_improvement(baseline: f64, candidate: f64) -> Result<f64, ComparisonError> {
    if !baseline.is_finite() || baseline <= 0.0 {
        return Err(ComparisonError::NonPositiveBaseline(baseline));
    }
    if !candidate.is_finite() {
        return Err(ComparisonError::NonFiniteCandidate(candidate));
    }
    Ok((baseline - candidate) / baseline * 100.0)
}
