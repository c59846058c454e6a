//! Report Data Structures

use chrono::{DateTime, Utc};
use foldbench_stats::{AggregateStat, ComparisonResult};
use serde::{Deserialize, Serialize};

/// Complete suite report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub meta: ReportMeta,
    /// One row per trial, in execution order
    pub results: Vec<TrialRow>,
    /// One block per configuration, in declaration order
    pub configurations: Vec<ConfigSummary>,
    pub comparison: Option<ComparisonOutcome>,
    pub summary: ReportSummary,
}

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMeta {
    pub schema_version: u32,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    /// Subject description (executable path or callable name)
    pub subject: String,
    /// Seed the workloads were generated with
    pub seed: u64,
    /// Workload sizes in execution order
    pub sizes: Vec<usize>,
}

/// Outcome of a single trial
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrialStatus {
    Ok,
    Failed,
}

impl std::fmt::Display for TrialStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            TrialStatus::Ok => "OK",
            TrialStatus::Failed => "FAILED",
        })
    }
}

/// Single row of the trial table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialRow {
    /// Fixture file name (e.g. `test_50.faa`)
    pub fixture: String,
    pub workload_id: String,
    pub workload_size: usize,
    pub configuration: String,
    /// `None` for failed trials
    pub elapsed_ms: Option<f64>,
    /// Symbols per second; `None` for failed or zero-time trials
    pub throughput: Option<f64>,
    pub status: TrialStatus,
}

/// Per-configuration summary block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSummary {
    pub name: String,
    pub args: String,
    /// Absent when the configuration has no successful trial
    pub stats: Option<AggregateStat>,
    /// Trials attempted, successful or not
    pub attempted: usize,
}

/// Baseline/candidate comparison, or why it could not be computed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonOutcome {
    pub baseline: String,
    pub candidate: String,
    pub result: Option<ComparisonResult>,
    pub not_computable: Option<String>,
}

/// Report summary
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_trials: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub total_duration_ms: f64,
}

/// In-process old-vs-new micro-benchmark report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MicroReport {
    pub schema_version: u32,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    /// Default iteration count per timed loop
    pub iterations: u64,
    pub cases: Vec<MicroCaseResult>,
}

/// One old-vs-new pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MicroCaseResult {
    pub name: String,
    pub baseline: MicroTiming,
    pub candidate: MicroTiming,
    pub improvement_percent: Option<f64>,
    pub not_computable: Option<String>,
    /// Whether both variants produced the same checksum
    pub outputs_agree: bool,
}

/// Timing of one variant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MicroTiming {
    pub label: String,
    pub iterations: u64,
    pub elapsed_ms: f64,
    pub ops_per_ms: Option<f64>,
}
