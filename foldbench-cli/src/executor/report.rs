//! Report Building
//!
//! Converts a [`SuiteRun`] into a [`Report`]: one row per measurement, one
//! summary block per configuration and the baseline/candidate comparison.

use super::execution::SuiteRun;
use crate::planner::ExecutionPlan;
use chrono::Utc;
use foldbench_core::FIXTURE_EXTENSION;
use foldbench_report::{
    ComparisonOutcome, ConfigSummary, Report, ReportMeta, ReportSummary, SCHEMA_VERSION,
    TrialRow, TrialStatus,
};
use foldbench_stats::{aggregate, compare, throughput};

/// Build a complete report from a suite run
///
/// # Arguments
/// * `subject` - Description of the subject that was run
/// * `plan` - Plan the run executed (configuration order, seed)
/// * `run` - Measurements and timing of the run
/// * `pair` - Baseline and candidate names, when a comparison is wanted
pub fn build_report(
    subject: &str,
    plan: &ExecutionPlan,
    run: &SuiteRun,
    pair: Option<(&str, &str)>,
) -> Report {
    let results: Vec<TrialRow> = run
        .measurements
        .iter()
        .map(|m| {
            let (status, elapsed_ms, rate) = if m.succeeded {
                (
                    TrialStatus::Ok,
                    Some(m.elapsed_millis),
                    throughput(m.workload_size, m.elapsed_millis),
                )
            } else {
                (TrialStatus::Failed, None, None)
            };
            TrialRow {
                fixture: format!("{}.{}", m.workload_id, FIXTURE_EXTENSION),
                workload_id: m.workload_id.clone(),
                workload_size: m.workload_size,
                configuration: m.config_name.clone(),
                elapsed_ms,
                throughput: rate,
                status,
            }
        })
        .collect();

    let stats = aggregate(&run.measurements);

    let configurations = plan
        .configurations
        .iter()
        .map(|c| ConfigSummary {
            name: c.name.clone(),
            args: c.args.clone(),
            stats: stats.get(&c.name).copied(),
            attempted: run
                .measurements
                .iter()
                .filter(|m| m.config_name == c.name)
                .count(),
        })
        .collect();

    let comparison = pair.map(|(baseline, candidate)| {
        let (result, not_computable) = match compare(&stats, baseline, candidate) {
            Ok(result) => (Some(result), None),
            Err(e) => (None, Some(e.to_string())),
        };
        ComparisonOutcome {
            baseline: baseline.to_string(),
            candidate: candidate.to_string(),
            result,
            not_computable,
        }
    });

    let failed = run.failed();
    let summary = ReportSummary {
        total_trials: run.measurements.len(),
        succeeded: run.measurements.len() - failed,
        failed,
        total_duration_ms: run.duration_ms,
    };

    Report {
        meta: ReportMeta {
            schema_version: SCHEMA_VERSION,
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now(),
            subject: subject.to_string(),
            seed: plan.seed,
            sizes: run.workloads.iter().map(|w| w.size()).collect(),
        },
        results,
        configurations,
        comparison,
        summary,
    }
}
