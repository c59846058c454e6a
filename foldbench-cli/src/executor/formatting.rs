//! Output Formatting
//!
//! Human-readable output formatting for suite and micro-benchmark reports.
//!
//! Suite output has three parts:
//! - Trial table (fixture, configuration, time, throughput, status), with a
//!   separator after each workload
//! - Per-configuration summary in declaration order
//! - Baseline/candidate improvement, or why it is not computable

use foldbench_report::{MicroReport, MicroTiming, Report, TrialRow};

/// Format a report for human-readable terminal display
///
/// # Arguments
/// * `report` - Complete suite report
///
/// # Returns
/// Formatted string suitable for terminal output
pub fn format_human_output(report: &Report) -> String {
    let mut output = String::new();

    output.push('\n');
    output.push_str("FoldBench Results\n");
    output.push_str(&"=".repeat(60));
    output.push('\n');
    output.push_str(&format!("Subject: {}\n", report.meta.subject));
    output.push_str(&format!("Seed:    {}\n\n", report.meta.seed));

    output.push_str(&format!(
        "{:<16} {:<16} {:>12} {:>14} {:>8}\n",
        "Fixture", "Config", "Time (ms)", "Throughput", "Status"
    ));
    output.push_str(&"-".repeat(70));
    output.push('\n');

    let mut previous: Option<&str> = None;
    for row in &report.results {
        if previous.is_some_and(|id| id != row.workload_id) {
            output.push_str(&"-".repeat(70));
            output.push('\n');
        }
        output.push_str(&format_row(row));
        previous = Some(row.workload_id.as_str());
    }
    if previous.is_some() {
        output.push_str(&"-".repeat(70));
        output.push('\n');
    }

    // Per-configuration summary
    output.push_str("\nSummary by configuration\n");
    output.push_str(&"=".repeat(60));
    output.push('\n');
    for config in &report.configurations {
        output.push_str(&format!("\n{}:\n", config.name));
        match &config.stats {
            Some(stats) => {
                output.push_str(&format!("  Average: {:.2} ms\n", stats.mean));
                output.push_str(&format!("  Min:     {:.2} ms\n", stats.min));
                output.push_str(&format!("  Max:     {:.2} ms\n", stats.max));
                output.push_str(&format!(
                    "  Trials:  {} of {}\n",
                    stats.count, config.attempted
                ));
            }
            None => {
                output.push_str(&format!(
                    "  no successful trials ({} attempted)\n",
                    config.attempted
                ));
            }
        }
    }

    if let Some(comparison) = &report.comparison {
        output.push('\n');
        output.push_str(&"=".repeat(60));
        output.push('\n');
        match (&comparison.result, &comparison.not_computable) {
            (Some(result), _) => {
                output.push_str(&format!(
                    "Improvement ({} -> {}): {:+.1}%",
                    comparison.baseline, comparison.candidate, result.improvement_percent
                ));
                if let Some(speedup) = result.speedup() {
                    output.push_str(&format!(" ({:.2}x)", speedup));
                }
                output.push('\n');
            }
            (None, reason) => {
                output.push_str(&format!(
                    "Improvement ({} -> {}): not computable: {}\n",
                    comparison.baseline,
                    comparison.candidate,
                    reason.as_deref().unwrap_or("unknown")
                ));
            }
        }
    }

    output.push_str(&format!(
        "\n{} trials, {} ok, {} failed, {:.2} ms total\n",
        report.summary.total_trials,
        report.summary.succeeded,
        report.summary.failed,
        report.summary.total_duration_ms
    ));

    output
}

fn format_row(row: &TrialRow) -> String {
    let time = row
        .elapsed_ms
        .map(|ms| format!("{:.2}", ms))
        .unwrap_or_else(|| "-".to_string());
    let throughput = row
        .throughput
        .map(|t| format!("{} aa/s", t as u64))
        .unwrap_or_else(|| "N/A".to_string());
    format!(
        "{:<16} {:<16} {:>12} {:>14} {:>8}\n",
        row.fixture, row.configuration, time, throughput, row.status
    )
}

/// Format a micro-benchmark report for terminal display
pub fn format_micro_output(report: &MicroReport) -> String {
    let mut output = String::new();

    output.push('\n');
    output.push_str("FoldBench Micro-Benchmarks\n");
    output.push_str(&"=".repeat(60));
    output.push('\n');
    output.push_str(&format!("Iterations per test: {}\n", report.iterations));

    for case in &report.cases {
        output.push('\n');
        output.push_str(&"=".repeat(60));
        output.push('\n');
        output.push_str(&case.name);
        output.push('\n');
        output.push_str(&"=".repeat(60));
        output.push('\n');
        output.push_str(&format_timing(&case.baseline));
        output.push_str(&format_timing(&case.candidate));
        output.push_str(&"-".repeat(60));
        output.push('\n');
        match (case.improvement_percent, &case.not_computable) {
            (Some(improvement), _) => {
                output.push_str(&format!("Improvement: {:.1}%\n", improvement));
            }
            (None, reason) => {
                output.push_str(&format!(
                    "Improvement: not computable: {}\n",
                    reason.as_deref().unwrap_or("unknown")
                ));
            }
        }
        if !case.outputs_agree {
            output.push_str("WARNING: variants produced different results\n");
        }
    }

    output
}

fn format_timing(timing: &MicroTiming) -> String {
    let rate = timing
        .ops_per_ms
        .map(|r| format!("{:>10.1} ops/ms", r))
        .unwrap_or_else(|| format!("{:>17}", "N/A"));
    format!(
        "{:>25}: {:>10.3} ms ({})\n",
        timing.label, timing.elapsed_ms, rate
    )
}
