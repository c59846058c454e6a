//! CSV Output
//!
//! One line per trial (suite) or per variant (micro). Missing values are left
//! empty so spreadsheets read them as blanks.

use crate::report::{MicroReport, Report};
use std::fmt::Write;

/// Generate a CSV table of every trial
pub fn generate_csv_report(report: &Report) -> String {
    let mut out = String::from("fixture,size,configuration,elapsed_ms,throughput,status\n");

    for row in &report.results {
        let _ = writeln!(
            out,
            "{},{},{},{},{},{}",
            escape(&row.fixture),
            row.workload_size,
            escape(&row.configuration),
            optional(row.elapsed_ms, 3),
            optional(row.throughput, 0),
            row.status
        );
    }

    out
}

/// Generate a CSV table of every micro-benchmark variant
pub fn generate_csv_micro(report: &MicroReport) -> String {
    let mut out = String::from("case,variant,label,iterations,elapsed_ms,ops_per_ms,improvement_percent\n");

    for case in &report.cases {
        for (variant, timing) in [("baseline", &case.baseline), ("candidate", &case.candidate)] {
            let improvement = if variant == "candidate" {
                optional(case.improvement_percent, 1)
            } else {
                String::new()
            };
            let _ = writeln!(
                out,
                "{},{},{},{},{:.3},{},{}",
                escape(&case.name),
                variant,
                escape(&timing.label),
                timing.iterations,
                timing.elapsed_ms,
                optional(timing.ops_per_ms, 1),
                improvement
            );
        }
    }

    out
}

fn optional(value: Option<f64>, precision: usize) -> String {
    value
        .map(|v| format!("{:.*}", precision, v))
        .unwrap_or_default()
}

/// Quote a field when it contains a delimiter, quote or newline
fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
