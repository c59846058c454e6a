//! JSON Output

use crate::report::{MicroReport, Report};

/// Current schema version of both report kinds
pub const SCHEMA_VERSION: u32 = 1;

/// Generate a prettified JSON suite report.
pub fn generate_json_report(report: &Report) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

/// Generate a prettified JSON micro-benchmark report.
pub fn generate_json_micro(report: &MicroReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}
