#![warn(missing_docs)]
//! FoldBench Report - Result Rendering
//!
//! Holds the serializable report model produced after a run, plus the
//! machine-readable renderings:
//! - JSON (full schema)
//! - CSV (one line per trial)
//!
//! Human-readable tables are produced by the CLI.

mod csv;
mod json;
mod report;

pub use csv::{generate_csv_micro, generate_csv_report};
pub use json::{SCHEMA_VERSION, generate_json_micro, generate_json_report};
pub use report::{
    ComparisonOutcome, ConfigSummary, MicroCaseResult, MicroReport, MicroTiming, Report,
    ReportMeta, ReportSummary, TrialRow, TrialStatus,
};

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON with full schema
    Json,
    /// CSV for spreadsheets
    Csv,
    /// Human-readable terminal output
    Human,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "human" | "text" => Ok(OutputFormat::Human),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_output_format() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("csv".parse::<OutputFormat>(), Ok(OutputFormat::Csv));
        assert_eq!("text".parse::<OutputFormat>(), Ok(OutputFormat::Human));
        assert!("html".parse::<OutputFormat>().is_err());
    }
}
