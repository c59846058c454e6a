#![warn(missing_docs)]
//! # FoldBench
//!
//! Old-vs-new performance harness: measures how much faster an optimized
//! variant of a routine is than its baseline, under repeatable conditions.
//!
//! FoldBench provides:
//! - **Deterministic Workloads**: seeded synthetic sequences, persisted as fixture files
//! - **Pluggable Subjects**: external executables or in-process closures behind one trait
//! - **Matrix Runs**: every workload against every configuration, exactly once, in a fixed order
//! - **Failure Isolation**: a failing trial is recorded and reported, never retried or fatal
//! - **Comparison**: per-configuration mean/min/max and signed relative improvement
//! - **Micro-Benchmarks**: in-process old/new kernel pairs with output agreement checks
//!
//! ## Quick Start
//!
//! ```ignore
//! use foldbench::prelude::*;
//!
//! let workloads = WorkloadGenerator::new(42).generate_batch(&[10, 25, 50]);
//! let configurations = vec![
//!     Configuration::new("default", ""),
//!     Configuration::new("windowed", "-w 20"),
//! ];
//! let mut subject = ExternalSubject::locate("./src/CDSfold")?;
//! let fixtures = FixtureSet::write_all("target/foldbench/fixtures", &workloads)?;
//!
//! let mut suite = BenchmarkSuite::new(workloads, configurations)?;
//! let measurements = suite.run(&mut subject, &fixtures, |_| {})?;
//!
//! let stats = aggregate(measurements);
//! println!("{:?}", compare(&stats, "default", "windowed"));
//! ```

// Re-export core types
pub use foldbench_core::{
    ALPHABET, BenchmarkSuite, CallableSubject, Configuration, DEFAULT_SEED, DEFAULT_SIZES,
    ExternalSubject, FixtureSet, InProcessRunner, Measurement, SubjectError, SubjectRunner,
    SuiteError, SuiteState, Timed, Timer, Trial, TrialOutcome, Workload, WorkloadGenerator,
    generate,
};

// Re-export stats
pub use foldbench_stats::{
    AggregateStat, ComparisonError, ComparisonResult, StatsAggregator, aggregate, compare,
    relative_improvement, throughput,
};

// Re-export report types
pub use foldbench_report::{OutputFormat, Report, generate_csv_report, generate_json_report};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        BenchmarkSuite, CallableSubject, Configuration, ExternalSubject, FixtureSet,
        InProcessRunner, SubjectRunner, WorkloadGenerator, aggregate, compare,
    };
}

/// Run the FoldBench CLI harness.
///
/// Call this from a binary's `main()`:
/// ```ignore
/// fn main() -> std::process::ExitCode {
///     foldbench::run()
/// }
/// ```
pub use foldbench_cli::run;
