#![warn(missing_docs)]
//! FoldBench Core - Trial Runtime
//!
//! This crate provides everything that runs between "here is a workload" and
//! "here is a measurement":
//! - `Timer` over a monotonic clock
//! - `WorkloadGenerator` for seeded, reproducible synthetic inputs
//! - `SubjectRunner` with external-process and in-process implementations
//! - `BenchmarkSuite`, the Workload x Configuration state machine

mod callable;
mod measure;
mod process;
mod subject;
mod suite;
mod workload;

pub use callable::{CallableSubject, InProcessRunner, Timed};
pub use measure::{Timer, duration_to_millis};
pub use process::ExternalSubject;
pub use subject::{SubjectError, SubjectRunner, Trial, TrialOutcome};
pub use suite::{
    BenchmarkSuite, Configuration, FixtureSet, Measurement, SuiteError, SuiteState,
};
pub use workload::{
    ALPHABET, DEFAULT_SEED, DEFAULT_SIZES, FIXTURE_EXTENSION, Workload, WorkloadGenerator,
    generate,
};
