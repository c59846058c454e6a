//! Suite Executor
//!
//! Runs a plan against a subject and turns the measurements into a report.
//!
//! ## Pipeline Overview
//!
//! ```text
//! ExecutionPlan (from planner)
//!       │
//!       ▼
//! ┌─────────────┐
//! │  execution  │  Fixtures, one trial per cell, progress
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │   report    │  Rows, per-configuration stats, comparison
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │ formatting  │  Human-readable output
//! └─────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`execution`] - Workload generation, fixture persistence and the suite run
//! - [`report`] - Report building
//! - [`formatting`] - Human-readable output formatting

mod execution;
mod formatting;
mod report;

// Re-export public API
pub use execution::{
    ExecutionConfig, Executor, SuiteRun, generate_workloads, write_fixtures,
};
pub use formatting::{format_human_output, format_micro_output};
pub use report::build_report;
