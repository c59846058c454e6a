//! Suite Execution
//!
//! Turns an [`ExecutionPlan`] into measurements: generate workloads, persist
//! fixtures, drive the subject over the matrix, clean up.
//!
//! ## Data Flow
//!
//! ```text
//! ExecutionPlan (sizes, configurations, seed)
//!        │
//!        ▼
//!  WorkloadGenerator ──▶ FixtureSet (test_<size>.faa)
//!        │
//!        ▼
//! ┌──────────────────┐
//! │  BenchmarkSuite  │  one trial per (workload, configuration)
//! └────────┬─────────┘
//!          │
//!          ▼
//!  SuiteRun (measurements, duration, fault)
//! ```

use crate::planner::ExecutionPlan;
use anyhow::Context;
use foldbench_core::{
    BenchmarkSuite, FixtureSet, Measurement, SubjectError, SubjectRunner, SuiteError, Timer,
    Workload, WorkloadGenerator,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};

/// Configuration for suite execution
#[derive(Debug, Clone)]
pub struct ExecutionConfig {
    /// Where fixtures are written; `None` for subjects that take no file
    pub fixture_dir: Option<PathBuf>,
    /// Leave fixtures on disk afterwards
    pub keep_fixtures: bool,
    /// Draw a progress bar on stderr
    pub show_progress: bool,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            fixture_dir: None,
            keep_fixtures: true,
            show_progress: true,
        }
    }
}

/// Result of executing a plan
#[derive(Debug)]
pub struct SuiteRun {
    /// Workloads in execution order
    pub workloads: Vec<Workload>,
    /// Every recorded measurement, in execution order
    pub measurements: Vec<Measurement>,
    /// Wall time of the whole run
    pub duration_ms: f64,
    /// Fatal subject error that stopped the run early, if any
    pub fault: Option<SubjectError>,
}

impl SuiteRun {
    /// Trials that reported failure
    pub fn failed(&self) -> usize {
        self.measurements.iter().filter(|m| !m.succeeded).count()
    }
}

/// Generate the plan's workloads
pub fn generate_workloads(plan: &ExecutionPlan) -> Vec<Workload> {
    WorkloadGenerator::new(plan.seed).generate_batch(&plan.sizes)
}

/// Write one fixture per workload into `dir`
pub fn write_fixtures(dir: &Path, workloads: &[Workload]) -> anyhow::Result<FixtureSet> {
    FixtureSet::write_all(dir, workloads)
        .with_context(|| format!("failed to write fixtures to {}", dir.display()))
}

/// Execute plans against a subject (single-threaded, one trial at a time)
pub struct Executor {
    config: ExecutionConfig,
}

impl Executor {
    /// Create an executor
    pub fn new(config: ExecutionConfig) -> Self {
        Self { config }
    }

    /// Execute every trial of `plan`.
    ///
    /// Setup problems (bad matrix, unwritable fixture dir) are errors. A fatal
    /// subject error mid-run is not: the measurements taken so far come back
    /// with [`SuiteRun::fault`] set.
    pub fn execute<R>(&self, runner: &mut R, plan: &ExecutionPlan) -> anyhow::Result<SuiteRun>
    where
        R: SubjectRunner + ?Sized,
    {
        let timer = Timer::start();

        // The matrix is checked before anything touches the fixture dir
        let mut suite = BenchmarkSuite::new(generate_workloads(plan), plan.configurations.clone())
            .context("invalid benchmark matrix")?;
        let fixtures = match &self.config.fixture_dir {
            Some(dir) => write_fixtures(dir, suite.workloads())?,
            None => FixtureSet::empty(),
        };

        let pb = self.progress_bar(suite.trial_count() as u64);
        let result = suite.run(runner, &fixtures, |m| {
            pb.set_message(format!("{}/{}", m.workload_id, m.config_name));
            pb.inc(1);
        });

        let fault = match result {
            Ok(_) => {
                pb.finish_with_message("Complete");
                None
            }
            Err(SuiteError::Subject(e)) => {
                pb.abandon_with_message("Aborted");
                tracing::error!(error = %e, "suite aborted by subject fault");
                Some(e)
            }
            Err(e) => return Err(e.into()),
        };

        if !self.config.keep_fixtures {
            fixtures.remove_all().context("failed to remove fixtures")?;
        }

        let workloads = suite.workloads().to_vec();
        Ok(SuiteRun {
            workloads,
            measurements: suite.into_measurements(),
            duration_ms: timer.elapsed_millis(),
            fault,
        })
    }

    fn progress_bar(&self, len: u64) -> ProgressBar {
        if !self.config.show_progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(len);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        pb
    }
}
