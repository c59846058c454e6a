//! Benchmark Suite
//!
//! Drives a subject over a Workload x Configuration matrix.
//!
//! ```text
//!   Idle ──run()──▶ Running ──all cells done──▶ Complete
//! ```
//!
//! Iteration order is part of the contract: workloads ascending by size on the
//! outside, configurations in declaration order on the inside. Every cell gets
//! exactly one trial and exactly one [`Measurement`]; failed trials are
//! recorded, never retried.

use crate::subject::{SubjectError, SubjectRunner, Trial};
use crate::workload::Workload;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A named variant of subject invocation flags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    /// Name used for grouping and reporting
    pub name: String,
    /// Flags passed verbatim (split on whitespace) before the input path
    #[serde(default)]
    pub args: String,
}

impl Configuration {
    /// Create a configuration
    pub fn new(name: impl Into<String>, args: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: args.into(),
        }
    }

    /// The argument string split into process arguments
    pub fn arguments(&self) -> impl Iterator<Item = &str> {
        self.args.split_whitespace()
    }
}

/// Recorded outcome of one trial
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Workload the trial ran against
    pub workload_id: String,
    /// Symbol count of that workload
    pub workload_size: usize,
    /// Configuration the trial ran under
    pub config_name: String,
    /// Wall time; not meaningful when `succeeded` is false
    pub elapsed_millis: f64,
    /// Whether the subject reported success
    pub succeeded: bool,
}

/// Lifecycle of a suite
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuiteState {
    /// Matrix declared, nothing executed
    Idle,
    /// Trials in progress
    Running,
    /// All cells executed (or the run aborted on a fatal error)
    Complete,
}

/// Errors from building or running a suite
#[derive(Debug, Error)]
pub enum SuiteError {
    /// The configuration list was empty
    #[error("suite has no configurations")]
    NoConfigurations,

    /// Two configurations share a name
    #[error("duplicate configuration name: {0}")]
    DuplicateConfiguration(String),

    /// Two workloads share an id
    #[error("duplicate workload id: {0}")]
    DuplicateWorkload(String),

    /// `run` was called on a suite that is not idle
    #[error("suite has already been run")]
    AlreadyRun,

    /// The subject failed in a way that cannot be recorded as a trial
    #[error("subject error: {0}")]
    Subject(#[from] SubjectError),
}

/// Fixture files written for a set of workloads, keyed by workload id
#[derive(Debug, Clone, Default)]
pub struct FixtureSet {
    paths: HashMap<String, PathBuf>,
}

impl FixtureSet {
    /// No fixtures (in-process subjects)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Write every workload into `dir` and remember the paths
    pub fn write_all<'a>(
        dir: impl AsRef<Path>,
        workloads: impl IntoIterator<Item = &'a Workload>,
    ) -> io::Result<Self> {
        let dir = dir.as_ref();
        let mut paths = HashMap::new();
        for workload in workloads {
            let path = workload.write_fixture(dir)?;
            tracing::debug!(path = %path.display(), size = workload.size(), "fixture written");
            paths.insert(workload.id().to_string(), path);
        }
        Ok(Self { paths })
    }

    /// Path written for `workload_id`
    pub fn get(&self, workload_id: &str) -> Option<&Path> {
        self.paths.get(workload_id).map(PathBuf::as_path)
    }

    /// Number of fixtures
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether no fixture was written
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Delete every fixture file, ignoring files that are already gone
    pub fn remove_all(&self) -> io::Result<()> {
        for path in self.paths.values() {
            match std::fs::remove_file(path) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}

/// A declared benchmark matrix and, once run, its measurements
#[derive(Debug)]
pub struct BenchmarkSuite {
    workloads: Vec<Workload>,
    configurations: Vec<Configuration>,
    measurements: Vec<Measurement>,
    state: SuiteState,
}

impl BenchmarkSuite {
    /// Declare a suite.
    ///
    /// Workloads are reordered ascending by size (stable); configurations keep
    /// their declaration order. Configuration names and workload ids must be
    /// unique.
    pub fn new(
        mut workloads: Vec<Workload>,
        configurations: Vec<Configuration>,
    ) -> Result<Self, SuiteError> {
        if configurations.is_empty() {
            return Err(SuiteError::NoConfigurations);
        }

        let mut names = HashSet::new();
        for config in &configurations {
            if !names.insert(config.name.as_str()) {
                return Err(SuiteError::DuplicateConfiguration(config.name.clone()));
            }
        }

        let mut ids = HashSet::new();
        for workload in &workloads {
            if !ids.insert(workload.id()) {
                return Err(SuiteError::DuplicateWorkload(workload.id().to_string()));
            }
        }

        workloads.sort_by_key(Workload::size);

        Ok(Self {
            measurements: Vec::with_capacity(workloads.len() * configurations.len()),
            workloads,
            configurations,
            state: SuiteState::Idle,
        })
    }

    /// Current lifecycle state
    pub fn state(&self) -> SuiteState {
        self.state
    }

    /// Workloads in execution order
    pub fn workloads(&self) -> &[Workload] {
        &self.workloads
    }

    /// Configurations in declaration order
    pub fn configurations(&self) -> &[Configuration] {
        &self.configurations
    }

    /// Number of trials a full run performs
    pub fn trial_count(&self) -> usize {
        self.workloads.len() * self.configurations.len()
    }

    /// Measurements recorded so far, in execution order
    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    /// Consume the suite, keeping its measurements
    pub fn into_measurements(self) -> Vec<Measurement> {
        self.measurements
    }

    /// Execute every cell once.
    ///
    /// `on_measurement` observes each measurement as soon as it is recorded.
    /// A fatal [`SubjectError`] stops the run; measurements recorded before it
    /// stay available through [`measurements`](Self::measurements).
    pub fn run<R, F>(
        &mut self,
        runner: &mut R,
        fixtures: &FixtureSet,
        mut on_measurement: F,
    ) -> Result<&[Measurement], SuiteError>
    where
        R: SubjectRunner + ?Sized,
        F: FnMut(&Measurement),
    {
        if self.state != SuiteState::Idle {
            return Err(SuiteError::AlreadyRun);
        }
        self.state = SuiteState::Running;

        tracing::info!(
            subject = %runner.describe(),
            workloads = self.workloads.len(),
            configurations = self.configurations.len(),
            "starting suite"
        );

        let result = self.run_cells(runner, fixtures, &mut on_measurement);
        self.state = SuiteState::Complete;
        result?;

        let failed = self.measurements.iter().filter(|m| !m.succeeded).count();
        tracing::info!(
            trials = self.measurements.len(),
            failed,
            "suite complete"
        );

        Ok(&self.measurements)
    }

    fn run_cells<R, F>(
        &mut self,
        runner: &mut R,
        fixtures: &FixtureSet,
        on_measurement: &mut F,
    ) -> Result<(), SuiteError>
    where
        R: SubjectRunner + ?Sized,
        F: FnMut(&Measurement),
    {
        for workload in &self.workloads {
            for configuration in &self.configurations {
                let trial = Trial {
                    workload,
                    configuration,
                    fixture: fixtures.get(workload.id()),
                };

                let outcome = runner.run_trial(&trial)?;
                tracing::debug!(
                    workload = workload.id(),
                    config = %configuration.name,
                    elapsed_ms = outcome.elapsed_millis,
                    succeeded = outcome.succeeded,
                    "trial finished"
                );

                let measurement = Measurement {
                    workload_id: workload.id().to_string(),
                    workload_size: workload.size(),
                    config_name: configuration.name.clone(),
                    elapsed_millis: outcome.elapsed_millis,
                    succeeded: outcome.succeeded,
                };
                on_measurement(&measurement);
                self.measurements.push(measurement);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subject::TrialOutcome;
    use crate::workload::WorkloadGenerator;

    /// Scripted runner: fails the listed (workload size, config) cells
    struct ScriptedRunner {
        fail: Vec<(usize, &'static str)>,
        fatal_at: Option<usize>,
        calls: usize,
    }

    impl ScriptedRunner {
        fn ok() -> Self {
            Self {
                fail: Vec::new(),
                fatal_at: None,
                calls: 0,
            }
        }
    }

    impl SubjectRunner for ScriptedRunner {
        fn describe(&self) -> String {
            "scripted".to_string()
        }

        fn run_trial(&mut self, trial: &Trial<'_>) -> Result<TrialOutcome, SubjectError> {
            self.calls += 1;
            if self.fatal_at == Some(self.calls) {
                return Err(SubjectError::CallableFault("scripted fault".to_string()));
            }
            let key = (trial.workload.size(), trial.configuration.name.as_str());
            let elapsed = trial.workload.size() as f64;
            if self.fail.iter().any(|&(s, c)| (s, c) == key) {
                Ok(TrialOutcome::failure(elapsed))
            } else {
                Ok(TrialOutcome::success(elapsed))
            }
        }
    }

    fn configs() -> Vec<Configuration> {
        vec![
            Configuration::new("default", ""),
            Configuration::new("window_20", "-w 20"),
            Configuration::new("reverse_opt", "-r"),
        ]
    }

    #[test]
    fn test_configuration_arguments() {
        let config = Configuration::new("exclude", "  -e GUA,GUC,CUG  -r ");
        let args: Vec<_> = config.arguments().collect();
        assert_eq!(args, ["-e", "GUA,GUC,CUG", "-r"]);
        assert_eq!(Configuration::new("default", "").arguments().count(), 0);
    }

    #[test]
    fn test_matrix_order_and_completeness() {
        let workloads = WorkloadGenerator::new(1).generate_batch(&[50, 10, 25]);
        let mut suite = BenchmarkSuite::new(workloads, configs()).unwrap();
        assert_eq!(suite.state(), SuiteState::Idle);

        let mut runner = ScriptedRunner::ok();
        let mut observed = Vec::new();
        let measurements = suite
            .run(&mut runner, &FixtureSet::empty(), |m| {
                observed.push((m.workload_size, m.config_name.clone()))
            })
            .unwrap();

        assert_eq!(measurements.len(), 9);
        let order: Vec<_> = measurements
            .iter()
            .map(|m| (m.workload_size, m.config_name.as_str()))
            .collect();
        assert_eq!(
            order,
            [
                (10, "default"),
                (10, "window_20"),
                (10, "reverse_opt"),
                (25, "default"),
                (25, "window_20"),
                (25, "reverse_opt"),
                (50, "default"),
                (50, "window_20"),
                (50, "reverse_opt"),
            ]
        );
        assert_eq!(observed.len(), 9);
        assert_eq!(suite.state(), SuiteState::Complete);
        assert_eq!(runner.calls, 9);
    }

    #[test]
    fn test_failure_is_isolated() {
        let workloads = WorkloadGenerator::new(1).generate_batch(&[10, 25, 50]);
        let mut suite = BenchmarkSuite::new(workloads, configs()).unwrap();
        let mut runner = ScriptedRunner {
            fail: vec![(25, "window_20")],
            ..ScriptedRunner::ok()
        };

        let measurements = suite.run(&mut runner, &FixtureSet::empty(), |_| {}).unwrap();

        assert_eq!(measurements.len(), 9);
        let failed: Vec<_> = measurements.iter().filter(|m| !m.succeeded).collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].workload_id, "test_25");
        assert_eq!(failed[0].config_name, "window_20");
        // Everything else keeps its own timing
        for m in measurements.iter().filter(|m| m.succeeded) {
            assert_eq!(m.elapsed_millis, m.workload_size as f64);
        }
    }

    #[test]
    fn test_fatal_error_aborts_run() {
        let workloads = WorkloadGenerator::new(1).generate_batch(&[10, 25]);
        let mut suite = BenchmarkSuite::new(workloads, configs()).unwrap();
        let mut runner = ScriptedRunner {
            fatal_at: Some(4),
            ..ScriptedRunner::ok()
        };

        let err = suite
            .run(&mut runner, &FixtureSet::empty(), |_| {})
            .unwrap_err();
        assert!(matches!(err, SuiteError::Subject(SubjectError::CallableFault(_))));
        assert_eq!(suite.measurements().len(), 3);
        assert_eq!(suite.state(), SuiteState::Complete);
    }

    #[test]
    fn test_run_twice_is_rejected() {
        let workloads = WorkloadGenerator::new(1).generate_batch(&[10]);
        let mut suite = BenchmarkSuite::new(workloads, configs()).unwrap();
        let mut runner = ScriptedRunner::ok();
        suite.run(&mut runner, &FixtureSet::empty(), |_| {}).unwrap();

        assert!(matches!(
            suite.run(&mut runner, &FixtureSet::empty(), |_| {}),
            Err(SuiteError::AlreadyRun)
        ));
        assert_eq!(suite.into_measurements().len(), 3);
    }

    #[test]
    fn test_rejects_bad_declarations() {
        let workloads = WorkloadGenerator::new(1).generate_batch(&[10]);
        assert!(matches!(
            BenchmarkSuite::new(workloads.clone(), Vec::new()),
            Err(SuiteError::NoConfigurations)
        ));

        let dup = vec![Configuration::new("a", ""), Configuration::new("a", "-r")];
        assert!(matches!(
            BenchmarkSuite::new(workloads, dup),
            Err(SuiteError::DuplicateConfiguration(name)) if name == "a"
        ));

        let twins = WorkloadGenerator::new(1).generate_batch(&[10, 10]);
        assert!(matches!(
            BenchmarkSuite::new(twins, configs()),
            Err(SuiteError::DuplicateWorkload(_))
        ));
    }

    #[test]
    fn test_empty_workload_list() {
        let mut suite = BenchmarkSuite::new(Vec::new(), configs()).unwrap();
        let measurements = suite
            .run(&mut ScriptedRunner::ok(), &FixtureSet::empty(), |_| {})
            .unwrap();
        assert!(measurements.is_empty());
        assert_eq!(suite.state(), SuiteState::Complete);
    }

    #[test]
    fn test_fixture_set_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let workloads = WorkloadGenerator::new(1).generate_batch(&[10, 25]);
        let fixtures = FixtureSet::write_all(dir.path(), &workloads).unwrap();

        assert_eq!(fixtures.len(), 2);
        let path = fixtures.get("test_25").unwrap();
        assert!(path.exists());
        assert!(fixtures.get("test_99").is_none());

        fixtures.remove_all().unwrap();
        assert!(!path.exists());
        // Second removal is a no-op
        fixtures.remove_all().unwrap();
    }
}
