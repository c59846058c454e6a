//! Subject Runners
//!
//! A subject is the thing being benchmarked. The suite drives it through the
//! [`SubjectRunner`] trait and never learns whether a trial spawned a child
//! process or looped over a closure.

use crate::suite::Configuration;
use crate::workload::Workload;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised by subject runners.
///
/// Trial-level failures of an external subject are NOT errors: they come back
/// as a [`TrialOutcome`] with `succeeded == false`.
#[derive(Debug, Error)]
pub enum SubjectError {
    /// Nothing exists at the subject path
    #[error("subject executable not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The subject path exists but cannot be executed
    #[error("subject is not an executable file: {}", .0.display())]
    NotExecutable(PathBuf),

    /// An in-process callable returned an error mid-loop
    #[error("in-process callable failed: {0}")]
    CallableFault(String),
}

/// One cell of the benchmark matrix handed to a runner
#[derive(Debug, Clone, Copy)]
pub struct Trial<'a> {
    /// Generated input for this trial
    pub workload: &'a Workload,
    /// Invocation variant for this trial
    pub configuration: &'a Configuration,
    /// Persisted fixture for `workload`, when one was written
    pub fixture: Option<&'a Path>,
}

/// Observed result of a single trial
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrialOutcome {
    /// Wall time of the trial; meaningless when `succeeded` is false
    pub elapsed_millis: f64,
    /// Whether the subject reported success
    pub succeeded: bool,
}

impl TrialOutcome {
    /// Successful trial that took `elapsed_millis`
    pub fn success(elapsed_millis: f64) -> Self {
        Self {
            elapsed_millis,
            succeeded: true,
        }
    }

    /// Failed trial
    pub fn failure(elapsed_millis: f64) -> Self {
        Self {
            elapsed_millis,
            succeeded: false,
        }
    }
}

/// Capability to execute one timed trial.
///
/// Returning `Err` is fatal to the whole suite run; recoverable failures are
/// reported through [`TrialOutcome::failure`].
pub trait SubjectRunner {
    /// Short description used in logs
    fn describe(&self) -> String;

    /// Execute one trial and report its timing
    fn run_trial(&mut self, trial: &Trial<'_>) -> Result<TrialOutcome, SubjectError>;
}

impl<R: SubjectRunner + ?Sized> SubjectRunner for &mut R {
    fn describe(&self) -> String {
        (**self).describe()
    }

    fn run_trial(&mut self, trial: &Trial<'_>) -> Result<TrialOutcome, SubjectError> {
        (**self).run_trial(trial)
    }
}

impl<R: SubjectRunner + ?Sized> SubjectRunner for Box<R> {
    fn describe(&self) -> String {
        (**self).describe()
    }

    fn run_trial(&mut self, trial: &Trial<'_>) -> Result<TrialOutcome, SubjectError> {
        (**self).run_trial(trial)
    }
}
