//! In-Process Callables
//!
//! Times a closure over many iterations inside ONE timer window; per-call
//! timing would be dominated by timer overhead for the short kernels this is
//! meant for. The result measures aggregate throughput, not single-call
//! latency.
//!
//! Every value the closure returns passes through [`std::hint::black_box`],
//! and the last one is carried out of the timed region in [`Timed::output`]
//! so callers can assert on it after the loop. A result that only depends on
//! constants can still be hoisted out of the loop; kernels with fixed inputs
//! go through [`InProcessRunner::run_with`], which hides the input behind
//! `black_box` on every call.

use crate::measure::Timer;
use crate::subject::{SubjectError, SubjectRunner, Trial, TrialOutcome};
use crate::suite::Configuration;
use crate::workload::Workload;
use std::hint::black_box;

/// Result of a timed loop
#[derive(Debug, Clone, PartialEq)]
pub struct Timed<T> {
    /// Wall time of the whole loop
    pub elapsed_millis: f64,
    /// Number of calls made
    pub iterations: u64,
    /// Value returned by the final call (`None` when `iterations == 0`)
    pub output: Option<T>,
}

impl<T> Timed<T> {
    /// Calls per millisecond, `None` for an empty or instantaneous loop
    pub fn ops_per_milli(&self) -> Option<f64> {
        (self.iterations > 0 && self.elapsed_millis > 0.0)
            .then(|| self.iterations as f64 / self.elapsed_millis)
    }
}

/// Runs closures a fixed number of times under a single timer
#[derive(Debug, Clone, Copy)]
pub struct InProcessRunner {
    iterations: u64,
}

impl InProcessRunner {
    /// Runner that calls each closure `iterations` times
    pub fn new(iterations: u64) -> Self {
        Self { iterations }
    }

    /// Configured call count
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Call `f` exactly `iterations` times inside one timed interval
    #[inline]
    pub fn run<T, F>(&self, mut f: F) -> Timed<T>
    where
        F: FnMut() -> T,
    {
        let mut output = None;

        let timer = Timer::start();
        for _ in 0..self.iterations {
            output = Some(black_box(f()));
        }
        let elapsed_millis = timer.elapsed_millis();

        Timed {
            elapsed_millis,
            iterations: self.iterations,
            output,
        }
    }

    /// Call `f(input)` exactly `iterations` times inside one timed interval.
    ///
    /// The input is opaque to the optimizer on each call, so the work cannot
    /// be computed once and reused across iterations.
    #[inline]
    pub fn run_with<I, T, F>(&self, input: &I, mut f: F) -> Timed<T>
    where
        I: ?Sized,
        F: FnMut(&I) -> T,
    {
        self.run(|| f(black_box(input)))
    }

    /// Like [`run`](Self::run) for fallible closures.
    ///
    /// The first error stops the loop; the partial timing is discarded and the
    /// error surfaces as [`SubjectError::CallableFault`].
    #[inline]
    pub fn try_run<T, E, F>(&self, mut f: F) -> Result<Timed<T>, SubjectError>
    where
        F: FnMut() -> Result<T, E>,
        E: std::fmt::Display,
    {
        let mut output = None;

        let timer = Timer::start();
        for i in 0..self.iterations {
            match f() {
                Ok(value) => output = Some(black_box(value)),
                Err(e) => {
                    return Err(SubjectError::CallableFault(format!(
                        "iteration {}: {}",
                        i, e
                    )));
                }
            }
        }
        let elapsed_millis = timer.elapsed_millis();

        Ok(Timed {
            elapsed_millis,
            iterations: self.iterations,
            output,
        })
    }
}

/// Suite subject backed by a Rust closure.
///
/// Each trial calls the closure `iterations` times with the trial's workload
/// and configuration. A closure error is fatal to the run.
pub struct CallableSubject<F> {
    name: String,
    runner: InProcessRunner,
    callable: F,
}

impl<F, T, E> CallableSubject<F>
where
    F: FnMut(&Workload, &Configuration) -> Result<T, E>,
    E: std::fmt::Display,
{
    /// Wrap `callable`, running it `iterations` times per trial
    pub fn new(name: impl Into<String>, iterations: u64, callable: F) -> Self {
        Self {
            name: name.into(),
            runner: InProcessRunner::new(iterations),
            callable,
        }
    }
}

impl<F, T, E> SubjectRunner for CallableSubject<F>
where
    F: FnMut(&Workload, &Configuration) -> Result<T, E>,
    E: std::fmt::Display,
{
    fn describe(&self) -> String {
        format!("{} (in-process, {} iterations)", self.name, self.runner.iterations())
    }

    fn run_trial(&mut self, trial: &Trial<'_>) -> Result<TrialOutcome, SubjectError> {
        let callable = &mut self.callable;
        let timed = self
            .runner
            .try_run(|| callable(trial.workload, trial.configuration))?;
        Ok(TrialOutcome::success(timed.elapsed_millis))
    }
}
