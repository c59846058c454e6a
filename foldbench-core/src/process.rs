//! External Process Subject
//!
//! Runs the subject as a child process:
//!
//! ```text
//! <executable> <configuration flags...> <fixture path>
//! ```
//!
//! stdin is closed and stdout/stderr are discarded; only the exit status and
//! the wall time between spawn and wait are observed. There is no timeout: a
//! hung subject blocks the run.

use crate::measure::Timer;
use crate::subject::{SubjectError, SubjectRunner, Trial, TrialOutcome};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// A located, executable subject binary
#[derive(Debug, Clone)]
pub struct ExternalSubject {
    executable: PathBuf,
}

impl ExternalSubject {
    /// Resolve and validate the subject executable.
    ///
    /// A bare name (no path separator) that does not exist relative to the
    /// working directory is searched on `PATH`.
    pub fn locate(path: impl AsRef<Path>) -> Result<Self, SubjectError> {
        let path = path.as_ref();
        let resolved = if path.exists() || path.components().count() > 1 {
            path.to_path_buf()
        } else {
            search_path(path.as_os_str()).unwrap_or_else(|| path.to_path_buf())
        };

        if !resolved.exists() {
            return Err(SubjectError::NotFound(resolved));
        }
        if !is_executable(&resolved) {
            return Err(SubjectError::NotExecutable(resolved));
        }

        Ok(Self {
            executable: resolved,
        })
    }

    /// Path of the executable that will be spawned
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Build the command for one invocation
    fn command<'a>(&self, args: impl IntoIterator<Item = &'a str>, input: &Path) -> Command {
        let mut command = Command::new(&self.executable);
        command
            .args(args)
            .arg(input)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        command
    }

    /// Run the subject once against `input` and time it
    pub fn run<'a>(&self, args: impl IntoIterator<Item = &'a str>, input: &Path) -> TrialOutcome {
        let mut command = self.command(args, input);

        let timer = Timer::start();
        let status = command.status();
        let elapsed_millis = timer.elapsed_millis();

        match status {
            Ok(status) if status.success() => TrialOutcome::success(elapsed_millis),
            Ok(status) => {
                tracing::warn!(
                    input = %input.display(),
                    %status,
                    "subject execution failed"
                );
                TrialOutcome::failure(elapsed_millis)
            }
            Err(e) => {
                tracing::warn!(
                    input = %input.display(),
                    error = %e,
                    "failed to launch subject"
                );
                TrialOutcome::failure(elapsed_millis)
            }
        }
    }
}

impl SubjectRunner for ExternalSubject {
    fn describe(&self) -> String {
        self.executable.display().to_string()
    }

    fn run_trial(&mut self, trial: &Trial<'_>) -> Result<TrialOutcome, SubjectError> {
        let Some(fixture) = trial.fixture else {
            tracing::warn!(
                workload = trial.workload.id(),
                "no fixture written for workload"
            );
            return Ok(TrialOutcome::failure(0.0));
        };

        Ok(self.run(trial.configuration.arguments(), fixture))
    }
}

fn search_path(name: &OsStr) -> Option<PathBuf> {
    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths)
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file() && is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
