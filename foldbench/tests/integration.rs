//! Integration tests for FoldBench
//!
//! These tests verify the end-to-end behavior of the harness: generated
//! fixtures, a real child process per trial, aggregation and reporting.

use foldbench::{
    BenchmarkSuite, CallableSubject, Configuration, FixtureSet, SubjectError, SubjectRunner,
    SuiteError, SuiteState, Trial, TrialOutcome, Workload, WorkloadGenerator, aggregate, compare,
};
use foldbench_cli::{ExecutionConfig, ExecutionPlan, Executor, build_report};

fn matrix_plan() -> ExecutionPlan {
    ExecutionPlan {
        sizes: vec![10, 25, 50],
        configurations: vec![
            Configuration::new("default", ""),
            Configuration::new("windowed", "-w 20"),
        ],
        seed: 42,
    }
}

fn quiet_executor(fixture_dir: &std::path::Path) -> Executor {
    Executor::new(ExecutionConfig {
        fixture_dir: Some(fixture_dir.to_path_buf()),
        keep_fixtures: true,
        show_progress: false,
    })
}

#[cfg(unix)]
mod stub {
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};

    /// Write an executable `sh` script into `dir`
    pub fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }
}

/// Sleeping stub: every trial succeeds and takes at least 5ms
#[cfg(unix)]
#[test]
fn test_end_to_end_sleeping_stub() {
    let dir = tempfile::tempdir().unwrap();
    let script = stub::script(dir.path(), "sleepy", "sleep 0.005\nexit 0");
    let mut subject = foldbench::ExternalSubject::locate(&script).unwrap();

    let plan = matrix_plan();
    let run = quiet_executor(&dir.path().join("fixtures"))
        .execute(&mut subject, &plan)
        .unwrap();

    assert_eq!(run.measurements.len(), 6);
    assert!(run.fault.is_none());
    for m in &run.measurements {
        assert!(m.succeeded, "{}/{} failed", m.workload_id, m.config_name);
        // Spawn overhead is included, but nothing near a second
        assert!(
            (5.0..1000.0).contains(&m.elapsed_millis),
            "{}/{} took {}ms",
            m.workload_id,
            m.config_name,
            m.elapsed_millis
        );
    }

    let stats = aggregate(&run.measurements);
    assert_eq!(stats["default"].count, 3);
    assert_eq!(stats["windowed"].count, 3);

    let comparison = compare(&stats, "default", "windowed").unwrap();
    assert!(comparison.improvement_percent.is_finite());

    let report = build_report("sleepy", &plan, &run, Some(("default", "windowed")));
    assert_eq!(report.summary.failed, 0);
    assert!(report.comparison.unwrap().result.is_some());
}

/// Subject that reports the same time for every trial
struct FixedTime(f64);

impl SubjectRunner for FixedTime {
    fn describe(&self) -> String {
        format!("fixed {}ms", self.0)
    }

    fn run_trial(&mut self, _trial: &Trial<'_>) -> Result<TrialOutcome, SubjectError> {
        Ok(TrialOutcome::success(self.0))
    }
}

/// Configurations that take equal time compare at exactly 0%
#[test]
fn test_equal_timings_compare_at_zero() {
    let plan = matrix_plan();
    let run = Executor::new(ExecutionConfig {
        fixture_dir: None,
        keep_fixtures: true,
        show_progress: false,
    })
    .execute(&mut FixedTime(5.0), &plan)
    .unwrap();

    assert_eq!(run.measurements.len(), 6);
    assert!(run.measurements.iter().all(|m| m.elapsed_millis == 5.0));

    let stats = aggregate(&run.measurements);
    assert_eq!(stats["default"].mean, 5.0);
    let comparison = compare(&stats, "default", "windowed").unwrap();
    assert_eq!(comparison.improvement_percent, 0.0);
    assert_eq!(comparison.speedup(), Some(1.0));
}

/// Failing stub: trials on the size-50 fixture exit 1, the rest succeed
#[cfg(unix)]
#[test]
fn test_failing_subject_is_isolated() {
    let dir = tempfile::tempdir().unwrap();
    let script = stub::script(
        dir.path(),
        "picky",
        "for last; do :; done\ncase \"$last\" in\n  *_50.faa) exit 1 ;;\nesac\nexit 0",
    );
    let mut subject = foldbench::ExternalSubject::locate(&script).unwrap();

    let plan = matrix_plan();
    let run = quiet_executor(&dir.path().join("fixtures"))
        .execute(&mut subject, &plan)
        .unwrap();

    assert_eq!(run.measurements.len(), 6);
    let failed: Vec<_> = run
        .measurements
        .iter()
        .filter(|m| !m.succeeded)
        .map(|m| (m.workload_size, m.config_name.as_str()))
        .collect();
    assert_eq!(failed, [(50, "default"), (50, "windowed")]);

    let stats = aggregate(&run.measurements);
    assert_eq!(stats["default"].count, 2);
    assert_eq!(stats["windowed"].count, 2);

    let report = build_report("picky", &plan, &run, Some(("default", "windowed")));
    assert_eq!(report.results.len(), 6);
    assert_eq!(report.summary.failed, 2);
    assert_eq!(report.configurations[0].attempted, 3);
}

/// Arguments reach the subject as `<flags...> <fixture>` in matrix order
#[cfg(unix)]
#[test]
fn test_invocation_order_and_arguments() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("calls.log");
    let script = stub::script(
        dir.path(),
        "recorder",
        &format!("echo \"$@\" >> '{}'\nexit 0", log.display()),
    );
    let mut subject = foldbench::ExternalSubject::locate(&script).unwrap();

    let fixture_dir = dir.path().join("fixtures");
    quiet_executor(&fixture_dir)
        .execute(&mut subject, &matrix_plan())
        .unwrap();

    let calls = std::fs::read_to_string(&log).unwrap();
    let expected: Vec<String> = [10, 25, 50]
        .iter()
        .flat_map(|size| {
            let fixture = fixture_dir.join(format!("test_{}.faa", size));
            [
                format!("{}", fixture.display()),
                format!("-w 20 {}", fixture.display()),
            ]
        })
        .collect();
    assert_eq!(calls.lines().collect::<Vec<_>>(), expected);
}

/// Full CLI run against a stub, rendered as JSON to a file
#[cfg(unix)]
#[test]
fn test_cli_run_writes_json_report() {
    use clap::Parser;

    let dir = tempfile::tempdir().unwrap();
    let script = stub::script(dir.path(), "ok", "exit 0");
    let config_path = dir.path().join("foldbench.toml");
    std::fs::write(
        &config_path,
        format!(
            r#"
[subject]
path = "{}"

[workloads]
sizes = [25, 10]
fixture_dir = "{}"

[[configurations]]
name = "old"

[[configurations]]
name = "new"
args = "-r"
"#,
            script.display(),
            dir.path().join("fixtures").display()
        ),
    )
    .unwrap();
    let output = dir.path().join("report.json");

    let cli = foldbench_cli::Cli::parse_from([
        "foldbench",
        "run",
        "--config",
        config_path.to_str().unwrap(),
        "--format",
        "json",
        "--output",
        output.to_str().unwrap(),
        "--no-progress",
    ]);
    assert_eq!(foldbench_cli::run_with_cli(cli).unwrap(), 0);

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(json["meta"]["seed"], 42);
    assert_eq!(json["meta"]["sizes"], serde_json::json!([10, 25]));
    assert_eq!(json["results"].as_array().unwrap().len(), 4);
    assert_eq!(json["results"][0]["fixture"], "test_10.faa");
    assert_eq!(json["results"][0]["status"], "ok");
    assert_eq!(json["comparison"]["baseline"], "old");
    assert_eq!(json["comparison"]["candidate"], "new");
    assert!(dir.path().join("fixtures").join("test_25.faa").exists());
}

/// Write a two-configuration config for `script` and return its path
#[cfg(unix)]
fn write_config(dir: &std::path::Path, script: &std::path::Path) -> std::path::PathBuf {
    let config_path = dir.join("foldbench.toml");
    std::fs::write(
        &config_path,
        format!(
            r#"
[subject]
path = "{}"

[workloads]
sizes = [10, 25, 50]
fixture_dir = "{}"

[[configurations]]
name = "default"

[[configurations]]
name = "windowed"
args = "-w 20"
"#,
            script.display(),
            dir.join("fixtures").display()
        ),
    )
    .unwrap();
    config_path
}

/// Failed trials are reported, not fatal: the run still exits 0
#[cfg(unix)]
#[test]
fn test_cli_failed_trials_exit_zero() {
    use clap::Parser;

    let dir = tempfile::tempdir().unwrap();
    let script = stub::script(
        dir.path(),
        "picky",
        "for last; do :; done\ncase \"$last\" in\n  *_50.faa) exit 1 ;;\nesac\nexit 0",
    );
    let config_path = write_config(dir.path(), &script);

    let run_as = |format: &str, output: &std::path::Path| {
        let cli = foldbench_cli::Cli::parse_from([
            "foldbench",
            "run",
            "--config",
            config_path.to_str().unwrap(),
            "--format",
            format,
            "--output",
            output.to_str().unwrap(),
            "--no-progress",
        ]);
        foldbench_cli::run_with_cli(cli).unwrap()
    };

    let human = dir.path().join("report.txt");
    assert_eq!(run_as("human", &human), 0);
    let text = std::fs::read_to_string(&human).unwrap();
    assert_eq!(text.matches("FAILED").count(), 2);
    let default_block = text.split("\ndefault:\n").nth(1).unwrap();
    assert!(default_block.contains("Trials:  2 of 3"));

    let json_path = dir.path().join("report.json");
    assert_eq!(run_as("json", &json_path), 0);
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    let failed: Vec<_> = json["results"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|row| row["status"] == "failed")
        .map(|row| (row["workload_size"].clone(), row["configuration"].clone()))
        .collect();
    assert_eq!(
        failed,
        [
            (serde_json::json!(50), serde_json::json!("default")),
            (serde_json::json!(50), serde_json::json!("windowed")),
        ]
    );
    assert_eq!(json["summary"]["failed"], 2);
    assert_eq!(json["configurations"][0]["name"], "default");
    assert_eq!(json["configurations"][0]["stats"]["count"], 2);
    assert_eq!(json["configurations"][0]["attempted"], 3);
}

/// Same seed, same fixtures on disk
#[test]
fn test_fixtures_are_reproducible() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();

    for dir in [first.path(), second.path()] {
        let workloads = WorkloadGenerator::new(42).generate_batch(&[10, 100]);
        FixtureSet::write_all(dir, &workloads).unwrap();
    }

    for name in ["test_10.faa", "test_100.faa"] {
        let a = std::fs::read(first.path().join(name)).unwrap();
        let b = std::fs::read(second.path().join(name)).unwrap();
        assert_eq!(a, b);
    }

    let contents = std::fs::read_to_string(first.path().join("test_10.faa")).unwrap();
    let (label, payload) = contents.split_once('\n').unwrap();
    assert_eq!(label, ">10_test_sequence");
    assert_eq!(payload.len(), 10);
}

/// In-process subject over the full matrix
#[test]
fn test_callable_subject_matrix() {
    let workloads = WorkloadGenerator::new(7).generate_batch(&[50, 10]);
    let configurations = vec![
        Configuration::new("count", ""),
        Configuration::new("count_again", ""),
    ];
    let mut suite = BenchmarkSuite::new(workloads, configurations).unwrap();
    let mut subject = CallableSubject::new("counter", 100, |w: &Workload, _: &Configuration| {
        Ok::<_, String>(w.payload().bytes().filter(|&b| b == b'A').count())
    });

    let measurements = suite
        .run(&mut subject, &FixtureSet::empty(), |_| {})
        .unwrap()
        .to_vec();

    assert_eq!(suite.state(), SuiteState::Complete);
    assert_eq!(measurements.len(), 4);
    assert_eq!(measurements[0].workload_size, 10);
    assert!(measurements.iter().all(|m| m.succeeded));
}

/// A callable error stops the run and surfaces as a subject error
#[test]
fn test_callable_fault_propagates() {
    let workloads = WorkloadGenerator::new(7).generate_batch(&[10, 25]);
    let mut suite =
        BenchmarkSuite::new(workloads, vec![Configuration::new("default", "")]).unwrap();
    let mut subject = CallableSubject::new("fragile", 3, |w: &Workload, _: &Configuration| {
        if w.size() > 10 {
            Err(format!("cannot fold {} symbols", w.size()))
        } else {
            Ok(())
        }
    });

    let err = suite
        .run(&mut subject, &FixtureSet::empty(), |_| {})
        .unwrap_err();

    assert!(matches!(
        err,
        SuiteError::Subject(SubjectError::CallableFault(ref msg)) if msg.contains("cannot fold 25")
    ));
    assert_eq!(suite.measurements().len(), 1);
}
