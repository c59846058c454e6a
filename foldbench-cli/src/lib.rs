#![warn(missing_docs)]
//! FoldBench CLI Library
//!
//! This module provides the CLI driving the whole pipeline: locate the
//! subject, generate fixtures, run the matrix, aggregate and report. Use
//! `foldbench::run()` (or `foldbench_cli::run()`) in a `main` function.
//!
//! # Example
//!
//! ```ignore
//! fn main() -> std::process::ExitCode {
//!     foldbench_cli::run()
//! }
//! ```
//!
//! # Exit codes
//!
//! - `0`: the run completed (individual trials may have failed)
//! - `1`: the subject is missing or not executable, or micro-benchmark
//!   variants disagreed
//! - `2`: configuration, I/O or other setup errors

mod config;
mod executor;
mod micro;
mod planner;

pub use config::*;
pub use executor::{
    ExecutionConfig, Executor, SuiteRun, build_report, format_human_output, format_micro_output,
    generate_workloads, write_fixtures,
};
pub use micro::run_micro_suite;
pub use planner::{ExecutionPlan, build_plan};

use anyhow::Context;
use clap::{Parser, Subcommand};
use foldbench_core::{ExternalSubject, SubjectError};
use foldbench_report::{
    MicroReport, OutputFormat, Report, generate_csv_micro, generate_csv_report,
    generate_json_micro, generate_json_report,
};
use regex::Regex;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// FoldBench CLI arguments
#[derive(Parser, Debug)]
#[command(name = "foldbench")]
#[command(author, version, about = "FoldBench - old-vs-new performance harness")]
pub struct Cli {
    /// Optional subcommand (Run, List, Fixtures, Micro, Init); defaults to Run
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file (default: discover foldbench.toml upwards)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Subject executable
    #[arg(long, global = true)]
    pub subject: Option<PathBuf>,

    /// Run only configurations whose name matches this regex
    #[arg(long, global = true)]
    pub filter: Option<String>,

    /// Workload sizes, comma separated
    #[arg(long, value_delimiter = ',', global = true)]
    pub sizes: Option<Vec<usize>>,

    /// Workload generator seed
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Baseline configuration name
    #[arg(long, global = true)]
    pub baseline: Option<String>,

    /// Candidate configuration name
    #[arg(long, global = true)]
    pub candidate: Option<String>,

    /// Output format: human, json, csv
    #[arg(long, global = true)]
    pub format: Option<String>,

    /// Output file (stdout if not specified)
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Also save the report under output.directory
    #[arg(long, global = true)]
    pub save: bool,

    /// Delete fixture files after the run
    #[arg(long, global = true)]
    pub clean_fixtures: bool,

    /// Hide the progress bar
    #[arg(long, global = true)]
    pub no_progress: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the benchmark matrix (default)
    Run,
    /// Print the plan without running anything
    List,
    /// Generate fixture files only
    Fixtures {
        /// Target directory (default: workloads.fixture_dir)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// Run the in-process old-vs-new micro-benchmarks
    Micro {
        /// Iterations of each scalar kernel
        #[arg(long)]
        iterations: Option<u64>,
    },
    /// Write a default foldbench.toml
    Init {
        /// Destination (default: ./foldbench.toml)
        #[arg(long)]
        path: Option<PathBuf>,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Run the FoldBench CLI with process arguments.
/// This is the main entry point for the `foldbench` binary.
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run_with_cli(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

/// Run the FoldBench CLI with pre-parsed arguments, returning the exit code.
///
/// Errors are setup failures (exit code 2 in [`run`]); a missing subject is
/// reported here and yields exit code 1.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<u8> {
    match &cli.command {
        Some(Commands::Init { path, force }) => init_config(path.as_deref(), *force),
        Some(Commands::List) => list_plan(&cli, &resolve_config(&cli)?),
        Some(Commands::Fixtures { dir }) => {
            generate_fixtures(&cli, &resolve_config(&cli)?, dir.as_deref())
        }
        Some(Commands::Micro { iterations }) => {
            run_micro(&cli, &resolve_config(&cli)?, *iterations)
        }
        Some(Commands::Run) | None => run_suite(&cli, &resolve_config(&cli)?),
    }
}

/// Initialize tracing to stderr.
///
/// `--verbose` forces debug for foldbench crates; otherwise `RUST_LOG` wins
/// when set, falling back to info.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("foldbench=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("foldbench=info"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Layer: defaults → foldbench.toml → CLI overrides
fn resolve_config(cli: &Cli) -> anyhow::Result<FoldConfig> {
    let mut config = match &cli.config {
        Some(path) => FoldConfig::load(path)?,
        None => match FoldConfig::discover()? {
            Some((path, config)) => {
                tracing::debug!(path = %path.display(), "loaded configuration");
                config
            }
            None => FoldConfig::default(),
        },
    };

    if let Some(subject) = &cli.subject {
        config.subject.path = subject.clone();
    }
    if let Some(sizes) = &cli.sizes {
        config.workloads.sizes = sizes.clone();
    }
    if let Some(seed) = cli.seed {
        config.workloads.seed = seed;
    }
    if let Some(baseline) = &cli.baseline {
        config.comparison.baseline = Some(baseline.clone());
    }
    if let Some(candidate) = &cli.candidate {
        config.comparison.candidate = Some(candidate.clone());
    }
    if let Some(format) = &cli.format {
        config.output.format = format.clone();
    }
    if cli.clean_fixtures {
        config.workloads.keep_fixtures = false;
    }

    config.validate()?;
    Ok(config)
}

fn output_format(config: &FoldConfig) -> anyhow::Result<OutputFormat> {
    config
        .output
        .format
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))
}

fn plan_for(cli: &Cli, config: &FoldConfig) -> anyhow::Result<ExecutionPlan> {
    let filter = cli
        .filter
        .as_deref()
        .map(Regex::new)
        .transpose()
        .context("invalid --filter pattern")?;
    Ok(build_plan(config, filter.as_ref()))
}

/// Print the precondition diagnostic for a subject that cannot be run
fn report_missing_subject(error: &SubjectError) {
    eprintln!("Error: {}", error);
    eprintln!();
    eprintln!("Build the subject before benchmarking, for example:");
    eprintln!("  cd src && make");
    eprintln!("or point foldbench at an existing binary:");
    eprintln!("  foldbench --subject <path>    (or [subject] path in foldbench.toml)");
}

fn run_suite(cli: &Cli, config: &FoldConfig) -> anyhow::Result<u8> {
    // Precondition: nothing is generated or run without a subject
    let mut subject = match ExternalSubject::locate(&config.subject.path) {
        Ok(subject) => subject,
        Err(e) => {
            report_missing_subject(&e);
            return Ok(1);
        }
    };

    let format = output_format(config)?;
    let plan = plan_for(cli, config)?;
    if plan.is_empty() {
        anyhow::bail!("nothing to run: the filter matched no configurations");
    }

    eprintln!(
        "Running {} trials ({} workloads x {} configurations) against {}...\n",
        plan.trial_count(),
        plan.sizes.len(),
        plan.configurations.len(),
        subject.executable().display()
    );

    let executor = Executor::new(ExecutionConfig {
        fixture_dir: Some(config.workloads.fixture_dir.clone()),
        keep_fixtures: config.workloads.keep_fixtures,
        show_progress: !cli.no_progress,
    });
    let run = executor.execute(&mut subject, &plan)?;

    let pair = config.comparison.resolve(&plan.configurations);
    let report = build_report(
        &subject.executable().display().to_string(),
        &plan,
        &run,
        pair.as_ref().map(|(b, c)| (b.as_str(), c.as_str())),
    );

    let rendered = render_report(&report, format)?;
    emit(&rendered, cli.output.as_deref())?;
    if cli.save {
        save_report(&rendered, &config.output.directory, "report", format)?;
    }

    if let Some(fault) = run.fault {
        return Err(anyhow::Error::new(fault).context("suite aborted"));
    }

    Ok(0)
}

fn render_report(report: &Report, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Json => generate_json_report(report)?,
        OutputFormat::Csv => generate_csv_report(report),
        OutputFormat::Human => format_human_output(report),
    })
}

fn render_micro(report: &MicroReport, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Json => generate_json_micro(report)?,
        OutputFormat::Csv => generate_csv_micro(report),
        OutputFormat::Human => format_micro_output(report),
    })
}

/// Write to `--output` or stdout
fn emit(output: &str, path: Option<&Path>) -> anyhow::Result<()> {
    if let Some(path) = path {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        file.write_all(output.as_bytes())?;
        eprintln!("Report written to: {}", path.display());
    } else {
        print!("{}", output);
    }
    Ok(())
}

/// Save a rendered report as `<directory>/<stem>.<ext>`
fn save_report(
    rendered: &str,
    directory: &Path,
    stem: &str,
    format: OutputFormat,
) -> anyhow::Result<PathBuf> {
    let extension = match format {
        OutputFormat::Json => "json",
        OutputFormat::Csv => "csv",
        OutputFormat::Human => "txt",
    };
    let path = directory.join(format!("{}.{}", stem, extension));
    emit(rendered, Some(&path))?;
    Ok(path)
}

fn list_plan(cli: &Cli, config: &FoldConfig) -> anyhow::Result<u8> {
    let plan = plan_for(cli, config)?;
    let workloads = generate_workloads(&plan);

    println!("FoldBench Plan:");
    println!("├── subject: {}", config.subject.path.display());
    println!("├── workloads (seed {}):", plan.seed);
    for workload in &workloads {
        println!("│   ├── {} ({} symbols)", workload.fixture_name(), workload.size());
    }
    println!("├── configurations:");
    for configuration in &plan.configurations {
        println!("│   ├── {} \"{}\"", configuration.name, configuration.args);
    }
    match config.comparison.resolve(&plan.configurations) {
        Some((baseline, candidate)) => {
            println!("└── comparison: {} -> {}", baseline, candidate)
        }
        None => println!("└── comparison: none"),
    }
    println!("{} trials planned.", plan.trial_count());

    Ok(0)
}

fn generate_fixtures(
    cli: &Cli,
    config: &FoldConfig,
    dir: Option<&Path>,
) -> anyhow::Result<u8> {
    let plan = plan_for(cli, config)?;
    let dir = dir.unwrap_or(config.workloads.fixture_dir.as_path());

    let workloads = generate_workloads(&plan);
    let fixtures = write_fixtures(dir, &workloads)?;

    for workload in &workloads {
        if let Some(path) = fixtures.get(workload.id()) {
            println!("{}", path.display());
        }
    }
    eprintln!("{} fixtures written to {}", fixtures.len(), dir.display());

    Ok(0)
}

fn run_micro(
    cli: &Cli,
    config: &FoldConfig,
    iterations: Option<u64>,
) -> anyhow::Result<u8> {
    let format = output_format(config)?;
    let mut micro = config.micro.clone();
    if let Some(n) = iterations {
        anyhow::ensure!(n > 0, "--iterations must be positive");
        micro.iterations = n;
    }

    let report = run_micro_suite(&micro);
    let rendered = render_micro(&report, format)?;
    emit(&rendered, cli.output.as_deref())?;
    if cli.save {
        save_report(&rendered, &config.output.directory, "micro", format)?;
    }

    let disagreeing: Vec<&str> = report
        .cases
        .iter()
        .filter(|c| !c.outputs_agree)
        .map(|c| c.name.as_str())
        .collect();
    if !disagreeing.is_empty() {
        eprintln!(
            "\nOld and new variants disagree: {}",
            disagreeing.join(", ")
        );
        return Ok(1);
    }

    Ok(0)
}

fn init_config(path: Option<&Path>, force: bool) -> anyhow::Result<u8> {
    let path = path.unwrap_or(Path::new(CONFIG_FILE_NAME));
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    std::fs::write(path, FoldConfig::default_toml())
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_overrides() {
        let cli = Cli::parse_from([
            "foldbench",
            "run",
            "--subject",
            "/bin/true",
            "--sizes",
            "10,25",
            "--filter",
            "^window",
            "--format",
            "json",
        ]);

        assert!(matches!(cli.command, Some(Commands::Run)));
        assert_eq!(cli.subject, Some(PathBuf::from("/bin/true")));
        assert_eq!(cli.sizes, Some(vec![10, 25]));
        assert_eq!(cli.filter.as_deref(), Some("^window"));
    }

    #[test]
    fn test_default_command_is_run() {
        let cli = Cli::parse_from(["foldbench", "--seed", "7"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.seed, Some(7));
    }

    #[test]
    fn test_invalid_filter_is_error() {
        let cli = Cli::parse_from(["foldbench", "list", "--filter", "("]);
        let config = FoldConfig::default();
        assert!(plan_for(&cli, &config).is_err());
    }

    #[test]
    fn test_unknown_format_is_error() {
        let mut config = FoldConfig::default();
        config.output.format = "html".to_string();
        assert!(output_format(&config).is_err());
    }

    #[test]
    fn test_missing_subject_exits_one_without_fixtures() {
        let dir = tempfile::tempdir().unwrap();
        let fixture_dir = dir.path().join("fixtures");
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(
            &config_path,
            format!(
                "[subject]\npath = \"{}\"\n[workloads]\nfixture_dir = \"{}\"\n",
                dir.path().join("missing").display(),
                fixture_dir.display()
            ),
        )
        .unwrap();

        let cli = Cli::parse_from([
            "foldbench",
            "--config",
            config_path.to_str().unwrap(),
            "--no-progress",
        ]);
        let code = run_with_cli(cli).unwrap();

        assert_eq!(code, 1);
        assert!(!fixture_dir.exists());
    }

    #[test]
    fn test_save_report_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = save_report("{}", &dir.path().join("out"), "report", OutputFormat::Json).unwrap();

        assert_eq!(path, dir.path().join("out").join("report.json"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "{}");
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);

        init_config(Some(&path), false).unwrap();
        assert!(FoldConfig::load(&path).is_ok());
        assert!(init_config(Some(&path), false).is_err());
        assert!(init_config(Some(&path), true).is_ok());
    }
}
