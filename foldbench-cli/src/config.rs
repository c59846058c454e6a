//! Configuration loading from foldbench.toml
//!
//! FoldBench configuration can be specified in a `foldbench.toml` file in the
//! project root. The configuration is automatically discovered by walking up
//! from the current directory. Every section is optional.

use foldbench_core::{Configuration, DEFAULT_SEED, DEFAULT_SIZES};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name searched for by [`FoldConfig::discover`]
pub const CONFIG_FILE_NAME: &str = "foldbench.toml";

/// Errors loading or validating a configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        /// File that was being read
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The file is not valid TOML for this schema
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        /// File that was being parsed
        path: PathBuf,
        /// Underlying TOML error
        source: toml::de::Error,
    },

    /// A semantic check failed after parsing
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// FoldBench configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoldConfig {
    /// Subject configuration
    #[serde(default)]
    pub subject: SubjectConfig,
    /// Workload generation configuration
    #[serde(default)]
    pub workloads: WorkloadConfig,
    /// Invocation variants, in execution order
    #[serde(default = "default_configurations")]
    pub configurations: Vec<Configuration>,
    /// Baseline/candidate selection
    #[serde(default)]
    pub comparison: ComparisonConfig,
    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
    /// Micro-benchmark configuration
    #[serde(default)]
    pub micro: MicroConfig,
}

impl Default for FoldConfig {
    fn default() -> Self {
        Self {
            subject: SubjectConfig::default(),
            workloads: WorkloadConfig::default(),
            configurations: default_configurations(),
            comparison: ComparisonConfig::default(),
            output: OutputConfig::default(),
            micro: MicroConfig::default(),
        }
    }
}

fn default_configurations() -> Vec<Configuration> {
    vec![
        Configuration::new("default", ""),
        Configuration::new("window_20", "-w 20"),
        Configuration::new("window_50", "-w 50"),
        Configuration::new("exclude_codons", "-e GUA,GUC,CUG"),
        Configuration::new("reverse_opt", "-r"),
    ]
}

/// Subject under test
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectConfig {
    /// Path to the executable (or a bare name looked up on PATH)
    #[serde(default = "default_subject_path")]
    pub path: PathBuf,
}

impl Default for SubjectConfig {
    fn default() -> Self {
        Self {
            path: default_subject_path(),
        }
    }
}

fn default_subject_path() -> PathBuf {
    PathBuf::from("./src/CDSfold")
}

/// Workload generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkloadConfig {
    /// Sequence lengths to generate
    #[serde(default = "default_sizes")]
    pub sizes: Vec<usize>,
    /// Generator seed
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Directory fixtures are written to
    #[serde(default = "default_fixture_dir")]
    pub fixture_dir: PathBuf,
    /// Leave fixture files on disk after the run
    #[serde(default = "default_keep_fixtures")]
    pub keep_fixtures: bool,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            sizes: default_sizes(),
            seed: default_seed(),
            fixture_dir: default_fixture_dir(),
            keep_fixtures: default_keep_fixtures(),
        }
    }
}

fn default_sizes() -> Vec<usize> {
    DEFAULT_SIZES.to_vec()
}
fn default_seed() -> u64 {
    DEFAULT_SEED
}
fn default_fixture_dir() -> PathBuf {
    PathBuf::from("target/foldbench/fixtures")
}
fn default_keep_fixtures() -> bool {
    true
}

/// Which configurations are compared.
///
/// Unset names fall back to the first and second declared configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComparisonConfig {
    /// Baseline configuration name
    #[serde(default)]
    pub baseline: Option<String>,
    /// Candidate configuration name
    #[serde(default)]
    pub candidate: Option<String>,
}

impl ComparisonConfig {
    /// Resolved (baseline, candidate) names against `configurations`.
    ///
    /// `None` when a side is unnamed and there is no configuration to fall
    /// back to.
    pub fn resolve(&self, configurations: &[Configuration]) -> Option<(String, String)> {
        let baseline = self
            .baseline
            .clone()
            .or_else(|| configurations.first().map(|c| c.name.clone()))?;
        let candidate = self
            .candidate
            .clone()
            .or_else(|| configurations.get(1).map(|c| c.name.clone()))?;
        Some((baseline, candidate))
    }
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format: "human", "json", "csv"
    #[serde(default = "default_format")]
    pub format: String,
    /// Output directory for reports
    #[serde(default = "default_output_dir")]
    pub directory: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            directory: default_output_dir(),
        }
    }
}

fn default_format() -> String {
    "human".to_string()
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("target/foldbench")
}

/// Micro-benchmark sizing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MicroConfig {
    /// Iterations of each scalar kernel
    #[serde(default = "default_micro_iterations")]
    pub iterations: u64,
    /// Element count of the array-clear kernel
    #[serde(default = "default_array_size")]
    pub array_size: usize,
    /// Iterations of the array-clear kernel
    #[serde(default = "default_array_iterations")]
    pub array_iterations: u64,
}

impl Default for MicroConfig {
    fn default() -> Self {
        Self {
            iterations: default_micro_iterations(),
            array_size: default_array_size(),
            array_iterations: default_array_iterations(),
        }
    }
}

fn default_micro_iterations() -> u64 {
    1_000_000
}
fn default_array_size() -> usize {
    10_000
}
fn default_array_iterations() -> u64 {
    10_000
}

impl FoldConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Walk up from `start` looking for `foldbench.toml`.
    ///
    /// `Ok(None)` when no file exists; a file that exists but fails to load is
    /// an error rather than a silent fallback to defaults.
    pub fn discover_from(start: impl AsRef<Path>) -> Result<Option<(PathBuf, Self)>, ConfigError> {
        let mut dir = start.as_ref().to_path_buf();
        loop {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.is_file() {
                let config = Self::load(&config_path)?;
                return Ok(Some((config_path, config)));
            }
            if !dir.pop() {
                return Ok(None);
            }
        }
    }

    /// Discover from the current directory
    pub fn discover() -> Result<Option<(PathBuf, Self)>, ConfigError> {
        match std::env::current_dir() {
            Ok(dir) => Self::discover_from(dir),
            Err(_) => Ok(None),
        }
    }

    /// Reject configurations the suite could never run
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.configurations.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one [[configurations]] entry is required".to_string(),
            ));
        }
        let mut seen = std::collections::HashSet::new();
        if let Some(dup) = self
            .configurations
            .iter()
            .find(|c| !seen.insert(c.name.as_str()))
        {
            return Err(ConfigError::Invalid(format!(
                "duplicate configuration name '{}'",
                dup.name
            )));
        }
        if self.workloads.sizes.is_empty() {
            return Err(ConfigError::Invalid(
                "workloads.sizes must not be empty".to_string(),
            ));
        }
        if self.micro.iterations == 0 || self.micro.array_iterations == 0 {
            return Err(ConfigError::Invalid(
                "micro iteration counts must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        r#"# FoldBench Configuration

[subject]
# Executable under test; a bare name is looked up on PATH
path = "./src/CDSfold"

[workloads]
# Sequence lengths (symbols) to generate
sizes = [10, 25, 50, 100, 200, 500, 1000]
# Generator seed; identical seeds give identical fixtures
seed = 42
# Where fixture files are written
fixture_dir = "target/foldbench/fixtures"
# Leave fixtures on disk after the run
keep_fixtures = true

# Invocation variants, run in declaration order
[[configurations]]
name = "default"
args = ""

[[configurations]]
name = "window_20"
args = "-w 20"

[[configurations]]
name = "window_50"
args = "-w 50"

[[configurations]]
name = "exclude_codons"
args = "-e GUA,GUC,CUG"

[[configurations]]
name = "reverse_opt"
args = "-r"

[comparison]
# Defaults to the first and second configuration (uncomment to override)
# baseline = "default"
# candidate = "window_20"

[output]
# Default output format: human, json, csv
format = "human"
# Output directory for reports
directory = "target/foldbench"

[micro]
# Iterations of each scalar kernel
iterations = 1000000
# Array-clear kernel sizing
array_size = 10000
array_iterations = 10000
"#
        .to_string()
    }
}
