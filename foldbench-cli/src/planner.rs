//! Benchmark Planner
//!
//! Builds the execution plan from configuration and CLI options.
//!
//! Filtering options:
//! - Regex pattern matching on configuration name
//!
//! Ordering: workload sizes ascending (duplicates collapsed), configurations
//! in declaration order.

use crate::config::FoldConfig;
use foldbench_core::Configuration;
use regex::Regex;

/// Execution plan for one suite run
#[derive(Debug, Clone)]
pub struct ExecutionPlan {
    /// Workload sizes in execution order
    pub sizes: Vec<usize>,
    /// Configurations in execution order
    pub configurations: Vec<Configuration>,
    /// Generator seed
    pub seed: u64,
}

impl ExecutionPlan {
    /// Number of trials the plan performs
    pub fn trial_count(&self) -> usize {
        self.sizes.len() * self.configurations.len()
    }

    /// Whether the filter left nothing to run
    pub fn is_empty(&self) -> bool {
        self.trial_count() == 0
    }
}

/// Build execution plan from configuration
pub fn build_plan(config: &FoldConfig, filter: Option<&Regex>) -> ExecutionPlan {
    let configurations = config
        .configurations
        .iter()
        .filter(|c| filter.is_none_or(|re| re.is_match(&c.name)))
        .cloned()
        .collect();

    let mut sizes = config.workloads.sizes.clone();
    sizes.sort_unstable();
    sizes.dedup();

    ExecutionPlan {
        sizes,
        configurations,
        seed: config.workloads.seed,
    }
}
