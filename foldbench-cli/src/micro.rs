//! Micro-Benchmarks
//!
//! Old-vs-new kernel pairs timed in process. Each pair computes the same
//! value two ways; both variants run under [`InProcessRunner`]. Kernel inputs
//! are fixed, so they are handed in through [`InProcessRunner::run_with`] (or
//! `black_box` for the in-place clear) to keep the work inside the loop. The
//! final outputs are compared after the loop to catch a variant that changed
//! meaning.
//!
//! | Case                  | Baseline              | Candidate          |
//! |-----------------------|-----------------------|--------------------|
//! | MIN/MAX               | `macro_rules!` select | `const fn`         |
//! | Matrix size           | summation loop        | closed form        |
//! | Array clearing        | element-wise loop     | `slice::fill`      |
//! | Data structure access | indexed `Vec`         | iterated `[_; 100]`|

use crate::config::MicroConfig;
use chrono::Utc;
use foldbench_core::{InProcessRunner, Timed};
use foldbench_report::{MicroCaseResult, MicroReport, MicroTiming, SCHEMA_VERSION};
use foldbench_stats::relative_improvement;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::hint::black_box;

/// Seed of the MIN/MAX input pairs
pub const MIN_MAX_SEED: u64 = 42;

/// Number of MIN/MAX input pairs
pub const MIN_MAX_PAIRS: usize = 1000;

/// (length, window) parameters of the matrix size kernel
pub const MATRIX_PARAMS: [(i64, i64); 5] =
    [(100, 50), (200, 100), (500, 250), (1000, 500), (2000, 1000)];

/// Fill value of the array-clearing kernel
pub const CLEARED: i32 = -999_999;

/// Element count of the data structure access kernel
pub const ACCESS_LEN: usize = 100;

macro_rules! old_min2 {
    ($a:expr, $b:expr) => {
        if $a < $b { $a } else { $b }
    };
}

macro_rules! old_max2 {
    ($a:expr, $b:expr) => {
        if $a > $b { $a } else { $b }
    };
}

/// Smaller of two values
pub const fn new_min2(a: i32, b: i32) -> i32 {
    if a < b { a } else { b }
}

/// Larger of two values
pub const fn new_max2(a: i32, b: i32) -> i32 {
    if a > b { a } else { b }
}

/// Cells in the first `w` diagonals of a `len` x `len` triangle, by summation
pub fn old_matrix_size(len: i64, w: i64) -> i64 {
    let mut size = 0;
    for i in 1..=w {
        size += len - (i - 1);
    }
    size
}

/// Same as [`old_matrix_size`] in closed form
pub const fn new_matrix_size(len: i64, w: i64) -> i64 {
    if w <= len {
        w * len - (w * (w - 1)) / 2
    } else {
        (len * (len + 1)) / 2
    }
}

/// Clear by writing every element in turn
pub fn old_clear(values: &mut [i32]) {
    for value in values.iter_mut() {
        *value = CLEARED;
    }
}

/// Clear with [`slice::fill`]
pub fn new_clear(values: &mut [i32]) {
    values.fill(CLEARED);
}

/// Sum of min and max over every pair, with the macro variants
pub fn old_min_max_total(pairs: &[(i32, i32)]) -> i64 {
    pairs.iter().fold(0, |acc, &(a, b)| {
        acc + old_min2!(a, b) as i64 + old_max2!(a, b) as i64
    })
}

/// Sum of min and max over every pair, with the `const fn` variants
pub fn new_min_max_total(pairs: &[(i32, i32)]) -> i64 {
    pairs.iter().fold(0, |acc, &(a, b)| {
        acc + new_min2(a, b) as i64 + new_max2(a, b) as i64
    })
}

/// Total matrix size over `(len, w)` parameters, by summation
pub fn old_matrix_total(params: &[(i64, i64)]) -> i64 {
    params.iter().map(|&(len, w)| old_matrix_size(len, w)).sum()
}

/// Total matrix size over `(len, w)` parameters, in closed form
pub fn new_matrix_total(params: &[(i64, i64)]) -> i64 {
    params.iter().map(|&(len, w)| new_matrix_size(len, w)).sum()
}

/// Sum by index into a heap buffer
#[allow(clippy::needless_range_loop)]
pub fn indexed_sum(values: &[i32]) -> i64 {
    let mut total = 0;
    for i in 0..values.len() {
        total += values[i] as i64;
    }
    total
}

/// Sum by iterating a fixed-size array
pub fn fixed_sum(values: &[i32; ACCESS_LEN]) -> i64 {
    values.iter().map(|&v| v as i64).sum()
}

/// Seeded input pairs for the MIN/MAX kernels
pub fn min_max_pairs(seed: u64, count: usize) -> Vec<(i32, i32)> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| (rng.gen_range(1..=1000), rng.gen_range(1..=1000)))
        .collect()
}

/// Run every pair and collect the results
pub fn run_micro_suite(config: &MicroConfig) -> MicroReport {
    let scalar = InProcessRunner::new(config.iterations);
    let mut cases = Vec::with_capacity(4);

    let pairs = min_max_pairs(MIN_MAX_SEED, MIN_MAX_PAIRS);
    cases.push(compare_pair(
        "MIN/MAX Function Benchmark",
        ("OLD: Macro MIN/MAX", "NEW: const fn MIN/MAX"),
        scalar.run_with(pairs.as_slice(), old_min_max_total),
        scalar.run_with(pairs.as_slice(), new_min_max_total),
    ));

    cases.push(compare_pair(
        "Matrix Size Calculation Benchmark",
        ("OLD: Loop-based", "NEW: Formula-based"),
        scalar.run_with(&MATRIX_PARAMS[..], old_matrix_total),
        scalar.run_with(&MATRIX_PARAMS[..], new_matrix_total),
    ));

    let arrays = InProcessRunner::new(config.array_iterations);
    let mut old_buffer = vec![0i32; config.array_size];
    let mut new_buffer = vec![0i32; config.array_size];
    let old = arrays.run(|| {
        old_clear(black_box(old_buffer.as_mut_slice()));
        old_buffer.first().copied()
    });
    let new = arrays.run(|| {
        new_clear(black_box(new_buffer.as_mut_slice()));
        new_buffer.first().copied()
    });
    let mut clearing = compare_pair(
        "Array Clearing Benchmark",
        ("OLD: Manual loop", "NEW: slice::fill"),
        old,
        new,
    );
    clearing.outputs_agree &= old_buffer == new_buffer;
    cases.push(clearing);

    let indexed: Vec<i32> = (0..ACCESS_LEN as i32).collect();
    let mut fixed = [0i32; ACCESS_LEN];
    for (i, slot) in fixed.iter_mut().enumerate() {
        *slot = i as i32;
    }
    cases.push(compare_pair(
        "Data Structure Access Benchmark",
        ("OLD: indexed Vec", "NEW: fixed-size array"),
        scalar.run_with(indexed.as_slice(), indexed_sum),
        scalar.run_with(&fixed, fixed_sum),
    ));

    for case in &cases {
        tracing::debug!(
            case = %case.name,
            baseline_ms = case.baseline.elapsed_ms,
            candidate_ms = case.candidate.elapsed_ms,
            agree = case.outputs_agree,
            "micro case finished"
        );
    }

    MicroReport {
        schema_version: SCHEMA_VERSION,
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
        iterations: config.iterations,
        cases,
    }
}

fn compare_pair<T: PartialEq>(
    name: &str,
    (baseline_label, candidate_label): (&str, &str),
    baseline: Timed<T>,
    candidate: Timed<T>,
) -> MicroCaseResult {
    let (improvement_percent, not_computable) =
        match relative_improvement(baseline.elapsed_millis, candidate.elapsed_millis) {
            Ok(percent) => (Some(percent), None),
            Err(e) => (None, Some(e.to_string())),
        };

    MicroCaseResult {
        name: name.to_string(),
        outputs_agree: baseline.output == candidate.output,
        baseline: timing(baseline_label, &baseline),
        candidate: timing(candidate_label, &candidate),
        improvement_percent,
        not_computable,
    }
}

fn timing<T>(label: &str, timed: &Timed<T>) -> MicroTiming {
    MicroTiming {
        label: label.to_string(),
        iterations: timed.iterations,
        elapsed_ms: timed.elapsed_millis,
        ops_per_ms: timed.ops_per_milli(),
    }
}
