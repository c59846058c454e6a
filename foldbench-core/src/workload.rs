//! Synthetic Workloads
//!
//! Workloads are protein-like sequences sampled uniformly from a fixed
//! 21-symbol alphabet. Generation is driven by a seeded `StdRng`, so the same
//! `(size, seed)` pair yields the same payload on every machine.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io;
use std::path::{Path, PathBuf};

/// Symbols a payload is drawn from: the 20 amino acids plus the stop codon.
pub const ALPHABET: &[u8] = b"ACDEFGHIKLMNPQRSTVWY*";

/// Seed used when none is configured
pub const DEFAULT_SEED: u64 = 42;

/// Sequence lengths generated when none are configured
pub const DEFAULT_SIZES: &[usize] = &[10, 25, 50, 100, 200, 500, 1000];

/// Extension of persisted fixture files
pub const FIXTURE_EXTENSION: &str = "faa";

/// An immutable generated input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workload {
    id: String,
    size: usize,
    payload: String,
}

impl Workload {
    /// Identifier, `test_<size>`
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Number of symbols in the payload
    pub fn size(&self) -> usize {
        self.size
    }

    /// The generated symbols
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Header label written above the payload
    pub fn label(&self) -> String {
        format!(">{}_test_sequence", self.size)
    }

    /// File name used when the workload is persisted
    pub fn fixture_name(&self) -> String {
        format!("{}.{}", self.id, FIXTURE_EXTENSION)
    }

    /// Fixture text: header line followed by the payload on a single line
    pub fn fixture_contents(&self) -> String {
        let mut text = self.label();
        text.reserve(self.payload.len() + 1);
        text.push('\n');
        text.push_str(&self.payload);
        text
    }

    /// Persist this workload under `dir`, creating the directory if needed.
    pub fn write_fixture(&self, dir: impl AsRef<Path>) -> io::Result<PathBuf> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let path = dir.join(self.fixture_name());
        std::fs::write(&path, self.fixture_contents())?;
        Ok(path)
    }
}

/// Seeded source of workloads.
///
/// Successive calls share one random stream; nothing else carries over
/// between generated workloads.
#[derive(Debug, Clone)]
pub struct WorkloadGenerator {
    rng: StdRng,
}

impl WorkloadGenerator {
    /// Create a generator seeded with `seed`
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generate the next workload of `size` symbols
    pub fn next(&mut self, size: usize) -> Workload {
        let payload: String = (0..size)
            .map(|_| ALPHABET[self.rng.gen_range(0..ALPHABET.len())] as char)
            .collect();

        Workload {
            id: format!("test_{}", size),
            size,
            payload,
        }
    }

    /// Generate one workload per entry of `sizes`, in order
    pub fn generate_batch(&mut self, sizes: &[usize]) -> Vec<Workload> {
        sizes.iter().map(|&size| self.next(size)).collect()
    }
}

impl Default for WorkloadGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

/// Generate a single workload from a fresh stream seeded with `seed`
pub fn generate(size: usize, seed: u64) -> Workload {
    WorkloadGenerator::new(seed).next(size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_deterministic() {
        for &size in &[0, 1, 10, 50, 1000] {
            for seed in [0, 1, 42, u64::MAX] {
                assert_eq!(generate(size, seed), generate(size, seed));
            }
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        assert_ne!(generate(200, 1).payload(), generate(200, 2).payload());
    }

    #[test]
    fn test_payload_uses_alphabet() {
        let workload = generate(500, DEFAULT_SEED);
        assert_eq!(workload.size(), 500);
        assert_eq!(workload.payload().len(), 500);
        assert!(workload.payload().bytes().all(|b| ALPHABET.contains(&b)));
    }

    #[test]
    fn test_empty_workload() {
        let workload = generate(0, DEFAULT_SEED);
        assert_eq!(workload.id(), "test_0");
        assert!(workload.payload().is_empty());
        assert_eq!(workload.fixture_contents(), ">0_test_sequence\n");
    }

    #[test]
    fn test_batch_is_reproducible() {
        let a = WorkloadGenerator::new(7).generate_batch(DEFAULT_SIZES);
        let b = WorkloadGenerator::new(7).generate_batch(DEFAULT_SIZES);
        assert_eq!(a, b);
        let sizes: Vec<_> = a.iter().map(Workload::size).collect();
        assert_eq!(sizes, DEFAULT_SIZES);
    }

    #[test]
    fn test_batch_advances_stream() {
        let batch = WorkloadGenerator::new(3).generate_batch(&[64, 64]);
        assert_ne!(batch[0].payload(), batch[1].payload());
        // The first workload of a batch matches a standalone generation
        assert_eq!(batch[0], generate(64, 3));
    }

    #[test]
    fn test_fixture_contents() {
        let workload = generate(25, DEFAULT_SEED);
        let text = workload.fixture_contents();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some(">25_test_sequence"));
        assert_eq!(lines.next(), Some(workload.payload()));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_write_fixture() {
        let dir = tempfile::tempdir().unwrap();
        let workload = generate(10, DEFAULT_SEED);
        let path = workload.write_fixture(dir.path().join("nested")).unwrap();

        assert_eq!(path.file_name().unwrap(), "test_10.faa");
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, workload.fixture_contents());
    }
}
