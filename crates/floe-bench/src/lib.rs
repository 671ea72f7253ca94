//! Benchmark profiles and utilities for the floe workspace.
//!
//! Provides deterministic allocation-size workloads so benchmark runs are
//! comparable across machines and revisions.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Deterministic allocation sizes in `lo..=hi`, seeded so every run sees the
/// same workload.
pub fn length_profile(seed: u64, count: usize, lo: usize, hi: usize) -> Vec<usize> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count).map(|_| rng.gen_range(lo..=hi)).collect()
}

/// Small-string workload: the size mix of a parser localizing tokens.
pub fn token_profile(seed: u64, count: usize) -> Vec<usize> {
    length_profile(seed, count, 4, 96)
}

/// Buffer workload: the size mix of a formatter staging output runs.
pub fn buffer_profile(seed: u64, count: usize) -> Vec<usize> {
    length_profile(seed, count, 256, 8192)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profiles_are_deterministic() {
        assert_eq!(token_profile(7, 32), token_profile(7, 32));
        assert_ne!(token_profile(7, 32), token_profile(8, 32));
    }

    #[test]
    fn profiles_respect_bounds() {
        for n in buffer_profile(1, 100) {
            assert!((256..=8192).contains(&n));
        }
    }
}
