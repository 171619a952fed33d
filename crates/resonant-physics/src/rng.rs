// ─────────────────────────────────────────────────────────────────────
// Resonant Addressing Kernel — Seeded PRNG Stream
// ─────────────────────────────────────────────────────────────────────
//! The single random stream threaded through simulation stepping and
//! search sampling/mutation.

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;

/// Explicitly-seeded ChaCha8 stream. Not `Clone`; a run owns exactly one.
#[derive(Debug)]
pub struct SeededRng {
    seed: u64,
    inner: ChaCha8Rng,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Seed this stream was created from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform in [0, 1).
    pub fn next_f64(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }

    /// Standard normal draw.
    pub fn next_normal(&mut self) -> f64 {
        self.inner.sample(StandardNormal)
    }

    /// Uniform in [lo, hi). Returns `lo` for an empty or inverted range
    /// without consuming a draw.
    pub fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        if lo.is_nan() || hi.is_nan() || hi <= lo {
            return lo;
        }
        lo + (hi - lo) * self.next_f64()
    }

    /// Uniform index in [0, n). `n` must be non-zero.
    pub fn next_index(&mut self, n: usize) -> usize {
        debug_assert!(n > 0, "next_index on empty range");
        self.inner.gen_range(0..n.max(1))
    }

    /// Fair coin.
    pub fn next_bool(&mut self) -> bool {
        self.inner.gen::<bool>()
    }
}

impl RngCore for SeededRng {
    fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.inner.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.inner.try_fill_bytes(dest)
    }
}
