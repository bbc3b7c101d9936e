//! Random source seam. Production uses the thread-local generator; tests and
//! reproducible runs use a seeded ChaCha stream.

use std::sync::Mutex;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub trait RandomSource: Send + Sync {
    /// Uniform in `[0, 1)`.
    fn next_f64(&self) -> f64;

    /// Uniform integer in `[lo, hi)`. Returns `lo` when the range is empty.
    fn next_in_range(&self, lo: i32, hi: i32) -> i32;

    fn next_bool(&self) -> bool {
        self.next_f64() < 0.5
    }

    /// Uniform index into a slice of length `len` (`len` > 0).
    fn pick(&self, len: usize) -> usize {
        self.next_in_range(0, len as i32) as usize
    }
}

/// Thread-local `rand` generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_f64(&self) -> f64 {
        rand::thread_rng().gen_range(0.0..1.0)
    }

    fn next_in_range(&self, lo: i32, hi: i32) -> i32 {
        if hi <= lo {
            return lo;
        }
        rand::thread_rng().gen_range(lo..hi)
    }
}

/// Deterministic generator for a fixed seed.
pub struct SeededRandom {
    rng: Mutex<ChaCha8Rng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_f64(&self) -> f64 {
        self.rng
            .lock()
            .expect("seeded rng poisoned")
            .gen_range(0.0..1.0)
    }

    fn next_in_range(&self, lo: i32, hi: i32) -> i32 {
        if hi <= lo {
            return lo;
        }
        self.rng
            .lock()
            .expect("seeded rng poisoned")
            .gen_range(lo..hi)
    }
}
