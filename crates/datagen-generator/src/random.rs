//! Seeded random context shared by the field generators.
//!
//! The context uses a seeded RNG so that the same seed and the same sequence
//! of calls always produce the same values. Generators never create their own
//! engines; every draw goes through the context passed to `generate`.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore, SeedableRng};
use rand_distr::{Distribution, Normal};
use std::collections::HashMap;
use std::sync::Arc;

/// Seeded random engine plus context-scoped Zipf tables.
pub struct RandomContext {
    /// Seeded random number generator for reproducibility
    rng: StdRng,
    /// Seed the engine was created with
    seed: u64,
    /// Cumulative Zipf distributions keyed by (n, skew bits)
    zipf_tables: HashMap<(usize, u64), Arc<[f64]>>,
}

impl RandomContext {
    /// Create a context seeded with `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
            zipf_tables: HashMap::new(),
        }
    }

    /// Seed this context was created with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform integer in `[min, max]`. Returns `min` when `min >= max`.
    pub fn uniform_int(&mut self, min: i64, max: i64) -> i64 {
        if min >= max {
            return min;
        }
        self.rng.gen_range(min..=max)
    }

    /// Uniform index in `[0, len)`. Returns 0 for an empty range.
    pub fn uniform_index(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        self.rng.gen_range(0..len)
    }

    /// Uniform real in `[min, max)`. Returns `min` unless `min < max`.
    pub fn uniform_real(&mut self, min: f64, max: f64) -> f64 {
        if !(min < max) {
            return min;
        }
        if (max - min).is_finite() {
            return self.rng.gen_range(min..max);
        }
        // Span overflows f64; interpolate instead of subtracting
        let t: f64 = self.rng.gen();
        (min * (1.0 - t) + max * t).clamp(min, max)
    }

    /// Uniform real in `[0, 1)`.
    pub fn unit(&mut self) -> f64 {
        self.rng.gen()
    }

    /// `true` with probability `p`, clamped into `[0, 1]`.
    pub fn bernoulli(&mut self, p: f64) -> bool {
        if p.is_nan() || p <= 0.0 {
            return false;
        }
        self.rng.gen_bool(p.min(1.0))
    }

    /// Gaussian sample. Returns `mean` for a non-positive standard deviation.
    pub fn normal(&mut self, mean: f64, std_dev: f64) -> f64 {
        if !(std_dev > 0.0) {
            return mean;
        }
        match Normal::new(mean, std_dev) {
            Ok(dist) => dist.sample(&mut self.rng),
            Err(_) => mean,
        }
    }

    /// Zipf-distributed rank in `[0, n)`, rank 0 being the most likely.
    ///
    /// Weights are `1 / (i + 1)^skew`. The normalized cumulative table is
    /// built once per `(n, skew)` and kept for the lifetime of the context.
    pub fn zipf(&mut self, n: usize, skew: f64) -> usize {
        if n <= 1 {
            return 0;
        }

        let table = Arc::clone(
            self.zipf_tables
                .entry((n, skew.to_bits()))
                .or_insert_with(|| zipf_table(n, skew)),
        );

        let u: f64 = self.rng.gen();
        table.partition_point(|&c| c < u).min(n - 1)
    }

    /// Fisher-Yates shuffle on the context engine.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }

    /// Fill `bytes` with random data.
    pub fn fill_bytes(&mut self, bytes: &mut [u8]) {
        self.rng.fill_bytes(bytes);
    }
}

impl std::fmt::Debug for RandomContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RandomContext")
            .field("seed", &self.seed)
            .field("zipf_tables", &self.zipf_tables.len())
            .finish()
    }
}

fn zipf_table(n: usize, skew: f64) -> Arc<[f64]> {
    let mut cumulative = Vec::with_capacity(n);
    let mut total = 0.0;
    for i in 0..n {
        total += 1.0 / ((i + 1) as f64).powf(skew);
        cumulative.push(total);
    }
    for c in &mut cumulative {
        *c /= total;
    }
    if let Some(last) = cumulative.last_mut() {
        *last = 1.0;
    }
    cumulative.into()
}
