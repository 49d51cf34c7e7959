use rand::rngs::SmallRng;
use rand::{Rng as _, RngCore as _, SeedableRng as _};

/// Seeded generator for cosmetic randomness only (particles, chime
/// throttling). Fixed seeds keep tests reproducible.
#[derive(Debug, Clone)]
pub struct CosmeticRng {
    inner: SmallRng,
}

impl CosmeticRng {
    pub fn new(seed: u64) -> Self {
        Self { inner: SmallRng::seed_from_u64(seed) }
    }

    /// Seeded from the OS.
    pub fn from_entropy() -> Self {
        Self { inner: SmallRng::from_entropy() }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    /// Uniform in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.inner.r#gen::<f64>()
    }

    /// True with probability `p`.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}
