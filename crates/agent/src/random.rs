//! Sources of the uniform draw used by weighted reply sampling.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Yields draws in `[0, 1)`.
pub trait RandomSource: Send {
    fn draw(&mut self) -> f64;
}

/// Draws from the thread-local generator. The default for live chat.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn draw(&mut self) -> f64 {
        rand::rng().random_range(0.0..1.0)
    }
}

/// Reproducible draws from a fixed seed.
#[derive(Debug, Clone)]
pub struct SeededRandom(StdRng);

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl RandomSource for SeededRandom {
    fn draw(&mut self) -> f64 {
        self.0.random_range(0.0..1.0)
    }
}

/// Always returns the same draw, clamped into `[0, 1)`.
#[derive(Debug, Clone, Copy)]
pub struct FixedDraw(pub f64);

impl RandomSource for FixedDraw {
    fn draw(&mut self) -> f64 {
        if self.0.is_nan() {
            return 0.0;
        }
        self.0.clamp(0.0, 1.0 - f64::EPSILON)
    }
}
