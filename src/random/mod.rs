//! Random sources for the free digits of generated numbers
//!
//! These are illustrative test identifiers; the sources are not cryptographically secure.

use crate::domain::documents::DigitString;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Supplies uniformly distributed decimal digits
pub trait DigitSource {
    /// Return `count` independently sampled digits
    fn next_digits(&mut self, count: usize) -> DigitString;
}

fn sample_digits<R: Rng + ?Sized>(rng: &mut R, count: usize) -> DigitString {
    let digits: Vec<u8> = (0..count).map(|_| rng.gen_range(0..10)).collect();
    // gen_range(0..10) never leaves the digit range
    DigitString::from_digits(digits).unwrap_or_default()
}

/// Draws from the thread-local generator on every call
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngSource;

impl DigitSource for ThreadRngSource {
    fn next_digits(&mut self, count: usize) -> DigitString {
        sample_digits(&mut rand::thread_rng(), count)
    }
}

/// Reproducible source seeded from a `u64`
#[derive(Debug, Clone)]
pub struct SeededSource {
    rng: StdRng,
}

impl SeededSource {
    pub fn new(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }
}

impl DigitSource for SeededSource {
    fn next_digits(&mut self, count: usize) -> DigitString {
        sample_digits(&mut self.rng, count)
    }
}

impl<S: DigitSource + ?Sized> DigitSource for Box<S> {
    fn next_digits(&mut self, count: usize) -> DigitString {
        (**self).next_digits(count)
    }
}
