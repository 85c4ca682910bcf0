//! Injectable randomness for the performer.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Source of uniform draws in `[0, 1)`.
pub trait RandomSource: Send {
    fn next_f64(&mut self) -> f64;

    /// Uniform index in `0..len`. `len` must be non-zero.
    fn pick_index(&mut self, len: usize) -> usize {
        let draw = self.next_f64();
        ((draw * len as f64) as usize).min(len.saturating_sub(1))
    }
}

impl RandomSource for ChaCha8Rng {
    fn next_f64(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

/// Reproducible source for a fixed seed.
pub fn seeded(seed: u64) -> Box<dyn RandomSource> {
    Box::new(ChaCha8Rng::seed_from_u64(seed))
}

/// Source seeded from OS entropy.
pub fn from_entropy() -> Box<dyn RandomSource> {
    Box::new(ChaCha8Rng::from_entropy())
}

/// Replays a fixed list of draws, cycling when exhausted.
#[derive(Debug, Clone)]
pub struct FixedSequence {
    values: Vec<f64>,
    position: usize,
}

impl FixedSequence {
    pub fn new(values: Vec<f64>) -> Self {
        Self {
            values,
            position: 0,
        }
    }

    /// Every draw returns `value`.
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }
}

impl RandomSource for FixedSequence {
    fn next_f64(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.position % self.values.len()];
        self.position = (self.position + 1) % self.values.len();
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draws_are_in_unit_interval() {
        let mut rng = seeded(7);
        for _ in 0..10_000 {
            let v = rng.next_f64();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn same_seed_same_draws() {
        let mut a = seeded(42);
        let mut b = seeded(42);
        for _ in 0..100 {
            assert_eq!(a.next_f64(), b.next_f64());
        }
    }

    #[test]
    fn pick_index_is_bounded() {
        let mut fixed = FixedSequence::new(vec![0.0, 0.5, 0.999_999, 1.0]);
        assert_eq!(fixed.pick_index(3), 0);
        assert_eq!(fixed.pick_index(3), 1);
        assert_eq!(fixed.pick_index(3), 2);
        assert_eq!(fixed.pick_index(3), 2);
    }

    #[test]
    fn fixed_sequence_cycles() {
        let mut fixed = FixedSequence::new(vec![0.1, 0.2]);
        let draws: Vec<f64> = (0..5).map(|_| fixed.next_f64()).collect();
        assert_eq!(draws, vec![0.1, 0.2, 0.1, 0.2, 0.1]);
        assert_eq!(FixedSequence::new(Vec::new()).next_f64(), 0.0);
    }
}
