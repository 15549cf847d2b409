//! Random choice of a message from a candidate pool.
//!
//! Picking is the only nondeterministic step in evaluation, so it sits
//! behind a trait that tests and hosts can substitute.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// Chooses an index into a non-empty pool.
#[cfg_attr(test, mockall::automock)]
pub trait MessagePicker: Send + Sync {
    /// Return an index in `0..len`. Never called with `len == 0`.
    fn pick(&self, len: usize) -> usize;
}

/// Uniform choice from the thread-local generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngPicker;

impl MessagePicker for ThreadRngPicker {
    fn pick(&self, len: usize) -> usize {
        rand::rng().random_range(0..len)
    }
}

/// Uniform choice from a seeded generator; same seed, same sequence.
#[derive(Debug)]
pub struct SeededPicker {
    rng: Mutex<StdRng>,
}

impl SeededPicker {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl MessagePicker for SeededPicker {
    fn pick(&self, len: usize) -> usize {
        // A poisoned lock still holds a usable generator
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.random_range(0..len)
    }
}

/// Always picks the first message.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstPicker;

impl MessagePicker for FirstPicker {
    fn pick(&self, _len: usize) -> usize {
        0
    }
}
