use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Source of uniformly distributed alphabet indices.
///
/// Implementations must return a value in `[0, bound)` for every `bound > 0`.
/// Generators only ever ask with `bound` equal to the alphabet size.
pub trait IndexSource: Send + Sync + 'static {
    fn next_index(&self, bound: usize) -> usize;
}

/// Draws from the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngSource;

impl IndexSource for ThreadRngSource {
    fn next_index(&self, bound: usize) -> usize {
        rand::rng().random_range(0..bound)
    }
}

/// Reproducible source backed by a seeded [`StdRng`].
#[derive(Debug)]
pub struct SeededSource {
    rng: Mutex<StdRng>,
}

impl SeededSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl IndexSource for SeededSource {
    fn next_index(&self, bound: usize) -> usize {
        self.rng.lock().random_range(0..bound)
    }
}

/// Replays a fixed sequence of indices, wrapping around at the end.
///
/// The indices are returned as-is, even when they exceed `bound`, so tests
/// can also exercise the out-of-range path.
#[derive(Debug)]
pub struct ScriptedSource {
    indices: Vec<usize>,
    cursor: AtomicUsize,
}

impl ScriptedSource {
    /// # Panics
    ///
    /// Panics if `indices` is empty.
    pub fn new(indices: impl Into<Vec<usize>>) -> Self {
        let indices = indices.into();
        assert!(!indices.is_empty(), "scripted source needs at least one index");
        Self {
            indices,
            cursor: AtomicUsize::new(0),
        }
    }
}

impl IndexSource for ScriptedSource {
    fn next_index(&self, _bound: usize) -> usize {
        let at = self.cursor.fetch_add(1, Ordering::Relaxed);
        self.indices[at % self.indices.len()]
    }
}
