//! `rg-replay` — experience replay for the training loop.
//!
//! A [`ReplayBuffer`] is a fixed-capacity ring of [`Transition`]s.  `push`
//! is O(1) and overwrites the oldest entry once the ring is full; nothing
//! is ever persisted.
//!
//! # Sampling
//!
//! [`sample`](ReplayBuffer::sample) draws with replacement.  The exponent
//! `alpha` shapes how strongly the draw favours recent experience:
//!
//! | `alpha` | behaviour                                 |
//! |---------|-------------------------------------------|
//! | `0.0`   | uniform over the whole buffer             |
//! | `0.6`   | mild recency bias (the training default)  |
//! | large   | effectively newest-only                   |
//!
//! The i-th oldest of `n` stored transitions carries weight
//! `((i + 1) / n)^alpha`, so the newest always has weight 1.
//!
//! # Concurrency
//!
//! The buffer has no interior locking and expects a single writer.  It is
//! `Send`, so a threaded driver can wrap it in a mutex.

use rg_core::{RunRng, Transition};
use thiserror::Error;

pub type ReplayResult<T> = Result<T, ReplayError>;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("requested a batch of {requested} but only {available} transitions are stored")]
    InsufficientData { requested: usize, available: usize },

    #[error("sampling exponent must be finite and non-negative, got {0}")]
    InvalidAlpha(f32),
}

/// Fixed-capacity transition ring with its own RNG stream.
pub struct ReplayBuffer {
    items:     Vec<Transition>,
    capacity:  usize,
    /// Index of the oldest entry once the ring is full; 0 while filling.
    head:      usize,
    batch_min: usize,
    rng:       RunRng,
}

impl ReplayBuffer {
    /// Ring holding at most `capacity` transitions, trainable once it holds
    /// `batch_min`, drawing from a stream seeded with `seed`.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0.
    pub fn new(capacity: usize, batch_min: usize, seed: u64) -> Self {
        Self::with_rng(capacity, batch_min, RunRng::new(seed))
    }

    /// Like [`new`](Self::new) but with a caller-derived RNG stream, for
    /// runs that split one root seed across consumers.
    pub fn with_rng(capacity: usize, batch_min: usize, rng: RunRng) -> Self {
        assert!(capacity > 0, "replay capacity must be at least 1");
        ReplayBuffer {
            items: Vec::with_capacity(capacity),
            capacity,
            head: 0,
            batch_min,
            rng,
        }
    }

    /// Store a transition, overwriting the oldest once full.  Never fails.
    pub fn push(&mut self, transition: Transition) {
        if self.items.len() < self.capacity {
            self.items.push(transition);
        } else {
            self.items[self.head] = transition;
            self.head = (self.head + 1) % self.capacity;
        }
    }

    /// Draw `batch_size` transitions with replacement.
    ///
    /// `alpha = 0` is uniform; `alpha > 0` applies the recency weighting
    /// described in the crate docs.  Errors if the buffer holds fewer than
    /// `batch_size` transitions or if `alpha` is not a finite non-negative
    /// number.
    pub fn sample(&mut self, batch_size: usize, alpha: f32) -> ReplayResult<Vec<Transition>> {
        let n = self.items.len();
        if batch_size > n {
            return Err(ReplayError::InsufficientData { requested: batch_size, available: n });
        }
        if !alpha.is_finite() || alpha < 0.0 {
            return Err(ReplayError::InvalidAlpha(alpha));
        }
        if batch_size == 0 {
            return Ok(Vec::new());
        }

        if alpha == 0.0 {
            return Ok((0..batch_size)
                .map(|_| self.items[self.rng.gen_range(0..n)].clone())
                .collect());
        }

        // Cumulative weights in age order, oldest first.  A draw picks the
        // first rank whose cumulative weight exceeds a uniform target, the
        // same inverse-CDF walk a prioritized buffer does.
        let mut cumulative = Vec::with_capacity(n);
        let mut total = 0.0f32;
        for rank in 0..n {
            total += ((rank + 1) as f32 / n as f32).powf(alpha);
            cumulative.push(total);
        }
        Ok((0..batch_size)
            .map(|_| {
                let target = self.rng.gen_range(0.0..total);
                let rank = cumulative.partition_point(|&c| c <= target).min(n - 1);
                self.items[(self.head + rank) % n].clone()
            })
            .collect())
    }

    /// Stored transitions, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Transition> + '_ {
        let n = self.items.len();
        (0..n).map(move |i| &self.items[(self.head + i) % n])
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// True once enough transitions are stored to fill a training batch.
    #[inline]
    pub fn trainable(&self) -> bool {
        self.items.len() >= self.batch_min
    }
}

#[cfg(test)]
mod tests;
