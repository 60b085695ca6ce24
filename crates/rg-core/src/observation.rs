//! Observation and transition records.
//!
//! # Layout
//!
//! An observation is a fixed-length numeric vector: `ray_count` sensor
//! distances followed by the agent's signed scalar speed.  The layout is
//! frozen — learner weight matrices and replayed transitions both index
//! into it positionally, so ray `k` is element `k` and speed is always the
//! last element.

use crate::Action;

/// One sampled world state: ray distances plus trailing signed speed.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Observation {
    values: Vec<f32>,
}

impl Observation {
    /// Assemble from the sensor's ray distances and the agent's speed.
    pub fn from_parts(rays: Vec<f32>, speed: f32) -> Self {
        let mut values = rays;
        values.push(speed);
        Self { values }
    }

    /// Total element count (`ray_count + 1`).
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of ray elements (everything except the trailing speed).
    #[inline]
    pub fn ray_count(&self) -> usize {
        self.values.len() - 1
    }

    /// The ray distances, in fixed probe order.
    #[inline]
    pub fn rays(&self) -> &[f32] {
        &self.values[..self.values.len() - 1]
    }

    /// Distance reported by ray `k`.
    ///
    /// # Panics
    /// Panics if `k >= ray_count()`.
    #[inline]
    pub fn ray(&self, k: usize) -> f32 {
        self.rays()[k]
    }

    /// The agent's signed scalar speed at sample time.
    #[inline]
    pub fn speed(&self) -> f32 {
        self.values[self.values.len() - 1]
    }

    /// The full vector as a learner sees it.
    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }
}

/// One `(s, a, s', r, done)` record as stored in the replay buffer.
///
/// Immutable once constructed; the buffer clones these out on sampling, so
/// mutation after push can never corrupt training data.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transition {
    pub state:      Observation,
    pub action:     Action,
    pub next_state: Observation,
    pub reward:     f32,
    pub done:       bool,
}
